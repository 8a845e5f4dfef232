use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::provider::ProviderError;

/// Why an authenticated request could not proceed.
///
/// An anonymous caller (no `Authorization` header at all) is not represented
/// here; the validator reports it as `Authentication::Anonymous`.
#[derive(Debug, Error)]
pub enum AuthError {
    // Rejected locally, no provider round-trip
    #[error("authorization header is not of the form 'Bearer <token>'")]
    MalformedCredential,

    // The provider said no, or could not be asked (fail-closed)
    #[error("token is inactive or expired")]
    InactiveOrExpired,

    // The token is fine; this service has no user for it
    #[error("no local user for subject {subject}")]
    UnknownPrincipal { subject: String },

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),

    #[error("identity store failure: {0}")]
    IdentityStore(#[from] RepoError),
}
