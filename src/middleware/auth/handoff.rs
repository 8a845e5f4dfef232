//! Typed slot carrying the provider connection and validated token from the
//! access stage to the claims stage.
//!
//! The slot lives in the request's own `Extensions`, so it is scoped to one
//! request. The claims stage `take`s it (removing it) before the handler runs;
//! if the request ends early the extensions are dropped with it.
use std::sync::Arc;

use axum::http::Extensions;

use crate::services::auth::ValidatedToken;
use crate::services::provider::IdentityProvider;

#[derive(Clone)]
pub struct ProviderHandoff {
    provider: Arc<dyn IdentityProvider>,
    token: ValidatedToken,
}

impl std::fmt::Debug for ProviderHandoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandoff")
            .field("provider", &self.provider.provider_name())
            .field("token", &self.token)
            .finish()
    }
}

impl ProviderHandoff {
    pub fn new(provider: Arc<dyn IdentityProvider>, token: ValidatedToken) -> Self {
        Self { provider, token }
    }

    pub fn attach(self, extensions: &mut Extensions) {
        extensions.insert(self);
    }

    /// Remove the handoff from the request, leaving the slot empty.
    pub fn take(extensions: &mut Extensions) -> Option<Self> {
        extensions.remove::<Self>()
    }

    pub fn is_attached(extensions: &Extensions) -> bool {
        extensions.get::<Self>().is_some()
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    pub fn token(&self) -> &ValidatedToken {
        &self.token
    }
}
