use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures talking to the identity provider.
///
/// Kept separate from "the token is not active": an outage is an error here,
/// while an inactive token is a successful answer with `active == false`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider request timed out")]
    Timeout,

    #[error("identity provider transport error: {0}")]
    Transport(#[source] reqwest::Error),

    // The token stopped being active after it was validated
    #[error("identity provider reports the token as inactive")]
    InactiveToken,

    #[error("identity provider returned status {status}")]
    Status { status: u16 },

    #[error("identity provider response was not understood: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e)
        }
    }
}
