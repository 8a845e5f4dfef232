//! Identity provider interface used by the authentication pipeline.
use async_trait::async_trait;

pub mod error;
pub mod keycloak;
pub mod types;

pub use error::{ProviderError, ProviderResult};
pub use keycloak::KeycloakClient;
pub use types::{TokenIntrospection, UserInfo};

/// Operations the gate needs from the identity provider.
///
/// One instance is built at startup and shared by every in-flight request, so
/// implementations must not keep per-request state and must be safe to call
/// concurrently.
///
/// Every method is fail-closed: a provider problem is an `Err`, never an empty
/// but successful value.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    // Returns the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    async fn introspect(&self, token: &str) -> ProviderResult<TokenIntrospection>;

    async fn user_info(&self, token: &str) -> ProviderResult<UserInfo>;

    async fn client_roles(&self, token: &str) -> ProviderResult<Vec<String>>;

    async fn realm_roles(&self, token: &str) -> ProviderResult<Vec<String>>;

    async fn client_scope(&self, token: &str) -> ProviderResult<Vec<String>>;

    /// `true` only when the provider positively reports the token as active.
    ///
    /// Transport errors, timeouts and odd responses all count as inactive.
    async fn is_active(&self, token: &str) -> bool {
        match self.introspect(token).await {
            Ok(info) => info.active,
            Err(err) => {
                tracing::warn!(
                    provider = self.provider_name(),
                    error = %err,
                    "token activity check failed; treating token as inactive"
                );
                false
            }
        }
    }
}
