/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - provider connection, validator, identity resolver, exempt paths
 * - Built once at startup; Clone is cheap (Arc inside) and nothing in here is per-request
 */
use std::sync::Arc;

use crate::config::AdminRoles;
use crate::services::auth::{ExemptPaths, TokenValidator};
use crate::services::identity::IdentityResolver;
use crate::services::provider::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn IdentityProvider>,
    pub validator: Arc<TokenValidator>,
    pub identity: Arc<IdentityResolver>,
    pub exemptions: Arc<ExemptPaths>,
    pub admin_roles: AdminRoles,
    // default for route groups installed with middleware::auth::apply
    pub allow_anonymous: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider.provider_name())
            .field("validator", &self.validator)
            .field("exemptions", &self.exemptions)
            .field("admin_roles", &self.admin_roles)
            .field("allow_anonymous", &self.allow_anonymous)
            .finish()
    }
}

impl AppState {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        validator: TokenValidator,
        identity: IdentityResolver,
        exemptions: ExemptPaths,
        admin_roles: AdminRoles,
        allow_anonymous: bool,
    ) -> Self {
        Self {
            provider,
            validator: Arc::new(validator),
            identity: Arc::new(identity),
            exemptions: Arc::new(exemptions),
            admin_roles,
            allow_anonymous,
        }
    }
}
