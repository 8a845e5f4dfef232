/*
 * Responsibility
 * - Assemble the ClaimSet (roles, scopes, profile) for a validated token
 * - All four provider queries run concurrently; any failure fails the whole set
 *   so a partial ClaimSet never reaches a handler
 */
use serde::Serialize;

use crate::config::AdminRoles;
use crate::services::auth::ValidatedToken;
use crate::services::provider::{IdentityProvider, ProviderResult};

/// Identity claims attached to an authenticated request.
///
/// Read-only for handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
    pub client_roles: Vec<String>,
    pub realm_roles: Vec<String>,
    pub client_scope: Vec<String>,

    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

impl ClaimSet {
    pub fn has_client_role(&self, role: &str) -> bool {
        self.client_roles.iter().any(|r| r == role)
    }

    pub fn has_realm_role(&self, role: &str) -> bool {
        self.realm_roles.iter().any(|r| r == role)
    }

    /// Either configured admin role is enough.
    pub fn is_admin(&self, admin: &AdminRoles) -> bool {
        admin
            .client
            .as_deref()
            .is_some_and(|role| self.has_client_role(role))
            || admin
                .realm
                .as_deref()
                .is_some_and(|role| self.has_realm_role(role))
    }
}

/// Fetch the claims for `token` from the provider.
///
/// Accepts only a `ValidatedToken`, so claims are never fetched for a token
/// that did not pass validation.
pub async fn fetch(
    provider: &dyn IdentityProvider,
    token: &ValidatedToken,
) -> ProviderResult<ClaimSet> {
    let access_token = token.access_token();

    let (user_info, client_roles, realm_roles, client_scope) = tokio::try_join!(
        provider.user_info(access_token),
        provider.client_roles(access_token),
        provider.realm_roles(access_token),
        provider.client_scope(access_token),
    )?;

    Ok(ClaimSet {
        client_roles,
        realm_roles,
        client_scope,
        name: user_info.name,
        given_name: user_info.given_name,
        family_name: user_info.family_name,
        username: user_info.preferred_username,
        email: user_info.email,
        email_verified: user_info.email_verified,
    })
}
