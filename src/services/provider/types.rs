use std::collections::HashMap;

use serde::Deserialize;

/// Token introspection answer (RFC 7662 plus the Keycloak role claims).
///
/// Only the fields the gate consumes are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenIntrospection {
    pub active: bool,

    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub realm_access: Option<RoleList>,
    #[serde(default)]
    pub resource_access: HashMap<String, RoleList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleList {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TokenIntrospection {
    pub fn client_roles(&self, client_id: &str) -> Vec<String> {
        self.resource_access
            .get(client_id)
            .map(|access| access.roles.clone())
            .unwrap_or_default()
    }

    pub fn realm_roles(&self) -> Vec<String> {
        self.realm_access
            .as_ref()
            .map(|access| access.roles.clone())
            .unwrap_or_default()
    }

    // `scope` is a space-delimited list
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// OpenID Connect userinfo response, limited to the profile fields the gate exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycloak_introspection_payload_is_understood() {
        let body = serde_json::json!({
            "active": true,
            "sub": "5f0c-subject",
            "exp": 1_900_000_000,
            "username": "ann",
            "scope": "openid  profile email",
            "realm_access": { "roles": ["offline_access", "uma_authorization"] },
            "resource_access": {
                "backend": { "roles": ["user", "editor"] },
                "account": { "roles": ["manage-account"] }
            },
            "client_id": "frontend",
            "token_type": "Bearer"
        });

        let info: TokenIntrospection = serde_json::from_value(body).unwrap();

        assert!(info.active);
        assert_eq!(info.sub.as_deref(), Some("5f0c-subject"));
        assert_eq!(info.client_roles("backend"), vec!["user", "editor"]);
        assert_eq!(info.realm_roles(), vec!["offline_access", "uma_authorization"]);
        assert_eq!(info.scopes(), vec!["openid", "profile", "email"]);
    }

    #[test]
    fn inactive_token_carries_no_claims() {
        let info: TokenIntrospection =
            serde_json::from_value(serde_json::json!({ "active": false })).unwrap();

        assert!(!info.active);
        assert!(info.client_roles("backend").is_empty());
        assert!(info.realm_roles().is_empty());
        assert!(info.scopes().is_empty());
    }

    #[test]
    fn missing_active_flag_is_rejected() {
        let res = serde_json::from_value::<TokenIntrospection>(serde_json::json!({ "sub": "x" }));
        assert!(res.is_err());
    }
}
