use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use url::Url;

use crate::config::KeycloakConfig;
use crate::services::provider::{
    IdentityProvider, ProviderError, ProviderResult, TokenIntrospection, UserInfo,
};

/// Keycloak (OpenID Connect) implementation of `IdentityProvider`.
///
/// - Holds one pooled `reqwest::Client`; clone it freely, clones share the pool.
/// - Every call is bounded by the configured timeout; expiry surfaces as `ProviderError::Timeout`.
#[derive(Clone)]
pub struct KeycloakClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    introspect_url: Url,
    userinfo_url: Url,
    realm_url: Url,
}

impl std::fmt::Debug for KeycloakClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the client secret
        f.debug_struct("KeycloakClient")
            .field("client_id", &self.client_id)
            .field("introspect_url", &self.introspect_url.as_str())
            .field("userinfo_url", &self.userinfo_url.as_str())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RealmInfo {
    public_key: String,
}

impl KeycloakClient {
    pub fn new(config: &KeycloakConfig) -> Result<Self, String> {
        let base = Url::parse(config.provider_base_url())
            .map_err(|e| format!("invalid keycloak base url: {}", e))?;

        let realm = config.realm.as_str();
        let realm_url = endpoint(&base, &["realms", realm])?;
        let introspect_url = endpoint(
            &base,
            &["realms", realm, "protocol", "openid-connect", "token", "introspect"],
        )?;
        let userinfo_url = endpoint(
            &base,
            &["realms", realm, "protocol", "openid-connect", "userinfo"],
        )?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| format!("failed to build http client: {}", e))?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            introspect_url,
            userinfo_url,
            realm_url,
        })
    }

    pub fn introspect_url(&self) -> &Url {
        &self.introspect_url
    }

    pub fn userinfo_url(&self) -> &Url {
        &self.userinfo_url
    }

    /// Realm public key (base64 DER), used to verify tokens locally.
    pub async fn realm_public_key(&self) -> ProviderResult<String> {
        let response = self.http.get(self.realm_url.clone()).send().await?;
        let realm: RealmInfo = ensure_success(response)?.json().await?;
        Ok(realm.public_key)
    }

    // An inactive token carries no roles or scope; report it instead of empty lists.
    async fn active_introspection(&self, token: &str) -> ProviderResult<TokenIntrospection> {
        let info = self.introspect(token).await?;
        if !info.active {
            return Err(ProviderError::InactiveToken);
        }
        Ok(info)
    }
}

// Append path segments to `base`, tolerating a trailing slash on it.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| format!("keycloak url cannot be a base: {}", base))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

fn ensure_success(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ProviderError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl IdentityProvider for KeycloakClient {
    fn provider_name(&self) -> &'static str {
        "keycloak"
    }

    async fn introspect(&self, token: &str) -> ProviderResult<TokenIntrospection> {
        let form = [
            ("token", token),
            ("token_type_hint", "access_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.introspect_url.clone())
            .form(&form)
            .send()
            .await?;

        let info = ensure_success(response)?.json::<TokenIntrospection>().await?;
        Ok(info)
    }

    async fn user_info(&self, token: &str) -> ProviderResult<UserInfo> {
        let response = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        let info = ensure_success(response)?.json::<UserInfo>().await?;
        Ok(info)
    }

    async fn client_roles(&self, token: &str) -> ProviderResult<Vec<String>> {
        Ok(self.active_introspection(token).await?.client_roles(&self.client_id))
    }

    async fn realm_roles(&self, token: &str) -> ProviderResult<Vec<String>> {
        Ok(self.active_introspection(token).await?.realm_roles())
    }

    async fn client_scope(&self, token: &str) -> ProviderResult<Vec<String>> {
        Ok(self.active_introspection(token).await?.scopes())
    }
}
