//! In-crate doubles for the identity provider and identity store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{AdminRoles, KeycloakConfig};
use crate::repos::error::RepoError;
use crate::repos::{IdentityStore, Principal};
use crate::services::provider::{
    IdentityProvider, ProviderError, ProviderResult, TokenIntrospection, UserInfo,
};

pub fn keycloak_config(server_url: &str) -> KeycloakConfig {
    KeycloakConfig {
        server_url: server_url.to_string(),
        internal_url: None,
        realm: "acme".to_string(),
        client_id: "backend".to_string(),
        client_secret: "s3cr3t".to_string(),
        exempt_uris: Vec::new(),
        decode_token: false,
        realm_public_key: None,
        allow_anonymous: false,
        timeout_seconds: 5,
        admin_roles: AdminRoles::default(),
    }
}

pub fn principal(subject: &str, user_name: &str) -> Principal {
    Principal {
        id: Uuid::new_v4(),
        keycloak_id: subject.to_string(),
        user_name: user_name.to_string(),
        email: None,
    }
}

// ProviderError is not Clone, so the mock keeps a recipe and builds a fresh error per call.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Timeout,
    Status(u16),
}

impl Failure {
    fn from_error(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => Self::Timeout,
            ProviderError::Status { status } => Self::Status(status),
            _ => Self::Status(500),
        }
    }

    fn to_error(self) -> ProviderError {
        match self {
            Self::Timeout => ProviderError::Timeout,
            Self::Status(status) => ProviderError::Status { status },
        }
    }
}

/// Scripted `IdentityProvider` that records every call.
#[derive(Debug)]
pub struct MockProvider {
    active: bool,
    subject: Option<String>,
    exp: Option<i64>,
    introspection_failure: Option<Failure>,
    claims_failure: Option<Failure>,

    user_info: UserInfo,
    client_roles: Vec<String>,
    realm_roles: Vec<String>,
    scopes: Vec<String>,

    calls: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl MockProvider {
    fn base(active: bool, subject: Option<String>) -> Self {
        Self {
            active,
            subject,
            exp: None,
            introspection_failure: None,
            claims_failure: None,
            user_info: UserInfo::default(),
            client_roles: Vec::new(),
            realm_roles: Vec::new(),
            scopes: Vec::new(),
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn active(subject: &str) -> Self {
        Self::base(true, Some(subject.to_string()))
    }

    pub fn inactive() -> Self {
        Self::base(false, None)
    }

    pub fn failing(err: ProviderError) -> Self {
        let mut mock = Self::base(true, Some("unused".to_string()));
        mock.introspection_failure = Some(Failure::from_error(err));
        mock
    }

    pub fn with_exp(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    pub fn with_user_info(mut self, info: UserInfo) -> Self {
        self.user_info = info;
        self
    }

    pub fn with_client_roles(mut self, roles: &[&str]) -> Self {
        self.client_roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_realm_roles(mut self, roles: &[&str]) -> Self {
        self.realm_roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_claims_failure(mut self, err: ProviderError) -> Self {
        self.claims_failure = Some(Failure::from_error(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn record(&self, token: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());
    }

    fn claim<T: Clone>(&self, token: &str, value: &T) -> ProviderResult<T> {
        self.record(token);
        match self.claims_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(value.clone()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn introspect(&self, token: &str) -> ProviderResult<TokenIntrospection> {
        self.record(token);
        if let Some(failure) = self.introspection_failure {
            return Err(failure.to_error());
        }

        Ok(TokenIntrospection {
            active: self.active,
            sub: self.subject.clone(),
            exp: self.exp,
            ..Default::default()
        })
    }

    async fn user_info(&self, token: &str) -> ProviderResult<UserInfo> {
        self.claim(token, &self.user_info)
    }

    async fn client_roles(&self, token: &str) -> ProviderResult<Vec<String>> {
        self.claim(token, &self.client_roles)
    }

    async fn realm_roles(&self, token: &str) -> ProviderResult<Vec<String>> {
        self.claim(token, &self.realm_roles)
    }

    async fn client_scope(&self, token: &str) -> ProviderResult<Vec<String>> {
        self.claim(token, &self.scopes)
    }
}

/// In-memory `IdentityStore` that counts lookups.
#[derive(Debug, Default)]
pub struct MockIdentityStore {
    users: HashMap<String, Principal>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockIdentityStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(principal: Principal) -> Self {
        let mut store = Self::default();
        store.users.insert(principal.keycloak_id.clone(), principal);
        store
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityStore for MockIdentityStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.users.get(subject).cloned())
    }
}
