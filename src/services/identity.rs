//! Provider subject → local principal.
use std::sync::Arc;

use crate::repos::{IdentityStore, Principal};
use crate::services::auth::AuthError;

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// A missing row is `UnknownPrincipal`, not an authentication failure:
    /// the token was valid, only the local mirror of the user is absent.
    pub async fn resolve(&self, subject: &str) -> Result<Principal, AuthError> {
        self.store
            .find_by_subject(subject)
            .await?
            .ok_or_else(|| AuthError::UnknownPrincipal {
                subject: subject.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockIdentityStore, principal};

    #[tokio::test]
    async fn known_subject_resolves_to_its_principal() {
        let store = Arc::new(MockIdentityStore::with(principal("kc-1", "ann")));
        let resolver = IdentityResolver::new(store.clone());

        let found = resolver.resolve("kc-1").await.unwrap();

        assert_eq!(found.user_name, "ann");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_subject_is_its_own_error() {
        let resolver = IdentityResolver::new(Arc::new(MockIdentityStore::empty()));

        let err = resolver.resolve("kc-404").await.unwrap_err();

        assert!(matches!(err, AuthError::UnknownPrincipal { subject } if subject == "kc-404"));
    }

    #[tokio::test]
    async fn store_failure_is_not_reported_as_unknown_user() {
        let resolver = IdentityResolver::new(Arc::new(MockIdentityStore::failing()));

        let err = resolver.resolve("kc-1").await.unwrap_err();

        assert!(matches!(err, AuthError::IdentityStore(_)));
    }
}
