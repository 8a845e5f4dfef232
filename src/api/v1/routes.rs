/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/me は認証必須、/public/ping は匿名可
 * - 認証パイプラインはルートグループ単位で layer する
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, me::me, public::ping};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));
    let public = Router::new().route("/public/ping", get(ping));

    Router::new()
        .route("/health", get(health))
        .merge(middleware::auth::apply(protected, state.clone()))
        .merge(middleware::auth::apply_allow_anonymous(public, state))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AdminRoles;
    use crate::services::auth::{ExemptPaths, SubjectSource, TokenValidator};
    use crate::services::identity::IdentityResolver;
    use crate::services::provider::IdentityProvider;
    use crate::test_support::{MockIdentityStore, MockProvider, principal};

    fn app(provider: MockProvider) -> Router {
        let provider: Arc<dyn IdentityProvider> = Arc::new(provider);
        let state = AppState::new(
            provider.clone(),
            TokenValidator::new(provider, SubjectSource::Introspection),
            IdentityResolver::new(Arc::new(MockIdentityStore::with(principal("kc-1", "ann")))),
            ExemptPaths::default(),
            AdminRoles {
                client: Some("admin".into()),
                realm: None,
            },
            false,
        );

        Router::new()
            .nest("/api/v1", routes(state.clone()))
            .with_state(state)
    }

    async fn get_json(app: Router, path: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let (status, body) = get_json(app(MockProvider::inactive()), "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn me_requires_a_token() {
        let (status, _) = get_json(app(MockProvider::active("kc-1")), "/api/v1/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_user_and_claims() {
        let provider = MockProvider::active("kc-1").with_client_roles(&["admin"]);

        let (status, body) = get_json(app(provider), "/api/v1/me", Some("Bearer abc123")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_name"], "ann");
        assert_eq!(body["subject"], "kc-1");
        assert_eq!(body["is_admin"], true);
        assert_eq!(body["claims"]["client_roles"][0], "admin");
    }

    #[tokio::test]
    async fn public_ping_serves_anonymous_and_authenticated_callers() {
        let (anon_status, anon) =
            get_json(app(MockProvider::active("kc-1")), "/api/v1/public/ping", None).await;
        let (status, authed) = get_json(
            app(MockProvider::active("kc-1")),
            "/api/v1/public/ping",
            Some("Bearer abc123"),
        )
        .await;

        assert_eq!(anon_status, StatusCode::OK);
        assert_eq!(anon["user_name"], Value::Null);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(authed["user_name"], "ann");
    }
}
