//! access token 検証 → AuthCtx / ProviderHandoff を extensions に入れる
//!
//! Stages, each of which can end the request:
//! 1. exempt path → そのまま next へ (provider / identity store は呼ばない)
//! 2. `Authorization` なし → 401, ただし匿名許可のルートは AuthCtx なしで next へ
//! 3. `Bearer <token>` の形でない → 401 (ローカルで判定、network なし)
//! 4. provider が active と言わない → 401 (timeout / 障害も同じ扱い)
//! 5. ローカルユーザーを引き、AuthCtx と ProviderHandoff を付けて next へ

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::handoff::ProviderHandoff;
use crate::services::auth::Authentication;
use crate::state::AppState;

#[derive(Clone)]
struct AccessGate {
    state: AppState,
    allow_anonymous: bool,
}

/// ルートグループに access 検証を掛ける。匿名アクセスの可否は `AppState` の既定値に従う。
///
/// 例：
/// ```ignore
/// let me = Router::new().route("/me", get(me));
/// let me = middleware::auth::access::apply(me, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    let allow_anonymous = state.allow_anonymous;
    apply_with_policy(router, state, allow_anonymous)
}

/// `allow_anonymous` を明示して掛ける (ルート単位で匿名アクセスを許すとき)
pub fn apply_with_policy(
    router: Router<AppState>,
    state: AppState,
    allow_anonymous: bool,
) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    let gate = AccessGate {
        state,
        allow_anonymous,
    };
    router.layer(middleware::from_fn_with_state(gate, access_middleware))
}

// nest された Router の中では uri から prefix が外れるので OriginalUri を優先する
fn request_path(req: &Request<Body>) -> &str {
    req.extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path())
        .unwrap_or_else(|| req.uri().path())
}

async fn access_middleware(
    State(gate): State<AccessGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let state = &gate.state;

    if state.exemptions.is_exempt(request_path(&req)) {
        tracing::debug!(path = %request_path(&req), "path exempt from authentication");
        return Ok(next.run(req).await);
    }

    let token = match state.validator.authenticate(req.headers()).await {
        Ok(Authentication::Token(token)) => token,
        Ok(Authentication::Anonymous) if gate.allow_anonymous => {
            return Ok(next.run(req).await);
        }
        Ok(Authentication::Anonymous) => return Err(AppError::NotAuthenticated),
        Err(err) => {
            tracing::warn!(error = %err, "access token rejected");
            return Err(err.into());
        }
    };

    let principal = match state.identity.resolve(token.subject()).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(error = %err, subject = %token.subject(), "identity resolution failed");
            return Err(err.into());
        }
    };

    // middleware → extractor / claims middleware への受け渡し
    req.extensions_mut().insert(AuthCtx::new(principal, &token));
    ProviderHandoff::new(state.provider.clone(), token).attach(req.extensions_mut());

    Ok(next.run(req).await)
}
