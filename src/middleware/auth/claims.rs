//! ProviderHandoff → ClaimSet
//!
//! access middleware の後ろで動く。handoff を extensions から取り出し (= 消し)、
//! provider から roles / scope / userinfo を取って ClaimSet として付ける。
//! handoff が無い (exempt・匿名) リクエストは何もせず next へ。

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::handoff::ProviderHandoff;
use crate::services::auth::AuthError;
use crate::services::claims;

pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(claims_middleware))
}

async fn claims_middleware(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let Some(handoff) = ProviderHandoff::take(req.extensions_mut()) else {
        return Ok(next.run(req).await);
    };

    let claim_set = claims::fetch(handoff.provider(), handoff.token())
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "failed to fetch claims from identity provider");
            AppError::from(AuthError::ProviderUnavailable(err))
        })?;

    // the handler never sees the provider handle or the raw token
    drop(handoff);
    req.extensions_mut().insert(claim_set);

    Ok(next.run(req).await)
}
