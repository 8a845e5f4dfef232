/*
 * Responsibility
 * - GET /public/ping: 匿名でも呼べるルート
 * - token が付いていれば通常どおり検証され、ユーザー名を返す
 */
use axum::Json;

use crate::api::v1::{dto::me::PingResponse, extractors::MaybeAuthCtx};

pub async fn ping(MaybeAuthCtx(ctx): MaybeAuthCtx) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        user_name: ctx.map(|c| c.principal.user_name),
    })
}
