/*
 * Responsibility
 * - GET /me: 認証済みユーザーと ClaimSet を返す
 * - 認証パイプライン (access + claims) の内側でのみ使う
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::me::MeResponse,
        extractors::{AuthCtxExtractor, ClaimsExtractor},
    },
    state::AppState,
};

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Json<MeResponse> {
    let is_admin = claims.is_admin(&state.admin_roles);

    Json(MeResponse {
        id: ctx.principal.id,
        user_name: ctx.principal.user_name,
        email: ctx.principal.email.or_else(|| claims.email.clone()),
        subject: ctx.subject,
        token_expires_at: ctx.expires_at,
        is_admin,
        claims,
    })
}
