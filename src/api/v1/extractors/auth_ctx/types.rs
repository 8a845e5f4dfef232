/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証・provider 呼び出しは middleware/services 側の責務
 * - raw token はここに載せない (ClaimSet 取得後に破棄される)
 */
use chrono::{DateTime, Utc};

use crate::repos::Principal;
use crate::services::auth::ValidatedToken;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `principal` はローカルのユーザー (Keycloak の `sub` で引いたもの)
/// - `subject` は provider 側のユーザーID
/// - roles / scopes / profile は別 extension の `ClaimSet` に入る
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal: Principal,
    pub subject: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthCtx {
    pub fn new(principal: Principal, token: &ValidatedToken) -> Self {
        Self {
            principal,
            subject: token.subject().to_string(),
            expires_at: token.expires_at(),
        }
    }
}
