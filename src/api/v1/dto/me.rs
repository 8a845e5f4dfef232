/*
 * Responsibility
 * - /me, /public/ping のレスポンス DTO
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::claims::ClaimSet;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: Option<String>,
    pub subject: String,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub claims: ClaimSet,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    // None for anonymous callers
    pub user_name: Option<String>,
}
