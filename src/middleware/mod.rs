/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証パイプライン (access → claims)
 * - http: request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
