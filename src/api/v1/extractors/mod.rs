/*
 * Responsibility
 * - handler 向け extractor の公開インターフェース (re-export)
 */
pub mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor, ClaimsExtractor, MaybeAuthCtx};
