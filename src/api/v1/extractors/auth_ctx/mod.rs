/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（AuthCtx, ClaimSet）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor / MaybeAuthCtx / ClaimsExtractor
 */

mod core;
mod types;

pub use core::{AuthCtxExtractor, ClaimsExtractor, MaybeAuthCtx};
pub use types::AuthCtx;
