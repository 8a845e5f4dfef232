/*
 * Responsibility
 * - 認証パイプラインの組み立て: access (exempt → header → provider → identity) の後に claims
 * - access と claims は個別に apply もできる。受け渡しは handoff の型だけで行う
 */
use axum::Router;

use crate::state::AppState;

pub mod access;
pub mod claims;
pub mod handoff;

/// Full pipeline with the configured anonymous policy.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // layers wrap from the inside out: claims is added first so access runs first
    access::apply(claims::apply(router), state)
}

/// Full pipeline for a route group that also serves anonymous callers.
pub fn apply_allow_anonymous(router: Router<AppState>, state: AppState) -> Router<AppState> {
    access::apply_with_policy(claims::apply(router), state, true)
}
