//! Bearer-token gate for axum services backed by a Keycloak realm.
//!
//! Requests pass through an ordered pipeline: exempt paths, header presence,
//! header shape, provider activity check, local identity lookup, and finally
//! claim enrichment. See `middleware::auth` for how the stages are layered.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
