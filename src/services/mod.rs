pub mod auth;
pub mod claims;
pub mod identity;
pub mod provider;
