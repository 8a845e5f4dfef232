/*
 * Responsibility
 * - Look up the local user mirrored from a Keycloak account
 * - Read-only: users are provisioned elsewhere, the gate never creates or updates them
 * - DB errors are returned as RepoError so the resolver can tell them apart from "not found"
 */
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

/// Local user record linked to a provider subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Principal {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "keycloakId")]
    pub keycloak_id: String,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, RepoError> {
        let row = sqlx::query_as::<_, Principal>(
            r#"
            SELECT "userId", "keycloakId", "userName", "email"
            FROM users
            WHERE "keycloakId" = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}
