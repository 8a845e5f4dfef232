/*
 * Responsibility
 * - identity store が上位に伝える失敗の定義
 * - "見つからない" は Ok(None) で返すので、ここには DB 障害だけが来る
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("identity store query failed: {0}")]
    Db(#[from] sqlx::Error),
}
