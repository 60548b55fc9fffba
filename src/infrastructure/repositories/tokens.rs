use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::ids::{TokenId, UserId};
use crate::domain::repositories::TokenRepository;
use crate::domain::tokens::{NewToken, Token};
use crate::infrastructure::database::DatabasePool;

#[derive(sqlx::FromRow)]
struct TokenRecord {
    id: i64,
    user_id: i64,
    token_hash: String,
    name: String,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
}

impl TokenRecord {
    fn into_domain(self) -> Token {
        Token {
            id: TokenId::new(self.id),
            user_id: UserId::new(self.user_id),
            token_hash: self.token_hash,
            name: self.name,
            created_at: self.created_at,
            revoked_at: self.revoked_at,
            last_used_at: self.last_used_at,
        }
    }
}

fn db_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::unexpected(err.to_string())
}

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, name, created_at, revoked_at, last_used_at";

#[derive(Clone)]
pub struct SqlTokenRepository {
    pool: DatabasePool,
}

impl SqlTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqlTokenRepository {
    async fn insert(&self, token: NewToken) -> Result<Token, RepositoryError> {
        let record = query_as::<_, TokenRecord>(&format!(
            "INSERT INTO tokens (user_id, token_hash, name) VALUES (?, ?, ?) \
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(token.user_id.into_inner())
        .bind(&token.token_hash)
        .bind(&token.name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(record.into_domain())
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Token, RepositoryError> {
        let record = query_as::<_, TokenRecord>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE token_hash = ?"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(record.into_domain())
    }

    async fn update_last_used(&self, id: TokenId) -> Result<(), RepositoryError> {
        sqlx::query(r"UPDATE tokens SET last_used_at = datetime('now') WHERE id = ?")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}
