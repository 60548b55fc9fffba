use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{NewUser, User};
use crate::infrastructure::database::DatabasePool;

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    uuid: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn into_domain(self) -> User {
        User {
            id: UserId::new(self.id),
            username: self.username,
            uuid: self.uuid,
            created_at: self.created_at,
        }
    }
}

fn db_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::unexpected(err.to_string())
}

#[derive(Clone)]
pub struct SqlUserRepository {
    pool: DatabasePool,
}

impl SqlUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            r"INSERT INTO users (username, uuid)
               VALUES (?, ?)
               RETURNING id, username, uuid, created_at",
        )
        .bind(&user.username)
        .bind(&user.uuid)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(database_err) = &err {
                if database_err.is_unique_violation() {
                    return RepositoryError::conflict("username is already taken");
                }
            }
            db_err(err)
        })?;

        Ok(record.into_domain())
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            r"SELECT id, username, uuid, created_at FROM users WHERE id = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(record.into_domain())
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            r"SELECT id, username, uuid, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(record.into_domain())
    }
}
