use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{query_as, query_scalar};

use crate::domain::RepositoryError;
use crate::domain::ids::{BookId, TrackedBookId, UserId};
use crate::domain::repositories::TrackedBookRepository;
use crate::domain::tracked_books::{
    FinishedBook, NewTrackedBook, TrackedBook, TrackingStatus, UpdateTrackedBook,
};
use crate::infrastructure::database::DatabasePool;

#[derive(sqlx::FromRow)]
struct TrackedBookRecord {
    id: i64,
    user_id: i64,
    book_id: i64,
    status: String,
    rating: Option<i32>,
    current_page: Option<i32>,
    read_on: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TrackedBookRecord {
    fn into_domain(self) -> Result<TrackedBook, RepositoryError> {
        let status = TrackingStatus::from_str(&self.status).map_err(|()| {
            RepositoryError::unexpected(format!("invalid tracking status: {}", self.status))
        })?;

        Ok(TrackedBook {
            id: TrackedBookId::new(self.id),
            user_id: UserId::new(self.user_id),
            book_id: BookId::new(self.book_id),
            status,
            rating: self.rating,
            current_page: self.current_page,
            read_on: self.read_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FinishedBookRecord {
    read_on: Option<NaiveDate>,
    pages: Option<i32>,
    genre: Option<String>,
    rating: Option<i32>,
}

fn db_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::unexpected(err.to_string())
}

const TRACKED_BOOK_COLUMNS: &str =
    "id, user_id, book_id, status, rating, current_page, read_on, created_at, updated_at";

#[derive(Clone)]
pub struct SqlTrackedBookRepository {
    pool: DatabasePool,
}

impl SqlTrackedBookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackedBookRepository for SqlTrackedBookRepository {
    async fn insert(&self, tracked: NewTrackedBook) -> Result<TrackedBook, RepositoryError> {
        let record = query_as::<_, TrackedBookRecord>(&format!(
            "INSERT INTO tracked_books (user_id, book_id, status, rating, current_page, read_on) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {TRACKED_BOOK_COLUMNS}"
        ))
        .bind(tracked.user_id.into_inner())
        .bind(tracked.book_id.into_inner())
        .bind(tracked.status.as_str())
        .bind(tracked.rating)
        .bind(tracked.current_page)
        .bind(tracked.read_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(database_err) = &err {
                if database_err.is_unique_violation() {
                    return RepositoryError::conflict("this book is already in the library");
                }
            }
            db_err(err)
        })?;

        record.into_domain()
    }

    async fn get(&self, id: TrackedBookId) -> Result<TrackedBook, RepositoryError> {
        let record = query_as::<_, TrackedBookRecord>(&format!(
            "SELECT {TRACKED_BOOK_COLUMNS} FROM tracked_books WHERE id = ?"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        record.into_domain()
    }

    async fn update(
        &self,
        id: TrackedBookId,
        changes: UpdateTrackedBook,
    ) -> Result<TrackedBook, RepositoryError> {
        let existing = self.get(id).await?;

        let status = changes.status.unwrap_or(existing.status);
        let rating = changes.rating.or(existing.rating);
        let current_page = changes.current_page.or(existing.current_page);
        let read_on = changes.read_on.or(existing.read_on);

        let record = query_as::<_, TrackedBookRecord>(&format!(
            "UPDATE tracked_books \
             SET status = ?, rating = ?, current_page = ?, read_on = ?, \
                 updated_at = datetime('now') \
             WHERE id = ? \
             RETURNING {TRACKED_BOOK_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(rating)
        .bind(current_page)
        .bind(read_on)
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        record.into_domain()
    }

    async fn delete(&self, id: TrackedBookId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM tracked_books WHERE id = ?")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn find_finished(&self, user_id: UserId) -> Result<Vec<FinishedBook>, RepositoryError> {
        let records: Vec<FinishedBookRecord> = query_as(
            r"SELECT tb.read_on, b.pages, b.genre, tb.rating
               FROM tracked_books tb
               JOIN books b ON b.id = tb.book_id
               WHERE tb.user_id = ? AND tb.status = 'finished'
               ORDER BY tb.id",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(records
            .into_iter()
            .map(|r| FinishedBook {
                read_on: r.read_on,
                pages: r.pages,
                genre: r.genre,
                rating: r.rating,
            })
            .collect())
    }

    async fn count_by_status(
        &self,
        user_id: UserId,
        status: TrackingStatus,
    ) -> Result<u64, RepositoryError> {
        let count: i64 = query_scalar(
            r"SELECT COUNT(*) FROM tracked_books WHERE user_id = ? AND status = ?",
        )
        .bind(user_id.into_inner())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(count as u64)
    }
}
