use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::BookId;
use crate::domain::repositories::BookRepository;
use crate::infrastructure::database::DatabasePool;

#[derive(sqlx::FromRow)]
struct BookRecord {
    id: i64,
    title: String,
    isbn: Option<String>,
    pages: Option<i32>,
    genre: Option<String>,
    created_at: DateTime<Utc>,
}

impl BookRecord {
    fn into_domain(self) -> Book {
        Book {
            id: BookId::new(self.id),
            title: self.title,
            isbn: self.isbn,
            pages: self.pages,
            genre: self.genre,
            created_at: self.created_at,
        }
    }
}

fn db_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::unexpected(err.to_string())
}

#[derive(Clone)]
pub struct SqlBookRepository {
    pool: DatabasePool,
}

impl SqlBookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError> {
        let record = query_as::<_, BookRecord>(
            r"INSERT INTO books (title, isbn, pages, genre)
               VALUES (?, ?, ?, ?)
               RETURNING id, title, isbn, pages, genre, created_at",
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.pages)
        .bind(&book.genre)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(database_err) = &err {
                if database_err.is_unique_violation() {
                    return RepositoryError::conflict("a book with this ISBN already exists");
                }
            }
            db_err(err)
        })?;

        Ok(record.into_domain())
    }

    async fn get(&self, id: BookId) -> Result<Book, RepositoryError> {
        let record = query_as::<_, BookRecord>(
            r"SELECT id, title, isbn, pages, genre, created_at FROM books WHERE id = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(record.into_domain())
    }
}
