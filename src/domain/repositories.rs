use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::{BookId, TokenId, TrackedBookId, UserId};
use crate::domain::tokens::{NewToken, Token};
use crate::domain::tracked_books::{
    FinishedBook, NewTrackedBook, TrackedBook, TrackingStatus, UpdateTrackedBook,
};
use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;
    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert(&self, token: NewToken) -> Result<Token, RepositoryError>;
    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Token, RepositoryError>;
    async fn update_last_used(&self, id: TokenId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError>;
    async fn get(&self, id: BookId) -> Result<Book, RepositoryError>;
}

#[async_trait]
pub trait TrackedBookRepository: Send + Sync {
    async fn insert(&self, tracked: NewTrackedBook) -> Result<TrackedBook, RepositoryError>;
    async fn get(&self, id: TrackedBookId) -> Result<TrackedBook, RepositoryError>;
    async fn update(
        &self,
        id: TrackedBookId,
        changes: UpdateTrackedBook,
    ) -> Result<TrackedBook, RepositoryError>;
    async fn delete(&self, id: TrackedBookId) -> Result<(), RepositoryError>;
    /// All finished records for the user, each carrying the book's pages and
    /// genre, in insertion order.
    async fn find_finished(&self, user_id: UserId) -> Result<Vec<FinishedBook>, RepositoryError>;
    async fn count_by_status(
        &self,
        user_id: UserId,
        status: TrackingStatus,
    ) -> Result<u64, RepositoryError>;
}
