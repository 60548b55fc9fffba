use std::sync::Arc;

use crate::domain::repositories::{
    BookRepository, TokenRepository, TrackedBookRepository, UserRepository,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::books::SqlBookRepository;
use crate::infrastructure::repositories::tokens::SqlTokenRepository;
use crate::infrastructure::repositories::tracked_books::SqlTrackedBookRepository;
use crate::infrastructure::repositories::users::SqlUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub token_repo: Arc<dyn TokenRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub tracked_book_repo: Arc<dyn TrackedBookRepository>,
}

impl AppState {
    /// Build the application state from a database connection, creating all
    /// repositories internally.
    pub fn from_database(database: &Database) -> Self {
        let pool = database.clone_pool();

        Self {
            user_repo: Arc::new(SqlUserRepository::new(pool.clone())),
            token_repo: Arc::new(SqlTokenRepository::new(pool.clone())),
            book_repo: Arc::new(SqlBookRepository::new(pool.clone())),
            tracked_book_repo: Arc::new(SqlTrackedBookRepository::new(pool)),
        }
    }
}
