pub mod books;
pub mod errors;
pub mod ids;
pub mod repositories;
pub mod stats;
pub mod tokens;
pub mod tracked_books;
pub mod users;

// Re-exports
pub use errors::RepositoryError;
