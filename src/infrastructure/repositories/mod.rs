pub mod books;
pub mod tokens;
pub mod tracked_books;
pub mod users;
