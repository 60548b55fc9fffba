use std::sync::Arc;

use chrono::NaiveDate;
use guildsbook::application::routes::app_router;
use guildsbook::application::state::AppState;
use guildsbook::domain::books::{Book, NewBook};
use guildsbook::domain::ids::{BookId, UserId};
use guildsbook::domain::repositories::{
    BookRepository, TokenRepository, TrackedBookRepository, UserRepository,
};
use guildsbook::domain::tokens::NewToken;
use guildsbook::domain::tracked_books::{NewTrackedBook, TrackedBook, TrackingStatus};
use guildsbook::domain::users::{NewUser, User};
use guildsbook::infrastructure::auth::{generate_token, hash_token};
use guildsbook::infrastructure::database::Database;
use tokio::net::TcpListener;
use tokio::task::AbortHandle;

pub struct TestApp {
    pub address: String,
    pub user_repo: Arc<dyn UserRepository>,
    pub token_repo: Arc<dyn TokenRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub tracked_book_repo: Arc<dyn TrackedBookRepository>,
    /// Bearer token of the default user, when seeded.
    pub auth_token: Option<String>,
    /// The default user, when seeded.
    pub user: Option<User>,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let database = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let state = AppState::from_database(&database);

    // Clone repos we need for seeding before consuming state in the router
    let user_repo = state.user_repo.clone();
    let token_repo = state.token_repo.clone();
    let book_repo = state.book_repo.clone();
    let tracked_book_repo = state.tracked_book_repo.clone();

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{local_addr}");

    let server_handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await
        .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        user_repo,
        token_repo,
        book_repo,
        tracked_book_repo,
        auth_token: None,
        user: None,
        server_handle,
    }
}

/// Spawn an app with a default user ("reader") and a bearer token for them.
pub async fn spawn_app_with_auth() -> TestApp {
    let mut app = spawn_app().await;

    let user = create_user(&app, "reader").await;
    let token = create_token_for(&app, &user).await;

    app.user = Some(user);
    app.auth_token = Some(token);
    app
}

pub async fn create_user(app: &TestApp, username: &str) -> User {
    let uuid = uuid::Uuid::new_v4().to_string();
    app.user_repo
        .insert(NewUser::new(username.to_string(), uuid))
        .await
        .expect("Failed to create user")
}

pub async fn create_token_for(app: &TestApp, user: &User) -> String {
    let token_value = generate_token();
    let token = NewToken::new(user.id, hash_token(&token_value), "test-token".to_string());

    app.token_repo
        .insert(token)
        .await
        .expect("Failed to insert token");

    token_value
}

pub async fn create_book(
    app: &TestApp,
    title: &str,
    pages: Option<i32>,
    genre: Option<&str>,
) -> Book {
    app.book_repo
        .insert(NewBook {
            title: title.to_string(),
            isbn: None,
            pages,
            genre: genre.map(str::to_string),
        })
        .await
        .expect("Failed to create book")
}

/// Track a book as finished, optionally with a read date and rating.
pub async fn track_finished(
    app: &TestApp,
    user_id: UserId,
    book_id: BookId,
    read_on: Option<NaiveDate>,
    rating: Option<i32>,
) -> TrackedBook {
    app.tracked_book_repo
        .insert(NewTrackedBook {
            user_id,
            book_id,
            status: TrackingStatus::Finished,
            rating,
            current_page: None,
            read_on,
        })
        .await
        .expect("Failed to track finished book")
}

pub async fn track_with_status(
    app: &TestApp,
    user_id: UserId,
    book_id: BookId,
    status: TrackingStatus,
) -> TrackedBook {
    app.tracked_book_repo
        .insert(NewTrackedBook {
            user_id,
            book_id,
            status,
            rating: None,
            current_page: None,
            read_on: None,
        })
        .await
        .expect("Failed to track book")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// GET an API path with the app's bearer token and parse the JSON body.
pub async fn get_stats_json(app: &TestApp, path: &str) -> serde_json::Value {
    let response = reqwest::Client::new()
        .get(app.api_url(path))
        .bearer_auth(app.auth_token.as_ref().expect("auth token required"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    response.json().await.expect("Failed to parse JSON")
}
