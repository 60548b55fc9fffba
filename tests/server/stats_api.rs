use guildsbook::domain::tracked_books::{TrackingStatus, UpdateTrackedBook};
use reqwest::Client;

use crate::helpers::{
    create_book, create_token_for, create_user, date, get_stats_json, spawn_app,
    spawn_app_with_auth, track_finished, track_with_status,
};

#[tokio::test]
async fn stats_require_authentication() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(app.api_url("/stats"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn stats_reject_unknown_token() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(app.api_url("/stats"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn stats_return_zeroed_report_for_new_user() {
    let app = spawn_app_with_auth().await;

    let body = get_stats_json(&app, "/stats").await;

    assert_eq!(body["total_read_books"], 0);
    assert_eq!(body["total_want_to_read"], 0);
    assert_eq!(body["total_reading"], 0);
    assert_eq!(body["total_pages"], 0);
    assert_eq!(body["avg_pages_per_book"], 0);
    assert!(body["average_rating"].is_null());
    assert!(body["books_by_month"].as_array().unwrap().is_empty());
    assert!(body["books_by_year"].as_array().unwrap().is_empty());
    assert!(body["favorite_genres"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stats_reflect_finished_books() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let hobbit = create_book(&app, "The Hobbit", Some(200), Some("Fantasy")).await;
    let lotr = create_book(&app, "The Fellowship", Some(300), Some("Fantasy")).await;
    let essays = create_book(&app, "Collected Essays", Some(100), None).await;

    track_finished(&app, user_id, hobbit.id, Some(date(2023, 1, 15)), None).await;
    track_finished(&app, user_id, lotr.id, Some(date(2023, 1, 20)), None).await;
    track_finished(&app, user_id, essays.id, Some(date(2023, 2, 1)), None).await;

    let body = get_stats_json(&app, "/stats").await;

    assert_eq!(
        body["books_by_month"],
        serde_json::json!([
            { "period": "2023-01", "count": 2 },
            { "period": "2023-02", "count": 1 },
        ])
    );
    assert_eq!(
        body["books_by_year"],
        serde_json::json!([{ "year": "2023", "count": 3 }])
    );
    assert_eq!(
        body["favorite_genres"],
        serde_json::json!([{ "genre": "Fantasy", "count": 2 }])
    );
    assert_eq!(body["total_pages"], 600);
    assert_eq!(body["total_read_books"], 3);
    assert_eq!(body["avg_pages_per_book"], 200);
}

#[tokio::test]
async fn stats_count_statuses_independently() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let wished_one = create_book(&app, "Wished One", None, None).await;
    let wished_two = create_book(&app, "Wished Two", None, None).await;
    let current = create_book(&app, "Current", None, None).await;
    let done = create_book(&app, "Done", Some(80), None).await;

    track_with_status(&app, user_id, wished_one.id, TrackingStatus::WantToRead).await;
    track_with_status(&app, user_id, wished_two.id, TrackingStatus::WantToRead).await;
    track_with_status(&app, user_id, current.id, TrackingStatus::Reading).await;
    track_finished(&app, user_id, done.id, Some(date(2024, 5, 5)), None).await;

    let body = get_stats_json(&app, "/stats").await;

    assert_eq!(body["total_want_to_read"], 2);
    assert_eq!(body["total_reading"], 1);
    assert_eq!(body["total_read_books"], 1);
    // Unfinished records contribute nothing to pages or buckets
    assert_eq!(body["total_pages"], 80);
    assert_eq!(body["books_by_year"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn dateless_finished_record_counts_in_totals_but_not_buckets() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let dated = create_book(&app, "Dated", Some(150), Some("History")).await;
    let legacy = create_book(&app, "Legacy Import", Some(250), Some("History")).await;

    track_finished(&app, user_id, dated.id, Some(date(2022, 6, 1)), None).await;
    track_finished(&app, user_id, legacy.id, None, None).await;

    let body = get_stats_json(&app, "/stats").await;

    assert_eq!(body["total_read_books"], 2);
    assert_eq!(body["total_pages"], 400);
    assert_eq!(
        body["favorite_genres"],
        serde_json::json!([{ "genre": "History", "count": 2 }])
    );
    // Only the dated record reaches the buckets
    assert_eq!(
        body["books_by_year"],
        serde_json::json!([{ "year": "2022", "count": 1 }])
    );
    assert_eq!(body["books_by_month"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn finished_book_without_pages_still_counts() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let paged = create_book(&app, "Paged", Some(321), Some("Sci-Fi")).await;
    let pageless = create_book(&app, "Pageless", None, Some("Sci-Fi")).await;

    track_finished(&app, user_id, paged.id, Some(date(2024, 3, 9)), None).await;
    track_finished(&app, user_id, pageless.id, Some(date(2024, 3, 3)), None).await;

    let body = get_stats_json(&app, "/stats").await;

    assert_eq!(body["total_pages"], 321);
    assert_eq!(body["total_read_books"], 2);
    assert_eq!(
        body["favorite_genres"],
        serde_json::json!([{ "genre": "Sci-Fi", "count": 2 }])
    );
    assert_eq!(body["avg_pages_per_book"], 161);
}

#[tokio::test]
async fn stats_average_ratings_over_rated_records() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let loved = create_book(&app, "Loved", None, None).await;
    let liked = create_book(&app, "Liked", None, None).await;
    let unrated = create_book(&app, "Unrated", None, None).await;

    track_finished(&app, user_id, loved.id, Some(date(2024, 1, 1)), Some(5)).await;
    track_finished(&app, user_id, liked.id, Some(date(2024, 2, 1)), Some(3)).await;
    track_finished(&app, user_id, unrated.id, Some(date(2024, 3, 1)), None).await;

    let body = get_stats_json(&app, "/stats").await;

    let average = body["average_rating"].as_f64().unwrap();
    assert!((average - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn stats_exclude_other_users_records() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let other = create_user(&app, "other").await;
    let shared = create_book(&app, "Shared Book", Some(500), Some("Mystery")).await;
    let mine = create_book(&app, "My Book", Some(100), None).await;

    track_finished(&app, other.id, shared.id, Some(date(2024, 4, 4)), Some(5)).await;
    track_finished(&app, user_id, mine.id, Some(date(2024, 5, 5)), None).await;

    let body = get_stats_json(&app, "/stats").await;

    assert_eq!(body["total_read_books"], 1);
    assert_eq!(body["total_pages"], 100);
    assert!(body["favorite_genres"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn user_stats_visible_to_other_members() {
    let app = spawn_app_with_auth().await;

    let other = create_user(&app, "bookworm").await;
    let novel = create_book(&app, "A Novel", Some(420), Some("Romance")).await;
    track_finished(&app, other.id, novel.id, Some(date(2023, 8, 8)), Some(4)).await;

    let body = get_stats_json(&app, "/users/bookworm/stats").await;

    assert_eq!(body["total_read_books"], 1);
    assert_eq!(body["total_pages"], 420);
    assert_eq!(
        body["favorite_genres"],
        serde_json::json!([{ "genre": "Romance", "count": 1 }])
    );
}

#[tokio::test]
async fn user_stats_return_404_for_unknown_username() {
    let app = spawn_app_with_auth().await;

    let response = Client::new()
        .get(app.api_url("/users/nobody/stats"))
        .bearer_auth(app.auth_token.as_ref().unwrap())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn finishing_a_book_moves_it_between_totals() {
    let app = spawn_app_with_auth().await;
    let user_id = app.user.as_ref().unwrap().id;

    let book = create_book(&app, "In Flight", Some(240), Some("Thriller")).await;
    let tracked = track_with_status(&app, user_id, book.id, TrackingStatus::Reading).await;

    let before = get_stats_json(&app, "/stats").await;
    assert_eq!(before["total_reading"], 1);
    assert_eq!(before["total_read_books"], 0);

    app.tracked_book_repo
        .update(
            tracked.id,
            UpdateTrackedBook {
                status: Some(TrackingStatus::Finished),
                rating: Some(4),
                current_page: None,
                read_on: Some(date(2024, 9, 30)),
            },
        )
        .await
        .expect("Failed to update tracked book");

    let after = get_stats_json(&app, "/stats").await;
    assert_eq!(after["total_reading"], 0);
    assert_eq!(after["total_read_books"], 1);
    assert_eq!(after["total_pages"], 240);
    assert_eq!(
        after["books_by_month"],
        serde_json::json!([{ "period": "2024-09", "count": 1 }])
    );

    // Removing the record from the library empties the report again
    app.tracked_book_repo
        .delete(tracked.id)
        .await
        .expect("Failed to delete tracked book");

    let removed = get_stats_json(&app, "/stats").await;
    assert_eq!(removed["total_read_books"], 0);
    assert_eq!(removed["total_pages"], 0);
}

#[tokio::test]
async fn tokens_are_scoped_to_their_user() {
    let app = spawn_app_with_auth().await;

    let other = create_user(&app, "someone-else").await;
    let other_token = create_token_for(&app, &other).await;

    let book = create_book(&app, "Their Book", Some(90), None).await;
    track_finished(&app, other.id, book.id, Some(date(2024, 1, 2)), None).await;

    let response = Client::new()
        .get(app.api_url("/stats"))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["total_read_books"], 1);
    assert_eq!(body["total_pages"], 90);
}
