use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Datelike;
use tracing::info;

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::TrackedBookRepository;
use crate::domain::stats::{GenreCount, MonthCount, ReadingStats, YearCount};
use crate::domain::tracked_books::TrackingStatus;

/// At most this many genres are reported, ranked by finished-book count.
const FAVORITE_GENRE_LIMIT: usize = 10;

/// Aggregate one user's tracked books into a reading report.
///
/// A single pass over the finished records fills the month/year buckets,
/// genre ranking, page total, and rating average; the want-to-read and
/// reading totals come from two independent counts. Finished records without
/// a read date count toward the totals but not the month/year buckets.
pub async fn compute_reading_stats(
    repo: &dyn TrackedBookRepository,
    user_id: UserId,
) -> Result<ReadingStats, RepositoryError> {
    let start = Instant::now();

    let finished = repo.find_finished(user_id).await?;

    // BTreeMap keys give the ascending lexicographic period ordering.
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    let mut years: BTreeMap<String, u64> = BTreeMap::new();
    let mut genres: Vec<GenreCount> = Vec::new();
    let mut total_pages: i64 = 0;
    let mut rating_sum: i64 = 0;
    let mut rated_count: u64 = 0;

    for record in &finished {
        if let Some(date) = record.read_on {
            let year = format!("{:04}", date.year());
            let period = format!("{year}-{:02}", date.month());
            *months.entry(period).or_insert(0) += 1;
            *years.entry(year).or_insert(0) += 1;
        }

        if let Some(genre) = &record.genre {
            match genres.iter_mut().find(|entry| entry.genre == *genre) {
                Some(entry) => entry.count += 1,
                None => genres.push(GenreCount {
                    genre: genre.clone(),
                    count: 1,
                }),
            }
        }

        total_pages += i64::from(record.pages.unwrap_or(0));

        if let Some(rating) = record.rating {
            rating_sum += i64::from(rating);
            rated_count += 1;
        }
    }

    // Stable sort: genres with equal counts keep first-encounter order.
    genres.sort_by(|a, b| b.count.cmp(&a.count));
    genres.truncate(FAVORITE_GENRE_LIMIT);

    let (want_to_read, reading) = tokio::join!(
        repo.count_by_status(user_id, TrackingStatus::WantToRead),
        repo.count_by_status(user_id, TrackingStatus::Reading),
    );

    let total_read_books = finished.len() as u64;
    let avg_pages_per_book = if total_read_books > 0 {
        (total_pages as f64 / total_read_books as f64).round() as i64
    } else {
        0
    };
    let average_rating = (rated_count > 0).then(|| rating_sum as f64 / rated_count as f64);

    let stats = ReadingStats {
        books_by_month: months
            .into_iter()
            .map(|(period, count)| MonthCount { period, count })
            .collect(),
        books_by_year: years
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
        favorite_genres: genres,
        total_pages,
        total_read_books,
        total_want_to_read: want_to_read?,
        total_reading: reading?,
        avg_pages_per_book,
        average_rating,
    };

    info!(duration_ms = start.elapsed().as_millis() as u64, %user_id, "reading stats computed");
    Ok(stats)
}
