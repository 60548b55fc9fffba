use serde::{Deserialize, Serialize};

/// One month bucket, keyed by a `YYYY-MM` period string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub period: String,
    pub count: u64,
}

/// One year bucket, keyed by a `YYYY` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u64,
}

/// Aggregated reading report for a single user.
///
/// Month and year buckets are sorted ascending by their period string and
/// only cover finished records that carry a read date; the totals cover all
/// finished records. `favorite_genres` is ranked by count, capped at ten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadingStats {
    pub books_by_month: Vec<MonthCount>,
    pub books_by_year: Vec<YearCount>,
    pub favorite_genres: Vec<GenreCount>,
    pub total_pages: i64,
    pub total_read_books: u64,
    pub total_want_to_read: u64,
    pub total_reading: u64,
    pub avg_pages_per_book: i64,
    pub average_rating: Option<f64>,
}
