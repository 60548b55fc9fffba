use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{BookId, TrackedBookId, UserId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    #[default]
    WantToRead,
    Reading,
    Finished,
}

impl TrackingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::WantToRead => "want_to_read",
            TrackingStatus::Reading => "reading",
            TrackingStatus::Finished => "finished",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            TrackingStatus::WantToRead => "Want to Read",
            TrackingStatus::Reading => "Reading",
            TrackingStatus::Finished => "Finished",
        }
    }
}

impl FromStr for TrackingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "want_to_read" => Ok(TrackingStatus::WantToRead),
            "reading" => Ok(TrackingStatus::Reading),
            "finished" => Ok(TrackingStatus::Finished),
            _ => Err(()),
        }
    }
}

/// A user's association with a book: status, rating, and progress.
///
/// `read_on` is normally set when a record becomes finished, but legacy and
/// manually edited records may leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedBook {
    pub id: TrackedBookId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub status: TrackingStatus,
    pub rating: Option<i32>,
    pub current_page: Option<i32>,
    pub read_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedBook {
    pub user_id: UserId,
    pub book_id: BookId,
    #[serde(default)]
    pub status: TrackingStatus,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub current_page: Option<i32>,
    #[serde(default)]
    pub read_on: Option<NaiveDate>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTrackedBook {
    pub status: Option<TrackingStatus>,
    pub rating: Option<i32>,
    pub current_page: Option<i32>,
    pub read_on: Option<NaiveDate>,
}

/// Projection of a finished record used by the stats aggregator: the read
/// date and rating from the tracked record, pages and genre from the book.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedBook {
    pub read_on: Option<NaiveDate>,
    pub pages: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<i32>,
}
