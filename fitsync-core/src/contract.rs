#![allow(unused)]

//! # contract: shared data model and seam traits for the import pipeline
//!
//! This module defines the canonical per-day record ([`Entry`]), the partial
//! updates each feed produces ([`EntryUpdate`]), the error taxonomy of the
//! pipeline, and the traits at every seam: authentication, the two upstream
//! feeds, and the entry store.
//!
//! ## Interface & Extensibility
//! - Implement [`EntryStore`] to plug in a concrete storage backend (REST
//!   client, in-memory store, etc.). The contract is a field-level
//!   merge-upsert keyed by date — never a whole-document replace.
//! - Implement [`DietFeed`] / [`WeightFeed`] to swap out an upstream source or
//!   its extraction strategy without touching normalization or storage.
//! - All methods are async, returning results and using boxed error types
//!   where the failure is opaque to the pipeline (store errors).
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::{automock, predicate::*};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Inclusive calendar range parameterizing both feed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Construct a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if start > end {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::fmt::Display for InvalidDateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date range: {} is after {}", self.start, self.end)
    }
}

impl std::error::Error for InvalidDateRange {}

/// The canonical per-day record. At most one stored Entry exists per date.
///
/// All non-key fields are independently optional: the diet feed and the weight
/// feed populate disjoint subsets and are merged, not replaced. `net_calories`
/// is stored as reported by upstream, never recomputed locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_consumed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_calories: Option<f64>,
}

impl Entry {
    /// An entry with the given key and no fields set yet.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            weight: None,
            calorie_goal: None,
            calories_consumed: None,
            calories_burned: None,
            net_calories: None,
        }
    }

    /// Apply an update field-by-field: exactly the fields present in `update`
    /// are set, all others are left untouched.
    pub fn apply(&mut self, update: &EntryUpdate) {
        if let Some(w) = update.weight {
            self.weight = Some(w);
        }
        if let Some(g) = update.calorie_goal {
            self.calorie_goal = Some(g);
        }
        if let Some(c) = update.calories_consumed {
            self.calories_consumed = Some(c);
        }
        if let Some(b) = update.calories_burned {
            self.calories_burned = Some(b);
        }
        if let Some(n) = update.net_calories {
            self.net_calories = Some(n);
        }
    }
}

/// One feed's contribution to one day's Entry: a date plus a non-empty subset
/// of the entry fields. Never persisted directly — always merged via
/// [`EntryStore::merge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_consumed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_calories: Option<f64>,
}

impl EntryUpdate {
    /// A diet-feed update: all four calorie fields, no weight.
    pub fn diet(
        date: NaiveDate,
        calorie_goal: f64,
        calories_consumed: f64,
        calories_burned: f64,
        net_calories: f64,
    ) -> Self {
        Self {
            date,
            weight: None,
            calorie_goal: Some(calorie_goal),
            calories_consumed: Some(calories_consumed),
            calories_burned: Some(calories_burned),
            net_calories: Some(net_calories),
        }
    }

    /// A weight-feed update: weight only.
    pub fn weight(date: NaiveDate, weight: f64) -> Self {
        Self {
            date,
            weight: Some(weight),
            calorie_goal: None,
            calories_consumed: None,
            calories_burned: None,
            net_calories: None,
        }
    }
}

/// What one feed produced for a run: the updates to merge plus data-quality
/// counters surfaced in the final report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub updates: Vec<EntryUpdate>,
    /// Rows/records that could not be parsed at all and were skipped.
    pub skipped: usize,
    /// Numeric fields that failed to parse and were stored as zero.
    pub defaulted_fields: usize,
}

/// Login exchange failure. Fatal to the run: no feed request can proceed
/// without a session.
#[derive(Debug)]
pub enum AuthError {
    /// The login request itself failed (connect, timeout, TLS, ...).
    Request(reqwest::Error),
    /// The upstream answered with a non-success status.
    Status(reqwest::StatusCode),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Request(e) => write!(f, "login request failed: {e}"),
            AuthError::Status(s) => write!(f, "login rejected with status {s}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Request(e) => Some(e),
            AuthError::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Request(e)
    }
}

/// Network/transport failure for a single feed. Reported per feed; does not
/// abort the sibling feed's import. Request timeouts surface here as well.
#[derive(Debug)]
pub enum FeedError {
    /// The request failed in transit or while reading the body.
    Request(reqwest::Error),
    /// The upstream answered with a non-success status.
    Status(reqwest::StatusCode),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Request(e) => write!(f, "feed request failed: {e}"),
            FeedError::Status(s) => write!(f, "feed request returned status {s}"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Request(e) => Some(e),
            FeedError::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Request(e)
    }
}

/// Error type for store implementations (boxed; the backend decides the shape).
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Establishes an authenticated session against the upstream site.
///
/// The returned [`Session`] is the sole carrier of authenticated identity for
/// the run; callers must reuse it for all later feed requests, not recreate it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError>;
}

/// Retrieves and parses the CSV diary export for a date range.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DietFeed: Send + Sync {
    async fn fetch(&self, session: &Session, range: &DateRange) -> Result<FeedBatch, FeedError>;
}

/// Retrieves the weight-history page and extracts the embedded weight records
/// for a date range. An absent embedded array yields an empty batch, not an
/// error.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait WeightFeed: Send + Sync {
    async fn fetch(&self, session: &Session, range: &DateRange) -> Result<FeedBatch, FeedError>;
}

/// Merge-upsert interface over persistent storage, keyed by date.
///
/// `merge` must be field-scoped: if no Entry exists for the update's date, one
/// is created with only the fields present in the update; if one exists,
/// exactly those fields are set and every other stored field is left
/// untouched. Re-applying the same update must produce the same stored state.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn merge(&self, update: &EntryUpdate) -> Result<(), StoreError>;

    /// All stored entries, in no particular order. Consumed by read-side
    /// collaborators outside this pipeline.
    async fn find_all(&self) -> Result<Vec<Entry>, StoreError>;
}
