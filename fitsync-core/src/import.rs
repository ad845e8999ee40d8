//! High-level pipeline: authenticate → fetch both feeds → merge into the store.
//!
//! This module provides the top-level orchestration for one import run over a
//! date range:
//!   - Authenticates once against the upstream site, producing the [`Session`]
//!     every later request rides on
//!   - Fetches the diet CSV export and the weight page concurrently (both
//!     depend only on the session, not on each other)
//!   - Merges each feed's updates into the store sequentially from this task,
//!     so merges for the same date can never race
//!   - Aggregates a per-feed report of what was merged, skipped and defaulted
//!
//! # Error Handling
//! Authentication failure is the only run-fatal error: no feed request can
//! proceed without a session, so [`import`] returns `Err` before any fetch.
//! A failed feed fetch or merge is recorded in that feed's [`FeedOutcome`]
//! and never prevents the sibling feed's import — these are two unrelated
//! upstream endpoints, and partial success beats all-or-nothing failure.
//!
//! # Idempotence
//! Re-running the same range is the expected operating mode. All writes go
//! through [`EntryStore::merge`], whose field-scoped upsert makes repeated
//! application of the same updates converge on the same stored state.

use tracing::{error, info};

use crate::config::ImportConfig;
use crate::contract::{
    AuthError, Authenticator, DietFeed, EntryStore, FeedBatch, FeedError, StoreError, WeightFeed,
};

/// Result of one import run: both feed outcomes, reported independently.
#[derive(Debug)]
pub struct ImportReport {
    pub diet: FeedOutcome,
    pub weight: FeedOutcome,
}

impl ImportReport {
    /// True when both feeds fetched and merged without error.
    pub fn is_complete(&self) -> bool {
        matches!(self.diet, FeedOutcome::Imported(_)) && matches!(self.weight, FeedOutcome::Imported(_))
    }
}

/// What happened to a single feed during the run.
#[derive(Debug)]
pub enum FeedOutcome {
    Imported(FeedSummary),
    Failed(FeedFailure),
}

/// Counters for a successfully imported feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSummary {
    /// Updates merged into the store.
    pub merged: usize,
    /// Rows/records skipped as unparsable.
    pub skipped: usize,
    /// Numeric fields defaulted to zero.
    pub defaulted_fields: usize,
}

/// Why a feed's import did not complete.
#[derive(Debug)]
pub enum FeedFailure {
    /// The network exchange with the upstream feed failed.
    Fetch(FeedError),
    /// A merge into the store failed; merges already applied remain in place.
    Store(StoreError),
}

impl std::fmt::Display for FeedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedFailure::Fetch(e) => write!(f, "feed fetch failed: {e}"),
            FeedFailure::Store(e) => write!(f, "store merge failed: {e}"),
        }
    }
}

/// Run one import: authenticate, fetch both feeds concurrently, merge both
/// batches. Returns `Err` only when authentication fails.
pub async fn import<A, D, W, S>(
    config: &ImportConfig,
    authenticator: &A,
    diet: &D,
    weight: &W,
    store: &S,
) -> Result<ImportReport, AuthError>
where
    A: Authenticator,
    D: DietFeed,
    W: WeightFeed,
    S: EntryStore,
{
    info!(
        username = %config.username,
        start = %config.range.start,
        end = %config.range.end,
        "Starting import run"
    );

    let session = match authenticator
        .authenticate(&config.username, &config.password)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Authentication failed, aborting run before any fetch");
            return Err(e);
        }
    };
    info!("Authenticated, session established for this run");

    // Both fetches ride on the same session and are independent of each other.
    let (diet_result, weight_result) = tokio::join!(
        diet.fetch(&session, &config.range),
        weight.fetch(&session, &config.range),
    );

    // Merges run sequentially from this task; concurrent fetches never write.
    let diet_outcome = merge_feed("diet", diet_result, store).await;
    let weight_outcome = merge_feed("weight", weight_result, store).await;

    let report = ImportReport {
        diet: diet_outcome,
        weight: weight_outcome,
    };
    info!(complete = report.is_complete(), ?report, "Import run finished");
    Ok(report)
}

async fn merge_feed<S>(
    feed: &'static str,
    fetched: Result<FeedBatch, FeedError>,
    store: &S,
) -> FeedOutcome
where
    S: EntryStore,
{
    let batch = match fetched {
        Ok(batch) => batch,
        Err(e) => {
            error!(feed, error = %e, "Feed fetch failed; sibling feed is unaffected");
            return FeedOutcome::Failed(FeedFailure::Fetch(e));
        }
    };

    let mut merged = 0usize;
    for update in &batch.updates {
        if let Err(e) = store.merge(update).await {
            error!(feed, date = %update.date, error = %e, merged, "Merge into store failed");
            return FeedOutcome::Failed(FeedFailure::Store(e));
        }
        merged += 1;
    }

    info!(
        feed,
        merged,
        skipped = batch.skipped,
        defaulted_fields = batch.defaulted_fields,
        "Feed merged into store"
    );
    FeedOutcome::Imported(FeedSummary {
        merged,
        skipped: batch.skipped,
        defaulted_fields: batch.defaulted_fields,
    })
}
