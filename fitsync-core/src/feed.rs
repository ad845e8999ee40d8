//! Feed clients for the two upstream data sources.
//!
//! Each client issues a single form POST parameterized by the range's
//! month/day/year components, using the cookie-carrying client inside the
//! [`Session`], and hands the response body to [`crate::normalize`]. The
//! embedded-JSON scraping of the weight page is deliberately confined to this
//! module boundary so the extraction strategy can be swapped without touching
//! normalization or storage.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::contract::{DateRange, DietFeed, FeedBatch, FeedError, WeightFeed};
use crate::normalize;
use crate::session::Session;

/// Diet CSV export endpoint; the authenticated username is appended as the
/// final path segment.
pub const DEFAULT_DIET_EXPORT_URL: &str = "http://www.livestrong.com/thedailyplate/diary/csv/";

/// Weight graph page endpoint, whose HTML embeds the weight JSON array.
pub const DEFAULT_WEIGHT_URL: &str = "http://www.livestrong.com/thedailyplate/users/weight/";

fn month(d: NaiveDate) -> String {
    d.format("%m").to_string()
}

fn day(d: NaiveDate) -> String {
    d.format("%d").to_string()
}

fn year(d: NaiveDate) -> String {
    d.format("%Y").to_string()
}

/// Client for the CSV diary export feed.
pub struct DietFeedClient {
    base_url: String,
}

impl DietFeedClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_DIET_EXPORT_URL)
    }

    /// Point the export request at a different host (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for DietFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DietFeed for DietFeedClient {
    async fn fetch(&self, session: &Session, range: &DateRange) -> Result<FeedBatch, FeedError> {
        let endpoint = format!("{}{}", self.base_url, session.username());
        info!(%endpoint, start = %range.start, end = %range.end, "Requesting diet CSV export");

        let response = session
            .client()
            .post(&endpoint)
            .form(&[
                ("start_Month", month(range.start)),
                ("start_Day", day(range.start)),
                ("start_Year", year(range.start)),
                ("end_Month", month(range.end)),
                ("end_Day", day(range.end)),
                ("end_Year", year(range.end)),
                ("ftype", "overview".to_string()),
                ("fltype", "csv".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let batch = normalize::parse_diet_csv(&body);
        if batch.skipped > 0 || batch.defaulted_fields > 0 {
            warn!(
                skipped = batch.skipped,
                defaulted_fields = batch.defaulted_fields,
                "Diet export parsed with data-quality compromises"
            );
        }
        info!(updates = batch.updates.len(), "Diet export parsed");
        Ok(batch)
    }
}

/// Client for the weight-history feed (JSON array embedded in page HTML).
pub struct WeightFeedClient {
    endpoint: String,
}

impl WeightFeedClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_WEIGHT_URL)
    }

    /// Point the weight request at a different host (test servers).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for WeightFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeightFeed for WeightFeedClient {
    async fn fetch(&self, session: &Session, range: &DateRange) -> Result<FeedBatch, FeedError> {
        info!(endpoint = %self.endpoint, start = %range.start, end = %range.end, "Requesting weight history page");

        let response = session
            .client()
            .post(&self.endpoint)
            .form(&[
                ("from_Month", month(range.start)),
                ("from_Day", day(range.start)),
                ("from_Year", year(range.start)),
                ("to_Month", month(range.end)),
                ("to_Day", day(range.end)),
                ("to_Year", year(range.end)),
                ("show_net_cals_plz", String::new()),
                ("refresh", "Refresh".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let batch = normalize::extract_weight_records(&body);
        if batch.skipped > 0 {
            warn!(skipped = batch.skipped, "Weight page parsed with skipped records");
        }
        info!(updates = batch.updates.len(), "Weight history parsed");
        Ok(batch)
    }
}
