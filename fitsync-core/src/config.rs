use tracing::{debug, info};

use crate::contract::DateRange;

/// Everything one import run needs besides its collaborators: the upstream
/// credentials and the date range to pull. Built by the caller (CLI config
/// loading, tests); never read from globals.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub username: String,
    pub password: String,
    pub range: DateRange,
}

impl ImportConfig {
    pub fn trace_loaded(&self) {
        info!(
            username = %self.username,
            start = %self.range.start,
            end = %self.range.end,
            "Loaded ImportConfig"
        );
        debug!(range = ?self.range, "ImportConfig range (full debug)");
    }
}
