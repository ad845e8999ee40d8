#![doc = "Entry store integration for the CLI: bridges the core trait abstraction to the REST document store."]
//
//! # Entry Store Client (CLI <-> Core)
//!
//! This module wires up the core [`EntryStore`] trait for real use against the
//! configured document store. The store exposes a collection per database; one
//! entry document per calendar date lives under
//! `{host}/{database}/entries/{date}`.
//!
//! The merge operation sends only the fields present in the update as a JSON
//! Merge Patch body, so a whole-document replacement is impossible from this
//! client — the field-scoped upsert invariant is enforced at the wire.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use fitsync_core::contract::{Entry, EntryStore, EntryUpdate, StoreError};

const ENTRIES_COLLECTION: &str = "entries";
const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";

/// REST client for the entry document store.
pub struct RestStoreClient {
    client: reqwest::Client,
    collection_url: String,
}

impl RestStoreClient {
    pub fn new(host: &str, database: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let collection_url = format!(
            "{}/{}/{}",
            host.trim_end_matches('/'),
            database,
            ENTRIES_COLLECTION
        );
        info!(collection_url = %collection_url, "Initialized entry store client");
        Ok(Self {
            client,
            collection_url,
        })
    }
}

#[async_trait]
impl EntryStore for RestStoreClient {
    async fn merge(&self, update: &EntryUpdate) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.collection_url, update.date);
        debug!(%url, "Merging entry update");

        // EntryUpdate serializes only its present fields, which is exactly
        // the merge-patch document the store expects.
        let body = serde_json::to_vec(update)?;
        self.client
            .patch(&url)
            .header(CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE)
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Entry>, StoreError> {
        debug!(url = %self.collection_url, "Fetching all entries");
        let entries = self
            .client
            .get(&self.collection_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Entry>>()
            .await?;
        info!(count = entries.len(), "Fetched stored entries");
        Ok(entries)
    }
}
