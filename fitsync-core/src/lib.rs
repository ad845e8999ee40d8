#![doc = "fitsync-core: core import pipeline library for fitsync."]

//! This crate contains the full import pipeline for one person's diet and
//! weight history: session acquisition, the two upstream feed clients, pure
//! normalization into canonical per-day entries, and the merge-upsert store
//! contract. CLI glue, config-file parsing and the concrete remote store
//! client live in the `fitsync` crate.
//!
//! # Usage
//! Wire concrete (or mock) implementations of the traits in [`contract`] into
//! [`import::import`] for one run over a date range.

pub mod config;
pub mod contract;
pub mod feed;
pub mod import;
pub mod normalize;
pub mod session;
pub mod store;
