//! Catalog query and media consistency engine for Forecourt.
//!
//! The core splits into four collaborators: the listing store (vehicle
//! records), the gallery store (per-listing images with a single designated
//! primary), the media uploader (batch transfer to external object storage
//! with independent per-file outcomes), and the pure catalog query builder
//! (optional filters to a bounded, parameterized query pair). The
//! [`catalog`] module composes them into the read/write services consumed by
//! the presentation layer.

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod query;
pub mod storage;
pub mod telemetry;
pub mod uploader;

pub use error::{CatalogError, Result};
