//! Shared domain types for the Forecourt dealership catalog.
//!
//! This crate holds the pure data model: listing records and the operator
//! form input they are validated from, gallery image records, and the fixed
//! filter vocabulary used by the catalog search. It performs no I/O.

pub mod error;
pub mod filters;
pub mod image;
pub mod listing;

pub use error::ValidationError;
pub use filters::{PriceBand, SearchFilters, YearBand};
pub use image::{ListingImage, NewImage};
pub use listing::{Listing, ListingFields, ListingForm};
