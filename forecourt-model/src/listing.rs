use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Years outside this window are assumed to be typos rather than vehicles.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i64> = 1900..=2100;

/// One vehicle-for-sale record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub make: String,
    pub model: String,
    pub price: i64,
    pub mileage: i64,
    pub vin: String,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub features: Option<String>,
    pub video_url: Option<String>,
    pub carfax_url: String,
    pub is_featured: bool,
    pub sold: bool,
}

/// The validated field set of a listing, without a store-assigned id.
///
/// Edits use full-record replace semantics, so both insert and update take
/// the complete set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingFields {
    pub title: String,
    pub year: i64,
    pub make: String,
    pub model: String,
    pub price: i64,
    pub mileage: i64,
    pub vin: String,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub features: Option<String>,
    pub video_url: Option<String>,
    pub carfax_url: String,
    pub is_featured: bool,
    pub sold: bool,
}

/// Operator input exactly as it arrives from a form submission.
///
/// Numeric fields are still text here; [`ListingForm::validate`] is the only
/// path from this shape to [`ListingFields`], so nothing unparsed reaches the
/// store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingForm {
    pub title: String,
    pub year: String,
    pub make: String,
    pub model: String,
    pub price: String,
    pub mileage: String,
    pub vin: String,
    pub engine: String,
    pub transmission: String,
    pub features: String,
    pub video_url: String,
    pub carfax_url: String,
    pub is_featured: bool,
    pub sold: bool,
}

impl ListingForm {
    pub fn validate(&self) -> Result<ListingFields, ValidationError> {
        Ok(ListingFields {
            title: required(&self.title, "title")?,
            year: plausible_year(&self.year)?,
            make: required(&self.make, "make")?,
            model: required(&self.model, "model")?,
            price: non_negative(&self.price, "price")?,
            mileage: non_negative(&self.mileage, "mileage")?,
            vin: required(&self.vin, "vin")?,
            engine: optional(&self.engine),
            transmission: optional(&self.transmission),
            features: optional(&self.features),
            video_url: optional(&self.video_url),
            carfax_url: required(&self.carfax_url, "carfax_url")?,
            is_featured: self.is_featured,
            sold: self.sold,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_negative(value: &str, field: &'static str) -> Result<i64, ValidationError> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, "must be a whole number"))?;
    if parsed < 0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(parsed)
}

fn plausible_year(value: &str) -> Result<i64, ValidationError> {
    let parsed = non_negative(value, "year")?;
    if !PLAUSIBLE_YEARS.contains(&parsed) {
        return Err(ValidationError::new("year", "must be a plausible 4-digit year"));
    }
    Ok(parsed)
}
