use thiserror::Error;

/// Rejected operator input.
///
/// Carries the offending field name so form handlers can redisplay the
/// submitted state with a targeted message next to the field, rather than a
/// generic banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
