//! Error handling for tablegrid
//!
//! The grid builder itself is total and never fails. Errors only surface at the
//! edges: document operations on stale handles, band specs that cannot be
//! decoded, and computed track lists the geometry reader cannot make sense of.

use thiserror::Error;

use crate::features::document::ElementId;

/// Error type for document, band and geometry operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The handle does not refer to a live element
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
    /// The observed element is not a table
    #[error("element {0} is not a table")]
    NotATable(ElementId),
    /// Band specification could not be decoded
    #[error("invalid band specification: {message}")]
    InvalidBands { message: String },
    /// A computed track list contained something other than pixel lengths
    #[error("invalid track list '{value}': {message}")]
    InvalidTrackList { value: String, message: String },
}

/// Result type for fallible tablegrid operations
pub type GridResult<T> = Result<T, GridError>;

// Convenience constructors for errors
impl GridError {
    pub fn bands(message: impl Into<String>) -> Self {
        GridError::InvalidBands {
            message: message.into(),
        }
    }

    pub fn track_list(value: impl Into<String>, message: impl Into<String>) -> Self {
        GridError::InvalidTrackList {
            value: value.into(),
            message: message.into(),
        }
    }
}

#[cfg(feature = "data-loading")]
impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::bands(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_element_display() {
        let err = GridError::UnknownElement(ElementId::from_raw(7));
        assert_eq!(err.to_string(), "unknown element #7");
    }

    #[test]
    fn test_track_list_display() {
        let err = GridError::track_list("10em 20px", "expected a pixel length");
        let msg = err.to_string();
        assert!(msg.contains("10em 20px"));
        assert!(msg.contains("pixel length"));
    }

    #[test]
    fn test_bands_display() {
        let err = GridError::bands("expected an integer or a list");
        assert!(err.to_string().starts_with("invalid band specification"));
    }
}
