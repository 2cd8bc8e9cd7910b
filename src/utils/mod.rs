//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Computed track list parsing

pub mod error;
pub mod tracks;

// Re-export commonly used items
pub use error::{GridError, GridResult};
pub use tracks::parse_track_list;
