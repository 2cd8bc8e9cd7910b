//! Data layer - Static names and keywords
//!
//! This module contains the attribute names, sentinel keywords and style
//! property names shared between the reader, the annotator and the geometry
//! reader.

pub mod constants;

// Re-export commonly used items
pub use constants::{
    ATTR_COLSPAN, ATTR_ROWSPAN, FILL_GROUP_KEYWORD, FILL_ROW_KEYWORD, MAX_COLSPAN, MAX_ROWSPAN,
    STRUCTURAL_ATTRIBUTES,
};
