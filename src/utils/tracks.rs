//! Computed track list parsing
//!
//! A rendered CSS grid reports its resolved tracks as a whitespace separated
//! list of pixel lengths, e.g. `"120px 80.5px 80.5px"`. The keyword `none`
//! and the empty string both mean "no tracks".

use super::error::{GridError, GridResult};

/// Parse a resolved `grid-template-columns` / `grid-template-rows` value
pub fn parse_track_list(value: &str) -> GridResult<Vec<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    trimmed
        .split_whitespace()
        .map(|track| parse_pixels(track).ok_or_else(|| {
            GridError::track_list(value, format!("'{}' is not a pixel length", track))
        }))
        .collect()
}

/// Parse a single `<number>px` token; a bare `0` is accepted as zero
fn parse_pixels(token: &str) -> Option<f64> {
    if token == "0" {
        return Some(0.0);
    }
    let number = token.strip_suffix("px")?;
    let px: f64 = number.parse().ok()?;
    if px.is_finite() && px >= 0.0 {
        Some(px)
    } else {
        None
    }
}
