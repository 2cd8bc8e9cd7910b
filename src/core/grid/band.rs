//! Column bands: groups of adjacent grid columns sharing one descriptor

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::data::constants::MAX_COLSPAN;

/// One band descriptor
///
/// `width` and `style` are opaque to the grid and passed through to whoever
/// renders the column template.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Band {
    #[cfg_attr(feature = "serde", serde(default = "default_span"))]
    pub span: usize,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub width: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub style: Option<String>,
}

#[cfg(feature = "serde")]
fn default_span() -> usize {
    1
}

impl Band {
    /// An unstyled band covering `span` columns
    pub fn new(span: usize) -> Self {
        Band {
            span,
            width: None,
            style: None,
        }
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Columns this band expands to, between 1 and `MAX_COLSPAN`
    pub fn columns(&self) -> usize {
        self.span.clamp(1, MAX_COLSPAN)
    }
}

impl Default for Band {
    fn default() -> Self {
        Band::new(1)
    }
}

/// Identity of a band: its position in the band list
///
/// Two bands with equal descriptors are still different groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BandId(pub usize);

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "band{}", self.0)
    }
}

/// Bands as supplied by the embedding component
///
/// A bare count means that many unstyled single-column bands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum BandSpec {
    Count(usize),
    List(Vec<Band>),
}

impl BandSpec {
    /// Normalize into a band list; a count is capped at `MAX_COLSPAN`
    pub fn into_bands(self) -> Vec<Band> {
        match self {
            BandSpec::Count(n) => vec![Band::default(); n.min(MAX_COLSPAN)],
            BandSpec::List(bands) => bands,
        }
    }

    /// Decode a JSON band spec: either an integer or a list of descriptors
    #[cfg(feature = "data-loading")]
    pub fn from_json(json: &str) -> crate::utils::error::GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<usize> for BandSpec {
    fn from(count: usize) -> Self {
        BandSpec::Count(count)
    }
}

impl From<Vec<Band>> for BandSpec {
    fn from(bands: Vec<Band>) -> Self {
        BandSpec::List(bands)
    }
}

/// Expand bands into one band identity per grid column
///
/// At most `MAX_COLSPAN` columns are seeded; bands past that are ignored.
pub fn expand_bands(bands: &[Band]) -> Vec<BandId> {
    bands
        .iter()
        .enumerate()
        .flat_map(|(idx, band)| std::iter::repeat(BandId(idx)).take(band.columns()))
        .take(MAX_COLSPAN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_bands() {
        let bands = vec![Band::new(2), Band::new(1), Band::new(0)];
        assert_eq!(
            expand_bands(&bands),
            vec![BandId(0), BandId(0), BandId(1), BandId(2)]
        );
    }

    #[test]
    fn test_equal_descriptors_are_distinct_groups() {
        let bands = vec![Band::new(1).with_width("10rem"), Band::new(1).with_width("10rem")];
        let ids = expand_bands(&bands);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_count_spec() {
        let bands = BandSpec::from(3).into_bands();
        assert_eq!(bands.len(), 3);
        assert!(bands.iter().all(|b| b.span == 1 && b.width.is_none()));
    }

    #[test]
    fn test_oversized_bands_are_capped() {
        assert_eq!(Band::new(usize::MAX).columns(), MAX_COLSPAN);
        assert_eq!(BandSpec::Count(usize::MAX).into_bands().len(), MAX_COLSPAN);

        let ids = expand_bands(&[Band::new(usize::MAX), Band::new(5)]);
        assert_eq!(ids.len(), MAX_COLSPAN);
        assert!(ids.iter().all(|id| *id == BandId(0)));

        let many = vec![Band::new(600); 3];
        assert_eq!(expand_bands(&many).len(), MAX_COLSPAN);
    }

    #[cfg(feature = "data-loading")]
    #[test]
    fn test_from_json() {
        let spec = BandSpec::from_json(r#"[{"span": 2, "width": "1fr"}, {}]"#).unwrap();
        let bands = spec.into_bands();
        assert_eq!(bands[0].span, 2);
        assert_eq!(bands[0].width.as_deref(), Some("1fr"));
        assert_eq!(bands[1].span, 1);

        assert_eq!(BandSpec::from_json("4").unwrap(), BandSpec::Count(4));
        assert!(BandSpec::from_json("\"wide\"").is_err());
    }
}
