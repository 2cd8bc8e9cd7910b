//! Attribute names and keywords shared with the rendering collaborator
//!
//! These names are an internal contract between the annotator and whatever
//! styles the table, not a public wire format.

/// Column span attribute read from cells
pub const ATTR_COLSPAN: &str = "colspan";

/// Row span attribute read from cells
pub const ATTR_ROWSPAN: &str = "rowspan";

/// `colspan` keyword: occupy every remaining column up to the widest row seen
pub const FILL_ROW_KEYWORD: &str = "row";

/// `colspan` keyword: occupy every remaining column of the current band
pub const FILL_GROUP_KEYWORD: &str = "group";

/// Attributes whose change invalidates the grid structure
pub const STRUCTURAL_ATTRIBUTES: &[&str] = &[ATTR_COLSPAN, ATTR_ROWSPAN];

/// 1-based grid row written onto cells and rows
pub const ATTR_GRID_ROW: &str = "data-grid-row";

/// 1-based grid column written onto cells
pub const ATTR_GRID_COLUMN: &str = "data-grid-column";

/// Numeric span a `row`/`group` colspan keyword resolved to
pub const ATTR_RESOLVED_COLSPAN: &str = "data-grid-colspan";

/// Custom style properties consumed by the grid stylesheet
pub const PROP_ROW: &str = "--grid-row";
pub const PROP_COLUMN: &str = "--grid-column";
pub const PROP_COLSPAN: &str = "--grid-colspan";
pub const PROP_ROWSPAN: &str = "--grid-rowspan";

/// Computed style properties holding the resolved track sizes
pub const COMPUTED_COLUMNS: &str = "grid-template-columns";
pub const COMPUTED_ROWS: &str = "grid-template-rows";

/// Largest column span honoured from an attribute, as in HTML tables
pub const MAX_COLSPAN: usize = 1000;

/// Largest row span honoured from an attribute, as in HTML tables
pub const MAX_ROWSPAN: usize = 65534;
