/// Constant values for navigating spreadsheet packages.
///
/// This module contains the relationship type URIs and target modes needed
/// to get from the package root to a worksheet, its drawing and the
/// drawing's media.

/// Open XML relationship target modes
pub mod target_mode {
    /// External relationship target mode (linked files outside the package)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in spreadsheet packages
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
    pub const DRAWING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const CHART: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
}
