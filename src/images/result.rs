//! Extraction output: classified images, diagnostics and the aggregated result.

use serde::Serialize;
use std::fmt;

/// The role of an image within its row, decided by ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// First picture of the row (lowest column)
    Primary,
    /// Second picture of the row
    Supplier,
}

impl Role {
    /// Roles in ordinal order; a row never has more pictures than this.
    pub const ORDER: [Role; 2] = [Role::Primary, Role::Supplier];

    /// Get the role for a zero-based position among a row's sorted anchors.
    #[inline]
    pub fn from_ordinal(position: usize) -> Option<Role> {
        Self::ORDER.get(position).copied()
    }

    /// Get the file name suffix appended to the row key.
    #[inline]
    pub fn name_suffix(self) -> &'static str {
        match self {
            Role::Primary => "",
            Role::Supplier => "_supplier",
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Supplier => "supplier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the output file name for an image: `<key>.<ext>` or `<key>_supplier.<ext>`.
///
/// The extension is taken from the original media name; a media name without
/// one yields a name without extension.
pub fn output_name(row_key: &str, role: Role, media_name: &str) -> String {
    let ext = match media_name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < media_name.len() => &media_name[pos + 1..],
        _ => "",
    };
    if ext.is_empty() {
        format!("{}{}", row_key, role.name_suffix())
    } else {
        format!("{}{}.{}", row_key, role.name_suffix(), ext)
    }
}

/// An extracted image bound to a data row and a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedImage {
    /// Zero-based position of the row in the key table
    pub row_index: usize,
    /// Business key of the row
    pub row_key: String,
    pub role: Role,
    /// File name of the media inside the package (e.g., "image3.png")
    pub original_media_name: String,
    /// Derived output file name (e.g., "SKU-1_supplier.png")
    pub output_name: String,
    /// Raw bytes of the media entry
    pub payload: Vec<u8>,
}

/// A recoverable problem with a single anchor. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The anchor's reference id has no image relationship
    UnresolvedReference { r_id: String, sheet_row: u32, sheet_col: u32 },
    /// The anchor sits in a header row or below the last row key
    OutOfRangeRow { r_id: String, sheet_row: u32, sheet_col: u32 },
    /// A third or later picture in a row
    ExtraAnchor {
        row_key: String,
        r_id: String,
        sheet_row: u32,
        sheet_col: u32,
    },
    /// The media file a relationship points at is absent from the package
    MediaNotFound {
        row_key: String,
        role: Role,
        media_name: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedReference { r_id, sheet_row, sheet_col } => write!(
                f,
                "anchor {} at row {}, column {} has no image relationship",
                r_id, sheet_row, sheet_col
            ),
            Diagnostic::OutOfRangeRow { r_id, sheet_row, sheet_col } => write!(
                f,
                "anchor {} at row {}, column {} is outside the data rows",
                r_id, sheet_row, sheet_col
            ),
            Diagnostic::ExtraAnchor {
                row_key,
                r_id,
                sheet_row,
                sheet_col,
            } => write!(
                f,
                "anchor {} at row {}, column {} exceeds two images for '{}'",
                r_id, sheet_row, sheet_col, row_key
            ),
            Diagnostic::MediaNotFound {
                row_key,
                role,
                media_name,
            } => write!(f, "{} image '{}' for '{}' is missing", role, media_name, row_key),
        }
    }
}

/// Counts and diagnostics of an extraction, without payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub primary_count: usize,
    pub supplier_count: usize,
    pub total: usize,
    /// Number of data rows with a key, for judging completeness
    pub row_key_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractionSummary {
    /// Count one produced image.
    pub fn record(&mut self, role: Role) {
        match role {
            Role::Primary => self.primary_count += 1,
            Role::Supplier => self.supplier_count += 1,
        }
        self.total += 1;
    }
}

/// The two ordered image channels produced by an extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub primary_images: Vec<ClassifiedImage>,
    pub supplier_images: Vec<ClassifiedImage>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of data rows with a key
    pub row_key_count: usize,
}

impl ExtractionResult {
    /// Total number of images in both channels.
    #[inline]
    pub fn total(&self) -> usize {
        self.primary_images.len() + self.supplier_images.len()
    }

    #[inline]
    pub fn primary_count(&self) -> usize {
        self.primary_images.len()
    }

    #[inline]
    pub fn supplier_count(&self) -> usize {
        self.supplier_images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over all images, primaries first.
    pub fn images(&self) -> impl Iterator<Item = &ClassifiedImage> {
        self.primary_images.iter().chain(self.supplier_images.iter())
    }

    /// Get the counts and diagnostics of this result.
    pub fn summary(&self) -> ExtractionSummary {
        ExtractionSummary {
            primary_count: self.primary_count(),
            supplier_count: self.supplier_count(),
            total: self.total(),
            row_key_count: self.row_key_count,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Merges materialized images into the primary and supplier channels.
///
/// Images must be pushed in row order; each channel keeps push order.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    result: ExtractionResult,
}

impl ResultAggregator {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            result: ExtractionResult {
                diagnostics,
                ..ExtractionResult::default()
            },
        }
    }

    /// Add an image to the channel of its role.
    pub fn push(&mut self, image: ClassifiedImage) {
        match image.role {
            Role::Primary => self.result.primary_images.push(image),
            Role::Supplier => self.result.supplier_images.push(image),
        }
    }

    /// Record a recoverable problem.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.result.diagnostics.push(diagnostic);
    }

    /// Finish aggregation.
    pub fn finish(mut self, row_key_count: usize) -> ExtractionResult {
        self.result.row_key_count = row_key_count;
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(row_index: usize, key: &str, role: Role) -> ClassifiedImage {
        ClassifiedImage {
            row_index,
            row_key: key.to_string(),
            role,
            original_media_name: "image1.png".to_string(),
            output_name: output_name(key, role, "image1.png"),
            payload: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("SKU-1", Role::Primary, "image1.png"), "SKU-1.png");
        assert_eq!(output_name("SKU-1", Role::Supplier, "image2.jpeg"), "SKU-1_supplier.jpeg");
        assert_eq!(output_name("SKU-1", Role::Primary, "photo.final.JPG"), "SKU-1.JPG");
        assert_eq!(output_name("SKU-1", Role::Supplier, "image"), "SKU-1_supplier");
        assert_eq!(output_name("SKU-1", Role::Primary, "image."), "SKU-1");
    }

    #[test]
    fn test_role_ordinals() {
        assert_eq!(Role::from_ordinal(0), Some(Role::Primary));
        assert_eq!(Role::from_ordinal(1), Some(Role::Supplier));
        assert_eq!(Role::from_ordinal(2), None);
    }

    #[test]
    fn test_aggregator_channels_and_counts() {
        let mut aggregator = ResultAggregator::new(Vec::new());
        aggregator.push(image(0, "A", Role::Primary));
        aggregator.push(image(0, "A", Role::Supplier));
        aggregator.push(image(1, "B", Role::Primary));
        aggregator.push_diagnostic(Diagnostic::OutOfRangeRow {
            r_id: "rId9".to_string(),
            sheet_row: 1,
            sheet_col: 1,
        });
        let result = aggregator.finish(3);

        assert_eq!(result.primary_count(), 2);
        assert_eq!(result.supplier_count(), 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.primary_images[1].row_key, "B");
        assert_eq!(result.images().count(), 3);

        let summary = result.summary();
        assert_eq!(summary.total, summary.primary_count + summary.supplier_count);
        assert_eq!(summary.row_key_count, 3);
        assert_eq!(summary.diagnostics.len(), 1);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diagnostic = Diagnostic::MediaNotFound {
            row_key: "A".to_string(),
            role: Role::Supplier,
            media_name: "image2.png".to_string(),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();

        assert_eq!(json["kind"], "media_not_found");
        assert_eq!(json["role"], "supplier");
        assert_eq!(diagnostic.to_string(), "supplier image 'image2.png' for 'A' is missing");
    }

    #[test]
    fn test_summary_record() {
        let mut summary = ExtractionSummary::default();
        summary.record(Role::Primary);
        summary.record(Role::Supplier);
        summary.record(Role::Primary);
        assert_eq!((summary.primary_count, summary.supplier_count, summary.total), (2, 1, 3));
    }
}
