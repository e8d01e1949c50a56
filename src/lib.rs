//! Sheetpix - row-bound image extraction for Excel spreadsheets
//!
//! Product catalogs are often shipped as a spreadsheet with one row per
//! product and one or two pictures floating over each row. The pictures are
//! not linked to any cell; only their position on the grid tells which row
//! they belong to. This library reads that position from the drawing part
//! of an `.xlsx` package and binds every picture to the row key in column A.
//!
//! # Features
//!
//! - **Position based**: Pictures are bound to rows by their top-left anchor cell
//! - **Two roles per row**: The leftmost picture is the primary image, the next one the supplier image
//! - **Partial success**: Unresolvable pictures are reported, never fatal
//! - **Concurrent media reads**: Independent media entries are decompressed in parallel
//! - **Streaming**: Images can be handed to a callback instead of being kept in memory
//!
//! # Example - Extracting row images
//!
//! ```no_run
//! use sheetpix::{ExtractOptions, ImageExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("catalog.xlsx")?;
//! let result = ImageExtractor::new(ExtractOptions::default()).extract(&data)?;
//!
//! for image in &result.primary_images {
//!     println!("row {} ({}): {}", image.row_index, image.row_key, image.output_name);
//! }
//! for diagnostic in &result.diagnostics {
//!     eprintln!("skipped: {}", diagnostic);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Packages without pictures
//!
//! ```no_run
//! use sheetpix::{ExtractOptions, extract_row_images};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("catalog.xlsx")?;
//! match extract_row_images(&data, &ExtractOptions::default()) {
//!     Ok(result) => println!("{} images", result.total()),
//!     Err(e) if e.is_no_drawing() => println!("no images"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

/// Row image extraction pipeline
///
/// Classifies the pictures of the first worksheet by data row and role and
/// reads their media bytes.
pub mod images;

/// OOXML (Office Open XML) spreadsheet package parser
///
/// Provides the package, workbook and drawing layers the image pipeline is
/// built on.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use images::{
    CancelToken, ClassifiedImage, Diagnostic, ExtractOptions, ExtractionResult, ExtractionSummary,
    ImageExtractor, Role, extract_row_images,
};
pub use ooxml::{OoxmlError, Result};
