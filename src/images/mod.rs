//! Row image extraction.
//!
//! Binds the pictures embedded in a spreadsheet's drawing to the data rows
//! they sit in. Each data row can carry a primary image (its leftmost
//! picture) and a supplier image (the next one); any further pictures in the
//! row are dropped and reported.
//!
//! # Architecture
//!
//! - `config`: Extraction options and the cancellation token
//! - `classify`: Maps anchors to data rows and roles
//! - `materialize`: Reads the media bytes of classified images
//! - `result`: Classified images, diagnostics and the two output channels
//! - `extractor`: The end-to-end pipeline
//! - `sink`: Writing images to a directory
//!
//! # Quick Start
//!
//! ```no_run
//! use sheetpix::images::{ExtractOptions, ImageExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("catalog.xlsx")?;
//! let extractor = ImageExtractor::new(ExtractOptions::default());
//!
//! // Stream images instead of keeping every payload in memory
//! let summary = extractor.extract_each(&data, |image| {
//!     std::fs::write(&image.output_name, &image.payload)?;
//!     Ok(())
//! })?;
//! println!("{} images for {} rows", summary.total, summary.row_key_count);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod extractor;
pub mod materialize;
pub mod result;
pub mod sink;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classify::{ClassificationPlan, PlannedImage, classify};
pub use config::{CancelToken, ExtractOptions};
pub use extractor::{ImageExtractor, extract_row_images};
pub use result::{
    ClassifiedImage, Diagnostic, ExtractionResult, ExtractionSummary, ResultAggregator, Role,
};
pub use sink::DirectorySink;
