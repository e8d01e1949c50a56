//! Excel (.xlsx) spreadsheet support.
//!
//! Only what the image extractor needs is read from a workbook: the location
//! of the first worksheet and its drawing (`workbook`), the shared strings
//! table (`shared_strings`), and the row keys in the first worksheet's key
//! column (`worksheet`).
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetpix::ooxml::opc::PhysPkgReader;
//! use sheetpix::ooxml::xlsx::{SharedStrings, RowKeys, locate_workbook};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("catalog.xlsx")?;
//! let mut pkg = PhysPkgReader::new(&data)?;
//! let parts = locate_workbook(&mut pkg)?;
//!
//! let shared = match &parts.shared_strings {
//!     Some(uri) => SharedStrings::parse(&pkg.blob_for(uri)?)?,
//!     None => SharedStrings::new(),
//! };
//! let keys = RowKeys::parse(&pkg.blob_for(&parts.first_sheet)?, &shared, 0, 1)?;
//! println!("{} data rows", keys.len());
//! # Ok(())
//! # }
//! ```

pub mod shared_strings;
pub mod workbook;
pub mod worksheet;

pub use shared_strings::SharedStrings;
pub use workbook::{DrawingParts, WorkbookParts, locate_drawing, locate_workbook};
pub use worksheet::{CellValue, RowKeys};
