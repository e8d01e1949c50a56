//! Office Open XML (OOXML) spreadsheet package support.
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): ZIP package access, part names, relationships
//! 2. **Spreadsheet Layer** (`xlsx`): workbook navigation and the row key table
//! 3. **Drawing Layer** (`drawings`): picture anchors on the cell grid
//! 4. **Errors** (`error`): the fatal error type shared by all layers
pub mod drawings;
pub mod error;
pub mod opc;
pub mod xlsx;

// Re-export commonly used types from OPC layer
pub use opc::{PackURI, PhysPkgReader};

// Re-export error types
pub use error::{OoxmlError, Result};
