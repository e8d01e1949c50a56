//! DrawingML (DML) support for spreadsheet drawings.
//!
//! A worksheet's drawing part positions pictures, shapes and charts on the
//! cell grid. This module reads the picture anchors (`anchor`) and the
//! relationship ids of their picture data (`blip`).

pub mod anchor;
pub mod blip;

pub use anchor::{ImageAnchor, MAX_COLS, MAX_ROWS, extract_anchors};
pub use blip::BlipRef;
