/// Open Packaging Conventions (OPC) layer for spreadsheet packages.
///
/// This module covers the parts of the OPC specification needed to find
/// embedded pictures:
///
/// - ZIP-based physical package access (`phys_pkg`)
/// - Part names and relative reference resolution (`packuri`)
/// - Wildcard lookup of parts with unknown numeric suffixes (`pattern`)
/// - Relationship parts (`rel`)
pub mod constants;
pub mod packuri;
pub mod pattern;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use packuri::PackURI;
pub use phys_pkg::PhysPkgReader;
pub use rel::{ImageRelationships, Relationship, RelationshipEntry, Relationships};
