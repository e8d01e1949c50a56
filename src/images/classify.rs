//! Row classification of picture anchors.
//!
//! Every resolvable anchor is mapped to the data row it sits in. Within a row
//! the anchors are ordered by column: the leftmost picture is the primary
//! image, the next one the supplier image, and any further pictures are
//! reported and dropped. Anchors sharing a column keep their drawing order.

use crate::images::config::ExtractOptions;
use crate::images::result::{Diagnostic, Role, output_name};
use crate::ooxml::drawings::{BlipRef, ImageAnchor};
use crate::ooxml::error::Result;
use crate::ooxml::opc::{ImageRelationships, PackURI};
use crate::ooxml::xlsx::RowKeys;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// An image selected for output, before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImage {
    pub row_index: usize,
    pub row_key: String,
    pub role: Role,
    pub r_id: String,
    pub media_name: String,
    /// Part name of the media entry to read
    pub partname: PackURI,
    pub output_name: String,
}

/// Images to materialize, in row order, and the anchors that were dropped.
#[derive(Debug, Default)]
pub struct ClassificationPlan {
    pub images: Vec<PlannedImage>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Map a zero-based drawing row to an index into the row keys.
///
/// Drawing row `r` is sheet row `r + 1`, and the first data row follows the
/// header rows, so the index is `r - header_rows`. Header rows and rows past
/// the last key have no index.
#[inline]
pub fn data_row_index(anchor_row: u32, header_rows: u32, key_count: usize) -> Option<usize> {
    let index = anchor_row.checked_sub(header_rows)? as usize;
    (index < key_count).then_some(index)
}

/// Assign anchors to data rows and roles.
///
/// Anchors whose reference id has no image relationship are dropped before
/// grouping, so they never take a role away from a resolvable picture.
///
/// # Errors
/// Returns [`crate::ooxml::OoxmlError::Cancelled`] if the run is cancelled.
pub fn classify(
    anchors: &[ImageAnchor],
    rels: &ImageRelationships,
    keys: &RowKeys,
    options: &ExtractOptions,
) -> Result<ClassificationPlan> {
    let mut plan = ClassificationPlan::default();
    let mut rows: BTreeMap<u32, SmallVec<[&ImageAnchor; 2]>> = BTreeMap::new();

    for anchor in anchors {
        if rels.contains(&anchor.r_id) {
            rows.entry(anchor.row).or_default().push(anchor);
        } else {
            let reason = match anchor.blip {
                BlipRef::Embed => "has no image relationship",
                BlipRef::Link => "links to a picture outside the package",
            };
            log::warn!(
                "Anchor {} at row {}, column {} {}",
                anchor.r_id,
                anchor.sheet_row(),
                anchor.sheet_col(),
                reason
            );
            plan.diagnostics.push(Diagnostic::UnresolvedReference {
                r_id: anchor.r_id.clone(),
                sheet_row: anchor.sheet_row(),
                sheet_col: anchor.sheet_col(),
            });
        }
    }

    for (row, mut row_anchors) in rows {
        options.check_cancelled()?;

        let Some(row_index) = data_row_index(row, options.header_rows, keys.len()) else {
            log::trace!("Row {} is outside the data rows", row.saturating_add(1));
            plan.diagnostics.extend(row_anchors.iter().map(|anchor| {
                Diagnostic::OutOfRangeRow {
                    r_id: anchor.r_id.clone(),
                    sheet_row: anchor.sheet_row(),
                    sheet_col: anchor.sheet_col(),
                }
            }));
            continue;
        };
        let row_key = keys.get(row_index).unwrap_or_default();

        // Stable, so equal columns keep drawing order
        row_anchors.sort_by_key(|anchor| anchor.col);

        for (position, anchor) in row_anchors.iter().enumerate() {
            let (Some(role), Some(entry)) = (Role::from_ordinal(position), rels.get(&anchor.r_id))
            else {
                log::warn!(
                    "Dropping anchor {} at row {}, column {}: row '{}' already has two images",
                    anchor.r_id,
                    anchor.sheet_row(),
                    anchor.sheet_col(),
                    row_key
                );
                plan.diagnostics.push(Diagnostic::ExtraAnchor {
                    row_key: row_key.to_string(),
                    r_id: anchor.r_id.clone(),
                    sheet_row: anchor.sheet_row(),
                    sheet_col: anchor.sheet_col(),
                });
                continue;
            };

            plan.images.push(PlannedImage {
                row_index,
                row_key: row_key.to_string(),
                role,
                r_id: anchor.r_id.clone(),
                media_name: entry.media_name.clone(),
                partname: entry.partname.clone(),
                output_name: output_name(row_key, role, &entry.media_name),
            });
        }
    }

    log::debug!(
        "Classified {} images ({} anchors dropped)",
        plan.images.len(),
        plan.diagnostics.len()
    );
    Ok(plan)
}
