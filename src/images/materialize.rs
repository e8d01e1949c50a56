//! Reading the media bytes of classified images.
//!
//! Each planned image is read from its own media member. Members are
//! independent, so with `parallel` enabled they are decompressed on the rayon
//! pool, each worker holding its own clone of the package reader. Output
//! order always matches plan order.

use crate::images::classify::PlannedImage;
use crate::images::config::ExtractOptions;
use crate::images::result::{ClassifiedImage, Diagnostic};
use crate::ooxml::error::Result;
use crate::ooxml::opc::PhysPkgReader;
use rayon::prelude::*;

/// The outcome of reading one planned image.
#[derive(Debug)]
pub enum Materialized {
    Image(ClassifiedImage),
    /// The media entry is absent; the image slot stays empty
    Missing(Diagnostic),
}

/// Read the payload of a single planned image.
///
/// A media member absent from the package becomes [`Materialized::Missing`].
///
/// # Errors
/// Returns [`OoxmlError::Cancelled`](crate::ooxml::OoxmlError::Cancelled) if the run is cancelled, or any other
/// archive error raised while decompressing the member.
pub fn materialize_one(
    pkg: &mut PhysPkgReader<'_>,
    planned: &PlannedImage,
    options: &ExtractOptions,
) -> Result<Materialized> {
    options.check_cancelled()?;

    match pkg.blob_for(&planned.partname) {
        Ok(payload) => Ok(Materialized::Image(ClassifiedImage {
            row_index: planned.row_index,
            row_key: planned.row_key.clone(),
            role: planned.role,
            original_media_name: planned.media_name.clone(),
            output_name: planned.output_name.clone(),
            payload,
        })),
        Err(e) if e.is_missing_part() => {
            log::warn!(
                "{} image {} for '{}' is missing from the package",
                planned.role,
                planned.partname,
                planned.row_key
            );
            Ok(Materialized::Missing(Diagnostic::MediaNotFound {
                row_key: planned.row_key.clone(),
                role: planned.role,
                media_name: planned.media_name.clone(),
            }))
        },
        Err(e) => Err(e),
    }
}

/// Read the payloads of all planned images, preserving plan order.
pub fn materialize_all(
    pkg: &PhysPkgReader<'_>,
    plan: &[PlannedImage],
    options: &ExtractOptions,
) -> Result<Vec<Materialized>> {
    if options.parallel && plan.len() > 1 {
        plan.par_iter()
            .map_init(|| pkg.clone(), |reader, planned| materialize_one(reader, planned, options))
            .collect()
    } else {
        let mut reader = pkg.clone();
        plan.iter()
            .map(|planned| materialize_one(&mut reader, planned, options))
            .collect()
    }
}
