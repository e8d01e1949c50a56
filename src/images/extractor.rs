// Row image extraction from spreadsheet packages
//
// One call runs the whole pipeline: open the package, locate the first
// worksheet and its drawing, resolve the drawing's image relationships,
// read the picture anchors and the row keys, classify, then read the media.
// Classification completes before any media is read.

use crate::images::classify::{ClassificationPlan, classify};
use crate::images::config::ExtractOptions;
use crate::images::materialize::{Materialized, materialize_all, materialize_one};
use crate::images::result::{
    ClassifiedImage, ExtractionResult, ExtractionSummary, ResultAggregator,
};
use crate::ooxml::drawings::extract_anchors;
use crate::ooxml::error::Result;
use crate::ooxml::opc::{ImageRelationships, PhysPkgReader};
use crate::ooxml::xlsx::workbook::rels_source_dir;
use crate::ooxml::xlsx::{RowKeys, SharedStrings, WorkbookParts, locate_drawing, locate_workbook};
use std::path::Path;

/// Extracts row-bound images from spreadsheet packages.
///
/// The extractor holds no state between calls; one instance can serve any
/// number of packages, also from several threads.
///
/// # Examples
///
/// ```rust,no_run
/// use sheetpix::images::{ExtractOptions, ImageExtractor};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = ImageExtractor::new(ExtractOptions::default());
/// let result = extractor.extract_file("catalog.xlsx")?;
///
/// for image in &result.primary_images {
///     println!("{} -> {}", image.row_key, image.output_name);
/// }
/// println!(
///     "{} primary, {} supplier, {} rows",
///     result.primary_count(),
///     result.supplier_count(),
///     result.row_key_count
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImageExtractor {
    options: ExtractOptions,
}

/// Everything known about a package once classification is done.
struct Prepared<'data> {
    pkg: PhysPkgReader<'data>,
    plan: ClassificationPlan,
    row_key_count: usize,
}

impl ImageExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract all row images of a package held in memory.
    ///
    /// # Errors
    /// Returns [`OoxmlError::Format`](crate::ooxml::OoxmlError::Format) if the package
    /// cannot be read or has no worksheet or drawing, and
    /// [`OoxmlError::Cancelled`](crate::ooxml::OoxmlError::Cancelled) if the run is cancelled.
    pub fn extract(&self, data: &[u8]) -> Result<ExtractionResult> {
        let Some(prepared) = self.prepare(data)? else {
            return Ok(ResultAggregator::default().finish(self.count_row_keys(data)?));
        };

        let outcomes = materialize_all(&prepared.pkg, &prepared.plan.images, &self.options)?;

        let mut aggregator = ResultAggregator::new(prepared.plan.diagnostics);
        for outcome in outcomes {
            match outcome {
                Materialized::Image(image) => aggregator.push(image),
                Materialized::Missing(diagnostic) => aggregator.push_diagnostic(diagnostic),
            }
        }

        let result = aggregator.finish(prepared.row_key_count);
        log::debug!(
            "Extracted {} primary and {} supplier images for {} rows",
            result.primary_count(),
            result.supplier_count(),
            result.row_key_count
        );
        Ok(result)
    }

    /// Extract a package from a file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult> {
        let data = std::fs::read(path)?;
        self.extract(&data)
    }

    /// Extract row images one at a time, handing each to `sink`.
    ///
    /// Images are produced sequentially in row order, primary before supplier,
    /// and are not retained. An error returned by `sink` aborts the run.
    pub fn extract_each<F>(&self, data: &[u8], mut sink: F) -> Result<ExtractionSummary>
    where
        F: FnMut(ClassifiedImage) -> Result<()>,
    {
        let Some(prepared) = self.prepare(data)? else {
            return Ok(ExtractionSummary {
                row_key_count: self.count_row_keys(data)?,
                ..ExtractionSummary::default()
            });
        };

        let Prepared {
            mut pkg,
            plan,
            row_key_count,
        } = prepared;
        let mut summary = ExtractionSummary {
            row_key_count,
            diagnostics: plan.diagnostics,
            ..ExtractionSummary::default()
        };

        for planned in &plan.images {
            match materialize_one(&mut pkg, planned, &self.options)? {
                Materialized::Image(image) => {
                    summary.record(image.role);
                    sink(image)?;
                },
                Materialized::Missing(diagnostic) => summary.diagnostics.push(diagnostic),
            }
        }

        Ok(summary)
    }

    /// Run the pipeline up to classification.
    ///
    /// Returns `None` for a package without a drawing when such packages are
    /// configured to count as empty.
    fn prepare<'data>(&self, data: &'data [u8]) -> Result<Option<Prepared<'data>>> {
        let mut pkg = PhysPkgReader::new(data)?;
        let parts = locate_workbook(&mut pkg)?;

        let drawing = match locate_drawing(&mut pkg, &parts.first_sheet) {
            Ok(drawing) => drawing,
            Err(e) if e.is_no_drawing() && self.options.missing_drawing_is_empty => {
                log::debug!("Package has no drawing, treating it as empty");
                return Ok(None);
            },
            Err(e) => return Err(e),
        };
        self.options.check_cancelled()?;

        let rels_xml = pkg.blob_for(&drawing.rels)?;
        let rels = ImageRelationships::parse(&rels_xml, &rels_source_dir(&drawing.rels))?;
        log::debug!("Resolved {} image relationships", rels.len());

        let anchors = extract_anchors(&pkg.blob_for(&drawing.drawing)?)?;
        log::debug!("Found {} picture anchors", anchors.len());

        let keys = self.load_row_keys(&mut pkg, &parts)?;
        log::debug!("Loaded {} row keys", keys.len());

        let plan = classify(&anchors, &rels, &keys, &self.options)?;

        Ok(Some(Prepared {
            pkg,
            plan,
            row_key_count: keys.len(),
        }))
    }

    fn load_row_keys(&self, pkg: &mut PhysPkgReader<'_>, parts: &WorkbookParts) -> Result<RowKeys> {
        let shared = match &parts.shared_strings {
            Some(uri) => SharedStrings::parse(&pkg.blob_for(uri)?)?,
            None => SharedStrings::new(),
        };
        let sheet_xml = pkg.blob_for(&parts.first_sheet)?;
        RowKeys::parse(&sheet_xml, &shared, self.options.key_column, self.options.header_rows)
    }

    /// Count the row keys of a package that has no drawing.
    fn count_row_keys(&self, data: &[u8]) -> Result<usize> {
        let mut pkg = PhysPkgReader::new(data)?;
        let parts = locate_workbook(&mut pkg)?;
        Ok(self.load_row_keys(&mut pkg, &parts)?.len())
    }
}

/// Extract all row images of a package with the given options.
#[inline]
pub fn extract_row_images(data: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
    ImageExtractor::new(options.clone()).extract(data)
}
