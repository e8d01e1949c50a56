//! Package navigation for Excel workbooks.
//!
//! Finds the parts the image extractor needs: the first worksheet (whose
//! column A carries the row keys), the shared strings table, and the drawing
//! that holds the picture anchors together with the drawing's relationships.
//!
//! Each lookup follows the relationship chain first
//! (`_rels/.rels` → workbook → worksheet → drawing) and falls back to
//! wildcard member lookup when a package carries incomplete relationships.

use crate::ooxml::error::{NO_DRAWING_FOUND, OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::packuri::{PACKAGE_RELS_URI, PackURI};
use crate::ooxml::opc::pattern::{DRAWING_PATTERN, DRAWING_RELS_PATTERN, WORKSHEET_PATTERN};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::rel::{Relationships, attr_value};
use quick_xml::Reader;
use quick_xml::events::Event;

const DEFAULT_WORKBOOK: &str = "/xl/workbook.xml";
const DEFAULT_SHARED_STRINGS: &str = "/xl/sharedStrings.xml";

/// Parts of the workbook that carry row keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookParts {
    /// The workbook part
    pub workbook: PackURI,
    /// The first worksheet in tab order
    pub first_sheet: PackURI,
    /// The shared strings table, if the package has one
    pub shared_strings: Option<PackURI>,
}

/// The drawing attached to a worksheet and its relationships part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingParts {
    pub drawing: PackURI,
    pub rels: PackURI,
}

/// Locate the workbook, its first worksheet and its shared strings table.
///
/// # Errors
/// Returns [`OoxmlError::Format`] with "no worksheet found" if the package has no worksheet.
pub fn locate_workbook(pkg: &mut PhysPkgReader<'_>) -> Result<WorkbookParts> {
    let workbook = match read_rels(pkg, &PackURI::from_membername(PACKAGE_RELS_URI))? {
        Some(rels) => rels
            .first_of_type(relationship_type::OFFICE_DOCUMENT)
            .and_then(|rel| rel.target_partname().ok()),
        None => None,
    }
    .unwrap_or_else(|| PackURI::from_membername(DEFAULT_WORKBOOK));

    let workbook_rels = read_rels(pkg, &workbook.rels_uri())?.unwrap_or_default();

    let mut first_sheet = None;
    if let Some(workbook_xml) = pkg.optional_blob_for(&workbook)? {
        if let Some(r_id) = first_sheet_rel_id(&workbook_xml)? {
            first_sheet = workbook_rels
                .get(&r_id)
                .and_then(|rel| rel.target_partname().ok())
                .filter(|uri| pkg.contains(uri));
        }
    } else {
        log::debug!("Workbook part {} missing, falling back to member lookup", workbook);
    }

    let first_sheet = match first_sheet {
        Some(sheet) => sheet,
        None => pkg
            .find_first_part(WORKSHEET_PATTERN)
            .ok_or_else(|| OoxmlError::Format("no worksheet found".to_string()))?,
    };

    let shared_strings = workbook_rels
        .first_of_type(relationship_type::SHARED_STRINGS)
        .and_then(|rel| rel.target_partname().ok())
        .or_else(|| Some(PackURI::from_membername(DEFAULT_SHARED_STRINGS)))
        .filter(|uri| pkg.contains(uri));

    log::debug!("First worksheet: {}", first_sheet);

    Ok(WorkbookParts {
        workbook,
        first_sheet,
        shared_strings,
    })
}

/// Locate the drawing of a worksheet and the drawing's relationships part.
///
/// The drawing related from the worksheet is preferred. Otherwise the first
/// `*/drawings/*.xml` member is used. The relationships part is derived from
/// the drawing name, falling back to the first `*/drawings/_rels/*.xml.rels`.
///
/// # Errors
/// Returns [`OoxmlError::Format`] with "no drawing found" if either part is absent.
pub fn locate_drawing(pkg: &mut PhysPkgReader<'_>, sheet: &PackURI) -> Result<DrawingParts> {
    let related = read_rels(pkg, &sheet.rels_uri())?.and_then(|rels| {
        rels.iter()
            .filter(|rel| rel.reltype() == relationship_type::DRAWING && !rel.is_external())
            .find_map(|rel| rel.target_partname().ok())
    });

    let drawing = related
        .filter(|uri| pkg.contains(uri))
        .or_else(|| {
            pkg.find_parts(DRAWING_PATTERN)
                .into_iter()
                .find(|uri| !uri.is_rels())
        })
        .ok_or_else(|| OoxmlError::Format(NO_DRAWING_FOUND.to_string()))?;

    let derived = drawing.rels_uri();
    let rels = if pkg.contains(&derived) {
        derived
    } else {
        pkg.find_first_part(DRAWING_RELS_PATTERN)
            .ok_or_else(|| OoxmlError::Format(NO_DRAWING_FOUND.to_string()))?
    };

    log::debug!("Drawing: {} (relationships: {})", drawing, rels);
    Ok(DrawingParts { drawing, rels })
}

/// Read and parse a `.rels` part, or `None` if the package does not contain it.
fn read_rels(pkg: &mut PhysPkgReader<'_>, rels_uri: &PackURI) -> Result<Option<Relationships>> {
    let Some(xml) = pkg.optional_blob_for(rels_uri)? else {
        return Ok(None);
    };

    Relationships::parse(&xml, &rels_source_dir(rels_uri)).map(Some)
}

/// Get the directory of the source part a `.rels` part describes.
///
/// Relationship targets are resolved against this directory:
/// `/xl/drawings/_rels/drawing1.xml.rels` describes a part in `/xl/drawings`.
pub fn rels_source_dir(rels_uri: &PackURI) -> String {
    let rels_dir = PackURI::from_membername(rels_uri.base_uri().trim_start_matches('/'));
    match rels_dir.filename() {
        "_rels" => rels_dir.base_uri().to_string(),
        _ => rels_dir.as_str().to_string(),
    }
}

/// Get the relationship id of the first `<sheet>` in `workbook.xml`.
fn first_sheet_rel_id(workbook_xml: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(workbook_xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() != b"sheet" {
                    continue;
                }
                for attr in e.attributes().flatten() {
                    // r:id, not sheetId
                    if attr.key.local_name().as_ref() == b"id" {
                        return attr_value(&attr.value).map(Some);
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("Workbook parse error: {}", e))),
            _ => {},
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::fixtures::PackageBuilder;

    #[test]
    fn test_locate_through_relationships() {
        let data = PackageBuilder::catalog(&["A-1"]).build();
        let mut pkg = PhysPkgReader::new(&data).unwrap();

        let parts = locate_workbook(&mut pkg).unwrap();
        assert_eq!(parts.workbook.as_str(), "/xl/workbook.xml");
        assert_eq!(parts.first_sheet.as_str(), "/xl/worksheets/sheet1.xml");
        assert_eq!(parts.shared_strings, None);

        let drawing = locate_drawing(&mut pkg, &parts.first_sheet).unwrap();
        assert_eq!(drawing.drawing.as_str(), "/xl/drawings/drawing1.xml");
        assert_eq!(drawing.rels.as_str(), "/xl/drawings/_rels/drawing1.xml.rels");
    }

    #[test]
    fn test_first_sheet_follows_tab_order() {
        let workbook = r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Catalog" sheetId="2" r:id="rId5"/>
    <sheet name="Notes" sheetId="1" r:id="rId4"/>
  </sheets>
</workbook>"#;
        let workbook_rels = r#"<Relationships>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
  <Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;
        let data = PackageBuilder::new()
            .member("xl/workbook.xml", workbook)
            .member("xl/_rels/workbook.xml.rels", workbook_rels)
            .member("xl/worksheets/sheet1.xml", "<worksheet/>")
            .member("xl/worksheets/sheet2.xml", "<worksheet/>")
            .member("xl/sharedStrings.xml", "<sst/>")
            .build();
        let mut pkg = PhysPkgReader::new(&data).unwrap();

        let parts = locate_workbook(&mut pkg).unwrap();
        assert_eq!(parts.first_sheet.as_str(), "/xl/worksheets/sheet2.xml");
        assert_eq!(parts.shared_strings.unwrap().as_str(), "/xl/sharedStrings.xml");
    }

    #[test]
    fn test_fallback_without_relationships() {
        let data = PackageBuilder::new()
            .member("xl/worksheets/sheet3.xml", "<worksheet/>")
            .member("xl/worksheets/sheet1.xml", "<worksheet/>")
            .member("xl/drawings/drawing4.xml", "<wsDr/>")
            .member("xl/drawings/_rels/drawing4.xml.rels", "<Relationships/>")
            .build();
        let mut pkg = PhysPkgReader::new(&data).unwrap();

        let parts = locate_workbook(&mut pkg).unwrap();
        assert_eq!(parts.first_sheet.as_str(), "/xl/worksheets/sheet1.xml");

        let drawing = locate_drawing(&mut pkg, &parts.first_sheet).unwrap();
        assert_eq!(drawing.drawing.as_str(), "/xl/drawings/drawing4.xml");
        assert_eq!(drawing.rels.as_str(), "/xl/drawings/_rels/drawing4.xml.rels");
    }

    #[test]
    fn test_rels_source_dir() {
        let dir = |name: &str| rels_source_dir(&PackURI::from_membername(name));
        assert_eq!(dir("xl/drawings/_rels/drawing1.xml.rels"), "/xl/drawings");
        assert_eq!(dir("xl/_rels/workbook.xml.rels"), "/xl");
        assert_eq!(dir("_rels/.rels"), "/");
    }

    #[test]
    fn test_missing_worksheet() {
        let data = PackageBuilder::new().member("docProps/app.xml", "<Properties/>").build();
        let mut pkg = PhysPkgReader::new(&data).unwrap();

        let err = locate_workbook(&mut pkg).unwrap_err();
        assert!(matches!(err, OoxmlError::Format(ref msg) if msg == "no worksheet found"));
    }

    #[test]
    fn test_missing_drawing_or_rels() {
        let data = PackageBuilder::catalog(&["A-1"])
            .without("xl/drawings/drawing1.xml")
            .build();
        let mut pkg = PhysPkgReader::new(&data).unwrap();
        let sheet = locate_workbook(&mut pkg).unwrap().first_sheet;
        assert!(locate_drawing(&mut pkg, &sheet).unwrap_err().is_no_drawing());

        let data = PackageBuilder::catalog(&["A-1"])
            .without("xl/drawings/_rels/drawing1.xml.rels")
            .build();
        let mut pkg = PhysPkgReader::new(&data).unwrap();
        assert!(locate_drawing(&mut pkg, &sheet).unwrap_err().is_no_drawing());
    }
}
