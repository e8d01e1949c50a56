//! In-memory spreadsheet packages for tests.

use crate::ooxml::opc::constants::relationship_type;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub(crate) const DRAWING: &str = "xl/drawings/drawing1.xml";
pub(crate) const DRAWING_RELS: &str = "xl/drawings/_rels/drawing1.xml.rels";

/// Builds a ZIP package member by member.
#[derive(Debug, Default, Clone)]
pub(crate) struct PackageBuilder {
    members: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A single-sheet workbook with a `SKU` header in A1 and `keys` in A2 onward.
    ///
    /// The sheet is related to an empty drawing with an empty relationships part.
    pub(crate) fn catalog(keys: &[&str]) -> Self {
        let rows: String = keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let r = i + 2;
                format!(r#"<row r="{r}"><c r="A{r}" t="inlineStr"><is><t>{key}</t></is></c></row>"#)
            })
            .collect();
        let sheet = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>SKU</t></is></c></row>{rows}</sheetData>
<drawing r:id="rId1"/>
</worksheet>"#
        );

        Self::new()
            .member(
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#,
            )
            .member(
                "_rels/.rels",
                rels_xml(&[("rId1", relationship_type::OFFICE_DOCUMENT, "xl/workbook.xml")]),
            )
            .member(
                "xl/workbook.xml",
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Catalog" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            )
            .member(
                "xl/_rels/workbook.xml.rels",
                rels_xml(&[("rId1", relationship_type::WORKSHEET, "worksheets/sheet1.xml")]),
            )
            .member("xl/worksheets/sheet1.xml", sheet)
            .member(
                "xl/worksheets/_rels/sheet1.xml.rels",
                rels_xml(&[("rId1", relationship_type::DRAWING, "../drawings/drawing1.xml")]),
            )
            .anchors(&[])
            .image_rels(&[])
    }

    /// Add a member, replacing any member with the same name.
    pub(crate) fn member(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.members.retain(|(n, _)| n != name);
        self.members.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    pub(crate) fn without(mut self, name: &str) -> Self {
        self.members.retain(|(n, _)| n != name);
        self
    }

    /// Replace the drawing with picture anchors given as `(row, col, r_id)`, zero-based.
    pub(crate) fn anchors(self, anchors: &[(u32, u32, &str)]) -> Self {
        let body: String = anchors
            .iter()
            .map(|&(row, col, r_id)| picture_anchor(row, col, r_id))
            .collect();
        self.drawing(&body)
    }

    /// Replace the drawing with raw anchor markup.
    pub(crate) fn drawing(self, body: &str) -> Self {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{body}</xdr:wsDr>"#
        );
        self.member(DRAWING, xml)
    }

    /// Replace the drawing relationships with `(id, target)` pairs.
    ///
    /// Targets under `media` get the image type, anything else the chart type.
    pub(crate) fn image_rels(self, rels: &[(&str, &str)]) -> Self {
        let typed: Vec<(&str, &str, &str)> = rels
            .iter()
            .map(|&(id, target)| {
                let reltype = if target.contains("media") {
                    relationship_type::IMAGE
                } else {
                    relationship_type::CHART
                };
                (id, reltype, target)
            })
            .collect();
        self.member(DRAWING_RELS, rels_xml(&typed))
    }

    /// Add a media file under `xl/media/`.
    pub(crate) fn media(self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.member(&format!("xl/media/{name}"), data)
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in &self.members {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
    let body: String = rels
        .iter()
        .map(|(id, reltype, target)| {
            format!(r#"<Relationship Id="{id}" Type="{reltype}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

fn picture_anchor(row: u32, col: u32, r_id: &str) -> String {
    format!(
        r#"<xdr:twoCellAnchor editAs="oneCell">
<xdr:from><xdr:col>{col}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
<xdr:to><xdr:col>{to_col}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{to_row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
<xdr:pic><xdr:nvPicPr><xdr:cNvPr id="2" name="Picture"/><xdr:cNvPicPr/></xdr:nvPicPr>
<xdr:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>
<xdr:spPr/></xdr:pic><xdr:clientData/>
</xdr:twoCellAnchor>"#,
        to_col = col + 1,
        to_row = row + 1,
    )
}
