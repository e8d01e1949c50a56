//! Row key table loaded from the first worksheet.
//!
//! Only a single column is read (column A by default). Rows inside the header
//! band are skipped, empty or falsy values are dropped, and the remaining keys
//! keep sheet order. Keys are neither sorted nor deduplicated: two rows with the
//! same key stay two entries.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::xlsx::shared_strings::{SharedStrings, push_entity};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// The value of a key cell, before it is turned into a row key.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    /// Numeric value, kept as written in `<v>` so "00123"-style codes survive
    Number(String),
    Bool(bool),
}

impl CellValue {
    /// Check whether the value counts as absent: empty text, zero, or FALSE.
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(raw) => raw.trim().parse::<f64>().map_or(raw.trim().is_empty(), |n| n == 0.0),
            CellValue::Bool(value) => !value,
        }
    }

    /// Get the row key for this value, or `None` if it is falsy.
    pub fn to_key(&self) -> Option<String> {
        if self.is_falsy() {
            return None;
        }
        Some(match self {
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(raw) => raw.trim().to_string(),
            CellValue::Bool(_) => "TRUE".to_string(),
            CellValue::Empty => return None,
        })
    }
}

/// Ordered row keys of the data rows; index 0 is the first data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowKeys {
    keys: Vec<String>,
}

impl RowKeys {
    /// Build a key table from already-extracted keys.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the key column of a worksheet.
    ///
    /// # Arguments
    /// * `sheet_xml` - Worksheet part content
    /// * `shared` - Shared strings table used by `t="s"` cells
    /// * `key_column` - Zero-based column holding the keys
    /// * `header_rows` - Number of leading sheet rows to skip
    pub fn parse(
        sheet_xml: &[u8],
        shared: &SharedStrings,
        key_column: u32,
        header_rows: u32,
    ) -> Result<Self> {
        let cells = read_column(sheet_xml, shared, key_column)?;
        let keys = cells
            .into_iter()
            .filter(|(row, _)| *row > header_rows)
            .filter_map(|(_, value)| value.to_key())
            .collect();
        Ok(Self { keys })
    }

    /// Get the key of a data row.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(|k| k.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }
}

/// The cell currently being read.
struct CellState {
    column: u32,
    kind: CellKind,
    value: String,
    capture: bool,
    has_value: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    SharedString,
    InlineString,
    Text,
    Bool,
}

/// Read one column of a worksheet as `(sheet_row, value)` pairs in sheet order.
///
/// Rows and cells without an `r` attribute take the position after the previous one.
fn read_column(sheet_xml: &[u8], shared: &SharedStrings, column: u32) -> Result<Vec<(u32, CellValue)>> {
    let mut values = Vec::new();
    let mut reader = Reader::from_reader(sheet_xml);

    let mut in_sheet_data = false;
    let mut row_num = 0u32;
    let mut next_column = 0u32;
    let mut cell: Option<CellState> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = true,
                b"row" if in_sheet_data => {
                    row_num = row_number(e).unwrap_or(row_num + 1);
                    next_column = 0;
                },
                b"c" if in_sheet_data => {
                    let state = start_cell(e, next_column);
                    next_column = state.column + 1;
                    cell = (state.column == column).then_some(state);
                },
                b"v" | b"t" => {
                    if let Some(state) = cell.as_mut() {
                        // <t> only carries the value inside an inline string
                        let local = e.local_name();
                        state.capture = local.as_ref() == b"v" || state.kind == CellKind::InlineString;
                        state.has_value |= state.capture;
                    }
                },
                _ => {},
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" if in_sheet_data => {
                    row_num = row_number(e).unwrap_or(row_num + 1);
                    next_column = 0;
                },
                b"c" if in_sheet_data => {
                    let state = start_cell(e, next_column);
                    next_column = state.column + 1;
                },
                _ => {},
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = false,
                b"v" | b"t" => {
                    if let Some(state) = cell.as_mut() {
                        state.capture = false;
                    }
                },
                b"c" => {
                    if let Some(state) = cell.take() {
                        values.push((row_num, finish_cell(state, shared)));
                    }
                },
                _ => {},
            },
            Ok(Event::Text(ref t)) => {
                if let Some(state) = cell.as_mut().filter(|s| s.capture) {
                    state.value.push_str(&String::from_utf8_lossy(t));
                }
            },
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(state) = cell.as_mut().filter(|s| s.capture) {
                    push_entity(&mut state.value, r)?;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("Worksheet parse error: {}", e))),
            _ => {},
        }
    }

    Ok(values)
}

fn row_number(e: &BytesStart<'_>) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"r")
        .and_then(|attr| atoi_simd::parse::<u32, false, false>(&attr.value).ok())
}

fn start_cell(e: &BytesStart<'_>, next_column: u32) -> CellState {
    let mut column = next_column;
    let mut kind = CellKind::Number;

    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"r" => {
                if let Some(index) = column_index(&attr.value) {
                    column = index;
                }
            },
            b"t" => {
                kind = match attr.value.as_ref() {
                    b"s" => CellKind::SharedString,
                    b"inlineStr" => CellKind::InlineString,
                    b"str" | b"e" => CellKind::Text,
                    b"b" => CellKind::Bool,
                    _ => CellKind::Number,
                }
            },
            _ => {},
        }
    }

    CellState {
        column,
        kind,
        value: String::new(),
        capture: false,
        has_value: false,
    }
}

fn finish_cell(state: CellState, shared: &SharedStrings) -> CellValue {
    if !state.has_value {
        return CellValue::Empty;
    }
    match state.kind {
        CellKind::SharedString => atoi_simd::parse::<usize, false, false>(state.value.trim().as_bytes())
            .ok()
            .and_then(|index| shared.get(index))
            .map_or(CellValue::Empty, |s| CellValue::Text(s.to_string())),
        CellKind::InlineString | CellKind::Text => CellValue::Text(state.value),
        CellKind::Bool => CellValue::Bool(state.value.trim() == "1"),
        CellKind::Number => CellValue::Number(state.value),
    }
}

/// Convert the column letters of a cell reference to a zero-based index ("A1" → 0, "AB7" → 27).
pub fn column_index(cell_ref: &[u8]) -> Option<u32> {
    let letters = cell_ref
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .map(|b| b.to_ascii_uppercase());

    let mut index = 0u32;
    let mut count = 0;
    for letter in letters {
        index = index.checked_mul(26)?.checked_add(u32::from(letter - b'A') + 1)?;
        count += 1;
    }
    (count > 0).then(|| index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            rows
        )
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index(b"A1"), Some(0));
        assert_eq!(column_index(b"C12"), Some(2));
        assert_eq!(column_index(b"Z3"), Some(25));
        assert_eq!(column_index(b"AA3"), Some(26));
        assert_eq!(column_index(b"ab7"), Some(27));
        assert_eq!(column_index(b"12"), None);
    }

    #[test]
    fn test_keys_skip_header_and_keep_order() {
        let shared = SharedStrings::parse(br#"<sst><si><t>SKU</t></si><si><t>B-2</t></si></sst>"#).unwrap();
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Name</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>A-1</t></is></c><c r="B2" t="inlineStr"><is><t>Chair</t></is></c></row>
<row r="3"><c r="A3" t="s"><v>1</v></c></row>
<row r="4"><c r="A4"><v>1001</v></c></row>"#,
        );
        let keys = RowKeys::parse(xml.as_bytes(), &shared, 0, 1).unwrap();

        assert_eq!(keys.iter().collect::<Vec<_>>(), ["A-1", "B-2", "1001"]);
    }

    #[test]
    fn test_empty_and_falsy_keys_are_dropped() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>SKU</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>  </t></is></c></row>
<row r="3"><c r="B3"><v>7</v></c></row>
<row r="4"><c r="A4"><v>0</v></c></row>
<row r="5"><c r="A5" t="b"><v>0</v></c></row>
<row r="6"><c r="A6"/></row>
<row r="7"><c r="A7" t="inlineStr"><is><t> K-7 </t></is></c></row>"#,
        );
        let keys = RowKeys::parse(xml.as_bytes(), &SharedStrings::new(), 0, 1).unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys.get(0), Some("K-7"));
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>SKU</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>DUP</t></is></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>DUP</t></is></c></row>"#,
        );
        let keys = RowKeys::parse(xml.as_bytes(), &SharedStrings::new(), 0, 1).unwrap();
        assert_eq!(keys.iter().collect::<Vec<_>>(), ["DUP", "DUP"]);
    }

    #[test]
    fn test_cells_without_references() {
        let xml = sheet(
            r#"<row><c t="inlineStr"><is><t>SKU</t></is></c><c t="inlineStr"><is><t>Code</t></is></c></row>
<row><c t="inlineStr"><is><t>X-1</t></is></c><c t="inlineStr"><is><t>C-1</t></is></c></row>"#,
        );
        let keys = RowKeys::parse(xml.as_bytes(), &SharedStrings::new(), 1, 1).unwrap();
        assert_eq!(keys.iter().collect::<Vec<_>>(), ["C-1"]);
    }

    #[test]
    fn test_formula_string_and_entities() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>SKU</t></is></c></row>
<row r="2"><c r="A2" t="str"><f>CONCAT("R","&amp;","D")</f><v>R&amp;D</v></c></row>"#,
        );
        let keys = RowKeys::parse(xml.as_bytes(), &SharedStrings::new(), 0, 1).unwrap();
        assert_eq!(keys.get(0), Some("R&D"));
    }

    #[test]
    fn test_no_header_rows() {
        let xml = sheet(r#"<row r="1"><c r="A1"><v>5</v></c></row>"#);
        let keys = RowKeys::parse(xml.as_bytes(), &SharedStrings::new(), 0, 0).unwrap();
        assert_eq!(keys.get(0), Some("5"));
    }
}
