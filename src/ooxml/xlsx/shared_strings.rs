//! Shared strings table for Excel files.
//!
//! Excel stores most cell text once in `xl/sharedStrings.xml` and refers to it
//! by index from the worksheet. Rich-text items are flattened to their plain
//! text; phonetic runs (`<rPh>`) are not part of the cell value and are skipped.

use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};

// Performance: Pre-allocate typical capacities to reduce reallocations
const INITIAL_STRINGS_CAPACITY: usize = 1024;

/// Shared strings table.
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse shared strings from `xl/sharedStrings.xml` content.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut strings = Vec::with_capacity(INITIAL_STRINGS_CAPACITY);
        let mut reader = Reader::from_reader(xml);

        let mut current: Option<String> = None;
        let mut in_text = false;
        let mut phonetic_depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => phonetic_depth += 1,
                    b"t" => in_text = phonetic_depth == 0,
                    _ => {},
                },
                Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() == b"si" {
                        strings.push(String::new());
                    }
                },
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"si" => {
                        if let Some(text) = current.take() {
                            strings.push(text);
                        }
                    },
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_text = false,
                    _ => {},
                },
                Ok(Event::Text(ref t)) => {
                    if in_text && let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(t));
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if in_text && let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(t));
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if in_text && let Some(text) = current.as_mut() {
                        push_entity(text, r)?;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OoxmlError::Xml(format!("Shared strings parse error: {}", e)));
                },
                _ => {},
            }
        }

        Ok(Self { strings })
    }

    /// Get a string by its index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the number of strings in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Append the text of an entity or character reference (`&amp;`, `&#10;`).
pub(crate) fn push_entity(text: &mut String, r: &BytesRef<'_>) -> Result<()> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| OoxmlError::Xml(e.to_string()))?
    {
        text.push(ch);
        return Ok(());
    }

    let name = r.decode().map_err(|e| OoxmlError::Xml(e.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(value) => text.push_str(value),
        None => {
            // Unknown entities are kept verbatim
            text.push('&');
            text.push_str(&name);
            text.push(';');
        },
    }
    Ok(())
}
