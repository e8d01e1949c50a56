//! Relationship parts and the image reference table.
//!
//! A `.rels` part maps short reference ids (`rId1`, `rId2`, ...) to target
//! parts. Drawings refer to their pictures only through these ids, so the
//! drawing's relationship part is turned into an [`ImageRelationships`] table
//! before any anchor is classified.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{relationship_type, target_mode};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a relative part reference or external URL
    target_ref: String,

    /// Directory of the source part, used to resolve relative targets
    base_uri: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference exactly as written in the part.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Get the last path segment of the target, e.g. "image1.png" for "../media/image1.png".
    pub fn target_filename(&self) -> &str {
        let trimmed = self.target_ref.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        }
    }

    /// Get the absolute target partname for internal relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OoxmlError::Format(format!(
                "cannot resolve external relationship '{}' to a part",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OoxmlError::Format)
    }

    /// Check whether the relationship points at a raster image.
    ///
    /// A target path containing "image" qualifies (e.g. `../media/image1.png`),
    /// as does the DrawingML image relationship type.
    pub fn is_image(&self) -> bool {
        memchr::memmem::find(self.target_ref.as_bytes(), b"image").is_some()
            || self.reltype == relationship_type::IMAGE
    }
}

/// Collection of relationships parsed from a single `.rels` part, in document order.
#[derive(Debug, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` part.
    ///
    /// `base_uri` is the directory of the source part (for example
    /// `/xl/drawings` for `/xl/drawings/_rels/drawing1.xml.rels`).
    /// Elements missing an `Id` or a `Target` are skipped.
    pub fn parse(rels_xml: &[u8], base_uri: &str) -> Result<Self> {
        let mut rels = Vec::new();
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship"
                        && let Some(rel) = Self::read_relationship(e, base_uri)?
                    {
                        rels.push(rel);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(format!("Rels parse error: {}", e))),
                _ => {},
            }
        }

        Ok(Self { rels })
    }

    fn read_relationship(e: &BytesStart<'_>, base_uri: &str) -> Result<Option<Relationship>> {
        let mut r_id = None;
        let mut reltype = String::new();
        let mut target_ref = None;
        let mut is_external = false;

        for attr in e.attributes().flatten() {
            let value = attr_value(&attr.value)?;
            match attr.key.local_name().as_ref() {
                b"Id" => r_id = Some(value),
                b"Type" => reltype = value,
                b"Target" => target_ref = Some(value),
                b"TargetMode" => is_external = value == target_mode::EXTERNAL,
                _ => {},
            }
        }

        Ok(match (r_id, target_ref) {
            (Some(r_id), Some(target_ref)) if !r_id.is_empty() && !target_ref.is_empty() => {
                Some(Relationship {
                    r_id,
                    reltype,
                    target_ref,
                    base_uri: base_uri.to_string(),
                    is_external,
                })
            },
            _ => None,
        })
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// Get the first relationship of a specific type.
    pub fn first_of_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.reltype == reltype)
    }

    /// Get an iterator over all relationships in document order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

/// A resolved image relationship: reference id to media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEntry {
    /// Reference id used by the drawing (e.g., "rId3")
    pub r_id: String,
    /// Last path segment of the target (e.g., "image3.png")
    pub media_name: String,
    /// Full part name of the media inside the package
    pub partname: PackURI,
}

/// Reference id to media file table for one drawing.
///
/// Built once per extraction, before any anchor is classified, and read-only afterwards.
#[derive(Debug, Default)]
pub struct ImageRelationships {
    entries: HashMap<String, RelationshipEntry>,
}

impl ImageRelationships {
    /// Keep only internal image relationships from a parsed `.rels` part.
    ///
    /// When an id occurs twice the later definition wins.
    pub fn from_relationships(rels: &Relationships) -> Self {
        let mut entries = HashMap::with_capacity(rels.len());

        for rel in rels.iter().filter(|rel| rel.is_image()) {
            if rel.is_external() {
                log::debug!("Skipping external image relationship {}", rel.r_id());
                continue;
            }
            match rel.target_partname() {
                Ok(partname) => {
                    entries.insert(
                        rel.r_id().to_string(),
                        RelationshipEntry {
                            r_id: rel.r_id().to_string(),
                            media_name: rel.target_filename().to_string(),
                            partname,
                        },
                    );
                },
                Err(e) => log::debug!("Skipping relationship {}: {}", rel.r_id(), e),
            }
        }

        Self { entries }
    }

    /// Parse a drawing's `.rels` part straight into an image table.
    pub fn parse(rels_xml: &[u8], base_uri: &str) -> Result<Self> {
        Ok(Self::from_relationships(&Relationships::parse(rels_xml, base_uri)?))
    }

    /// Look up the media file for a reference id.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&RelationshipEntry> {
        self.entries.get(r_id)
    }

    /// Check whether a reference id resolves to an image.
    #[inline]
    pub fn contains(&self, r_id: &str) -> bool {
        self.entries.contains_key(r_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode and unescape a raw attribute value.
pub(crate) fn attr_value(raw: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(raw)?;
    quick_xml::escape::unescape(text)
        .map(|value| value.into_owned())
        .map_err(|e| OoxmlError::Xml(e.to_string()))
}
