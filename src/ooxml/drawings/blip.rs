use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::events::BytesStart;

/// Which `a:blip` attribute refers to the picture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlipRef {
    /// `r:embed`, the picture is stored inside the package
    Embed,
    /// `r:link`, the picture is linked
    Link,
}

/// Read the relationship id of an `a:blip` element.
///
/// `r:embed` is preferred over `r:link` when both are present.
pub fn read_blip_rel_id(e: &BytesStart<'_>) -> Result<Option<(String, BlipRef)>> {
    let mut link = None;

    for attr in e.attributes().flatten() {
        let kind = match attr.key.local_name().as_ref() {
            b"embed" => BlipRef::Embed,
            b"link" => BlipRef::Link,
            _ => continue,
        };

        let rid = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
        if rid.is_empty() {
            continue;
        }
        match kind {
            BlipRef::Embed => return Ok(Some((rid.to_string(), kind))),
            BlipRef::Link => link = Some((rid.to_string(), kind)),
        }
    }

    Ok(link)
}
