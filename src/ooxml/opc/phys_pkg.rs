//! Provides access to a physical spreadsheet package (ZIP file).
//!
//! The reader indexes the whole central directory when it is opened, so every
//! later lookup is a hash lookup followed by decompression of a single member.
//! Readers are cheap to clone: clones share the parsed central directory and
//! carry their own cursor over the same borrowed bytes, which lets independent
//! members be decompressed concurrently.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::pattern;
use std::io::{Cursor, Read};
use zip::ZipArchive;
use zip::result::ZipError;

/// Upper bound on the buffer reserved up front for a member.
///
/// The declared size comes from the central directory and is not trusted;
/// larger members still read fully, growing the buffer as they go.
const MAX_PREALLOCATION: u64 = 1 << 24;

/// Physical package reader over an in-memory ZIP archive.
#[derive(Clone, Debug)]
pub struct PhysPkgReader<'data> {
    /// The underlying ZIP archive with its indexed central directory
    archive: ZipArchive<Cursor<&'data [u8]>>,
}

impl<'data> PhysPkgReader<'data> {
    /// Open a package from a byte slice.
    ///
    /// # Errors
    /// Returns [`OoxmlError::Format`] if the bytes are not a readable ZIP archive.
    pub fn new(data: &'data [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
            OoxmlError::Format(format!("package is not a readable ZIP archive: {}", e))
        })?;
        Ok(Self { archive })
    }

    /// Get the binary content for a part.
    ///
    /// # Errors
    /// Returns [`OoxmlError::PartNotFound`] if the package has no such member.
    pub fn blob_for(&mut self, pack_uri: &PackURI) -> Result<Vec<u8>> {
        self.blob_for_member(pack_uri.membername())
    }

    /// Get the binary content for a ZIP member name (no leading slash).
    pub fn blob_for_member(&mut self, membername: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(membername) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(OoxmlError::PartNotFound(membername.to_string()));
            },
            Err(e) => return Err(OoxmlError::Zip(e)),
        };

        let mut blob = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
        file.read_to_end(&mut blob)?;
        Ok(blob)
    }

    /// Get the content of a part as text, with any UTF-8 byte order mark removed.
    pub fn text_for(&mut self, pack_uri: &PackURI) -> Result<String> {
        let blob = self.blob_for(pack_uri)?;
        let text = String::from_utf8(blob).map_err(|e| e.utf8_error())?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    /// Get the content of a part, or `None` if the package does not contain it.
    pub fn optional_blob_for(&mut self, pack_uri: &PackURI) -> Result<Option<Vec<u8>>> {
        match self.blob_for(pack_uri) {
            Ok(blob) => Ok(Some(blob)),
            Err(OoxmlError::PartNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check if a specific part exists in the package.
    #[inline]
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.archive.index_for_name(pack_uri.membername()).is_some()
    }

    /// Get the number of members in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the package is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// List all member names in the package, excluding directory entries.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names().filter(|name| !name.ends_with('/'))
    }

    /// Find every part whose member name matches a wildcard pattern.
    ///
    /// Results are ordered by numeric suffix, then by name, so that
    /// `drawing2.xml` sorts before `drawing10.xml` regardless of the order
    /// in which the archive stores them.
    pub fn find_parts(&self, member_pattern: &str) -> Vec<PackURI> {
        let mut parts: Vec<PackURI> = self
            .member_names()
            .filter(|name| pattern::matches(member_pattern, name))
            .map(PackURI::from_membername)
            .collect();

        parts.sort_by(|a, b| {
            a.idx()
                .unwrap_or(u32::MAX)
                .cmp(&b.idx().unwrap_or(u32::MAX))
                .then_with(|| a.as_str().cmp(b.as_str()))
        });
        parts
    }

    /// Find the first part matching a wildcard pattern, see [`Self::find_parts`].
    pub fn find_first_part(&self, member_pattern: &str) -> Option<PackURI> {
        self.find_parts(member_pattern).into_iter().next()
    }
}
