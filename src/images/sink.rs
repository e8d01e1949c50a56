//! Writing classified images to a directory.

use crate::images::result::ClassifiedImage;
use crate::ooxml::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Turn a derived output name into a single file name.
///
/// Row keys are free text, so path separators are replaced with `_` and a
/// name consisting only of dots is prefixed with `_`.
pub fn safe_file_name(name: &str) -> String {
    let mut safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if safe.chars().all(|c| c == '.') {
        safe.insert(0, '_');
    }
    safe
}

/// Writes each image to `<dir>/<output name>`.
///
/// Duplicate row keys produce identical output names; the later image
/// overwrites the earlier file.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
}

impl DirectorySink {
    /// Create the sink, creating the directory if needed.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// Write one image and return its path.
    pub fn write(&mut self, image: &ClassifiedImage) -> Result<PathBuf> {
        let path = self.dir.join(safe_file_name(&image.output_name));
        fs::write(&path, &image.payload)?;
        self.written += 1;
        log::debug!("Wrote {} ({} bytes)", path.display(), image.payload.len());
        Ok(path)
    }

    /// Number of images written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.written
    }
}
