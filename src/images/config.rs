//! Configuration types for row image extraction.
//!
//! This module defines the options that control how row keys are read and
//! how extracted media is materialized, and the token used to cancel a run.

use crate::ooxml::error::{OoxmlError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a caller and a running extraction.
///
/// The extractor checks the token between rows and between images; a
/// cancelled run returns [`OoxmlError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone of the token observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Return `Err(OoxmlError::Cancelled)` if cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(OoxmlError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Configuration options for row image extraction.
///
/// # Examples
///
/// ```rust
/// use sheetpix::images::ExtractOptions;
///
/// // Create with defaults: keys in column A, one header row
/// let options = ExtractOptions::default();
///
/// // Or customize
/// let options = ExtractOptions::new()
///     .with_key_column(1)
///     .with_header_rows(2)
///     .with_parallel(false);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Zero-based column holding the row keys
    pub key_column: u32,
    /// Number of leading sheet rows that are not data rows
    pub header_rows: u32,
    /// Whether media of distinct images is decompressed concurrently
    pub parallel: bool,
    /// Whether a package without a drawing yields an empty result instead of an error
    pub missing_drawing_is_empty: bool,
    /// Cancellation token checked between rows and between images
    pub cancel: Option<CancelToken>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            key_column: 0,
            header_rows: 1,
            parallel: true,
            missing_drawing_is_empty: false,
            cancel: None,
        }
    }
}

impl ExtractOptions {
    /// Create a new `ExtractOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero-based column holding the row keys.
    #[inline]
    pub fn with_key_column(mut self, column: u32) -> Self {
        self.key_column = column;
        self
    }

    /// Set the number of header rows above the first data row.
    #[inline]
    pub fn with_header_rows(mut self, rows: u32) -> Self {
        self.header_rows = rows;
        self
    }

    /// Set whether media is materialized on the rayon thread pool.
    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Treat a package without any drawing as "zero images" rather than a FormatError.
    #[inline]
    pub fn with_missing_drawing_as_empty(mut self, empty: bool) -> Self {
        self.missing_drawing_is_empty = empty;
        self
    }

    /// Attach a cancellation token.
    #[inline]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Check the attached cancellation token, if any.
    #[inline]
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}
