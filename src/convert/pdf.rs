//! PDF document converter implementation.

use std::path::Path;

use crate::error::Result;
use crate::parser::{LopdfSource, PageSource};

use super::DocumentConverter;

/// PDF document converter, opening files through [`LopdfSource`].
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>> {
        let source = LopdfSource::load_file(path)?;
        log::debug!("Opened {} (PDF {})", path.display(), source.version());
        Ok(Box::new(source))
    }

    fn open_bytes(&self, bytes: &[u8]) -> Result<Box<dyn PageSource>> {
        Ok(Box::new(LopdfSource::load_bytes(bytes)?))
    }
}
