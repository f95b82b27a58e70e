//! # pdfmd
//!
//! Layout-based PDF to Markdown conversion.
//!
//! Positioned text runs are decoded, grouped into lines by their baseline,
//! and each line is classified as a heading, list item, table row or
//! paragraph from font size, weight, leading markers and horizontal gaps.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdfmd::Result<()> {
//!     let markdown = pdfmd::to_markdown("document.pdf")?;
//!     println!("{}", markdown);
//!     Ok(())
//! }
//! ```
//!
//! Pages that do not come from a PDF can be fed in directly:
//!
//! ```
//! use pdfmd::{IdentityDecoder, Pdfmd, RawPage, RawTextRun};
//! use std::sync::Arc;
//!
//! let pages = vec![RawPage::new(
//!     1,
//!     vec![RawTextRun::new("Quarterly report", "Helvetica-Bold", 22.0, 72.0, 720.0, 180.0)],
//! )];
//! let markdown = Pdfmd::new()
//!     .with_decoder(Arc::new(IdentityDecoder))
//!     .render_pages(&pages)
//!     .unwrap();
//! assert_eq!(markdown, "# Quarterly report\n\n\n");
//! ```

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, ConverterRegistry, DocumentConverter, OutputFormat,
    PdfConverter,
};
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_file, PdfHeader};
pub use error::{Error, Result};
pub use model::{LineRole, RawPage, RawTextRun, TextElement, TextLine};
pub use parser::{
    ClassifierConfig, DecoderRegistry, GlyphDecoder, IdentityDecoder, LineGrouping, LopdfSource,
    OffsetDecoder, PageSource, ParseOptions, StructureClassifier,
};
pub use pipeline::Pipeline;
pub use render::{
    ExtractionStats, HeaderSeparator, JsonFormat, PageLayout, PageSelection, RenderOptions,
    RenderResult,
};

use std::path::Path;
use std::sync::Arc;

/// Convert a PDF file to Markdown with default options.
///
/// # Example
///
/// ```no_run
/// use pdfmd::to_markdown;
///
/// let markdown = to_markdown("document.pdf").unwrap();
/// std::fs::write("document.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Pdfmd::new().convert(path)
}

/// Convert a PDF file to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfmd::{to_markdown_with_options, HeaderSeparator, PageSelection, ParseOptions, RenderOptions};
///
/// let parse = ParseOptions::new().with_pages(PageSelection::Range(1..=3));
/// let render = RenderOptions::new().with_header_separator(HeaderSeparator::EachTable);
/// let markdown = to_markdown_with_options("document.pdf", &parse, &render).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    parse: &ParseOptions,
    render: &RenderOptions,
) -> Result<String> {
    let source = LopdfSource::load_file(path)?;
    Pipeline::new(parse.clone(), render.clone()).convert(&source)
}

/// Render already extracted pages with default options.
pub fn render_pages(pages: &[RawPage]) -> Result<String> {
    Pipeline::default().render_document(pages)
}

/// Dump the classified layout of a PDF file as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let source = LopdfSource::load_file(path)?;
    let layout = Pipeline::default().layout(&source)?;
    render::to_json(&layout, format)
}

/// Builder for converting documents.
///
/// # Example
///
/// ```no_run
/// use pdfmd::{HeaderSeparator, PageSelection, Pdfmd};
///
/// let markdown = Pdfmd::new()
///     .with_pages(PageSelection::Range(1..=10))
///     .with_tolerance(0.25)
///     .with_header_separator(HeaderSeparator::EachTable)
///     .convert("document.pdf")?;
/// # Ok::<(), pdfmd::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Pdfmd {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    decoder: Option<Arc<dyn GlyphDecoder>>,
}

impl Pdfmd {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable parallel page rendering.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Group elements whose baselines differ by less than `ratio` of the
    /// font size.
    pub fn with_tolerance(mut self, ratio: f64) -> Self {
        self.parse_options = self.parse_options.with_tolerance(ratio);
        self
    }

    /// Set the page separator.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_page_separator(separator);
        self
    }

    /// Set the table header separator placement.
    pub fn with_header_separator(mut self, placement: HeaderSeparator) -> Self {
        self.render_options = self.render_options.with_header_separator(placement);
        self
    }

    /// Set classification thresholds.
    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.render_options = self.render_options.with_classifier_config(config);
        self
    }

    /// Use a custom glyph decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn GlyphDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Build the configured pipeline.
    pub fn pipeline(&self) -> Pipeline {
        let pipeline = Pipeline::new(self.parse_options.clone(), self.render_options.clone());
        match &self.decoder {
            Some(decoder) => pipeline.with_decoder(Arc::clone(decoder)),
            None => pipeline,
        }
    }

    /// Convert a PDF file.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let source = LopdfSource::load_file(path)?;
        self.pipeline().convert(&source)
    }

    /// Convert a PDF file, returning statistics as well.
    pub fn convert_with_stats<P: AsRef<Path>>(&self, path: P) -> Result<RenderResult> {
        let source = LopdfSource::load_file(path)?;
        self.pipeline().convert_with_stats(&source)
    }

    /// Convert PDF bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<String> {
        let source = LopdfSource::load_bytes(data)?;
        self.pipeline().convert(&source)
    }

    /// Render already extracted pages.
    pub fn render_pages(&self, pages: &[RawPage]) -> Result<String> {
        self.pipeline().render_document(pages)
    }
}

impl std::fmt::Debug for Pdfmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdfmd")
            .field("parse_options", &self.parse_options)
            .field("render_options", &self.render_options)
            .field("custom_decoder", &self.decoder.is_some())
            .finish()
    }
}
