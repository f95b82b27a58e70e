//! Converter registry, dispatching input files by extension.
//!
//! A [`DocumentConverter`] only knows how to open its format as a
//! [`PageSource`]; the registry runs the shared [`Pipeline`] over whatever
//! source comes back.
//!
//! # Example
//!
//! ```no_run
//! use pdfmd::convert::{ConvertOptions, ConverterRegistry};
//! use std::path::Path;
//!
//! fn main() -> pdfmd::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let result = registry.convert(Path::new("document.pdf"), &ConvertOptions::default())?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod pdf;

pub use pdf::PdfConverter;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::parser::{PageSource, ParseOptions};
use crate::pipeline::Pipeline;
use crate::render::{to_json, ExtractionStats, JsonFormat, RenderOptions};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Decoding and assembly options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Whether to collect statistics during conversion
    pub collect_stats: bool,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown format
    #[default]
    Markdown,

    /// Classified layout as JSON
    Json,
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content
    pub content: String,

    /// Extraction statistics (if collected)
    pub stats: Option<ExtractionStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String) -> Self {
        Self {
            content,
            stats: None,
            mime_type: "text/markdown",
        }
    }

    /// Set extraction statistics.
    pub fn with_stats(mut self, stats: ExtractionStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set MIME type.
    pub fn with_mime_type(mut self, mime_type: &'static str) -> Self {
        self.mime_type = mime_type;
        self
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Open a file as a page source.
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>>;

    /// Open in-memory bytes as a page source.
    fn open_bytes(&self, bytes: &[u8]) -> Result<Box<dyn PageSource>>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Run the pipeline over an opened source.
pub fn convert_source<S: PageSource + ?Sized>(
    source: &S,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let pipeline = Pipeline::new(options.parse.clone(), options.render.clone());

    match options.output_format {
        OutputFormat::Markdown => {
            let rendered = pipeline.convert_with_stats(source)?;
            let result = ConvertResult::new(rendered.content);
            if options.collect_stats {
                Ok(result.with_stats(rendered.stats))
            } else {
                Ok(result)
            }
        }
        OutputFormat::Json => {
            let layout = pipeline.layout(source)?;
            let content = to_json(&layout, JsonFormat::Pretty)?;
            Ok(ConvertResult::new(content).with_mime_type("application/json"))
        }
    }
}

/// Registry for document converters.
///
/// The registry maps file extensions to converters and provides
/// convenient methods for converting documents.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with default converters (PDF).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfConverter::new()));
        registry
    }

    /// Register a converter for all its supported extensions.
    ///
    /// A later registration for the same extension replaces the earlier one.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Find the converter for a path's extension.
    pub fn converter_for(&self, path: &Path) -> Result<Arc<dyn DocumentConverter>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

        self.get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
    }

    /// Convert a file using the appropriate converter.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let converter = self.converter_for(path)?;
        log::debug!("Converting {} with '{}'", path.display(), converter.name());
        let source = converter.open(path)?;
        convert_source(source.as_ref(), options)
    }

    /// Convert bytes using the specified extension to determine the converter.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))?;

        let source = converter.open_bytes(bytes)?;
        convert_source(source.as_ref(), options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawPage, RawTextRun};

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_stats(true)
            .with_format(OutputFormat::Json);

        assert!(options.collect_stats);
        assert_eq!(options.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("PDF"));
        assert!(!registry.supports("docx"));
        assert_eq!(registry.supported_extensions(), vec!["pdf"]);
    }

    #[test]
    fn test_registry_get_by_extension() {
        let registry = ConverterRegistry::with_defaults();
        let converter = registry.get_by_extension("pdf");
        assert!(converter.is_some());
        assert_eq!(converter.unwrap().name(), "pdf");
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.get_by_name("PDF").is_some());
        assert!(registry.get_by_name("docx").is_none());
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let registry = ConverterRegistry::with_defaults();
        let err = registry
            .convert(Path::new("notes.docx"), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "docx"));

        let err = registry
            .convert(Path::new("README"), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_convert_source_stats_and_json() {
        // "Hi" shifted down by the default glyph offset
        let pages = vec![RawPage::new(
            1,
            vec![RawTextRun::new("+L", "Helvetica", 10.0, 0.0, 700.0, 10.0)],
        )];

        let markdown = convert_source(pages.as_slice(), &ConvertOptions::new().with_stats(true))
            .unwrap();
        assert_eq!(markdown.content, "Hi\n\n\n\n");
        assert_eq!(markdown.stats.unwrap().paragraph_count, 1);

        let json = convert_source(
            pages.as_slice(),
            &ConvertOptions::new().with_format(OutputFormat::Json),
        )
        .unwrap();
        assert_eq!(json.mime_type, "application/json");
        assert!(json.content.contains("\"text\": \"Hi\""));
    }
}
