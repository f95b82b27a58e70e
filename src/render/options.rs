//! Rendering options and configuration.

use std::ops::RangeInclusive;

use crate::parser::ClassifierConfig;

/// Marker written between consecutive pages.
pub const DEFAULT_PAGE_SEPARATOR: &str = "---";

/// Options for rendering classified lines.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Rule written after every non-blank page except the last; empty disables it
    pub page_separator: String,

    /// Where table header separators are written
    pub header_separator: HeaderSeparator,

    /// Classification thresholds
    pub classifier: ClassifierConfig,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page separator.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Set the header separator placement.
    pub fn with_header_separator(mut self, placement: HeaderSeparator) -> Self {
        self.header_separator = placement;
        self
    }

    /// Set classification thresholds.
    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_separator: DEFAULT_PAGE_SEPARATOR.to_string(),
            header_separator: HeaderSeparator::FirstPageLine,
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Placement of the `| --- |` row under table headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderSeparator {
    /// Only when a table row is the very first line of the page.
    ///
    /// Tables further down the page get no separator row, so most Markdown
    /// viewers will not render them as tables.
    #[default]
    FirstPageLine,
    /// After the first row of every contiguous run of table rows.
    EachTable,
}

/// Page selection.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(format!("Invalid page range: {}", s));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(parse_page(start)?..=parse_page(end)?),
                None => pages.push(parse_page(part)?),
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(format!("Invalid page number: {:?}", s.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_page_separator("***")
            .with_header_separator(HeaderSeparator::EachTable);

        assert_eq!(options.page_separator, "***");
        assert_eq!(options.header_separator, HeaderSeparator::EachTable);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.page_separator, "---");
        assert_eq!(options.header_separator, HeaderSeparator::FirstPageLine);
        assert_eq!(options.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes(100));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));
        assert!(pages.includes(3));
    }

    #[test]
    fn test_page_selection_parse() {
        assert!(matches!(
            PageSelection::parse("all").unwrap(),
            PageSelection::All
        ));
        assert!(matches!(
            PageSelection::parse("1-10").unwrap(),
            PageSelection::Range(_)
        ));

        match PageSelection::parse("10,1,3,5-7,3").unwrap() {
            PageSelection::Pages(pages) => assert_eq!(pages, vec![1, 3, 5, 6, 7, 10]),
            other => panic!("Expected Pages variant, got {:?}", other),
        }
    }

    #[test]
    fn test_page_selection_parse_errors() {
        assert!(PageSelection::parse("0").is_err());
        assert!(PageSelection::parse("5-2").is_err());
        assert!(PageSelection::parse("a-b").is_err());
        assert!(PageSelection::parse("1,,2").is_err());
    }
}
