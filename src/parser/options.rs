//! Parsing options and configuration.

use crate::render::PageSelection;

/// Options controlling how pages are decoded and assembled.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How elements are grouped into lines
    pub line_grouping: LineGrouping,

    /// Whether to render pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to convert)
    pub pages: PageSelection,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line grouping mode.
    pub fn with_line_grouping(mut self, grouping: LineGrouping) -> Self {
        self.line_grouping = grouping;
        self
    }

    /// Group lines within `ratio` times the font size of the line's first element.
    pub fn with_tolerance(mut self, ratio: f64) -> Self {
        self.line_grouping = LineGrouping::Tolerance { ratio };
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            line_grouping: LineGrouping::Exact,
            parallel: true,
            pages: PageSelection::All,
        }
    }
}

/// How the line assembler decides two elements share a line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LineGrouping {
    /// Identical Y values only.
    #[default]
    Exact,
    /// Y values within `ratio * font_size` of the line's first element.
    Tolerance {
        /// Fraction of the font size
        ratio: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().with_tolerance(0.5).sequential();

        assert_eq!(
            options.line_grouping,
            LineGrouping::Tolerance { ratio: 0.5 }
        );
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.line_grouping, LineGrouping::Exact);
        assert!(options.parallel);
        assert!(matches!(options.pages, PageSelection::All));
    }
}
