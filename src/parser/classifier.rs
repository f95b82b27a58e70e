//! Structure classification: headings, list items and table rows.
//!
//! A line is judged on its own geometry and typography plus the font size of
//! the line before it. Rules are tried in a fixed order (heading, list item,
//! table row) and anything left over is a paragraph, so classification
//! always terminates with a role.

use serde::Serialize;

use crate::model::{LineRole, TextLine};

/// Characters that open an unordered list item.
pub const BULLET_MARKERS: &[char] = &['•', '◦', '▪', '‣', '●', '–', '-'];

/// Thresholds used by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Lines larger than this are headings
    pub heading_min_size: f64,

    /// Bold lines larger than this are headings
    pub bold_heading_min_size: f64,

    /// A line this much larger than its predecessor is a heading
    pub size_jump: f64,

    /// Minimum size for heading levels 1 through 4; smaller headings are level 5
    pub level_sizes: [f64; 4],

    /// Minimum horizontal gap between adjacent elements of a table row
    pub table_min_gap: f64,
}

impl ClassifierConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plain heading size threshold.
    pub fn with_heading_min_size(mut self, size: f64) -> Self {
        self.heading_min_size = size;
        self
    }

    /// Set the bold heading size threshold.
    pub fn with_bold_heading_min_size(mut self, size: f64) -> Self {
        self.bold_heading_min_size = size;
        self
    }

    /// Set the size jump that promotes a line to a heading.
    pub fn with_size_jump(mut self, jump: f64) -> Self {
        self.size_jump = jump;
        self
    }

    /// Set the minimum gap between table columns.
    pub fn with_table_min_gap(mut self, gap: f64) -> Self {
        self.table_min_gap = gap;
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            heading_min_size: 14.0,
            bold_heading_min_size: 12.0,
            size_jump: 2.0,
            level_sizes: [20.0, 18.0, 16.0, 14.0],
            table_min_gap: 5.0,
        }
    }
}

/// A line together with its role and position on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedLine<'a> {
    /// Index of the line in the page's line sequence
    pub index: usize,
    /// The classified line
    pub line: &'a TextLine,
    /// Assigned role
    pub role: LineRole,
}

/// Assigns a [`LineRole`] to each line.
#[derive(Debug, Clone, Default)]
pub struct StructureClassifier {
    config: ClassifierConfig,
}

impl StructureClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one line given the previous non-blank line, if any.
    pub fn classify(&self, line: &TextLine, prev: Option<&TextLine>) -> LineRole {
        if self.is_heading(line, prev) {
            LineRole::Heading(self.heading_level(line.font_size))
        } else if is_list_item(&line.text()) {
            LineRole::ListItem
        } else if self.is_table_row(line) {
            LineRole::TableRow
        } else {
            LineRole::Paragraph
        }
    }

    /// Classify every non-blank line of a page.
    ///
    /// The previous line carried into each step is the last non-blank line
    /// seen, so blank lines neither receive a role nor break a size jump.
    pub fn classify_page<'a>(&self, lines: &'a [TextLine]) -> Vec<ClassifiedLine<'a>> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_blank())
            .scan(None, |prev: &mut Option<&'a TextLine>, (index, line)| {
                let role = self.classify(line, *prev);
                *prev = Some(line);
                Some(ClassifiedLine { index, line, role })
            })
            .collect()
    }

    /// Heading test: large text, bold mid-size text, or a jump in size.
    pub fn is_heading(&self, line: &TextLine, prev: Option<&TextLine>) -> bool {
        let cfg = &self.config;
        if line.font_size > cfg.heading_min_size {
            return true;
        }
        if line.is_bold && line.font_size > cfg.bold_heading_min_size {
            return true;
        }
        matches!(prev, Some(p) if line.font_size > p.font_size + cfg.size_jump)
    }

    /// Heading level (1-5) for a font size.
    pub fn heading_level(&self, font_size: f64) -> u8 {
        self.config
            .level_sizes
            .iter()
            .position(|&min| font_size >= min)
            .map_or(5, |i| i as u8 + 1)
    }

    /// Table test: two or more elements, each pair separated by a clear gap.
    pub fn is_table_row(&self, line: &TextLine) -> bool {
        if line.elements.len() < 2 {
            return false;
        }

        let spaced = line
            .elements
            .windows(2)
            .all(|pair| pair[1].x - pair[0].right() >= self.config.table_min_gap);

        if spaced {
            log::trace!("Line at y={} is a table row", line.y);
        }
        spaced
    }
}

/// Check whether text opens with a bullet or an `N.` style marker.
pub fn is_list_item(text: &str) -> bool {
    list_marker_len(text.trim()).is_some()
}

/// Text of a list item with its marker removed.
///
/// Returns the trimmed text unchanged when there is no marker.
pub fn list_item_body(text: &str) -> &str {
    let trimmed = text.trim();
    match list_marker_len(trimmed) {
        Some(len) => trimmed[len..].trim(),
        None => trimmed,
    }
}

/// Byte length of the list marker at the start of already-trimmed text.
fn list_marker_len(trimmed: &str) -> Option<usize> {
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    if BULLET_MARKERS.contains(&first) {
        return Some(first.len_utf8());
    }

    // "1.", "a.", "A." followed by at least one more character
    let second = chars.next()?;
    if second == '.' && first.is_ascii_alphanumeric() && chars.next().is_some() {
        return Some(2);
    }

    None
}
