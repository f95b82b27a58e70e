//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

use crate::model::LineRole;

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ExtractionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected during conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages that produced Markdown
    pub page_count: u32,

    /// Pages skipped as absent, blank or unselected
    pub skipped_pages: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of table rows
    pub table_row_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified line.
    pub fn add_role(&mut self, role: LineRole) {
        match role {
            LineRole::Heading(_) => self.heading_count += 1,
            LineRole::ListItem => self.list_item_count += 1,
            LineRole::TableRow => self.table_row_count += 1,
            LineRole::Paragraph => self.paragraph_count += 1,
        }
    }

    /// Count a page that produced output.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Count a page that was skipped.
    pub fn add_skipped_page(&mut self) {
        self.skipped_pages += 1;
    }

    /// Add word counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.skipped_pages += other.skipped_pages;
        self.heading_count += other.heading_count;
        self.list_item_count += other.list_item_count;
        self.table_row_count += other.table_row_count;
        self.paragraph_count += other.paragraph_count;
        self.word_count += other.word_count;
    }

    /// Total classified lines.
    pub fn line_count(&self) -> u32 {
        self.heading_count + self.list_item_count + self.table_row_count + self.paragraph_count
    }
}
