//! Assembled lines and their roles.

use serde::{Deserialize, Serialize};

use super::TextElement;

/// A group of elements sharing one page line, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// The elements in this line, sorted by X position
    pub elements: Vec<TextElement>,
    /// Y position used as the grouping key
    pub y: f64,
    /// Font size of the leftmost element
    pub font_size: f64,
    /// Whether the leftmost element uses a bold font
    pub is_bold: bool,
}

impl TextLine {
    /// Build a line from elements already sorted by X.
    ///
    /// Returns `None` for an empty group.
    pub fn from_sorted(elements: Vec<TextElement>, y: f64) -> Option<Self> {
        let first = elements.first()?;
        let font_size = first.size;
        let is_bold = first.is_bold();
        Some(Self {
            elements,
            y,
            font_size,
            is_bold,
        })
    }

    /// Concatenated text of all elements, without separators.
    pub fn text(&self) -> String {
        self.elements.iter().map(|e| e.text.as_str()).collect()
    }

    /// Check if the line holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.elements.iter().all(|e| e.text.trim().is_empty())
    }

    /// Number of elements on the line.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the line has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Semantic role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum LineRole {
    /// Heading with level 1-5
    Heading(u8),
    /// Bulleted or numbered list item
    ListItem,
    /// Row of a column-aligned table
    TableRow,
    /// Plain paragraph text
    Paragraph,
}
