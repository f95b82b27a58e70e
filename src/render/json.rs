//! JSON dump of the classified layout.
//!
//! Useful for checking why a line came out as a heading or a table row.

use serde::Serialize;

use crate::error::Result;
use crate::model::LineRole;
use crate::parser::ClassifiedLine;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Classified lines of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Non-blank lines, top to bottom
    pub lines: Vec<LayoutLine>,
}

/// One classified line, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutLine {
    /// Index in the page's line sequence
    pub index: usize,
    /// Grouping Y coordinate
    pub y: f64,
    /// Representative font size
    pub font_size: f64,
    /// Whether the leftmost element is bold
    pub is_bold: bool,
    /// Number of elements on the line
    pub elements: usize,
    /// Assigned role
    pub role: LineRole,
    /// Concatenated text
    pub text: String,
}

impl From<&ClassifiedLine<'_>> for LayoutLine {
    fn from(item: &ClassifiedLine<'_>) -> Self {
        Self {
            index: item.index,
            y: item.line.y,
            font_size: item.line.font_size,
            is_bold: item.line.is_bold,
            elements: item.line.len(),
            role: item.role,
            text: item.line.text(),
        }
    }
}

/// Serialize page layouts to JSON.
pub fn to_json(pages: &[PageLayout], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(pages)?,
        JsonFormat::Compact => serde_json::to_string(pages)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextElement, TextLine};
    use crate::parser::StructureClassifier;

    fn layout() -> Vec<PageLayout> {
        let lines = vec![TextLine::from_sorted(
            vec![TextElement::new("Intro", "Helvetica-Bold", 18.0, 0.0, 700.0, 40.0)],
            700.0,
        )
        .unwrap()];
        let classified = StructureClassifier::default().classify_page(&lines);
        vec![PageLayout {
            number: 1,
            lines: classified.iter().map(LayoutLine::from).collect(),
        }]
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&layout(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"text\": \"Intro\""));
        assert!(json.contains("\"kind\": \"heading\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&layout(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains(r#""role":{"kind":"heading","level":2}"#));
    }
}
