//! Decoded, positioned text.

use serde::{Deserialize, Serialize};

/// A decoded run of text with its font and position on the page.
///
/// Elements are never empty: runs that decode to nothing are discarded
/// before an element is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    /// The text content
    pub text: String,
    /// Font name
    pub font: String,
    /// Font size in document units
    pub size: f64,
    /// X position (left edge)
    pub x: f64,
    /// Y position (baseline)
    pub y: f64,
    /// Width of the text
    pub width: f64,
    /// Height, if known
    pub height: Option<f64>,
}

impl TextElement {
    /// Create a new text element.
    pub fn new(
        text: impl Into<String>,
        font: impl Into<String>,
        size: f64,
        x: f64,
        y: f64,
        width: f64,
    ) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
            x,
            y,
            width,
            height: None,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether the font name suggests a bold face.
    pub fn is_bold(&self) -> bool {
        let font = self.font.to_lowercase();
        font.contains("bold") || font.contains("black") || font.contains("heavy")
    }
}
