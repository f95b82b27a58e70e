//! Undecoded input supplied by a page source.

use serde::{Deserialize, Serialize};

/// One positioned run of text exactly as the page source produced it.
///
/// `text` holds raw character codes (one `char` per code), not display text.
/// A [`GlyphDecoder`](crate::parser::GlyphDecoder) turns it into Unicode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextRun {
    /// Raw character codes in source encoding
    pub text: String,
    /// Font name (e.g., "Helvetica-Bold")
    pub font: String,
    /// Font size in document units
    pub size: f64,
    /// X position
    pub x: f64,
    /// Y position (baseline)
    pub y: f64,
    /// Advance width of the run
    pub width: f64,
    /// Height, when the source knows it
    pub height: Option<f64>,
}

impl RawTextRun {
    /// Create a run without height information.
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

    /// Set the run height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Whether every coordinate is a finite number.
    pub fn has_finite_geometry(&self) -> bool {
        self.size.is_finite() && self.x.is_finite() && self.y.is_finite() && self.width.is_finite()
    }
}

/// The runs of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Runs on the page; `None` when the page has no content at all
    pub runs: Option<Vec<RawTextRun>>,
}

impl RawPage {
    /// Create a page with content.
    pub fn new(number: u32, runs: Vec<RawTextRun>) -> Self {
        Self {
            number,
            runs: Some(runs),
        }
    }

    /// Create a page whose content is absent.
    pub fn absent(number: u32) -> Self {
        Self { number, runs: None }
    }

    /// Check if the page has no content object.
    pub fn is_absent(&self) -> bool {
        self.runs.is_none()
    }
}
