//! Glyph decoding: raw character codes to display text.
//!
//! Some producers write glyph indices into content strings instead of
//! character codes. For the fonts seen so far the index sits a fixed 29 below
//! the intended code point, so [`OffsetDecoder`] is the fallback for every
//! font. Fonts with a known mapping can be routed to another strategy through
//! [`DecoderRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use unicode_general_category::{get_general_category, GeneralCategory};

/// Default shift from glyph index to code point.
pub const DEFAULT_GLYPH_OFFSET: u32 = 29;

/// Strategy for turning the raw codes of one run into display text.
///
/// Implementations never fail: codes that cannot be mapped are dropped, and
/// an empty result means the run should be skipped.
pub trait GlyphDecoder: Send + Sync {
    /// Decode `raw` shown with the font named `font`.
    fn decode(&self, font: &str, raw: &str) -> String;
}

/// Adds a fixed offset to every code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetDecoder {
    offset: u32,
}

impl OffsetDecoder {
    /// Create a decoder with a custom offset.
    pub fn new(offset: u32) -> Self {
        Self { offset }
    }

    /// Offset applied to each code point.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for OffsetDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_GLYPH_OFFSET)
    }
}

impl GlyphDecoder for OffsetDecoder {
    fn decode(&self, _font: &str, raw: &str) -> String {
        let mut result = String::with_capacity(raw.len());
        for c in raw.chars() {
            let shifted = (c as u32)
                .checked_add(self.offset)
                .and_then(char::from_u32);
            if let Some(decoded) = shifted {
                push_displayable(&mut result, decoded);
            }
        }
        result
    }
}

/// Keeps code points as they are, applying only the printable filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityDecoder;

impl GlyphDecoder for IdentityDecoder {
    fn decode(&self, _font: &str, raw: &str) -> String {
        let mut result = String::with_capacity(raw.len());
        for c in raw.chars() {
            push_displayable(&mut result, c);
        }
        result
    }
}

/// Routes runs to a decoder by font name, falling back to a default.
///
/// Font names are matched case-insensitively and exactly.
#[derive(Clone)]
pub struct DecoderRegistry {
    by_font: HashMap<String, Arc<dyn GlyphDecoder>>,
    fallback: Arc<dyn GlyphDecoder>,
}

impl DecoderRegistry {
    /// Create a registry that sends every font to `fallback`.
    pub fn new(fallback: Arc<dyn GlyphDecoder>) -> Self {
        Self {
            by_font: HashMap::new(),
            fallback,
        }
    }

    /// Register a decoder for one font.
    pub fn register(&mut self, font: &str, decoder: Arc<dyn GlyphDecoder>) {
        self.by_font.insert(font.to_lowercase(), decoder);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_font(mut self, font: &str, decoder: Arc<dyn GlyphDecoder>) -> Self {
        self.register(font, decoder);
        self
    }

    /// Number of fonts with a dedicated decoder.
    pub fn len(&self) -> usize {
        self.by_font.len()
    }

    /// Check if only the fallback is configured.
    pub fn is_empty(&self) -> bool {
        self.by_font.is_empty()
    }

    fn decoder_for(&self, font: &str) -> &dyn GlyphDecoder {
        self.by_font
            .get(&font.to_lowercase())
            .map(|d| d.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new(Arc::new(OffsetDecoder::default()))
    }
}

impl GlyphDecoder for DecoderRegistry {
    fn decode(&self, font: &str, raw: &str) -> String {
        self.decoder_for(font).decode(font, raw)
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fonts: Vec<&str> = self.by_font.keys().map(|k| k.as_str()).collect();
        fonts.sort_unstable();
        f.debug_struct("DecoderRegistry")
            .field("fonts", &fonts)
            .finish_non_exhaustive()
    }
}

fn push_displayable(out: &mut String, c: char) {
    if is_printable(c) {
        out.push(c);
    } else if c == '\n' || c == '\r' {
        out.push('\n');
    }
}

/// Printable: letters, marks, numbers, punctuation, symbols and the ASCII space.
pub fn is_printable(c: char) -> bool {
    use GeneralCategory::*;

    if c == ' ' {
        return true;
    }
    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | NonspacingMark
            | SpacingMark
            | EnclosingMark
            | DecimalNumber
            | LetterNumber
            | OtherNumber
            | ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shift text down by the default offset, the way affected producers store it.
    fn encode(text: &str) -> String {
        text.chars()
            .map(|c| char::from_u32(c as u32 - DEFAULT_GLYPH_OFFSET).unwrap())
            .collect()
    }

    #[test]
    fn test_offset_recovers_text() {
        let decoder = OffsetDecoder::default();
        assert_eq!(decoder.decode("F1", &encode("Hello, World")), "Hello, World");
    }

    #[test]
    fn test_offset_raw_codes() {
        // 'D' (0x44) is 0x27 in glyph space
        assert_eq!(OffsetDecoder::default().decode("F1", "\u{27}"), "D");
        // 0x03 + 29 = space
        assert_eq!(OffsetDecoder::default().decode("F1", "\u{3}"), " ");
    }

    #[test]
    fn test_non_printable_dropped() {
        let decoder = OffsetDecoder::new(0);
        assert_eq!(decoder.decode("F1", "a\u{7}b\u{200B}c\u{E000}"), "abc");
        assert_eq!(decoder.decode("F1", "\u{A0}x\t"), "x");
    }

    #[test]
    fn test_line_breaks_become_newline() {
        let decoder = IdentityDecoder;
        assert_eq!(decoder.decode("F1", "a\rb\nc"), "a\nb\nc");
    }

    #[test]
    fn test_unmappable_shift_is_dropped() {
        // 0xD7E5 + 29 lands in the surrogate range
        let decoder = OffsetDecoder::default();
        assert_eq!(decoder.decode("F1", "\u{D7E5}"), "");
        assert_eq!(decoder.decode("F1", ""), "");
    }

    #[test]
    fn test_registry_routes_by_font() {
        let registry = DecoderRegistry::default()
            .with_font("Helvetica", Arc::new(IdentityDecoder));

        assert_eq!(registry.decode("HELVETICA", "Plain"), "Plain");
        assert_eq!(registry.decode("Other", &encode("Shifted")), "Shifted");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_printable_classes() {
        assert!(is_printable('A'));
        assert!(is_printable('é'));
        assert!(is_printable('•'));
        assert!(is_printable('한'));
        assert!(is_printable(' '));
        assert!(!is_printable('\u{00AD}'));
        assert!(!is_printable('\u{FEFF}'));
        assert!(!is_printable('\u{FFFF}'));
        assert!(!is_printable('\u{2028}'));
    }

    #[test]
    fn test_unassigned_and_format_dropped() {
        assert!(!is_printable('\u{378}'));
        assert!(!is_printable('\u{13430}'));

        // U+035B and U+13413 shift onto those code points
        let decoder = OffsetDecoder::default();
        assert_eq!(decoder.decode("F1", "\u{35B}"), "");
        assert_eq!(decoder.decode("F1", "\u{13413}"), "");
        assert_eq!(decoder.decode("F1", "\u{35B}\u{27}\u{13413}"), "D");
    }
}
