//! Page sources.
//!
//! The layout engine never touches a container format directly. A
//! [`PageSource`] hands it ordered pages of positioned raw runs;
//! [`LopdfSource`] is the PDF implementation backed by lopdf.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::{sniff_bytes, sniff_file};
use crate::error::{Error, Result};
use crate::model::{RawPage, RawTextRun};

/// Anything that can produce ordered pages of positioned text runs.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Raw runs of a page (1-indexed).
    ///
    /// A page with no content object is returned with `runs: None`; a page
    /// whose content cannot be read is an error.
    fn page(&self, number: u32) -> Result<RawPage>;
}

impl PageSource for [RawPage] {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn page(&self, number: u32) -> Result<RawPage> {
        number
            .checked_sub(1)
            .and_then(|i| self.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }
}

/// Average glyph advance as a fraction of the font size, used to estimate
/// run widths.
const AVG_GLYPH_WIDTH: f64 = 0.5;

/// Leading used by `T*` when the stream never sets `TL`.
const DEFAULT_LEADING: f64 = 12.0;

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_file(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Resource name to base font name for a page.
    fn font_names(&self, page_id: ObjectId) -> Result<HashMap<Vec<u8>, String>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        Ok(fonts
            .into_iter()
            .map(|(name, dict)| {
                let base_font = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_else(|| String::from_utf8_lossy(&name).into_owned());
                (name, base_font)
            })
            .collect())
    }

    /// Decompressed content of a page, or `None` when the page has none.
    fn page_content(&self, page_id: ObjectId) -> Result<Option<Vec<u8>>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(None),
        };

        match contents {
            Object::Null => Ok(None),
            Object::Reference(r) => self.stream_content(*r).map(Some),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        content.extend_from_slice(&self.stream_content(*r)?);
                        content.push(b' ');
                    }
                }
                Ok(Some(content))
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn stream_content(&self, id: ObjectId) -> Result<Vec<u8>> {
        match self.doc.get_object(id)? {
            Object::Stream(s) => s
                .decompressed_content()
                .or_else(|_| Ok(s.content.clone())),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<RawPage> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.page_count()))?;

        let content = match self
            .page_content(page_id)
            .map_err(|e| Error::page_extract(number, e))?
        {
            Some(content) => content,
            None => return Ok(RawPage::absent(number)),
        };

        let fonts = self
            .font_names(page_id)
            .map_err(|e| Error::page_extract(number, e))?;
        let operations = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::page_extract(number, e))?
            .operations;

        let runs = collect_runs(&operations, &fonts);
        log::debug!("Page {}: {} raw runs", number, runs.len());
        Ok(RawPage::new(number, runs))
    }
}

/// Walk text-showing operators and record one run per shown string.
///
/// String bytes are kept as raw codes (one char per byte); decoding happens
/// later in the glyph decoder.
fn collect_runs(
    operations: &[lopdf::content::Operation],
    fonts: &HashMap<Vec<u8>, String>,
) -> Vec<RawTextRun> {
    let mut runs = Vec::new();
    let mut state = TextState::default();

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                state.in_text = true;
                state.matrix = TextMatrix::default();
            }
            "ET" => state.in_text = false,
            "Tf" => {
                if let [Object::Name(name), size, ..] = operands.as_slice() {
                    state.font = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).into_owned());
                    state.font_size = number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands.as_slice() {
                    let ty = number(ty).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.matrix.next_line(number(tx).unwrap_or(0.0), ty);
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    let v: Vec<f64> = operands
                        .iter()
                        .take(6)
                        .map(|o| number(o).unwrap_or(0.0))
                        .collect();
                    state.matrix.set([v[0], v[1], v[2], v[3], v[4], v[5]]);
                }
            }
            "T*" => state.matrix.next_line(0.0, -state.leading),
            "Tj" if state.in_text => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    state.show(bytes, &mut runs);
                }
            }
            "TJ" if state.in_text => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => state.show(bytes, &mut runs),
                            other => {
                                if let Some(adjust) = number(other) {
                                    state.advance(-adjust / 1000.0 * state.font_size);
                                }
                            }
                        }
                    }
                }
            }
            "'" | "\"" if state.in_text => {
                state.matrix.next_line(0.0, -state.leading);
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                    state.show(bytes, &mut runs);
                }
            }
            _ => {}
        }
    }

    runs
}

/// Text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    in_text: bool,
    font: String,
    font_size: f64,
    leading: f64,
    matrix: TextMatrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            font: String::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            matrix: TextMatrix::default(),
        }
    }
}

impl TextState {
    fn show(&mut self, bytes: &[u8], runs: &mut Vec<RawTextRun>) {
        let text: String = bytes.iter().map(|&b| b as char).collect();
        let size = self.font_size * self.matrix.scale();
        let width = bytes.len() as f64 * size * AVG_GLYPH_WIDTH;
        let (x, y) = self.matrix.position();

        if !text.is_empty() {
            runs.push(
                RawTextRun::new(text, self.font.clone(), size, x, y, width).with_height(size),
            );
        }
        self.matrix.advance(width);
    }

    fn advance(&mut self, dx: f64) {
        self.matrix.advance(dx * self.matrix.scale());
    }
}

/// Text matrix and line matrix, as `[a b c d e f]`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    text: [f64; 6],
    line: [f64; 6],
}

impl Default for TextMatrix {
    fn default() -> Self {
        let identity = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        Self {
            text: identity,
            line: identity,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: [f64; 6]) {
        self.text = m;
        self.line = m;
    }

    /// Move to the start of the next line, offset from the current line start.
    fn next_line(&mut self, tx: f64, ty: f64) {
        let [a, b, c, d, e, f] = self.line;
        self.line = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.text = self.line;
    }

    /// Move along the baseline by `dx` in page units.
    fn advance(&mut self, dx: f64) {
        self.text[4] += dx;
    }

    fn position(&self) -> (f64, f64) {
        (self.text[4], self.text[5])
    }

    fn scale(&self) -> f64 {
        let [a, _, c, ..] = self.text;
        let scale = (a * a + c * c).sqrt();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn int(n: i64) -> Object {
        Object::Integer(n)
    }

    fn fonts() -> HashMap<Vec<u8>, String> {
        HashMap::from([(b"F1".to_vec(), "Helvetica-Bold".to_string())])
    }

    #[test]
    fn test_runs_follow_text_positioning() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), int(10)]),
            op("Td", vec![int(72), int(700)]),
            op("Tj", vec![Object::string_literal("ab")]),
            op("Td", vec![int(0), int(-14)]),
            op("Tj", vec![Object::string_literal("cd")]),
            op("ET", vec![]),
        ];

        let runs = collect_runs(&ops, &fonts());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "ab");
        assert_eq!(runs[0].font, "Helvetica-Bold");
        assert_eq!((runs[0].x, runs[0].y), (72.0, 700.0));
        assert_eq!(runs[0].width, 10.0);
        assert_eq!((runs[1].x, runs[1].y), (72.0, 686.0));
    }

    #[test]
    fn test_tj_array_splits_runs_and_kerns() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F9".to_vec()), int(10)]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("ab"),
                    int(-1000),
                    Object::string_literal("c"),
                ])],
            ),
            op("ET", vec![]),
        ];

        let runs = collect_runs(&ops, &fonts());
        assert_eq!(runs.len(), 2);
        // Unknown resource names fall back to the resource name itself
        assert_eq!(runs[0].font, "F9");
        // 2 glyphs * 5.0 advance + 10.0 kerning
        assert_eq!(runs[1].x, 20.0);
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let ops = vec![op("Tj", vec![Object::string_literal("stray")])];
        assert!(collect_runs(&ops, &fonts()).is_empty());
    }

    #[test]
    fn test_next_line_uses_leading() {
        let ops = vec![
            op("BT", vec![]),
            op("Tm", vec![int(1), int(0), int(0), int(1), int(50), int(500)]),
            op("TL", vec![int(20)]),
            op("T*", vec![]),
            op("Tj", vec![Object::string_literal("x")]),
            op("ET", vec![]),
        ];
        let runs = collect_runs(&ops, &fonts());
        assert_eq!((runs[0].x, runs[0].y), (50.0, 480.0));
    }

    #[test]
    fn test_slice_source() {
        let pages = vec![RawPage::new(1, vec![]), RawPage::absent(2)];
        let source: &[RawPage] = &pages;
        assert_eq!(source.page_count(), 2);
        assert!(source.page(2).unwrap().is_absent());
        assert!(matches!(source.page(3), Err(Error::PageOutOfRange(3, 2))));
        assert!(matches!(source.page(0), Err(Error::PageOutOfRange(0, 2))));
    }
}
