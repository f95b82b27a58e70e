//! Line assembly: decoded elements to ordered lines.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use super::decode::GlyphDecoder;
use super::options::LineGrouping;
use crate::model::{RawTextRun, TextElement, TextLine};

/// Decode the raw runs of one page into elements.
///
/// Runs that decode to nothing are skipped, as are runs with non-finite
/// coordinates.
pub fn decode_runs(decoder: &dyn GlyphDecoder, runs: &[RawTextRun]) -> Vec<TextElement> {
    let mut elements = Vec::with_capacity(runs.len());
    for run in runs {
        if !run.has_finite_geometry() {
            log::warn!(
                "Skipping run {:?} with non-finite geometry ({}, {})",
                run.text,
                run.x,
                run.y
            );
            continue;
        }

        let text = decoder.decode(&run.font, &run.text);
        if text.is_empty() {
            continue;
        }

        elements.push(TextElement {
            text,
            font: run.font.clone(),
            size: run.size,
            x: run.x,
            y: run.y,
            width: run.width,
            height: run.height,
        });
    }
    elements
}

/// Groups the elements of one page into lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineAssembler {
    grouping: LineGrouping,
}

impl LineAssembler {
    /// Create an assembler with the given grouping mode.
    pub fn new(grouping: LineGrouping) -> Self {
        Self { grouping }
    }

    /// Grouping mode in use.
    pub fn grouping(&self) -> LineGrouping {
        self.grouping
    }

    /// Assemble lines, top of page first, each sorted left to right.
    pub fn assemble(&self, elements: Vec<TextElement>) -> Vec<TextLine> {
        match self.grouping {
            LineGrouping::Exact => group_exact(elements),
            LineGrouping::Tolerance { ratio } => group_within(elements, ratio),
        }
    }
}

/// One line per distinct Y value.
fn group_exact(elements: Vec<TextElement>) -> Vec<TextLine> {
    let mut by_y: BTreeMap<OrderedFloat<f64>, Vec<TextElement>> = BTreeMap::new();
    for element in elements {
        by_y.entry(OrderedFloat(element.y)).or_default().push(element);
    }

    // Higher Y is higher on the page
    by_y.into_iter()
        .rev()
        .filter_map(|(y, mut group)| {
            sort_by_x(&mut group);
            TextLine::from_sorted(group, y.into_inner())
        })
        .collect()
}

/// Lines anchored on their first (topmost) element, absorbing elements
/// within `ratio` of its font size.
fn group_within(mut elements: Vec<TextElement>, ratio: f64) -> Vec<TextLine> {
    elements.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextElement> = Vec::new();
    let mut anchor: Option<(f64, f64)> = None;

    for element in elements {
        if let Some((y, size)) = anchor {
            if (element.y - y).abs() <= size * ratio {
                current.push(element);
                continue;
            }
            sort_by_x(&mut current);
            lines.extend(TextLine::from_sorted(std::mem::take(&mut current), y));
        }
        anchor = Some((element.y, element.size));
        current.push(element);
    }

    if let Some((y, _)) = anchor {
        sort_by_x(&mut current);
        lines.extend(TextLine::from_sorted(current, y));
    }

    lines
}

fn sort_by_x(elements: &mut [TextElement]) {
    elements.sort_by(|a, b| a.x.total_cmp(&b.x));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode::IdentityDecoder;

    fn el(text: &str, x: f64, y: f64) -> TextElement {
        TextElement::new(text, "Helvetica", 10.0, x, y, 5.0)
    }

    #[test]
    fn test_exact_grouping_orders_lines_and_elements() {
        let lines = LineAssembler::default().assemble(vec![
            el("world", 40.0, 700.0),
            el("bottom", 0.0, 100.0),
            el("Hello ", 0.0, 700.0),
            el("middle", 0.0, 400.0),
        ]);

        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["Hello world", "middle", "bottom"]);
        assert_eq!(lines[0].y, 700.0);
    }

    #[test]
    fn test_exact_grouping_splits_near_equal_y() {
        // Same baseline to the eye, but not the same value
        let lines = LineAssembler::default().assemble(vec![
            el("a", 0.0, 700.0),
            el("b", 10.0, 700.0001),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "b");
    }

    #[test]
    fn test_signed_zero_is_one_line() {
        let lines = LineAssembler::default().assemble(vec![el("a", 0.0, 0.0), el("b", 10.0, -0.0)]);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_tolerance_grouping_merges_near_equal_y() {
        let assembler = LineAssembler::new(LineGrouping::Tolerance { ratio: 0.5 });
        let lines = assembler.assemble(vec![
            el("b", 10.0, 699.0),
            el("a", 0.0, 700.0),
            el("c", 0.0, 680.0),
        ]);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "ab");
        assert_eq!(lines[0].y, 700.0);
        assert_eq!(lines[1].text(), "c");
    }

    #[test]
    fn test_empty_page_has_no_lines() {
        assert!(LineAssembler::default().assemble(vec![]).is_empty());
    }

    #[test]
    fn test_decode_runs_skips_empty_and_non_finite() {
        let runs = vec![
            RawTextRun::new("kept", "F1", 10.0, 0.0, 0.0, 5.0),
            RawTextRun::new("\u{7}", "F1", 10.0, 0.0, 0.0, 5.0),
            RawTextRun::new("nan", "F1", 10.0, f64::NAN, 0.0, 5.0),
        ];
        let elements = decode_runs(&IdentityDecoder, &runs);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text, "kept");
    }
}
