//! Markdown emission for one page of classified lines.

use crate::model::{LineRole, TextLine};
use crate::parser::{list_item_body, ClassifiedLine, StructureClassifier};

use super::{HeaderSeparator, RenderOptions};

/// Block the emitter is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BlockMode {
    #[default]
    None,
    InList,
    InTable,
}

/// Serializes the lines of a page to Markdown.
///
/// State (list/table mode) lives only for the duration of one call, so the
/// same emitter can be shared across pages and threads.
#[derive(Debug, Clone, Default)]
pub struct MarkdownEmitter {
    classifier: StructureClassifier,
    header_separator: HeaderSeparator,
}

impl MarkdownEmitter {
    /// Create an emitter from render options.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            classifier: StructureClassifier::new(options.classifier.clone()),
            header_separator: options.header_separator,
        }
    }

    /// Classifier used for roles and table geometry.
    pub fn classifier(&self) -> &StructureClassifier {
        &self.classifier
    }

    /// Classify and emit the lines of a page.
    pub fn render_page(&self, lines: &[TextLine]) -> String {
        let classified = self.classifier.classify_page(lines);
        self.emit(lines, &classified)
    }

    /// Emit lines that were already classified against `lines`.
    pub fn emit(&self, lines: &[TextLine], classified: &[ClassifiedLine<'_>]) -> String {
        let mut output = String::new();
        let mut mode = BlockMode::None;

        for item in classified {
            let text = item.line.text();
            if text.trim().is_empty() {
                continue;
            }

            mode = match item.role {
                LineRole::Heading(level) => {
                    output.push_str(&"#".repeat(level as usize));
                    output.push(' ');
                    output.push_str(&text);
                    output.push('\n');
                    BlockMode::None
                }
                LineRole::ListItem => {
                    if mode != BlockMode::InList {
                        output.push('\n');
                    }
                    output.push_str("- ");
                    output.push_str(list_item_body(&text));
                    output.push('\n');
                    BlockMode::InList
                }
                LineRole::TableRow => {
                    self.emit_table_row(&mut output, mode, lines, item, &text);
                    BlockMode::InTable
                }
                LineRole::Paragraph => {
                    if mode == BlockMode::InList {
                        output.push('\n');
                    }
                    output.push_str(&text);
                    output.push_str("\n\n");
                    BlockMode::None
                }
            };
        }

        output
    }

    fn emit_table_row(
        &self,
        output: &mut String,
        mode: BlockMode,
        lines: &[TextLine],
        item: &ClassifiedLine<'_>,
        text: &str,
    ) {
        // The row above decides by geometry alone, whatever role it got
        let continues_rows = item
            .index
            .checked_sub(1)
            .and_then(|i| lines.get(i))
            .is_some_and(|above| self.classifier.is_table_row(above));
        if !continues_rows {
            output.push('\n');
        }

        output.push_str("| ");
        output.push_str(text);
        output.push_str(" |\n");

        let header = match self.header_separator {
            HeaderSeparator::FirstPageLine => item.index == 0,
            HeaderSeparator::EachTable => mode != BlockMode::InTable,
        };
        if header {
            output.push('|');
            output.push_str(&" --- |".repeat(item.line.len()));
            output.push('\n');
        }
    }
}
