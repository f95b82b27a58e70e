//! Page orchestration.
//!
//! A [`Pipeline`] takes each page through decoding, line assembly,
//! classification and emission, then joins the pages in order. Pages are
//! pulled from the [`PageSource`] one after another; rendering them can run
//! on the rayon pool since each page is independent.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{RawPage, RawTextRun, TextLine};
use crate::parser::{
    decode_runs, DecoderRegistry, GlyphDecoder, LineAssembler, PageSource, ParseOptions,
};
use crate::render::{
    ExtractionStats, LayoutLine, MarkdownEmitter, PageLayout, RenderOptions, RenderResult,
};

/// Rendered output of a single page, tagged with its position.
#[derive(Debug)]
struct PageOutput {
    number: u32,
    markdown: String,
    stats: ExtractionStats,
}

/// Raw pages to Markdown.
#[derive(Clone)]
pub struct Pipeline {
    parse: ParseOptions,
    render: RenderOptions,
    decoder: Arc<dyn GlyphDecoder>,
    assembler: LineAssembler,
    emitter: MarkdownEmitter,
}

impl Pipeline {
    /// Create a pipeline with the default glyph decoder.
    pub fn new(parse: ParseOptions, render: RenderOptions) -> Self {
        let assembler = LineAssembler::new(parse.line_grouping);
        let emitter = MarkdownEmitter::new(&render);
        Self {
            parse,
            render,
            decoder: Arc::new(DecoderRegistry::default()),
            assembler,
            emitter,
        }
    }

    /// Replace the glyph decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn GlyphDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Parse options in use.
    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse
    }

    /// Render options in use.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Decode and assemble the runs of one page into lines.
    pub fn lines(&self, runs: &[RawTextRun]) -> Vec<TextLine> {
        let elements = decode_runs(self.decoder.as_ref(), runs);
        self.assembler.assemble(elements)
    }

    /// Markdown for a single page's runs.
    pub fn render_page(&self, runs: &[RawTextRun]) -> String {
        self.emitter.render_page(&self.lines(runs))
    }

    /// Markdown for an in-memory sequence of pages.
    ///
    /// The slice position decides the page number, so `pages[0]` is page 1.
    pub fn render_document(&self, pages: &[RawPage]) -> Result<String> {
        Ok(self.convert_with_stats(pages)?.content)
    }

    /// Like [`render_document`](Self::render_document), with statistics.
    pub fn render_document_with_stats(&self, pages: &[RawPage]) -> Result<RenderResult> {
        self.convert_with_stats(pages)
    }

    /// Markdown for every selected page of a source.
    pub fn convert<S: PageSource + ?Sized>(&self, source: &S) -> Result<String> {
        Ok(self.convert_with_stats(source)?.content)
    }

    /// Markdown and statistics for every selected page of a source.
    pub fn convert_with_stats<S: PageSource + ?Sized>(&self, source: &S) -> Result<RenderResult> {
        let (page_count, pages) = self.pull_pages(source)?;

        let outputs: Vec<PageOutput> = if self.parse.parallel {
            pages
                .par_iter()
                .map(|(number, page)| self.render_raw(*number, page))
                .collect()
        } else {
            pages
                .iter()
                .map(|(number, page)| self.render_raw(*number, page))
                .collect()
        };

        Ok(self.join(page_count, outputs))
    }

    /// Classified lines of every selected, present page.
    pub fn layout<S: PageSource + ?Sized>(&self, source: &S) -> Result<Vec<PageLayout>> {
        let (_, pages) = self.pull_pages(source)?;
        let classifier = self.emitter.classifier();

        let layouts = pages
            .iter()
            .filter_map(|(number, page)| {
                let runs = page.runs.as_deref()?;
                let lines = self.lines(runs);
                let layout = classifier
                    .classify_page(&lines)
                    .iter()
                    .map(LayoutLine::from)
                    .collect();
                Some(PageLayout {
                    number: *number,
                    lines: layout,
                })
            })
            .collect();

        Ok(layouts)
    }

    /// Extract every page in order. Unselected pages are not extracted and
    /// come back absent.
    fn pull_pages<S: PageSource + ?Sized>(&self, source: &S) -> Result<(u32, Vec<(u32, RawPage)>)> {
        let page_count = source.page_count();
        if page_count == 0 {
            return Err(Error::NoPages);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        for number in 1..=page_count {
            let page = if self.parse.pages.includes(number) {
                source.page(number)?
            } else {
                log::debug!("Page {}: not selected", number);
                RawPage::absent(number)
            };
            pages.push((number, page));
        }

        Ok((page_count, pages))
    }

    fn render_raw(&self, number: u32, page: &RawPage) -> PageOutput {
        let mut stats = ExtractionStats::new();

        let Some(runs) = page.runs.as_deref() else {
            log::debug!("Page {}: absent, skipped", number);
            stats.add_skipped_page();
            return PageOutput {
                number,
                markdown: String::new(),
                stats,
            };
        };

        let lines = self.lines(runs);
        let classified = self.emitter.classifier().classify_page(&lines);
        for item in &classified {
            stats.add_role(item.role);
        }
        let markdown = self.emitter.emit(&lines, &classified);

        if markdown.trim().is_empty() {
            log::debug!("Page {}: blank, skipped", number);
            stats.add_skipped_page();
        } else {
            log::debug!(
                "Page {}: {} runs, {} lines, {} classified",
                number,
                runs.len(),
                lines.len(),
                classified.len()
            );
            stats.add_page();
            stats.count_text(&markdown);
        }

        PageOutput {
            number,
            markdown,
            stats,
        }
    }

    fn join(&self, page_count: u32, outputs: Vec<PageOutput>) -> RenderResult {
        let separator = self.render.page_separator.as_str();
        let mut content = String::new();
        let mut stats = ExtractionStats::new();

        for output in outputs {
            stats.merge(&output.stats);
            if output.markdown.trim().is_empty() {
                continue;
            }

            content.push_str(&output.markdown);
            content.push_str("\n\n");
            if output.number < page_count && !separator.is_empty() {
                content.push_str(separator);
                content.push_str("\n\n");
            }
        }

        RenderResult::new(content, stats)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ParseOptions::default(), RenderOptions::default())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("parse", &self.parse)
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}
