//! Rendering module: Markdown emission, layout dumps and statistics.

mod json;
mod markdown;
mod options;
mod result;

pub use json::{to_json, JsonFormat, LayoutLine, PageLayout};
pub use markdown::MarkdownEmitter;
pub use options::{HeaderSeparator, PageSelection, RenderOptions, DEFAULT_PAGE_SEPARATOR};
pub use result::{ExtractionStats, RenderResult};
