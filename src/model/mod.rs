//! Layout model types.
//!
//! Raw runs come from a page source, decoded elements feed the line
//! assembler, and lines carry the role assigned by the classifier.

mod element;
mod line;
mod run;

pub use element::TextElement;
pub use line::{LineRole, TextLine};
pub use run::{RawPage, RawTextRun};
