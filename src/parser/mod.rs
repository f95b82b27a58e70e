//! Layout reconstruction: decoding, line assembly and classification.

mod assembler;
mod backend;
mod classifier;
mod decode;
mod options;

pub use assembler::{decode_runs, LineAssembler};
pub use backend::{LopdfSource, PageSource};
pub use classifier::{
    is_list_item, list_item_body, ClassifiedLine, ClassifierConfig, StructureClassifier,
    BULLET_MARKERS,
};
pub use decode::{
    is_printable, DecoderRegistry, GlyphDecoder, IdentityDecoder, OffsetDecoder,
    DEFAULT_GLYPH_OFFSET,
};
pub use options::{LineGrouping, ParseOptions};
