mod chars;
mod code_block;
mod comment;
mod consumer;
mod emit;
mod highlighter;
mod matcher;
mod scan;
mod token;

pub use code_block::NestedHighlighter;
pub use emit::HighlightOptions;
pub use highlighter::{highlight, highlight_with_nested};
pub use token::{HighlightCategory, Token};
