use crate::consumer::Consumer;
use crate::token::{HighlightCategory, Token};

/// Options passed through to the tokenizer and any nested highlighter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HighlightOptions {
    /// Merge contiguous emissions of the same category into one token.
    pub coalescing: bool,
}

/// Cursor into the source plus the output sink. All emission goes through
/// here so token offsets always line up with the bytes the matchers have
/// consumed.
pub(crate) struct Emitter<'s, 'o> {
    source: &'s str,
    out: &'o mut Vec<Token>,
    cursor: usize,
    options: HighlightOptions,
}

impl<'s, 'o> Emitter<'s, 'o> {
    pub(crate) fn new(out: &'o mut Vec<Token>, source: &'s str, options: HighlightOptions) -> Self {
        Self {
            source,
            out,
            cursor: 0,
            options,
        }
    }

    pub(crate) fn remainder(&self) -> &'s str {
        &self.source[self.cursor..]
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn options(&self) -> HighlightOptions {
        self.options
    }

    pub(crate) fn advance(&mut self, length: usize) {
        self.cursor += length;
        debug_assert!(self.cursor <= self.source.len());
    }

    pub(crate) fn emit(&mut self, begin: usize, length: usize, category: HighlightCategory) {
        debug_assert!(length != 0);
        debug_assert!(begin + length <= self.source.len());
        if self.options.coalescing
            && let Some(last) = self.out.last_mut()
            && last.category == category
            && last.end() == begin
        {
            last.length += length;
            return;
        }
        debug_assert!(self.out.last().is_none_or(|last| last.begin <= begin));
        self.out.push(Token {
            begin,
            length,
            category,
        });
    }

    pub(crate) fn emit_and_advance(&mut self, length: usize, category: HighlightCategory) {
        self.emit(self.cursor, length, category);
        self.advance(length);
    }

    /// Current sink position, for a later `merge_from`.
    pub(crate) fn mark(&self) -> usize {
        self.out.len()
    }

    /// Merge already-translated tokens into the sink region emitted since
    /// `mark`. The region and the new tokens are each ordered and mutually
    /// disjoint, so re-sorting the suffix by `begin` restores global order.
    pub(crate) fn merge_from(&mut self, mark: usize, tokens: Vec<Token>) {
        if tokens.is_empty() {
            return;
        }
        debug_assert!(mark <= self.out.len());
        self.out.extend(tokens);
        self.out[mark..].sort_by_key(|token| token.begin);
    }
}

/// Maps events straight to highlight spans; text and argument whitespace
/// advance without emitting.
pub(crate) struct NormalConsumer<'s, 'o> {
    pub(crate) emitter: Emitter<'s, 'o>,
}

impl Consumer for NormalConsumer<'_, '_> {
    fn text(&mut self, length: usize) {
        self.emitter.advance(length);
    }

    fn whitespace_in_arguments(&mut self, length: usize) {
        self.emitter.advance(length);
    }

    fn opening_square(&mut self) {
        self.emitter.emit_and_advance(1, HighlightCategory::SymSquare);
    }

    fn closing_square(&mut self) {
        self.emitter.emit_and_advance(1, HighlightCategory::SymSquare);
    }

    fn comma(&mut self) {
        self.emitter.emit_and_advance(1, HighlightCategory::SymPunc);
    }

    fn argument_name(&mut self, length: usize) {
        self.emitter.emit_and_advance(length, HighlightCategory::MarkupAttr);
    }

    fn equals(&mut self) {
        self.emitter.emit_and_advance(1, HighlightCategory::SymPunc);
    }

    fn directive_name(&mut self, length: usize) {
        self.emitter.emit_and_advance(length, HighlightCategory::MarkupTag);
    }

    fn opening_brace(&mut self) {
        self.emitter.emit_and_advance(1, HighlightCategory::SymBrace);
    }

    fn closing_brace(&mut self) {
        self.emitter.emit_and_advance(1, HighlightCategory::SymBrace);
    }

    fn escape(&mut self) {
        self.emitter.emit_and_advance(2, HighlightCategory::Escape);
    }
}
