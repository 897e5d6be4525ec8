use crate::consumer::Consumer;
use crate::emit::{Emitter, HighlightOptions, NormalConsumer};
use crate::token::Token;

/// Highlighter for the language embedded in a code-block body. The staged
/// body is handed over as its own little source; returned token offsets are
/// relative to it and get translated back afterwards.
pub trait NestedHighlighter {
    fn highlight(&mut self, out: &mut Vec<Token>, source: &str, options: &HighlightOptions);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    BeforeBlock,
    InBlock,
    Done,
}

/// Behaves like the Normal consumer for the envelope of a code-block
/// directive, but collects the top-level body text into a side buffer
/// together with the source offset of every staged byte.
pub(crate) struct CodeBlockConsumer<'n> {
    nested: Option<&'n mut dyn NestedHighlighter>,
    nested_source: String,
    nested_remap: Vec<usize>,
    arguments_level: usize,
    brace_level: usize,
    body_mark: usize,
    state: State,
}

impl<'n> CodeBlockConsumer<'n> {
    pub(crate) fn new(nested: Option<&'n mut dyn NestedHighlighter>) -> Self {
        Self {
            nested,
            nested_source: String::new(),
            nested_remap: Vec::new(),
            arguments_level: 0,
            brace_level: 0,
            body_mark: 0,
            state: State::BeforeBlock,
        }
    }

    pub(crate) fn done(&self) -> bool {
        self.state == State::Done
    }

    pub(crate) fn text(&mut self, normal: &mut NormalConsumer<'_, '_>, length: usize) {
        if self.arguments_level == 0 && self.brace_level == 1 {
            let emitter = &mut normal.emitter;
            let begin = emitter.cursor();
            self.nested_source.push_str(&emitter.remainder()[..length]);
            self.nested_remap.extend(begin..begin + length);
            emitter.advance(length);
        } else {
            normal.text(length);
        }
    }

    pub(crate) fn opening_brace(&mut self, normal: &mut NormalConsumer<'_, '_>) {
        normal.opening_brace();
        if self.arguments_level == 0 && self.brace_level == 0 {
            debug_assert_eq!(self.state, State::BeforeBlock);
            self.state = State::InBlock;
            self.body_mark = normal.emitter.mark();
        }
        self.brace_level += 1;
    }

    pub(crate) fn closing_brace(&mut self, normal: &mut NormalConsumer<'_, '_>) {
        normal.closing_brace();
        self.brace_level -= 1;
        if self.arguments_level == 0 && self.brace_level == 0 {
            self.state = State::Done;
        }
    }

    pub(crate) fn push_arguments(&mut self) {
        self.arguments_level += 1;
    }

    pub(crate) fn pop_arguments(&mut self) {
        self.arguments_level -= 1;
    }

    pub(crate) fn unexpected_eof(&mut self) {
        self.state = State::Done;
    }

    /// Runs the nested highlighter over the staged body, translates the
    /// resulting tokens to source coordinates and merges them into the sink
    /// region emitted since the body started. Staging is released either way.
    pub(crate) fn flush(&mut self, emitter: &mut Emitter<'_, '_>) {
        if !self.nested_source.is_empty()
            && let Some(nested) = self.nested.as_deref_mut()
        {
            let mut tokens = Vec::new();
            nested.highlight(&mut tokens, &self.nested_source, &emitter.options());
            let translated = translate(&tokens, &self.nested_remap);
            emitter.merge_from(self.body_mark, translated);
        }
        self.nested_source.clear();
        self.nested_remap.clear();
        self.arguments_level = 0;
        self.brace_level = 0;
        self.body_mark = 0;
        self.state = State::BeforeBlock;
    }
}

/// Staged bytes need not be adjacent in the source (escapes and nested
/// directives are not staged), so a token is split at every discontinuity of
/// the remap. Out-of-range spans from a misbehaving nested highlighter are
/// clipped.
fn translate(tokens: &[Token], remap: &[usize]) -> Vec<Token> {
    let mut out = Vec::new();
    for token in tokens {
        let end = token.end().min(remap.len());
        let mut offset = token.begin;
        while offset < end {
            let begin = remap[offset];
            let mut length = 1;
            while offset + length < end && remap[offset + length] == begin + length {
                length += 1;
            }
            out.push(Token {
                begin,
                length,
                category: token.category,
            });
            offset += length;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::HighlightCategory;

    #[test]
    fn translation_splits_at_remap_gaps() {
        // Staged bytes map to 6..8 and 10..12 of the source.
        let remap = [6, 7, 10, 11];
        let tokens = [Token {
            begin: 0,
            length: 4,
            category: HighlightCategory::Comment,
        }];
        let translated = translate(&tokens, &remap);
        assert_eq!(
            translated,
            vec![
                Token {
                    begin: 6,
                    length: 2,
                    category: HighlightCategory::Comment,
                },
                Token {
                    begin: 10,
                    length: 2,
                    category: HighlightCategory::Comment,
                },
            ]
        );
    }

    #[test]
    fn translation_clips_out_of_range_tokens() {
        let remap = [3, 4];
        let tokens = [
            Token {
                begin: 1,
                length: 5,
                category: HighlightCategory::Escape,
            },
            Token {
                begin: 9,
                length: 1,
                category: HighlightCategory::Escape,
            },
        ];
        let translated = translate(&tokens, &remap);
        assert_eq!(
            translated,
            vec![Token {
                begin: 4,
                length: 1,
                category: HighlightCategory::Escape,
            }]
        );
    }

    #[test]
    fn body_text_is_staged_and_envelope_is_emitted() {
        // \code{ab}
        let source = "\\code{ab}";
        let mut out = Vec::new();
        let emitter = Emitter::new(&mut out, source, HighlightOptions::default());
        let mut normal = NormalConsumer { emitter };
        let mut code_block = CodeBlockConsumer::new(None);

        normal.directive_name(5);
        code_block.opening_brace(&mut normal);
        code_block.text(&mut normal, 2);
        code_block.closing_brace(&mut normal);
        assert!(code_block.done());
        assert_eq!(code_block.nested_source, "ab");
        assert_eq!(code_block.nested_remap, vec![6, 7]);
        assert_eq!(out.len(), 3);
    }
}
