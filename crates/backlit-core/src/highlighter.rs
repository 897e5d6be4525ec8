use crate::code_block::{CodeBlockConsumer, NestedHighlighter};
use crate::comment::CommentConsumer;
use crate::consumer::Consumer;
use crate::emit::{Emitter, HighlightOptions, NormalConsumer};
use crate::matcher::{ContentContext, match_content_sequence};
use crate::token::{HighlightCategory, Token};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Route {
    Normal,
    Comment,
    CodeBlock,
}

fn is_comment_directive(name: &str) -> bool {
    matches!(name, "\\comment" | "\\-comment")
}

fn is_code_block_directive(name: &str) -> bool {
    matches!(name, "\\code" | "\\codeblock")
}

/// Façade over the Normal, Comment and Code-Block consumers. Routing is
/// decided when a directive announces its name, not at `push_directive`, so
/// the matchers keep driving all bracket counting generically.
struct DispatchConsumer<'s, 'o, 'n> {
    normal: NormalConsumer<'s, 'o>,
    comment: CommentConsumer,
    code_block: CodeBlockConsumer<'n>,
    current: Route,
}

impl<'s, 'o, 'n> DispatchConsumer<'s, 'o, 'n> {
    fn new(emitter: Emitter<'s, 'o>, nested: Option<&'n mut dyn NestedHighlighter>) -> Self {
        Self {
            normal: NormalConsumer { emitter },
            comment: CommentConsumer::new(),
            code_block: CodeBlockConsumer::new(nested),
            current: Route::Normal,
        }
    }

    fn try_flush_special(&mut self) {
        match self.current {
            Route::Comment if self.comment.done() => {
                let emitter = &mut self.normal.emitter;
                debug_assert!(self.comment.prefix != 0);
                emitter.emit_and_advance(self.comment.prefix, HighlightCategory::CommentDelim);
                if self.comment.content != 0 {
                    emitter.emit_and_advance(self.comment.content, HighlightCategory::Comment);
                }
                if self.comment.suffix != 0 {
                    debug_assert_eq!(self.comment.suffix, 1);
                    emitter.emit_and_advance(self.comment.suffix, HighlightCategory::CommentDelim);
                }
                self.comment.reset();
                self.current = Route::Normal;
            }
            Route::CodeBlock if self.code_block.done() => {
                self.code_block.flush(&mut self.normal.emitter);
                self.current = Route::Normal;
            }
            _ => {}
        }
    }
}

impl Consumer for DispatchConsumer<'_, '_, '_> {
    fn text(&mut self, length: usize) {
        debug_assert!(length != 0);
        match self.current {
            Route::Normal => self.normal.text(length),
            Route::Comment => self.comment.text(length),
            Route::CodeBlock => self.code_block.text(&mut self.normal, length),
        }
    }

    fn whitespace_in_arguments(&mut self, length: usize) {
        debug_assert!(length != 0);
        match self.current {
            Route::Normal => self.normal.whitespace_in_arguments(length),
            Route::Comment => self.comment.whitespace_in_arguments(length),
            Route::CodeBlock => self.normal.whitespace_in_arguments(length),
        }
    }

    fn opening_square(&mut self) {
        match self.current {
            Route::Normal => self.normal.opening_square(),
            Route::Comment => self.comment.opening_square(),
            Route::CodeBlock => self.normal.opening_square(),
        }
    }

    fn closing_square(&mut self) {
        match self.current {
            Route::Normal => self.normal.closing_square(),
            Route::Comment => self.comment.closing_square(),
            Route::CodeBlock => self.normal.closing_square(),
        }
    }

    fn comma(&mut self) {
        match self.current {
            Route::Normal => self.normal.comma(),
            Route::Comment => self.comment.comma(),
            Route::CodeBlock => self.normal.comma(),
        }
    }

    fn argument_name(&mut self, length: usize) {
        debug_assert!(length != 0);
        match self.current {
            Route::Normal => self.normal.argument_name(length),
            Route::Comment => self.comment.argument_name(length),
            Route::CodeBlock => self.normal.argument_name(length),
        }
    }

    fn equals(&mut self) {
        match self.current {
            Route::Normal => self.normal.equals(),
            Route::Comment => self.comment.equals(),
            Route::CodeBlock => self.normal.equals(),
        }
    }

    fn directive_name(&mut self, length: usize) {
        debug_assert!(length != 0);
        if self.current == Route::Normal {
            let name = &self.normal.emitter.remainder()[..length];
            if is_comment_directive(name) {
                self.current = Route::Comment;
            } else if is_code_block_directive(name) {
                self.current = Route::CodeBlock;
            }
        }
        match self.current {
            Route::Normal => self.normal.directive_name(length),
            Route::Comment => self.comment.directive_name(length),
            Route::CodeBlock => self.normal.directive_name(length),
        }
    }

    fn opening_brace(&mut self) {
        match self.current {
            Route::Normal => self.normal.opening_brace(),
            Route::Comment => self.comment.opening_brace(),
            Route::CodeBlock => self.code_block.opening_brace(&mut self.normal),
        }
    }

    fn closing_brace(&mut self) {
        match self.current {
            Route::Normal => self.normal.closing_brace(),
            Route::Comment => self.comment.closing_brace(),
            Route::CodeBlock => self.code_block.closing_brace(&mut self.normal),
        }
    }

    fn escape(&mut self) {
        match self.current {
            Route::Normal => self.normal.escape(),
            Route::Comment => self.comment.escape(),
            Route::CodeBlock => self.normal.escape(),
        }
    }

    fn push_directive(&mut self) {
        // Routing happens at directive_name instead.
    }

    fn pop_directive(&mut self) {
        self.try_flush_special();
    }

    fn push_arguments(&mut self) {
        match self.current {
            Route::Normal => self.normal.push_arguments(),
            Route::Comment => self.comment.push_arguments(),
            Route::CodeBlock => self.code_block.push_arguments(),
        }
    }

    fn pop_arguments(&mut self) {
        match self.current {
            Route::Normal => self.normal.pop_arguments(),
            Route::Comment => self.comment.pop_arguments(),
            Route::CodeBlock => self.code_block.pop_arguments(),
        }
    }

    fn unexpected_eof(&mut self) {
        match self.current {
            Route::Normal => self.normal.unexpected_eof(),
            Route::Comment => self.comment.unexpected_eof(),
            Route::CodeBlock => self.code_block.unexpected_eof(),
        }
        self.try_flush_special();
    }
}

/// Tokenizes `source`, appending highlight tokens to `out` in non-decreasing
/// `begin` order. Code-block bodies are left unhighlighted.
pub fn highlight(out: &mut Vec<Token>, source: &str, options: &HighlightOptions) {
    let mut consumer = DispatchConsumer::new(Emitter::new(out, source, *options), None);
    match_content_sequence(&mut consumer, source, ContentContext::Document);
}

/// Like [`highlight`], but hands the body of every code-block directive to
/// `nested` and folds the returned tokens back into source coordinates.
pub fn highlight_with_nested(
    out: &mut Vec<Token>,
    source: &str,
    options: &HighlightOptions,
    nested: &mut dyn NestedHighlighter,
) {
    let mut consumer = DispatchConsumer::new(Emitter::new(out, source, *options), Some(nested));
    match_content_sequence(&mut consumer, source, ContentContext::Document);
}
