use crate::chars::{
    is_argument_name, is_directive_name, is_directive_name_start, is_escapable, is_html_whitespace,
};
use crate::consumer::Consumer;
use crate::scan::{length_if_bytes, length_if_chars};

/// Context a content run is matched in; decides which bytes terminate it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ContentContext {
    /// The whole document.
    Document,
    /// A single argument within `[...]`.
    ArgumentValue,
    /// `{...}`.
    Block,
}

fn is_terminated_by(context: ContentContext, byte: u8) -> bool {
    match context {
        ContentContext::ArgumentValue => byte == b',' || byte == b']' || byte == b'}',
        ContentContext::Block => byte == b'}',
        ContentContext::Document => false,
    }
}

/// Square/brace nesting depth within one content sequence. A closing bracket
/// at depth zero terminates the run instead of decrementing.
#[derive(Clone, Copy, Debug, Default)]
struct BracketLevels {
    square: usize,
    brace: usize,
}

/// Result of looking ahead for `[ws?] name [ws?] =` at the start of an
/// argument. The prefix is present iff `name_length` is nonzero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct NamedArgumentPrefix {
    pub(crate) length: usize,
    pub(crate) leading_whitespace: usize,
    pub(crate) name_length: usize,
    pub(crate) trailing_whitespace: usize,
}

impl NamedArgumentPrefix {
    pub(crate) fn is_present(&self) -> bool {
        self.name_length != 0
    }
}

pub(crate) fn match_directive_name(str: &str) -> usize {
    if str.is_empty() || str.as_bytes()[0].is_ascii_digit() {
        return 0;
    }
    length_if_chars(str, is_directive_name)
}

pub(crate) fn match_argument_name(str: &str) -> usize {
    if str.is_empty() || str.as_bytes()[0].is_ascii_digit() {
        return 0;
    }
    length_if_chars(str, is_argument_name)
}

pub(crate) fn match_whitespace(str: &str) -> usize {
    length_if_bytes(str, is_html_whitespace)
}

/// True iff `str` begins a two-byte escape or a directive, i.e. `\` followed
/// by an escapable byte or a directive-name-start code point.
pub(crate) fn starts_with_escape_or_directive(str: &str) -> bool {
    let bytes = str.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\\' {
        return false;
    }
    if is_escapable(bytes[1]) {
        return true;
    }
    match str[1..].chars().next() {
        Some(c) => is_directive_name_start(c),
        None => false,
    }
}

/// Pure lookahead; never emits.
pub(crate) fn match_named_argument_prefix(str: &str) -> NamedArgumentPrefix {
    let leading_whitespace = match_whitespace(str);
    let mut length = leading_whitespace;
    if length >= str.len() {
        return NamedArgumentPrefix::default();
    }

    let name_length = match_argument_name(&str[length..]);
    if name_length == 0 {
        return NamedArgumentPrefix::default();
    }
    length += name_length;

    let trailing_whitespace = match_whitespace(&str[length..]);
    length += trailing_whitespace;
    if length >= str.len() || str.as_bytes()[length] != b'=' {
        return NamedArgumentPrefix::default();
    }
    length += 1;

    NamedArgumentPrefix {
        length,
        leading_whitespace,
        name_length,
        trailing_whitespace,
    }
}

fn match_escape(out: &mut dyn Consumer, str: &str) -> usize {
    let bytes = str.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\\' || !is_escapable(bytes[1]) {
        return 0;
    }
    out.escape();
    2
}

fn match_directive(out: &mut dyn Consumer, str: &str) -> usize {
    if !str.starts_with('\\') {
        return 0;
    }
    let name_length = match_directive_name(&str[1..]);
    if name_length == 0 {
        return 0;
    }
    out.push_directive();
    out.directive_name(1 + name_length);

    let arguments_length = match_argument_list(out, &str[1 + name_length..]);
    let block_length = match_block(out, &str[1 + name_length + arguments_length..]);
    out.pop_directive();
    1 + name_length + arguments_length + block_length
}

fn match_argument_list(out: &mut dyn Consumer, str: &str) -> usize {
    if !str.starts_with('[') {
        return 0;
    }
    out.push_arguments();
    out.opening_square();
    let mut rest = &str[1..];
    let mut length = 1;

    while !rest.is_empty() {
        let argument_length = match_argument(out, rest);
        length += argument_length;
        rest = &rest[argument_length..];

        let Some(&next) = rest.as_bytes().first() else {
            break;
        };
        match next {
            // The list is cut short; the enclosing block consumes the brace.
            b'}' => {
                out.pop_arguments();
                return length;
            }
            b']' => {
                out.closing_square();
                out.pop_arguments();
                return length + 1;
            }
            b',' => {
                out.comma();
                rest = &rest[1..];
                length += 1;
            }
            _ => unreachable!("argument terminated by unexpected byte"),
        }
    }

    out.unexpected_eof();
    length
}

fn match_argument(out: &mut dyn Consumer, str: &str) -> usize {
    let name = match_named_argument_prefix(str);
    if name.is_present() {
        if name.leading_whitespace != 0 {
            out.whitespace_in_arguments(name.leading_whitespace);
        }
        out.argument_name(name.name_length);
        if name.trailing_whitespace != 0 {
            out.whitespace_in_arguments(name.trailing_whitespace);
        }
        out.equals();
    }
    let content_length =
        match_content_sequence(out, &str[name.length..], ContentContext::ArgumentValue);
    name.length + content_length
}

fn match_block(out: &mut dyn Consumer, str: &str) -> usize {
    if !str.starts_with('{') {
        return 0;
    }
    out.opening_brace();
    let content_length = match_content_sequence(out, &str[1..], ContentContext::Block);

    let rest = &str[1 + content_length..];
    if rest.starts_with('}') {
        out.closing_brace();
        content_length + 2
    } else {
        debug_assert!(rest.is_empty());
        out.unexpected_eof();
        content_length + 1
    }
}

fn match_content(
    out: &mut dyn Consumer,
    str: &str,
    context: ContentContext,
    levels: &mut BracketLevels,
) -> usize {
    let escape_length = match_escape(out, str);
    if escape_length != 0 {
        return escape_length;
    }
    let directive_length = match_directive(out, str);
    if directive_length != 0 {
        return directive_length;
    }

    let bytes = str.as_bytes();
    let mut plain_length = 0;
    while plain_length < bytes.len() {
        let c = bytes[plain_length];
        if c == b'\\' {
            if starts_with_escape_or_directive(&str[plain_length..]) {
                break;
            }
            // Lone backslash: literal text.
            plain_length += 1;
            continue;
        }
        if context == ContentContext::Document {
            plain_length += 1;
            continue;
        }
        if context == ContentContext::ArgumentValue && levels.brace == 0 {
            if levels.square == 0 && c == b',' {
                break;
            }
            if c == b'[' {
                levels.square += 1;
            }
            if c == b']' {
                if levels.square == 0 {
                    break;
                }
                levels.square -= 1;
            }
        }
        if c == b'{' {
            levels.brace += 1;
        }
        if c == b'}' {
            if levels.brace == 0 {
                break;
            }
            levels.brace -= 1;
        }
        plain_length += 1;
    }

    if plain_length != 0 {
        out.text(plain_length);
    }
    plain_length
}

pub(crate) fn match_content_sequence(
    out: &mut dyn Consumer,
    str: &str,
    context: ContentContext,
) -> usize {
    let mut levels = BracketLevels::default();
    let mut rest = str;
    let mut length = 0;

    while !rest.is_empty() && !is_terminated_by(context, rest.as_bytes()[0]) {
        let content_length = match_content(out, rest, context, &mut levels);
        debug_assert!(content_length != 0, "content matching must advance");
        rest = &rest[content_length..];
        length += content_length;
    }
    length
}
