use alloc::string::{String, ToString};

use thiserror::Error;

/// A syntax violation found while reading the accumulated buffer.
///
/// These are the only failures the resolver reports. Running out of input is
/// never one of them unless the producer has signaled end of input, in which
/// case [`SyntaxError::UnexpectedEndOfInput`] is used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that cannot appear at this position.
    #[error("invalid character '{}'", format_char(*.0))]
    InvalidCharacter(char),
    /// A non-hexadecimal digit inside a `\u` escape.
    #[error("invalid unicode escape sequence at character: '{}'", format_char(*.0))]
    InvalidUnicodeEscapeChar(char),
    /// A `\u` escape that does not decode to a Unicode scalar value.
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    /// A comma directly followed by a closing bracket or brace.
    #[error("trailing comma before '{0}'")]
    TrailingComma(char),
    /// A structural token other than the one required here.
    #[error("expected {0}")]
    Expected(&'static str),
    /// Non-whitespace text after a complete root value.
    #[error("unexpected trailing character '{}'", format_char(*.0))]
    TrailingCharacter(char),
    /// Containers nested deeper than `ResolverOptions::max_depth`.
    #[error("nesting depth exceeds {0}")]
    DepthLimitExceeded(usize),
    /// The producer signaled end of input while a value was still open.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// The sticky error state of a [`Resolver`](crate::Resolver).
///
/// `offset` is a byte offset into the accumulated buffer; `line` and
/// `column` are 1-based, with columns counted in characters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{source} at {line}:{column}")]
pub struct ResolveError {
    /// What went wrong.
    pub source: SyntaxError,
    /// Byte offset of the offending input.
    pub offset: usize,
    /// 1-based line of the offending input.
    pub line: usize,
    /// 1-based column of the offending input.
    pub column: usize,
}

impl ResolveError {
    /// Locates `source` at byte `offset` of `buffer`.
    pub(crate) fn locate(source: SyntaxError, buffer: &str, offset: usize) -> Self {
        let offset = offset.min(buffer.len());
        let mut line = 1;
        let mut column = 1;
        for c in buffer[..offset].chars() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            source,
            offset,
            line,
            column,
        }
    }

    /// The error message without its position.
    #[must_use]
    pub fn message(&self) -> String {
        self.source.to_string()
    }
}

fn format_char(c: char) -> String {
    match c {
        '"' => "\\\"".into(),
        '\\' => "\\\\".into(),
        '\u{0008}' => "\\b".into(),
        '\u{000C}' => "\\f".into(),
        '\n' => "\\n".into(),
        '\r' => "\\r".into(),
        '\t' => "\\t".into(),
        '\0' => "\\0".into(),
        c if c.is_control() || (c.is_whitespace() && !c.is_ascii_whitespace()) => {
            alloc::format!("\\u{:04X}", c as u32)
        }
        c => c.to_string(),
    }
}
