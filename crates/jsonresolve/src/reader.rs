//! Lenient recursive-descent reader over the accumulated buffer.
//!
//! Every read attempt ends in one of three ways:
//!
//! - [`Outcome::Closed`]: the value is complete and ends at a known offset.
//! - [`Outcome::Unterminated`]: the buffer ran out at a point where more text
//!   could still complete the value. This is normal while streaming.
//! - [`Outcome::Malformed`]: the text can no longer become valid JSON.
//!
//! The buffer only ever grows, so a node that reads as closed keeps reading as
//! closed with the same content on every later call. Unterminated reads keep
//! their best-effort content: committed children of containers, the trailing
//! open child, and the unescaped prefix of an open string.
//!
//! String payloads without escapes borrow from the buffer; an escape switches
//! that payload to an owned string.

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::ops::Range;

use crate::{
    error::SyntaxError,
    escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, scalar},
    literal_buffer::{ExpectedLiteral, Literal, Step},
    options::ResolverOptions,
};

/// Parse state of one value, rebuilt on every call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<'src> {
    pub kind: NodeKind<'src>,
    pub closed: bool,
    /// Buffer offsets consumed by this node so far.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind<'src> {
    Null,
    /// For an open literal, the keyword its prefix is heading to.
    Boolean(bool),
    /// `value` is only known once the number is closed.
    Number { text: &'src str, value: Option<f64> },
    String(Cow<'src, str>),
    /// Closed elements followed by at most one open element.
    Array(Vec<Node<'src>>),
    /// Closed entries followed by at most one open entry. A key whose value
    /// has not started is not recorded.
    Object(Vec<Entry<'src>>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry<'src> {
    pub key: Cow<'src, str>,
    pub value: Node<'src>,
}

/// A syntax error at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Malformed {
    pub error: SyntaxError,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome<'src> {
    Closed { node: Node<'src>, end: usize },
    /// `node` is `None` when not even the first byte of a value was seen.
    Unterminated { node: Option<Node<'src>> },
    Malformed(Malformed),
}

/// Payload of a string token.
enum Text<'src> {
    Closed { text: Cow<'src, str>, end: usize },
    Open { text: Cow<'src, str> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Zero,
    Int,
    Dot,
    Frac,
    Exp,
    ExpSign,
    ExpDigits,
}

impl NumberState {
    fn is_final(self) -> bool {
        matches!(self, Self::Zero | Self::Int | Self::Frac | Self::ExpDigits)
    }

    fn step(self, b: u8) -> Option<Self> {
        Some(match (self, b) {
            (Self::Sign, b'0') => Self::Zero,
            (Self::Sign | Self::Int, b'1'..=b'9') | (Self::Int, b'0') => Self::Int,
            (Self::Zero | Self::Int, b'.') => Self::Dot,
            (Self::Dot | Self::Frac, b'0'..=b'9') => Self::Frac,
            (Self::Zero | Self::Int | Self::Frac, b'e' | b'E') => Self::Exp,
            (Self::Exp, b'+' | b'-') => Self::ExpSign,
            (Self::Exp | Self::ExpSign | Self::ExpDigits, b'0'..=b'9') => Self::ExpDigits,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Reader<'src> {
    src: &'src str,
    bytes: &'src [u8],
    end_of_input: bool,
    allow_unicode_whitespace: bool,
    max_depth: usize,
}

impl<'src> Reader<'src> {
    pub fn new(src: &'src str, options: &ResolverOptions) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            end_of_input: false,
            allow_unicode_whitespace: options.allow_unicode_whitespace,
            max_depth: options.max_depth,
        }
    }

    /// Declares that the buffer will not grow any further.
    #[must_use]
    pub fn end_of_input(mut self, end_of_input: bool) -> Self {
        self.end_of_input = end_of_input;
        self
    }

    /// Reads the whole buffer as one document.
    ///
    /// On top of [`Reader::read`], non-whitespace text after the root value is
    /// malformed, and so is an unterminated root once input has ended.
    pub fn read_document(&self) -> Outcome<'src> {
        match self.read(0) {
            Outcome::Closed { node, end } => {
                let rest = self.skip_ws(end);
                if rest < self.bytes.len() {
                    self.malformed(SyntaxError::TrailingCharacter(self.char_at(rest)), rest)
                } else {
                    Outcome::Closed { node, end }
                }
            }
            Outcome::Unterminated { .. } if self.end_of_input => {
                self.malformed(SyntaxError::UnexpectedEndOfInput, self.bytes.len())
            }
            other => other,
        }
    }

    /// Attempts to read one value starting at `offset`.
    pub fn read(&self, offset: usize) -> Outcome<'src> {
        self.read_value(offset, 0)
    }

    fn read_value(&self, offset: usize, depth: usize) -> Outcome<'src> {
        let pos = self.skip_ws(offset);
        let Some(&b) = self.bytes.get(pos) else {
            return Outcome::Unterminated { node: None };
        };
        match b {
            b'{' => self.read_object(pos, depth + 1),
            b'[' => self.read_array(pos, depth + 1),
            b'"' => match self.read_text(pos) {
                Ok(Text::Closed { text, end }) => Outcome::Closed {
                    node: Node {
                        kind: NodeKind::String(text),
                        closed: true,
                        span: pos..end,
                    },
                    end,
                },
                Ok(Text::Open { text }) => self.open(NodeKind::String(text), pos),
                Err(m) => Outcome::Malformed(m),
            },
            b'-' | b'0'..=b'9' => self.read_number(pos),
            b't' | b'f' | b'n' => self.read_literal(pos),
            _ => self.invalid_char(pos),
        }
    }

    fn read_literal(&self, pos: usize) -> Outcome<'src> {
        let Some(mut expected) = ExpectedLiteral::new(self.bytes[pos]) else {
            return self.invalid_char(pos);
        };
        let kind = match expected.kind() {
            Literal::Null => NodeKind::Null,
            Literal::True => NodeKind::Boolean(true),
            Literal::False => NodeKind::Boolean(false),
        };
        let mut i = pos + 1;
        loop {
            let Some(&b) = self.bytes.get(i) else {
                return self.open(kind, pos);
            };
            match expected.step(b) {
                Step::NeedMore => i += 1,
                Step::Done => {
                    let end = i + 1;
                    return Outcome::Closed {
                        node: Node {
                            kind,
                            closed: true,
                            span: pos..end,
                        },
                        end,
                    };
                }
                Step::Reject => return self.invalid_char(i),
            }
        }
    }

    fn read_number(&self, pos: usize) -> Outcome<'src> {
        let mut state = match self.bytes[pos] {
            b'-' => NumberState::Sign,
            b'0' => NumberState::Zero,
            _ => NumberState::Int,
        };
        let mut i = pos + 1;
        loop {
            let Some(&b) = self.bytes.get(i) else {
                // More digits may still arrive unless the producer said otherwise.
                if self.end_of_input && state.is_final() {
                    return self.close_number(pos, i);
                }
                let text = &self.src[pos..i];
                return self.open(NodeKind::Number { text, value: None }, pos);
            };
            match state.step(b) {
                Some(next) => {
                    state = next;
                    i += 1;
                }
                None if state.is_final() => return self.close_number(pos, i),
                None => return self.invalid_char(i),
            }
        }
    }

    fn close_number(&self, pos: usize, end: usize) -> Outcome<'src> {
        let text = &self.src[pos..end];
        let Ok(value) = text.parse::<f64>() else {
            return self.malformed(SyntaxError::Expected("a number"), pos);
        };
        Outcome::Closed {
            node: Node {
                kind: NodeKind::Number {
                    text,
                    value: Some(value),
                },
                closed: true,
                span: pos..end,
            },
            end,
        }
    }

    fn read_array(&self, pos: usize, depth: usize) -> Outcome<'src> {
        if depth > self.max_depth {
            return self.malformed(SyntaxError::DepthLimitExceeded(self.max_depth), pos);
        }
        let mut items = Vec::new();
        let mut i = self.skip_ws(pos + 1);
        match self.bytes.get(i) {
            None => return self.open(NodeKind::Array(items), pos),
            Some(b']') => return Self::close(NodeKind::Array(items), pos, i + 1),
            Some(_) => {}
        }
        loop {
            match self.read_value(i, depth) {
                Outcome::Closed { node, end } => {
                    items.push(node);
                    i = self.skip_ws(end);
                    match self.bytes.get(i) {
                        None => return self.open(NodeKind::Array(items), pos),
                        Some(b']') => return Self::close(NodeKind::Array(items), pos, i + 1),
                        Some(b',') => {
                            i = self.skip_ws(i + 1);
                            match self.bytes.get(i) {
                                None => return self.open(NodeKind::Array(items), pos),
                                Some(b']') => {
                                    return self.malformed(SyntaxError::TrailingComma(']'), i);
                                }
                                Some(_) => {}
                            }
                        }
                        Some(_) => return self.malformed(SyntaxError::Expected("',' or ']'"), i),
                    }
                }
                Outcome::Unterminated { node } => {
                    items.extend(node);
                    return self.open(NodeKind::Array(items), pos);
                }
                malformed @ Outcome::Malformed(_) => return malformed,
            }
        }
    }

    fn read_object(&self, pos: usize, depth: usize) -> Outcome<'src> {
        if depth > self.max_depth {
            return self.malformed(SyntaxError::DepthLimitExceeded(self.max_depth), pos);
        }
        let mut entries = Vec::new();
        let mut i = self.skip_ws(pos + 1);
        match self.bytes.get(i) {
            None => return self.open(NodeKind::Object(entries), pos),
            Some(b'}') => return Self::close(NodeKind::Object(entries), pos, i + 1),
            Some(_) => {}
        }
        loop {
            match self.bytes.get(i) {
                None => return self.open(NodeKind::Object(entries), pos),
                Some(b'"') => {}
                // The empty object was handled above, so this follows a comma.
                Some(b'}') => return self.malformed(SyntaxError::TrailingComma('}'), i),
                Some(_) => return self.malformed(SyntaxError::Expected("property name"), i),
            }
            let key = match self.read_text(i) {
                Ok(Text::Closed { text, end }) => {
                    i = self.skip_ws(end);
                    text
                }
                Ok(Text::Open { .. }) => return self.open(NodeKind::Object(entries), pos),
                Err(m) => return Outcome::Malformed(m),
            };
            match self.bytes.get(i) {
                None => return self.open(NodeKind::Object(entries), pos),
                Some(b':') => i += 1,
                Some(_) => return self.malformed(SyntaxError::Expected("':'"), i),
            }
            match self.read_value(i, depth) {
                Outcome::Closed { node, end } => {
                    entries.push(Entry { key, value: node });
                    i = self.skip_ws(end);
                    match self.bytes.get(i) {
                        None => return self.open(NodeKind::Object(entries), pos),
                        Some(b'}') => return Self::close(NodeKind::Object(entries), pos, i + 1),
                        Some(b',') => i = self.skip_ws(i + 1),
                        Some(_) => return self.malformed(SyntaxError::Expected("',' or '}'"), i),
                    }
                }
                Outcome::Unterminated { node } => {
                    if let Some(value) = node {
                        entries.push(Entry { key, value });
                    }
                    return self.open(NodeKind::Object(entries), pos);
                }
                malformed @ Outcome::Malformed(_) => return malformed,
            }
        }
    }

    /// Reads a string token whose opening quote is at `pos`.
    fn read_text(&self, pos: usize) -> Result<Text<'src>, Malformed> {
        let src = self.src;
        let start = pos + 1;
        let mut owned: Option<String> = None;
        let mut run = start;
        let mut i = start;
        let finish = |owned: Option<String>, run: usize, i: usize| -> Cow<'src, str> {
            match owned {
                None => Cow::Borrowed(&src[start..i]),
                Some(mut s) => {
                    s.push_str(&src[run..i]);
                    Cow::Owned(s)
                }
            }
        };
        loop {
            let Some(&b) = self.bytes.get(i) else {
                return Ok(Text::Open {
                    text: finish(owned, run, i),
                });
            };
            match b {
                b'"' => {
                    return Ok(Text::Closed {
                        text: finish(owned, run, i),
                        end: i + 1,
                    });
                }
                b'\\' => {
                    let mut buf = owned.take().unwrap_or_default();
                    buf.push_str(&src[run..i]);
                    match self.read_escape(i)? {
                        Some((c, next)) => {
                            buf.push(c);
                            owned = Some(buf);
                            i = next;
                            run = next;
                        }
                        // A split escape contributes nothing until it is whole.
                        None => return Ok(Text::Open { text: Cow::Owned(buf) }),
                    }
                }
                0x00..=0x1F => {
                    return Err(Malformed {
                        error: SyntaxError::InvalidCharacter(char::from(b)),
                        offset: i,
                    });
                }
                _ => i += 1,
            }
        }
    }

    /// Decodes the escape whose backslash is at `pos`; `None` if the buffer
    /// ends inside it.
    fn read_escape(&self, pos: usize) -> Result<Option<(char, usize)>, Malformed> {
        let Some(&e) = self.bytes.get(pos + 1) else {
            return Ok(None);
        };
        let c = match e {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.read_unicode_escape(pos),
            _ => {
                return Err(Malformed {
                    error: SyntaxError::InvalidCharacter(self.char_at(pos + 1)),
                    offset: pos + 1,
                });
            }
        };
        Ok(Some((c, pos + 2)))
    }

    fn read_unicode_escape(&self, pos: usize) -> Result<Option<(char, usize)>, Malformed> {
        let Some(unit) = self.read_hex4(pos + 2)? else {
            return Ok(None);
        };
        let after = pos + 6;
        if !is_high_surrogate(unit) {
            let c = scalar(unit).map_err(|error| Malformed { error, offset: pos })?;
            return Ok(Some((c, after)));
        }
        match (self.bytes.get(after), self.bytes.get(after + 1)) {
            (None, _) | (Some(b'\\'), None) => Ok(None),
            (Some(b'\\'), Some(b'u')) => {
                let Some(low) = self.read_hex4(after + 2)? else {
                    return Ok(None);
                };
                let c = combine_surrogates(unit, low).map_err(|error| Malformed {
                    error,
                    offset: after,
                })?;
                Ok(Some((c, after + 6)))
            }
            _ => Err(Malformed {
                error: SyntaxError::InvalidUnicodeEscapeSequence(unit),
                offset: pos,
            }),
        }
    }

    fn read_hex4(&self, start: usize) -> Result<Option<u32>, Malformed> {
        let mut buf = UnicodeEscapeBuffer::new();
        for at in start..start + 4 {
            if at >= self.bytes.len() {
                return Ok(None);
            }
            let unit = buf.feed(self.char_at(at)).map_err(|error| Malformed { error, offset: at })?;
            if unit.is_some() {
                return Ok(unit);
            }
        }
        Ok(None)
    }

    fn skip_ws(&self, mut pos: usize) -> usize {
        if self.allow_unicode_whitespace {
            for c in self.src[pos..].chars() {
                if !c.is_whitespace() {
                    break;
                }
                pos += c.len_utf8();
            }
        } else {
            while matches!(self.bytes.get(pos), Some(b' ' | b'\t' | b'\n' | b'\r')) {
                pos += 1;
            }
        }
        pos
    }

    fn char_at(&self, pos: usize) -> char {
        self.src
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn open(&self, kind: NodeKind<'src>, pos: usize) -> Outcome<'src> {
        Outcome::Unterminated {
            node: Some(Node {
                kind,
                closed: false,
                span: pos..self.bytes.len(),
            }),
        }
    }

    fn close(kind: NodeKind<'src>, pos: usize, end: usize) -> Outcome<'src> {
        Outcome::Closed {
            node: Node {
                kind,
                closed: true,
                span: pos..end,
            },
            end,
        }
    }

    fn invalid_char(&self, pos: usize) -> Outcome<'src> {
        self.malformed(SyntaxError::InvalidCharacter(self.char_at(pos)), pos)
    }

    #[allow(clippy::unused_self)]
    fn malformed(&self, error: SyntaxError, offset: usize) -> Outcome<'src> {
        Outcome::Malformed(Malformed { error, offset })
    }
}
