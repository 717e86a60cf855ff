//! Decoding of four-digit `\u` escapes.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! into a UTF-16 code unit. Surrogate halves are paired with
//! [`combine_surrogates`]; a lone surrogate is a syntax error because it has
//! no `char` representation.

use crate::error::SyntaxError;

/// Accumulates up to four hexadecimal digits into a UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u32,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn hex_val(c: char) -> Option<u32> {
        c.to_digit(16)
    }

    /// Feeds one hex digit.
    ///
    /// Returns `Ok(None)` until the fourth digit arrives, then the decoded
    /// code unit; the buffer resets itself after each complete escape.
    pub fn feed(&mut self, c: char) -> Result<Option<u32>, SyntaxError> {
        let d = Self::hex_val(c).ok_or(SyntaxError::InvalidUnicodeEscapeChar(c))?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let code = self.acc;
        *self = Self::default();
        Ok(Some(code))
    }
}

pub(crate) fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Decodes a code unit that is not part of a surrogate pair.
pub(crate) fn scalar(unit: u32) -> Result<char, SyntaxError> {
    char::from_u32(unit).ok_or(SyntaxError::InvalidUnicodeEscapeSequence(unit))
}

/// Joins a high and low surrogate into one scalar value.
pub(crate) fn combine_surrogates(high: u32, low: u32) -> Result<char, SyntaxError> {
    if !is_high_surrogate(high) {
        return Err(SyntaxError::InvalidUnicodeEscapeSequence(high));
    }
    if !is_low_surrogate(low) {
        return Err(SyntaxError::InvalidUnicodeEscapeSequence(low));
    }
    let code = 0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    scalar(code)
}
