//! Cursor over the unconsumed suffix of a mangled name.

use crate::error::{Construct, DemangleError, DemangleResult};

/// A read position into a mangled name.
///
/// The cursor only ever moves forward; sub-cursors for template bodies are
/// created with [`Cursor::split_off`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// The unconsumed input.
    pub(crate) fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    pub(crate) fn next_is_digit(&self) -> bool {
        self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    /// Consumes one character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consumes one character, failing at end of input.
    pub(crate) fn expect_any(&mut self, construct: Construct) -> DemangleResult<char> {
        self.bump()
            .ok_or_else(|| DemangleError::unexpected_end(construct))
    }

    /// Consumes `prefix` if the input starts with it.
    pub(crate) fn eat(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consumes exactly `len` bytes.
    ///
    /// Fails if fewer remain or if the cut would split a UTF-8 character.
    pub(crate) fn take(&mut self, len: usize, construct: Construct) -> DemangleResult<&'a str> {
        let rest = self.remaining();
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| DemangleError::truncated(construct, len, rest))?;
        match self.input.get(self.pos..end) {
            Some(taken) => {
                self.pos = end;
                Ok(taken)
            }
            None => Err(DemangleError::truncated(construct, len, rest)),
        }
    }

    /// Splits the next `len` bytes off into a cursor of their own.
    pub(crate) fn split_off(
        &mut self,
        len: usize,
        construct: Construct,
    ) -> DemangleResult<Cursor<'a>> {
        self.take(len, construct).map(Cursor::new)
    }

    /// Consumes the longest run of ASCII digits as a decimal number.
    pub(crate) fn number(&mut self, construct: Construct) -> DemangleResult<usize> {
        let rest = self.remaining();
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();

        if digits == 0 {
            if rest.is_empty() {
                return Err(DemangleError::unexpected_end(construct));
            }
            return Err(DemangleError::invalid_number(construct, rest));
        }

        let value = rest[..digits]
            .parse::<usize>()
            .map_err(|_| DemangleError::invalid_number(construct, rest))?;
        self.pos += digits;
        Ok(value)
    }
}
