//! Cleaned-up instruction listing entries.

use std::fmt;

/// One instruction of a symbol, as rewritten from the disassembler listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Offset from the start of the owning symbol.
    pub offset: u64,
    /// Rewritten instruction text (demangled targets, decimal literals).
    pub text: String,
    /// Number of encoded bytes listed for this instruction.
    ///
    /// Trailing alignment padding emitted after the last instruction of a
    /// symbol is counted too.
    pub size: u64,
}

impl Instruction {
    /// Creates a new instruction.
    pub fn new(offset: u64, text: impl Into<String>, size: u64) -> Self {
        Self {
            offset,
            text: text.into(),
            size,
        }
    }

    /// Returns the offset just past this instruction.
    pub fn end_offset(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{:#x}:\t{}", self.offset, self.text)
    }
}
