//! Listing error types.

use nicedump_demangle::DemangleError;
use thiserror::Error;

/// A symbol reference that claims the mangling scheme but does not parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot demangle `{symbol}`: {source}")]
pub struct SymbolError {
    /// The raw symbol text as it appeared in the listing.
    pub symbol: String,
    #[source]
    pub source: DemangleError,
}

impl SymbolError {
    pub fn new(symbol: impl Into<String>, source: DemangleError) -> Self {
        Self {
            symbol: symbol.into(),
            source,
        }
    }
}

/// Error type for processing a disassembly listing.
///
/// Any error aborts the whole listing; no partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjdumpError {
    /// A line matched none of the known listing shapes.
    #[error("line {line_number}: unrecognized line: '{line}'")]
    UnrecognizedLine { line_number: usize, line: String },

    /// An instruction appeared before any symbol label, or below the
    /// address of the symbol it would belong to.
    #[error("line {line_number}: instruction at {address:#x} is outside any symbol")]
    OrphanInstruction { line_number: usize, address: u64 },

    /// A symbol label or call target could not be demangled.
    #[error("line {line_number}: {source}")]
    Demangle {
        line_number: usize,
        #[source]
        source: SymbolError,
    },
}

impl ObjdumpError {
    /// Creates a new UnrecognizedLine error.
    pub fn unrecognized_line(line_number: usize, line: impl Into<String>) -> Self {
        Self::UnrecognizedLine {
            line_number,
            line: line.into(),
        }
    }

    /// Creates a new OrphanInstruction error.
    pub fn orphan_instruction(line_number: usize, address: u64) -> Self {
        Self::OrphanInstruction {
            line_number,
            address,
        }
    }

    /// Creates a new Demangle error.
    pub fn demangle(line_number: usize, source: SymbolError) -> Self {
        Self::Demangle {
            line_number,
            source,
        }
    }

    /// Returns the 1-based listing line the error was raised on.
    pub fn line_number(&self) -> usize {
        match self {
            Self::UnrecognizedLine { line_number, .. }
            | Self::OrphanInstruction { line_number, .. }
            | Self::Demangle { line_number, .. } => *line_number,
        }
    }
}

/// Result type for listing processing.
pub type ObjdumpResult<T> = Result<T, ObjdumpError>;
