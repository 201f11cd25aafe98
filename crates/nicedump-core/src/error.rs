//! Error types for nicedump-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A symbol's size was requested before any instruction was recorded.
    #[error("symbol `{name}` at {address:#x} has no instructions")]
    EmptySymbol { name: String, address: u64 },
}
