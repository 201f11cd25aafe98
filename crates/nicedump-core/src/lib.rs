//! # nicedump-core
//!
//! Data model shared by the nicedump crates: qualified-name trees parsed
//! from demangled names, code size aggregation over those trees, and the
//! symbol/instruction listing produced from disassembler output.

pub mod error;
pub mod instruction;
pub mod qname;
pub mod sizes;
pub mod symbol;

pub use error::Error;
pub use instruction::Instruction;
pub use qname::{QName, QNameKind};
pub use sizes::{SizeEntry, SizeReport, SizeTree, GLOBAL_BUCKET};
pub use symbol::{Disassembly, Symbol};
