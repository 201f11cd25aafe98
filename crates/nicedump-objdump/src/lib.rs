//! # nicedump-objdump
//!
//! Turns the text output of `objdump -d` into a [`Disassembly`]: symbol
//! labels are demangled, direct call and jump targets are replaced by their
//! demangled names, hex literals are printed as signed decimals, and
//! PC-relative operands are resolved to the symbol named in their comment.
//!
//! ```ignore
//! let disasm = nicedump_objdump::parse_disassembly(&listing)?;
//! for symbol in disasm.symbols() {
//!     println!("{}", symbol);
//! }
//! ```

pub mod classifier;
pub mod error;
pub mod line;
pub mod rewrite;

pub use classifier::{parse_disassembly, Classifier};
pub use error::{ObjdumpError, ObjdumpResult, SymbolError};
pub use line::{classify, Line};
pub use rewrite::{decimal_literals, rewrite_instruction, CONTROL_FLOW_MNEMONICS};

pub use nicedump_core::{Disassembly, Instruction, Symbol};
