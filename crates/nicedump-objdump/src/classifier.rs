//! Single-pass construction of a [`Disassembly`] from listing lines.

use nicedump_core::{Disassembly, Instruction, Symbol};
use nicedump_demangle::demangle_name;

use crate::line::{classify, Line};
use crate::rewrite::rewrite_instruction;
use crate::{ObjdumpError, ObjdumpResult, SymbolError};

/// Builds a [`Disassembly`] one line at a time.
///
/// The first error ends the pass; a classifier that returned an error
/// should be dropped.
#[derive(Debug, Default)]
pub struct Classifier {
    symbols: Vec<Symbol>,
    line_number: usize,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines fed so far.
    pub fn lines_seen(&self) -> usize {
        self.line_number
    }

    /// Classifies one line and records what it contributes.
    pub fn feed(&mut self, line: &str) -> ObjdumpResult<()> {
        self.line_number += 1;
        let line_number = self.line_number;

        match classify(line) {
            None => Err(ObjdumpError::unrecognized_line(line_number, line.trim())),
            Some(Line::Ignored) | Some(Line::Padding { .. }) => Ok(()),
            Some(Line::Symbol { address, name }) => {
                let demangled = demangle_name(name)
                    .map_err(|e| ObjdumpError::demangle(line_number, SymbolError::new(name, e)))?;
                self.symbols.push(Symbol::new(demangled, address));
                Ok(())
            }
            Some(Line::Instruction {
                address,
                size,
                text,
            }) => {
                let symbol = self
                    .symbols
                    .last_mut()
                    .filter(|s| s.address <= address)
                    .ok_or_else(|| ObjdumpError::orphan_instruction(line_number, address))?;
                let text = rewrite_instruction(text)
                    .map_err(|e| ObjdumpError::demangle(line_number, e))?;
                symbol.push(Instruction::new(address - symbol.address, text, size));
                Ok(())
            }
        }
    }

    /// Ends the pass.
    pub fn finish(self) -> Disassembly {
        Disassembly::new(self.symbols)
    }
}

/// Processes a complete `objdump -d` listing.
pub fn parse_disassembly(text: &str) -> ObjdumpResult<Disassembly> {
    let mut classifier = Classifier::new();
    for line in text.lines() {
        classifier.feed(line)?;
    }
    Ok(classifier.finish())
}
