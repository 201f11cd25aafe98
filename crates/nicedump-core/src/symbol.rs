//! Symbol and disassembly types.

use std::fmt;

use crate::{Error, Instruction};

/// A symbol label and the instructions listed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Demangled symbol name.
    pub name: String,
    /// Address of the symbol label.
    pub address: u64,
    /// Instructions in address order.
    instructions: Vec<Instruction>,
}

impl Symbol {
    /// Creates a symbol with no instructions.
    pub fn new(name: impl Into<String>, address: u64) -> Self {
        Self {
            name: name.into(),
            address,
            instructions: Vec::new(),
        }
    }

    /// Appends an instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Returns the instructions in address order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns true if no instruction has been recorded.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the code size: offset plus size of the last instruction.
    ///
    /// A symbol without instructions has no defined size and yields
    /// [`Error::EmptySymbol`] rather than zero.
    pub fn size(&self) -> Result<u64, Error> {
        self.instructions
            .last()
            .map(Instruction::end_offset)
            .ok_or_else(|| Error::EmptySymbol {
                name: self.name.clone(),
                address: self.address,
            })
    }

    /// Returns true if the name contains `needle`.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.contains(needle)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size() {
            Ok(size) => write!(f, "<{}> (at {:#x}; size {:#x}):", self.name, self.address, size)?,
            Err(_) => write!(f, "<{}> (at {:#x}; empty):", self.name, self.address)?,
        }
        for inst in &self.instructions {
            write!(f, "\n{}", inst)?;
        }
        Ok(())
    }
}

/// The cleaned-up disassembly of one object file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disassembly {
    symbols: Vec<Symbol>,
}

impl Disassembly {
    /// Wraps an ordered list of symbols.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Returns the symbols in listing order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbol was listed.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Finds the first symbol with exactly this (demangled) name.
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Returns the symbols whose name contains `needle`.
    pub fn symbols_containing<'a>(
        &'a self,
        needle: &'a str,
    ) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.iter().filter(move |s| s.name_contains(needle))
    }

    /// Sum of the sizes of all symbols that have instructions.
    pub fn total_size(&self) -> u64 {
        self.symbols
            .iter()
            .filter_map(|s| s.size().ok())
            .fold(0, u64::saturating_add)
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.symbols.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}
