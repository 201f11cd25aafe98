//! Command handlers for the nicedump CLI.
//!
//! Each submodule handles one subcommand. Listing output shared by `dump`
//! and `clean` lives here.

pub mod clean;
pub mod demangle;
pub mod dump;
pub mod sizes;

pub use clean::{handle_clean_command, CleanArgs};
pub use demangle::{handle_demangle_command, DemangleArgs};
pub use dump::{handle_dump_command, DumpArgs};
pub use sizes::{handle_sizes_command, SizesArgs};

use anyhow::{bail, Result};
use clap::Args;
use nicedump_core::{Disassembly, Symbol};

/// Selection of the symbols to print from a listing.
#[derive(Args, Debug, Default)]
pub struct SymbolFilter {
    /// Print only the symbol with this demangled name
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Print only symbols whose demangled name contains this substring
    #[arg(long, value_name = "SUBSTRING", conflicts_with = "symbol")]
    pub symbol_containing: Option<String>,
}

impl SymbolFilter {
    /// Returns the selected symbols in listing order.
    ///
    /// Naming a symbol that is not in the listing is an error.
    pub fn select<'a>(&'a self, disasm: &'a Disassembly) -> Result<Vec<&'a Symbol>> {
        if let Some(name) = &self.symbol {
            return match disasm.symbol(name) {
                Some(symbol) => Ok(vec![symbol]),
                None => bail!("Symbol not found: {}", name),
            };
        }
        if let Some(needle) = &self.symbol_containing {
            return Ok(disasm.symbols_containing(needle).collect());
        }
        Ok(disasm.symbols().iter().collect())
    }
}

/// Prints the selected symbols separated by blank lines.
pub fn print_listing(disasm: &Disassembly, filter: &SymbolFilter) -> Result<()> {
    let symbols = filter.select(disasm)?;
    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", symbol);
    }
    Ok(())
}
