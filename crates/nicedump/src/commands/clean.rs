//! `nicedump clean`: clean up an already captured `objdump -d` listing.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nicedump_objdump::parse_disassembly;
use tracing::debug;

use super::{print_listing, SymbolFilter};

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Listing to read; standard input if omitted or `-`
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub filter: SymbolFilter,
}

/// Handle the clean command.
pub fn handle_clean_command(args: CleanArgs) -> Result<()> {
    let listing = match &args.file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read listing: {}", path.display()))?,
        _ => io::read_to_string(io::stdin()).context("Failed to read listing from stdin")?,
    };
    debug!("read {} bytes of listing", listing.len());

    let disasm = parse_disassembly(&listing).context("Failed to process listing")?;
    print_listing(&disasm, &args.filter)
}
