//! `nicedump dump`: disassemble an object file and print the cleaned listing.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{print_listing, SymbolFilter};
use crate::config::Config;
use crate::objdump::disassemble;

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Object file or binary to disassemble
    pub object: PathBuf,

    /// Target triple the object was built for; runs `<TARGET>-objdump`
    #[arg(short, long)]
    pub target: Option<String>,

    #[command(flatten)]
    pub filter: SymbolFilter,
}

/// Handle the dump command.
pub fn handle_dump_command(config: &Config, args: DumpArgs) -> Result<()> {
    let objdump = config.objdump(args.target.as_deref());
    let disasm = disassemble(&objdump, &args.object)?;
    info!(
        "{}: {} symbols, {} bytes of code",
        args.object.display(),
        disasm.len(),
        disasm.total_size()
    );
    print_listing(&disasm, &args.filter)
}
