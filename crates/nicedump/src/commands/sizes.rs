//! `nicedump sizes`: code size per symbol and namespace over a build tree.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use nicedump_core::{Disassembly, QName, SizeTree};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::files::find_objects;
use crate::objdump::disassemble;

#[derive(Args, Debug)]
pub struct SizesArgs {
    /// Directory searched recursively for `*.o` files
    pub base_dir: PathBuf,

    /// Target triple the objects were built for; runs `<TARGET>-objdump`
    #[arg(short, long)]
    pub target: Option<String>,

    /// Show namespaces with their nested symbols
    #[arg(long, conflicts_with = "list")]
    pub tree: bool,

    /// Show symbols only, largest first (default)
    #[arg(long)]
    pub list: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Also descend into hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,
}

/// Handle the sizes command.
pub fn handle_sizes_command(config: &Config, args: SizesArgs) -> Result<()> {
    let objects = find_objects(&args.base_dir, args.include_hidden)?;
    if objects.is_empty() {
        bail!("No object files found under {}", args.base_dir.display());
    }
    info!("disassembling {} object files", objects.len());

    let objdump = config.objdump(args.target.as_deref());
    let listings = objects
        .par_iter()
        .map(|object| disassemble(&objdump, object).map(|disasm| (object.as_path(), disasm)))
        .collect::<Result<Vec<_>>>()?;

    let tree = SizeTree::build(
        listings
            .iter()
            .flat_map(|(object, disasm)| symbol_sizes(object, disasm)),
    );
    debug!("aggregated {} names", tree.len());

    let report = if args.tree { tree.tree() } else { tree.flat() };
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report);
    }
    Ok(())
}

/// Sizes of the symbols of one object, skipping those with no instructions.
fn symbol_sizes<'a>(
    object: &'a Path,
    disasm: &'a Disassembly,
) -> impl Iterator<Item = (QName, u64)> + 'a {
    if disasm.is_empty() {
        warn!("read no symbols from {}", object.display());
    }
    disasm.symbols().iter().filter_map(move |symbol| match symbol.size() {
        Ok(size) => Some((QName::parse(&symbol.name), size)),
        Err(e) => {
            warn!("{}: {}", object.display(), e);
            None
        }
    })
}
