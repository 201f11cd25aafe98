//! `nicedump demangle`: demangle names given as arguments or on stdin.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Args;
use nicedump_demangle::{demangle, Demangled};
use tracing::debug;

#[derive(Args, Debug)]
pub struct DemangleArgs {
    /// Names to demangle; read one per line from stdin if none are given
    pub names: Vec<String>,

    /// Print the full signature: linkage, return type, name and arguments
    #[arg(long)]
    pub full: bool,
}

/// Handle the demangle command.
pub fn handle_demangle_command(args: DemangleArgs) -> Result<()> {
    if !args.names.is_empty() {
        for name in &args.names {
            println!("{}", render(name, args.full)?);
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        println!("{}", render(name, args.full)?);
    }
    Ok(())
}

fn render(name: &str, full: bool) -> Result<String> {
    let demangled = demangle(name).with_context(|| format!("Failed to demangle {}", name))?;
    if demangled.is_pass_through() {
        debug!("{} is not a mangled name, printing it unchanged", name);
    }
    Ok(match demangled {
        Demangled::Signature(sig) if full => {
            let linkage = sig.calling_convention.attribute();
            if linkage.is_empty() {
                sig.to_string()
            } else {
                format!("{} {}", linkage, sig)
            }
        }
        other => other.readable_name(),
    })
}
