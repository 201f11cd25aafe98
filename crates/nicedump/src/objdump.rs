//! Invoking the external disassembler.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use nicedump_core::Disassembly;
use nicedump_objdump::parse_disassembly;
use tracing::{debug, warn};

/// Disassembles `object` with `objdump -d` and cleans up the listing.
pub fn disassemble(objdump: &Path, object: &Path) -> Result<Disassembly> {
    debug!("running {} -d {}", objdump.display(), object.display());

    let output = Command::new(objdump)
        .arg("-d")
        .arg(object)
        .output()
        .with_context(|| format!("Failed to execute {}", objdump.display()))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        bail!(
            "{} failed on {} ({}): {}",
            objdump.display(),
            object.display(),
            output.status,
            stderr.trim()
        );
    }
    if !stderr.trim().is_empty() {
        warn!("{}: {}", object.display(), stderr.trim());
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    parse_disassembly(&listing)
        .with_context(|| format!("Failed to process disassembly of {}", object.display()))
}
