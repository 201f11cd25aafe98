//! Run-time configuration resolved once at start-up.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the disassembler binary.
pub const OBJDUMP_ENV: &str = "NICEDUMP_OBJDUMP";

/// Disassembler used when neither an override nor a target is given.
const DEFAULT_OBJDUMP: &str = "objdump";

/// Settings shared by all subcommands.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit disassembler binary, from `--objdump` or the environment.
    pub objdump_override: Option<PathBuf>,
}

impl Config {
    /// Resolves the configuration; a command-line value wins over
    /// [`OBJDUMP_ENV`].
    pub fn resolve(objdump: Option<PathBuf>) -> Self {
        let objdump_override = objdump.or_else(|| {
            env::var_os(OBJDUMP_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        Self { objdump_override }
    }

    /// The disassembler to run for objects built for `target`.
    ///
    /// Cross targets use the `<target>-objdump` naming of binutils.
    pub fn objdump(&self, target: Option<&str>) -> PathBuf {
        if let Some(path) = &self.objdump_override {
            return path.clone();
        }
        match target {
            Some(target) => PathBuf::from(format!("{}-{}", target, DEFAULT_OBJDUMP)),
            None => PathBuf::from(DEFAULT_OBJDUMP),
        }
    }
}
