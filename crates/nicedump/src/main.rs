//! nicedump - readable objdump listings and code size reports
//!
//! Usage:
//!   nicedump dump <object>          Disassemble and print the cleaned listing
//!   nicedump clean [listing]        Clean an already captured objdump listing
//!   nicedump sizes <dir> [--tree]   Report code size per symbol or namespace
//!   nicedump demangle [name...]     Demangle `_D` symbol names

mod commands;
mod config;
mod files;
mod objdump;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    handle_clean_command, handle_demangle_command, handle_dump_command, handle_sizes_command,
    CleanArgs, DemangleArgs, DumpArgs, SizesArgs,
};
use config::Config;

#[derive(Parser)]
#[command(name = "nicedump")]
#[command(about = "Readable objdump listings and code size reports for D object files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disassembler binary to run instead of `objdump` [env: NICEDUMP_OBJDUMP]
    #[arg(long, value_name = "PATH", global = true)]
    objdump: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble an object file and print the cleaned listing
    Dump(DumpArgs),
    /// Clean up an objdump listing read from a file or stdin
    Clean(CleanArgs),
    /// Report code size per symbol, or per namespace with --tree
    Sizes(SizesArgs),
    /// Demangle symbol names
    Demangle(DemangleArgs),
}

/// Logs go to stderr. `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.objdump);

    match cli.command {
        Commands::Dump(args) => handle_dump_command(&config, args),
        Commands::Clean(args) => handle_clean_command(args),
        Commands::Sizes(args) => handle_sizes_command(&config, args),
        Commands::Demangle(args) => handle_demangle_command(args),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}
