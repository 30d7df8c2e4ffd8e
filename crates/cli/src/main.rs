//! RV32I simulator debugger CLI.
//!
//! This binary is the outer shell around `rvsdb-core`. It performs:
//! 1. **Setup:** Parses flags, installs logging, reads the optional JSON config.
//! 2. **Loading:** Places a raw or ELF32 image in guest memory, or the built-in program.
//! 3. **Interaction:** Runs the `(rvsdb)` command loop, or the whole program in batch mode.
//!
//! The exit status is zero only for a good trap or an explicit `q`.

mod shell;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rvsdb_core::config::Config;
use rvsdb_core::sim::{Image, Simulator, loader};

use crate::shell::Shell;

/// Log filter used when neither `--log-level` nor `RUST_LOG` is given.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "sdb",
    author,
    version,
    about = "RV32I instruction-set simulator with an expression and watchpoint debugger",
    long_about = "Run an RV32I program under a simple debugger.\n\nWithout an image a built-in test program is loaded at the RAM base.\n\nExamples:\n  sdb\n  sdb -b build/dummy-riscv32.bin\n  sdb --config sim.json --trace build/add-riscv32.elf"
)]
struct Cli {
    /// Program image (raw binary or ELF32).
    image: Option<PathBuf>,

    /// Run to completion without entering the command loop.
    #[arg(short, long)]
    batch: bool,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `rvsdb_core=debug` (overrides `RUST_LOG`).
    #[arg(long)]
    log_level: Option<String>,

    /// Trace every executed instruction (needs `trace` level logs for `rvsdb::itrace`).
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr subscriber. `--log-level` wins over `RUST_LOG`.
fn init_logging(level: Option<&str>) {
    let filter = level.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reads the config file if one is given. Flags are applied on top.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    debug!(path = %path.display(), "reading config");
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read config '{}'", path.display()))?;
    Config::from_json(&json).with_context(|| format!("invalid config '{}'", path.display()))
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.trace {
        config.general.trace_instructions = true;
    }
    if cli.batch {
        config.monitor.batch_mode = true;
    }

    let base = config.memory.ram_base;
    let image = match &cli.image {
        Some(path) => loader::load_image(path, base)?,
        None => {
            println!("No image is given. Use the default built-in image.");
            Image::builtin(base)
        }
    };

    let mut sim = Simulator::new(&config);
    sim.load_image(&image)?;

    info!(batch = config.monitor.batch_mode, "starting session");
    let mut shell = Shell::new(sim);
    let outcome = if config.monitor.batch_mode {
        shell.run_batch()
    } else {
        shell.run_interactive(io::stdin().lock())
    };

    if let Err(e) = outcome {
        eprintln!("fatal: {e:#}");
        shell.finish();
        return Ok(ExitCode::FAILURE);
    }

    Ok(if shell.state().is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
