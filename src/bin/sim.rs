//! `sim` — a thin CLI front-end over the pipeline16 core library.
//!
//! This binary contains no pipeline logic of its own: it assembles a
//! source file, loads the result into a [`Cpu`], drives `step()` from a
//! single thread, and prints the result. It is the minimal, in-process
//! stand-in for the kind of transport the core's Non-goals exclude — it
//! opens no sockets and serves no UI.

use std::process::ExitCode;
use std::{fs, io::Write};

use clap::{Parser, Subcommand};
use pipeline16::{AssembleError, CliError, Cpu};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate simulator for a 16-bit, 5-stage teaching ISA"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a source file and print its machine-code listing.
    Assemble {
        /// Path to the assembly source file.
        file: String,
    },
    /// Assemble, load, and run a source file, printing the final state.
    Run {
        /// Path to the assembly source file.
        file: String,
        /// Run for exactly this many cycles.
        #[arg(long, conflicts_with = "until_halt")]
        cycles: Option<u64>,
        /// Run until the CPU halts (fetches a HALT instruction).
        #[arg(long)]
        until_halt: bool,
        /// Pause when the PC reaches this address before stepping.
        /// Repeatable.
        #[arg(long = "breakpoint")]
        breakpoints: Vec<String>,
        /// Pre-seed a data memory word: `ADDR=VALUE`. Repeatable.
        #[arg(long = "seed-mem")]
        seed_mem: Vec<String>,
        /// Install a debug-level tracing subscriber on stderr.
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Assemble { file } => cmd_assemble(&file),
        Commands::Run {
            file,
            cycles,
            until_halt,
            breakpoints,
            seed_mem,
            trace,
        } => cmd_run(&file, cycles, until_halt, &breakpoints, &seed_mem, trace),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadSource {
        path: path.to_string(),
        source,
    })
}

fn report_errors(errors: &[AssembleError]) {
    for err in errors {
        eprintln!("line {}: {} ({})", err.line, err.message, err.source_text);
    }
}

fn cmd_assemble(file: &str) -> Result<(), CliError> {
    let text = read_source(file)?;
    let (lines, errors) = pipeline16::asm::machine_code_listing(&text);

    for line in &lines {
        println!(
            "{:>4}  {:>5}  {}  {}  {}",
            line.line,
            line.pc.map_or_else(|| "-".to_string(), |pc| pc.to_string()),
            line.hex,
            line.binary,
            line.asm,
        );
    }

    report_errors(&errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::AssemblyFailed {
            count: errors.len(),
        })
    }
}

fn parse_breakpoint(spec: &str) -> Result<u16, CliError> {
    spec.trim().parse().map_err(|_| CliError::InvalidBreakpoint {
        value: spec.to_string(),
        reason: "not a valid program counter".to_string(),
    })
}

fn parse_seed_mem(spec: &str) -> Result<(u16, u16), CliError> {
    let (addr_str, value_str) = spec.split_once('=').ok_or_else(|| CliError::InvalidSeedMem {
        value: spec.to_string(),
        reason: "expected ADDR=VALUE".to_string(),
    })?;
    let addr: u16 = addr_str.trim().parse().map_err(|_| CliError::InvalidSeedMem {
        value: spec.to_string(),
        reason: format!("'{addr_str}' is not a valid address"),
    })?;
    let value: u16 = value_str.trim().parse().map_err(|_| CliError::InvalidSeedMem {
        value: spec.to_string(),
        reason: format!("'{value_str}' is not a valid value"),
    })?;
    Ok((addr, value))
}

fn cmd_run(
    file: &str,
    cycles: Option<u64>,
    until_halt: bool,
    breakpoints: &[String],
    seed_mem: &[String],
    trace: bool,
) -> Result<(), CliError> {
    if trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    let text = read_source(file)?;
    let (words, errors) = pipeline16::assemble(&text);
    if !errors.is_empty() {
        report_errors(&errors);
        return Err(CliError::AssemblyFailed {
            count: errors.len(),
        });
    }

    let mut cpu = Cpu::new();
    cpu.load_program(&words);
    for spec in breakpoints {
        cpu.set_breakpoint(parse_breakpoint(spec)?);
    }
    for spec in seed_mem {
        let (addr, value) = parse_seed_mem(spec)?;
        cpu.seed_data_mem(addr, value);
    }

    cpu.start();
    let max_cycles = cycles.unwrap_or(1);
    let mut stepped = 0u64;
    loop {
        if !cpu.is_running() {
            break;
        }
        if stepped > 0 && cpu.has_breakpoint(cpu.pc()) {
            break;
        }
        if !until_halt && stepped >= max_cycles {
            break;
        }
        cpu.step();
        stepped += 1;
    }

    let snapshot = cpu.get_state();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("warning: could not render state as JSON: {err}"),
    }
    std::io::stdout().flush().ok();
    Ok(())
}
