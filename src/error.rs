//! Host/tooling errors for the `sim` CLI front-end.
//!
//! These are distinct from assembly diagnostics ([`crate::asm::AssembleError`]),
//! which are plain data the assembler always returns alongside its output —
//! assembling never fails in the `Result` sense. `CliError` instead covers
//! failures that are the CLI's concern, not the simulator's: a missing file,
//! a flag that does not parse.

use thiserror::Error;

/// Failures surfaced by the `sim` binary before the core simulator is
/// ever invoked.
#[derive(Debug, Error)]
pub enum CliError {
    /// The given assembly source file could not be read.
    #[error("cannot read '{path}': {source}")]
    ReadSource {
        /// Path the CLI was asked to read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A `--breakpoint` flag's value was not a valid program counter.
    #[error("invalid --breakpoint value '{value}': {reason}")]
    InvalidBreakpoint {
        /// The raw flag value as given on the command line.
        value: String,
        /// Human-readable reason it was rejected.
        reason: String,
    },

    /// A `--seed-mem` flag did not match the `ADDR=VALUE` shape.
    #[error("invalid --seed-mem value '{value}': {reason}")]
    InvalidSeedMem {
        /// The raw flag value as given on the command line.
        value: String,
        /// Human-readable reason it was rejected.
        reason: String,
    },

    /// `sim assemble` or `sim run` was asked to load a program that the
    /// assembler reported errors for.
    #[error("{count} assembly error(s); refusing to load")]
    AssemblyFailed {
        /// Number of diagnostics the assembler produced.
        count: usize,
    },
}
