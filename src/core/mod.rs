//! The simulated hardware: register file, memory, ALU, and the pipelined
//! CPU driver built from them.

pub mod alu;
pub mod cpu;
pub mod memory;
pub mod pipeline;
pub mod regfile;
pub mod snapshot;

pub use cpu::Cpu;
pub use snapshot::StateSnapshot;
