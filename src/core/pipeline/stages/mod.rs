//! The five pipeline stages, evaluated once per [`Cpu::step`](crate::core::cpu::Cpu::step)
//! in reverse order (WB → MEM → EX → ID → IF, §4.8) so that every stage
//! reads the *previous* cycle's latch contents before any of them are
//! overwritten this cycle.

pub mod decode;
pub mod execute;
pub mod fetch;
pub mod memory;
pub mod writeback;
