//! The pipelined CPU driver: ties the five stages, the hazard/forwarding
//! units, and the architectural state together into a single `step()`.

use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::core::memory::Memory;
use crate::core::pipeline::hazards::StallSignals;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::stages::decode::decode;
use crate::core::pipeline::stages::execute::execute;
use crate::core::pipeline::stages::fetch::fetch;
use crate::core::pipeline::stages::memory::memory;
use crate::core::pipeline::stages::writeback::writeback;
use crate::core::regfile::RegisterFile;
use crate::core::snapshot::{latch_view, HazardInfo, StageDisplay, StateSnapshot};
use crate::isa::control_bits::REG_WRITE;
use crate::isa::disasm::disassemble_program;
use crate::isa::opcodes;

/// A 5-stage, in-order, single-issue pipelined CPU for the 16-bit
/// teaching ISA.
///
/// Stages are evaluated once per [`step`](Cpu::step) in reverse pipeline
/// order — WB, MEM, EX, ID, IF — so that every stage reads the latch
/// contents left behind by the *previous* cycle before any of them are
/// overwritten this cycle, reproducing the simultaneous semantics of
/// real hardware in ordinary sequential code.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub(crate) pc: u16,
    pub(crate) regs: RegisterFile,
    pub(crate) instr_mem: Memory,
    pub(crate) data_mem: Memory,
    pub(crate) if_id: IfId,
    pub(crate) id_ex: IdEx,
    pub(crate) ex_mem: ExMem,
    pub(crate) mem_wb: MemWb,
    cycle: u64,
    running: bool,
    breakpoints: HashSet<u16>,
    pub(crate) hazard_info: HazardInfo,
    pub(crate) stage_display: StageDisplay,
    /// Load-use stall decision computed by `decode` this cycle, consumed
    /// by `fetch` later in the same `step()` call (before `decode`
    /// overwrites the ID/EX latch the decision was based on).
    pub(crate) load_use_stall: StallSignals,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Creates a fresh CPU: PC at zero, every register and memory word
    /// zeroed, all latches holding bubbles.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pc: 0,
            regs: RegisterFile::new(),
            instr_mem: Memory::new(),
            data_mem: Memory::new(),
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            cycle: 0,
            running: false,
            breakpoints: HashSet::new(),
            hazard_info: HazardInfo::default(),
            stage_display: StageDisplay::default(),
            load_use_stall: StallSignals::default(),
        }
    }

    /// Resets PC, registers, both memories, all latches, the cycle
    /// counter, and `running`. Breakpoints are left untouched — they are
    /// a debugging aid external to the architectural state being reset.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.regs.reset();
        self.data_mem.reset();
        self.instr_mem.reset();
        self.if_id.reset();
        self.id_ex.reset();
        self.ex_mem.reset();
        self.mem_wb.reset();
        self.cycle = 0;
        self.running = false;
        self.hazard_info = HazardInfo::default();
    }

    /// Loads `instructions` into instruction memory starting at address
    /// `0`, skipping `None` entries (blank or label-only assembly lines,
    /// which the assembler preserves positionally but which carry no
    /// instruction). Words beyond address 255 are silently dropped.
    ///
    /// Instruction memory is not cleared first: a shorter program loaded
    /// over a longer one leaves the old program's tail in place.
    pub fn load_program(&mut self, instructions: &[Option<u16>]) {
        for (i, word) in instructions.iter().filter_map(|w| w.as_ref()).enumerate() {
            if i >= crate::isa::MEM_WORDS {
                break;
            }
            self.instr_mem.write(i as u16, *word);
        }
    }

    /// Pre-seeds data memory at `addr` with `value`, e.g. to set up a
    /// test fixture before running a program. Silently ignored if
    /// `addr >= 256`, matching ordinary data memory writes.
    pub fn seed_data_mem(&mut self, addr: u16, value: u16) {
        self.data_mem.write(addr, value);
    }

    /// Marks `running = true`. Callers drive execution by calling
    /// [`step`](Cpu::step) in a loop and checking [`is_running`](Cpu::is_running).
    pub fn start(&mut self) {
        self.running = true;
    }

    /// `true` iff the CPU has not yet halted (by fetching a HALT
    /// instruction) or been explicitly stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current cycle count.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Inserts a breakpoint at instruction address `addr`.
    pub fn set_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
    }

    /// Removes a breakpoint at instruction address `addr`.
    pub fn clear_breakpoint(&mut self, addr: u16) {
        self.breakpoints.remove(&addr);
    }

    /// `true` iff `addr` currently carries a breakpoint.
    #[must_use]
    pub fn has_breakpoint(&self, addr: u16) -> bool {
        self.breakpoints.contains(&addr)
    }

    /// Executes one clock cycle.
    ///
    /// If the instruction currently at the program counter is HALT, this
    /// stops execution (clears `running`) and returns without running
    /// any stage — HALT's architectural effect is to never enter the
    /// pipeline.
    #[instrument(level = "trace", skip(self), fields(cycle = self.cycle, pc = self.pc))]
    pub fn step(&mut self) {
        let next_instr = self.instr_mem.read_or_zero(self.pc);
        let opcode = (next_instr >> 12) & 0xF;
        if opcode == opcodes::HALT {
            trace!("halt fetched, stopping");
            self.running = false;
            return;
        }

        writeback(self);
        memory(self);
        execute(self);
        decode(self);
        fetch(self);

        if self.hazard_info.stall {
            trace!("load-use stall");
        }
        if self.hazard_info.pc_src {
            trace!(new_pc = self.pc, "branch/jump taken");
        }

        self.cycle += 1;
        self.regs.write(0, 0);
    }

    /// Reads register `idx` with the write-first bypass from MEM/WB: if
    /// writeback is committing to `idx` this very cycle, the committed
    /// value is returned instead of the (stale) value currently sitting
    /// in the register file.
    pub(crate) fn read_register_with_bypass(&self, idx: u16) -> u16 {
        let reg_write = self.mem_wb.ctrl & (1 << REG_WRITE) != 0;
        if reg_write && self.mem_wb.dest_reg == idx && idx != 0 {
            return self.mem_wb.write_data();
        }
        self.regs.read(idx)
    }

    /// Captures the complete, display-ready state of the CPU: cycle and
    /// PC, all four latches, hazard/forwarding signals, per-stage
    /// display fields, the register file, and nonzero memory contents.
    #[must_use]
    pub fn get_state(&self) -> StateSnapshot {
        StateSnapshot {
            cycle: self.cycle,
            pc: self.pc,
            if_id: latch_view(self.if_id, self.if_id.instr),
            id_ex: latch_view(self.id_ex, self.id_ex.instr),
            ex_mem: latch_view(self.ex_mem, self.ex_mem.instr),
            mem_wb: latch_view(self.mem_wb, self.mem_wb.instr),
            hazards: self.hazard_info,
            stage_display: self.stage_display.clone(),
            regfile: self.regs.snapshot(),
            data_mem: self.data_mem.nonzero_entries(),
            instr_mem: disassemble_program(self.instr_mem.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::opcodes;

    fn encode_r(opcode: u16, rs: u16, rt: u16, rd: u16, func: u16) -> u16 {
        (opcode << 12) | (rs << 9) | (rt << 6) | (rd << 3) | func
    }

    fn encode_i(opcode: u16, rs: u16, rt: u16, imm6: u16) -> u16 {
        (opcode << 12) | (rs << 9) | (rt << 6) | (imm6 & 0x3F)
    }

    #[test]
    fn halt_stops_before_entering_pipeline() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[Some(encode_r(opcodes::HALT, 0, 0, 0, 0))]);
        cpu.start();
        cpu.step();
        assert!(!cpu.is_running());
        assert_eq!(cpu.cycle(), 0);
    }

    #[test]
    fn addi_commits_after_five_cycles() {
        // No trailing HALT: the HALT check fires on the *current* PC before
        // any stage runs, so one placed right after this instruction would
        // stop the machine before ADDI ever reached WB. Unfetched addresses
        // read as 0 (NOP), which is enough to let it drain.
        let mut cpu = Cpu::new();
        cpu.load_program(&[Some(encode_i(opcodes::ADDI, 0, 1, 5))]);
        cpu.start();
        for _ in 0..5 {
            cpu.step();
        }
        assert_eq!(cpu.get_state().regfile[1], 5);
    }

    #[test]
    fn load_use_hazard_stalls_one_cycle() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[
            Some(encode_i(opcodes::LW, 0, 1, 0)),
            Some(encode_r(opcodes::R_TYPE, 1, 0, 2, crate::isa::funcs::ADD)),
        ]);
        cpu.start();
        cpu.step();
        cpu.step();
        cpu.step();
        assert!(cpu.hazard_info.stall);
    }

    #[test]
    fn reset_does_not_clear_breakpoints() {
        let mut cpu = Cpu::new();
        cpu.set_breakpoint(4);
        cpu.reset();
        assert!(cpu.has_breakpoint(4));
    }

    #[test]
    fn load_program_does_not_clear_stale_tail() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[Some(1), Some(2), Some(3)]);
        cpu.load_program(&[Some(9)]);
        assert_eq!(cpu.instr_mem.read_or_zero(0), 9);
        assert_eq!(cpu.instr_mem.read_or_zero(1), 2);
    }

    #[test]
    fn forwarding_resolves_ex_mem_dependency() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[
            Some(encode_i(opcodes::ADDI, 0, 1, 7)),
            Some(encode_r(
                opcodes::R_TYPE,
                1,
                0,
                2,
                crate::isa::funcs::ADD,
            )),
        ]);
        cpu.start();
        for _ in 0..6 {
            cpu.step();
        }
        assert_eq!(cpu.get_state().regfile[2], 7);
    }
}
