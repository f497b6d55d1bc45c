//! Pipeline latch structures for inter-stage communication.
//!
//! Each latch holds the values produced by the stage that writes it,
//! carried value-type from stage to stage rather than through shared
//! references. `reset` zeroes every field; a latch whose `ctrl` field is
//! `0` is a bubble (§4.5) — the rest of its fields are then don't-care for
//! architectural purposes, but are kept around verbatim for the stage
//! display the visualizer reads.

use serde::Serialize;

/// IF/ID latch: the raw fetch result handed to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IfId {
    /// PC of the fetched instruction, plus one.
    pub pc_plus_1: u16,
    /// Raw fetched instruction word (zeroed on flush).
    pub instr: u16,
}

impl IfId {
    /// Zeroes all fields.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Atomically overwrites all fields.
    pub fn write(&mut self, pc_plus_1: u16, instr: u16) {
        self.pc_plus_1 = pc_plus_1;
        self.instr = instr;
    }
}

/// ID/EX latch: decoded operands, the selected destination register, and
/// control signals handed to execute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IdEx {
    /// PC of the instruction this entry carries.
    pub pc: u16,
    /// Raw instruction word, kept for display.
    pub instr: u16,
    /// Register-file read value for `rs` (post write-first bypass).
    pub read_data1: u16,
    /// Register-file read value for `rt` (post write-first bypass).
    pub read_data2: u16,
    /// Sign-extended immediate (6-bit for most ops, 12-bit for J/JAL).
    pub imm: u16,
    /// Source register index `rs`.
    pub rs: u16,
    /// Source register index `rt`.
    pub rt: u16,
    /// Selected destination register (`RegDst` mux, or r7 for JAL).
    pub dest_reg: u16,
    /// 8-bit control word; `0` marks this entry as a bubble.
    pub ctrl: u8,
    /// ALU control code (func field, or ADD/SUB for non-R-type ops).
    pub alu_ctrl: u16,
}

impl IdEx {
    /// Zeroes all fields, producing a bubble.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Atomically overwrites all fields.
    #[allow(clippy::too_many_arguments)]
    pub fn write(
        &mut self,
        pc: u16,
        instr: u16,
        read_data1: u16,
        read_data2: u16,
        imm: u16,
        rs: u16,
        rt: u16,
        dest_reg: u16,
        ctrl: u8,
        alu_ctrl: u16,
    ) {
        self.pc = pc;
        self.instr = instr;
        self.read_data1 = read_data1;
        self.read_data2 = read_data2;
        self.imm = imm;
        self.rs = rs;
        self.rt = rt;
        self.dest_reg = dest_reg;
        self.ctrl = ctrl;
        self.alu_ctrl = alu_ctrl;
    }

    /// True iff this entry is a load (`MemRead` set) that writes a
    /// nonzero destination register — the only shape that can source a
    /// load-use hazard.
    #[must_use]
    pub fn is_hazardous_load(&self) -> bool {
        use crate::isa::control_bits::MEM_READ;
        self.ctrl & (1 << MEM_READ) != 0 && self.dest_reg != 0
    }
}

/// EX/MEM latch: execute results handed to the memory stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExMem {
    /// Raw instruction word, kept for display.
    pub instr: u16,
    /// PC-relative branch/jump target computed in execute.
    pub branch_target: u16,
    /// ALU zero flag.
    pub zero: bool,
    /// ALU result (or JAL's link value, or the memory effective address).
    pub alu_result: u16,
    /// Forwarded `rt` value, used by the memory stage for stores.
    pub store_data: u16,
    /// Selected destination register, carried through from ID/EX.
    pub dest_reg: u16,
    /// 8-bit control word; `0` marks this entry as a bubble.
    pub ctrl: u8,
}

impl ExMem {
    /// Zeroes all fields, producing a bubble.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Atomically overwrites all fields.
    #[allow(clippy::too_many_arguments)]
    pub fn write(
        &mut self,
        instr: u16,
        branch_target: u16,
        zero: bool,
        alu_result: u16,
        store_data: u16,
        dest_reg: u16,
        ctrl: u8,
    ) {
        self.instr = instr;
        self.branch_target = branch_target;
        self.zero = zero;
        self.alu_result = alu_result;
        self.store_data = store_data;
        self.dest_reg = dest_reg;
        self.ctrl = ctrl;
    }
}

/// MEM/WB latch: the final values the writeback stage commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemWb {
    /// Raw instruction word, kept for display.
    pub instr: u16,
    /// Data memory read result (valid when `MemRead` is set).
    pub mem_data: u16,
    /// ALU result, used when `MemToReg` selects it.
    pub alu_result: u16,
    /// Selected destination register, carried through from EX/MEM.
    pub dest_reg: u16,
    /// 8-bit control word; `0` marks this entry as a bubble.
    pub ctrl: u8,
}

impl MemWb {
    /// Zeroes all fields, producing a bubble.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Atomically overwrites all fields.
    pub fn write(&mut self, instr: u16, mem_data: u16, alu_result: u16, dest_reg: u16, ctrl: u8) {
        self.instr = instr;
        self.mem_data = mem_data;
        self.alu_result = alu_result;
        self.dest_reg = dest_reg;
        self.ctrl = ctrl;
    }

    /// The writeback data (`MemToReg` mux): memory data if `MemToReg` is
    /// set, otherwise the ALU result.
    #[must_use]
    pub fn write_data(&self) -> u16 {
        use crate::isa::control_bits::MEM_TO_REG;
        if self.ctrl & (1 << MEM_TO_REG) != 0 {
            self.mem_data
        } else {
            self.alu_result
        }
    }

    /// True iff this entry will commit a write to a nonzero register.
    #[must_use]
    pub fn writes_register(&self) -> bool {
        use crate::isa::control_bits::REG_WRITE;
        self.ctrl & (1 << REG_WRITE) != 0 && self.dest_reg != 0
    }
}
