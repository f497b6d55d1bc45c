//! The observable state of a [`Cpu`](crate::core::cpu::Cpu) at a point in
//! time: everything an external visualizer needs to render a cycle (§6).

use serde::Serialize;

use crate::core::pipeline::forwarding::ForwardSource;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::isa::disasm::disassemble;

/// Hazard and control-transfer signals produced during the most recent
/// [`step`](crate::core::cpu::Cpu::step) call.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct HazardInfo {
    /// `true` iff the front end was frozen this cycle (load-use stall).
    pub stall: bool,
    /// `true` iff IF/ID was written with a bubble this cycle.
    pub flush_ifid: bool,
    /// `true` iff the next ID/EX write will be forced to a bubble.
    pub flush_idex: bool,
    /// Forwarding source for the `rs`-derived ALU operand.
    pub forward_a: ForwardSource,
    /// Forwarding source for the `rt`-derived ALU operand.
    pub forward_b: ForwardSource,
    /// Reserved for store-data forwarding display; this pipeline always
    /// forwards store data through the ordinary `rt` forwarding path, so
    /// this flag is carried for wire-format compatibility but never set.
    pub store_fwd: bool,
    /// `true` iff a branch/jump resolved taken in execute this cycle —
    /// the signal that drives the IF-stage flush and PC override.
    pub pc_src: bool,
}

/// Per-stage display fields for the IF stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IfDisplay {
    /// Program counter after this IF evaluation.
    pub pc: u16,
    /// Raw fetched instruction.
    pub instr: u16,
    /// Upper-case 4-hex rendering of `instr`.
    pub hex: String,
    /// Disassembly of `instr`.
    pub asm: String,
    /// `pc + 1`, latched into IF/ID.
    pub pc_plus_1: u16,
}

/// Per-stage display fields for the ID stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IdDisplay {
    /// Raw instruction being decoded.
    pub instr: u16,
    /// Upper-case 4-hex rendering of `instr`.
    pub hex: String,
    /// Disassembly of `instr`.
    pub asm: String,
    /// Decoded `rs` field.
    pub rs: u16,
    /// Decoded `rt` field.
    pub rt: u16,
    /// Decoded `rd` field.
    pub rd: u16,
    /// Control word latched into ID/EX (after any bubble injection).
    pub ctrl: u8,
    /// Register-file read value for `rs`.
    pub read_data1: u16,
    /// Register-file read value for `rt`.
    pub read_data2: u16,
}

/// Per-stage display fields for the EX stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExDisplay {
    /// PC of the instruction in execute.
    pub pc: u16,
    /// Raw instruction in execute.
    pub instr: u16,
    /// Upper-case 4-hex rendering of `instr`.
    pub hex: String,
    /// Disassembly of `instr`.
    pub asm: String,
    /// ALU operand A, post-forwarding.
    pub alu_a: u16,
    /// ALU operand B, post-forwarding and `ALUSrc` mux.
    pub alu_b: u16,
    /// ALU result.
    pub alu_result: u16,
    /// ALU zero flag.
    pub zero: bool,
    /// PC-relative branch/jump target.
    pub branch_target: u16,
    /// Whether this cycle's branch/jump resolution overrides the PC.
    pub pc_src: bool,
}

/// Per-stage display fields for the MEM stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MemDisplay {
    /// Raw instruction in memory access.
    pub instr: u16,
    /// Upper-case 4-hex rendering of `instr`.
    pub hex: String,
    /// Disassembly of `instr`.
    pub asm: String,
    /// Effective data memory address (`alu_result & 0xFF`).
    pub addr: u16,
    /// Whether a memory read occurred.
    pub mem_read: bool,
    /// Whether a memory write occurred.
    pub mem_write: bool,
    /// Data read from memory (valid when `mem_read`).
    pub mem_data: u16,
    /// Data written to memory (valid when `mem_write`).
    pub write_data: u16,
}

/// Per-stage display fields for the WB stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct WbDisplay {
    /// Raw instruction in writeback.
    pub instr: u16,
    /// Upper-case 4-hex rendering of `instr`.
    pub hex: String,
    /// Disassembly of `instr`.
    pub asm: String,
    /// Destination register, if any.
    pub dest_reg: u16,
    /// Data committed to the register file (or that would have been,
    /// had `reg_write` been set).
    pub write_data: u16,
    /// Whether a register file write occurred.
    pub reg_write: bool,
}

/// The per-stage display snapshot for all five stages.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StageDisplay {
    /// IF-stage fields.
    pub if_stage: IfDisplay,
    /// ID-stage fields.
    pub id_stage: IdDisplay,
    /// EX-stage fields.
    pub ex_stage: ExDisplay,
    /// MEM-stage fields.
    pub mem_stage: MemDisplay,
    /// WB-stage fields.
    pub wb_stage: WbDisplay,
}

/// A latch's contents for the snapshot, alongside the hex rendering of
/// its carried instruction that a visualizer wants without re-decoding.
#[derive(Clone, Debug, Serialize)]
pub struct LatchView<T: Serialize> {
    /// The latch's own fields.
    #[serde(flatten)]
    pub entry: T,
    /// Upper-case 4-hex rendering of the latch's `instr` field.
    pub instr_hex: String,
}

/// The complete observable state of a [`Cpu`](crate::core::cpu::Cpu) at
/// the end of a `step()` call (§6, `StateSnapshot`).
#[derive(Clone, Debug, Serialize)]
pub struct StateSnapshot {
    /// Cycle counter.
    pub cycle: u64,
    /// Program counter.
    pub pc: u16,
    /// IF/ID latch.
    pub if_id: LatchView<IfId>,
    /// ID/EX latch.
    pub id_ex: LatchView<IdEx>,
    /// EX/MEM latch.
    pub ex_mem: LatchView<ExMem>,
    /// MEM/WB latch.
    pub mem_wb: LatchView<MemWb>,
    /// Hazard/forwarding/control-transfer signals from the last step.
    pub hazards: HazardInfo,
    /// Per-stage display fields from the last step.
    pub stage_display: StageDisplay,
    /// All 8 register values.
    pub regfile: [u16; crate::isa::REG_COUNT],
    /// `(addr, value)` pairs for nonzero data memory words.
    pub data_mem: Vec<(usize, u16)>,
    /// Disassembly of the full instruction memory image.
    pub instr_mem: Vec<crate::isa::disasm::DisassembledLine>,
}

pub(super) fn latch_view<T: Serialize + Copy>(entry: T, instr: u16) -> LatchView<T> {
    LatchView {
        entry,
        instr_hex: format!("{instr:04X}"),
    }
}

pub(super) fn hex_and_asm(instr: u16) -> (String, String) {
    (format!("{instr:04X}"), disassemble(instr))
}
