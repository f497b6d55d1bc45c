//! Load-use hazard detection (§4.6).
//!
//! A load-use hazard arises when the instruction sitting in ID/EX is a
//! load whose destination is a source operand of the instruction
//! currently in decode. There is exactly one hazard shape in this
//! in-order, single-issue pipeline — unlike a superscalar hazard unit,
//! nothing here needs to scan multiple in-flight instructions per stage.

/// Result of the load-use hazard check: the three control signals that
/// freeze the front end and inject a bubble for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StallSignals {
    /// Write-enable for the program counter.
    pub pc_write: bool,
    /// Write-enable for the IF/ID latch.
    pub ifid_write: bool,
    /// Force the next ID/EX latch write to a bubble (`ctrl = 0`).
    pub idex_flush: bool,
}

impl Default for StallSignals {
    fn default() -> Self {
        Self::PASS_THROUGH
    }
}

impl StallSignals {
    /// The non-stalling, pass-through signal set.
    const PASS_THROUGH: Self = Self {
        pc_write: true,
        ifid_write: true,
        idex_flush: false,
    };

    /// The one-cycle stall signal set: freeze PC and IF/ID, bubble ID/EX.
    const STALL: Self = Self {
        pc_write: false,
        ifid_write: false,
        idex_flush: true,
    };
}

/// Decides whether a load-use stall is required this cycle.
///
/// `id_ex_memread` and `id_ex_rt` describe the instruction currently in
/// ID/EX (the load, if any); `if_id_rs`/`if_id_rt` are the source
/// registers of the instruction currently being decoded.
#[must_use]
pub fn detect(id_ex_memread: bool, id_ex_rt: u16, if_id_rs: u16, if_id_rt: u16) -> StallSignals {
    let hazard =
        id_ex_memread && id_ex_rt != 0 && (id_ex_rt == if_id_rs || id_ex_rt == if_id_rt);

    if hazard {
        StallSignals::STALL
    } else {
        StallSignals::PASS_THROUGH
    }
}
