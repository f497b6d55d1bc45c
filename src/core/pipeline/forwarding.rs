//! Execute-stage operand forwarding (§4.7).
//!
//! Resolves read-after-write hazards by bypassing the register file:
//! a not-yet-committed result from EX/MEM or MEM/WB is routed directly
//! into the ALU's operand muxes. EX/MEM wins over MEM/WB when both would
//! forward the same register, since it is the more recent producer.

/// Selects which pipeline stage (if any) feeds an ALU operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum ForwardSource {
    /// No forwarding; use the value latched in ID/EX.
    #[default]
    None,
    /// Forward the EX/MEM stage's result (one cycle old).
    ExMem,
    /// Forward the MEM/WB stage's writeback value (two cycles old).
    MemWb,
}

impl ForwardSource {
    /// Two-bit code used in the display/wire-format presentation
    /// (`"00"`, `"10"`, `"01"`), matching the source's convention exactly.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::None => "00",
            Self::ExMem => "10",
            Self::MemWb => "01",
        }
    }
}

/// The forwarding decision for both ALU operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForwardDecision {
    /// Source feeding the `rs`-derived ALU operand.
    pub a: ForwardSource,
    /// Source feeding the `rt`-derived ALU operand.
    pub b: ForwardSource,
}

/// Computes the forwarding decision for the instruction in execute.
///
/// `id_ex_rs`/`id_ex_rt` are its source registers; the remaining
/// arguments describe whether EX/MEM and MEM/WB will write a register
/// this cycle, and to which register.
#[must_use]
pub fn resolve(
    id_ex_rs: u16,
    id_ex_rt: u16,
    ex_mem_reg_write: bool,
    ex_mem_dest: u16,
    mem_wb_reg_write: bool,
    mem_wb_dest: u16,
) -> ForwardDecision {
    let pick = |src: u16| {
        if ex_mem_reg_write && ex_mem_dest != 0 && ex_mem_dest == src {
            ForwardSource::ExMem
        } else if mem_wb_reg_write && mem_wb_dest != 0 && mem_wb_dest == src {
            ForwardSource::MemWb
        } else {
            ForwardSource::None
        }
    };

    ForwardDecision {
        a: pick(id_ex_rs),
        b: pick(id_ex_rt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_forwarding_needed() {
        let d = resolve(1, 2, false, 0, false, 0);
        assert_eq!(d.a, ForwardSource::None);
        assert_eq!(d.b, ForwardSource::None);
    }

    #[test]
    fn ex_mem_wins_over_mem_wb() {
        let d = resolve(3, 0, true, 3, true, 3);
        assert_eq!(d.a, ForwardSource::ExMem);
    }

    #[test]
    fn mem_wb_forwards_when_ex_mem_does_not_match() {
        let d = resolve(3, 0, true, 4, true, 3);
        assert_eq!(d.a, ForwardSource::MemWb);
    }

    #[test]
    fn register_zero_never_forwards() {
        let d = resolve(0, 0, true, 0, true, 0);
        assert_eq!(d.a, ForwardSource::None);
        assert_eq!(d.b, ForwardSource::None);
    }

    #[test]
    fn codes_match_wire_format() {
        assert_eq!(ForwardSource::None.code(), "00");
        assert_eq!(ForwardSource::ExMem.code(), "10");
        assert_eq!(ForwardSource::MemWb.code(), "01");
    }
}
