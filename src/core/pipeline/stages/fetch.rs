//! IF stage: fetch, load-use hazard detection, and IF/ID latch write.

use crate::core::cpu::Cpu;
use crate::core::snapshot::{hex_and_asm, IfDisplay};

pub(crate) fn fetch(cpu: &mut Cpu) {
    // The load-use decision was computed by `decode` earlier this cycle,
    // against the ID/EX latch as it stood before decode overwrote it.
    let stall = cpu.load_use_stall;

    let instr = cpu.instr_mem.read_or_zero(cpu.pc);
    let pc_plus_1 = cpu.pc.wrapping_add(1);

    if stall.ifid_write {
        if cpu.hazard_info.pc_src {
            cpu.if_id.write(pc_plus_1, 0);
            cpu.hazard_info.flush_ifid = true;
        } else {
            cpu.if_id.write(pc_plus_1, instr);
            cpu.hazard_info.flush_ifid = false;
        }
    }

    if stall.pc_write && !cpu.hazard_info.pc_src {
        cpu.pc = pc_plus_1;
    }

    let (hex, asm) = hex_and_asm(instr);
    cpu.stage_display.if_stage = IfDisplay {
        pc: cpu.pc,
        instr,
        hex,
        asm,
        pc_plus_1,
    };
}
