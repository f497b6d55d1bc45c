//! WB stage: register file commit.

use crate::core::cpu::Cpu;
use crate::core::snapshot::{hex_and_asm, WbDisplay};
use crate::isa::control_bits::REG_WRITE;

pub(crate) fn writeback(cpu: &mut Cpu) {
    let ctrl = cpu.mem_wb.ctrl;
    let reg_write = ctrl & (1 << REG_WRITE) != 0;

    let write_data = cpu.mem_wb.write_data();

    if reg_write && cpu.mem_wb.dest_reg != 0 {
        cpu.regs.write(cpu.mem_wb.dest_reg, write_data);
    }

    let instr = cpu.mem_wb.instr;
    let (hex, asm) = hex_and_asm(instr);
    cpu.stage_display.wb_stage = WbDisplay {
        instr,
        hex,
        asm,
        dest_reg: cpu.mem_wb.dest_reg,
        write_data,
        reg_write,
    };
}
