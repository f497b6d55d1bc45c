//! MEM stage: data memory access and MEM/WB latch write.

use crate::core::cpu::Cpu;
use crate::core::snapshot::{hex_and_asm, MemDisplay};
use crate::isa::control_bits::{MEM_READ, MEM_WRITE};

pub(crate) fn memory(cpu: &mut Cpu) {
    let ctrl = cpu.ex_mem.ctrl;
    let mem_read = ctrl & (1 << MEM_READ) != 0;
    let mem_write = ctrl & (1 << MEM_WRITE) != 0;

    let addr = cpu.ex_mem.alu_result & 0xFF;

    let mem_data = if mem_read {
        cpu.data_mem.read_or_zero(addr)
    } else {
        0
    };

    if mem_write {
        cpu.data_mem.write(addr, cpu.ex_mem.store_data);
    }

    let instr = cpu.ex_mem.instr;

    cpu.mem_wb
        .write(instr, mem_data, cpu.ex_mem.alu_result, cpu.ex_mem.dest_reg, ctrl);

    let (hex, asm) = hex_and_asm(instr);
    cpu.stage_display.mem_stage = MemDisplay {
        instr,
        hex,
        asm,
        addr,
        mem_read,
        mem_write,
        mem_data,
        write_data: if mem_write { cpu.ex_mem.store_data } else { 0 },
    };
}
