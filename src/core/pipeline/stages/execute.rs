//! EX stage: operand forwarding, ALU execution, and branch/jump resolution.

use crate::core::alu::alu;
use crate::core::cpu::Cpu;
use crate::core::pipeline::forwarding::{self, ForwardSource};
use crate::core::snapshot::{hex_and_asm, ExDisplay};
use crate::isa::control_bits::{ALU_SRC, BRANCH, JUMP, REG_WRITE};
use crate::isa::{decode_fields, opcodes};

pub(crate) fn execute(cpu: &mut Cpu) {
    let ctrl = cpu.id_ex.ctrl;
    let alu_src = ctrl & (1 << ALU_SRC) != 0;
    let jump = ctrl & (1 << JUMP) != 0;
    let branch = ctrl & (1 << BRANCH) != 0;
    let reg_write_ex = ctrl & (1 << REG_WRITE) != 0;

    let decision = forwarding::resolve(
        cpu.id_ex.rs,
        cpu.id_ex.rt,
        cpu.ex_mem.ctrl & (1 << REG_WRITE) != 0,
        cpu.ex_mem.dest_reg,
        cpu.mem_wb.ctrl & (1 << REG_WRITE) != 0,
        cpu.mem_wb.dest_reg,
    );
    cpu.hazard_info.forward_a = decision.a;
    cpu.hazard_info.forward_b = decision.b;

    let alu_a = match decision.a {
        ForwardSource::ExMem => cpu.ex_mem.alu_result,
        ForwardSource::MemWb => cpu.mem_wb.write_data(),
        ForwardSource::None => cpu.id_ex.read_data1,
    };
    let reg_b = match decision.b {
        ForwardSource::ExMem => cpu.ex_mem.alu_result,
        ForwardSource::MemWb => cpu.mem_wb.write_data(),
        ForwardSource::None => cpu.id_ex.read_data2,
    };

    let alu_b = if alu_src { cpu.id_ex.imm } else { reg_b };

    let (mut alu_result, zero) = alu(alu_a, alu_b, cpu.id_ex.alu_ctrl);

    let branch_target = cpu.id_ex.pc.wrapping_add(cpu.id_ex.imm);

    let is_jal = jump && reg_write_ex;
    if is_jal {
        alu_result = cpu.id_ex.pc.wrapping_add(1);
    }

    let instr = cpu.id_ex.instr;
    let opcode = decode_fields(instr).opcode;
    let is_bne = opcode == opcodes::BNE;

    let branch_taken = if is_bne { branch && !zero } else { branch && zero };
    let pc_src = branch_taken || jump;
    cpu.hazard_info.pc_src = pc_src;

    if pc_src {
        let is_jr = jump && alu_src;
        cpu.pc = if is_jr { alu_a } else { branch_target };
    }

    let store_data = reg_b;

    cpu.ex_mem.write(
        instr,
        branch_target,
        zero,
        alu_result,
        store_data,
        cpu.id_ex.dest_reg,
        ctrl,
    );

    let (hex, asm) = hex_and_asm(instr);
    cpu.stage_display.ex_stage = ExDisplay {
        pc: cpu.id_ex.pc,
        instr,
        hex,
        asm,
        alu_a,
        alu_b,
        alu_result,
        zero,
        branch_target,
        pc_src,
    };
}
