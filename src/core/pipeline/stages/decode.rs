//! ID stage: instruction decode, register read with write-first bypass,
//! and ID/EX latch write.

use crate::core::cpu::Cpu;
use crate::core::pipeline::hazards;
use crate::core::snapshot::{hex_and_asm, IdDisplay};
use crate::isa::control_bits::{JUMP, MEM_READ, REG_DST, REG_WRITE};
use crate::isa::{control_for, decode_fields, funcs, opcodes, sign_extend_12, sign_extend_6};

pub(crate) fn decode(cpu: &mut Cpu) {
    let instr = cpu.if_id.instr;
    let fields = decode_fields(instr);

    // The load-use check compares the instruction *currently* sitting in
    // ID/EX (a load, if one is there) against the operands of the
    // instruction we're about to decode. It must run before `id_ex.write`
    // below overwrites that latch with this instruction's own decode.
    let id_ex_memread = cpu.id_ex.ctrl & (1 << MEM_READ) != 0;
    let stall = hazards::detect(id_ex_memread, cpu.id_ex.rt, fields.rs, fields.rt);
    cpu.hazard_info.stall = !stall.pc_write;
    cpu.load_use_stall = stall;

    let mut ctrl = control_for(fields.opcode);

    let alu_ctrl = if fields.opcode == opcodes::R_TYPE {
        fields.func
    } else if fields.opcode == opcodes::BEQ || fields.opcode == opcodes::BNE {
        funcs::SUB
    } else {
        funcs::ADD
    };

    let read_data1 = cpu.read_register_with_bypass(fields.rs);
    let read_data2 = cpu.read_register_with_bypass(fields.rt);

    let imm_extended = if fields.opcode == opcodes::J || fields.opcode == opcodes::JAL {
        sign_extend_12(fields.imm12)
    } else {
        sign_extend_6(fields.imm6)
    };

    let reg_dst = ctrl & (1 << REG_DST) != 0;
    let jump = ctrl & (1 << JUMP) != 0;
    let reg_write = ctrl & (1 << REG_WRITE) != 0;
    let is_jal = jump && reg_write;

    let dest_reg = if is_jal {
        7
    } else if reg_dst {
        fields.rd
    } else {
        fields.rt
    };

    cpu.hazard_info.flush_idex = stall.idex_flush;
    if stall.idex_flush || cpu.hazard_info.pc_src {
        ctrl = 0;
    }

    cpu.id_ex.write(
        cpu.if_id.pc_plus_1.wrapping_sub(1),
        instr,
        read_data1,
        read_data2,
        imm_extended,
        fields.rs,
        fields.rt,
        dest_reg,
        ctrl,
        alu_ctrl,
    );

    let (hex, asm) = hex_and_asm(instr);
    cpu.stage_display.id_stage = IdDisplay {
        instr,
        hex,
        asm,
        rs: fields.rs,
        rt: fields.rt,
        rd: fields.rd,
        ctrl,
        read_data1,
        read_data2,
    };
}
