//! Disassembler: raw 16-bit word → mnemonic text.
//!
//! Every opcode, including unrecognized ones, produces a string; this
//! module never panics or returns an error.

use super::{as_signed_16, decode_fields, funcs, opcodes};

/// Disassembles a single instruction word.
///
/// Word `0x0000` always renders as `nop`, even though it is also the
/// (invalid) R-type encoding with `func == ADD`; the all-zero word is the
/// pipeline's bubble sentinel and is special-cased before the opcode match.
#[must_use]
pub fn disassemble(word: u16) -> String {
    if word == 0 {
        return "nop".to_string();
    }

    let f = decode_fields(word);
    match f.opcode {
        opcodes::R_TYPE => r_type_mnemonic(f.func).map_or_else(
            || format!("unknown_func_{}", f.func),
            |mn| format!("{mn} r{}, r{}, r{}", f.rd, f.rs, f.rt),
        ),
        opcodes::ADDI => format!(
            "addi r{}, r{}, {}",
            f.rt,
            f.rs,
            as_signed_16(super::sign_extend_6(f.imm6))
        ),
        opcodes::LW => format!(
            "ld r{}, {}(r{})",
            f.rt,
            as_signed_16(super::sign_extend_6(f.imm6)),
            f.rs
        ),
        opcodes::SW => format!(
            "st r{}, {}(r{})",
            f.rt,
            as_signed_16(super::sign_extend_6(f.imm6)),
            f.rs
        ),
        opcodes::BEQ => format!(
            "beq r{}, r{}, {}",
            f.rs,
            f.rt,
            as_signed_16(super::sign_extend_6(f.imm6))
        ),
        opcodes::BNE => format!(
            "bne r{}, r{}, {}",
            f.rs,
            f.rt,
            as_signed_16(super::sign_extend_6(f.imm6))
        ),
        opcodes::J => format!("j {}", f.imm12),
        opcodes::JAL => format!("jal {}", f.imm12),
        opcodes::JR => format!("jr r{}", f.rs),
        opcodes::HALT => "halt".to_string(),
        other => format!("unknown_opcode_{other}"),
    }
}

fn r_type_mnemonic(func: u16) -> Option<&'static str> {
    match func {
        funcs::ADD => Some("add"),
        funcs::SUB => Some("sub"),
        funcs::AND => Some("and"),
        funcs::OR => Some("or"),
        funcs::XOR => Some("xor"),
        funcs::SLT => Some("slt"),
        funcs::DIV => Some("div"),
        _ => None,
    }
}

/// One disassembled line of an instruction memory image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DisassembledLine {
    /// Word address (equals the array index in `words`).
    pub pc: usize,
    /// Upper-case 4-hex-digit rendering of the word.
    pub hex: String,
    /// Mnemonic text from [`disassemble`].
    pub asm: String,
}

/// Disassembles a full instruction memory image, one line per word.
#[must_use]
pub fn disassemble_program(words: &[u16]) -> Vec<DisassembledLine> {
    words
        .iter()
        .enumerate()
        .map(|(pc, &word)| DisassembledLine {
            pc,
            hex: format!("{word:04X}"),
            asm: disassemble(word),
        })
        .collect()
}
