//! A two-pass assembler for the 16-bit teaching ISA.
//!
//! Pass 1 walks the source collecting label addresses; pass 2 encodes
//! each instruction line, resolving labels and producing PC-relative
//! branch/jump offsets. Both passes preserve line position: the result
//! is one entry per input line, `None` for blank, label-only, or
//! erroring lines, so a caller can always map a diagnostic back to its
//! source line.

mod lexer;

use std::collections::HashMap;

use crate::isa::{funcs, opcodes};

/// A single assembly diagnostic.
///
/// This is plain data, not a [`std::error::Error`] — assembly
/// diagnostics are expected, user-facing results of assembling
/// arbitrary text, not failures of the assembler itself.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AssembleError {
    /// 1-based source line number.
    pub line: usize,
    /// Human-readable description of the problem.
    pub message: String,
    /// The offending line, verbatim (trailing whitespace trimmed).
    pub source_text: String,
}

/// One line of an assembly listing: its source text and the word it
/// produced, if any.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LineRecord {
    /// 1-based source line number.
    pub line: usize,
    /// The line's source text, verbatim.
    pub source_text: String,
    /// The encoded instruction word, or `None` for a blank, comment-only,
    /// or label-only line.
    pub word: Option<u16>,
    /// Instruction address assigned in pass 1, or `None` for a line that
    /// produced no word.
    pub pc: Option<u16>,
}

/// The machine-code presentation of one assembly line (§6): a successful
/// line's address, hex/binary/decimal rendering, and disassembly, or a
/// fixed sentinel shape for a blank or erroring line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MachineCodeLine {
    /// 1-based source line number.
    pub line: usize,
    /// Instruction address, present only for a successfully encoded line.
    pub pc: Option<u16>,
    /// Upper-case 4-hex-digit rendering of the word (`"0000"` for the
    /// sentinel shape).
    pub hex: String,
    /// 16-character `'0'`/`'1'` rendering of the word (all zero for the
    /// sentinel shape).
    pub binary: String,
    /// The encoded word, or `None` for the sentinel shape.
    pub value: Option<u16>,
    /// Disassembly of the word, or `"----"` for the sentinel shape.
    pub asm: String,
    /// `true` iff this line failed to assemble.
    pub error: bool,
    /// `true` iff this line was blank, comment-only, or label-only.
    pub blank: bool,
}

/// Assembles `text`, returning one entry per input line (`None` for
/// blank/label-only/erroring lines) and the diagnostics produced.
#[must_use]
pub fn assemble(text: &str) -> (Vec<Option<u16>>, Vec<AssembleError>) {
    let (records, errors) = assemble_with_listing(text);
    let words = records.into_iter().map(|r| r.word).collect();
    (words, errors)
}

/// Assembles `text`, returning a full per-line listing alongside the
/// diagnostics produced.
#[must_use]
pub fn assemble_with_listing(text: &str) -> (Vec<LineRecord>, Vec<AssembleError>) {
    let lines: Vec<&str> = text.lines().collect();
    let labels = collect_labels(&lines);

    let mut records = Vec::with_capacity(lines.len());
    let mut errors = Vec::new();
    let mut instruction_address: u16 = 0;

    for (idx, original) in lines.iter().enumerate() {
        let line_num = idx + 1;
        let stripped = lexer::strip_comment(original);

        if stripped.is_empty() {
            records.push(LineRecord {
                line: line_num,
                source_text: (*original).to_string(),
                word: None,
                pc: None,
            });
            continue;
        }

        let (label, rest) = lexer::split_label(stripped);
        let body = if label.is_some() { rest } else { stripped };

        if label.is_some() && body.is_empty() {
            records.push(LineRecord {
                line: line_num,
                source_text: (*original).to_string(),
                word: None,
                pc: None,
            });
            continue;
        }

        match encode_line(body, &labels, instruction_address) {
            Ok(word) => {
                records.push(LineRecord {
                    line: line_num,
                    source_text: (*original).to_string(),
                    word: Some(word),
                    pc: Some(instruction_address),
                });
                instruction_address += 1;
            }
            Err(message) => {
                errors.push(AssembleError {
                    line: line_num,
                    message,
                    source_text: (*original).trim_end().to_string(),
                });
                records.push(LineRecord {
                    line: line_num,
                    source_text: (*original).to_string(),
                    word: None,
                    pc: None,
                });
            }
        }
    }

    (records, errors)
}

/// Assembles `text` and renders the §6 machine-code presentation: one
/// entry per input line, each either a successfully encoded instruction
/// (address, hex, binary, decimal value, disassembly) or the fixed
/// blank/error sentinel shape.
///
/// This is a read-side convenience built from [`assemble_with_listing`];
/// it does not change assembly semantics in any way.
#[must_use]
pub fn machine_code_listing(text: &str) -> (Vec<MachineCodeLine>, Vec<AssembleError>) {
    let (records, errors) = assemble_with_listing(text);
    let error_lines: std::collections::HashSet<usize> = errors.iter().map(|e| e.line).collect();

    let lines = records
        .into_iter()
        .map(|r| match r.word {
            Some(word) => MachineCodeLine {
                line: r.line,
                pc: r.pc,
                hex: format!("{word:04X}"),
                binary: format!("{word:016b}"),
                value: Some(word),
                asm: crate::isa::disasm::disassemble(word),
                error: false,
                blank: false,
            },
            None => MachineCodeLine {
                line: r.line,
                pc: None,
                hex: "0000".to_string(),
                binary: "0".repeat(16),
                value: None,
                asm: "----".to_string(),
                error: error_lines.contains(&r.line),
                blank: !error_lines.contains(&r.line),
            },
        })
        .collect();

    (lines, errors)
}

fn collect_labels(lines: &[&str]) -> HashMap<String, u16> {
    let mut labels = HashMap::new();
    let mut instruction_address: u16 = 0;

    for original in lines {
        let stripped = lexer::strip_comment(original);
        if stripped.is_empty() {
            continue;
        }

        let (label, rest) = lexer::split_label(stripped);
        let body = if let Some(name) = label {
            if !name.is_empty() {
                labels.insert(name.to_ascii_lowercase(), instruction_address);
            }
            if rest.is_empty() {
                continue;
            }
            rest
        } else {
            stripped
        };

        if lexer::is_instruction_line(body) {
            instruction_address += 1;
        }
    }

    labels
}

fn encode_line(line: &str, labels: &HashMap<String, u16>, pc: u16) -> Result<u16, String> {
    let normalized: String = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut parts = normalized.splitn(2, ' ');
    let mnemonic = parts
        .next()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| "Empty instruction".to_string())?
        .to_ascii_lowercase();
    let operands_str = parts.next().unwrap_or("");

    let mnemonic = match mnemonic.as_str() {
        "ld" => "lw".to_string(),
        "st" => "sw".to_string(),
        other => other.to_string(),
    };

    let r_type_func = match mnemonic.as_str() {
        "add" => Some(funcs::ADD),
        "sub" => Some(funcs::SUB),
        "and" => Some(funcs::AND),
        "or" => Some(funcs::OR),
        "xor" => Some(funcs::XOR),
        "slt" => Some(funcs::SLT),
        "div" => Some(funcs::DIV),
        _ => None,
    };

    if let Some(func) = r_type_func {
        let ops = lexer::parse_operands(operands_str, 3, &format!("{mnemonic} rd, rs, rt"))?;
        let rd = lexer::parse_reg(&ops[0])?;
        let rs = lexer::parse_reg(&ops[1])?;
        let rt = lexer::parse_reg(&ops[2])?;
        return Ok((opcodes::R_TYPE << 12) | (rs << 9) | (rt << 6) | (rd << 3) | func);
    }

    match mnemonic.as_str() {
        "addi" => {
            let ops = lexer::parse_operands(operands_str, 3, "addi rt, rs, imm6")?;
            let rt = lexer::parse_reg(&ops[0])?;
            let rs = lexer::parse_reg(&ops[1])?;
            let imm6 = lexer::parse_imm_signed(&ops[2], 6)?;
            Ok((opcodes::ADDI << 12) | (rs << 9) | (rt << 6) | (imm6 & 0x3F))
        }
        "lw" => {
            let ops = lexer::parse_operands(operands_str, 2, "lw rt, imm6(rs)")?;
            let rt = lexer::parse_reg(&ops[0])?;
            let (imm6, rs) = lexer::parse_mem_operand(&ops[1])?;
            Ok((opcodes::LW << 12) | (rs << 9) | (rt << 6) | (imm6 & 0x3F))
        }
        "sw" => {
            let ops = lexer::parse_operands(operands_str, 2, "sw rt, imm6(rs)")?;
            let rt = lexer::parse_reg(&ops[0])?;
            let (imm6, rs) = lexer::parse_mem_operand(&ops[1])?;
            Ok((opcodes::SW << 12) | (rs << 9) | (rt << 6) | (imm6 & 0x3F))
        }
        "beq" => {
            let ops = lexer::parse_operands(operands_str, 3, "beq rs, rt, off6")?;
            let rs = lexer::parse_reg(&ops[0])?;
            let rt = lexer::parse_reg(&ops[1])?;
            let off6 = parse_branch_operand(&ops[2], labels, pc)?;
            Ok((opcodes::BEQ << 12) | (rs << 9) | (rt << 6) | (off6 & 0x3F))
        }
        "bne" => {
            let ops = lexer::parse_operands(operands_str, 3, "bne rs, rt, off6")?;
            let rs = lexer::parse_reg(&ops[0])?;
            let rt = lexer::parse_reg(&ops[1])?;
            let off6 = parse_branch_operand(&ops[2], labels, pc)?;
            Ok((opcodes::BNE << 12) | (rs << 9) | (rt << 6) | (off6 & 0x3F))
        }
        "halt" => {
            if !operands_str.is_empty() {
                return Err(format!("halt takes no operands, got: {operands_str}"));
            }
            Ok(opcodes::HALT << 12)
        }
        "j" => {
            let ops = lexer::parse_operands(operands_str, 1, "j target")?;
            let imm12 = parse_jump_operand(&ops[0], labels, pc)?;
            Ok((opcodes::J << 12) | (imm12 & 0x0FFF))
        }
        "jal" => {
            let ops = lexer::parse_operands(operands_str, 1, "jal target")?;
            let imm12 = parse_jump_operand(&ops[0], labels, pc)?;
            Ok((opcodes::JAL << 12) | (imm12 & 0x0FFF))
        }
        "jr" => {
            let ops = lexer::parse_operands(operands_str, 1, "jr rs")?;
            let rs = lexer::parse_reg(&ops[0])?;
            Ok((opcodes::JR << 12) | (rs << 9))
        }
        "nop" => {
            if !operands_str.is_empty() {
                return Err(format!("nop takes no operands, got: {operands_str}"));
            }
            Ok(0)
        }
        other => Err(format!(
            "Unknown instruction: '{other}'. Valid instructions: add, sub, and, or, xor, slt, \
             div, addi, lw, ld, sw, st, beq, bne, j, jal, jr, nop, halt"
        )),
    }
}

fn parse_branch_operand(
    operand: &str,
    labels: &HashMap<String, u16>,
    current_pc: u16,
) -> Result<u16, String> {
    let operand = operand.trim();
    if lexer::looks_like_label(operand) {
        let target = labels
            .get(&operand.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| format!("Undefined label: '{operand}'"))?;
        let offset = i64::from(target) - (i64::from(current_pc) + 1);
        if !(-32..=31).contains(&offset) {
            return Err(format!(
                "Branch offset out of range [-32, 31]: {offset} (from label '{operand}')"
            ));
        }
        return Ok((offset & 0x3F) as u16);
    }
    lexer::parse_imm_signed(operand, 6)
}

fn parse_jump_operand(
    operand: &str,
    labels: &HashMap<String, u16>,
    current_pc: u16,
) -> Result<u16, String> {
    let operand = operand.trim();
    if lexer::looks_like_label(operand) {
        let target = labels
            .get(&operand.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| format!("Undefined label: '{operand}'"))?;
        let offset = i64::from(target) - i64::from(current_pc);
        if !(-2048..=2047).contains(&offset) {
            return Err(format!(
                "Jump offset out of range [-2048, 2047]: {offset} (from label '{operand}')"
            ));
        }
        return Ok((offset & 0x0FFF) as u16);
    }
    // A bare numeric jump target is an absolute 12-bit field, not a
    // PC-relative delta. Both representations are accepted: the signed
    // form `spec.md` §4.4 documents (`[-2048, 2047]`), and the unsigned
    // form `disassemble` prints for J/JAL (`f.imm12` is never
    // sign-extended), since their bit patterns coincide where they
    // overlap (e.g. `-1` and `4095` both encode to `0xFFF`).
    let val = lexer::parse_int(operand)?;
    if !(-2048..=0x0FFF).contains(&val) {
        return Err(format!("Jump target out of range [-2048, 4095]: {val}"));
    }
    Ok((val & 0x0FFF) as u16)
}
