//! Line- and operand-level tokenizing shared by both assembler passes.

const MNEMONICS: &[&str] = &[
    "add", "sub", "and", "or", "xor", "slt", "div", "addi", "lw", "ld", "sw", "st", "beq", "bne",
    "j", "jal", "jr", "nop", "halt",
];

/// Strips a trailing `#` or `;` comment and surrounding whitespace.
#[must_use]
pub(super) fn strip_comment(line: &str) -> &str {
    let line = line.split('#').next().unwrap_or("");
    let line = line.split(';').next().unwrap_or("");
    line.trim()
}

/// Splits a line on its first `:`, returning `(label, rest)`. `label` is
/// `None` if there is no colon; `rest` is the (possibly empty) text after
/// the colon, trimmed.
#[must_use]
pub(super) fn split_label(line: &str) -> (Option<&str>, &str) {
    match line.split_once(':') {
        Some((label, rest)) => (Some(label.trim()), rest.trim()),
        None => (None, line),
    }
}

/// `true` iff `line` (already comment-stripped, label-stripped) begins
/// with a recognized mnemonic.
#[must_use]
pub(super) fn is_instruction_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|m| MNEMONICS.contains(&m.to_ascii_lowercase().as_str()))
}

/// Splits `operands_str` on top-level commas, treating parenthesized
/// text as opaque so `imm(rs)` operands survive intact.
pub(super) fn split_operands(operands_str: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for ch in operands_str.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Parses `operands_str` into exactly `expected` operands.
pub(super) fn parse_operands(
    operands_str: &str,
    expected: usize,
    format: &str,
) -> Result<Vec<String>, String> {
    let parts = split_operands(operands_str);
    if parts.len() != expected {
        return Err(format!(
            "Expected {expected} operand(s), got {}. Format: {format}",
            parts.len()
        ));
    }
    Ok(parts)
}

/// Parses `r0`..`r7`, case-insensitively.
pub(super) fn parse_reg(reg_str: &str) -> Result<u16, String> {
    let reg_str = reg_str.trim().to_ascii_lowercase();
    let digits = reg_str
        .strip_prefix('r')
        .ok_or_else(|| format!("Invalid register format: '{reg_str}'. Expected r0-r7"))?;
    let reg_num: i64 = digits
        .parse()
        .map_err(|_| format!("Invalid register number: '{reg_str}'. Expected r0-r7"))?;
    if !(0..=7).contains(&reg_num) {
        return Err(format!(
            "Register out of range: '{reg_str}'. Valid registers: r0-r7"
        ));
    }
    Ok(reg_num as u16)
}

/// Parses an integer literal, supporting `0x`/`0b` prefixes and a
/// leading `-`.
pub(super) fn parse_int(s: &str) -> Result<i64, String> {
    let s = s.trim().to_ascii_lowercase();
    let err = || format!("Invalid integer literal: '{s}'");
    if let Some(digits) = s.strip_prefix("-0x") {
        i64::from_str_radix(digits, 16).map(|v| -v).map_err(|_| err())
    } else if let Some(digits) = s.strip_prefix("0x") {
        i64::from_str_radix(digits, 16).map_err(|_| err())
    } else if let Some(digits) = s.strip_prefix("-0b") {
        i64::from_str_radix(digits, 2).map(|v| -v).map_err(|_| err())
    } else if let Some(digits) = s.strip_prefix("0b") {
        i64::from_str_radix(digits, 2).map_err(|_| err())
    } else {
        s.parse().map_err(|_| err())
    }
}

/// Parses a signed immediate of `bits` width, returning its two's
/// complement bit pattern.
pub(super) fn parse_imm_signed(s: &str, bits: u32) -> Result<u16, String> {
    let val = parse_int(s)?;
    let lo = -(1i64 << (bits - 1));
    let hi = (1i64 << (bits - 1)) - 1;
    if val < lo || val > hi {
        return Err(format!(
            "Immediate out of range [{lo}, {hi}]: {val} (from '{s}')"
        ));
    }
    Ok((val & ((1i64 << bits) - 1)) as u16)
}

/// Parses a `imm(rs)` memory operand into `(imm6, rs)`.
pub(super) fn parse_mem_operand(mem_str: &str) -> Result<(u16, u16), String> {
    let mem_str = mem_str.trim();
    let open = mem_str
        .find('(')
        .ok_or_else(|| format!("Memory operand must be in format imm(rs), got: '{mem_str}'"))?;
    if !mem_str.ends_with(')') {
        return Err(format!(
            "Memory operand must be in format imm(rs), got: '{mem_str}'"
        ));
    }
    let imm_str = mem_str[..open].trim();
    let rs_str = mem_str[open + 1..mem_str.len() - 1].trim();
    if imm_str.is_empty() {
        return Err(format!(
            "Missing immediate value in memory operand: '{mem_str}'"
        ));
    }
    if rs_str.is_empty() {
        return Err(format!("Missing register in memory operand: '{mem_str}'"));
    }
    let imm = parse_imm_signed(imm_str, 6)?;
    let rs = parse_reg(rs_str)?;
    Ok((imm, rs))
}

/// `true` iff `operand` looks like a label reference rather than a
/// numeric literal: starts with an alphabetic character and is not one
/// of the `0x`/`0b`/`-0x`/`-0b` numeric prefixes.
#[must_use]
pub(super) fn looks_like_label(operand: &str) -> bool {
    let lower = operand.to_ascii_lowercase();
    operand.chars().next().is_some_and(char::is_alphabetic)
        && !["0x", "0b", "-0x", "-0b"]
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}
