//! The single-cycle, combinational ALU.
//!
//! `alu_ctrl` reuses the R-type `func` field directly (§4.2): BEQ/BNE drive
//! this with `SUB` to compute the zero flag, everything else drives it
//! with `ADD`.

use crate::isa::{as_signed_16, funcs, truncate_16};

/// Executes one ALU operation on signed 16-bit operands.
///
/// Returns the truncated 16-bit result (reinterpreted as unsigned) and the
/// zero flag (`result == 0`). Division by zero yields `0`, never a trap.
/// An unrecognized `alu_ctrl` yields `0`.
#[must_use]
pub fn alu(a: u16, b: u16, alu_ctrl: u16) -> (u16, bool) {
    let a = as_signed_16(a);
    let b = as_signed_16(b);

    let result: i32 = match alu_ctrl {
        funcs::ADD => i32::from(a) + i32::from(b),
        funcs::SUB => i32::from(a) - i32::from(b),
        funcs::AND => i32::from(a & b),
        funcs::OR => i32::from(a | b),
        funcs::XOR => i32::from(a ^ b),
        funcs::SLT => i32::from(a < b),
        funcs::DIV => {
            if b == 0 {
                0
            } else {
                i32::from(a.wrapping_div(b))
            }
        }
        _ => 0,
    };

    let truncated = truncate_16(result as u32);
    (truncated, truncated == 0)
}
