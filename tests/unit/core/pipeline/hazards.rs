//! Load-Use Hazard Detection Tests.
//!
//! Verifies that `detect` correctly raises a one-cycle stall when the
//! instruction sitting in ID/EX is a load whose destination is a source
//! operand of the instruction currently being decoded.

use pipeline16::core::pipeline::hazards::detect;

#[test]
fn stalls_when_load_dest_matches_rs() {
    let s = detect(true, 3, 3, 5);
    assert!(!s.pc_write && !s.ifid_write && s.idex_flush);
}

#[test]
fn stalls_when_load_dest_matches_rt() {
    let s = detect(true, 3, 5, 3);
    assert!(!s.pc_write && !s.ifid_write && s.idex_flush);
}

#[test]
fn no_stall_without_a_load_in_flight() {
    let s = detect(false, 3, 3, 5);
    assert!(s.pc_write && s.ifid_write && !s.idex_flush);
}

#[test]
fn no_stall_when_operands_do_not_overlap() {
    let s = detect(true, 3, 1, 2);
    assert!(s.pc_write);
}

#[test]
fn no_stall_when_load_targets_r0() {
    // r0 is hardwired to zero, so a load into it can never create a
    // real dependency.
    let s = detect(true, 0, 0, 0);
    assert!(s.pc_write);
}
