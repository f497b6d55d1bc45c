//! The seven concrete end-to-end scenarios (§8).

use crate::common::TestContext;

#[test]
fn basic_add() {
    let mut ctx = TestContext::assemble(
        "addi r1, r0, 5\n\
         addi r2, r0, 3\n\
         add r3, r1, r2\n",
    );
    ctx.run(15);
    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 3);
    assert_eq!(ctx.reg(3), 8);
}

#[test]
fn load_store() {
    let mut ctx = TestContext::assemble(
        "addi r1, r0, 10\n\
         sw r1, 0(r0)\n\
         lw r2, 0(r0)\n",
    );
    ctx.run(10);
    assert_eq!(ctx.data_mem(0), 10);
    assert_eq!(ctx.reg(2), 10);
}

#[test]
fn forwarding_chain() {
    let mut ctx = TestContext::assemble(
        "addi r1, r0, 5\n\
         add r2, r1, r1\n\
         add r3, r2, r2\n",
    );
    ctx.run(15);
    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 10);
    assert_eq!(ctx.reg(3), 20);
    assert!(!ctx.ever_stalled());
}

#[test]
fn load_use_stall() {
    let mut ctx = TestContext::assemble("lw r1, 0(r0)\nadd r2, r1, r1\n").with_data_mem(0, 7);
    ctx.run(10);
    assert!(ctx.ever_stalled());
    assert_eq!(ctx.reg(2), 14);
}

#[test]
fn taken_branch_skips_two() {
    let mut ctx = TestContext::assemble(
        "addi r1, r0, 5\n\
         addi r2, r0, 5\n\
         beq r1, r2, 3\n\
         addi r3, r0, 1\n\
         addi r4, r0, 2\n\
         addi r5, r0, 3\n",
    );
    ctx.run(20);
    assert_eq!(ctx.reg(3), 0);
    assert_eq!(ctx.reg(4), 0);
    assert_eq!(ctx.reg(5), 3);
}

#[test]
fn jump_with_label() {
    let mut ctx = TestContext::assemble(
        "addi r1, r0, 1\n\
         j skip\n\
         addi r2, r0, 2\n\
         addi r3, r0, 3\n\
         skip: addi r4, r0, 4\n",
    );
    ctx.run(20);
    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.reg(2), 0);
    assert_eq!(ctx.reg(3), 0);
    assert_eq!(ctx.reg(4), 4);
}

#[test]
fn div_by_zero_yields_zero_without_a_fault() {
    let mut ctx = TestContext::assemble(
        "addi r1, r0, 10\n\
         addi r2, r0, 0\n\
         div r3, r1, r2\n",
    );
    ctx.run(15);
    assert_eq!(ctx.reg(3), 0);
}
