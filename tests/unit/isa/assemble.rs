//! Assembler listing and diagnostic shape tests.

use pipeline16::asm::machine_code_listing;

#[test]
fn listing_reports_pc_hex_binary_and_disassembly() {
    let (lines, errors) = machine_code_listing("addi r1, r0, 5\n");
    assert!(errors.is_empty());
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.pc, Some(0));
    assert_eq!(line.value, Some(0x1045));
    assert_eq!(line.hex, "1045");
    assert_eq!(line.binary, "0001000001000101");
    assert_eq!(line.asm, "addi r1, r0, 5");
    assert!(!line.error && !line.blank);
}

#[test]
fn listing_marks_blank_and_label_only_lines() {
    let (lines, errors) = machine_code_listing("\nloop:\naddi r1, r0, 1\n");
    assert!(errors.is_empty());
    assert!(lines[0].blank && lines[0].pc.is_none());
    assert!(lines[1].blank && lines[1].pc.is_none());
    assert_eq!(lines[2].pc, Some(0));
}

#[test]
fn listing_marks_error_lines_with_sentinel_shape() {
    let (lines, errors) = machine_code_listing("addi r1, r0\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    let line = &lines[0];
    assert!(line.error && !line.blank);
    assert_eq!(line.value, None);
    assert_eq!(line.hex, "0000");
    assert_eq!(line.asm, "----");
}

#[test]
fn undefined_label_is_reported_with_source_line() {
    let (_, errors) = pipeline16::assemble("j nowhere\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Undefined label"));
    assert_eq!(errors[0].source_text, "j nowhere");
}

#[test]
fn negative_jump_literal_is_accepted() {
    let (words, errors) = pipeline16::assemble("j -1\n");
    assert!(errors.is_empty());
    assert_eq!(words, [Some(pipeline16::isa::opcodes::J << 12 | 0x0FFF)]);
}

#[test]
fn jump_literal_out_of_range_is_rejected() {
    let (_, errors) = pipeline16::assemble("j -2049\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("out of range"));

    let (_, errors) = pipeline16::assemble("j 4096\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("out of range"));
}

#[test]
fn ld_and_st_are_accepted_as_lw_sw_aliases() {
    let (words, errors) = pipeline16::assemble("ld r1, 4(r2)\nst r1, 4(r2)\n");
    assert!(errors.is_empty());
    let (lw_words, lw_errors) = pipeline16::assemble("lw r1, 4(r2)\nsw r1, 4(r2)\n");
    assert!(lw_errors.is_empty());
    assert_eq!(words, lw_words);
}
