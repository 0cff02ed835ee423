use pretty_assertions::assert_eq;

use super::*;

fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(ToString::to_string).collect()
}

#[test]
fn test_branch_stops_at_else() {
    let program = lines(&["IF x THEN", "a = 1", "ELSE", "a = 2", "ENDIF"]);
    assert_eq!(find_terminator(&program, 0, BlockKind::Branch), Some(2));
    assert_eq!(find_terminator(&program, 2, BlockKind::EndIf), Some(4));
}

#[test]
fn test_nested_if_pairs_with_own_endif() {
    let program = lines(&[
        "IF a THEN",
        "IF b THEN",
        "x = 1",
        "ELSE",
        "x = 2",
        "ENDIF",
        "ELSE",
        "x = 3",
        "endif",
    ]);
    assert_eq!(find_terminator(&program, 0, BlockKind::Branch), Some(6));
    assert_eq!(find_terminator(&program, 0, BlockKind::EndIf), Some(8));
    assert_eq!(find_terminator(&program, 1, BlockKind::Branch), Some(3));
}

#[test]
fn test_inline_loops_do_not_nest() {
    let program = lines(&[
        "FOR i WHEN i << 3 DO",
        "FOR j WHEN j << 2 DO j = j + 1",
        "FOR k WHEN k << 2 =>",
        "ENDFOR",
        "ENDFOR",
    ]);
    assert_eq!(find_terminator(&program, 0, BlockKind::For), Some(4));
    assert_eq!(find_terminator(&program, 2, BlockKind::For), Some(3));
}

#[test]
fn test_foreach_terminator() {
    let program = lines(&["FOREACH v IN xs DO", "print v", "ENDFOREACH"]);
    assert_eq!(find_terminator(&program, 0, BlockKind::Foreach), Some(2));
    assert_eq!(find_terminator(&program, 0, BlockKind::For), None);
}

#[test]
fn test_missing_terminator() {
    let program = lines(&["IF x THEN", "a = 1"]);
    assert_eq!(find_terminator(&program, 0, BlockKind::Branch), None);
}

#[test]
fn test_offset_between() {
    assert_eq!(offset_between(3, 7), 4);
    assert_eq!(offset_between(7, 3), -4);
}

#[test]
fn test_closes_active_loop() {
    let mut stacks = ControlStacks::default();
    stacks.loops.push(LoopContext::Counting {
        iterator: "i".into(),
        header: 0,
        end: Some(5),
        owned: true,
        condition: "i << 3".into(),
        inline: String::new(),
    });
    assert!(stacks.closes_active_loop(5));
    assert!(!stacks.closes_active_loop(4));
}

#[test]
fn test_leave_blocks_pops_only_departed_ifs() {
    let program = lines(&[
        "IF a THEN",
        "IF b THEN",
        "goto next",
        "ENDIF",
        "next:",
        "ENDIF",
    ]);
    let mut stacks = ControlStacks {
        conditions: vec![true, false],
        loops: Vec::new(),
    };
    stacks.leave_blocks(&program, 2, 4);
    assert_eq!(stacks.conditions, vec![true]);
}
