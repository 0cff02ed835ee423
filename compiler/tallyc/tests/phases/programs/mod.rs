//! Complete programs, run from source text through preprocessing,
//! segmentation and dispatch.

use pretty_assertions::assert_eq;
use tally_diagnostic::ErrorCode;
use tallyc::{read_source, run_source};

use crate::common::{failure, fixture, interpreter, output};

#[test]
fn test_library_fixture() {
    let source = read_source(&fixture("library.tly")).unwrap();
    assert_eq!(output(&source), "Private\nJane Smith\nJohn Roe\n2\n");
}

#[test]
fn test_fixture_leaves_expected_bindings() {
    let source = read_source(&fixture("library.tly")).unwrap();
    let mut interp = interpreter();
    run_source(&mut interp, &source).unwrap();

    let mut classes = interp.classes().names();
    classes.sort_unstable();
    assert_eq!(classes, vec!["Book", "Library"]);
    assert!(interp.variables().contains("total"));
    assert!(!interp.variables().contains("m"));
}

#[test]
fn test_multiline_statement_and_comments() {
    let source = "\
let total = // running sum
    1 +
    2;
print total; ;; trailing comment
/* block */ print total * 2;";
    assert_eq!(output(source), "3\n6\n");
}

#[test]
fn test_comment_markers_in_strings_survive() {
    assert_eq!(
        output(r#"print "http://example.com/*x*/";"#),
        "http://example.com/*x*/\n"
    );
}

#[test]
fn test_left_to_right_arithmetic() {
    assert_eq!(output("print 2+2*(22);"), "88\n");
}

#[test]
fn test_goto_loop() {
    let source = "\
let i = 0;
again:
i = i + 1;
IF i < 3 THEN
    goto again;
ENDIF
print \"done \" + i;";
    assert_eq!(output(source), "done 3\n");
}

#[test]
fn test_if_else_blocks() {
    let source = "\
let score = 72;
IF score >= 50 THEN
    print \"pass\";
ELSE
    print \"fail\";
ENDIF
IF score > 90 THEN
    print \"top\";
ELSE
    print \"not top\";
ENDIF";
    assert_eq!(output(source), "pass\nnot top\n");
}

#[test]
fn test_inline_counting_loop_cleans_up() {
    let (diag, printed) = failure("FOR n WHEN n << 20 DO n = n + 2; print \"after\"; Get n;");
    assert_eq!(printed, "after\n");
    assert_eq!(diag.code, ErrorCode::E6020);
    assert_eq!(diag.source.map(|s| s.text), Some("Get n".to_string()));
}

#[test]
fn test_block_counting_loop() {
    let source = "\
let sum = 0;
FOR k WHEN k < 4 DO;
    sum = sum + k;
    k = k + 1;
ENDFOR;
print sum;";
    assert_eq!(output(source), "6\n");
}

#[test]
fn test_foreach_over_map_pairs() {
    let source = "\
let prices = {apple: 3, pear: 5};
FOREACH price, fruit IN prices DO;
    print fruit + \"=\" + price;
ENDFOREACH;";
    assert_eq!(output(source), "apple=3\npear=5\n");
}

#[test]
fn test_class_fields_and_property_writes() {
    let source = "\
class Pet:
    age: 3;
class:end;
let pet = Pet:new;
get pet->age;
set pet->age = 4;
get pet->age;";
    assert_eq!(output(source), "3\n4\n");
}

#[test]
fn test_division_results() {
    assert_eq!(output("DIV 10 5; DIV 7 2;"), "2\n3.5\n");
    let (diag, _) = failure("DIV 10 0;");
    assert_eq!(diag.code, ErrorCode::E6001);
}

#[test]
fn test_reassignment_keeps_type() {
    assert_eq!(output("let n = 1; n = 5; print n;"), "5\n");
    let (diag, _) = failure("let n = 1; n = \"five\";");
    assert_eq!(diag.code, ErrorCode::E6012);
}

#[test]
fn test_step_limit_stops_runaway_loop() {
    let (diag, _) = failure("spin: goto spin;");
    assert_eq!(diag.code, ErrorCode::E6040);
}
