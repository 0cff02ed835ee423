use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

// RemoveComments

#[test]
fn test_line_comment_removed() {
    assert_eq!(
        RemoveComments.process("let a = 1; // note\nprint a;"),
        "let a = 1; \nprint a;"
    );
}

#[test]
fn test_comment_markers_inside_quotes_kept() {
    assert_eq!(
        RemoveComments.process(r#"print "http://x/*y*/;;z"; // gone"#),
        r#"print "http://x/*y*/;;z";"#
    );
}

#[test]
fn test_double_semicolon_comment_keeps_terminator() {
    assert_eq!(
        RemoveComments.process("let a = 1;; trailing words\nprint a;"),
        "let a = 1;\nprint a;"
    );
}

#[test]
fn test_block_comments() {
    assert_eq!(RemoveComments.process("let a = /* x */ 1;"), "let a =   1;");
    assert_eq!(RemoveComments.process("/* one\ntwo */print 1;"), "print 1;");
    assert_eq!(RemoveComments.process("/*/ still open */print 1;"), "print 1;");
}

#[test]
fn test_unterminated_block_comment_runs_to_end() {
    assert_eq!(RemoveComments.process("print 1; /* open"), "print 1;");
}

// FlattenMultiline

#[test]
fn test_indented_continuation_joined() {
    assert_eq!(
        FlattenMultiline.process("let total =\n    a + b;\nprint total;"),
        "let total = a + b;\nprint total;"
    );
}

#[test]
fn test_indented_line_after_terminator_kept() {
    let text = "let a = 1;\n    print a;";
    assert_eq!(FlattenMultiline.process(text), text);
}

#[test]
fn test_map_literal_flattened() {
    assert_eq!(
        FlattenMultiline.process("let m = {\n    a: 1,\n    b: 2\n} as map;"),
        "let m = { a: 1, b: 2\n} as map;"
    );
}

// TrimWhitespace

#[test]
fn test_whitespace_runs_collapse() {
    assert_eq!(TrimWhitespace.process("  let   a =\n\t1;  "), "let a = 1;");
}

#[test]
fn test_quoted_whitespace_kept() {
    assert_eq!(
        TrimWhitespace.process("print   \"a   b\" ;"),
        "print \"a   b\" ;"
    );
}

// Pipeline

#[test]
fn test_standard_pipeline_order() {
    assert_eq!(
        MiddlewarePipeline::standard().names(),
        vec!["remove-comments", "flatten-multiline", "trim-whitespace"]
    );
}

#[test]
fn test_duplicate_stage_ignored() {
    let mut pipeline = MiddlewarePipeline::new();
    pipeline.add(TrimWhitespace);
    pipeline.add(TrimWhitespace);
    assert_eq!(pipeline.names(), vec!["trim-whitespace"]);
}

#[test]
fn test_empty_pipeline_is_identity() {
    assert_eq!(MiddlewarePipeline::new().process(" a \n b "), " a \n b ");
}

#[test]
fn test_class_block_normalized() {
    let source = "class Book:\n    Title: \"Unknown\"; // default\n    Copies: 0 as int;\nclass:end;";
    assert_eq!(
        MiddlewarePipeline::standard().process(source),
        "class Book: Title: \"Unknown\"; Copies: 0 as int; class:end;"
    );
}

proptest! {
    #[test]
    fn prop_trim_whitespace_normalizes(input in "[a-z; \n\t]{0,40}") {
        let once = TrimWhitespace.process(&input);
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(once.trim(), once.as_str());
        prop_assert!(!once.contains(['\n', '\t']));
        prop_assert_eq!(TrimWhitespace.process(&once), once);
    }
}
