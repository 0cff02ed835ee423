use pretty_assertions::assert_eq;
use tally_patterns::{ClassInstance, EvalErrorKind};

use super::*;
use crate::print_handler::buffer_handler;

fn interpreter() -> Interpreter {
    Interpreter::builder()
        .print_handler(buffer_handler())
        .max_steps(Some(10_000))
        .build()
        .unwrap_or_else(|err| panic!("builtin registry: {err}"))
}

/// Run `source` and return its output.
fn output(source: &str) -> String {
    let mut interp = interpreter();
    match interp.run(source) {
        Ok(()) => interp.output(),
        Err(err) => panic!("{source:?} failed: {err}"),
    }
}

fn failure(source: &str) -> EvalError {
    let mut interp = interpreter();
    match interp.run(source) {
        Ok(()) => panic!("{source:?} should fail"),
        Err(err) => err,
    }
}

fn shout(instance: &ClassInstance, args: &[Value]) -> EvalResult {
    let times = args.first().map_or(Ok(1.0), Value::as_number)?;
    Ok(Value::text(format!("{}x{times}", instance.class_name())))
}

// Sequencing

#[test]
fn test_let_and_print() {
    assert_eq!(output("let a = 5; let b = a + 2; print b;"), "7\n");
}

#[test]
fn test_binary_let_bare_and_quoted() {
    let mut interp = interpreter();
    assert_eq!(interp.run(r#"let a = 00000001 as binary; let b = "00000001" as binary"#), Ok(()));
    assert_eq!(interp.run("let c = 101 as binary"), Ok(()));
    let bytes = Value::array(vec![Value::number(1.0)]);
    assert_eq!(interp.variables().get("a"), Some(&bytes));
    assert_eq!(interp.variables().get("b"), Some(&bytes));
    assert_eq!(interp.variables().get("c"), Some(&Value::number(5.0)));
}

#[test]
fn test_reassignment_keeps_type() {
    let err = failure(r#"let a = 5; a = "five""#);
    assert_eq!(
        err.kind,
        EvalErrorKind::VariantChange {
            name: "a".into(),
            expected: "number".into(),
            got: "text".into()
        }
    );
    assert_eq!(err.line, Some(1));
}

#[test]
fn test_typed_let() {
    assert_eq!(output("let n = \"42\" as int; print n + 1"), "43\n");
}

// Conditionals

#[test]
fn test_if_true_skips_else() {
    assert_eq!(
        output(r#"let n = 3; IF n > 2 THEN print "big" ELSE print "small" ENDIF print "done""#),
        "big\ndone\n"
    );
}

#[test]
fn test_if_false_runs_else() {
    assert_eq!(
        output(r#"let n = 1; IF n > 2 THEN print "big" ELSE print "small" ENDIF"#),
        "small\n"
    );
}

#[test]
fn test_nested_if() {
    let source = r#"
        let a = 1; let b = 2;
        IF a == 1 THEN
            IF b == 3 THEN print "inner" ENDIF
            print "outer"
        ENDIF
    "#;
    assert_eq!(output(source), "outer\n");
}

#[test]
fn test_non_boolean_condition() {
    let err = failure("IF 1 + 1 THEN print 1 ENDIF");
    assert!(matches!(err.kind, EvalErrorKind::NonBooleanCondition { .. }));
    assert_eq!(err.statement.as_deref(), Some("IF 1 + 1 THEN"));
}

// Loops

#[test]
fn test_block_for_cleans_up_iterator() {
    let mut interp = interpreter();
    let result = interp.run("FOR i WHEN i < 3 DO; print i; i = i + 1; ENDFOR; print \"end\"");
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), "0\n1\n2\nend\n");
    assert!(!interp.variables().contains("i"));
}

#[test]
fn test_inline_for_with_existing_iterator() {
    assert_eq!(output("let n = 0; FOR n WHEN n < 4 => n = n + 1; print n"), "4\n");
}

#[test]
fn test_for_false_skips_body() {
    assert_eq!(
        output("let i = 5; FOR i WHEN i < 3 DO; print i; ENDFOR; print \"skipped\""),
        "skipped\n"
    );
}

#[test]
fn test_foreach_block() {
    assert_eq!(
        output("let xs = [1, 2, 3]; FOREACH x IN xs DO; print x * 10; ENDFOREACH"),
        "10\n20\n30\n"
    );
}

#[test]
fn test_foreach_map_with_key() {
    assert_eq!(
        output(r#"let m = {a: 1, b: 2}; FOREACH v, k IN m DO; print k + "=" + v; ENDFOREACH"#),
        "a=1\nb=2\n"
    );
}

#[test]
fn test_foreach_inline_runs_once_and_skips_block() {
    assert_eq!(
        output("let xs = [4, 5]; FOREACH x IN xs => print x; ENDFOREACH; print 9"),
        "4\n9\n"
    );
}

#[test]
fn test_foreach_keeps_existing_loop_variable() {
    assert_eq!(
        output("let x = 99; let arr = [1, 2]; FOREACH x IN arr DO; print x; ENDFOREACH; print x"),
        "1\n2\n2\n"
    );
    assert_eq!(
        output("let x = 99; FOREACH x IN [7, 8] => print x; ENDFOREACH; print x"),
        "7\n7\n"
    );
}

#[test]
fn test_foreach_removes_variables_it_created() {
    let err = failure("FOREACH x IN [1] DO; print x; ENDFOREACH; print x");
    assert_eq!(err.kind, EvalErrorKind::UndefinedVariable { name: "x".into() });
}

#[test]
fn test_inline_error_carries_note() {
    let err = failure("FOR i WHEN i < 2 => print ghost");
    assert_eq!(err.kind, EvalErrorKind::UndefinedVariable { name: "ghost".into() });
    assert_eq!(err.span, None);
    assert_eq!(err.line, Some(0));
    assert_eq!(err.notes, vec!["in inline statement `print ghost`".to_string()]);
}

// Goto

#[test]
fn test_goto_loop() {
    let source = "let n = 0; top: n = n + 1; IF n < 3 THEN goto top ENDIF print n";
    assert_eq!(output(source), "3\n");
}

#[test]
fn test_duplicate_label_behind_goto() {
    let err = failure("goto L; L:; print 1; L:; print 2");
    assert_eq!(err.kind, EvalErrorKind::DuplicateLabel { name: "L".into() });
    assert_eq!(err.line, Some(3));
}

#[test]
fn test_goto_out_of_inner_if_keeps_outer_branch() {
    let source = "let a = 1; \
        IF a == 1 THEN; IF a == 2 THEN; print 0; ELSE; goto L; ENDIF; \
        L:; print 1; ELSE; print 2; ENDIF; print 3";
    assert_eq!(output(source), "1\n3\n");
}

#[test]
fn test_step_limit() {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .max_steps(Some(10))
        .build()
        .unwrap_or_else(|err| panic!("builtin registry: {err}"));
    let err = interp.run("spin: goto spin").err().map(|e| e.kind);
    assert_eq!(err, Some(EvalErrorKind::StepLimitExceeded { limit: 10 }));
}

// Classes

#[test]
fn test_class_fields_and_paths() {
    let source = r#"
        class Book:
            Title: "Unknown";
            Copies: 0 as int;
            Shelf: Copies + 2;
        class:end;
        let b = Book:new;
        b->Copies = 8;
        Get b->Copies;
        Get b->Shelf;
        Get b->Type;
    "#;
    assert_eq!(output(source), "8\n2\nBook\n");
}

#[test]
fn test_class_overwrite_marker() {
    let source = r#"
        class Lib:
            Kind: "Public";
            Kind: "Private" $overwrite$;
        class:end;
        let l = Lib:new; Get l->Kind
    "#;
    assert_eq!(output(source), "Private\n");

    let err = failure("class Lib: Kind: 1; Kind: 2; class:end");
    assert_eq!(
        err.kind,
        EvalErrorKind::DuplicateField {
            class: "Lib".into(),
            field: "Kind".into()
        }
    );
}

#[test]
fn test_library_sample() {
    let source = r#"
        class Library:
            Members: 0;
            Books: 0;
            LibraryType: "Public" $overwrite$;
        class:end;
        let Library = Library:new;
        let Member1 = {
            MemberId: 1,
            Name: "John Doe"
        } as map;
        let Member2 = {MemberId: 2, Name: "Jane Smith"} as map;
        Library->Members = [Member1, Member2] as array;
        Get Library->Members[1]->Name;
        Library->Members[0]->Name = "John Roe";
        Get Member1->Name;
        Library = Library:new;
        Get Library->Members;
    "#;
    assert_eq!(output(source), "Jane Smith\nJohn Roe\n0\n");
}

#[test]
fn test_native_method_via_call_and_path() {
    let mut interp = interpreter();
    assert_eq!(interp.define_method("Pet", "shout", shout), Ok(()));
    let result = interp.run("class Pet: age: 1; class:end; let p = Pet:new; CALL p->shout(3); Get p.shout()");
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), "Petx3\nPetx1\n");
}

#[test]
fn test_builtin_fields_method() {
    assert_eq!(
        output("class Pet: age: 1; class:end; let p = Pet:new; CALL p->fields()"),
        "[\"Type\", \"age\"]\n"
    );
}

#[test]
fn test_unterminated_class() {
    let err = failure("class Pet: age: 1;");
    assert!(matches!(err.kind, EvalErrorKind::MissingTerminator { .. }));
}

// Dispatch

#[test]
fn test_no_matching_operation() {
    let err = failure("print 1; let = 5");
    assert!(matches!(err.kind, EvalErrorKind::NoMatchingOperation { .. }));
    assert_eq!(err.line, Some(1));
    assert_eq!(err.statement.as_deref(), Some("let = 5"));
}

#[test]
fn test_check_reports_without_running() {
    let interp = interpreter();
    let problems = interp.check("print 1; bogus stuff; print 2");
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].line, Some(1));
    assert_eq!(interp.output(), "");
}

#[test]
fn test_variables_persist_between_runs() {
    let mut interp = interpreter();
    assert_eq!(interp.run("let n = 2"), Ok(()));
    assert_eq!(interp.run("print n * 2"), Ok(()));
    assert_eq!(interp.output(), "4\n");
    assert_eq!(interp.statements(), ["print n * 2".to_string()]);
}

#[test]
fn test_conditional_assignment_statement() {
    assert_eq!(output("let n = 5; let ok = n < 10 = 10; print n"), "10\n");
}

#[test]
fn test_math_operations_print() {
    assert_eq!(output("ADD 2 3; DIV 9 3"), "5\n3\n");
}
