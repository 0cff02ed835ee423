//! The `lex` command: show how a program is segmented and dispatched.

use tally_eval::segment;
use tally_lexer::tokenize;
use tally_patterns::OperationRegistry;

use crate::middleware::MiddlewarePipeline;

use super::read_file;

/// Print each statement with the operation that would run it and, when the
/// statement is a plain expression, its tokens.
pub fn lex_file(path: &str) {
    let source = read_file(path);
    let statements = segment(&MiddlewarePipeline::standard().process(&source));
    let registry = match OperationRegistry::builtin() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("cannot build the operation registry: {err}");
            std::process::exit(1);
        }
    };

    let program = statements.join("\n");
    let mut offset = 0;

    println!("Statements for '{path}' ({} statements):", statements.len());
    for (line, statement) in statements.iter().enumerate() {
        println!("  {:>4} | {statement}", line + 1);
        match registry.select(statement, &program[offset..]) {
            Some(selection) => println!(
                "       -> {} (score {})",
                selection.operation.name(),
                selection.score
            ),
            None => println!("       -> no matching operation"),
        }
        if let Ok(tokens) = tokenize(statement) {
            let rendered: Vec<String> = tokens.iter().map(|t| format!("{t:?}")).collect();
            println!("       tokens: {}", rendered.join(" "));
        }
        offset += statement.len() + 1;
    }
}
