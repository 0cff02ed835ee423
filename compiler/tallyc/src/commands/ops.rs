//! The `ops` command: list the statement forms the interpreter accepts.

use tally_patterns::{InputSpec, MatchScope, OperationRegistry};

/// Print every built-in operation in registration order.
pub fn list_operations() {
    let registry = match OperationRegistry::builtin() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("cannot build the operation registry: {err}");
            std::process::exit(1);
        }
    };

    println!("{} operations:", registry.len());
    for op in registry.iter() {
        println!();
        println!("{}: {}", op.name(), op.description());
        println!("  example: {}", op.example());
        println!("  pattern: {}", op.pattern());
        if op.scope() == MatchScope::WholeProgram {
            println!("  matches: the rest of the program");
        }
        let inputs: Vec<String> = op.inputs().iter().map(InputSpec::describe).collect();
        if !inputs.is_empty() {
            println!("  inputs:  {}", inputs.join(", "));
        }
    }
}
