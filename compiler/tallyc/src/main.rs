//! Tally CLI.

use tallyc::commands::{check_file, explain_error, lex_file, list_operations, run_file};
use tallyc::tracing_setup::init_tracing;
use tallyc::{is_source_path, InterpreterConfig};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let (config, files) = parse_options(&args[2..]);
            let Some(path) = files.first() else {
                eprintln!("error: missing file path");
                eprintln!("Usage: tally run <file.tly> [options]");
                std::process::exit(1);
            };
            run_file(path, &config);
        }
        "check" => {
            let (config, files) = parse_options(&args[2..]);
            if files.is_empty() {
                eprintln!("Usage: tally check <file.tly>...");
                std::process::exit(1);
            }
            for path in &files {
                check_file(path, &config);
            }
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: tally lex <file.tly>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "ops" => list_operations(),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("Tally {}", env!("CARGO_PKG_VERSION"));
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: tally --explain <ERROR_CODE>");
                eprintln!("Example: tally --explain E6001");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        _ => {
            // `tally main.tly [options]` is shorthand for `tally run`
            if is_source_path(command) {
                let (config, _) = parse_options(&args[2..]);
                run_file(command, &config);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn parse_options(args: &[String]) -> (InterpreterConfig, Vec<String>) {
    match InterpreterConfig::from_args(args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Tally interpreter");
    println!();
    println!("Usage: tally <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.tly>       Run a program");
    println!("  check <file.tly>...  Report statements no operation accepts (no execution)");
    println!("  lex <file.tly>       Show statements, their operations and tokens");
    println!("  ops                  List the statement forms the interpreter accepts");
    println!("  --explain <code>     Explain an error code (e.g., E6001)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --color=<mode>       Diagnostic colors: auto (default), always, never");
    println!("  --max-steps=<n>      Stop after n dispatched statements");
    println!("  --quiet, -q          Discard program output");
    println!();
    println!("Environment:");
    println!("  NO_COLOR             Disable diagnostic colors");
    println!("  RUST_LOG             Enable tracing (e.g., RUST_LOG=tally_eval=debug)");
    println!("  TALLY_LOG_TREE=1     Render tracing as an indented tree");
    println!();
    println!("Examples:");
    println!("  tally run main.tly");
    println!("  tally main.tly --max-steps=100000");
    println!("  tally check lib.tly");
    println!("  tally --explain E6020");
}
