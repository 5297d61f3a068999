//! kestrel-js: REPL and script runner for the Kestrel JavaScript
//! runtime.

use clap::Parser as ClapParser;
use js_cli::repl::{enable_test_mode, run_repl, ReplOptions};
use js_cli::run::{parse_and_run, strip_shebang, RunOptions};
use js_cli::Cli;
use runtime::Interpreter;
use std::process::ExitCode;
use std::rc::Rc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut interpreter = Interpreter::new();
    interpreter
        .heap_mut()
        .set_should_collect_on_every_allocation(cli.gc_on_every_allocation);

    match cli.script {
        Some(path) => {
            interpreter.set_console_client(Rc::new(js_cli::console::ReplConsoleClient));
            if cli.test_mode {
                enable_test_mode(&mut interpreter);
            }
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(error) => {
                    eprintln!("Failed to open {}: {}", path, error);
                    return ExitCode::from(1);
                }
            };
            let options = RunOptions {
                dump_ast: cli.dump_ast,
                print_last_result: cli.print_last_result,
            };
            if parse_and_run(&mut interpreter, strip_shebang(&source), options) {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        None => {
            let options = ReplOptions {
                dump_ast: cli.dump_ast,
                syntax_highlight: !cli.no_syntax_highlight,
                test_mode: cli.test_mode,
            };
            match run_repl(&mut interpreter, options) {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => {
                    eprintln!("{}", error);
                    ExitCode::from(1)
                }
            }
        }
    }
}
