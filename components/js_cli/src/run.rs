//! Parsing and running source text against an interpreter.

use crate::printer;
use core_types::ErrorKind;
use parser::Parser;
use runtime::Interpreter;

/// Options controlling one parse-and-run round.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Dump the AST before execution
    pub dump_ast: bool,
    /// Print the value of the last statement on success
    pub print_last_result: bool,
}

/// Strips a `#!...` first line, if present.
pub fn strip_shebang(source: &str) -> &str {
    if !source.starts_with("#!") {
        return source;
    }
    match source.find('\n') {
        Some(newline) => &source[newline..],
        None => "",
    }
}

/// Parses and runs one piece of source. Syntax errors become thrown
/// `SyntaxError`s; an uncaught exception is printed with its trace and
/// cleared. Returns false when the piece failed.
pub fn parse_and_run(interpreter: &mut Interpreter, source: &str, options: RunOptions) -> bool {
    match Parser::new(source).parse_program() {
        Ok(program) => {
            if options.dump_ast {
                program.dump();
            }
            if interpreter.run(&program).is_ok() {
                if options.print_last_result {
                    printer::print(interpreter, interpreter.last_value());
                }
                return true;
            }
        }
        Err(parse_error) => {
            let hint = parse_error.source_location_hint(source);
            if !hint.is_empty() {
                println!("{}", hint);
            }
            // Surface the syntax error through the runtime's own
            // exception machinery, like any other throw.
            let _ = interpreter.throw_error(ErrorKind::SyntaxError, parse_error.to_string());
        }
    }

    let (value, trace) = match interpreter.exception() {
        Some(exception) => (exception.value, exception.trace.clone()),
        None => return false,
    };
    print!("Uncaught exception: ");
    printer::print(interpreter, value);
    if trace.len() > 1 {
        for function_name in &trace {
            println!(" -> {}", function_name);
        }
    }
    interpreter.clear_exception();
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_shebang() {
        assert_eq!(strip_shebang("#!/usr/bin/env kestrel-js\n1 + 1"), "\n1 + 1");
        assert_eq!(strip_shebang("1 + 1"), "1 + 1");
        assert_eq!(strip_shebang("#!only-shebang"), "");
    }

    #[test]
    fn test_parse_and_run_success() {
        let mut interpreter = Interpreter::new();
        assert!(parse_and_run(&mut interpreter, "1 + 1;", RunOptions::default()));
        assert!(!interpreter.has_exception());
    }

    #[test]
    fn test_parse_and_run_uncaught_exception() {
        let mut interpreter = Interpreter::new();
        assert!(!parse_and_run(
            &mut interpreter,
            "throw new Error(\"boom\");",
            RunOptions::default()
        ));
        // The exception was reported and cleared; the session goes on.
        assert!(!interpreter.has_exception());
        assert!(parse_and_run(&mut interpreter, "2 + 2;", RunOptions::default()));
    }

    #[test]
    fn test_parse_and_run_syntax_error() {
        let mut interpreter = Interpreter::new();
        assert!(!parse_and_run(&mut interpreter, "let = ;", RunOptions::default()));
        assert!(!interpreter.has_exception());
    }

    #[test]
    fn test_state_persists_between_pieces() {
        let mut interpreter = Interpreter::new();
        assert!(parse_and_run(&mut interpreter, "let x = 40;", RunOptions::default()));
        assert!(parse_and_run(&mut interpreter, "x = x + 2;", RunOptions::default()));
        assert_eq!(interpreter.last_value(), core_types::Value::Number(42.0));
    }
}
