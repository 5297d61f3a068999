//! Script execution through the CLI driver pieces.

use js_cli::run::{parse_and_run, strip_shebang, RunOptions};
use runtime::Interpreter;
use std::io::Write;

#[test]
fn runs_a_script_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "let total = 0;").expect("write");
    writeln!(file, "for (let i = 1; i <= 10; i++) total = total + i;").expect("write");
    writeln!(file, "total").expect("write");
    let source = std::fs::read_to_string(file.path()).expect("read back");

    let mut interpreter = Interpreter::new();
    assert!(parse_and_run(
        &mut interpreter,
        strip_shebang(&source),
        RunOptions::default()
    ));
    assert_eq!(interpreter.last_value(), core_types::Value::Number(55.0));
}

#[test]
fn shebang_scripts_are_accepted() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "#!/usr/bin/env kestrel-js").expect("write");
    writeln!(file, "6 * 7").expect("write");
    let source = std::fs::read_to_string(file.path()).expect("read back");

    let mut interpreter = Interpreter::new();
    assert!(parse_and_run(
        &mut interpreter,
        strip_shebang(&source),
        RunOptions::default()
    ));
    assert_eq!(interpreter.last_value(), core_types::Value::Number(42.0));
}

#[test]
fn uncaught_exception_signals_failure() {
    let mut interpreter = Interpreter::new();
    assert!(!parse_and_run(
        &mut interpreter,
        "missing.property = 1;",
        RunOptions::default()
    ));
}

#[test]
fn syntax_error_signals_failure() {
    let mut interpreter = Interpreter::new();
    assert!(!parse_and_run(
        &mut interpreter,
        "let 1x = oops(;",
        RunOptions::default()
    ));
}

#[test]
fn console_output_goes_through_the_client() {
    // The default client prints to stdout; this just exercises the
    // console path end to end without asserting on captured output.
    let mut interpreter = Interpreter::new();
    assert!(parse_and_run(
        &mut interpreter,
        "console.count(\"label\"); console.count(\"label\"); console.countReset(\"label\");",
        RunOptions::default()
    ));
}
