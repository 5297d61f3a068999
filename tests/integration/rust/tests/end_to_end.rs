//! Full-pipeline scenarios: source text through the parser, evaluator,
//! object model and printer.

use core_types::Value;
use js_cli::printer::value_to_display_string;
use parser::Parser;
use runtime::Interpreter;

fn run(interpreter: &mut Interpreter, source: &str) -> Value {
    let program = Parser::new(source).parse_program().expect("source parses");
    interpreter.run(&program).expect("source runs")
}

fn strip_ansi(text: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;
    for character in text.chars() {
        if in_escape {
            if character == 'm' {
                in_escape = false;
            }
        } else if character == '\x1b' {
            in_escape = true;
        } else {
            result.push(character);
        }
    }
    result
}

#[test]
fn shape_sharing_is_observable_end_to_end() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = {}; a.x = 1; a.y = 2; let b = {}; b.x = 1; b.y = 2;",
    );
    let a = run(&mut interpreter, "a").as_object();
    let b = run(&mut interpreter, "b").as_object();
    assert_eq!(
        interpreter.heap().object(a).shape(),
        interpreter.heap().object(b).shape()
    );
}

#[test]
fn repl_piece_sequence_keeps_state_and_prints() {
    let mut interpreter = Interpreter::new();
    run(&mut interpreter, "let point = { x: 3 };");
    run(&mut interpreter, "point.y = 4;");
    let value = run(&mut interpreter, "point");
    assert_eq!(
        strip_ansi(&value_to_display_string(&interpreter, value)),
        "{ \"x\": 3, \"y\": 4 }"
    );
}

#[test]
fn printer_handles_self_reference() {
    let mut interpreter = Interpreter::new();
    let value = run(&mut interpreter, "let x = {}; x.self = x; x");
    let text = strip_ansi(&value_to_display_string(&interpreter, value));
    assert!(text.contains("<already printed Object #"));
}

#[test]
fn garbage_collection_during_script_execution() {
    let mut interpreter = Interpreter::new();
    interpreter
        .heap_mut()
        .set_should_collect_on_every_allocation(true);
    let value = run(
        &mut interpreter,
        "function build(n) {
             let result = [];
             for (let i = 0; i < n; i++) {
                 result.push({ id: i, name: \"item\" + i });
             }
             return result;
         }
         let items = build(10);
         items[9].name",
    );
    assert_eq!(interpreter.to_string(value).expect("string"), "item9");
}

#[test]
fn deleted_properties_disappear_from_enumeration_and_printing() {
    let mut interpreter = Interpreter::new();
    let value = run(
        &mut interpreter,
        "let o = { a: 1, b: 2, c: 3 }; delete o.b; o",
    );
    assert_eq!(
        strip_ansi(&value_to_display_string(&interpreter, value)),
        "{ \"a\": 1, \"c\": 3 }"
    );
}

#[test]
fn errors_cross_component_boundaries_intact() {
    let mut interpreter = Interpreter::new();
    let program = Parser::new("function fail() { return missing_thing; } fail();")
        .parse_program()
        .expect("parses");
    let error = interpreter.run(&program).expect_err("throws");
    let text = strip_ansi(&value_to_display_string(&interpreter, error.value));
    assert!(text.starts_with("[ReferenceError]"), "got: {}", text);
    interpreter.clear_exception();
}

#[test]
fn interrupt_flag_becomes_a_throw_at_statement_boundary() {
    let mut interpreter = Interpreter::new();
    interpreter
        .interrupt_handle()
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let program = Parser::new("1; 2; 3;").parse_program().expect("parses");
    let error = interpreter.run(&program).expect_err("interrupt throws");
    let text = interpreter.to_string_without_side_effects(error.value);
    assert!(text.contains("SIGINT"), "got: {}", text);
    interpreter.clear_exception();

    // The flag is consumed; the next run proceeds normally.
    let program = Parser::new("4;").parse_program().expect("parses");
    assert_eq!(interpreter.run(&program).expect("runs"), Value::Number(4.0));
}
