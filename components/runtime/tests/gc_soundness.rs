//! Collector soundness observed through whole-program execution.

use core_types::Value;
use parser::Parser;
use runtime::property_key::PropertyName;
use runtime::Interpreter;

fn run(interpreter: &mut Interpreter, source: &str) -> Value {
    let program = Parser::new(source).parse_program().expect("test source parses");
    interpreter.run(&program).expect("test source runs")
}

#[test]
fn reachable_objects_survive_collection() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let keep = { nested: { deep: [1, 2, 3] }, label: \"kept\" };",
    );
    interpreter.collect_garbage();
    assert_eq!(run(&mut interpreter, "keep.nested.deep[2]"), Value::Number(3.0));
    let label = run(&mut interpreter, "keep.label");
    assert_eq!(interpreter.to_string(label).expect("string"), "kept");
}

#[test]
fn unreachable_objects_are_reclaimed() {
    let mut interpreter = Interpreter::new();
    run(&mut interpreter, "let temp = { big: \"garbage\" };");
    interpreter.collect_garbage();
    let live_before = interpreter.heap().live_cell_count();
    run(&mut interpreter, "temp = null;");
    interpreter.collect_garbage();
    let live_after = interpreter.heap().live_cell_count();
    assert!(
        live_after < live_before,
        "expected {} < {}",
        live_after,
        live_before
    );
}

#[test]
fn collection_is_idempotent() {
    let mut interpreter = Interpreter::new();
    run(&mut interpreter, "let a = { x: 1 }; let b = [a, a];");
    interpreter.collect_garbage();
    let live_after_first = interpreter.heap().live_cell_count();
    interpreter.collect_garbage();
    assert_eq!(interpreter.heap().live_cell_count(), live_after_first);
}

#[test]
fn cycles_are_collected() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = {}; let b = {}; a.other = b; b.other = a;",
    );
    interpreter.collect_garbage();
    let live_with_cycle = interpreter.heap().live_cell_count();
    run(&mut interpreter, "a = null; b = null;");
    interpreter.collect_garbage();
    assert!(interpreter.heap().live_cell_count() < live_with_cycle);
}

#[test]
fn exception_value_is_rooted_while_pending() {
    let mut interpreter = Interpreter::new();
    let program = Parser::new("throw { reason: \"boom\" };")
        .parse_program()
        .expect("parses");
    let error = interpreter.run(&program).expect_err("program throws");
    interpreter.collect_garbage();
    let thrown = error.value.as_object();
    let reason = interpreter
        .get_property(thrown, &PropertyName::from_string("reason"))
        .expect("read after collection");
    assert_eq!(interpreter.to_string(reason).expect("string"), "boom");
    interpreter.clear_exception();
}

#[test]
fn stress_collect_on_every_allocation() {
    let mut interpreter = Interpreter::new();
    interpreter
        .heap_mut()
        .set_should_collect_on_every_allocation(true);
    let result = run(
        &mut interpreter,
        "let rows = [];
         for (let i = 0; i < 20; i++) {
             rows.push({ index: i, text: \"row-\" + i, pair: [i, i * 2] });
         }
         let total = 0;
         for (let i = 0; i < 20; i++) {
             total = total + rows[i].pair[1];
         }
         total",
    );
    assert_eq!(result, Value::Number(380.0));
    assert!(interpreter.heap().stats().collections > 0);
}

#[test]
fn global_object_and_builtins_survive_collection() {
    let mut interpreter = Interpreter::new();
    for _ in 0..3 {
        interpreter.collect_garbage();
    }
    assert_eq!(
        run(&mut interpreter, "Number.isSafeInteger(9007199254740991)"),
        Value::Boolean(true)
    );
    assert_eq!(run(&mut interpreter, "Math.abs(-4)"), Value::Number(4.0));
}

#[test]
fn gc_global_function_runs_collection() {
    let mut interpreter = Interpreter::new();
    let collections_before = interpreter.heap().stats().collections;
    run(&mut interpreter, "gc();");
    assert!(interpreter.heap().stats().collections > collections_before);
}
