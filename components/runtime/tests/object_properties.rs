//! Property protocol behaviour: enumeration order, prototype chains,
//! accessors, deletes.

use core_types::Value;
use parser::Parser;
use runtime::Interpreter;

fn run(interpreter: &mut Interpreter, source: &str) -> Value {
    let program = Parser::new(source).parse_program().expect("test source parses");
    interpreter.run(&program).expect("test source runs")
}

fn run_string(interpreter: &mut Interpreter, source: &str) -> String {
    let value = run(interpreter, source);
    interpreter.to_string(value).expect("result converts to string")
}

#[test]
fn enumeration_yields_indexed_then_named_in_insertion_order() {
    let mut interpreter = Interpreter::new();
    let keys = run_string(
        &mut interpreter,
        "let o = {};
         o.beta = 1;
         o[2] = \"two\";
         o.alpha = 2;
         o[0] = \"zero\";
         let ks = [];
         for (let k in o) ks.push(k);
         ks.join(\",\")",
    );
    assert_eq!(keys, "0,2,beta,alpha");
}

#[test]
fn repeated_put_does_not_reorder() {
    let mut interpreter = Interpreter::new();
    let keys = run_string(
        &mut interpreter,
        "let o = { a: 1, b: 2 };
         o.a = 10;
         o.b = 20;
         o.a = 100;
         let ks = [];
         for (let k in o) ks.push(k);
         ks.join(\",\")",
    );
    assert_eq!(keys, "a,b");
}

#[test]
fn delete_compaction_preserves_remaining_values() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let o = { p: \"first\", q: \"second\", r: \"third\" }; delete o.p;",
    );
    assert_eq!(run_string(&mut interpreter, "o.q"), "second");
    assert_eq!(run_string(&mut interpreter, "o.r"), "third");
    assert_eq!(run(&mut interpreter, "o.p"), Value::Undefined);
}

#[test]
fn prototype_chain_lookup_finds_nearest_ancestor() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "let grandparent = { x: 1, y: 1 };
         let parent = { y: 2 };
         Object.setPrototypeOf(parent, grandparent);
         let child = {};
         Object.setPrototypeOf(child, parent);
         child.x + child.y * 10",
    );
    // x from the grandparent, y from the nearer parent.
    assert_eq!(result, Value::Number(21.0));
    assert_eq!(run(&mut interpreter, "child.missing"), Value::Undefined);
}

#[test]
fn own_property_shadows_prototype() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "let proto = { v: 1 };
         let o = {};
         Object.setPrototypeOf(o, proto);
         o.v = 2;
         proto.v * 10 + o.v",
    );
    assert_eq!(result, Value::Number(12.0));
}

#[test]
fn accessors_dispatch_against_receiver() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "let o = { backing: 1 };
         Object.defineProperty(o, \"double\", {
             get: function() { return this.backing * 2; },
             configurable: true
         });
         o.backing = 21;
         o.double",
    );
    assert_eq!(result, Value::Number(42.0));
}

#[test]
fn setter_receives_assigned_value() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "let o = { log: [] };
         Object.defineProperty(o, \"tracked\", {
             set: function(v) { this.log.push(v); },
             configurable: true
         });
         o.tracked = 7;
         o.tracked = 8;
         o.log.join(\",\")",
    );
    assert_eq!(interpreter.to_string(result).expect("string"), "7,8");
}

#[test]
fn non_writable_write_is_silent_in_sloppy_mode() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "let o = { a: 1 };
         Object.defineProperty(o, \"a\", { writable: false, enumerable: true, configurable: true });
         o.a = 9;
         o.a",
    );
    assert_eq!(result, Value::Number(1.0));
}

#[test]
fn non_writable_write_throws_in_strict_mode() {
    let mut interpreter = Interpreter::new();
    let program = Parser::new(
        "\"use strict\";
         let o = { a: 1 };
         Object.defineProperty(o, \"a\", { writable: false, enumerable: true, configurable: true });
         o.a = 9;",
    )
    .parse_program()
    .expect("parses");
    let error = interpreter.run(&program).expect_err("strict write throws");
    let message = interpreter.to_string_without_side_effects(error.value);
    assert!(message.starts_with("TypeError"), "got: {}", message);
}

#[test]
fn prototype_cycle_is_rejected() {
    let mut interpreter = Interpreter::new();
    let program = Parser::new(
        "let a = {};
         let b = {};
         Object.setPrototypeOf(b, a);
         Object.setPrototypeOf(a, b);",
    )
    .parse_program()
    .expect("parses");
    let error = interpreter.run(&program).expect_err("cycle throws");
    let message = interpreter.to_string_without_side_effects(error.value);
    assert!(message.starts_with("TypeError"), "got: {}", message);
}

#[test]
fn indexed_properties_enumerate_before_named_on_arrays() {
    let mut interpreter = Interpreter::new();
    let keys = run_string(
        &mut interpreter,
        "let a = [];
         a[0] = 1;
         a[2] = 3;
         let ks = [];
         for (let k in a) ks.push(k);
         ks.join(\",\")",
    );
    assert_eq!(keys, "0,2");
}

#[test]
fn object_keys_matches_enumeration_order() {
    let mut interpreter = Interpreter::new();
    let keys = run_string(
        &mut interpreter,
        "let o = { b: 1, a: 2 };
         o[5] = 3;
         Object.keys(o).join(\",\")",
    );
    assert_eq!(keys, "5,b,a");
}

#[test]
fn has_own_property_distinguishes_inherited() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "let proto = { inherited: 1 };
         let o = { own: 2 };
         Object.setPrototypeOf(o, proto);
         [o.hasOwnProperty(\"own\"), o.hasOwnProperty(\"inherited\"), \"inherited\" in o].join(\",\")",
    );
    assert_eq!(interpreter.to_string(result).expect("string"), "true,false,true");
}
