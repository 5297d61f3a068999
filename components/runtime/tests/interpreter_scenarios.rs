//! End-to-end scenarios driven through the parser and evaluator.

use core_types::Value;
use parser::Parser;
use runtime::{Interpreter, PreferredType};

fn run(interpreter: &mut Interpreter, source: &str) -> Value {
    let program = Parser::new(source).parse_program().expect("test source parses");
    interpreter.run(&program).expect("test source runs")
}

fn run_string(interpreter: &mut Interpreter, source: &str) -> String {
    let value = run(interpreter, source);
    interpreter.to_string(value).expect("result converts to string")
}

fn expect_error(interpreter: &mut Interpreter, source: &str) -> String {
    let program = Parser::new(source).parse_program().expect("test source parses");
    let error = interpreter.run(&program).expect_err("program throws");
    let text = interpreter.to_string_without_side_effects(error.value);
    interpreter.clear_exception();
    text
}

#[test]
fn safe_integer_boundary() {
    let mut interpreter = Interpreter::new();
    assert_eq!(
        run(&mut interpreter, "Number.isSafeInteger(2 ** 53 - 1)"),
        Value::Boolean(true)
    );
    assert_eq!(
        run(&mut interpreter, "Number.isSafeInteger(2 ** 53)"),
        Value::Boolean(false)
    );
}

#[test]
fn parse_float_takes_longest_numeric_prefix() {
    let mut interpreter = Interpreter::new();
    assert_eq!(
        run(&mut interpreter, "parseFloat(\"12.5abc\")"),
        Value::Number(12.5)
    );
    assert!(run(&mut interpreter, "parseFloat(\"abc\")").is_nan());
    assert_eq!(
        run(&mut interpreter, "parseFloat(\"  -3e2xyz\")"),
        Value::Number(-300.0)
    );
}

#[test]
fn conversion_round_trips() {
    let mut interpreter = Interpreter::new();
    // to_string(to_number("3.5")) == "3.5"
    let n = run(&mut interpreter, "\"3.5\" * 1");
    assert_eq!(interpreter.to_string(n).expect("string"), "3.5");
    // to_number(to_string(42)) == 42
    let text = interpreter.js_string("42");
    assert_eq!(interpreter.to_number(text).expect("number"), 42.0);
    // Booleans, null, undefined round-trip through default to_primitive.
    for (source, expected) in [
        ("true", "true"),
        ("false", "false"),
        ("null", "null"),
        ("undefined", "undefined"),
    ] {
        let value = run(&mut interpreter, source);
        let primitive = interpreter
            .to_primitive(value, PreferredType::Default)
            .expect("primitive");
        assert_eq!(interpreter.to_string(primitive).expect("string"), expected);
    }
}

#[test]
fn typeof_operator() {
    let mut interpreter = Interpreter::new();
    for (source, expected) in [
        ("typeof undefined", "undefined"),
        ("typeof null", "object"),
        ("typeof 1", "number"),
        ("typeof \"s\"", "string"),
        ("typeof true", "boolean"),
        ("typeof {}", "object"),
        ("typeof missingGlobal", "undefined"),
        ("typeof 1n", "bigint"),
        ("typeof function() {}", "function"),
        ("typeof Symbol(\"s\")", "symbol"),
    ] {
        assert_eq!(run_string(&mut interpreter, source), expected, "{}", source);
    }
}

#[test]
fn equality_operators() {
    let mut interpreter = Interpreter::new();
    for (source, expected) in [
        ("1 === 1", true),
        ("1 === 2", false),
        ("\"a\" === \"a\"", true),
        ("1 == \"1\"", true),
        ("1 === \"1\"", false),
        ("null == undefined", true),
        ("null === undefined", false),
        ("NaN === NaN", false),
        ("({}) === ({})", false),
        ("1n == 1", true),
        ("2 < 10", true),
        ("\"2\" < \"10\"", false),
    ] {
        assert_eq!(run(&mut interpreter, source), Value::Boolean(expected), "{}", source);
    }
}

#[test]
fn functions_and_calls() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "function add(a, b) { return a + b; }
         add(19, 23)",
    );
    assert_eq!(result, Value::Number(42.0));

    let bound = run(
        &mut interpreter,
        "function whoami() { return this.name; }
         let tied = whoami.bind({ name: \"bound\" });
         tied()",
    );
    assert_eq!(interpreter.to_string(bound).expect("string"), "bound");

    let applied = run(&mut interpreter, "add.apply(null, [1, 2])");
    assert_eq!(applied, Value::Number(3.0));
}

#[test]
fn constructors_and_instanceof() {
    let mut interpreter = Interpreter::new();
    let result = run(
        &mut interpreter,
        "function Point(x, y) { this.x = x; this.y = y; }
         let p = new Point(3, 4);
         [p.x, p.y, p instanceof Point].join(\",\")",
    );
    assert_eq!(interpreter.to_string(result).expect("string"), "3,4,true");
}

#[test]
fn try_catch_finally() {
    let mut interpreter = Interpreter::new();
    let result = run_string(
        &mut interpreter,
        "let steps = [];
         try {
             steps.push(\"try\");
             throw new TypeError(\"boom\");
         } catch (e) {
             steps.push(e.name + \":\" + e.message);
         } finally {
             steps.push(\"finally\");
         }
         steps.join(\"|\")",
    );
    assert_eq!(result, "try|TypeError:boom|finally");
}

#[test]
fn uncaught_exception_reports_kind_and_message() {
    let mut interpreter = Interpreter::new();
    let text = expect_error(&mut interpreter, "undefinedVariable + 1;");
    assert!(text.starts_with("ReferenceError"), "got: {}", text);
    let text = expect_error(&mut interpreter, "null.x;");
    assert!(text.starts_with("TypeError"), "got: {}", text);
}

#[test]
fn bigint_operations() {
    let mut interpreter = Interpreter::new();
    assert_eq!(run_string(&mut interpreter, "(1n + 2n) * 3n"), "9");
    assert_eq!(run_string(&mut interpreter, "BigInt.asIntN(8, 255n)"), "-1");
    assert_eq!(run_string(&mut interpreter, "BigInt.asUintN(8, 256n)"), "0");
    assert_eq!(run_string(&mut interpreter, "BigInt(\"42\")"), "42");
    let text = expect_error(&mut interpreter, "1n + 1;");
    assert!(text.starts_with("TypeError"), "got: {}", text);
    let text = expect_error(&mut interpreter, "new BigInt(1);");
    assert!(text.starts_with("TypeError"), "got: {}", text);
}

#[test]
fn symbol_to_primitive_is_consulted() {
    let mut interpreter = Interpreter::new();
    let result = run_string(
        &mut interpreter,
        "let o = {};
         o[Symbol.toPrimitive] = function(hint) { return \"hint:\" + hint; };
         \"\" + o",
    );
    assert_eq!(result, "hint:default");
}

#[test]
fn object_literal_statement_evaluates_at_repl_granularity() {
    let mut interpreter = Interpreter::new();
    let value = run(&mut interpreter, "{ \"a\": 1 }");
    let object = value.as_object();
    let a = interpreter
        .get_property(object, &runtime::PropertyName::from_string("a"))
        .expect("read");
    assert_eq!(a, Value::Number(1.0));
}

#[test]
fn string_methods() {
    let mut interpreter = Interpreter::new();
    assert_eq!(run_string(&mut interpreter, "\"Hello\".toUpperCase()"), "HELLO");
    assert_eq!(run_string(&mut interpreter, "\"abcdef\".slice(1, -1)"), "bcde");
    assert_eq!(run(&mut interpreter, "\"hello\".length"), Value::Number(5.0));
    assert_eq!(
        run(&mut interpreter, "\"ha\".repeat(3) === \"hahaha\""),
        Value::Boolean(true)
    );
}

#[test]
fn proxy_traps() {
    let mut interpreter = Interpreter::new();
    let result = run_string(
        &mut interpreter,
        "let target = { real: 1 };
         let p = new Proxy(target, {
             get: function(t, key) { return key === \"virtual\" ? 99 : t[key]; }
         });
         [p.real, p.virtual].join(\",\")",
    );
    assert_eq!(result, "1,99");
}

#[test]
fn date_and_regexp_kinds() {
    let mut interpreter = Interpreter::new();
    assert_eq!(
        run(&mut interpreter, "new Date(0).getFullYear()"),
        Value::Number(1970.0)
    );
    assert_eq!(
        run_string(&mut interpreter, "new RegExp(\"a+b\", \"gi\").toString()"),
        "/a+b/gi"
    );
}

#[test]
fn interpreter_tracks_last_value() {
    let mut interpreter = Interpreter::new();
    run(&mut interpreter, "1 + 1; \"final\";");
    let last = interpreter.last_value();
    assert_eq!(interpreter.to_string(last).expect("string"), "final");
}
