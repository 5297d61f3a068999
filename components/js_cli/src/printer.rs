//! The REPL value pretty printer.
//!
//! Recursive with a cycle guard: an object that shows up again inside
//! itself prints as `<already printed Object #n>` instead of recursing.
//! Indexed properties print before named ones, matching enumeration
//! order. Nothing here calls user code; accessor slots print as-is.

use core_types::{ObjectHandle, Value};
use runtime::{Interpreter, ObjectKind};
use std::collections::HashSet;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_BLUE: &str = "\x1b[34;1m";
const COLOR_GREEN: &str = "\x1b[32;1m";
const COLOR_MAGENTA: &str = "\x1b[35;1m";
const COLOR_YELLOW: &str = "\x1b[33;1m";

/// Renders a value the way the REPL displays results.
pub fn value_to_display_string(interpreter: &Interpreter, value: Value) -> String {
    let mut output = String::new();
    let mut seen_objects = HashSet::new();
    format_value(interpreter, value, &mut seen_objects, &mut output);
    output
}

/// Prints a value and a trailing newline to stdout.
pub fn print(interpreter: &Interpreter, value: Value) {
    println!("{}", value_to_display_string(interpreter, value));
}

fn format_value(
    interpreter: &Interpreter,
    value: Value,
    seen_objects: &mut HashSet<ObjectHandle>,
    output: &mut String,
) {
    match value {
        Value::Empty => {
            output.push_str(&format!("{}<empty>{}", COLOR_BLUE, COLOR_RESET));
        }
        Value::Object(handle) => {
            if seen_objects.contains(&handle) {
                output.push_str(&format!("<already printed Object #{}>", handle.index()));
                return;
            }
            seen_objects.insert(handle);
            format_object(interpreter, handle, seen_objects, output);
        }
        Value::String(handle) => {
            output.push_str(&format!(
                "{}\"{}\"{}",
                COLOR_GREEN,
                interpreter.heap().string(handle).text(),
                COLOR_RESET
            ));
        }
        Value::Number(_) => {
            output.push_str(&format!(
                "{}{}{}",
                COLOR_MAGENTA,
                interpreter.to_string_without_side_effects(value),
                COLOR_RESET
            ));
        }
        Value::BigInt(handle) => {
            output.push_str(&format!(
                "{}{}n{}",
                COLOR_MAGENTA,
                interpreter.heap().bigint(handle).to_digits(),
                COLOR_RESET
            ));
        }
        Value::Boolean(_) | Value::Null => {
            output.push_str(&format!(
                "{}{}{}",
                COLOR_YELLOW,
                interpreter.to_string_without_side_effects(value),
                COLOR_RESET
            ));
        }
        Value::Undefined => {
            output.push_str(&format!("{}undefined{}", COLOR_BLUE, COLOR_RESET));
        }
        Value::Symbol(_) => {
            output.push_str(&format!(
                "{}{}{}",
                COLOR_YELLOW,
                interpreter.to_string_without_side_effects(value),
                COLOR_RESET
            ));
        }
        Value::Accessor(_) => {
            output.push_str(&format!("{}<accessor>{}", COLOR_BLUE, COLOR_RESET));
        }
    }
}

fn format_object(
    interpreter: &Interpreter,
    handle: ObjectHandle,
    seen_objects: &mut HashSet<ObjectHandle>,
    output: &mut String,
) {
    let object = interpreter.heap().object(handle);
    match object.kind() {
        ObjectKind::Array => format_array(interpreter, handle, seen_objects, output),
        ObjectKind::Function(_) | ObjectKind::NativeFunction(_) | ObjectKind::BoundFunction(_) => {
            output.push_str(&format!(
                "{}[{}]{}",
                COLOR_BLUE,
                object.class_name(),
                COLOR_RESET
            ));
        }
        ObjectKind::Date { milliseconds } => {
            output.push_str(&format!(
                "{}Date {}{}",
                COLOR_BLUE,
                runtime::date_display_string(*milliseconds),
                COLOR_RESET
            ));
        }
        ObjectKind::Error { kind, message } => {
            output.push_str(&format!("{}[{}]{}", COLOR_BLUE, kind.name(), COLOR_RESET));
            if !message.is_empty() {
                output.push_str(&format!(": {}", message));
            }
        }
        ObjectKind::RegExp { source, flags } => {
            output.push_str(&format!(
                "{}/{}/{}{}",
                COLOR_BLUE, source, flags, COLOR_RESET
            ));
        }
        _ => format_plain_object(interpreter, handle, seen_objects, output),
    }
}

fn format_array(
    interpreter: &Interpreter,
    handle: ObjectHandle,
    seen_objects: &mut HashSet<ObjectHandle>,
    output: &mut String,
) {
    output.push_str("[ ");
    let indexed: Vec<Value> = interpreter
        .heap()
        .object(handle)
        .indexed_properties()
        .iter()
        .map(|(_, property)| property.value)
        .collect();
    let mut first = true;
    for value in indexed {
        if !first {
            output.push_str(", ");
        }
        first = false;
        format_value(interpreter, value, seen_objects, output);
    }
    output.push_str(" ]");
}

fn format_plain_object(
    interpreter: &Interpreter,
    handle: ObjectHandle,
    seen_objects: &mut HashSet<ObjectHandle>,
    output: &mut String,
) {
    output.push_str("{ ");
    let indexed: Vec<(u32, Value)> = interpreter
        .heap()
        .object(handle)
        .indexed_properties()
        .iter()
        .map(|(index, property)| (index, property.value))
        .collect();
    let mut first = true;
    for (index, value) in &indexed {
        if !first {
            output.push_str(", ");
        }
        first = false;
        output.push_str(&format!("\"{}{}{}\": ", COLOR_YELLOW, index, COLOR_RESET));
        format_value(interpreter, *value, seen_objects, output);
    }

    let heap = interpreter.heap();
    let shape = heap.shape(heap.object(handle).shape());
    let named: Vec<(String, Value)> = shape
        .property_table_ordered(heap)
        .into_iter()
        .filter_map(|(key, metadata)| {
            key.as_string()
                .map(|name| (name.to_string(), heap.object(handle).get_direct(metadata.offset)))
        })
        .collect();
    for (name, value) in &named {
        if !first {
            output.push_str(", ");
        }
        first = false;
        output.push_str(&format!("\"{}{}{}\": ", COLOR_YELLOW, name, COLOR_RESET));
        format_value(interpreter, *value, seen_objects, output);
    }
    output.push_str(" }");
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::Parser;

    fn run(interpreter: &mut Interpreter, source: &str) -> Value {
        let program = Parser::new(source).parse_program().expect("parses");
        interpreter.run(&program).expect("runs")
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
    fn test_primitives() {
        let mut interpreter = Interpreter::new();
        let value = run(&mut interpreter, "42");
        assert_eq!(strip_ansi(&value_to_display_string(&interpreter, value)), "42");
        let value = run(&mut interpreter, "\"hi\"");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "\"hi\""
        );
        let value = run(&mut interpreter, "12n");
        assert_eq!(strip_ansi(&value_to_display_string(&interpreter, value)), "12n");
    }

    #[test]
    fn test_object_literal() {
        let mut interpreter = Interpreter::new();
        let value = run(&mut interpreter, "{ \"a\": 1 }");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "{ \"a\": 1 }"
        );
    }

    #[test]
    fn test_indexed_before_named() {
        let mut interpreter = Interpreter::new();
        let value = run(&mut interpreter, "let o = { name: \"n\" }; o[1] = true; o");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "{ \"1\": true, \"name\": \"n\" }"
        );
    }

    #[test]
    fn test_array() {
        let mut interpreter = Interpreter::new();
        let value = run(&mut interpreter, "[1, \"two\", null]");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "[ 1, \"two\", null ]"
        );
    }

    #[test]
    fn test_cycle_guard() {
        let mut interpreter = Interpreter::new();
        let value = run(&mut interpreter, "let x = {}; x.self = x; x");
        let text = strip_ansi(&value_to_display_string(&interpreter, value));
        assert!(text.starts_with("{ \"self\": <already printed Object #"));
        assert!(text.ends_with("> }"));
    }

    #[test]
    fn test_kind_specialised_forms() {
        let mut interpreter = Interpreter::new();
        let value = run(&mut interpreter, "function f() {} f");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "[Function]"
        );
        let value = run(&mut interpreter, "new TypeError(\"boom\")");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "[TypeError]: boom"
        );
        let value = run(&mut interpreter, "new RegExp(\"a+\", \"g\")");
        assert_eq!(
            strip_ansi(&value_to_display_string(&interpreter, value)),
            "/a+/g"
        );
    }
}
