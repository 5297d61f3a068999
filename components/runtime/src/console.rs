//! Console state and the client interface.
//!
//! The `console` global routes every method through a [`ConsoleClient`],
//! so hosts decide how output is rendered: the REPL installs a styling
//! client, embedders can capture or discard output. Label counters for
//! `console.count`/`countReset` live here, on the runtime side.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use core_types::Value;
use std::collections::HashMap;

/// Counter state backing `console.count`/`console.countReset`.
#[derive(Debug, Default)]
pub struct Console {
    counters: HashMap<String, u32>,
}

impl Console {
    /// Creates empty console state.
    pub fn new() -> Self {
        Console::default()
    }

    /// Increments and returns the counter for `label`.
    pub fn counter_increment(&mut self, label: &str) -> u32 {
        let counter = self.counters.entry(label.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Resets the counter for `label`; false if no such counter exists.
    pub fn counter_reset(&mut self, label: &str) -> bool {
        self.counters.remove(label).is_some()
    }
}

/// Host-side sink for console output.
///
/// Each method services one `console.*` call; implementations read the
/// arguments from the interpreter's current call frame.
pub trait ConsoleClient {
    /// `console.log(...)`
    fn log(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.info(...)`
    fn info(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.debug(...)`
    fn debug(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.warn(...)`
    fn warn(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.error(...)`
    fn error(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.clear()`
    fn clear(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.trace(...)`
    fn trace(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.count(label?)`
    fn count(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
    /// `console.countReset(label?)`
    fn count_reset(&self, interpreter: &mut Interpreter) -> JsResult<Value>;
}

/// Plain stdout client used when the host installs nothing fancier.
pub struct StdoutConsoleClient;

impl StdoutConsoleClient {
    fn print_joined(interpreter: &mut Interpreter) -> Value {
        println!("{}", interpreter.join_arguments());
        Value::Undefined
    }
}

impl ConsoleClient for StdoutConsoleClient {
    fn log(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        Ok(Self::print_joined(interpreter))
    }

    fn info(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        Ok(Self::print_joined(interpreter))
    }

    fn debug(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        Ok(Self::print_joined(interpreter))
    }

    fn warn(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        Ok(Self::print_joined(interpreter))
    }

    fn error(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        Ok(Self::print_joined(interpreter))
    }

    fn clear(&self, _interpreter: &mut Interpreter) -> JsResult<Value> {
        Ok(Value::Undefined)
    }

    fn trace(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("{}", interpreter.join_arguments());
        for function_name in interpreter.call_stack_function_names() {
            println!(" -> {}", function_name);
        }
        Ok(Value::Undefined)
    }

    fn count(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        let label = interpreter.console_count_label();
        let counter = interpreter.console_mut().counter_increment(&label);
        println!("{}: {}", label, counter);
        Ok(Value::Undefined)
    }

    fn count_reset(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        let label = interpreter.console_count_label();
        if interpreter.console_mut().counter_reset(&label) {
            println!("{}: 0", label);
        } else {
            println!("\"{}\" doesn't have a count", label);
        }
        Ok(Value::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increment() {
        let mut console = Console::new();
        assert_eq!(console.counter_increment("default"), 1);
        assert_eq!(console.counter_increment("default"), 2);
        assert_eq!(console.counter_increment("other"), 1);
    }

    #[test]
    fn test_counter_reset() {
        let mut console = Console::new();
        console.counter_increment("default");
        assert!(console.counter_reset("default"));
        assert!(!console.counter_reset("default"));
        assert_eq!(console.counter_increment("default"), 1);
    }
}
