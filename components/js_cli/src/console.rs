//! The styled console client the REPL and script runner install.

use runtime::{ConsoleClient, Interpreter, JsResult};
use core_types::Value;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_CYAN: &str = "\x1b[36;1m";
const COLOR_YELLOW: &str = "\x1b[33;1m";
const COLOR_RED: &str = "\x1b[31;1m";

/// Routes `console.*` output to stdout with ANSI styling.
pub struct ReplConsoleClient;

impl ConsoleClient for ReplConsoleClient {
    fn log(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("{}", interpreter.join_arguments());
        Ok(Value::Undefined)
    }

    fn info(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("(i) {}", interpreter.join_arguments());
        Ok(Value::Undefined)
    }

    fn debug(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("{}{}{}", COLOR_CYAN, interpreter.join_arguments(), COLOR_RESET);
        Ok(Value::Undefined)
    }

    fn warn(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("{}{}{}", COLOR_YELLOW, interpreter.join_arguments(), COLOR_RESET);
        Ok(Value::Undefined)
    }

    fn error(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("{}{}{}", COLOR_RED, interpreter.join_arguments(), COLOR_RESET);
        Ok(Value::Undefined)
    }

    fn clear(&self, _interpreter: &mut Interpreter) -> JsResult<Value> {
        print!("\x1b[3J\x1b[H\x1b[2J");
        use std::io::Write;
        let _ = std::io::stdout().flush();
        Ok(Value::Undefined)
    }

    fn trace(&self, interpreter: &mut Interpreter) -> JsResult<Value> {
        println!("{}", interpreter.join_arguments());
        for function_name in interpreter.call_stack_function_names().iter().skip(1) {
            let name = if function_name.is_empty() {
                "<anonymous>"
            } else {
                function_name
            };
            println!(" -> {}", name);
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
            println!(
                "{}\"{}\" doesn't have a count{}",
                COLOR_YELLOW, label, COLOR_RESET
            );
        }
        Ok(Value::Undefined)
    }
}
