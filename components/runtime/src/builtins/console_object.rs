//! The `console` global object.
//!
//! Every method fetches the interpreter's installed [`ConsoleClient`]
//! and forwards to it; the REPL swaps in a styling client, embedders
//! can capture output.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use core_types::{ObjectHandle, PropertyAttributes, Value};

/// Creates the `console` object.
pub(crate) fn create(interpreter: &mut Interpreter) -> ObjectHandle {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().object_prototype;
    let console = interpreter.create_object(Some(prototype), ObjectKind::Plain);
    interpreter.define_native_function(console, "log", log, 0, attr);
    interpreter.define_native_function(console, "info", info, 0, attr);
    interpreter.define_native_function(console, "debug", debug, 0, attr);
    interpreter.define_native_function(console, "warn", warn, 0, attr);
    interpreter.define_native_function(console, "error", error, 0, attr);
    interpreter.define_native_function(console, "clear", clear, 0, attr);
    interpreter.define_native_function(console, "trace", trace, 0, attr);
    interpreter.define_native_function(console, "count", count, 0, attr);
    interpreter.define_native_function(console, "countReset", count_reset, 0, attr);
    console
}

macro_rules! forward_to_client {
    ($($name:ident => $method:ident,)*) => {
        $(
            fn $name(interpreter: &mut Interpreter) -> JsResult<Value> {
                let client = interpreter.console_client();
                client.$method(interpreter)
            }
        )*
    };
}

forward_to_client! {
    log => log,
    info => info,
    debug => debug,
    warn => warn,
    error => error,
    clear => clear,
    trace => trace,
    count => count,
    count_reset => count_reset,
}
