//! The RegExp constructor and RegExp.prototype.
//!
//! Regular expression objects carry their source and flags only; there
//! is no matching engine at this stage.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use core_types::{ErrorKind, PropertyAttributes, Value};

/// `RegExp(pattern, flags)`.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    construct(interpreter)
}

/// `new RegExp(pattern, flags)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    let source = if interpreter.argument(0).is_undefined() {
        "(?:)".to_string()
    } else {
        interpreter.to_string(interpreter.argument(0))?
    };
    let flags = if interpreter.argument(1).is_undefined() {
        String::new()
    } else {
        interpreter.to_string(interpreter.argument(1))?
    };
    let prototype = interpreter.global_data().regexp_prototype;
    let regexp = interpreter.create_object(Some(prototype), ObjectKind::RegExp { source, flags });
    Ok(Value::Object(regexp))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().regexp_prototype;
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_property(prototype, "source", Some(source_getter), None, attr);
    interpreter.define_native_property(prototype, "flags", Some(flags_getter), None, attr);
}

fn this_regexp(interpreter: &mut Interpreter) -> JsResult<(String, String)> {
    if let Value::Object(handle) = interpreter.this_value() {
        if let ObjectKind::RegExp { source, flags } = interpreter.heap().object(handle).kind() {
            return Ok((source.clone(), flags.clone()));
        }
    }
    Err(interpreter.throw_error(
        ErrorKind::TypeError,
        "RegExp.prototype method called on an incompatible receiver",
    ))
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let (source, flags) = this_regexp(interpreter)?;
    Ok(interpreter.js_string(format!("/{}/{}", source, flags)))
}

fn source_getter(interpreter: &mut Interpreter) -> JsResult<Value> {
    let (source, _) = this_regexp(interpreter)?;
    Ok(interpreter.js_string(source))
}

fn flags_getter(interpreter: &mut Interpreter) -> JsResult<Value> {
    let (_, flags) = this_regexp(interpreter)?;
    Ok(interpreter.js_string(flags))
}
