//! The Function constructor and Function.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{BoundFunctionData, ObjectKind};
use crate::property_key::PropertyName;
use core_types::{ErrorKind, ObjectHandle, PropertyAttributes, Value};

/// `Function(...)`: dynamic function creation needs a source compiler,
/// which this runtime does not carry.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    Err(interpreter.throw_error(
        ErrorKind::TypeError,
        "Runtime function construction is not supported",
    ))
}

/// `new Function(...)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    call(interpreter)
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().function_prototype;
    interpreter.define_native_function(prototype, "call", call_method, 1, attr);
    interpreter.define_native_function(prototype, "apply", apply_method, 2, attr);
    interpreter.define_native_function(prototype, "bind", bind_method, 1, attr);
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
}

fn this_function(interpreter: &mut Interpreter) -> JsResult<ObjectHandle> {
    let this = interpreter.this_value();
    match this {
        Value::Object(handle) if interpreter.heap().object(handle).is_function() => Ok(handle),
        other => {
            let text = interpreter.to_string_without_side_effects(other);
            Err(interpreter
                .throw_error(ErrorKind::TypeError, format!("{} is not a function", text)))
        }
    }
}

fn call_method(interpreter: &mut Interpreter) -> JsResult<Value> {
    let function = this_function(interpreter)?;
    let this_argument = interpreter.argument(0);
    let arguments: Vec<Value> = interpreter.arguments().iter().skip(1).copied().collect();
    interpreter.call_function(function, this_argument, arguments)
}

fn apply_method(interpreter: &mut Interpreter) -> JsResult<Value> {
    let function = this_function(interpreter)?;
    let this_argument = interpreter.argument(0);
    let arguments = match interpreter.argument(1) {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Object(array) => {
            let length = interpreter
                .heap()
                .object(array)
                .indexed_properties()
                .array_like_length();
            let mut arguments = Vec::with_capacity(length as usize);
            for index in 0..length {
                arguments.push(interpreter.get_property(array, &PropertyName::Index(index))?);
            }
            arguments
        }
        _ => {
            return Err(interpreter.throw_error(
                ErrorKind::TypeError,
                "Second argument to apply must be an array-like object",
            ));
        }
    };
    interpreter.call_function(function, this_argument, arguments)
}

fn bind_method(interpreter: &mut Interpreter) -> JsResult<Value> {
    let target = this_function(interpreter)?;
    let bound_this = interpreter.argument(0);
    let bound_arguments: Vec<Value> = interpreter.arguments().iter().skip(1).copied().collect();
    let prototype = interpreter.global_data().function_prototype;
    let bound = interpreter.create_object(
        Some(prototype),
        ObjectKind::BoundFunction(BoundFunctionData {
            target,
            bound_this,
            bound_arguments,
        }),
    );
    Ok(Value::Object(bound))
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let function = this_function(interpreter)?;
    let text = match interpreter.heap().object(function).kind() {
        ObjectKind::Function(script) => {
            format!(
                "function {}({}) {{\n  [SourceCode]\n}}",
                script.name,
                script.parameters.join(", ")
            )
        }
        ObjectKind::NativeFunction(data) => {
            format!("function {}() {{\n  [NativeCode]\n}}", data.name)
        }
        _ => "function () {\n  [BoundFunction]\n}".to_string(),
    };
    Ok(interpreter.js_string(text))
}
