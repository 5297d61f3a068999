//! The Boolean constructor and Boolean.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use core_types::{ErrorKind, PropertyAttributes, Value};

/// `Boolean(value)`.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Boolean(interpreter.to_boolean(interpreter.argument(0))))
}

/// `new Boolean(value)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    let boolean = interpreter.to_boolean(interpreter.argument(0));
    let prototype = interpreter.global_data().boolean_prototype;
    let wrapper = interpreter.create_object(Some(prototype), ObjectKind::BooleanWrapper(boolean));
    Ok(Value::Object(wrapper))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().boolean_prototype;
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_function(prototype, "valueOf", value_of, 0, attr);
}

fn this_boolean(interpreter: &mut Interpreter) -> JsResult<bool> {
    match interpreter.this_value() {
        Value::Boolean(boolean) => Ok(boolean),
        Value::Object(handle) => match interpreter.heap().object(handle).kind() {
            ObjectKind::BooleanWrapper(boolean) => Ok(*boolean),
            _ => Err(interpreter.throw_error(
                ErrorKind::TypeError,
                "Boolean.prototype method called on an incompatible receiver",
            )),
        },
        _ => Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "Boolean.prototype method called on an incompatible receiver",
        )),
    }
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let boolean = this_boolean(interpreter)?;
    Ok(interpreter.js_string(boolean.to_string()))
}

fn value_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Boolean(this_boolean(interpreter)?))
}
