//! The Proxy constructor.
//!
//! The `get`, `set`, `has` and `deleteProperty` traps are dispatched by
//! the interpreter's property protocol; absent traps fall through to
//! the target.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use core_types::{ErrorKind, Value};

/// `Proxy(...)` without `new`.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    Err(interpreter.throw_error(
        ErrorKind::TypeError,
        "Proxy must be constructed with 'new'",
    ))
}

/// `new Proxy(target, handler)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    let Value::Object(target) = interpreter.argument(0) else {
        return Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "Proxy target must be an object",
        ));
    };
    let Value::Object(handler) = interpreter.argument(1) else {
        return Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "Proxy handler must be an object",
        ));
    };
    let prototype = interpreter.global_data().proxy_prototype;
    let proxy = interpreter.create_object(Some(prototype), ObjectKind::Proxy { target, handler });
    Ok(Value::Object(proxy))
}

pub(crate) fn install(_interpreter: &mut Interpreter) {
    // Proxies expose no prototype methods; everything happens in the
    // trap dispatch.
}
