//! The Symbol factory and Symbol.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use crate::property_key::PropertyName;
use core_types::{ErrorKind, PropertyAttributes, SymbolHandle, Value};

/// `Symbol(description)`; `new Symbol` is a TypeError via the missing
/// construct slot.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    let description = match interpreter.argument(0) {
        Value::Undefined => None,
        other => Some(interpreter.to_string(other)?),
    };
    Ok(interpreter.js_symbol(description))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let constructor = interpreter.global_data().symbol_constructor;
    interpreter.define_native_function(constructor, "for", symbol_for, 1, attr);
    interpreter.define_native_function(constructor, "keyFor", key_for, 1, attr);

    let to_primitive = interpreter.global_data().well_known_to_primitive;
    interpreter
        .define_property(
            constructor,
            &PropertyName::String("toPrimitive".to_string()),
            Value::Symbol(to_primitive),
            PropertyAttributes::empty(),
        )
        .expect("well-known symbol definition cannot fail");

    let prototype = interpreter.global_data().symbol_prototype;
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_property(prototype, "description", Some(description_getter), None, attr);
}

fn symbol_for(interpreter: &mut Interpreter) -> JsResult<Value> {
    let key = interpreter.to_string(interpreter.argument(0))?;
    if let Some(existing) = interpreter.global_data().symbol_registry.get(&key) {
        return Ok(Value::Symbol(*existing));
    }
    let symbol = interpreter.js_symbol(Some(key.clone()));
    let handle = symbol.as_symbol();
    interpreter.global_data_mut().symbol_registry.insert(key, handle);
    Ok(symbol)
}

fn key_for(interpreter: &mut Interpreter) -> JsResult<Value> {
    let Value::Symbol(handle) = interpreter.argument(0) else {
        return Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "Symbol.keyFor requires a symbol argument",
        ));
    };
    let registered: Option<String> = interpreter
        .global_data()
        .symbol_registry
        .iter()
        .find(|(_, registered)| **registered == handle)
        .map(|(key, _)| key.clone());
    match registered {
        Some(key) => Ok(interpreter.js_string(key)),
        None => Ok(Value::Undefined),
    }
}

fn this_symbol(interpreter: &mut Interpreter) -> JsResult<SymbolHandle> {
    match interpreter.this_value() {
        Value::Symbol(handle) => Ok(handle),
        Value::Object(object) => match interpreter.heap().object(object).kind() {
            ObjectKind::SymbolWrapper(handle) => Ok(*handle),
            _ => Err(interpreter.throw_error(
                ErrorKind::TypeError,
                "Symbol.prototype method called on an incompatible receiver",
            )),
        },
        _ => Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "Symbol.prototype method called on an incompatible receiver",
        )),
    }
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let handle = this_symbol(interpreter)?;
    let text = interpreter.heap().symbol(handle).to_display_string();
    Ok(interpreter.js_string(text))
}

fn description_getter(interpreter: &mut Interpreter) -> JsResult<Value> {
    let handle = this_symbol(interpreter)?;
    match interpreter.heap().symbol(handle).description() {
        Some(description) => {
            let text = description.to_string();
            Ok(interpreter.js_string(text))
        }
        None => Ok(Value::Undefined),
    }
}
