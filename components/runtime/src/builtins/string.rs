//! The String constructor and String.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use core_types::{ErrorKind, PropertyAttributes, Value};

/// `String(value)`.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    if interpreter.argument_count() == 0 {
        return Ok(interpreter.js_string(""));
    }
    let argument = interpreter.argument(0);
    // String() is the one conversion symbols do not throw through.
    if let Value::Symbol(handle) = argument {
        let text = interpreter.heap().symbol(handle).to_display_string();
        return Ok(interpreter.js_string(text));
    }
    let text = interpreter.to_string(argument)?;
    Ok(interpreter.js_string(text))
}

/// `new String(value)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    let primitive = call(interpreter)?;
    let handle = primitive.as_string();
    let prototype = interpreter.global_data().string_prototype;
    let wrapper = interpreter.create_object(Some(prototype), ObjectKind::StringWrapper(handle));
    Ok(Value::Object(wrapper))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().string_prototype;
    interpreter.define_native_function(prototype, "charAt", char_at, 1, attr);
    interpreter.define_native_function(prototype, "indexOf", index_of, 1, attr);
    interpreter.define_native_function(prototype, "includes", includes, 1, attr);
    interpreter.define_native_function(prototype, "startsWith", starts_with, 1, attr);
    interpreter.define_native_function(prototype, "endsWith", ends_with, 1, attr);
    interpreter.define_native_function(prototype, "slice", slice, 2, attr);
    interpreter.define_native_function(prototype, "toUpperCase", to_upper_case, 0, attr);
    interpreter.define_native_function(prototype, "toLowerCase", to_lower_case, 0, attr);
    interpreter.define_native_function(prototype, "trim", trim, 0, attr);
    interpreter.define_native_function(prototype, "repeat", repeat, 1, attr);
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_function(prototype, "valueOf", value_of, 0, attr);
}

fn this_string(interpreter: &mut Interpreter) -> JsResult<String> {
    let this = interpreter.this_value();
    if let Value::Object(handle) = this {
        if let ObjectKind::StringWrapper(string) = interpreter.heap().object(handle).kind() {
            return Ok(interpreter.heap().string(*string).text().to_string());
        }
    }
    interpreter.to_string(this)
}

fn char_at(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let index = interpreter.to_number(interpreter.argument(0))?;
    if index < 0.0 || index.is_nan() {
        return Ok(interpreter.js_string(""));
    }
    match text.chars().nth(index as usize) {
        Some(character) => Ok(interpreter.js_string(character.to_string())),
        None => Ok(interpreter.js_string("")),
    }
}

fn index_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let needle = interpreter.to_string(interpreter.argument(0))?;
    match text.find(&needle) {
        Some(position) => Ok(Value::Number(text[..position].chars().count() as f64)),
        None => Ok(Value::Number(-1.0)),
    }
}

fn includes(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let needle = interpreter.to_string(interpreter.argument(0))?;
    Ok(Value::Boolean(text.contains(&needle)))
}

fn starts_with(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let needle = interpreter.to_string(interpreter.argument(0))?;
    Ok(Value::Boolean(text.starts_with(&needle)))
}

fn ends_with(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let needle = interpreter.to_string(interpreter.argument(0))?;
    Ok(Value::Boolean(text.ends_with(&needle)))
}

fn slice(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let characters: Vec<char> = text.chars().collect();
    let length = characters.len() as f64;
    let resolve = |relative: f64| -> usize {
        if relative < 0.0 {
            (length + relative).max(0.0) as usize
        } else {
            relative.min(length) as usize
        }
    };
    let start = if interpreter.argument(0).is_undefined() {
        0
    } else {
        resolve(interpreter.to_number(interpreter.argument(0))?.trunc())
    };
    let end = if interpreter.argument(1).is_undefined() {
        characters.len()
    } else {
        resolve(interpreter.to_number(interpreter.argument(1))?.trunc())
    };
    let piece: String = if start < end {
        characters[start..end].iter().collect()
    } else {
        String::new()
    };
    Ok(interpreter.js_string(piece))
}

fn to_upper_case(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    Ok(interpreter.js_string(text.to_uppercase()))
}

fn to_lower_case(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    Ok(interpreter.js_string(text.to_lowercase()))
}

fn trim(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    Ok(interpreter.js_string(text.trim().to_string()))
}

fn repeat(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    let count = interpreter.to_number(interpreter.argument(0))?;
    if count < 0.0 || !count.is_finite() {
        return Err(interpreter.throw_error(ErrorKind::RangeError, "Invalid repeat count"));
    }
    Ok(interpreter.js_string(text.repeat(count as usize)))
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = this_string(interpreter)?;
    Ok(interpreter.js_string(text))
}

fn value_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    to_string(interpreter)
}
