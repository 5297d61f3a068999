//! The Array constructor and Array.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::property_key::PropertyName;
use core_types::{ErrorKind, ObjectHandle, PropertyAttributes, Value};

/// `Array(...)`: a single numeric argument makes an array of that
/// length (filled with `undefined`), anything else becomes elements.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    if interpreter.argument_count() == 1 {
        if let Value::Number(length) = interpreter.argument(0) {
            if length < 0.0 || length.trunc() != length || length > 4294967295.0 {
                return Err(
                    interpreter.throw_error(ErrorKind::RangeError, "Invalid array length")
                );
            }
            let elements = vec![Value::Undefined; length as usize];
            return Ok(Value::Object(interpreter.array_create(elements)));
        }
    }
    let elements = interpreter.arguments().to_vec();
    Ok(Value::Object(interpreter.array_create(elements)))
}

/// `new Array(...)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    call(interpreter)
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let constructor = interpreter.global_data().array_constructor;
    interpreter.define_native_function(constructor, "isArray", is_array, 1, attr);

    let prototype = interpreter.global_data().array_prototype;
    interpreter.define_native_function(prototype, "push", push, 1, attr);
    interpreter.define_native_function(prototype, "pop", pop, 0, attr);
    interpreter.define_native_function(prototype, "shift", shift, 0, attr);
    interpreter.define_native_function(prototype, "unshift", unshift, 1, attr);
    interpreter.define_native_function(prototype, "join", join, 1, attr);
    interpreter.define_native_function(prototype, "indexOf", index_of, 1, attr);
    interpreter.define_native_function(prototype, "includes", includes, 1, attr);
    interpreter.define_native_function(prototype, "slice", slice, 2, attr);
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
}

fn is_array(interpreter: &mut Interpreter) -> JsResult<Value> {
    let result = match interpreter.argument(0) {
        Value::Object(handle) => interpreter.heap().object(handle).is_array(),
        _ => false,
    };
    Ok(Value::Boolean(result))
}

fn this_array(interpreter: &mut Interpreter) -> JsResult<ObjectHandle> {
    let this = interpreter.this_value();
    interpreter.to_object(this)
}

fn array_length(interpreter: &Interpreter, array: ObjectHandle) -> u32 {
    interpreter
        .heap()
        .object(array)
        .indexed_properties()
        .array_like_length()
}

fn push(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let mut length = array_length(interpreter, array);
    let arguments = interpreter.arguments().to_vec();
    for value in arguments {
        interpreter.put_property(array, &PropertyName::Index(length), value)?;
        length += 1;
    }
    Ok(Value::Number(length as f64))
}

fn pop(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let length = array_length(interpreter, array);
    if length == 0 {
        return Ok(Value::Undefined);
    }
    let value = interpreter.get_property(array, &PropertyName::Index(length - 1))?;
    interpreter
        .heap_mut()
        .object_mut(array)
        .indexed_properties_mut()
        .remove(length - 1);
    Ok(value)
}

fn shift(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let length = array_length(interpreter, array);
    if length == 0 {
        return Ok(Value::Undefined);
    }
    let first = interpreter.get_property(array, &PropertyName::Index(0))?;
    let mark = interpreter.temporaries_mark();
    interpreter.push_temporary(first);
    for index in 1..length {
        let value = interpreter.get_property(array, &PropertyName::Index(index))?;
        interpreter.put_property(array, &PropertyName::Index(index - 1), value)?;
    }
    interpreter
        .heap_mut()
        .object_mut(array)
        .indexed_properties_mut()
        .remove(length - 1);
    interpreter.truncate_temporaries(mark);
    Ok(first)
}

fn unshift(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let length = array_length(interpreter, array);
    let arguments = interpreter.arguments().to_vec();
    let shift_by = arguments.len() as u32;
    for index in (0..length).rev() {
        let value = interpreter.get_property(array, &PropertyName::Index(index))?;
        interpreter.put_property(array, &PropertyName::Index(index + shift_by), value)?;
    }
    for (offset, value) in arguments.into_iter().enumerate() {
        interpreter.put_property(array, &PropertyName::Index(offset as u32), value)?;
    }
    Ok(Value::Number((length + shift_by) as f64))
}

fn join(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let separator = if interpreter.argument(0).is_undefined() {
        ",".to_string()
    } else {
        interpreter.to_string(interpreter.argument(0))?
    };
    let length = array_length(interpreter, array);
    let mut pieces = Vec::with_capacity(length as usize);
    for index in 0..length {
        let value = interpreter.get_property(array, &PropertyName::Index(index))?;
        if value.is_nullish() {
            pieces.push(String::new());
        } else {
            pieces.push(interpreter.to_string(value)?);
        }
    }
    Ok(interpreter.js_string(pieces.join(&separator)))
}

fn index_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let needle = interpreter.argument(0);
    let length = array_length(interpreter, array);
    for index in 0..length {
        let value = interpreter.get_property(array, &PropertyName::Index(index))?;
        if interpreter.strict_equals(value, needle) {
            return Ok(Value::Number(index as f64));
        }
    }
    Ok(Value::Number(-1.0))
}

fn includes(interpreter: &mut Interpreter) -> JsResult<Value> {
    let found = index_of(interpreter)?;
    Ok(Value::Boolean(found != Value::Number(-1.0)))
}

fn slice(interpreter: &mut Interpreter) -> JsResult<Value> {
    let array = this_array(interpreter)?;
    let length = array_length(interpreter, array) as f64;
    let resolve = |relative: f64| -> u32 {
        if relative < 0.0 {
            (length + relative).max(0.0) as u32
        } else {
            relative.min(length) as u32
        }
    };
    let start = if interpreter.argument(0).is_undefined() {
        0
    } else {
        resolve(interpreter.to_number(interpreter.argument(0))?.trunc())
    };
    let end = if interpreter.argument(1).is_undefined() {
        length as u32
    } else {
        resolve(interpreter.to_number(interpreter.argument(1))?.trunc())
    };
    let mark = interpreter.temporaries_mark();
    let mut elements = Vec::new();
    for index in start..end {
        let value = interpreter.get_property(array, &PropertyName::Index(index))?;
        interpreter.push_temporary(value);
        elements.push(value);
    }
    let result = interpreter.array_create(elements);
    interpreter.truncate_temporaries(mark);
    Ok(Value::Object(result))
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    join(interpreter)
}
