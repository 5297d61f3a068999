//! The Object constructor and Object.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{self, ObjectKind};
use crate::property_key::PropertyName;
use core_types::{ErrorKind, ObjectHandle, PropertyAttributes, Value};

/// `Object(value)`.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    let argument = interpreter.argument(0);
    if argument.is_nullish() {
        let prototype = interpreter.global_data().object_prototype;
        return Ok(Value::Object(
            interpreter.create_object(Some(prototype), ObjectKind::Plain),
        ));
    }
    let object = interpreter.to_object(argument)?;
    Ok(Value::Object(object))
}

/// `new Object(value)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    call(interpreter)
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let constructor = interpreter.global_data().object_constructor;
    interpreter.define_native_function(constructor, "getPrototypeOf", get_prototype_of, 1, attr);
    interpreter.define_native_function(constructor, "setPrototypeOf", set_prototype_of, 2, attr);
    interpreter.define_native_function(constructor, "keys", keys, 1, attr);
    interpreter.define_native_function(constructor, "values", values, 1, attr);
    interpreter.define_native_function(constructor, "entries", entries, 1, attr);
    interpreter.define_native_function(constructor, "defineProperty", define_property, 3, attr);
    interpreter.define_native_function(
        constructor,
        "getOwnPropertyNames",
        get_own_property_names,
        1,
        attr,
    );

    let prototype = interpreter.global_data().object_prototype;
    interpreter.define_native_function(prototype, "hasOwnProperty", has_own_property, 1, attr);
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_function(prototype, "valueOf", value_of, 0, attr);
}

fn argument_as_object(interpreter: &mut Interpreter, index: usize) -> JsResult<ObjectHandle> {
    match interpreter.argument(index) {
        Value::Object(handle) => Ok(handle),
        other => {
            let text = interpreter.to_string_without_side_effects(other);
            Err(interpreter
                .throw_error(ErrorKind::TypeError, format!("{} is not an object", text)))
        }
    }
}

fn get_prototype_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    let object = argument_as_object(interpreter, 0)?;
    match object::prototype_of(interpreter.heap(), object) {
        Some(prototype) => Ok(Value::Object(prototype)),
        None => Ok(Value::Null),
    }
}

fn set_prototype_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    let object = argument_as_object(interpreter, 0)?;
    let prototype = match interpreter.argument(1) {
        Value::Null => None,
        Value::Object(handle) => Some(handle),
        other => {
            let text = interpreter.to_string_without_side_effects(other);
            return Err(interpreter.throw_error(
                ErrorKind::TypeError,
                format!("Prototype must be an object or null, got {}", text),
            ));
        }
    };
    interpreter.set_prototype(object, prototype)?;
    Ok(Value::Object(object))
}

fn keys(interpreter: &mut Interpreter) -> JsResult<Value> {
    let object = argument_as_object(interpreter, 0)?;
    let keys = object::own_property_keys(interpreter.heap(), object, true);
    let mut elements = Vec::with_capacity(keys.len());
    let mark = interpreter.temporaries_mark();
    for key in keys {
        let value = interpreter.js_string(key);
        interpreter.push_temporary(value);
        elements.push(value);
    }
    let array = interpreter.array_create(elements);
    interpreter.truncate_temporaries(mark);
    Ok(Value::Object(array))
}

fn values(interpreter: &mut Interpreter) -> JsResult<Value> {
    let object = argument_as_object(interpreter, 0)?;
    let keys = object::own_property_keys(interpreter.heap(), object, true);
    let mut elements = Vec::with_capacity(keys.len());
    let mark = interpreter.temporaries_mark();
    for key in keys {
        let value = interpreter.get_property(object, &PropertyName::from_string(key))?;
        interpreter.push_temporary(value);
        elements.push(value);
    }
    let array = interpreter.array_create(elements);
    interpreter.truncate_temporaries(mark);
    Ok(Value::Object(array))
}

fn entries(interpreter: &mut Interpreter) -> JsResult<Value> {
    let object = argument_as_object(interpreter, 0)?;
    let keys = object::own_property_keys(interpreter.heap(), object, true);
    let mut pairs = Vec::with_capacity(keys.len());
    let mark = interpreter.temporaries_mark();
    for key in keys {
        let key_value = interpreter.js_string(key.clone());
        interpreter.push_temporary(key_value);
        let value = interpreter.get_property(object, &PropertyName::from_string(key))?;
        interpreter.push_temporary(value);
        let entry = interpreter.array_create(vec![key_value, value]);
        interpreter.push_temporary(Value::Object(entry));
        pairs.push(Value::Object(entry));
    }
    let array = interpreter.array_create(pairs);
    interpreter.truncate_temporaries(mark);
    Ok(Value::Object(array))
}

fn get_own_property_names(interpreter: &mut Interpreter) -> JsResult<Value> {
    let object = argument_as_object(interpreter, 0)?;
    let keys = object::own_property_keys(interpreter.heap(), object, false);
    let mut elements = Vec::with_capacity(keys.len());
    let mark = interpreter.temporaries_mark();
    for key in keys {
        let value = interpreter.js_string(key);
        interpreter.push_temporary(value);
        elements.push(value);
    }
    let array = interpreter.array_create(elements);
    interpreter.truncate_temporaries(mark);
    Ok(Value::Object(array))
}

/// `Object.defineProperty(target, key, descriptor)`. Fields absent from
/// the descriptor keep their current value on an existing property and
/// default to false on a new one.
fn define_property(interpreter: &mut Interpreter) -> JsResult<Value> {
    let target = argument_as_object(interpreter, 0)?;
    let key_value = interpreter.argument(1);
    let name = interpreter.to_property_name(key_value)?;
    let descriptor = argument_as_object(interpreter, 2)?;

    let getter = descriptor_function(interpreter, descriptor, "get")?;
    let setter = descriptor_function(interpreter, descriptor, "set")?;

    let existing = name
        .as_property_key()
        .and_then(|key| object::get_own_property(interpreter.heap(), target, &key));
    let mut attributes = match &existing {
        Some((_, metadata)) => metadata.attributes,
        None => PropertyAttributes::empty(),
    };
    for (field, flag) in [
        ("writable", PropertyAttributes::WRITABLE),
        ("enumerable", PropertyAttributes::ENUMERABLE),
        ("configurable", PropertyAttributes::CONFIGURABLE),
    ] {
        let field_name = PropertyName::String(field.to_string());
        if interpreter.has_property(descriptor, &field_name)? {
            let enabled = interpreter.get_property(descriptor, &field_name)?;
            if interpreter.to_boolean(enabled) {
                attributes |= flag;
            } else {
                attributes -= flag;
            }
        }
    }

    if getter.is_some() || setter.is_some() {
        interpreter.define_accessor(target, &name, getter, setter, attributes)?;
        return Ok(Value::Object(target));
    }

    let value_name = PropertyName::String("value".to_string());
    let value = if interpreter.has_property(descriptor, &value_name)? {
        interpreter.get_property(descriptor, &value_name)?
    } else {
        match existing {
            Some((value, _)) if !value.is_accessor() => value,
            _ => Value::Undefined,
        }
    };
    interpreter.define_property(target, &name, value, attributes)?;
    Ok(Value::Object(target))
}

fn descriptor_function(
    interpreter: &mut Interpreter,
    descriptor: ObjectHandle,
    field: &str,
) -> JsResult<Option<ObjectHandle>> {
    let value = interpreter.get_property(descriptor, &PropertyName::String(field.to_string()))?;
    match value {
        Value::Undefined => Ok(None),
        Value::Object(handle) if interpreter.heap().object(handle).is_function() => {
            Ok(Some(handle))
        }
        _ => Err(interpreter.throw_error(
            ErrorKind::TypeError,
            format!("Property descriptor '{}' is not a function", field),
        )),
    }
}

fn has_own_property(interpreter: &mut Interpreter) -> JsResult<Value> {
    let this = interpreter.this_value();
    let object = interpreter.to_object(this)?;
    let key_value = interpreter.argument(0);
    let name = interpreter.to_property_name(key_value)?;
    let found = match &name {
        PropertyName::Index(index) => interpreter
            .heap()
            .object(object)
            .indexed_properties()
            .contains(*index),
        _ => {
            let key = name.as_property_key().expect("named key");
            object::get_own_property(interpreter.heap(), object, &key).is_some()
        }
    };
    Ok(Value::Boolean(found))
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let this = interpreter.this_value();
    let text = match this {
        Value::Undefined => "[object Undefined]".to_string(),
        Value::Null => "[object Null]".to_string(),
        _ => {
            let object = interpreter.to_object(this)?;
            format!("[object {}]", interpreter.heap().object(object).class_name())
        }
    };
    Ok(interpreter.js_string(text))
}

fn value_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    let this = interpreter.this_value();
    let object = interpreter.to_object(this)?;
    Ok(Value::Object(object))
}
