//! The Number constructor and Number.prototype.

use crate::conversions::parse_float_prefix;
use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use crate::property_key::PropertyName;
use core_types::{number_to_js_string, ErrorKind, PropertyAttributes, Value};

const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;
const MIN_SAFE_INTEGER: f64 = -9007199254740991.0;

/// `Number(value)`.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    if interpreter.argument_count() == 0 {
        return Ok(Value::Number(0.0));
    }
    let number = interpreter.to_number(interpreter.argument(0))?;
    Ok(Value::Number(number))
}

/// `new Number(value)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    let Value::Number(number) = call(interpreter)? else {
        unreachable!()
    };
    let prototype = interpreter.global_data().number_prototype;
    let wrapper = interpreter.create_object(Some(prototype), ObjectKind::NumberWrapper(number));
    Ok(Value::Object(wrapper))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let constructor = interpreter.global_data().number_constructor;
    interpreter.define_native_function(constructor, "isFinite", is_finite, 1, attr);
    interpreter.define_native_function(constructor, "isInteger", is_integer, 1, attr);
    interpreter.define_native_function(constructor, "isNaN", is_nan, 1, attr);
    interpreter.define_native_function(constructor, "isSafeInteger", is_safe_integer, 1, attr);
    interpreter.define_native_function(constructor, "parseFloat", parse_float, 1, attr);

    let no_attributes = PropertyAttributes::empty();
    let constants = [
        ("EPSILON", f64::EPSILON),
        ("MAX_SAFE_INTEGER", MAX_SAFE_INTEGER),
        ("MIN_SAFE_INTEGER", MIN_SAFE_INTEGER),
        ("POSITIVE_INFINITY", f64::INFINITY),
        ("NEGATIVE_INFINITY", f64::NEG_INFINITY),
        ("NaN", f64::NAN),
    ];
    for (name, value) in constants {
        interpreter
            .define_property(
                constructor,
                &PropertyName::String(name.to_string()),
                Value::Number(value),
                no_attributes,
            )
            .expect("number constant definition cannot fail");
    }

    let prototype = interpreter.global_data().number_prototype;
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_function(prototype, "valueOf", value_of, 0, attr);
}

fn is_finite(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Boolean(interpreter.argument(0).is_finite_number()))
}

fn is_integer(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Boolean(interpreter.argument(0).is_integer()))
}

fn is_nan(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Boolean(interpreter.argument(0).is_nan()))
}

fn is_safe_integer(interpreter: &mut Interpreter) -> JsResult<Value> {
    let Value::Number(number) = interpreter.argument(0) else {
        return Ok(Value::Boolean(false));
    };
    let safe = number.is_finite()
        && number.trunc() == number
        && (MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&number);
    Ok(Value::Boolean(safe))
}

fn parse_float(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = interpreter.to_string(interpreter.argument(0))?;
    Ok(Value::Number(parse_float_prefix(&text)))
}

fn this_number(interpreter: &mut Interpreter) -> JsResult<f64> {
    match interpreter.this_value() {
        Value::Number(number) => Ok(number),
        Value::Object(handle) => match interpreter.heap().object(handle).kind() {
            ObjectKind::NumberWrapper(number) => Ok(*number),
            _ => Err(interpreter.throw_error(
                ErrorKind::TypeError,
                "Number.prototype method called on an incompatible receiver",
            )),
        },
        _ => Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "Number.prototype method called on an incompatible receiver",
        )),
    }
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let number = this_number(interpreter)?;
    Ok(interpreter.js_string(number_to_js_string(number)))
}

fn value_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    let number = this_number(interpreter)?;
    Ok(Value::Number(number))
}
