//! The Math namespace object.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use crate::property_key::PropertyName;
use core_types::{ObjectHandle, PropertyAttributes, Value};
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Creates the `Math` object.
pub(crate) fn create(interpreter: &mut Interpreter) -> ObjectHandle {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().object_prototype;
    let math = interpreter.create_object(Some(prototype), ObjectKind::Plain);

    interpreter.define_native_function(math, "abs", abs, 1, attr);
    interpreter.define_native_function(math, "ceil", ceil, 1, attr);
    interpreter.define_native_function(math, "floor", floor, 1, attr);
    interpreter.define_native_function(math, "round", round, 1, attr);
    interpreter.define_native_function(math, "trunc", trunc, 1, attr);
    interpreter.define_native_function(math, "sqrt", sqrt, 1, attr);
    interpreter.define_native_function(math, "pow", pow, 2, attr);
    interpreter.define_native_function(math, "max", max, 2, attr);
    interpreter.define_native_function(math, "min", min, 2, attr);
    interpreter.define_native_function(math, "random", random, 0, attr);

    let no_attributes = PropertyAttributes::empty();
    for (name, value) in [("E", std::f64::consts::E), ("PI", std::f64::consts::PI)] {
        interpreter
            .define_property(
                math,
                &PropertyName::String(name.to_string()),
                Value::Number(value),
                no_attributes,
            )
            .expect("Math constant definition cannot fail");
    }
    math
}

fn unary(
    interpreter: &mut Interpreter,
    operation: impl Fn(f64) -> f64,
) -> JsResult<Value> {
    let number = interpreter.to_number(interpreter.argument(0))?;
    Ok(Value::Number(operation(number)))
}

fn abs(interpreter: &mut Interpreter) -> JsResult<Value> {
    unary(interpreter, f64::abs)
}

fn ceil(interpreter: &mut Interpreter) -> JsResult<Value> {
    unary(interpreter, f64::ceil)
}

fn floor(interpreter: &mut Interpreter) -> JsResult<Value> {
    unary(interpreter, f64::floor)
}

fn round(interpreter: &mut Interpreter) -> JsResult<Value> {
    // JavaScript rounds half-way cases toward positive infinity.
    unary(interpreter, |number| (number + 0.5).floor())
}

fn trunc(interpreter: &mut Interpreter) -> JsResult<Value> {
    unary(interpreter, f64::trunc)
}

fn sqrt(interpreter: &mut Interpreter) -> JsResult<Value> {
    unary(interpreter, f64::sqrt)
}

fn pow(interpreter: &mut Interpreter) -> JsResult<Value> {
    let base = interpreter.to_number(interpreter.argument(0))?;
    let exponent = interpreter.to_number(interpreter.argument(1))?;
    Ok(Value::Number(base.powf(exponent)))
}

fn reduce(
    interpreter: &mut Interpreter,
    initial: f64,
    pick: impl Fn(f64, f64) -> f64,
) -> JsResult<Value> {
    let arguments = interpreter.arguments().to_vec();
    let mut result = initial;
    for argument in arguments {
        let number = interpreter.to_number(argument)?;
        if number.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        result = pick(result, number);
    }
    Ok(Value::Number(result))
}

fn max(interpreter: &mut Interpreter) -> JsResult<Value> {
    reduce(interpreter, f64::NEG_INFINITY, f64::max)
}

fn min(interpreter: &mut Interpreter) -> JsResult<Value> {
    reduce(interpreter, f64::INFINITY, f64::min)
}

thread_local! {
    static RANDOM_STATE: Cell<u64> = Cell::new(0);
}

fn random(_interpreter: &mut Interpreter) -> JsResult<Value> {
    // xorshift64*, seeded from the clock on first use.
    let next = RANDOM_STATE.with(|state| {
        let mut seed = state.get();
        if seed == 0 {
            seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|duration| duration.as_nanos() as u64)
                .unwrap_or(0x9e3779b97f4a7c15)
                | 1;
        }
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        state.set(seed);
        seed
    });
    Ok(Value::Number((next >> 11) as f64 / (1u64 << 53) as f64))
}
