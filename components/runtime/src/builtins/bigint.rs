//! The BigInt callable and BigInt.prototype.

use crate::bigint::JsBigInt;
use crate::conversions::PreferredType;
use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use core_types::{ErrorKind, PropertyAttributes, Value};
use num_bigint::BigInt;

/// `BigInt(value)`; `new BigInt` is a TypeError, which the construct
/// slot being absent already enforces.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    let primitive = interpreter.to_primitive(interpreter.argument(0), PreferredType::Number)?;
    if let Value::Number(number) = primitive {
        if !Value::Number(number).is_integer() {
            return Err(interpreter.throw_error(
                ErrorKind::RangeError,
                "BigInt argument must be an integer",
            ));
        }
        return Ok(interpreter.js_bigint(BigInt::from(number as i64)));
    }
    let value = interpreter.to_bigint(primitive)?;
    Ok(interpreter.js_bigint(value))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let constructor = interpreter.global_data().bigint_constructor;
    interpreter.define_native_function(constructor, "asIntN", as_int_n, 2, attr);
    interpreter.define_native_function(constructor, "asUintN", as_uint_n, 2, attr);

    let prototype = interpreter.global_data().bigint_prototype;
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
    interpreter.define_native_function(prototype, "valueOf", value_of, 0, attr);
}

fn bits_argument(interpreter: &mut Interpreter) -> JsResult<u64> {
    let bits = interpreter.to_number(interpreter.argument(0))?;
    if bits < 0.0 || bits.trunc() != bits || !bits.is_finite() {
        return Err(interpreter.throw_error(
            ErrorKind::RangeError,
            "Bit count must be a non-negative integer",
        ));
    }
    Ok(bits as u64)
}

fn as_int_n(interpreter: &mut Interpreter) -> JsResult<Value> {
    let bits = bits_argument(interpreter)?;
    let value = interpreter.to_bigint(interpreter.argument(1))?;
    Ok(interpreter.js_bigint(JsBigInt::as_int_n(bits, &value)))
}

fn as_uint_n(interpreter: &mut Interpreter) -> JsResult<Value> {
    let bits = bits_argument(interpreter)?;
    let value = interpreter.to_bigint(interpreter.argument(1))?;
    Ok(interpreter.js_bigint(JsBigInt::as_uint_n(bits, &value)))
}

fn this_bigint(interpreter: &mut Interpreter) -> JsResult<Value> {
    match interpreter.this_value() {
        value @ Value::BigInt(_) => Ok(value),
        Value::Object(handle) => match interpreter.heap().object(handle).kind() {
            ObjectKind::BigIntWrapper(bigint) => Ok(Value::BigInt(*bigint)),
            _ => Err(interpreter.throw_error(
                ErrorKind::TypeError,
                "BigInt.prototype method called on an incompatible receiver",
            )),
        },
        _ => Err(interpreter.throw_error(
            ErrorKind::TypeError,
            "BigInt.prototype method called on an incompatible receiver",
        )),
    }
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let value = this_bigint(interpreter)?;
    let digits = interpreter.heap().bigint(value.as_bigint()).to_digits();
    Ok(interpreter.js_string(digits))
}

fn value_of(interpreter: &mut Interpreter) -> JsResult<Value> {
    this_bigint(interpreter)
}
