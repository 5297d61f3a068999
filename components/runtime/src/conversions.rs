//! Value conversions, equality and ordering.
//!
//! The ECMAScript abstract operations the evaluator and built-ins lean
//! on. Anything that can allocate or call user code (`toString`,
//! `valueOf`, `@@toPrimitive`) takes the interpreter mutably and returns
//! a `JsResult`; the side-effect-free variants borrow immutably.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use crate::property_key::PropertyName;
use core_types::{number_to_js_string, ErrorKind, ObjectHandle, Value};
use num_bigint::BigInt;

/// The hint passed to `to_primitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    /// No preference; numbers except for dates
    Default,
    /// Prefer `valueOf`
    Number,
    /// Prefer `toString`
    String,
}

impl Interpreter {
    /// ECMAScript `ToBoolean`.
    pub fn to_boolean(&self, value: Value) -> bool {
        match value {
            Value::Empty | Value::Undefined | Value::Null => false,
            Value::Boolean(boolean) => boolean,
            Value::Number(number) => !number.is_nan() && number != 0.0,
            Value::String(handle) => !self.heap().string(handle).is_empty(),
            Value::BigInt(handle) => !self.heap().bigint(handle).is_zero(),
            Value::Object(_) | Value::Symbol(_) => true,
            Value::Accessor(_) => panic!("accessor cell escaped into to_boolean"),
        }
    }

    /// ECMAScript `ToNumber`.
    pub fn to_number(&mut self, value: Value) -> JsResult<f64> {
        match value {
            Value::Empty => panic!("empty value escaped into to_number"),
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Boolean(boolean) => Ok(if boolean { 1.0 } else { 0.0 }),
            Value::Number(number) => Ok(number),
            Value::String(handle) => {
                let text = self.heap().string(handle).text().to_string();
                Ok(string_to_number(&text))
            }
            Value::BigInt(_) => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot convert a BigInt to a number",
            )),
            Value::Symbol(_) => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot convert a Symbol value to a number",
            )),
            Value::Object(_) => {
                let primitive = self.to_primitive(value, PreferredType::Number)?;
                self.to_number(primitive)
            }
            Value::Accessor(_) => panic!("accessor cell escaped into to_number"),
        }
    }

    /// ECMAScript `ToInt32`: modular reduction into the signed 32-bit
    /// range.
    pub fn to_i32(&mut self, value: Value) -> JsResult<i32> {
        Ok(self.to_u32(value)? as i32)
    }

    /// ECMAScript `ToUint32`: modular reduction into the unsigned
    /// 32-bit range.
    pub fn to_u32(&mut self, value: Value) -> JsResult<u32> {
        let number = self.to_number(value)?;
        if !number.is_finite() || number == 0.0 {
            return Ok(0);
        }
        let modulo = 4294967296.0;
        let mut reduced = number.trunc() % modulo;
        if reduced < 0.0 {
            reduced += modulo;
        }
        Ok(reduced as u32)
    }

    /// ECMAScript `ToString`, producing a Rust string.
    pub fn to_string(&mut self, value: Value) -> JsResult<String> {
        match value {
            Value::Empty => panic!("empty value escaped into to_string"),
            Value::Undefined => Ok("undefined".to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Boolean(boolean) => Ok(boolean.to_string()),
            Value::Number(number) => Ok(number_to_js_string(number)),
            Value::String(handle) => Ok(self.heap().string(handle).text().to_string()),
            Value::BigInt(handle) => Ok(self.heap().bigint(handle).to_digits()),
            Value::Symbol(_) => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot convert a Symbol value to a string",
            )),
            Value::Object(_) => {
                let primitive = self.to_primitive(value, PreferredType::String)?;
                self.to_string(primitive)
            }
            Value::Accessor(_) => panic!("accessor cell escaped into to_string"),
        }
    }

    /// `ToString` producing a string value on the heap.
    pub fn to_string_value(&mut self, value: Value) -> JsResult<Value> {
        let text = self.to_string(value)?;
        Ok(self.js_string(text))
    }

    /// Conversion for diagnostics and console output: never calls user
    /// code, never throws, never allocates.
    pub fn to_string_without_side_effects(&self, value: Value) -> String {
        match value {
            Value::Empty => "<empty>".to_string(),
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(boolean) => boolean.to_string(),
            Value::Number(number) => number_to_js_string(number),
            Value::String(handle) => self.heap().string(handle).text().to_string(),
            Value::BigInt(handle) => self.heap().bigint(handle).to_digits(),
            Value::Symbol(handle) => self.heap().symbol(handle).to_display_string(),
            Value::Object(handle) => {
                let object = self.heap().object(handle);
                if object.is_function() {
                    match object.kind() {
                        ObjectKind::Function(script) if !script.name.is_empty() => {
                            format!("[Function: {}]", script.name)
                        }
                        ObjectKind::NativeFunction(data) if !data.name.is_empty() => {
                            format!("[Function: {}]", data.name)
                        }
                        _ => "[Function]".to_string(),
                    }
                } else if let ObjectKind::Error { kind, message } = object.kind() {
                    if message.is_empty() {
                        kind.name().to_string()
                    } else {
                        format!("{}: {}", kind.name(), message)
                    }
                } else {
                    format!("[object {}]", object.class_name())
                }
            }
            Value::Accessor(_) => "<accessor>".to_string(),
        }
    }

    /// ECMAScript `ToPrimitive` with a preferred-type hint. Objects
    /// consult `@@toPrimitive` first, then `valueOf`/`toString` in the
    /// hint-determined order.
    pub fn to_primitive(&mut self, value: Value, hint: PreferredType) -> JsResult<Value> {
        let Value::Object(object) = value else {
            return Ok(value);
        };

        let to_primitive_symbol = self.global_data().well_known_to_primitive;
        let exotic =
            self.get_property(object, &PropertyName::Symbol(to_primitive_symbol))?;
        if let Value::Object(function) = exotic {
            if self.heap().object(function).is_function() {
                let hint_string = self.js_string(match hint {
                    PreferredType::Default => "default",
                    PreferredType::Number => "number",
                    PreferredType::String => "string",
                });
                let result = self.call_function(function, value, vec![hint_string])?;
                if !result.is_object() {
                    return Ok(result);
                }
                return Err(self.throw_error(
                    ErrorKind::TypeError,
                    "@@toPrimitive must return a primitive value",
                ));
            }
        }

        // Dates prefer string conversion under the default hint.
        let effective = match hint {
            PreferredType::Default => {
                if matches!(self.heap().object(object).kind(), ObjectKind::Date { .. }) {
                    PreferredType::String
                } else {
                    PreferredType::Number
                }
            }
            other => other,
        };
        let method_order: [&str; 2] = if effective == PreferredType::String {
            ["toString", "valueOf"]
        } else {
            ["valueOf", "toString"]
        };
        for method_name in method_order {
            let method =
                self.get_property(object, &PropertyName::String(method_name.to_string()))?;
            if let Value::Object(function) = method {
                if self.heap().object(function).is_function() {
                    let result = self.call_function(function, value, Vec::new())?;
                    if !result.is_object() {
                        return Ok(result);
                    }
                }
            }
        }
        Err(self.throw_error(
            ErrorKind::TypeError,
            "Cannot convert object to primitive value",
        ))
    }

    /// ECMAScript `ToObject`: wraps primitives in their wrapper kind.
    pub fn to_object(&mut self, value: Value) -> JsResult<ObjectHandle> {
        match value {
            Value::Object(handle) => Ok(handle),
            Value::Undefined | Value::Null => Err(self.throw_error(
                ErrorKind::TypeError,
                "ToObject on null or undefined",
            )),
            Value::Boolean(boolean) => {
                let prototype = self.global_data().boolean_prototype;
                Ok(self.create_object(Some(prototype), ObjectKind::BooleanWrapper(boolean)))
            }
            Value::Number(number) => {
                let prototype = self.global_data().number_prototype;
                Ok(self.create_object(Some(prototype), ObjectKind::NumberWrapper(number)))
            }
            Value::String(handle) => {
                let prototype = self.global_data().string_prototype;
                Ok(self.create_object(Some(prototype), ObjectKind::StringWrapper(handle)))
            }
            Value::BigInt(handle) => {
                let prototype = self.global_data().bigint_prototype;
                Ok(self.create_object(Some(prototype), ObjectKind::BigIntWrapper(handle)))
            }
            Value::Symbol(handle) => {
                let prototype = self.global_data().symbol_prototype;
                Ok(self.create_object(Some(prototype), ObjectKind::SymbolWrapper(handle)))
            }
            Value::Empty | Value::Accessor(_) => {
                panic!("internal value escaped into to_object")
            }
        }
    }

    /// ECMAScript `ToBigInt`.
    pub fn to_bigint(&mut self, value: Value) -> JsResult<BigInt> {
        match value {
            Value::BigInt(handle) => Ok(self.heap().bigint(handle).value().clone()),
            Value::Boolean(boolean) => Ok(BigInt::from(if boolean { 1 } else { 0 })),
            Value::String(handle) => {
                let text = self.heap().string(handle).text().to_string();
                match crate::JsBigInt::parse(&text) {
                    Some(parsed) => Ok(parsed),
                    None => Err(self.throw_error(
                        ErrorKind::SyntaxError,
                        format!("Invalid value for BigInt: {}", text),
                    )),
                }
            }
            Value::Number(_) => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot convert a number to a BigInt",
            )),
            Value::Undefined | Value::Null => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot convert null or undefined to a BigInt",
            )),
            Value::Symbol(_) => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot convert a Symbol value to a BigInt",
            )),
            Value::Object(_) => {
                let primitive = self.to_primitive(value, PreferredType::Number)?;
                self.to_bigint(primitive)
            }
            Value::Empty | Value::Accessor(_) => {
                panic!("internal value escaped into to_bigint")
            }
        }
    }

    /// Resolves a value used as a property key.
    pub fn to_property_name(&mut self, value: Value) -> JsResult<PropertyName> {
        if let Value::Symbol(handle) = value {
            return Ok(PropertyName::Symbol(handle));
        }
        if let Value::Number(number) = value {
            if number >= 0.0 && number < 4294967295.0 && number.trunc() == number {
                return Ok(PropertyName::Index(number as u32));
            }
        }
        let text = self.to_string(value)?;
        Ok(PropertyName::from_string(text))
    }

    /// The `typeof` operator.
    pub fn typeof_value(&self, value: Value) -> &'static str {
        match value {
            Value::Empty | Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::BigInt(_) => "bigint",
            Value::Symbol(_) => "symbol",
            Value::Object(handle) => {
                if self.heap().object(handle).is_function() {
                    "function"
                } else {
                    "object"
                }
            }
            Value::Accessor(_) => panic!("accessor cell escaped into typeof"),
        }
    }

    /// Strict equality (`===`).
    pub fn strict_equals(&self, lhs: Value, rhs: Value) -> bool {
        match (lhs, rhs) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => {
                a == b || self.heap().string(a).text() == self.heap().string(b).text()
            }
            (Value::BigInt(a), Value::BigInt(b)) => {
                a == b || self.heap().bigint(a).value() == self.heap().bigint(b).value()
            }
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            _ => false,
        }
    }

    /// Loose equality (`==`).
    pub fn loose_equals(&mut self, lhs: Value, rhs: Value) -> JsResult<bool> {
        match (lhs, rhs) {
            (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => Ok(true),
            (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Boolean(_), Value::Boolean(_))
            | (Value::Object(_), Value::Object(_))
            | (Value::Symbol(_), Value::Symbol(_))
            | (Value::BigInt(_), Value::BigInt(_)) => Ok(self.strict_equals(lhs, rhs)),
            (Value::Number(_), Value::String(_)) => {
                let number = self.to_number(rhs)?;
                Ok(self.strict_equals(lhs, Value::Number(number)))
            }
            (Value::String(_), Value::Number(_)) => {
                let number = self.to_number(lhs)?;
                Ok(self.strict_equals(Value::Number(number), rhs))
            }
            (Value::BigInt(handle), Value::Number(number))
            | (Value::Number(number), Value::BigInt(handle)) => {
                if !number.is_finite() || number.trunc() != number {
                    return Ok(false);
                }
                Ok(self.heap().bigint(handle).value() == &BigInt::from(number as i64))
            }
            (Value::BigInt(handle), Value::String(text))
            | (Value::String(text), Value::BigInt(handle)) => {
                let text = self.heap().string(text).text().to_string();
                match crate::JsBigInt::parse(&text) {
                    Some(parsed) => Ok(self.heap().bigint(handle).value() == &parsed),
                    None => Ok(false),
                }
            }
            (Value::Boolean(_), _) => {
                let number = self.to_number(lhs)?;
                self.loose_equals(Value::Number(number), rhs)
            }
            (_, Value::Boolean(_)) => {
                let number = self.to_number(rhs)?;
                self.loose_equals(lhs, Value::Number(number))
            }
            (Value::Object(_), _) => {
                let mark = self.temporaries_mark();
                self.push_temporary(rhs);
                let primitive = self.to_primitive(lhs, PreferredType::Default)?;
                self.truncate_temporaries(mark);
                self.loose_equals(primitive, rhs)
            }
            (_, Value::Object(_)) => {
                let mark = self.temporaries_mark();
                self.push_temporary(lhs);
                let primitive = self.to_primitive(rhs, PreferredType::Default)?;
                self.truncate_temporaries(mark);
                self.loose_equals(lhs, primitive)
            }
            _ => Ok(false),
        }
    }

    /// The abstract relational comparison for `<`; `None` means an
    /// operand was NaN.
    pub fn abstract_less_than(&mut self, lhs: Value, rhs: Value) -> JsResult<Option<bool>> {
        let mark = self.temporaries_mark();
        let left = self.to_primitive(lhs, PreferredType::Number)?;
        self.push_temporary(left);
        let right = self.to_primitive(rhs, PreferredType::Number)?;
        self.push_temporary(right);
        let result = self.abstract_less_than_primitives(left, right);
        self.truncate_temporaries(mark);
        result
    }

    fn abstract_less_than_primitives(
        &mut self,
        left: Value,
        right: Value,
    ) -> JsResult<Option<bool>> {
        if let (Value::String(a), Value::String(b)) = (left, right) {
            let a = self.heap().string(a).text().to_string();
            let b = self.heap().string(b).text().to_string();
            return Ok(Some(a < b));
        }
        if let (Value::BigInt(a), Value::BigInt(b)) = (left, right) {
            return Ok(Some(self.heap().bigint(a).value() < self.heap().bigint(b).value()));
        }
        let a = self.to_number(left)?;
        let b = self.to_number(right)?;
        if a.is_nan() || b.is_nan() {
            return Ok(None);
        }
        Ok(Some(a < b))
    }
}

/// `ToNumber` on string input: optional whitespace, then a decimal
/// literal, an `Infinity`, or an unsigned radix-prefixed integer.
pub fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(digits) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return parse_radix(digits, 16);
    }
    if let Some(digits) = trimmed.strip_prefix("0o").or_else(|| trimmed.strip_prefix("0O")) {
        return parse_radix(digits, 8);
    }
    if let Some(digits) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        return parse_radix(digits, 2);
    }
    match scan_decimal_literal(trimmed) {
        Some(length) if length == trimmed.len() => parse_decimal(trimmed),
        _ => f64::NAN,
    }
}

/// The `parseFloat` algorithm: the longest prefix forming a decimal
/// literal, NaN when there is none.
pub fn parse_float_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    match scan_decimal_literal(trimmed) {
        Some(length) => parse_decimal(&trimmed[..length]),
        None => f64::NAN,
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    match u64::from_str_radix(digits, radix) {
        Ok(value) => value as f64,
        Err(_) => f64::NAN,
    }
}

/// Length of the longest decimal-literal prefix: sign, `Infinity`, or
/// digits with optional fraction and exponent. `None` when no literal
/// starts at position 0.
fn scan_decimal_literal(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut position = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        position += 1;
    }
    if text[position..].starts_with("Infinity") {
        return Some(position + "Infinity".len());
    }
    let integer_digits = count_digits(&bytes[position..]);
    position += integer_digits;
    let mut fraction_digits = 0;
    if bytes.get(position) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[position + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            position += 1 + fraction_digits;
        }
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }
    if matches!(bytes.get(position), Some(b'e') | Some(b'E')) {
        let mut exponent_position = position + 1;
        if matches!(bytes.get(exponent_position), Some(b'+') | Some(b'-')) {
            exponent_position += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent_position..]);
        if exponent_digits > 0 {
            position = exponent_position + exponent_digits;
        }
    }
    Some(position)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

fn parse_decimal(literal: &str) -> f64 {
    // Rust's float parser rejects "1." and "1.e3"; drop a dot that is
    // not followed by a digit before handing over.
    let mut normalized = String::with_capacity(literal.len());
    let bytes = literal.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b'.' && !matches!(bytes.get(index + 1), Some(next) if next.is_ascii_digit()) {
            continue;
        }
        normalized.push(*byte as char);
    }
    normalized.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_number_decimal() {
        assert_eq!(string_to_number("42"), 42.0);
        assert_eq!(string_to_number("  3.5  "), 3.5);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("   "), 0.0);
        assert_eq!(string_to_number("-2.5e2"), -250.0);
        assert_eq!(string_to_number("1."), 1.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert!(string_to_number("12abc").is_nan());
        assert!(string_to_number("abc").is_nan());
    }

    #[test]
    fn test_string_to_number_radixes_and_infinity() {
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("0o17"), 15.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("Infinity"), f64::INFINITY);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("-0x10").is_nan());
        assert!(string_to_number("0x").is_nan());
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12.5abc"), 12.5);
        assert_eq!(parse_float_prefix("  -3e2xyz"), -300.0);
        assert_eq!(parse_float_prefix("Infinity and beyond"), f64::INFINITY);
        assert_eq!(parse_float_prefix(".25."), 0.25);
        assert!(parse_float_prefix("abc").is_nan());
        assert!(parse_float_prefix("").is_nan());
    }
}
