//! The Date constructor and Date.prototype.

use crate::exception::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use core_types::{ErrorKind, PropertyAttributes, Value};
use std::time::{SystemTime, UNIX_EPOCH};

fn now_milliseconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as f64)
        .unwrap_or(0.0)
}

fn format_date(milliseconds: f64) -> String {
    let datetime: Option<DateTime<Utc>> = Utc.timestamp_millis_opt(milliseconds as i64).single();
    match datetime {
        Some(datetime) => datetime.format("%a %b %d %Y %H:%M:%S GMT+0000").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// `Date()` without `new` returns the current time as a string.
pub(crate) fn call(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(interpreter.js_string(format_date(now_milliseconds())))
}

/// `new Date()` / `new Date(milliseconds)`.
pub(crate) fn construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    let milliseconds = if interpreter.argument_count() == 0 {
        now_milliseconds()
    } else {
        interpreter.to_number(interpreter.argument(0))?
    };
    let prototype = interpreter.global_data().date_prototype;
    let date = interpreter.create_object(Some(prototype), ObjectKind::Date { milliseconds });
    Ok(Value::Object(date))
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let constructor = interpreter.global_data().date_constructor;
    interpreter.define_native_function(constructor, "now", now, 0, attr);

    let prototype = interpreter.global_data().date_prototype;
    interpreter.define_native_function(prototype, "getTime", get_time, 0, attr);
    interpreter.define_native_function(prototype, "getFullYear", get_full_year, 0, attr);
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);
}

fn now(_interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Number(now_milliseconds()))
}

fn this_milliseconds(interpreter: &mut Interpreter) -> JsResult<f64> {
    if let Value::Object(handle) = interpreter.this_value() {
        if let ObjectKind::Date { milliseconds } = interpreter.heap().object(handle).kind() {
            return Ok(*milliseconds);
        }
    }
    Err(interpreter.throw_error(
        ErrorKind::TypeError,
        "Date.prototype method called on an incompatible receiver",
    ))
}

fn get_time(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Number(this_milliseconds(interpreter)?))
}

fn get_full_year(interpreter: &mut Interpreter) -> JsResult<Value> {
    let milliseconds = this_milliseconds(interpreter)?;
    match Utc.timestamp_millis_opt(milliseconds as i64).single() {
        Some(datetime) => Ok(Value::Number(datetime.year() as f64)),
        None => Ok(Value::Number(f64::NAN)),
    }
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let milliseconds = this_milliseconds(interpreter)?;
    Ok(interpreter.js_string(format_date(milliseconds)))
}

/// The printed form used by the REPL (`Date <string>`).
pub fn display_string(milliseconds: f64) -> String {
    format_date(milliseconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch() {
        assert_eq!(format_date(0.0), "Thu Jan 01 1970 00:00:00 GMT+0000");
    }
}
