//! The Error constructor, its subclasses and Error.prototype.

use crate::exception::JsResult;
use crate::interpreter::{Interpreter, NativeFunction};
use crate::object::ObjectKind;
use crate::property_key::PropertyName;
use core_types::{ErrorKind, ObjectHandle, PropertyAttributes, Value};

/// Creates an error object of `kind` on the prototype registered for
/// that kind. This is also the engine's own path for `throw_error`.
pub(crate) fn create(
    interpreter: &mut Interpreter,
    kind: ErrorKind,
    message: &str,
) -> ObjectHandle {
    let prototype = interpreter.global_data().error_prototype_for(kind);
    interpreter.create_object(
        Some(prototype),
        ObjectKind::Error {
            kind,
            message: message.to_string(),
        },
    )
}

fn construct_with_kind(interpreter: &mut Interpreter, kind: ErrorKind) -> JsResult<Value> {
    let message = if interpreter.argument(0).is_undefined() {
        String::new()
    } else {
        interpreter.to_string(interpreter.argument(0))?
    };
    Ok(Value::Object(create(interpreter, kind, &message)))
}

/// `Error(...)`; calling and constructing behave the same.
pub(crate) fn base_call(interpreter: &mut Interpreter) -> JsResult<Value> {
    construct_with_kind(interpreter, ErrorKind::Error)
}

/// `new Error(...)`.
pub(crate) fn base_construct(interpreter: &mut Interpreter) -> JsResult<Value> {
    construct_with_kind(interpreter, ErrorKind::Error)
}

macro_rules! error_subclass_natives {
    ($($call:ident / $construct:ident => $kind:ident,)*) => {
        $(
            fn $call(interpreter: &mut Interpreter) -> JsResult<Value> {
                construct_with_kind(interpreter, ErrorKind::$kind)
            }
            fn $construct(interpreter: &mut Interpreter) -> JsResult<Value> {
                construct_with_kind(interpreter, ErrorKind::$kind)
            }
        )*
    };
}

error_subclass_natives! {
    eval_error_call / eval_error_construct => EvalError,
    range_error_call / range_error_construct => RangeError,
    reference_error_call / reference_error_construct => ReferenceError,
    syntax_error_call / syntax_error_construct => SyntaxError,
    type_error_call / type_error_construct => TypeError,
    uri_error_call / uri_error_construct => URIError,
}

/// The call/construct pair of an error subclass constructor.
pub(crate) fn subclass_natives(kind: ErrorKind) -> (NativeFunction, NativeFunction) {
    match kind {
        ErrorKind::EvalError => (eval_error_call, eval_error_construct),
        ErrorKind::RangeError => (range_error_call, range_error_construct),
        ErrorKind::ReferenceError => (reference_error_call, reference_error_construct),
        ErrorKind::SyntaxError => (syntax_error_call, syntax_error_construct),
        ErrorKind::TypeError => (type_error_call, type_error_construct),
        ErrorKind::URIError => (uri_error_call, uri_error_construct),
        ErrorKind::Error => (base_call, base_construct),
    }
}

pub(crate) fn install(interpreter: &mut Interpreter) {
    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    let prototype = interpreter.global_data().error_prototype;

    let name_value = interpreter.js_string("Error");
    interpreter
        .define_property(
            prototype,
            &PropertyName::String("name".to_string()),
            name_value,
            attr,
        )
        .expect("error prototype definition cannot fail");
    interpreter.define_native_property(prototype, "message", Some(message_getter), None, attr);
    interpreter.define_native_function(prototype, "toString", to_string, 0, attr);

    let subclasses: Vec<(ErrorKind, ObjectHandle)> = interpreter
        .global_data()
        .error_subclasses
        .iter()
        .map(|(kind, (_, prototype))| (*kind, *prototype))
        .collect();
    for (kind, prototype) in subclasses {
        let name_value = interpreter.js_string(kind.name());
        interpreter
            .define_property(
                prototype,
                &PropertyName::String("name".to_string()),
                name_value,
                attr,
            )
            .expect("error prototype definition cannot fail");
    }
}

fn this_error(interpreter: &mut Interpreter) -> Option<(ErrorKind, String)> {
    let Value::Object(this) = interpreter.this_value() else {
        return None;
    };
    match interpreter.heap().object(this).kind() {
        ObjectKind::Error { kind, message } => Some((*kind, message.clone())),
        _ => None,
    }
}

fn message_getter(interpreter: &mut Interpreter) -> JsResult<Value> {
    match this_error(interpreter) {
        Some((_, message)) => Ok(interpreter.js_string(message)),
        None => Ok(interpreter.js_string("")),
    }
}

fn to_string(interpreter: &mut Interpreter) -> JsResult<Value> {
    let this = interpreter.this_value();
    let Value::Object(this_object) = this else {
        return Err(interpreter.throw_error(
            core_types::ErrorKind::TypeError,
            "Error.prototype.toString called on a non-object",
        ));
    };
    let name = interpreter.get_property(this_object, &PropertyName::String("name".to_string()))?;
    let name = if name.is_undefined() {
        "Error".to_string()
    } else {
        interpreter.to_string(name)?
    };
    let message =
        interpreter.get_property(this_object, &PropertyName::String("message".to_string()))?;
    let message = if message.is_undefined() {
        String::new()
    } else {
        interpreter.to_string(message)?
    };
    let text = if message.is_empty() {
        name
    } else {
        format!("{}: {}", name, message)
    };
    Ok(interpreter.js_string(text))
}
