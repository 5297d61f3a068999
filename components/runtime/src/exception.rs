//! Exception propagation.
//!
//! Fallible runtime operations return [`JsResult`]. The `Err` side wraps
//! the thrown JavaScript value; the interpreter mirrors the same value in
//! its exception slot so it stays GC-reachable while stack frames unwind,
//! and so hosts can inspect an uncaught exception after `run` returns.

use core_types::Value;

/// A propagating JavaScript exception.
#[derive(Debug, Clone)]
pub struct JsException {
    /// The thrown value (usually an error object, but `throw 42` is
    /// legal JavaScript)
    pub value: Value,
}

impl JsException {
    /// Wraps a thrown value.
    pub fn new(value: Value) -> Self {
        JsException { value }
    }
}

/// Result type threaded through every fallible runtime operation.
pub type JsResult<T> = Result<T, JsException>;
