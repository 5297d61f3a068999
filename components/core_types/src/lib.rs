//! Core JavaScript value types for the Kestrel runtime.
//!
//! This crate provides the foundational types shared by the parser, the
//! runtime and the CLI: the tagged [`Value`] representation, the typed
//! handles that reference garbage-collected heap cells, property
//! attributes, error kinds and source positions.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`ObjectHandle`] and friends - typed indices into the heap's cell arena
//! - [`PropertyAttributes`] - the {writable, enumerable, configurable} triple
//! - [`ErrorKind`] - the built-in JavaScript error constructors
//! - [`SourcePosition`] - source code location for diagnostics
//!
//! # Examples
//!
//! ```
//! use core_types::Value;
//!
//! let num = Value::Number(42.0);
//! assert!(num.is_number());
//! assert!(num.is_integer());
//! assert!(!Value::Undefined.is_number());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod attributes;
mod error;
mod handles;
mod source;
mod value;

pub use attributes::PropertyAttributes;
pub use error::ErrorKind;
pub use handles::{
    AccessorHandle, BigIntHandle, CellHandle, ObjectHandle, ShapeHandle, StringHandle,
    SymbolHandle,
};
pub use source::SourcePosition;
pub use value::{number_to_js_string, Value};
