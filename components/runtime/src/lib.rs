//! Object model, heap and interpreter for the Kestrel JavaScript runtime.
//!
//! The three load-bearing subsystems live here:
//!
//! - **Shapes** ([`shape`]) - hidden classes assigning fixed slot offsets
//!   to property names, shared between objects with identical construction
//!   history via a forward-transition tree.
//! - **Values & objects** ([`object`], together with `core_types::Value`) -
//!   objects hold a shape reference plus an offset-indexed slot vector and
//!   a separate indexed-property store; a kind tag provides polymorphic
//!   behaviour for arrays, functions, errors, wrappers and the rest.
//! - **Heap & GC** ([`heap`], [`cell`]) - every shape, object, string,
//!   bigint, symbol and accessor is a uniformly allocated cell in a slot
//!   arena, reclaimed by a stop-the-world mark/sweep collector driven by
//!   explicit roots.
//!
//! The [`interpreter::Interpreter`] façade owns the heap, the global
//! object, the call stack and the exception slot, and walks the AST
//! produced by the `parser` crate.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod accessor;
pub mod bigint;
mod builtins;
pub mod cell;
pub mod console;
mod conversions;
mod eval;
pub mod exception;
pub mod global_object;
pub mod heap;
pub mod indexed_properties;
pub mod interpreter;
pub mod object;
pub mod property_key;
pub mod shape;
pub mod string;
pub mod symbol;

pub use accessor::Accessor;
pub use bigint::JsBigInt;
pub use builtins::date::display_string as date_display_string;
pub use cell::{Cell, CellVisitor};
pub use console::{Console, ConsoleClient, StdoutConsoleClient};
pub use conversions::{parse_float_prefix, string_to_number, PreferredType};
pub use exception::{JsException, JsResult};
pub use heap::{GcStats, Heap};
pub use indexed_properties::{IndexedProperties, IndexedProperty};
pub use interpreter::{CallFrame, Exception, Interpreter, NativeFunction};
pub use object::{Object, ObjectKind};
pub use property_key::{PropertyKey, PropertyName};
pub use shape::{PropertyMetadata, Shape, TransitionType};
pub use string::PrimitiveString;
pub use symbol::JsSymbol;
