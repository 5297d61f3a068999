//! Uniform heap cells and the tracing visitor protocol.
//!
//! Everything of significant size lives on the heap as a [`Cell`]: plain
//! objects, shapes, strings, bigints, symbols and accessors. Each cell
//! kind reports the references it owns through [`Cell::visit_children`],
//! which is the entire tracing contract of the collector: miss a
//! reference there and a live cell gets swept.

use crate::accessor::Accessor;
use crate::bigint::JsBigInt;
use crate::object::Object;
use crate::shape::Shape;
use crate::string::PrimitiveString;
use crate::symbol::JsSymbol;
use core_types::{CellHandle, Value};

/// A garbage-collected heap cell.
#[derive(Debug)]
pub enum Cell {
    /// A JavaScript object (any kind)
    Object(Object),
    /// A property-layout shape
    Shape(Shape),
    /// An immutable string
    String(PrimitiveString),
    /// An arbitrary-precision integer
    BigInt(JsBigInt),
    /// A symbol
    Symbol(JsSymbol),
    /// A getter/setter pair
    Accessor(Accessor),
}

impl Cell {
    /// Passes every cell reference this cell owns to the visitor.
    pub fn visit_children(&self, visitor: &mut dyn CellVisitor) {
        match self {
            Cell::Object(object) => object.visit_children(visitor),
            Cell::Shape(shape) => shape.visit_children(visitor),
            Cell::Accessor(accessor) => accessor.visit_children(visitor),
            // Leaf cells own no references.
            Cell::String(_) | Cell::BigInt(_) | Cell::Symbol(_) => {}
        }
    }

    /// A short human-readable name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Cell::Object(_) => "Object",
            Cell::Shape(_) => "Shape",
            Cell::String(_) => "String",
            Cell::BigInt(_) => "BigInt",
            Cell::Symbol(_) => "Symbol",
            Cell::Accessor(_) => "Accessor",
        }
    }
}

/// Receiver side of the tracing protocol.
///
/// The marking pass implements this to build its worklist; tests may
/// implement it to observe reachability.
pub trait CellVisitor {
    /// Visits one owned cell reference.
    fn visit_cell(&mut self, cell: CellHandle);

    /// Visits a value, forwarding to [`CellVisitor::visit_cell`] when the
    /// value references the heap.
    fn visit_value(&mut self, value: Value) {
        match value {
            Value::String(handle) => self.visit_cell(handle.as_cell()),
            Value::BigInt(handle) => self.visit_cell(handle.as_cell()),
            Value::Object(handle) => self.visit_cell(handle.as_cell()),
            Value::Symbol(handle) => self.visit_cell(handle.as_cell()),
            Value::Accessor(handle) => self.visit_cell(handle.as_cell()),
            Value::Empty
            | Value::Undefined
            | Value::Null
            | Value::Boolean(_)
            | Value::Number(_) => {}
        }
    }
}

impl CellVisitor for Vec<CellHandle> {
    fn visit_cell(&mut self, cell: CellHandle) {
        self.push(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ObjectHandle;

    #[test]
    fn test_visit_value_forwards_heap_references() {
        let mut seen: Vec<CellHandle> = Vec::new();
        seen.visit_value(Value::Number(1.0));
        seen.visit_value(Value::Undefined);
        assert!(seen.is_empty());
        seen.visit_value(Value::Object(ObjectHandle::from_index(5)));
        assert_eq!(seen, vec![CellHandle::from_index(5)]);
    }
}
