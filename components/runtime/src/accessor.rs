//! Accessor property cells.

use crate::cell::CellVisitor;
use core_types::ObjectHandle;

/// A getter/setter pair stored in an object slot.
///
/// Accessor properties keep one of these cells at the property's shape
/// offset; property reads and writes check the slot's cell kind and
/// dispatch through the stored functions.
#[derive(Debug, Clone, Copy)]
pub struct Accessor {
    getter: Option<ObjectHandle>,
    setter: Option<ObjectHandle>,
}

impl Accessor {
    /// Creates an accessor cell.
    pub fn new(getter: Option<ObjectHandle>, setter: Option<ObjectHandle>) -> Self {
        Accessor { getter, setter }
    }

    /// The getter function object, if present.
    pub fn getter(&self) -> Option<ObjectHandle> {
        self.getter
    }

    /// The setter function object, if present.
    pub fn setter(&self) -> Option<ObjectHandle> {
        self.setter
    }

    /// Tracing contribution: both function objects are owned references.
    pub fn visit_children(&self, visitor: &mut dyn CellVisitor) {
        if let Some(getter) = self.getter {
            visitor.visit_cell(getter.as_cell());
        }
        if let Some(setter) = self.setter {
            visitor.visit_cell(setter.as_cell());
        }
    }
}
