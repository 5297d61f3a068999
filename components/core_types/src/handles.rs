//! Typed handles referencing cells in the runtime heap.
//!
//! The heap stores every garbage-collected cell in a slot arena; a handle
//! is the index of a slot. Handles are plain `Copy` data, so values and
//! objects can reference each other freely without borrowing the heap.
//! Dereferencing a handle always goes through the heap, which checks that
//! the slot is live and of the expected kind.

use std::fmt;

/// An untyped reference to any heap cell.
///
/// This is the currency of the garbage collector: `visit_children`
/// implementations hand every owned reference to the visitor as a
/// `CellHandle`, whatever the cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(u32);

impl CellHandle {
    /// Creates a handle from a raw slot index. Only the heap mints
    /// meaningful handles; anything else is a fatal error on first use.
    pub fn from_index(index: u32) -> Self {
        CellHandle(index)
    }

    /// The slot index this handle refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

macro_rules! typed_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(CellHandle);

        impl $name {
            /// Creates a typed handle from a raw slot index.
            pub fn from_index(index: u32) -> Self {
                $name(CellHandle::from_index(index))
            }

            /// The slot index this handle refers to.
            pub fn index(self) -> usize {
                self.0.index()
            }

            /// Erases the type for the garbage collector.
            pub fn as_cell(self) -> CellHandle {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0.index())
            }
        }

        impl From<$name> for CellHandle {
            fn from(handle: $name) -> CellHandle {
                handle.as_cell()
            }
        }
    };
}

typed_handle!(
    /// Reference to an `Object` cell.
    ObjectHandle
);
typed_handle!(
    /// Reference to a `Shape` cell describing a property layout.
    ShapeHandle
);
typed_handle!(
    /// Reference to an immutable `PrimitiveString` cell.
    StringHandle
);
typed_handle!(
    /// Reference to an arbitrary-precision `JsBigInt` cell.
    BigIntHandle
);
typed_handle!(
    /// Reference to a `JsSymbol` cell.
    SymbolHandle
);
typed_handle!(
    /// Reference to an `Accessor` cell holding a getter/setter pair.
    AccessorHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_round_trip() {
        let handle = ObjectHandle::from_index(7);
        assert_eq!(handle.index(), 7);
        assert_eq!(handle.as_cell().index(), 7);
    }

    #[test]
    fn test_handle_equality() {
        assert_eq!(ShapeHandle::from_index(3), ShapeHandle::from_index(3));
        assert_ne!(ShapeHandle::from_index(3), ShapeHandle::from_index(4));
    }

    #[test]
    fn test_debug_format() {
        let handle = StringHandle::from_index(12);
        assert_eq!(format!("{:?}", handle), "StringHandle(12)");
    }
}
