//! JavaScript objects.
//!
//! An object is a shape reference plus an offset-indexed slot vector for
//! named properties, an [`IndexedProperties`] container for integer
//! indices, and a kind tag carrying per-kind payload (array, function,
//! error, wrapper, ...). Dispatch on behaviour reads the kind tag; there
//! is no inheritance hierarchy.
//!
//! The operations in this module are the layout half of the property
//! protocol: they manipulate shapes and slots but never run user code.
//! Accessor invocation, prototype-chain reads and exception throwing
//! live on the interpreter.

use crate::cell::CellVisitor;
use crate::global_object::GlobalData;
use crate::heap::Heap;
use crate::indexed_properties::IndexedProperties;
use crate::interpreter::NativeFunction;
use crate::property_key::PropertyKey;
use crate::shape::{PropertyMetadata, Shape};
use core_types::{
    BigIntHandle, ErrorKind, ObjectHandle, PropertyAttributes, ShapeHandle, StringHandle,
    SymbolHandle, Value,
};
use parser::ast::Statement;
use std::rc::Rc;

/// A function defined in JavaScript source.
#[derive(Debug, Clone)]
pub struct ScriptFunction {
    /// The function name ("" for anonymous expressions)
    pub name: String,
    /// Parameter names in order
    pub parameters: Vec<String>,
    /// The body, shared with the AST
    pub body: Rc<Vec<Statement>>,
}

/// A function implemented by the host.
#[derive(Debug, Clone)]
pub struct NativeFunctionData {
    /// The function name
    pub name: String,
    /// The declared `length` (arity)
    pub length: u32,
    /// Behaviour when called
    pub function: NativeFunction,
    /// Behaviour when constructed, if this native is a constructor
    pub construct: Option<NativeFunction>,
}

/// The result of `Function.prototype.bind`.
#[derive(Debug, Clone)]
pub struct BoundFunctionData {
    /// The wrapped function
    pub target: ObjectHandle,
    /// The bound `this`
    pub bound_this: Value,
    /// Arguments prepended to every call
    pub bound_arguments: Vec<Value>,
}

/// Per-kind payload and dispatch tag.
#[derive(Debug)]
pub enum ObjectKind {
    /// An ordinary object
    Plain,
    /// The global object, holding the built-in registry
    Global(Box<GlobalData>),
    /// An array; elements live in the indexed-property container
    Array,
    /// A function defined in source
    Function(ScriptFunction),
    /// A host-implemented function
    NativeFunction(NativeFunctionData),
    /// A bound function
    BoundFunction(BoundFunctionData),
    /// An error object
    Error {
        /// Which error constructor made it
        kind: ErrorKind,
        /// The error message
        message: String,
    },
    /// A date, as milliseconds since the epoch
    Date {
        /// Milliseconds since the Unix epoch
        milliseconds: f64,
    },
    /// A regular expression object; source and flags only
    RegExp {
        /// The pattern source
        source: String,
        /// The flags string
        flags: String,
    },
    /// Wrapper produced by `new String(...)`
    StringWrapper(StringHandle),
    /// Wrapper produced by `new Number(...)`
    NumberWrapper(f64),
    /// Wrapper produced by `new Boolean(...)`
    BooleanWrapper(bool),
    /// Wrapper for a bigint primitive
    BigIntWrapper(BigIntHandle),
    /// Wrapper for a symbol primitive
    SymbolWrapper(SymbolHandle),
    /// A proxy forwarding to handler traps
    Proxy {
        /// The proxied object
        target: ObjectHandle,
        /// The trap table
        handler: ObjectHandle,
    },
}

/// A JavaScript object cell.
#[derive(Debug)]
pub struct Object {
    shape: ShapeHandle,
    slots: Vec<Value>,
    indexed_properties: IndexedProperties,
    kind: ObjectKind,
    extensible: bool,
}

impl Object {
    /// Creates an object at the given shape.
    pub fn new(shape: ShapeHandle, kind: ObjectKind) -> Self {
        Object {
            shape,
            slots: Vec::new(),
            indexed_properties: IndexedProperties::new(),
            kind,
            extensible: true,
        }
    }

    /// The current shape.
    pub fn shape(&self) -> ShapeHandle {
        self.shape
    }

    /// Moves the object to a new shape. Slot storage is managed by the
    /// property operations, not here.
    pub fn set_shape(&mut self, shape: ShapeHandle) {
        self.shape = shape;
    }

    /// The kind tag.
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Mutable access to the kind payload.
    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    /// The indexed-property container.
    pub fn indexed_properties(&self) -> &IndexedProperties {
        &self.indexed_properties
    }

    /// Mutable access to the indexed-property container.
    pub fn indexed_properties_mut(&mut self) -> &mut IndexedProperties {
        &mut self.indexed_properties
    }

    /// True if new properties may be added.
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// Forbids adding new properties.
    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    /// Reads the slot at `offset`.
    ///
    /// # Panics
    ///
    /// Panics when `offset` is outside the slot vector; offsets come
    /// from shape lookups and are always in range for a consistent
    /// object.
    pub fn get_direct(&self, offset: usize) -> Value {
        self.slots[offset]
    }

    /// Writes the slot at `offset`, growing storage with `Empty` up to
    /// the offset if needed.
    pub fn put_direct(&mut self, offset: usize, value: Value) {
        if offset >= self.slots.len() {
            self.slots.resize(offset + 1, Value::Empty);
        }
        self.slots[offset] = value;
    }

    /// Removes the slot at `offset`, shifting later slots down. Pairs
    /// with `remove_property_from_unique_shape`.
    pub fn remove_slot(&mut self, offset: usize) {
        self.slots.remove(offset);
    }

    /// Number of named-property slots in use.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// True for script functions, native functions and bound functions.
    pub fn is_function(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::Function(_) | ObjectKind::NativeFunction(_) | ObjectKind::BoundFunction(_)
        )
    }

    /// True for arrays.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array)
    }

    /// True for error objects.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ObjectKind::Error { .. })
    }

    /// The class name reported by `Object.prototype.toString` and the
    /// REPL printer.
    pub fn class_name(&self) -> &'static str {
        match &self.kind {
            ObjectKind::Plain => "Object",
            ObjectKind::Global(_) => "GlobalObject",
            ObjectKind::Array => "Array",
            ObjectKind::Function(_) | ObjectKind::BoundFunction(_) => "Function",
            ObjectKind::NativeFunction(_) => "NativeFunction",
            ObjectKind::Error { kind, .. } => kind.name(),
            ObjectKind::Date { .. } => "Date",
            ObjectKind::RegExp { .. } => "RegExp",
            ObjectKind::StringWrapper(_) => "String",
            ObjectKind::NumberWrapper(_) => "Number",
            ObjectKind::BooleanWrapper(_) => "Boolean",
            ObjectKind::BigIntWrapper(_) => "BigInt",
            ObjectKind::SymbolWrapper(_) => "Symbol",
            ObjectKind::Proxy { .. } => "Proxy",
        }
    }

    /// Tracing contribution: the shape, every slot, every indexed value
    /// and any cells owned by the kind payload.
    pub fn visit_children(&self, visitor: &mut dyn CellVisitor) {
        visitor.visit_cell(self.shape.as_cell());
        for value in &self.slots {
            visitor.visit_value(*value);
        }
        for (_, property) in self.indexed_properties.iter() {
            visitor.visit_value(property.value);
        }
        match &self.kind {
            ObjectKind::Global(data) => data.visit_children(visitor),
            ObjectKind::BoundFunction(bound) => {
                visitor.visit_cell(bound.target.as_cell());
                visitor.visit_value(bound.bound_this);
                for argument in &bound.bound_arguments {
                    visitor.visit_value(*argument);
                }
            }
            ObjectKind::StringWrapper(handle) => visitor.visit_cell(handle.as_cell()),
            ObjectKind::BigIntWrapper(handle) => visitor.visit_cell(handle.as_cell()),
            ObjectKind::SymbolWrapper(handle) => visitor.visit_cell(handle.as_cell()),
            ObjectKind::Proxy { target, handler } => {
                visitor.visit_cell(target.as_cell());
                visitor.visit_cell(handler.as_cell());
            }
            _ => {}
        }
    }
}

/// Whether a write is an ordinary `put` or an exact `defineProperty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    /// Ordinary assignment; respects `writable`, keeps attributes
    Put,
    /// `Object.defineProperty` semantics; may reconfigure attributes
    DefineProperty,
}

/// Why a property write was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutError {
    /// The property exists and is non-writable
    NotWritable,
    /// The property exists and is non-configurable
    NotConfigurable,
    /// The object is non-extensible and the property is new
    NotExtensible,
}

/// Creates or updates an own named property, taking the required shape
/// transition. The caller has already routed integer indices to the
/// indexed-property container and resolved accessor dispatch.
pub fn put_own_property(
    heap: &mut Heap,
    object: ObjectHandle,
    key: PropertyKey,
    value: Value,
    attributes: PropertyAttributes,
    mode: PutMode,
) -> Result<(), PutError> {
    let shape = heap.object(object).shape();
    let existing = heap.shape(shape).lookup(heap, &key);

    let metadata = match existing {
        None => {
            if !heap.object(object).is_extensible() {
                return Err(PutError::NotExtensible);
            }
            let offset = if heap.shape(shape).is_unique() {
                let offset = heap.shape(shape).property_count(heap);
                heap.shape_mut(shape).add_property_to_unique_shape(key, attributes);
                offset
            } else {
                let new_shape = Shape::create_put_transition(heap, shape, key.clone(), attributes);
                heap.object_mut(object).set_shape(new_shape);
                heap.shape(new_shape)
                    .lookup(heap, &key)
                    .expect("freshly added property is in the table")
                    .offset
            };
            PropertyMetadata { offset, attributes }
        }
        Some(metadata) if mode == PutMode::DefineProperty && metadata.attributes != attributes => {
            if !metadata.attributes.is_configurable() {
                return Err(PutError::NotConfigurable);
            }
            if heap.shape(shape).is_unique() {
                heap.shape_mut(shape).reconfigure_property_in_unique_shape(&key, attributes);
            } else {
                let new_shape =
                    Shape::create_configure_transition(heap, shape, key.clone(), attributes);
                heap.object_mut(object).set_shape(new_shape);
            }
            PropertyMetadata {
                offset: metadata.offset,
                attributes,
            }
        }
        Some(metadata) => {
            if mode == PutMode::Put && !metadata.attributes.is_writable() {
                return Err(PutError::NotWritable);
            }
            metadata
        }
    };

    heap.object_mut(object).put_direct(metadata.offset, value);
    Ok(())
}

/// Why a delete failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteError {
    /// The property is non-configurable
    NotConfigurable,
}

/// Deletes an own named property. Converts the shape to a unique clone
/// first, removes the table entry, and compacts the slot vector so every
/// later property moves down one offset. Deleting an absent property
/// succeeds.
pub fn delete_own_property(
    heap: &mut Heap,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Result<(), DeleteError> {
    let shape = heap.object(object).shape();
    let Some(metadata) = heap.shape(shape).lookup(heap, key) else {
        return Ok(());
    };
    if !metadata.attributes.is_configurable() {
        return Err(DeleteError::NotConfigurable);
    }
    let unique_shape = if heap.shape(shape).is_unique() {
        shape
    } else {
        let unique = Shape::create_unique_clone(heap, shape);
        heap.object_mut(object).set_shape(unique);
        unique
    };
    heap.shape_mut(unique_shape).remove_property_from_unique_shape(key, metadata.offset);
    heap.object_mut(object).remove_slot(metadata.offset);
    Ok(())
}

/// The `[[Prototype]]` of an object.
pub fn prototype_of(heap: &Heap, object: ObjectHandle) -> Option<ObjectHandle> {
    heap.shape(heap.object(object).shape()).prototype()
}

/// Rejected prototype assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrototypeError {
    /// The assignment would create a cycle
    Cycle,
}

/// Replaces the `[[Prototype]]`, rejecting cycles. Unique shapes are
/// rewritten in place; shared shapes take a prototype transition.
pub fn set_prototype(
    heap: &mut Heap,
    object: ObjectHandle,
    new_prototype: Option<ObjectHandle>,
) -> Result<(), PrototypeError> {
    let mut ancestor = new_prototype;
    while let Some(current) = ancestor {
        if current == object {
            return Err(PrototypeError::Cycle);
        }
        ancestor = prototype_of(heap, current);
    }

    let shape = heap.object(object).shape();
    if heap.shape(shape).prototype() == new_prototype {
        return Ok(());
    }
    if heap.shape(shape).is_unique() {
        heap.shape_mut(shape).set_prototype_on_unique_shape(new_prototype);
    } else {
        let new_shape = Shape::create_prototype_transition(heap, shape, new_prototype);
        heap.object_mut(object).set_shape(new_shape);
    }
    Ok(())
}

/// The value and metadata of an own named property, if present.
pub fn get_own_property(
    heap: &Heap,
    object: ObjectHandle,
    key: &PropertyKey,
) -> Option<(Value, PropertyMetadata)> {
    let shape = heap.object(object).shape();
    let metadata = heap.shape(shape).lookup(heap, key)?;
    Some((heap.object(object).get_direct(metadata.offset), metadata))
}

/// Own property keys in enumeration order: indexed properties ascending,
/// then named string properties in shape offset order. Symbol keys are
/// excluded; `enumerable_only` additionally filters by the enumerable
/// attribute.
pub fn own_property_keys(heap: &Heap, object: ObjectHandle, enumerable_only: bool) -> Vec<String> {
    let mut keys = Vec::new();
    let object_ref = heap.object(object);
    for (index, property) in object_ref.indexed_properties().iter() {
        if enumerable_only && !property.attributes.is_enumerable() {
            continue;
        }
        keys.push(index.to_string());
    }
    let shape = heap.shape(object_ref.shape());
    for (key, metadata) in shape.property_table_ordered(heap) {
        if enumerable_only && !metadata.attributes.is_enumerable() {
            continue;
        }
        if let PropertyKey::String(name) = key {
            keys.push(name);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_object(heap: &mut Heap) -> ObjectHandle {
        let shape = heap.allocate_shape(Shape::new_root());
        heap.allocate_object(Object::new(shape, ObjectKind::Plain))
    }

    fn attrs() -> PropertyAttributes {
        PropertyAttributes::default()
    }

    #[test]
    fn test_put_and_get_own() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        put_own_property(&mut heap, object, "x".into(), Value::Number(1.0), attrs(), PutMode::Put)
            .unwrap();
        let (value, metadata) = get_own_property(&heap, object, &"x".into()).unwrap();
        assert_eq!(value, Value::Number(1.0));
        assert_eq!(metadata.offset, 0);
    }

    #[test]
    fn test_shape_sharing_between_objects() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let a = heap.allocate_object(Object::new(root, ObjectKind::Plain));
        let b = heap.allocate_object(Object::new(root, ObjectKind::Plain));
        for object in [a, b] {
            put_own_property(&mut heap, object, "x".into(), Value::Number(1.0), attrs(), PutMode::Put)
                .unwrap();
            put_own_property(&mut heap, object, "y".into(), Value::Number(2.0), attrs(), PutMode::Put)
                .unwrap();
        }
        assert_eq!(heap.object(a).shape(), heap.object(b).shape());
        assert!(!heap.shape(heap.object(a).shape()).is_unique());
    }

    #[test]
    fn test_delete_compacts_slots() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        for (name, number) in [("x", 1.0), ("y", 2.0), ("z", 3.0)] {
            put_own_property(
                &mut heap,
                object,
                name.into(),
                Value::Number(number),
                attrs(),
                PutMode::Put,
            )
            .unwrap();
        }
        delete_own_property(&mut heap, object, &"x".into()).unwrap();

        assert!(heap.shape(heap.object(object).shape()).is_unique());
        let (y_value, y_meta) = get_own_property(&heap, object, &"y".into()).unwrap();
        let (z_value, z_meta) = get_own_property(&heap, object, &"z".into()).unwrap();
        assert_eq!((y_meta.offset, y_value), (0, Value::Number(2.0)));
        assert_eq!((z_meta.offset, z_value), (1, Value::Number(3.0)));
        assert_eq!(heap.object(object).slot_count(), 2);
        assert_eq!(get_own_property(&heap, object, &"x".into()), None);
    }

    #[test]
    fn test_add_after_delete_stays_unique() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        for name in ["x", "y"] {
            put_own_property(&mut heap, object, name.into(), Value::Null, attrs(), PutMode::Put)
                .unwrap();
        }
        delete_own_property(&mut heap, object, &"x".into()).unwrap();
        put_own_property(&mut heap, object, "z".into(), Value::Null, attrs(), PutMode::Put)
            .unwrap();
        assert!(heap.shape(heap.object(object).shape()).is_unique());
        assert_eq!(own_property_keys(&heap, object, true), vec!["y", "z"]);
    }

    #[test]
    fn test_non_writable_rejects_put() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        put_own_property(
            &mut heap,
            object,
            "a".into(),
            Value::Number(1.0),
            PropertyAttributes::ENUMERABLE | PropertyAttributes::CONFIGURABLE,
            PutMode::DefineProperty,
        )
        .unwrap();
        let result = put_own_property(
            &mut heap,
            object,
            "a".into(),
            Value::Number(9.0),
            attrs(),
            PutMode::Put,
        );
        assert_eq!(result, Err(PutError::NotWritable));
        let (value, _) = get_own_property(&heap, object, &"a".into()).unwrap();
        assert_eq!(value, Value::Number(1.0));
    }

    #[test]
    fn test_non_configurable_rejects_delete() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        put_own_property(
            &mut heap,
            object,
            "a".into(),
            Value::Null,
            PropertyAttributes::WRITABLE | PropertyAttributes::ENUMERABLE,
            PutMode::DefineProperty,
        )
        .unwrap();
        assert_eq!(
            delete_own_property(&mut heap, object, &"a".into()),
            Err(DeleteError::NotConfigurable)
        );
    }

    #[test]
    fn test_define_reconfigures_attributes() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        put_own_property(&mut heap, object, "a".into(), Value::Number(1.0), attrs(), PutMode::Put)
            .unwrap();
        put_own_property(
            &mut heap,
            object,
            "a".into(),
            Value::Number(1.0),
            PropertyAttributes::ENUMERABLE | PropertyAttributes::CONFIGURABLE,
            PutMode::DefineProperty,
        )
        .unwrap();
        let (_, metadata) = get_own_property(&heap, object, &"a".into()).unwrap();
        assert!(!metadata.attributes.is_writable());
        assert_eq!(metadata.offset, 0);
    }

    #[test]
    fn test_prototype_cycle_rejected() {
        let mut heap = Heap::new();
        let a = empty_object(&mut heap);
        let b = empty_object(&mut heap);
        set_prototype(&mut heap, b, Some(a)).unwrap();
        assert_eq!(set_prototype(&mut heap, a, Some(b)), Err(PrototypeError::Cycle));
        assert_eq!(set_prototype(&mut heap, a, Some(a)), Err(PrototypeError::Cycle));
    }

    #[test]
    fn test_enumeration_order_indexed_before_named() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        put_own_property(&mut heap, object, "name".into(), Value::Null, attrs(), PutMode::Put)
            .unwrap();
        heap.object_mut(object)
            .indexed_properties_mut()
            .put(2, Value::Null, attrs());
        heap.object_mut(object)
            .indexed_properties_mut()
            .put(0, Value::Null, attrs());
        assert_eq!(own_property_keys(&heap, object, true), vec!["0", "2", "name"]);
    }

    #[test]
    fn test_non_extensible_rejects_new_property() {
        let mut heap = Heap::new();
        let object = empty_object(&mut heap);
        heap.object_mut(object).prevent_extensions();
        let result =
            put_own_property(&mut heap, object, "x".into(), Value::Null, attrs(), PutMode::Put);
        assert_eq!(result, Err(PutError::NotExtensible));
    }
}
