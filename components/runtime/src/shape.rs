//! Hidden classes ("shapes") for property-layout sharing.
//!
//! A shape assigns a fixed slot offset to every named property of the
//! objects that carry it. Objects built by the same sequence of property
//! additions share a shape: each addition follows (or creates) a cached
//! forward transition from the current shape to a child shape, so the
//! transitions form a tree rooted at the empty shape and property access
//! is an offset load instead of a hash lookup.
//!
//! Three transition types exist: `Put` adds a named property at the next
//! offset, `Configure` changes the attributes of an existing property
//! without moving it, and `Prototype` swaps the `[[Prototype]]` without
//! touching the table. Once an object's layout diverges from anything
//! worth sharing (property deletion), its shape is cloned into a
//! per-object *unique* shape that is mutated in place and never enters
//! any transition map.

use crate::cell::CellVisitor;
use crate::heap::Heap;
use crate::property_key::PropertyKey;
use core_types::{ObjectHandle, PropertyAttributes, ShapeHandle};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;

/// How a shape was derived from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionType {
    /// A root or unique shape; not derived from a parent
    Invalid,
    /// Adds a named property at the next free offset
    Put,
    /// Rewrites the attributes of an existing property
    Configure,
    /// Replaces the prototype
    Prototype,
}

/// Offset and attributes of one named property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMetadata {
    /// Slot index in the object's storage vector
    pub offset: usize,
    /// The property's attributes
    pub attributes: PropertyAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TransitionKey {
    property_name: PropertyKey,
    attributes: PropertyAttributes,
}

type PropertyTable = HashMap<PropertyKey, PropertyMetadata>;

/// A node in the shape transition tree.
#[derive(Debug)]
pub struct Shape {
    unique: bool,
    previous: Option<ShapeHandle>,
    property_name: Option<PropertyKey>,
    attributes: PropertyAttributes,
    prototype: Option<ObjectHandle>,
    transition_type: TransitionType,
    forward_transitions: HashMap<TransitionKey, ShapeHandle>,
    // Lazily materialised by replaying the transition chain.
    property_table: RefCell<Option<PropertyTable>>,
}

impl Shape {
    /// Creates a root shape with no properties and no prototype.
    pub fn new_root() -> Self {
        Shape {
            unique: false,
            previous: None,
            property_name: None,
            attributes: PropertyAttributes::empty(),
            prototype: None,
            transition_type: TransitionType::Invalid,
            forward_transitions: HashMap::new(),
            property_table: RefCell::new(None),
        }
    }

    /// True for per-object shapes that are mutated in place.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// The `[[Prototype]]` of objects at this shape.
    pub fn prototype(&self) -> Option<ObjectHandle> {
        self.prototype
    }

    /// How this shape was derived.
    pub fn transition_type(&self) -> TransitionType {
        self.transition_type
    }

    /// Rewrites the prototype. Only unique shapes may be mutated.
    pub fn set_prototype_on_unique_shape(&mut self, prototype: Option<ObjectHandle>) {
        assert!(self.unique);
        self.prototype = prototype;
    }

    /// Follows (or creates and caches) the Put transition adding
    /// `property_name` with `attributes`. Repeating the same transition
    /// from the same parent returns the same child shape.
    pub fn create_put_transition(
        heap: &mut Heap,
        shape: ShapeHandle,
        property_name: PropertyKey,
        attributes: PropertyAttributes,
    ) -> ShapeHandle {
        let key = TransitionKey {
            property_name: property_name.clone(),
            attributes,
        };
        if let Some(existing) = heap.shape(shape).forward_transitions.get(&key) {
            return *existing;
        }
        let parent = heap.shape(shape);
        assert!(!parent.unique, "unique shapes take no transitions");
        let new_shape = Shape {
            unique: false,
            previous: Some(shape),
            property_name: Some(property_name),
            attributes,
            prototype: parent.prototype,
            transition_type: TransitionType::Put,
            forward_transitions: HashMap::new(),
            property_table: RefCell::new(None),
        };
        let handle = heap.allocate_shape(new_shape);
        heap.shape_mut(shape).forward_transitions.insert(key, handle);
        handle
    }

    /// Follows (or creates and caches) the Configure transition giving
    /// the existing property `property_name` the attributes `attributes`.
    pub fn create_configure_transition(
        heap: &mut Heap,
        shape: ShapeHandle,
        property_name: PropertyKey,
        attributes: PropertyAttributes,
    ) -> ShapeHandle {
        let key = TransitionKey {
            property_name: property_name.clone(),
            attributes,
        };
        if let Some(existing) = heap.shape(shape).forward_transitions.get(&key) {
            return *existing;
        }
        let parent = heap.shape(shape);
        assert!(!parent.unique, "unique shapes take no transitions");
        let new_shape = Shape {
            unique: false,
            previous: Some(shape),
            property_name: Some(property_name),
            attributes,
            prototype: parent.prototype,
            transition_type: TransitionType::Configure,
            forward_transitions: HashMap::new(),
            property_table: RefCell::new(None),
        };
        let handle = heap.allocate_shape(new_shape);
        heap.shape_mut(shape).forward_transitions.insert(key, handle);
        handle
    }

    /// Creates a child shape with a different prototype. Prototype
    /// transitions are not cached; prototype identity is too
    /// fine-grained for the transition map to pay off.
    pub fn create_prototype_transition(
        heap: &mut Heap,
        shape: ShapeHandle,
        new_prototype: Option<ObjectHandle>,
    ) -> ShapeHandle {
        let parent = heap.shape(shape);
        assert!(!parent.unique, "unique shapes take no transitions");
        let new_shape = Shape {
            unique: false,
            previous: Some(shape),
            property_name: None,
            attributes: PropertyAttributes::empty(),
            prototype: new_prototype,
            transition_type: TransitionType::Prototype,
            forward_transitions: HashMap::new(),
            property_table: RefCell::new(None),
        };
        heap.allocate_shape(new_shape)
    }

    /// Clones a shape into a per-object unique shape carrying a fully
    /// materialised property table. The clone has no `previous` linkage;
    /// its table is authoritative.
    pub fn create_unique_clone(heap: &mut Heap, shape: ShapeHandle) -> ShapeHandle {
        let source = heap.shape(shape);
        source.ensure_property_table(heap);
        let table = source
            .property_table
            .borrow()
            .as_ref()
            .expect("property table was just materialised")
            .clone();
        let new_shape = Shape {
            unique: true,
            previous: None,
            property_name: None,
            attributes: PropertyAttributes::empty(),
            prototype: source.prototype,
            transition_type: TransitionType::Invalid,
            forward_transitions: HashMap::new(),
            property_table: RefCell::new(Some(table)),
        };
        heap.allocate_shape(new_shape)
    }

    /// Looks up the metadata of a named property.
    pub fn lookup(&self, heap: &Heap, property_name: &PropertyKey) -> Option<PropertyMetadata> {
        self.ensure_property_table(heap);
        self.property_table
            .borrow()
            .as_ref()
            .and_then(|table| table.get(property_name).copied())
    }

    /// Number of named properties at this shape.
    pub fn property_count(&self, heap: &Heap) -> usize {
        self.ensure_property_table(heap);
        self.property_table
            .borrow()
            .as_ref()
            .map(|table| table.len())
            .unwrap_or(0)
    }

    /// The property table as an offset-ordered vector: position `i`
    /// holds the property stored at offset `i`. This is the enumeration
    /// order of named properties.
    pub fn property_table_ordered(&self, heap: &Heap) -> Vec<(PropertyKey, PropertyMetadata)> {
        self.ensure_property_table(heap);
        let table = self.property_table.borrow();
        let table = table.as_ref().expect("property table was just materialised");
        let mut ordered: Vec<Option<(PropertyKey, PropertyMetadata)>> = vec![None; table.len()];
        for (key, metadata) in table.iter() {
            assert!(
                ordered[metadata.offset].is_none(),
                "two properties share offset {}",
                metadata.offset
            );
            ordered[metadata.offset] = Some((key.clone(), *metadata));
        }
        ordered
            .into_iter()
            .map(|entry| entry.expect("property offsets must be dense"))
            .collect()
    }

    /// Materialises the property table by replaying the transition chain
    /// root-to-leaf. The chain walk performs no allocation, so a
    /// collection cannot run while intermediate shapes are only
    /// reachable from the walk vector.
    fn ensure_property_table(&self, heap: &Heap) {
        if self.property_table.borrow().is_some() {
            return;
        }
        let mut chain: Vec<ShapeHandle> = Vec::new();
        let mut current = self.previous;
        while let Some(handle) = current {
            chain.push(handle);
            current = heap.shape(handle).previous;
        }

        let mut table = PropertyTable::new();
        let mut next_offset = 0;
        for handle in chain.iter().rev() {
            let shape = heap.shape(*handle);
            Self::replay_transition(
                &mut table,
                shape.property_name.as_ref(),
                shape.attributes,
                shape.transition_type,
                &mut next_offset,
            );
        }
        Self::replay_transition(
            &mut table,
            self.property_name.as_ref(),
            self.attributes,
            self.transition_type,
            &mut next_offset,
        );
        *self.property_table.borrow_mut() = Some(table);
    }

    fn replay_transition(
        table: &mut PropertyTable,
        property_name: Option<&PropertyKey>,
        attributes: PropertyAttributes,
        transition_type: TransitionType,
        next_offset: &mut usize,
    ) {
        // Root and prototype transitions carry no name and do not affect
        // the table.
        let Some(property_name) = property_name else {
            return;
        };
        match transition_type {
            TransitionType::Put => {
                table.insert(
                    property_name.clone(),
                    PropertyMetadata {
                        offset: *next_offset,
                        attributes,
                    },
                );
                *next_offset += 1;
            }
            TransitionType::Configure => {
                let entry = table
                    .get_mut(property_name)
                    .expect("configure transition names an existing property");
                entry.attributes = attributes;
            }
            TransitionType::Invalid | TransitionType::Prototype => {}
        }
    }

    fn unique_table_mut(&mut self) -> std::cell::RefMut<'_, PropertyTable> {
        assert!(self.unique);
        std::cell::RefMut::map(self.property_table.borrow_mut(), |table| {
            table.as_mut().expect("unique shapes own their table")
        })
    }

    /// Appends a property to a unique shape at the next free offset.
    pub fn add_property_to_unique_shape(
        &mut self,
        property_name: PropertyKey,
        attributes: PropertyAttributes,
    ) {
        let mut table = self.unique_table_mut();
        assert!(!table.contains_key(&property_name));
        let offset = table.len();
        table.insert(property_name, PropertyMetadata { offset, attributes });
    }

    /// Replaces the attributes of an existing property on a unique
    /// shape. The offset is preserved.
    pub fn reconfigure_property_in_unique_shape(
        &mut self,
        property_name: &PropertyKey,
        attributes: PropertyAttributes,
    ) {
        let mut table = self.unique_table_mut();
        let entry = table
            .get_mut(property_name)
            .expect("reconfigure names an existing property");
        entry.attributes = attributes;
    }

    /// Removes a property from a unique shape and closes the offset gap:
    /// every property at a higher offset moves down by one.
    pub fn remove_property_from_unique_shape(
        &mut self,
        property_name: &PropertyKey,
        removed_offset: usize,
    ) {
        let mut table = self.unique_table_mut();
        table.remove(property_name).expect("remove names an existing property");
        for metadata in table.values_mut() {
            assert_ne!(metadata.offset, removed_offset);
            if metadata.offset > removed_offset {
                metadata.offset -= 1;
            }
        }
    }

    /// A read-only view of the materialised table, for hosts walking all
    /// properties (e.g. tab completion).
    pub fn property_table(&self, heap: &Heap) -> Ref<'_, PropertyTable> {
        self.ensure_property_table(heap);
        Ref::map(self.property_table.borrow(), |table| {
            table.as_ref().expect("property table was just materialised")
        })
    }

    /// Tracing contribution: the parent shape, the prototype, every
    /// cached forward transition and any symbol keys.
    pub fn visit_children(&self, visitor: &mut dyn CellVisitor) {
        if let Some(previous) = self.previous {
            visitor.visit_cell(previous.as_cell());
        }
        if let Some(prototype) = self.prototype {
            visitor.visit_cell(prototype.as_cell());
        }
        if let Some(PropertyKey::Symbol(symbol)) = &self.property_name {
            visitor.visit_cell(symbol.as_cell());
        }
        for (key, child) in self.forward_transitions.iter() {
            if let PropertyKey::Symbol(symbol) = &key.property_name {
                visitor.visit_cell(symbol.as_cell());
            }
            visitor.visit_cell(child.as_cell());
        }
        if let Some(table) = self.property_table.borrow().as_ref() {
            for key in table.keys() {
                if let PropertyKey::Symbol(symbol) = key {
                    visitor.visit_cell(symbol.as_cell());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> PropertyAttributes {
        PropertyAttributes::default()
    }

    #[test]
    fn test_put_transitions_are_memoised() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let a = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let b = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        assert_eq!(a, b);
        let c = Shape::create_put_transition(&mut heap, root, "y".into(), attrs());
        assert_ne!(a, c);
    }

    #[test]
    fn test_offsets_are_dense_and_insertion_ordered() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let with_x = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let with_xy = Shape::create_put_transition(&mut heap, with_x, "y".into(), attrs());
        let shape = heap.shape(with_xy);
        assert_eq!(shape.lookup(&heap, &"x".into()).unwrap().offset, 0);
        assert_eq!(shape.lookup(&heap, &"y".into()).unwrap().offset, 1);
        assert_eq!(shape.property_count(&heap), 2);

        let ordered = shape.property_table_ordered(&heap);
        assert_eq!(ordered[0].0, PropertyKey::String("x".to_string()));
        assert_eq!(ordered[1].0, PropertyKey::String("y".to_string()));
    }

    #[test]
    fn test_configure_transition_keeps_offset() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let with_x = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let with_xy = Shape::create_put_transition(&mut heap, with_x, "y".into(), attrs());
        let reconfigured = Shape::create_configure_transition(
            &mut heap,
            with_xy,
            "x".into(),
            PropertyAttributes::ENUMERABLE,
        );
        let shape = heap.shape(reconfigured);
        let metadata = shape.lookup(&heap, &"x".into()).unwrap();
        assert_eq!(metadata.offset, 0);
        assert_eq!(metadata.attributes, PropertyAttributes::ENUMERABLE);
        // The other property is untouched.
        assert_eq!(shape.lookup(&heap, &"y".into()).unwrap().offset, 1);
    }

    #[test]
    fn test_prototype_transition_is_not_cached() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let proto = ObjectHandle::from_index(999);
        let first = Shape::create_prototype_transition(&mut heap, root, Some(proto));
        let second = Shape::create_prototype_transition(&mut heap, root, Some(proto));
        assert_ne!(first, second);
        assert_eq!(heap.shape(first).prototype(), Some(proto));
    }

    #[test]
    fn test_prototype_transition_preserves_table() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let with_x = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let reprototyped =
            Shape::create_prototype_transition(&mut heap, with_x, Some(ObjectHandle::from_index(7)));
        let shape = heap.shape(reprototyped);
        assert_eq!(shape.lookup(&heap, &"x".into()).unwrap().offset, 0);
    }

    #[test]
    fn test_unique_clone_copies_table() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let with_x = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let unique = Shape::create_unique_clone(&mut heap, with_x);
        assert!(heap.shape(unique).is_unique());
        assert_eq!(
            heap.shape(unique).lookup(&heap, &"x".into()).unwrap().offset,
            0
        );
    }

    #[test]
    fn test_unique_shape_add_and_remove() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let with_x = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let with_xy = Shape::create_put_transition(&mut heap, with_x, "y".into(), attrs());
        let with_xyz = Shape::create_put_transition(&mut heap, with_xy, "z".into(), attrs());
        let unique = Shape::create_unique_clone(&mut heap, with_xyz);

        // Removing "x" (offset 0) shifts the later offsets down.
        heap.shape_mut(unique).remove_property_from_unique_shape(&"x".into(), 0);
        let shape = heap.shape(unique);
        assert_eq!(shape.lookup(&heap, &"y".into()).unwrap().offset, 0);
        assert_eq!(shape.lookup(&heap, &"z".into()).unwrap().offset, 1);
        assert_eq!(shape.lookup(&heap, &"x".into()), None);

        // Appending places the new property at the end.
        heap.shape_mut(unique).add_property_to_unique_shape("w".into(), attrs());
        assert_eq!(
            heap.shape(unique).lookup(&heap, &"w".into()).unwrap().offset,
            2
        );
    }

    #[test]
    fn test_unique_reconfigure_preserves_offset() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        let with_x = Shape::create_put_transition(&mut heap, root, "x".into(), attrs());
        let with_xy = Shape::create_put_transition(&mut heap, with_x, "y".into(), attrs());
        let unique = Shape::create_unique_clone(&mut heap, with_xy);
        heap.shape_mut(unique)
            .reconfigure_property_in_unique_shape(&"x".into(), PropertyAttributes::empty());
        let metadata = heap.shape(unique).lookup(&heap, &"x".into()).unwrap();
        assert_eq!(metadata.offset, 0);
        assert_eq!(metadata.attributes, PropertyAttributes::empty());
    }

    #[test]
    fn test_lookup_miss() {
        let mut heap = Heap::new();
        let root = heap.allocate_shape(Shape::new_root());
        assert_eq!(heap.shape(root).lookup(&heap, &"missing".into()), None);
    }
}
