//! The garbage-collected cell arena.
//!
//! The heap owns every cell in a slot arena; handles are slot indices.
//! Collection is stop-the-world mark/sweep: the caller (normally the
//! interpreter, which knows its globals, call frames and exception slot)
//! provides the root set, the heap marks everything reachable through
//! [`Cell::visit_children`] and sweeps the rest.
//!
//! The heap never discovers roots by itself - there is no stack
//! scanning. A missed root is a use-after-free class soundness bug, which
//! is why transient multi-cell constructions either pin their cells or
//! hold a [`DeferGcGuard`].

use crate::cell::Cell;
use crate::{Accessor, JsBigInt, JsSymbol, Object, PrimitiveString, Shape};
use core_types::{
    AccessorHandle, BigIntHandle, CellHandle, ObjectHandle, ShapeHandle, StringHandle,
    SymbolHandle,
};
use std::cell::Cell as StdCell;
use std::rc::Rc;

/// Cells allocated since the last collection before the next allocation
/// considers collecting.
const ALLOCATIONS_BEFORE_GC: usize = 10_000;

/// Counters describing collector activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Completed mark/sweep cycles
    pub collections: usize,
    /// Total cells reclaimed across all cycles
    pub cells_swept: usize,
}

/// Keeps collections disabled while alive. Guards nest.
pub struct DeferGcGuard {
    deferrals: Rc<StdCell<usize>>,
}

impl Drop for DeferGcGuard {
    fn drop(&mut self) {
        let count = self.deferrals.get();
        assert!(count > 0, "unbalanced GC deferral");
        self.deferrals.set(count - 1);
    }
}

/// The cell arena and mark/sweep collector.
pub struct Heap {
    slots: Vec<Option<Cell>>,
    marks: Vec<bool>,
    free_slots: Vec<usize>,
    allocations_since_gc: usize,
    should_collect_on_every_allocation: bool,
    gc_deferrals: Rc<StdCell<usize>>,
    pinned_cells: Vec<CellHandle>,
    stats: GcStats,
}

impl Heap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Heap {
            slots: Vec::new(),
            marks: Vec::new(),
            free_slots: Vec::new(),
            allocations_since_gc: 0,
            should_collect_on_every_allocation: false,
            gc_deferrals: Rc::new(StdCell::new(0)),
            pinned_cells: Vec::new(),
            stats: GcStats::default(),
        }
    }

    /// Places a cell into the arena and returns its handle.
    pub fn allocate_cell(&mut self, cell: Cell) -> CellHandle {
        self.allocations_since_gc += 1;
        if let Some(index) = self.free_slots.pop() {
            debug_assert!(self.slots[index].is_none());
            self.slots[index] = Some(cell);
            self.marks[index] = false;
            CellHandle::from_index(index as u32)
        } else {
            self.slots.push(Some(cell));
            self.marks.push(false);
            CellHandle::from_index((self.slots.len() - 1) as u32)
        }
    }

    /// Allocates an object cell.
    pub fn allocate_object(&mut self, object: Object) -> ObjectHandle {
        ObjectHandle::from_index(self.allocate_cell(Cell::Object(object)).index() as u32)
    }

    /// Allocates a shape cell.
    pub fn allocate_shape(&mut self, shape: Shape) -> ShapeHandle {
        ShapeHandle::from_index(self.allocate_cell(Cell::Shape(shape)).index() as u32)
    }

    /// Allocates a string cell.
    pub fn allocate_string(&mut self, string: PrimitiveString) -> StringHandle {
        StringHandle::from_index(self.allocate_cell(Cell::String(string)).index() as u32)
    }

    /// Allocates a bigint cell.
    pub fn allocate_bigint(&mut self, bigint: JsBigInt) -> BigIntHandle {
        BigIntHandle::from_index(self.allocate_cell(Cell::BigInt(bigint)).index() as u32)
    }

    /// Allocates a symbol cell.
    pub fn allocate_symbol(&mut self, symbol: JsSymbol) -> SymbolHandle {
        SymbolHandle::from_index(self.allocate_cell(Cell::Symbol(symbol)).index() as u32)
    }

    /// Allocates an accessor cell.
    pub fn allocate_accessor(&mut self, accessor: Accessor) -> AccessorHandle {
        AccessorHandle::from_index(self.allocate_cell(Cell::Accessor(accessor)).index() as u32)
    }

    /// True if the handle refers to a live cell.
    pub fn is_live(&self, cell: CellHandle) -> bool {
        self.slots
            .get(cell.index())
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Dereferences an untyped handle.
    ///
    /// # Panics
    ///
    /// Panics on a dead slot; dereferencing swept cells is an engine
    /// invariant violation, never a recoverable condition.
    pub fn cell(&self, handle: CellHandle) -> &Cell {
        self.slots[handle.index()]
            .as_ref()
            .expect("dereference of dead heap cell")
    }

    fn cell_mut(&mut self, handle: CellHandle) -> &mut Cell {
        self.slots[handle.index()]
            .as_mut()
            .expect("dereference of dead heap cell")
    }

    /// Dereferences an object handle.
    pub fn object(&self, handle: ObjectHandle) -> &Object {
        match self.cell(handle.as_cell()) {
            Cell::Object(object) => object,
            other => panic!("expected Object cell, found {}", other.kind_name()),
        }
    }

    /// Mutably dereferences an object handle.
    pub fn object_mut(&mut self, handle: ObjectHandle) -> &mut Object {
        match self.cell_mut(handle.as_cell()) {
            Cell::Object(object) => object,
            other => panic!("expected Object cell, found {}", other.kind_name()),
        }
    }

    /// Dereferences a shape handle.
    pub fn shape(&self, handle: ShapeHandle) -> &Shape {
        match self.cell(handle.as_cell()) {
            Cell::Shape(shape) => shape,
            other => panic!("expected Shape cell, found {}", other.kind_name()),
        }
    }

    /// Mutably dereferences a shape handle.
    pub fn shape_mut(&mut self, handle: ShapeHandle) -> &mut Shape {
        match self.cell_mut(handle.as_cell()) {
            Cell::Shape(shape) => shape,
            other => panic!("expected Shape cell, found {}", other.kind_name()),
        }
    }

    /// Dereferences a string handle.
    pub fn string(&self, handle: StringHandle) -> &PrimitiveString {
        match self.cell(handle.as_cell()) {
            Cell::String(string) => string,
            other => panic!("expected String cell, found {}", other.kind_name()),
        }
    }

    /// Dereferences a bigint handle.
    pub fn bigint(&self, handle: BigIntHandle) -> &JsBigInt {
        match self.cell(handle.as_cell()) {
            Cell::BigInt(bigint) => bigint,
            other => panic!("expected BigInt cell, found {}", other.kind_name()),
        }
    }

    /// Dereferences a symbol handle.
    pub fn symbol(&self, handle: SymbolHandle) -> &JsSymbol {
        match self.cell(handle.as_cell()) {
            Cell::Symbol(symbol) => symbol,
            other => panic!("expected Symbol cell, found {}", other.kind_name()),
        }
    }

    /// Dereferences an accessor handle.
    pub fn accessor(&self, handle: AccessorHandle) -> &Accessor {
        match self.cell(handle.as_cell()) {
            Cell::Accessor(accessor) => accessor,
            other => panic!("expected Accessor cell, found {}", other.kind_name()),
        }
    }

    /// Requests collection before every allocation; used by `--gc-on-
    /// every-allocation` and the GC stress tests.
    pub fn set_should_collect_on_every_allocation(&mut self, enabled: bool) {
        self.should_collect_on_every_allocation = enabled;
    }

    /// True if the next allocation point should run a collection first.
    pub fn wants_collection(&self) -> bool {
        if self.gc_deferrals.get() > 0 {
            return false;
        }
        self.should_collect_on_every_allocation
            || self.allocations_since_gc >= ALLOCATIONS_BEFORE_GC
    }

    /// Disables collection for the lifetime of the returned guard.
    pub fn defer_gc(&self) -> DeferGcGuard {
        self.gc_deferrals.set(self.gc_deferrals.get() + 1);
        DeferGcGuard {
            deferrals: Rc::clone(&self.gc_deferrals),
        }
    }

    /// True while at least one [`DeferGcGuard`] is alive.
    pub fn gc_deferred(&self) -> bool {
        self.gc_deferrals.get() > 0
    }

    /// Adds a cell to the host pin list; pinned cells are roots until
    /// unpinned.
    pub fn pin(&mut self, cell: CellHandle) {
        self.pinned_cells.push(cell);
    }

    /// Removes one pin of the given cell.
    pub fn unpin(&mut self, cell: CellHandle) {
        if let Some(position) = self.pinned_cells.iter().rposition(|pinned| *pinned == cell) {
            self.pinned_cells.remove(position);
        }
    }

    /// Runs a full mark/sweep cycle from the given roots plus the pin
    /// list. Does nothing while collection is deferred.
    pub fn collect_garbage(&mut self, roots: &[CellHandle]) {
        if self.gc_deferred() {
            return;
        }
        self.marks.resize(self.slots.len(), false);

        // Mark phase: worklist-driven traversal, so deep object graphs
        // cannot overflow the native stack.
        let mut worklist: Vec<CellHandle> = Vec::new();
        worklist.extend_from_slice(roots);
        worklist.extend_from_slice(&self.pinned_cells);
        while let Some(handle) = worklist.pop() {
            let index = handle.index();
            if self.marks[index] {
                continue;
            }
            let cell = self.slots[index]
                .as_ref()
                .expect("root or child reference to dead cell");
            self.marks[index] = true;
            cell.visit_children(&mut worklist);
        }

        // Sweep phase: unmarked cells die, marks return to white.
        let mut swept = 0;
        for index in 0..self.slots.len() {
            if self.slots[index].is_some() && !self.marks[index] {
                self.slots[index] = None;
                self.free_slots.push(index);
                swept += 1;
            }
            self.marks[index] = false;
        }

        self.allocations_since_gc = 0;
        self.stats.collections += 1;
        self.stats.cells_swept += swept;
    }

    /// Number of live cells.
    pub fn live_cell_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Collector counters.
    pub fn stats(&self) -> GcStats {
        self.stats
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_access() {
        let mut heap = Heap::new();
        let string = heap.allocate_string(PrimitiveString::new("hi"));
        assert_eq!(heap.string(string).text(), "hi");
        assert_eq!(heap.live_cell_count(), 1);
    }

    #[test]
    fn test_collect_unreachable() {
        let mut heap = Heap::new();
        let kept = heap.allocate_string(PrimitiveString::new("kept"));
        let dropped = heap.allocate_string(PrimitiveString::new("dropped"));
        heap.collect_garbage(&[kept.as_cell()]);
        assert!(heap.is_live(kept.as_cell()));
        assert!(!heap.is_live(dropped.as_cell()));
        assert_eq!(heap.stats().cells_swept, 1);
    }

    #[test]
    fn test_collect_twice_is_idempotent() {
        let mut heap = Heap::new();
        let kept = heap.allocate_string(PrimitiveString::new("kept"));
        heap.collect_garbage(&[kept.as_cell()]);
        let live_after_first = heap.live_cell_count();
        heap.collect_garbage(&[kept.as_cell()]);
        assert_eq!(heap.live_cell_count(), live_after_first);
        assert_eq!(heap.stats().collections, 2);
        assert_eq!(heap.stats().cells_swept, 0);
    }

    #[test]
    fn test_slot_reuse() {
        let mut heap = Heap::new();
        let first = heap.allocate_string(PrimitiveString::new("a"));
        let first_index = first.index();
        heap.collect_garbage(&[]);
        let second = heap.allocate_string(PrimitiveString::new("b"));
        assert_eq!(second.index(), first_index);
    }

    #[test]
    fn test_pinned_cells_survive() {
        let mut heap = Heap::new();
        let pinned = heap.allocate_string(PrimitiveString::new("pinned"));
        heap.pin(pinned.as_cell());
        heap.collect_garbage(&[]);
        assert!(heap.is_live(pinned.as_cell()));
        heap.unpin(pinned.as_cell());
        heap.collect_garbage(&[]);
        assert!(!heap.is_live(pinned.as_cell()));
    }

    #[test]
    fn test_defer_gc_blocks_collection() {
        let mut heap = Heap::new();
        let garbage = heap.allocate_string(PrimitiveString::new("garbage"));
        {
            let _guard = heap.defer_gc();
            assert!(heap.gc_deferred());
            heap.collect_garbage(&[]);
            assert!(heap.is_live(garbage.as_cell()));
        }
        assert!(!heap.gc_deferred());
        heap.collect_garbage(&[]);
        assert!(!heap.is_live(garbage.as_cell()));
    }

    #[test]
    fn test_nested_defer_guards() {
        let heap = Heap::new();
        let outer = heap.defer_gc();
        {
            let _inner = heap.defer_gc();
            assert!(heap.gc_deferred());
        }
        assert!(heap.gc_deferred());
        drop(outer);
        assert!(!heap.gc_deferred());
    }

    #[test]
    fn test_wants_collection_on_every_allocation() {
        let mut heap = Heap::new();
        assert!(!heap.wants_collection());
        heap.set_should_collect_on_every_allocation(true);
        heap.allocate_string(PrimitiveString::new("x"));
        assert!(heap.wants_collection());
    }

    #[test]
    #[should_panic(expected = "dead heap cell")]
    fn test_dead_cell_dereference_panics() {
        let mut heap = Heap::new();
        let string = heap.allocate_string(PrimitiveString::new("gone"));
        heap.collect_garbage(&[]);
        heap.string(string);
    }
}
