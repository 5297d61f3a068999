//! The global object and built-in registry.
//!
//! A single global object exists per interpreter. It is an ordinary
//! object of kind `Global` whose payload, [`GlobalData`], holds typed
//! references to every built-in constructor and prototype plus the
//! shared empty-object shape. The global object is in the root set, so
//! everything registered here stays alive for the life of the runtime.

use crate::builtins;
use crate::cell::CellVisitor;
use crate::exception::JsResult;
use crate::heap::Heap;
use crate::interpreter::{Interpreter, NativeFunction};
use crate::object::{self, NativeFunctionData, Object, ObjectKind};
use crate::property_key::PropertyName;
use crate::shape::Shape;
use crate::symbol::JsSymbol;
use core_types::{
    ErrorKind, ObjectHandle, PropertyAttributes, ShapeHandle, SymbolHandle, Value,
};
use std::collections::HashMap;

/// Typed references to the built-ins, stored as the global object's
/// kind payload.
#[derive(Debug)]
pub struct GlobalData {
    /// The shape every fresh `{}` starts from
    pub empty_object_shape: ShapeHandle,
    /// `Object.prototype`
    pub object_prototype: ObjectHandle,
    /// `Object`
    pub object_constructor: ObjectHandle,
    /// `Function.prototype`
    pub function_prototype: ObjectHandle,
    /// `Function`
    pub function_constructor: ObjectHandle,
    /// `Array.prototype`
    pub array_prototype: ObjectHandle,
    /// `Array`
    pub array_constructor: ObjectHandle,
    /// `String.prototype`
    pub string_prototype: ObjectHandle,
    /// `String`
    pub string_constructor: ObjectHandle,
    /// `Number.prototype`
    pub number_prototype: ObjectHandle,
    /// `Number`
    pub number_constructor: ObjectHandle,
    /// `Boolean.prototype`
    pub boolean_prototype: ObjectHandle,
    /// `Boolean`
    pub boolean_constructor: ObjectHandle,
    /// `BigInt.prototype`
    pub bigint_prototype: ObjectHandle,
    /// `BigInt`
    pub bigint_constructor: ObjectHandle,
    /// `Date.prototype`
    pub date_prototype: ObjectHandle,
    /// `Date`
    pub date_constructor: ObjectHandle,
    /// `Error.prototype`
    pub error_prototype: ObjectHandle,
    /// `Error`
    pub error_constructor: ObjectHandle,
    /// `RegExp.prototype`
    pub regexp_prototype: ObjectHandle,
    /// `RegExp`
    pub regexp_constructor: ObjectHandle,
    /// `Proxy.prototype`
    pub proxy_prototype: ObjectHandle,
    /// `Proxy`
    pub proxy_constructor: ObjectHandle,
    /// `Symbol.prototype`
    pub symbol_prototype: ObjectHandle,
    /// `Symbol`
    pub symbol_constructor: ObjectHandle,
    /// (constructor, prototype) per error subclass
    pub error_subclasses: HashMap<ErrorKind, (ObjectHandle, ObjectHandle)>,
    /// The `Symbol.toPrimitive` well-known symbol
    pub well_known_to_primitive: SymbolHandle,
    /// The `Symbol.for` registry
    pub symbol_registry: HashMap<String, SymbolHandle>,
}

impl GlobalData {
    /// The prototype for errors of `kind`.
    pub fn error_prototype_for(&self, kind: ErrorKind) -> ObjectHandle {
        match kind {
            ErrorKind::Error => self.error_prototype,
            subclass => {
                self.error_subclasses
                    .get(&subclass)
                    .expect("every error subclass is registered")
                    .1
            }
        }
    }

    /// The constructor for errors of `kind`.
    pub fn error_constructor_for(&self, kind: ErrorKind) -> ObjectHandle {
        match kind {
            ErrorKind::Error => self.error_constructor,
            subclass => {
                self.error_subclasses
                    .get(&subclass)
                    .expect("every error subclass is registered")
                    .0
            }
        }
    }

    /// Tracing contribution: every registered built-in.
    pub fn visit_children(&self, visitor: &mut dyn CellVisitor) {
        visitor.visit_cell(self.empty_object_shape.as_cell());
        for handle in [
            self.object_prototype,
            self.object_constructor,
            self.function_prototype,
            self.function_constructor,
            self.array_prototype,
            self.array_constructor,
            self.string_prototype,
            self.string_constructor,
            self.number_prototype,
            self.number_constructor,
            self.boolean_prototype,
            self.boolean_constructor,
            self.bigint_prototype,
            self.bigint_constructor,
            self.date_prototype,
            self.date_constructor,
            self.error_prototype,
            self.error_constructor,
            self.regexp_prototype,
            self.regexp_constructor,
            self.proxy_prototype,
            self.proxy_constructor,
            self.symbol_prototype,
            self.symbol_constructor,
        ] {
            visitor.visit_cell(handle.as_cell());
        }
        for (constructor, prototype) in self.error_subclasses.values() {
            visitor.visit_cell(constructor.as_cell());
            visitor.visit_cell(prototype.as_cell());
        }
        visitor.visit_cell(self.well_known_to_primitive.as_cell());
        for symbol in self.symbol_registry.values() {
            visitor.visit_cell(symbol.as_cell());
        }
    }
}

fn allocate_bare_object(
    heap: &mut Heap,
    shape: ShapeHandle,
    prototype: Option<ObjectHandle>,
    kind: ObjectKind,
) -> ObjectHandle {
    let handle = heap.allocate_object(Object::new(shape, kind));
    if heap.shape(shape).prototype() != prototype {
        object::set_prototype(heap, handle, prototype)
            .expect("fresh object cannot be on its own prototype chain");
    }
    handle
}

#[allow(clippy::too_many_arguments)]
fn allocate_constructor(
    heap: &mut Heap,
    shape: ShapeHandle,
    function_prototype: ObjectHandle,
    name: &str,
    length: u32,
    function: NativeFunction,
    construct: Option<NativeFunction>,
) -> ObjectHandle {
    allocate_bare_object(
        heap,
        shape,
        Some(function_prototype),
        ObjectKind::NativeFunction(NativeFunctionData {
            name: name.to_string(),
            length,
            function,
            construct,
        }),
    )
}

/// Builds the global object: the shared shapes, every constructor and
/// prototype, the global functions and values. Called once from
/// `Interpreter::new`.
pub fn initialize(interpreter: &mut Interpreter) -> ObjectHandle {
    // Nothing built here is reachable from roots until the global
    // object is registered, so collections stay off for the duration.
    let defer_guard = interpreter.heap().defer_gc();

    let heap = interpreter.heap_mut();
    let root_shape = heap.allocate_shape(Shape::new_root());
    let object_prototype =
        allocate_bare_object(heap, root_shape, None, ObjectKind::Plain);
    let empty_object_shape =
        Shape::create_prototype_transition(heap, root_shape, Some(object_prototype));
    let function_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);

    let array_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Array);
    let string_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let number_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let boolean_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let bigint_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let date_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let error_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let regexp_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let proxy_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);
    let symbol_prototype =
        allocate_bare_object(heap, empty_object_shape, Some(object_prototype), ObjectKind::Plain);

    let object_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Object",
        1,
        builtins::object::call,
        Some(builtins::object::construct),
    );
    let function_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Function",
        1,
        builtins::function::call,
        Some(builtins::function::construct),
    );
    let array_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Array",
        1,
        builtins::array::call,
        Some(builtins::array::construct),
    );
    let string_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "String",
        1,
        builtins::string::call,
        Some(builtins::string::construct),
    );
    let number_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Number",
        1,
        builtins::number::call,
        Some(builtins::number::construct),
    );
    let boolean_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Boolean",
        1,
        builtins::boolean::call,
        Some(builtins::boolean::construct),
    );
    let bigint_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "BigInt",
        1,
        builtins::bigint::call,
        None,
    );
    let date_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Date",
        7,
        builtins::date::call,
        Some(builtins::date::construct),
    );
    let error_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Error",
        1,
        builtins::error::base_call,
        Some(builtins::error::base_construct),
    );
    let regexp_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "RegExp",
        2,
        builtins::regexp::call,
        Some(builtins::regexp::construct),
    );
    let proxy_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Proxy",
        2,
        builtins::proxy::call,
        Some(builtins::proxy::construct),
    );
    let symbol_constructor = allocate_constructor(
        heap,
        empty_object_shape,
        function_prototype,
        "Symbol",
        0,
        builtins::symbol::call,
        None,
    );

    let mut error_subclasses = HashMap::new();
    for kind in ErrorKind::subclasses() {
        let prototype = allocate_bare_object(
            heap,
            empty_object_shape,
            Some(error_prototype),
            ObjectKind::Plain,
        );
        let (call, construct) = builtins::error::subclass_natives(*kind);
        let constructor = allocate_constructor(
            heap,
            empty_object_shape,
            function_prototype,
            kind.name(),
            1,
            call,
            Some(construct),
        );
        error_subclasses.insert(*kind, (constructor, prototype));
    }

    let well_known_to_primitive =
        heap.allocate_symbol(JsSymbol::new(Some("Symbol.toPrimitive".to_string())));

    let global_data = GlobalData {
        empty_object_shape,
        object_prototype,
        object_constructor,
        function_prototype,
        function_constructor,
        array_prototype,
        array_constructor,
        string_prototype,
        string_constructor,
        number_prototype,
        number_constructor,
        boolean_prototype,
        boolean_constructor,
        bigint_prototype,
        bigint_constructor,
        date_prototype,
        date_constructor,
        error_prototype,
        error_constructor,
        regexp_prototype,
        regexp_constructor,
        proxy_prototype,
        proxy_constructor,
        symbol_prototype,
        symbol_constructor,
        error_subclasses,
        well_known_to_primitive,
        symbol_registry: HashMap::new(),
    };
    let global = allocate_bare_object(
        heap,
        empty_object_shape,
        Some(object_prototype),
        ObjectKind::Global(Box::new(global_data)),
    );
    interpreter.set_global_object(global);

    builtins::install(interpreter);

    let attr = PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
    interpreter.define_native_function(global, "gc", global_gc, 0, attr);
    interpreter.define_native_function(global, "isNaN", global_is_nan, 1, attr);
    interpreter.define_native_function(global, "isFinite", global_is_finite, 1, attr);
    interpreter.define_native_function(global, "parseFloat", global_parse_float, 1, attr);

    let no_attributes = PropertyAttributes::empty();
    define_data(interpreter, global, "NaN", Value::Number(f64::NAN), no_attributes);
    define_data(
        interpreter,
        global,
        "Infinity",
        Value::Number(f64::INFINITY),
        no_attributes,
    );
    define_data(interpreter, global, "undefined", Value::Undefined, no_attributes);
    define_data(interpreter, global, "globalThis", Value::Object(global), attr);

    let console = builtins::console_object::create(interpreter);
    define_data(interpreter, global, "console", Value::Object(console), attr);
    let math = builtins::math::create(interpreter);
    define_data(interpreter, global, "Math", Value::Object(math), attr);

    let data = copy_constructor_table(interpreter);
    for (name, constructor, prototype) in data {
        interpreter.add_constructor(global, &name, constructor, prototype);
    }

    drop(defer_guard);
    global
}

fn define_data(
    interpreter: &mut Interpreter,
    object: ObjectHandle,
    name: &str,
    value: Value,
    attributes: PropertyAttributes,
) {
    interpreter
        .define_property(object, &PropertyName::String(name.to_string()), value, attributes)
        .expect("global definition cannot fail");
}

fn copy_constructor_table(
    interpreter: &Interpreter,
) -> Vec<(String, ObjectHandle, ObjectHandle)> {
    let data = interpreter.global_data();
    let mut table = vec![
        ("Array".to_string(), data.array_constructor, data.array_prototype),
        ("BigInt".to_string(), data.bigint_constructor, data.bigint_prototype),
        ("Boolean".to_string(), data.boolean_constructor, data.boolean_prototype),
        ("Date".to_string(), data.date_constructor, data.date_prototype),
        ("Error".to_string(), data.error_constructor, data.error_prototype),
        ("Function".to_string(), data.function_constructor, data.function_prototype),
        ("Number".to_string(), data.number_constructor, data.number_prototype),
        ("Object".to_string(), data.object_constructor, data.object_prototype),
        ("Proxy".to_string(), data.proxy_constructor, data.proxy_prototype),
        ("RegExp".to_string(), data.regexp_constructor, data.regexp_prototype),
        ("String".to_string(), data.string_constructor, data.string_prototype),
        ("Symbol".to_string(), data.symbol_constructor, data.symbol_prototype),
    ];
    for (kind, (constructor, prototype)) in &data.error_subclasses {
        table.push((kind.name().to_string(), *constructor, *prototype));
    }
    table
}

fn global_gc(interpreter: &mut Interpreter) -> JsResult<Value> {
    interpreter.collect_garbage();
    Ok(Value::Undefined)
}

fn global_is_nan(interpreter: &mut Interpreter) -> JsResult<Value> {
    let number = interpreter.to_number(interpreter.argument(0))?;
    Ok(Value::Boolean(number.is_nan()))
}

fn global_is_finite(interpreter: &mut Interpreter) -> JsResult<Value> {
    let number = interpreter.to_number(interpreter.argument(0))?;
    Ok(Value::Boolean(number.is_finite()))
}

fn global_parse_float(interpreter: &mut Interpreter) -> JsResult<Value> {
    let text = interpreter.to_string(interpreter.argument(0))?;
    Ok(Value::Number(crate::conversions::parse_float_prefix(&text)))
}
