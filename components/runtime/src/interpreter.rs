//! The interpreter façade.
//!
//! An [`Interpreter`] owns the heap, the global object, the call stack,
//! the scope stack and the exception slot; it is the single entry point
//! hosts use to run programs, call functions and reach the property
//! protocol. There are no process-wide singletons: the REPL and every
//! embedder construct their own instance.
//!
//! Root discovery for the collector is explicit. Everything the
//! interpreter can still reach - the global object, the mirrored
//! exception, each call frame's `this` and arguments, every scope
//! variable and the temporary root stack used while building values -
//! is handed to the heap on collection. Nothing scans the native stack.

use crate::builtins;
use crate::cell::CellVisitor;
use crate::console::{Console, ConsoleClient, StdoutConsoleClient};
use crate::exception::{JsException, JsResult};
use crate::global_object;
use crate::heap::Heap;
use crate::object::{
    self, NativeFunctionData, Object, ObjectKind, PutError, PutMode, ScriptFunction,
};
use crate::property_key::{PropertyKey, PropertyName};
use crate::string::PrimitiveString;
use crate::{Accessor, JsBigInt, JsSymbol};
use core_types::{
    CellHandle, ErrorKind, ObjectHandle, PropertyAttributes, StringHandle, Value,
};
use num_bigint::BigInt;
use parser::ast::{DeclarationKind, Program};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signature of host-implemented functions: read arguments through the
/// interpreter, return a value or a propagating exception.
pub type NativeFunction = fn(&mut Interpreter) -> JsResult<Value>;

/// Guard against runaway recursion in the AST walker.
const MAX_CALL_STACK_DEPTH: usize = 256;

/// One entry of the call stack.
#[derive(Debug)]
pub struct CallFrame {
    /// The name of the called function, for traces
    pub function_name: String,
    /// The `this` value of the call
    pub this_value: Value,
    /// The call arguments
    pub arguments: Vec<Value>,
}

/// The mirrored state of a propagating exception.
#[derive(Debug)]
pub struct Exception {
    /// The thrown value
    pub value: Value,
    /// Function names on the call stack when the throw happened,
    /// innermost first
    pub trace: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Function,
    Block,
}

#[derive(Debug)]
struct Variable {
    value: Value,
    declaration_kind: DeclarationKind,
}

#[derive(Debug)]
struct ScopeFrame {
    kind: ScopeKind,
    variables: HashMap<String, Variable>,
}

enum Callable {
    Native(NativeFunctionData),
    Script(ScriptFunction),
    Bound(crate::object::BoundFunctionData),
}

/// The runtime façade: heap, global object, call stack, exception slot.
pub struct Interpreter {
    heap: Heap,
    global_object: Option<ObjectHandle>,
    call_stack: Vec<CallFrame>,
    scope_stack: Vec<ScopeFrame>,
    exception: Option<Exception>,
    // Transient roots held while multi-step constructions allocate.
    temporaries: Vec<Value>,
    strict_mode: bool,
    last_value: Value,
    pending_interrupt: Arc<AtomicBool>,
    console: Console,
    console_client: Rc<dyn ConsoleClient>,
}

impl Interpreter {
    /// Creates an interpreter with an initialized global object.
    pub fn new() -> Self {
        let mut interpreter = Interpreter {
            heap: Heap::new(),
            global_object: None,
            call_stack: Vec::new(),
            scope_stack: Vec::new(),
            exception: None,
            temporaries: Vec::new(),
            strict_mode: false,
            last_value: Value::Undefined,
            pending_interrupt: Arc::new(AtomicBool::new(false)),
            console: Console::new(),
            console_client: Rc::new(StdoutConsoleClient),
        };
        let global = global_object::initialize(&mut interpreter);
        interpreter.global_object = Some(global);
        interpreter
    }

    // -- Accessors ---------------------------------------------------------

    /// The heap.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The heap, mutably.
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// The global object.
    pub fn global_object(&self) -> ObjectHandle {
        self.global_object.expect("interpreter is initialized")
    }

    pub(crate) fn set_global_object(&mut self, global: ObjectHandle) {
        self.global_object = Some(global);
    }

    /// The built-in registry held by the global object.
    pub fn global_data(&self) -> &global_object::GlobalData {
        match self.heap.object(self.global_object()).kind() {
            ObjectKind::Global(data) => data,
            _ => panic!("global object cell is not Global-kinded"),
        }
    }

    /// Mutable access to the built-in registry.
    pub fn global_data_mut(&mut self) -> &mut global_object::GlobalData {
        let global = self.global_object();
        match self.heap.object_mut(global).kind_mut() {
            ObjectKind::Global(data) => data,
            _ => panic!("global object cell is not Global-kinded"),
        }
    }

    /// Console counter state.
    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// The installed console client.
    pub fn console_client(&self) -> Rc<dyn ConsoleClient> {
        Rc::clone(&self.console_client)
    }

    /// Replaces the console client.
    pub fn set_console_client(&mut self, client: Rc<dyn ConsoleClient>) {
        self.console_client = client;
    }

    /// True while executing a `"use strict"` program.
    pub fn in_strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// The value of the last evaluated statement, for `--print-last-result`.
    pub fn last_value(&self) -> Value {
        self.last_value
    }

    /// Shared flag a signal handler sets to interrupt execution at the
    /// next statement boundary.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.pending_interrupt)
    }

    pub(crate) fn take_pending_interrupt(&mut self) -> bool {
        self.pending_interrupt.swap(false, Ordering::SeqCst)
    }

    // -- Allocation --------------------------------------------------------

    /// Collects first when the heap asks for it, then allocates. Every
    /// cell the argument references must be reachable from the roots.
    pub fn allocate_object(&mut self, object: Object) -> ObjectHandle {
        self.maybe_collect();
        self.heap.allocate_object(object)
    }

    /// See [`Interpreter::allocate_object`].
    pub fn allocate_string_cell(&mut self, string: PrimitiveString) -> StringHandle {
        self.maybe_collect();
        self.heap.allocate_string(string)
    }

    /// Allocates a string cell and wraps it in a value.
    pub fn js_string(&mut self, text: impl Into<String>) -> Value {
        Value::String(self.allocate_string_cell(PrimitiveString::new(text)))
    }

    /// Allocates a bigint cell and wraps it in a value.
    pub fn js_bigint(&mut self, value: BigInt) -> Value {
        self.maybe_collect();
        Value::BigInt(self.heap.allocate_bigint(JsBigInt::new(value)))
    }

    /// Allocates a symbol cell and wraps it in a value.
    pub fn js_symbol(&mut self, description: Option<String>) -> Value {
        self.maybe_collect();
        Value::Symbol(self.heap.allocate_symbol(JsSymbol::new(description)))
    }

    fn maybe_collect(&mut self) {
        if self.heap.wants_collection() {
            self.collect_garbage();
        }
    }

    /// Runs a stop-the-world mark/sweep collection over everything the
    /// interpreter can reach.
    pub fn collect_garbage(&mut self) {
        let roots = self.gather_roots();
        self.heap.collect_garbage(&roots);
    }

    fn gather_roots(&self) -> Vec<CellHandle> {
        let mut roots: Vec<CellHandle> = Vec::new();
        if let Some(global) = self.global_object {
            roots.visit_cell(global.as_cell());
        }
        if let Some(exception) = &self.exception {
            roots.visit_value(exception.value);
        }
        for frame in &self.call_stack {
            roots.visit_value(frame.this_value);
            for argument in &frame.arguments {
                roots.visit_value(*argument);
            }
        }
        for scope in &self.scope_stack {
            for variable in scope.variables.values() {
                roots.visit_value(variable.value);
            }
        }
        for value in &self.temporaries {
            roots.visit_value(*value);
        }
        roots
    }

    // -- Temporary roots ---------------------------------------------------

    /// Current depth of the temporary root stack; pair with
    /// [`Interpreter::truncate_temporaries`].
    pub fn temporaries_mark(&self) -> usize {
        self.temporaries.len()
    }

    /// Roots a value until the matching truncate.
    pub fn push_temporary(&mut self, value: Value) {
        self.temporaries.push(value);
    }

    /// Drops temporary roots back to `mark`.
    pub fn truncate_temporaries(&mut self, mark: usize) {
        self.temporaries.truncate(mark);
    }

    // -- Exceptions --------------------------------------------------------

    /// Creates an error object of the requested kind, stores it in the
    /// exception slot and returns the propagating exception.
    pub fn throw_error(&mut self, kind: ErrorKind, message: impl Into<String>) -> JsException {
        let message = message.into();
        let error_object = builtins::error::create(self, kind, &message);
        self.throw_value(Value::Object(error_object))
    }

    /// Stores an arbitrary thrown value in the exception slot and
    /// returns the propagating exception.
    pub fn throw_value(&mut self, value: Value) -> JsException {
        let trace = self.call_stack_function_names();
        self.exception = Some(Exception { value, trace });
        JsException::new(value)
    }

    /// The pending exception, if any.
    pub fn exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    /// True while an exception is pending.
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// Empties the exception slot.
    pub fn clear_exception(&mut self) {
        self.exception = None;
    }

    // -- Call stack --------------------------------------------------------

    pub(crate) fn push_call_frame(&mut self, frame: CallFrame) -> JsResult<()> {
        if self.call_stack.len() >= MAX_CALL_STACK_DEPTH {
            return Err(self.throw_error(
                ErrorKind::RangeError,
                "Maximum call stack size exceeded",
            ));
        }
        self.call_stack.push(frame);
        Ok(())
    }

    pub(crate) fn pop_call_frame(&mut self) {
        self.call_stack.pop().expect("call stack underflow");
    }

    /// The argument at `index` of the current call, `undefined` when
    /// absent.
    pub fn argument(&self, index: usize) -> Value {
        self.call_stack
            .last()
            .and_then(|frame| frame.arguments.get(index))
            .copied()
            .unwrap_or(Value::Undefined)
    }

    /// Number of arguments of the current call.
    pub fn argument_count(&self) -> usize {
        self.call_stack
            .last()
            .map(|frame| frame.arguments.len())
            .unwrap_or(0)
    }

    /// The arguments of the current call.
    pub fn arguments(&self) -> &[Value] {
        self.call_stack
            .last()
            .map(|frame| frame.arguments.as_slice())
            .unwrap_or(&[])
    }

    /// The `this` of the current call; the global object outside calls.
    pub fn this_value(&self) -> Value {
        match self.call_stack.last() {
            Some(frame) if !frame.this_value.is_empty() => frame.this_value,
            _ => Value::Object(self.global_object()),
        }
    }

    /// Function names on the call stack, innermost first.
    pub fn call_stack_function_names(&self) -> Vec<String> {
        self.call_stack
            .iter()
            .rev()
            .map(|frame| frame.function_name.clone())
            .collect()
    }

    /// Joins the current call's arguments with spaces, without running
    /// user conversions; the console clients build their lines with it.
    pub fn join_arguments(&self) -> String {
        self.arguments()
            .iter()
            .map(|value| self.to_string_without_side_effects(*value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The `console.count` label: first argument, or "default".
    pub fn console_count_label(&self) -> String {
        if self.argument_count() > 0 {
            self.to_string_without_side_effects(self.argument(0))
        } else {
            "default".to_string()
        }
    }

    // -- Scopes and variables ----------------------------------------------

    pub(crate) fn push_scope(&mut self, kind: ScopeKind) {
        self.scope_stack.push(ScopeFrame {
            kind,
            variables: HashMap::new(),
        });
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope_stack.pop().expect("scope stack underflow");
    }

    /// Declares a variable. `var` hoists to the innermost function
    /// scope; `let`/`const` bind in the current scope. Outside any scope
    /// declarations land on the global object.
    pub fn declare_variable(
        &mut self,
        name: &str,
        declaration_kind: DeclarationKind,
        value: Value,
    ) -> JsResult<()> {
        let target = match declaration_kind {
            DeclarationKind::Var => self
                .scope_stack
                .iter()
                .rposition(|scope| scope.kind == ScopeKind::Function),
            DeclarationKind::Let | DeclarationKind::Const => {
                if self.scope_stack.is_empty() {
                    None
                } else {
                    Some(self.scope_stack.len() - 1)
                }
            }
        };
        match target {
            Some(index) => {
                self.scope_stack[index].variables.insert(
                    name.to_string(),
                    Variable {
                        value,
                        declaration_kind,
                    },
                );
                Ok(())
            }
            None => {
                let global = self.global_object();
                self.put_property(global, &PropertyName::from_string(name), value)
            }
        }
    }

    /// Reads a variable: scope chain first, then the global object.
    /// `Ok(None)` means the binding does not exist anywhere.
    pub fn get_variable(&mut self, name: &str) -> JsResult<Option<Value>> {
        for scope in self.scope_stack.iter().rev() {
            if let Some(variable) = scope.variables.get(name) {
                return Ok(Some(variable.value));
            }
        }
        let global = self.global_object();
        if self.has_property(global, &PropertyName::from_string(name))? {
            return self.get_property(global, &PropertyName::from_string(name)).map(Some);
        }
        Ok(None)
    }

    /// Writes a variable: nearest binding wins, otherwise the global
    /// object. Assigning to a `const` binding throws.
    pub fn set_variable(&mut self, name: &str, value: Value) -> JsResult<()> {
        for index in (0..self.scope_stack.len()).rev() {
            if let Some(variable) = self.scope_stack[index].variables.get(name) {
                if variable.declaration_kind == DeclarationKind::Const {
                    return Err(self.throw_error(
                        ErrorKind::TypeError,
                        "Assignment to constant variable",
                    ));
                }
                self.scope_stack[index]
                    .variables
                    .get_mut(name)
                    .expect("binding just found")
                    .value = value;
                return Ok(());
            }
        }
        let global = self.global_object();
        self.put_property(global, &PropertyName::from_string(name), value)
    }

    // -- Program entry -----------------------------------------------------

    /// Runs a parsed program, returning the value of its last
    /// statement. On an uncaught exception the exception slot stays set
    /// for the host to inspect.
    pub fn run(&mut self, program: &Program) -> JsResult<Value> {
        self.strict_mode = program.strict;
        self.last_value = Value::Undefined;
        let result = self.execute_program(program);
        match result {
            Ok(value) => {
                self.last_value = value;
                Ok(value)
            }
            Err(exception) => Err(exception),
        }
    }

    // -- Calls -------------------------------------------------------------

    /// Snapshot of a function object's callable payload, detached from
    /// the heap borrow so the call machinery can re-enter the heap.
    fn callable_snapshot(&self, function: ObjectHandle) -> Option<Callable> {
        match self.heap.object(function).kind() {
            ObjectKind::NativeFunction(data) => Some(Callable::Native(data.clone())),
            ObjectKind::Function(script) => Some(Callable::Script(script.clone())),
            ObjectKind::BoundFunction(bound) => Some(Callable::Bound(bound.clone())),
            _ => None,
        }
    }

    /// Calls a function value with an explicit `this` and arguments.
    pub fn call_function(
        &mut self,
        function: ObjectHandle,
        this_value: Value,
        arguments: Vec<Value>,
    ) -> JsResult<Value> {
        match self.callable_snapshot(function) {
            Some(Callable::Native(data)) => {
                self.push_call_frame(CallFrame {
                    function_name: data.name,
                    this_value,
                    arguments,
                })?;
                let result = (data.function)(self);
                self.pop_call_frame();
                result
            }
            Some(Callable::Script(script)) => {
                self.call_script_function(&script, this_value, arguments)
            }
            Some(Callable::Bound(bound)) => {
                let mut combined = bound.bound_arguments.clone();
                combined.extend(arguments);
                self.call_function(bound.target, bound.bound_this, combined)
            }
            None => {
                let name = self.heap.object(function).class_name();
                Err(self.throw_error(ErrorKind::TypeError, format!("{} is not a function", name)))
            }
        }
    }

    fn call_script_function(
        &mut self,
        script: &ScriptFunction,
        this_value: Value,
        arguments: Vec<Value>,
    ) -> JsResult<Value> {
        self.push_call_frame(CallFrame {
            function_name: script.name.clone(),
            this_value,
            arguments: arguments.clone(),
        })?;
        self.push_scope(ScopeKind::Function);
        for (index, parameter) in script.parameters.iter().enumerate() {
            let value = arguments.get(index).copied().unwrap_or(Value::Undefined);
            let declared = self.declare_variable(parameter, DeclarationKind::Var, value);
            debug_assert!(declared.is_ok());
        }
        let result = self.execute_function_body(&script.body);
        self.pop_scope();
        self.pop_call_frame();
        result
    }

    /// `new`-constructs a function value.
    pub fn construct(&mut self, function: ObjectHandle, arguments: Vec<Value>) -> JsResult<Value> {
        let prototype_value =
            self.get_property(function, &PropertyName::String("prototype".to_string()))?;
        let prototype = match prototype_value {
            Value::Object(handle) => Some(handle),
            _ => Some(self.global_data().object_prototype),
        };
        match self.callable_snapshot(function) {
            Some(Callable::Native(data)) => {
                let Some(construct) = data.construct else {
                    return Err(self.throw_error(
                        ErrorKind::TypeError,
                        format!("{} is not a constructor", data.name),
                    ));
                };
                let new_object = self.create_object(prototype, ObjectKind::Plain);
                self.push_call_frame(CallFrame {
                    function_name: data.name,
                    this_value: Value::Object(new_object),
                    arguments,
                })?;
                let result = construct(self);
                self.pop_call_frame();
                match result? {
                    value @ Value::Object(_) => Ok(value),
                    _ => Ok(Value::Object(new_object)),
                }
            }
            Some(Callable::Script(script)) => {
                let new_object = self.create_object(prototype, ObjectKind::Plain);
                let result =
                    self.call_script_function(&script, Value::Object(new_object), arguments)?;
                match result {
                    value @ Value::Object(_) => Ok(value),
                    _ => Ok(Value::Object(new_object)),
                }
            }
            Some(Callable::Bound(bound)) => {
                let mut combined = bound.bound_arguments.clone();
                combined.extend(arguments);
                self.construct(bound.target, combined)
            }
            None => {
                let name = self.heap.object(function).class_name();
                Err(self.throw_error(
                    ErrorKind::TypeError,
                    format!("{} is not a constructor", name),
                ))
            }
        }
    }

    // -- Object construction helpers ---------------------------------------

    /// Creates an object of the given kind. Objects whose prototype is
    /// the plain object prototype share the global empty shape; any
    /// other prototype takes a prototype transition.
    pub fn create_object(
        &mut self,
        prototype: Option<ObjectHandle>,
        kind: ObjectKind,
    ) -> ObjectHandle {
        let shape = self.global_data().empty_object_shape;
        let handle = self.allocate_object(Object::new(shape, kind));
        if self.heap.shape(shape).prototype() != prototype {
            object::set_prototype(&mut self.heap, handle, prototype)
                .expect("fresh object cannot be on its own prototype chain");
        }
        handle
    }

    /// Creates an array holding `elements` at indices 0..n.
    pub fn array_create(&mut self, elements: Vec<Value>) -> ObjectHandle {
        let mark = self.temporaries_mark();
        for element in &elements {
            self.push_temporary(*element);
        }
        let prototype = self.global_data().array_prototype;
        let array = self.create_object(Some(prototype), ObjectKind::Array);
        for (index, element) in elements.into_iter().enumerate() {
            self.heap
                .object_mut(array)
                .indexed_properties_mut()
                .put(index as u32, element, PropertyAttributes::default());
        }
        self.truncate_temporaries(mark);
        array
    }

    /// Creates a native function object.
    pub fn create_native_function(
        &mut self,
        name: &str,
        function: NativeFunction,
        length: u32,
        construct: Option<NativeFunction>,
    ) -> ObjectHandle {
        let prototype = self.global_data().function_prototype;
        self.create_object(
            Some(prototype),
            ObjectKind::NativeFunction(NativeFunctionData {
                name: name.to_string(),
                length,
                function,
                construct,
            }),
        )
    }

    /// Defines a native function property on an object, the way hosts
    /// and built-ins register their operations.
    pub fn define_native_function(
        &mut self,
        object: ObjectHandle,
        name: &str,
        function: NativeFunction,
        length: u32,
        attributes: PropertyAttributes,
    ) {
        let function_object = self.create_native_function(name, function, length, None);
        object::put_own_property(
            &mut self.heap,
            object,
            PropertyKey::String(name.to_string()),
            Value::Object(function_object),
            attributes,
            PutMode::DefineProperty,
        )
        .expect("native function definition cannot fail");
    }

    /// Defines a native accessor property backed by host getter/setter
    /// functions.
    pub fn define_native_property(
        &mut self,
        object: ObjectHandle,
        name: &str,
        getter: Option<NativeFunction>,
        setter: Option<NativeFunction>,
        attributes: PropertyAttributes,
    ) {
        let getter_object =
            getter.map(|function| self.create_native_function(name, function, 0, None));
        let setter_object =
            setter.map(|function| self.create_native_function(name, function, 1, None));
        let mark = self.temporaries_mark();
        if let Some(handle) = getter_object {
            self.push_temporary(Value::Object(handle));
        }
        if let Some(handle) = setter_object {
            self.push_temporary(Value::Object(handle));
        }
        self.maybe_collect();
        let accessor = self
            .heap
            .allocate_accessor(Accessor::new(getter_object, setter_object));
        self.truncate_temporaries(mark);

        let mut attributes = attributes;
        if getter_object.is_some() {
            attributes |= PropertyAttributes::HAS_GETTER;
        }
        if setter_object.is_some() {
            attributes |= PropertyAttributes::HAS_SETTER;
        }
        object::put_own_property(
            &mut self.heap,
            object,
            PropertyKey::String(name.to_string()),
            Value::Accessor(accessor),
            attributes,
            PutMode::DefineProperty,
        )
        .expect("native property definition cannot fail");
    }

    /// Registers a constructor/prototype pair: names the constructor on
    /// `target`, links `constructor.prototype` and `prototype.constructor`.
    pub fn add_constructor(
        &mut self,
        target: ObjectHandle,
        name: &str,
        constructor: ObjectHandle,
        prototype: ObjectHandle,
    ) {
        let writable_configurable =
            PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE;
        object::put_own_property(
            &mut self.heap,
            target,
            PropertyKey::String(name.to_string()),
            Value::Object(constructor),
            writable_configurable,
            PutMode::DefineProperty,
        )
        .expect("constructor registration cannot fail");
        object::put_own_property(
            &mut self.heap,
            constructor,
            PropertyKey::String("prototype".to_string()),
            Value::Object(prototype),
            PropertyAttributes::empty(),
            PutMode::DefineProperty,
        )
        .expect("constructor registration cannot fail");
        object::put_own_property(
            &mut self.heap,
            prototype,
            PropertyKey::String("constructor".to_string()),
            Value::Object(constructor),
            writable_configurable,
            PutMode::DefineProperty,
        )
        .expect("constructor registration cannot fail");
    }

    // -- Property protocol -------------------------------------------------

    /// Reads a property, walking the prototype chain and dispatching
    /// accessors against the receiver. A miss along the whole chain
    /// yields `undefined`.
    pub fn get_property(&mut self, object: ObjectHandle, name: &PropertyName) -> JsResult<Value> {
        if let Some(value) = self.kind_specific_get(object, name)? {
            return Ok(value);
        }
        let mut current = Some(object);
        while let Some(holder) = current {
            if let Some((target, handler)) = self.as_proxy(holder) {
                return self.proxy_get(target, handler, name);
            }
            match name {
                PropertyName::Index(index) => {
                    if let Some(property) = self.heap.object(holder).indexed_properties().get(*index)
                    {
                        return self.unwrap_slot_value(property.value, object);
                    }
                }
                _ => {
                    let key = name.as_property_key().expect("named lookup");
                    if let Some((value, _)) = object::get_own_property(&self.heap, holder, &key) {
                        return self.unwrap_slot_value(value, object);
                    }
                }
            }
            current = object::prototype_of(&self.heap, holder);
        }
        Ok(Value::Undefined)
    }

    fn unwrap_slot_value(&mut self, value: Value, this_object: ObjectHandle) -> JsResult<Value> {
        match value {
            Value::Accessor(handle) => match self.heap.accessor(handle).getter() {
                Some(getter) => self.call_function(getter, Value::Object(this_object), Vec::new()),
                None => Ok(Value::Undefined),
            },
            Value::Empty => Ok(Value::Undefined),
            other => Ok(other),
        }
    }

    /// The proxy payload of an object, if it is one.
    fn as_proxy(&self, object: ObjectHandle) -> Option<(ObjectHandle, ObjectHandle)> {
        match self.heap.object(object).kind() {
            ObjectKind::Proxy { target, handler } => Some((*target, *handler)),
            _ => None,
        }
    }

    fn kind_specific_get(
        &mut self,
        object: ObjectHandle,
        name: &PropertyName,
    ) -> JsResult<Option<Value>> {
        enum Receiver {
            Array,
            StringWrapper(StringHandle),
            Other,
        }
        let receiver = match self.heap.object(object).kind() {
            ObjectKind::Array => Receiver::Array,
            ObjectKind::StringWrapper(handle) => Receiver::StringWrapper(*handle),
            _ => Receiver::Other,
        };
        match (receiver, name) {
            (Receiver::Array, PropertyName::String(name)) if name == "length" => {
                let length = self.heap.object(object).indexed_properties().array_like_length();
                Ok(Some(Value::Number(length as f64)))
            }
            (Receiver::StringWrapper(handle), PropertyName::String(name)) if name == "length" => {
                let length = self.heap.string(handle).len();
                Ok(Some(Value::Number(length as f64)))
            }
            (Receiver::StringWrapper(handle), PropertyName::Index(index)) => {
                let text = self.heap.string(handle).text().to_string();
                match text.chars().nth(*index as usize) {
                    Some(character) => Ok(Some(self.js_string(character.to_string()))),
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    /// Writes a property per ordinary `[[Set]]`: own data properties are
    /// overwritten in place, accessors anywhere on the chain run their
    /// setter against the receiver, inherited data properties shadow
    /// onto the receiver. Non-writable targets throw in strict mode and
    /// are silently ignored otherwise.
    pub fn put_property(
        &mut self,
        object: ObjectHandle,
        name: &PropertyName,
        value: Value,
    ) -> JsResult<()> {
        if let Some((target, handler)) = self.as_proxy(object) {
            return self.proxy_set(target, handler, name, value);
        }
        if self.heap.object(object).is_array() {
            if let PropertyName::String(key) = name {
                if key == "length" {
                    let new_length = self.to_u32(value)?;
                    self.heap
                        .object_mut(object)
                        .indexed_properties_mut()
                        .truncate(new_length);
                    return Ok(());
                }
            }
        }

        if let PropertyName::Index(index) = name {
            if let Some(existing) = self.heap.object(object).indexed_properties().get(*index) {
                if !existing.attributes.is_writable() {
                    return self.reject_write(format!(
                        "Cannot write to non-writable indexed property {}",
                        index
                    ));
                }
                let attributes = existing.attributes;
                self.heap
                    .object_mut(object)
                    .indexed_properties_mut()
                    .put(*index, value, attributes);
            } else {
                self.heap
                    .object_mut(object)
                    .indexed_properties_mut()
                    .put(*index, value, PropertyAttributes::default());
            }
            return Ok(());
        }

        let key = name.as_property_key().expect("named write");
        let mut current = Some(object);
        while let Some(holder) = current {
            if let Some((slot_value, metadata)) = object::get_own_property(&self.heap, holder, &key)
            {
                if let Value::Accessor(accessor) = slot_value {
                    return match self.heap.accessor(accessor).setter() {
                        Some(setter) => {
                            self.call_function(setter, Value::Object(object), vec![value])?;
                            Ok(())
                        }
                        None => self.reject_write(format!(
                            "Cannot write to accessor property '{}' without a setter",
                            key
                        )),
                    };
                }
                if holder == object {
                    if !metadata.attributes.is_writable() {
                        return self.reject_write(format!(
                            "Cannot write to non-writable property '{}'",
                            key
                        ));
                    }
                    self.heap.object_mut(object).put_direct(metadata.offset, value);
                    return Ok(());
                }
                // Inherited data property: shadow on the receiver.
                break;
            }
            current = object::prototype_of(&self.heap, holder);
        }

        match object::put_own_property(
            &mut self.heap,
            object,
            key.clone(),
            value,
            PropertyAttributes::default(),
            PutMode::Put,
        ) {
            Ok(()) => Ok(()),
            Err(PutError::NotExtensible) => {
                self.reject_write(format!("Cannot add property '{}' to non-extensible object", key))
            }
            Err(PutError::NotWritable) => {
                self.reject_write(format!("Cannot write to non-writable property '{}'", key))
            }
            Err(PutError::NotConfigurable) => {
                self.reject_write(format!("Cannot reconfigure property '{}'", key))
            }
        }
    }

    fn reject_write(&mut self, message: String) -> JsResult<()> {
        if self.strict_mode {
            Err(self.throw_error(ErrorKind::TypeError, message))
        } else {
            Ok(())
        }
    }

    /// Defines (or exactly reconfigures) an own data property.
    pub fn define_property(
        &mut self,
        object: ObjectHandle,
        name: &PropertyName,
        value: Value,
        attributes: PropertyAttributes,
    ) -> JsResult<()> {
        match name {
            PropertyName::Index(index) => {
                self.heap
                    .object_mut(object)
                    .indexed_properties_mut()
                    .put(*index, value, attributes);
                Ok(())
            }
            _ => {
                let key = name.as_property_key().expect("named define");
                match object::put_own_property(
                    &mut self.heap,
                    object,
                    key.clone(),
                    value,
                    attributes,
                    PutMode::DefineProperty,
                ) {
                    Ok(()) => Ok(()),
                    Err(PutError::NotConfigurable) => Err(self.throw_error(
                        ErrorKind::TypeError,
                        format!("Cannot redefine non-configurable property '{}'", key),
                    )),
                    Err(PutError::NotExtensible) => Err(self.throw_error(
                        ErrorKind::TypeError,
                        format!("Cannot define property '{}' on non-extensible object", key),
                    )),
                    Err(PutError::NotWritable) => Err(self.throw_error(
                        ErrorKind::TypeError,
                        format!("Cannot redefine non-writable property '{}'", key),
                    )),
                }
            }
        }
    }

    /// Defines an accessor property. A getter or setter defined over an
    /// existing accessor merges with it.
    pub fn define_accessor(
        &mut self,
        object: ObjectHandle,
        name: &PropertyName,
        getter: Option<ObjectHandle>,
        setter: Option<ObjectHandle>,
        attributes: PropertyAttributes,
    ) -> JsResult<()> {
        let key = name
            .as_property_key()
            .expect("accessors are named properties");
        let (mut getter, mut setter) = (getter, setter);
        if let Some((Value::Accessor(existing), _)) =
            object::get_own_property(&self.heap, object, &key)
        {
            let existing = *self.heap.accessor(existing);
            getter = getter.or(existing.getter());
            setter = setter.or(existing.setter());
        }
        let mark = self.temporaries_mark();
        if let Some(handle) = getter {
            self.push_temporary(Value::Object(handle));
        }
        if let Some(handle) = setter {
            self.push_temporary(Value::Object(handle));
        }
        self.maybe_collect();
        let accessor = self.heap.allocate_accessor(Accessor::new(getter, setter));
        self.truncate_temporaries(mark);

        let mut attributes = attributes
            & (PropertyAttributes::ENUMERABLE | PropertyAttributes::CONFIGURABLE);
        if getter.is_some() {
            attributes |= PropertyAttributes::HAS_GETTER;
        }
        if setter.is_some() {
            attributes |= PropertyAttributes::HAS_SETTER;
        }
        self.define_property_raw(object, key, Value::Accessor(accessor), attributes)
    }

    fn define_property_raw(
        &mut self,
        object: ObjectHandle,
        key: PropertyKey,
        value: Value,
        attributes: PropertyAttributes,
    ) -> JsResult<()> {
        match object::put_own_property(
            &mut self.heap,
            object,
            key.clone(),
            value,
            attributes,
            PutMode::DefineProperty,
        ) {
            Ok(()) => Ok(()),
            Err(_) => Err(self.throw_error(
                ErrorKind::TypeError,
                format!("Cannot redefine property '{}'", key),
            )),
        }
    }

    /// True if the property exists on the object or its prototype chain.
    pub fn has_property(&mut self, object: ObjectHandle, name: &PropertyName) -> JsResult<bool> {
        if self.kind_specific_get(object, name)?.is_some() {
            return Ok(true);
        }
        let mut current = Some(object);
        while let Some(holder) = current {
            if let Some((target, handler)) = self.as_proxy(holder) {
                return self.proxy_has(target, handler, name);
            }
            match name {
                PropertyName::Index(index) => {
                    if self.heap.object(holder).indexed_properties().contains(*index) {
                        return Ok(true);
                    }
                }
                _ => {
                    let key = name.as_property_key().expect("named lookup");
                    if object::get_own_property(&self.heap, holder, &key).is_some() {
                        return Ok(true);
                    }
                }
            }
            current = object::prototype_of(&self.heap, holder);
        }
        Ok(false)
    }

    /// Deletes an own property. Returns false (sloppy) or throws
    /// (strict) for non-configurable properties.
    pub fn delete_property(&mut self, object: ObjectHandle, name: &PropertyName) -> JsResult<bool> {
        if let Some((target, handler)) = self.as_proxy(object) {
            return self.proxy_delete(target, handler, name);
        }
        let result = match name {
            PropertyName::Index(index) => {
                match self.heap.object(object).indexed_properties().get(*index) {
                    Some(property) if !property.attributes.is_configurable() => false,
                    Some(_) => {
                        self.heap
                            .object_mut(object)
                            .indexed_properties_mut()
                            .remove(*index);
                        true
                    }
                    None => true,
                }
            }
            _ => {
                let key = name.as_property_key().expect("named delete");
                object::delete_own_property(&mut self.heap, object, &key).is_ok()
            }
        };
        if !result && self.strict_mode {
            return Err(self.throw_error(
                ErrorKind::TypeError,
                format!("Cannot delete non-configurable property '{}'", name),
            ));
        }
        Ok(result)
    }

    /// Replaces an object's prototype, throwing `TypeError` on a cycle.
    pub fn set_prototype(
        &mut self,
        object: ObjectHandle,
        prototype: Option<ObjectHandle>,
    ) -> JsResult<()> {
        match object::set_prototype(&mut self.heap, object, prototype) {
            Ok(()) => Ok(()),
            Err(object::PrototypeError::Cycle) => Err(self.throw_error(
                ErrorKind::TypeError,
                "Cyclic prototype chain rejected",
            )),
        }
    }

    // -- Proxy traps -------------------------------------------------------

    fn proxy_trap(
        &mut self,
        handler: ObjectHandle,
        trap_name: &str,
    ) -> JsResult<Option<ObjectHandle>> {
        let trap = self.get_property(handler, &PropertyName::String(trap_name.to_string()))?;
        match trap {
            Value::Undefined | Value::Null => Ok(None),
            Value::Object(function) if self.heap.object(function).is_function() => {
                Ok(Some(function))
            }
            _ => Err(self.throw_error(
                ErrorKind::TypeError,
                format!("Proxy trap '{}' is not a function", trap_name),
            )),
        }
    }

    fn property_name_value(&mut self, name: &PropertyName) -> Value {
        match name {
            PropertyName::Symbol(symbol) => Value::Symbol(*symbol),
            other => self.js_string(other.to_string()),
        }
    }

    fn proxy_get(
        &mut self,
        target: ObjectHandle,
        handler: ObjectHandle,
        name: &PropertyName,
    ) -> JsResult<Value> {
        match self.proxy_trap(handler, "get")? {
            Some(trap) => {
                let key = self.property_name_value(name);
                self.call_function(trap, Value::Object(handler), vec![Value::Object(target), key])
            }
            None => self.get_property(target, name),
        }
    }

    fn proxy_set(
        &mut self,
        target: ObjectHandle,
        handler: ObjectHandle,
        name: &PropertyName,
        value: Value,
    ) -> JsResult<()> {
        match self.proxy_trap(handler, "set")? {
            Some(trap) => {
                let key = self.property_name_value(name);
                self.call_function(
                    trap,
                    Value::Object(handler),
                    vec![Value::Object(target), key, value],
                )?;
                Ok(())
            }
            None => self.put_property(target, name, value),
        }
    }

    fn proxy_has(
        &mut self,
        target: ObjectHandle,
        handler: ObjectHandle,
        name: &PropertyName,
    ) -> JsResult<bool> {
        match self.proxy_trap(handler, "has")? {
            Some(trap) => {
                let key = self.property_name_value(name);
                let result = self.call_function(
                    trap,
                    Value::Object(handler),
                    vec![Value::Object(target), key],
                )?;
                Ok(self.to_boolean(result))
            }
            None => self.has_property(target, name),
        }
    }

    fn proxy_delete(
        &mut self,
        target: ObjectHandle,
        handler: ObjectHandle,
        name: &PropertyName,
    ) -> JsResult<bool> {
        match self.proxy_trap(handler, "deleteProperty")? {
            Some(trap) => {
                let key = self.property_name_value(name);
                let result = self.call_function(
                    trap,
                    Value::Object(handler),
                    vec![Value::Object(target), key],
                )?;
                Ok(self.to_boolean(result))
            }
            None => self.delete_property(target, name),
        }
    }

}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
