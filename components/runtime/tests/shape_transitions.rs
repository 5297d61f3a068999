//! Shape-sharing behaviour observed through the public object API.

use core_types::{PropertyAttributes, Value};
use parser::Parser;
use runtime::property_key::PropertyName;
use runtime::{Interpreter, TransitionType};

fn run(interpreter: &mut Interpreter, source: &str) -> Value {
    let program = Parser::new(source).parse_program().expect("test source parses");
    interpreter.run(&program).expect("test source runs")
}

fn global_object_property(interpreter: &mut Interpreter, name: &str) -> core_types::ObjectHandle {
    let global = interpreter.global_object();
    interpreter
        .get_property(global, &PropertyName::from_string(name))
        .expect("global read cannot fail")
        .as_object()
}

#[test]
fn identical_construction_sequences_share_a_shape() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = {}; a.x = 1; a.y = 2; let b = {}; b.x = 1; b.y = 2;",
    );
    let a = global_object_property(&mut interpreter, "a");
    let b = global_object_property(&mut interpreter, "b");
    assert_eq!(
        interpreter.heap().object(a).shape(),
        interpreter.heap().object(b).shape()
    );
    assert_eq!(run(&mut interpreter, "a.x"), Value::Number(1.0));
    assert_eq!(run(&mut interpreter, "a.y"), Value::Number(2.0));
}

#[test]
fn diverging_sequences_do_not_share() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = {}; a.x = 1; let b = {}; b.y = 1;",
    );
    let a = global_object_property(&mut interpreter, "a");
    let b = global_object_property(&mut interpreter, "b");
    assert_ne!(
        interpreter.heap().object(a).shape(),
        interpreter.heap().object(b).shape()
    );
}

#[test]
fn offsets_are_stable_across_shape_lifetime() {
    let mut interpreter = Interpreter::new();
    run(&mut interpreter, "let a = {}; a.x = 1; a.y = 2; a.z = 3;");
    let a = global_object_property(&mut interpreter, "a");
    let shape_handle = interpreter.heap().object(a).shape();
    let heap = interpreter.heap();
    let shape = heap.shape(shape_handle);
    let x_offset = shape.lookup(heap, &"x".into()).expect("x exists").offset;
    assert_eq!(x_offset, 0);

    // More objects traverse the same transitions; offsets don't move.
    let mut interpreter2 = interpreter;
    run(&mut interpreter2, "let b = {}; b.x = 9; b.y = 8; b.z = 7;");
    let heap = interpreter2.heap();
    let shape = heap.shape(shape_handle);
    assert_eq!(shape.lookup(heap, &"x".into()).expect("x exists").offset, 0);
    assert_eq!(shape.lookup(heap, &"y".into()).expect("y exists").offset, 1);
    assert_eq!(shape.lookup(heap, &"z".into()).expect("z exists").offset, 2);
}

#[test]
fn delete_moves_object_to_unique_shape() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = {}; a.x = 1; a.y = 2; delete a.x; a.z = 3;",
    );
    let a = global_object_property(&mut interpreter, "a");
    let shape_handle = interpreter.heap().object(a).shape();
    assert!(interpreter.heap().shape(shape_handle).is_unique());
    assert_eq!(run(&mut interpreter, "a.y"), Value::Number(2.0));
    assert_eq!(run(&mut interpreter, "a.z"), Value::Number(3.0));
    assert_eq!(run(&mut interpreter, "a.x"), Value::Undefined);

    let ks = run(
        &mut interpreter,
        "let ks = []; for (let k in a) ks.push(k); ks.join(\",\")",
    );
    assert_eq!(
        interpreter.to_string(ks).expect("join result is a string"),
        "y,z"
    );
}

#[test]
fn unique_shapes_are_never_shared() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = {}; a.x = 1; delete a.x;
         let b = {}; b.x = 1; delete b.x;",
    );
    let a = global_object_property(&mut interpreter, "a");
    let b = global_object_property(&mut interpreter, "b");
    assert_ne!(
        interpreter.heap().object(a).shape(),
        interpreter.heap().object(b).shape()
    );
}

#[test]
fn configure_keeps_shape_shared_and_offset_stable() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let a = { p: 1, q: 2 };
         Object.defineProperty(a, \"p\", { writable: false, enumerable: true, configurable: true });",
    );
    let a = global_object_property(&mut interpreter, "a");
    let heap = interpreter.heap();
    let shape = heap.shape(heap.object(a).shape());
    assert!(!shape.is_unique());
    assert_eq!(shape.transition_type(), TransitionType::Configure);
    let metadata = shape.lookup(heap, &"p".into()).expect("p exists");
    assert_eq!(metadata.offset, 0);
    assert!(!metadata.attributes.is_writable());
    assert_eq!(shape.lookup(heap, &"q".into()).expect("q exists").offset, 1);
}

#[test]
fn prototype_transition_changes_prototype_only() {
    let mut interpreter = Interpreter::new();
    run(
        &mut interpreter,
        "let proto = { inherited: 42 };
         let a = { own: 1 };
         Object.setPrototypeOf(a, proto);",
    );
    let a = global_object_property(&mut interpreter, "a");
    let proto = global_object_property(&mut interpreter, "proto");
    let heap = interpreter.heap();
    let shape = heap.shape(heap.object(a).shape());
    assert_eq!(shape.prototype(), Some(proto));
    assert_eq!(shape.lookup(heap, &"own".into()).expect("own exists").offset, 0);
    assert_eq!(run(&mut interpreter, "a.inherited"), Value::Number(42.0));
}

#[test]
fn property_attributes_default_to_full() {
    let mut interpreter = Interpreter::new();
    run(&mut interpreter, "let a = {}; a.x = 1;");
    let a = global_object_property(&mut interpreter, "a");
    let heap = interpreter.heap();
    let shape = heap.shape(heap.object(a).shape());
    let metadata = shape.lookup(heap, &"x".into()).expect("x exists");
    assert_eq!(metadata.attributes, PropertyAttributes::default());
}
