//! Microbenchmarks for shape transitions and property access.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parser::Parser;
use runtime::Interpreter;

fn bench_shared_shape_construction(c: &mut Criterion) {
    let program = Parser::new(
        "let objects = [];
         for (let i = 0; i < 100; i++) {
             let o = {};
             o.a = i;
             o.b = i;
             o.c = i;
             objects.push(o);
         }",
    )
    .parse_program()
    .expect("benchmark source parses");

    c.bench_function("construct_100_shared_shape_objects", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::new();
            black_box(interpreter.run(&program).expect("runs"));
        });
    });
}

fn bench_property_access(c: &mut Criterion) {
    let mut interpreter = Interpreter::new();
    let setup = Parser::new("let o = { a: 1, b: 2, c: 3, d: 4 };")
        .parse_program()
        .expect("parses");
    interpreter.run(&setup).expect("runs");
    let access = Parser::new("o.a + o.b + o.c + o.d")
        .parse_program()
        .expect("parses");

    c.bench_function("offset_based_property_reads", |b| {
        b.iter(|| {
            black_box(interpreter.run(&access).expect("runs"));
        });
    });
}

criterion_group!(benches, bench_shared_shape_construction, bench_property_access);
criterion_main!(benches);
