#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::{Arc, OnceLock};
use wirebox::{Callable, Constructor, Container, Injectable, Parameter, Value};

struct A {
    b: OnceLock<Arc<B>>,
    c: OnceLock<Arc<C>>,
}
struct B {
    id: OnceLock<i64>,
}
struct C(OnceLock<Arc<CA>>);
struct CA(OnceLock<Arc<CAA>>);
struct CAA;

impl Injectable for A {
    const NAME: &'static str = "A";

    fn allocate() -> Self {
        Self {
            b: OnceLock::new(),
            c: OnceLock::new(),
        }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(
            [Parameter::class::<B>("b"), Parameter::class::<C>("c")],
            |this: &Self, args| {
                let _ = this.b.set(args.object::<B>(0)?);
                let _ = this.c.set(args.object::<C>(1)?);
                Ok(())
            },
        ))
    }
}

impl Injectable for B {
    const NAME: &'static str = "B";

    fn allocate() -> Self {
        Self { id: OnceLock::new() }
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::scalar("id").with_default(2)], |this: &Self, args| {
            let _ = this.id.set(args.int(0)?);
            Ok(())
        }))
    }
}

impl Injectable for C {
    const NAME: &'static str = "C";

    fn allocate() -> Self {
        Self(OnceLock::new())
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::class::<CA>("ca")], |this: &Self, args| {
            let _ = this.0.set(args.object::<CA>(0)?);
            Ok(())
        }))
    }
}

impl Injectable for CA {
    const NAME: &'static str = "CA";

    fn allocate() -> Self {
        Self(OnceLock::new())
    }

    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new([Parameter::class::<CAA>("caa")], |this: &Self, args| {
            let _ = this.0.set(args.object::<CAA>(0)?);
            Ok(())
        }))
    }
}

impl Injectable for CAA {
    const NAME: &'static str = "CAA";

    fn allocate() -> Self {
        Self
    }
}

#[inline]
fn container_get(container: &Container) {
    let _ = container.get(A::NAME).unwrap();
}

#[inline]
fn container_create_new(container: &Container) {
    let _ = container.create_new(A::NAME, &[]).unwrap();
}

#[inline]
fn container_get_fresh() {
    let container = Container::new();
    let _ = container.get_as::<A>().unwrap();
}

#[inline]
fn container_invoke_function(container: &Container) {
    let _ = container.invoke_function("sum", &[Value::Int(1)]).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let container = Container::new();
    container.register::<A>();
    container
        .define(
            "sum",
            Callable::new(
                [Parameter::class::<B>("b"), Parameter::scalar("value")],
                |args| Ok(Value::Int(args.object::<B>(0)?.id.get().copied().unwrap_or_default() + args.int(1)?)),
            ),
        )
        .unwrap();

    c.bench_function("container_get_fresh", |b| b.iter(container_get_fresh))
        .bench_function("container_get_with_singletons", |b| b.iter(|| container_get(&container)))
        .bench_function("container_create_new", |b| b.iter(|| container_create_new(&container)))
        .bench_function("container_invoke_function", |b| {
            b.iter(|| container_invoke_function(&container))
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
