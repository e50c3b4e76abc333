// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for world stepping
//!
//! These benchmarks measure:
//! - Step throughput over increasing body counts
//! - The cost of contact-heavy scenes (a settled pile) versus free fall
//! - Ray cast query cost against a populated world

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use physics2d::body::Rigidbody2D;
use physics2d::collider::Collider2D;
use physics2d::math::{Transform2D, Vector2};
use physics2d::world::Physics2DWorld;

const DT: f32 = 1.0 / 60.0;

// Boxes raining onto a wide static floor; spread out so early steps are
// mostly broad-phase work
fn setup_falling_scene(body_count: usize) -> Physics2DWorld {
    let mut world = Physics2DWorld::new();

    let floor = world.add_body(
        Rigidbody2D::fixed(),
        Transform2D::at(Vector2::new(0.0, 600.0)),
    );
    world
        .attach_collider(floor, Collider2D::new_box(Vector2::new(4000.0, 40.0)))
        .unwrap();

    for i in 0..body_count {
        let column = (i % 64) as f32;
        let row = (i / 64) as f32;
        let body = world.add_body(
            Rigidbody2D::dynamic(),
            Transform2D::at(Vector2::new(
                -1600.0 + column * 50.0,
                -200.0 - row * 50.0,
            )),
        );
        world
            .attach_collider(body, Collider2D::new_box(Vector2::new(20.0, 20.0)))
            .unwrap();
    }
    world
}

// Run the scene until most bodies have landed, so stepping exercises the
// resolver rather than free flight
fn setup_settled_scene(body_count: usize) -> Physics2DWorld {
    let mut world = setup_falling_scene(body_count);
    for _ in 0..300 {
        world.step(DT);
    }
    world
}

fn bench_step_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_falling");
    for &count in &[64usize, 256, 1024] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut world = setup_falling_scene(count);
            b.iter(|| {
                world.step(black_box(DT));
            });
        });
    }
    group.finish();
}

fn bench_step_settled(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_settled");
    for &count in &[64usize, 256] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut world = setup_settled_scene(count);
            b.iter(|| {
                world.step(black_box(DT));
            });
        });
    }
    group.finish();
}

fn bench_raycast(c: &mut Criterion) {
    let world = setup_settled_scene(256);
    c.bench_function("raycast_256_bodies", |b| {
        b.iter(|| {
            black_box(world.raycast(
                black_box(Vector2::new(-2000.0, 560.0)),
                Vector2::new(1.0, 0.0),
                4000.0,
                u32::MAX,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_step_throughput,
    bench_step_settled,
    bench_raycast
);
criterion_main!(benches);
