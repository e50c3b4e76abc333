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
//! Boxes dropped onto a static floor
//!
//! This example drops a small stack of boxes in screen coordinates
//! (y grows downward), prints collision events as they happen and shows
//! the bodies settling and falling asleep.

use physics2d::body::Rigidbody2D;
use physics2d::collider::Collider2D;
use physics2d::handle::BodyHandle;
use physics2d::math::{Transform2D, Vector2};
use physics2d::world::{Collision2D, PhysicsListener, Physics2DWorld};

struct EventLogger;

impl PhysicsListener for EventLogger {
    fn on_collision_enter(&mut self, collision: &Collision2D) {
        println!(
            "  [enter] {} <-> {} at ({:.1}, {:.1}), depth {:.2}",
            collision.body_a,
            collision.body_b,
            collision.contact.point.x,
            collision.contact.point.y,
            collision.contact.depth
        );
    }

    fn on_collision_exit(&mut self, body_a: BodyHandle, body_b: BodyHandle) {
        println!("  [exit]  {body_a} <-> {body_b}");
    }
}

fn main() {
    env_logger::init();

    println!("Physics2D - Falling Boxes Example");
    println!("=================================\n");

    let mut world = Physics2DWorld::new();
    world.add_listener(Box::new(EventLogger));

    let floor = world.add_body(
        Rigidbody2D::fixed(),
        Transform2D::at(Vector2::new(400.0, 580.0)),
    );
    world
        .attach_collider(floor, Collider2D::new_box(Vector2::new(800.0, 40.0)))
        .expect("floor was just added");
    println!("Created floor {floor}");

    let mut boxes = Vec::new();
    for i in 0..5 {
        let body = world.add_body(
            Rigidbody2D::dynamic(),
            Transform2D::at(Vector2::new(390.0 + 5.0 * i as f32, 300.0 - 60.0 * i as f32)),
        );
        world
            .attach_collider(body, Collider2D::new_box(Vector2::new(40.0, 40.0)))
            .expect("box was just added");
        boxes.push(body);
        println!("Created box {body}");
    }

    println!("\nSimulating 5 seconds at 60 Hz...");
    let dt = 1.0 / 60.0;
    for frame in 0..300 {
        world.step(dt);

        if frame % 60 == 59 {
            let asleep = boxes
                .iter()
                .filter(|&&b| world.body(b).map_or(false, |body| body.is_sleeping()))
                .count();
            println!(
                "t = {:.1}s: {} active contacts, {}/{} boxes asleep",
                (frame + 1) as f32 * dt,
                world.active_collision_count(),
                asleep,
                boxes.len()
            );
        }
    }

    println!("\nFinal positions:");
    for &body in &boxes {
        if let Some(transform) = world.transform(body) {
            println!(
                "  {} at ({:.1}, {:.1})",
                body, transform.position.x, transform.position.y
            );
        }
    }
}
