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
//! A rubber ball bouncing on a floor
//!
//! Demonstrates restitution combine modes: the ball's rubber material
//! combines with Maximum, so the bounce keeps the rubber's restitution
//! even against a dead floor. Each apex height is printed to show the
//! geometric decay, and a ray cast finds the ball from the side.

use physics2d::body::Rigidbody2D;
use physics2d::collider::Collider2D;
use physics2d::material::PhysicsMaterial2D;
use physics2d::math::{Transform2D, Vector2};
use physics2d::world::Physics2DWorld;

fn main() {
    env_logger::init();

    println!("Physics2D - Bouncing Ball Example");
    println!("=================================\n");

    let mut world = Physics2DWorld::new();

    let floor = world.add_body(
        Rigidbody2D::fixed(),
        Transform2D::at(Vector2::new(400.0, 580.0)),
    );
    world
        .attach_collider(floor, Collider2D::new_box(Vector2::new(800.0, 40.0)))
        .expect("floor was just added");

    let ball = world.add_body(
        Rigidbody2D::dynamic(),
        Transform2D::at(Vector2::new(400.0, 100.0)),
    );
    world
        .attach_collider(
            ball,
            Collider2D::new_circle(15.0).with_material(PhysicsMaterial2D::rubber()),
        )
        .expect("ball was just added");

    println!("Dropped a rubber ball (restitution 0.8) from y = 100\n");

    let dt = 1.0 / 60.0;
    let mut previous_y = 100.0;
    let mut rising = false;
    for _ in 0..600 {
        world.step(dt);

        let y = world.transform(ball).expect("ball is registered").position.y;
        // Screen coordinates: an apex is where the ball stops moving up
        // (decreasing y) and starts falling again
        if rising && y > previous_y {
            println!("apex at y = {previous_y:.1}");
        }
        rising = y < previous_y;
        previous_y = y;
    }

    if let Some(hit) = world.raycast(
        Vector2::new(0.0, previous_y),
        Vector2::new(1.0, 0.0),
        800.0,
        u32::MAX,
    ) {
        println!(
            "\nRay from the left finds body {:?} at distance {:.1}",
            hit.body, hit.distance
        );
    }

    let body = world.body(ball).expect("ball is registered");
    println!(
        "Final state: y = {:.1}, speed = {:.2}, sleeping = {}",
        previous_y,
        body.velocity().length(),
        body.is_sleeping()
    );
}
