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
//! Integration tests for whole-scenario contact resolution

use physics2d::body::Rigidbody2D;
use physics2d::collider::Collider2D;
use physics2d::material::{CombineMode, PhysicsMaterial2D};
use physics2d::math::{Transform2D, Vector2};
use physics2d::world::{PhysicsEvent, Physics2DWorld};

const DT: f32 = 1.0 / 60.0;

fn at(x: f32, y: f32) -> Transform2D {
    Transform2D::at(Vector2::new(x, y))
}

/// A 40x40 dynamic box dropped onto a static floor in screen coordinates
/// (y grows downward, gravity (0, 981)) must come to rest sitting on the
/// floor's top surface: floor top at y = 560, so the box center ends near
/// y = 540.
#[test]
fn test_box_rests_on_static_floor() {
    let mut world = Physics2DWorld::new();

    let floor = world.add_body(Rigidbody2D::fixed(), at(400.0, 580.0));
    world
        .attach_collider(floor, Collider2D::new_box(Vector2::new(800.0, 40.0)))
        .unwrap();

    let falling = world.add_body(Rigidbody2D::dynamic(), at(400.0, 100.0));
    world
        .attach_collider(falling, Collider2D::new_box(Vector2::new(40.0, 40.0)))
        .unwrap();

    let mut enters = 0;
    for _ in 0..300 {
        world.step(DT);
        enters += world
            .events()
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::CollisionEnter(_)))
            .count();
    }

    let transform = world.transform(falling).unwrap();
    assert!(
        (transform.position.y - 540.0).abs() < 3.0,
        "box should rest at y ~ 540, got {}",
        transform.position.y
    );
    assert!((transform.position.x - 400.0).abs() < 1.0);
    assert!(world.body(falling).unwrap().velocity().length() < 1.0);
    assert_eq!(enters, 1, "a single touchdown should fire one enter event");

    // A resting body eventually falls asleep and stays put
    assert!(world.body(falling).unwrap().is_sleeping());
    let settled = transform.position;
    for _ in 0..60 {
        world.step(DT);
    }
    assert_eq!(world.transform(falling).unwrap().position, settled);
}

/// A ball with restitution 0.8 dropped from height H rebounds to roughly
/// 0.64 H (energy scales with the square of the restitution).
#[test]
fn test_bounce_height_follows_restitution() {
    let mut world = Physics2DWorld::new();

    let floor = world.add_body(Rigidbody2D::fixed(), at(400.0, 530.0));
    world
        .attach_collider(floor, Collider2D::new_box(Vector2::new(800.0, 30.0)))
        .unwrap();

    // Ball bottom touches the floor top (y = 515) when its center reaches
    // y = 500, so the drop height is 500 - 200 = 300
    let ball = world.add_body(Rigidbody2D::dynamic(), at(400.0, 200.0));
    let rubber = PhysicsMaterial2D::new("BounceTest", 0.0, 0.8, 1.0)
        .with_restitution_combine(CombineMode::Maximum);
    world
        .attach_collider(ball, Collider2D::new_circle(15.0).with_material(rubber))
        .unwrap();

    let drop_height = 300.0;
    let mut bounced = false;
    let mut peak_y = f32::INFINITY;
    for _ in 0..180 {
        world.step(DT);
        if !bounced {
            bounced = world
                .events()
                .iter()
                .any(|e| matches!(e, PhysicsEvent::CollisionEnter(_)));
        } else {
            peak_y = peak_y.min(world.transform(ball).unwrap().position.y);
        }
    }
    assert!(bounced, "ball never hit the floor");

    let rebound = 500.0 - peak_y;
    assert!(
        rebound > 0.5 * drop_height && rebound < 0.8 * drop_height,
        "rebound {} out of range for drop height {}",
        rebound,
        drop_height
    );
}

/// Equal-mass head-on elastic collision swaps the velocities; momentum and
/// speed are conserved.
#[test]
fn test_elastic_head_on_conserves_momentum() {
    let mut world = Physics2DWorld::with_gravity(Vector2::ZERO);
    let elastic = PhysicsMaterial2D::new("Elastic", 0.0, 1.0, 1.0);

    let a = world.add_body(Rigidbody2D::dynamic(), at(0.0, 0.0));
    world
        .attach_collider(a, Collider2D::new_circle(5.0).with_material(elastic.clone()))
        .unwrap();
    world.body_mut(a).unwrap().set_velocity(Vector2::new(10.0, 0.0));

    let b = world.add_body(Rigidbody2D::dynamic(), at(30.0, 0.0));
    world
        .attach_collider(b, Collider2D::new_circle(5.0).with_material(elastic))
        .unwrap();
    world.body_mut(b).unwrap().set_velocity(Vector2::new(-10.0, 0.0));

    for _ in 0..120 {
        world.step(DT);
    }

    let va = world.body(a).unwrap().velocity();
    let vb = world.body(b).unwrap().velocity();
    assert!((va.x + 10.0).abs() < 0.5, "a should rebound to -10, got {}", va.x);
    assert!((vb.x - 10.0).abs() < 0.5, "b should rebound to +10, got {}", vb.x);
    // Equal masses: momentum stays zero, speeds are preserved
    assert!((va.x + vb.x).abs() < 1e-3);
    assert!(va.y.abs() < 1e-3 && vb.y.abs() < 1e-3);
}

/// A kinematic platform drags a resting box along through friction without
/// receiving any impulse itself.
#[test]
fn test_kinematic_platform_transports_cargo() {
    let mut world = Physics2DWorld::new();

    let platform = world.add_body(Rigidbody2D::kinematic(), at(0.0, 20.0));
    world
        .attach_collider(platform, Collider2D::new_box(Vector2::new(400.0, 20.0)))
        .unwrap();
    world
        .body_mut(platform)
        .unwrap()
        .set_velocity(Vector2::new(30.0, 0.0));

    let cargo = world.add_body(Rigidbody2D::dynamic(), at(0.0, -1.0));
    world
        .attach_collider(cargo, Collider2D::new_box(Vector2::new(20.0, 20.0)))
        .unwrap();

    for _ in 0..60 {
        world.step(DT);
    }

    // Friction accelerates the cargo toward the platform's speed
    let cargo_velocity = world.body(cargo).unwrap().velocity();
    assert!(
        cargo_velocity.x > 10.0,
        "cargo should be dragged along, vx = {}",
        cargo_velocity.x
    );
    // The platform is immovable by contacts: velocity exactly as assigned
    assert_eq!(
        world.body(platform).unwrap().velocity(),
        Vector2::new(30.0, 0.0)
    );
    assert!(!world.body(cargo).unwrap().velocity().x.is_nan());
}

/// Contacts whose normal opposes gravity mark the dynamic body grounded.
#[test]
fn test_ground_detection() {
    let mut world = Physics2DWorld::new();

    let floor = world.add_body(Rigidbody2D::fixed(), at(0.0, 50.0));
    world
        .attach_collider(floor, Collider2D::new_box(Vector2::new(200.0, 20.0)))
        .unwrap();

    let walker = world.add_body(Rigidbody2D::dynamic(), at(0.0, 10.0));
    world
        .attach_collider(walker, Collider2D::new_box(Vector2::new(10.0, 10.0)))
        .unwrap();

    // Not grounded while airborne
    world.step(DT);
    assert!(!world.body(walker).unwrap().is_grounded());

    // Step until touchdown
    for _ in 0..120 {
        world.step(DT);
        if world.active_collision_count() > 0 {
            break;
        }
    }
    let body = world.body(walker).unwrap();
    assert!(body.is_grounded());
    // Screen coordinates: up is -y
    assert!(body.ground_normal().y < -0.9);
    assert!(body.contact_count() >= 1);
}

/// A wall contact (normal perpendicular to gravity) does not count as
/// ground support.
#[test]
fn test_side_contact_is_not_ground() {
    let mut world = Physics2DWorld::new();

    let wall = world.add_body(Rigidbody2D::fixed(), at(30.0, 0.0));
    world
        .attach_collider(wall, Collider2D::new_box(Vector2::new(20.0, 200.0)))
        .unwrap();

    let mover = world.add_body(Rigidbody2D::dynamic(), at(0.0, 0.0));
    world
        .attach_collider(mover, Collider2D::new_box(Vector2::new(10.0, 10.0)))
        .unwrap();
    // No gravity pull into the wall, so disable gravity influence and push
    // the mover sideways
    world.body_mut(mover).unwrap().gravity_scale = 0.0;
    world
        .body_mut(mover)
        .unwrap()
        .set_velocity(Vector2::new(120.0, 0.0));

    let mut touched = false;
    for _ in 0..60 {
        world.step(DT);
        if world.active_collision_count() > 0 {
            touched = true;
            assert!(!world.body(mover).unwrap().is_grounded());
        }
    }
    assert!(touched, "mover never reached the wall");
}
