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
//! # Physics2D
//!
//! A 2D rigid-body physics core for component-based game engines:
//! collision detection, impulse resolution and motion integration behind
//! a small handle-based API.
//!
//! ## Features
//!
//! - **Rigid Bodies**: Dynamic, kinematic and static bodies with force
//!   modes, drag, constraint freezes and a sleep lifecycle
//! - **Colliders**: Box and circle shapes with materials, triggers,
//!   layer filtering and cached bounds
//! - **Resolution**: Impulse-based contact solving with Coulomb friction
//!   and positional correction
//! - **Events**: Buffered collision/trigger enter, stay and exit
//!   notifications diffed across steps
//! - **Queries**: Analytic ray casts against individual colliders or the
//!   whole world
//!
//! ## Example
//!
//! ```rust
//! use physics2d::body::Rigidbody2D;
//! use physics2d::collider::Collider2D;
//! use physics2d::math::{Transform2D, Vector2};
//! use physics2d::world::Physics2DWorld;
//!
//! let mut world = Physics2DWorld::new();
//!
//! let ground = world.add_body(
//!     Rigidbody2D::fixed(),
//!     Transform2D::at(Vector2::new(400.0, 580.0)),
//! );
//! world
//!     .attach_collider(ground, Collider2D::new_box(Vector2::new(800.0, 40.0)))
//!     .unwrap();
//!
//! let crate_box = world.add_body(
//!     Rigidbody2D::dynamic(),
//!     Transform2D::at(Vector2::new(400.0, 100.0)),
//! );
//! world
//!     .attach_collider(crate_box, Collider2D::new_box(Vector2::new(40.0, 40.0)))
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0);
//! }
//! ```

#![warn(missing_docs)]

/// Vectors, transforms and axis-aligned bounds
pub mod math;

/// Surface materials and combine rules
pub mod material;

/// Collision shapes, narrow phase and ray casts
pub mod collider;

/// Rigid body dynamics state
pub mod body;

/// Generation-checked body handles
pub mod handle;

/// The simulation world
pub mod world;

/// Error types
pub mod error;

pub use body::{BodyType, ForceMode, Rigidbody2D};
pub use collider::{Collider2D, RaycastHit2D, Shape};
pub use error::PhysicsError;
pub use handle::BodyHandle;
pub use material::{CombineMode, PhysicsMaterial2D};
pub use math::{Bounds2D, Transform2D, Vector2};
pub use world::{Collision2D, ContactPoint2D, PhysicsEvent, PhysicsListener, Physics2DWorld};
