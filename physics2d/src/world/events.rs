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
//! Collision and trigger events
//!
//! Each step the world diffs the current contact pair set against the
//! previous step's to classify every pair as Enter, Stay or Exit. Solid
//! and trigger pair sets are tracked independently, so a collider toggling
//! its trigger flag produces a clean Exit/Enter rather than a phantom Stay.
//!
//! Events are buffered while the step runs and fanned out to listeners
//! only after the world's state is consistent, so a listener that removes
//! a body cannot corrupt the step in progress. Exit events carry the
//! last-known handles; one or both may already be stale if the body was
//! destroyed this step.

use crate::handle::BodyHandle;
use crate::math::Vector2;

/// A single contact point produced by the narrow phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint2D {
    /// World-space contact point
    pub point: Vector2,
    /// Unit contact normal, pointing from the first body toward the second
    pub normal: Vector2,
    /// Penetration depth along the normal
    pub depth: f32,
}

/// A resolved solid contact between two bodies
///
/// Transient per-step value; rebuilt from scratch every step and never
/// stored across steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision2D {
    /// First body of the pair
    pub body_a: BodyHandle,
    /// Second body of the pair
    pub body_b: BodyHandle,
    /// Contact geometry, normal oriented `body_a` toward `body_b`
    pub contact: ContactPoint2D,
    /// Relative velocity `v_b - v_a` at the moment of contact
    pub relative_velocity: Vector2,
    /// Magnitude of the normal impulse applied during resolution
    pub normal_impulse: f32,
    /// Magnitude of the friction impulse applied during resolution
    pub tangent_impulse: f32,
}

/// A buffered physics event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// A solid pair started touching this step
    CollisionEnter(Collision2D),
    /// A solid pair kept touching this step
    CollisionStay(Collision2D),
    /// A solid pair stopped touching this step
    CollisionExit {
        /// Last-known handle of the first body
        body_a: BodyHandle,
        /// Last-known handle of the second body
        body_b: BodyHandle,
    },
    /// A trigger pair started overlapping this step
    TriggerEnter {
        /// First body of the pair
        body_a: BodyHandle,
        /// Second body of the pair
        body_b: BodyHandle,
    },
    /// A trigger pair kept overlapping this step
    TriggerStay {
        /// First body of the pair
        body_a: BodyHandle,
        /// Second body of the pair
        body_b: BodyHandle,
    },
    /// A trigger pair stopped overlapping this step
    TriggerExit {
        /// Last-known handle of the first body
        body_a: BodyHandle,
        /// Last-known handle of the second body
        body_b: BodyHandle,
    },
}

/// Receiver for buffered physics events
///
/// All methods default to no-ops so a listener implements only the
/// notifications it cares about. Listeners are invoked after the step
/// completes, once the world's state is consistent.
pub trait PhysicsListener {
    /// A solid pair started touching
    fn on_collision_enter(&mut self, _collision: &Collision2D) {}
    /// A solid pair kept touching
    fn on_collision_stay(&mut self, _collision: &Collision2D) {}
    /// A solid pair stopped touching
    fn on_collision_exit(&mut self, _body_a: BodyHandle, _body_b: BodyHandle) {}
    /// A trigger pair started overlapping
    fn on_trigger_enter(&mut self, _body_a: BodyHandle, _body_b: BodyHandle) {}
    /// A trigger pair kept overlapping
    fn on_trigger_stay(&mut self, _body_a: BodyHandle, _body_b: BodyHandle) {}
    /// A trigger pair stopped overlapping
    fn on_trigger_exit(&mut self, _body_a: BodyHandle, _body_b: BodyHandle) {}
}

/// Canonically ordered body pair used as a set key
///
/// Ordering the handles makes `(a, b)` and `(b, a)` the same key, so pair
/// identity survives broad-phase discovery order changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PairKey {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl PairKey {
    pub fn new(x: BodyHandle, y: BodyHandle) -> Self {
        if x <= y {
            PairKey { a: x, b: y }
        } else {
            PairKey { a: y, b: x }
        }
    }
}
