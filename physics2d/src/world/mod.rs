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
//! The physics world
//!
//! [`Physics2DWorld`] owns every registered body together with its
//! transform and optional collider, and advances the whole simulation one
//! fixed-order step at a time: integration, broad phase over cached
//! bounds, narrow phase, impulse resolution with positional correction,
//! ground detection, then event bookkeeping.
//!
//! The world is a plain owned value; multiple independent worlds can
//! coexist. `step` is single-threaded and runs to completion with no
//! internal sub-stepping, so callers clamp large timesteps themselves.
//! Pair processing follows slot order, which makes a run deterministic
//! for a given insertion sequence.

mod events;

pub use events::{Collision2D, ContactPoint2D, PhysicsEvent, PhysicsListener};

use std::collections::BTreeSet;

use crate::body::{BodyType, Rigidbody2D};
use crate::collider::{compute_separation, Collider2D, RaycastHit2D, Separation, Shape};
use crate::error::PhysicsError;
use crate::handle::{BodyHandle, BodySet};
use crate::material::PhysicsMaterial2D;
use crate::math::{Transform2D, Vector2};
use events::PairKey;

/// Fraction of the remaining penetration removed per step
const CORRECTION_PERCENT: f32 = 0.2;
/// Penetration allowed to persist without correction, damping jitter
const CORRECTION_SLOP: f32 = 0.01;

struct BodyEntry {
    body: Rigidbody2D,
    transform: Transform2D,
    collider: Option<Collider2D>,
}

/// A self-contained 2D physics simulation
///
/// # Examples
///
/// ```
/// use physics2d::body::Rigidbody2D;
/// use physics2d::collider::Collider2D;
/// use physics2d::math::{Transform2D, Vector2};
/// use physics2d::world::Physics2DWorld;
///
/// let mut world = Physics2DWorld::new();
/// let ball = world.add_body(
///     Rigidbody2D::dynamic(),
///     Transform2D::at(Vector2::new(0.0, 100.0)),
/// );
/// world.attach_collider(ball, Collider2D::new_circle(5.0)).unwrap();
///
/// world.step(1.0 / 60.0);
/// assert!(world.transform(ball).unwrap().position.y > 100.0);
/// ```
pub struct Physics2DWorld {
    bodies: BodySet<BodyEntry>,
    gravity: Vector2,
    /// Minimum alignment between a contact normal and the up direction for
    /// the contact to count as ground support
    pub ground_normal_threshold: f32,
    solid_pairs: BTreeSet<PairKey>,
    trigger_pairs: BTreeSet<PairKey>,
    events: Vec<PhysicsEvent>,
    listeners: Vec<Box<dyn PhysicsListener>>,
    active_collisions: usize,
}

impl Physics2DWorld {
    /// Create a world with screen-space gravity `(0, 981)`
    ///
    /// The y axis points down in this convention; the up direction used for
    /// ground detection is derived from gravity, so worlds with y-up
    /// gravity behave the same.
    pub fn new() -> Self {
        Physics2DWorld::with_gravity(Vector2::new(0.0, 981.0))
    }

    /// Create a world with a custom gravity vector
    pub fn with_gravity(gravity: Vector2) -> Self {
        Physics2DWorld {
            bodies: BodySet::new(),
            gravity,
            ground_normal_threshold: 0.5,
            solid_pairs: BTreeSet::new(),
            trigger_pairs: BTreeSet::new(),
            events: Vec::new(),
            listeners: Vec::new(),
            active_collisions: 0,
        }
    }

    /// The world's gravity vector
    pub fn gravity(&self) -> Vector2 {
        self.gravity
    }

    /// Replace the gravity vector
    pub fn set_gravity(&mut self, gravity: Vector2) {
        if !gravity.is_valid() {
            log::warn!("ignoring non-finite gravity {gravity:?}");
            return;
        }
        self.gravity = gravity;
    }

    /// Register a body at the given transform, returning its handle
    pub fn add_body(&mut self, body: Rigidbody2D, transform: Transform2D) -> BodyHandle {
        self.bodies.insert(BodyEntry {
            body,
            transform,
            collider: None,
        })
    }

    /// Unregister a body, invalidating its handle
    ///
    /// Contact pairs involving the body produce Exit events on the next
    /// step, carrying the now-stale handle.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies
            .remove(handle)
            .map(|_| ())
            .ok_or(PhysicsError::InvalidState(handle))
    }

    /// Attach (or replace) the body's collider
    ///
    /// Rotational inertia is rederived from the shape and the body's mass:
    /// `m(w² + h²)/12` for boxes, `mr²/2` for circles.
    pub fn attach_collider(
        &mut self,
        handle: BodyHandle,
        collider: Collider2D,
    ) -> Result<(), PhysicsError> {
        let entry = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidState(handle))?;
        let mass = entry.body.mass();
        let inertia = match collider.shape() {
            Shape::Box { size } => mass * (size.x * size.x + size.y * size.y) / 12.0,
            Shape::Circle { radius } => mass * radius * radius * 0.5,
        };
        entry.body.set_inertia(inertia);
        entry.collider = Some(collider);
        Ok(())
    }

    /// Whether a handle still resolves to a registered body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Shared access to a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Rigidbody2D> {
        self.bodies.get(handle).map(|e| &e.body)
    }

    /// Mutable access to a body
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Rigidbody2D> {
        self.bodies.get_mut(handle).map(|e| &mut e.body)
    }

    /// The body's current transform
    pub fn transform(&self, handle: BodyHandle) -> Option<Transform2D> {
        self.bodies.get(handle).map(|e| e.transform)
    }

    /// Overwrite the body's transform, waking it
    pub fn set_transform(
        &mut self,
        handle: BodyHandle,
        transform: Transform2D,
    ) -> Result<(), PhysicsError> {
        let entry = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidState(handle))?;
        entry.transform = transform;
        entry.body.wake();
        if let Some(collider) = entry.collider.as_mut() {
            collider.mark_bounds_dirty();
        }
        Ok(())
    }

    /// Teleport the body to a position, waking it
    pub fn move_position(
        &mut self,
        handle: BodyHandle,
        position: Vector2,
    ) -> Result<(), PhysicsError> {
        let mut transform = self
            .transform(handle)
            .ok_or(PhysicsError::InvalidState(handle))?;
        transform.position = position;
        self.set_transform(handle, transform)
    }

    /// Rotate the body to an absolute angle, waking it
    pub fn move_rotation(
        &mut self,
        handle: BodyHandle,
        rotation: f32,
    ) -> Result<(), PhysicsError> {
        let mut transform = self
            .transform(handle)
            .ok_or(PhysicsError::InvalidState(handle))?;
        transform.rotation = rotation;
        self.set_transform(handle, transform)
    }

    /// Shared access to a body's collider
    pub fn collider(&self, handle: BodyHandle) -> Option<&Collider2D> {
        self.bodies.get(handle).and_then(|e| e.collider.as_ref())
    }

    /// Mutable access to a body's collider
    pub fn collider_mut(&mut self, handle: BodyHandle) -> Option<&mut Collider2D> {
        self.bodies.get_mut(handle).and_then(|e| e.collider.as_mut())
    }

    /// Register an event listener
    pub fn add_listener(&mut self, listener: Box<dyn PhysicsListener>) {
        self.listeners.push(listener);
    }

    /// Events produced by the most recent step
    ///
    /// The buffer is replaced at the start of the next step.
    pub fn events(&self) -> &[PhysicsEvent] {
        &self.events
    }

    /// Number of solid contacts resolved during the most recent step
    pub fn active_collision_count(&self) -> usize {
        self.active_collisions
    }

    /// Cast a ray and return the globally nearest hit
    ///
    /// Only enabled colliders whose layer is admitted by `layer_mask` are
    /// considered. The hit carries the owning body's handle.
    pub fn raycast(
        &self,
        origin: Vector2,
        direction: Vector2,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<RaycastHit2D> {
        let mut best: Option<RaycastHit2D> = None;
        for (handle, entry) in self.bodies.iter() {
            let Some(collider) = entry.collider.as_ref() else {
                continue;
            };
            if !collider.enabled || (1u32 << collider.layer()) & layer_mask == 0 {
                continue;
            }
            if let Some(mut hit) =
                collider.raycast(&entry.transform, origin, direction, max_distance)
            {
                hit.body = Some(handle);
                if best.map_or(true, |b| hit.distance < b.distance) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Runs the full pipeline in a fixed order and dispatches buffered
    /// events to listeners once the world is consistent. Non-positive or
    /// non-finite timesteps are rejected with a warning.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("ignoring step with invalid dt {dt}");
            return;
        }
        self.events.clear();

        self.integrate(dt);
        self.refresh_bounds();

        let candidates = self.broad_phase();
        let up = self.up_direction();

        let mut current_solid = BTreeSet::new();
        let mut current_trigger = BTreeSet::new();
        let mut collisions = Vec::new();
        for (ha, hb) in candidates {
            let Some((separation, is_trigger, restitution, friction)) =
                self.narrow_phase(ha, hb)
            else {
                continue;
            };
            let key = PairKey::new(ha, hb);
            if is_trigger {
                current_trigger.insert(key);
                continue;
            }
            if let Some(collision) =
                self.resolve_contact(ha, hb, &separation, restitution, friction, up)
            {
                current_solid.insert(key);
                collisions.push(collision);
            }
        }
        self.carry_dormant_pairs(&mut current_solid, &mut current_trigger);

        for (_, entry) in self.bodies.iter_mut() {
            entry.body.update_sleep(dt);
        }

        self.collect_events(&collisions, &current_solid, &current_trigger);
        self.active_collisions = collisions.len();
        self.solid_pairs = current_solid;
        self.trigger_pairs = current_trigger;

        self.dispatch_events();
    }

    /// Up direction for ground checks, opposing gravity
    fn up_direction(&self) -> Vector2 {
        let up = (-self.gravity).normalized();
        if up == Vector2::ZERO {
            Vector2::UP
        } else {
            up
        }
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for (_, entry) in self.bodies.iter_mut() {
            entry.body.integrate_forces(gravity, dt);
            let before = entry.transform;
            entry.body.integrate_transform(&mut entry.transform, dt);
            if entry.transform != before {
                if let Some(collider) = entry.collider.as_mut() {
                    collider.mark_bounds_dirty();
                }
            }
            entry.body.contact_count = 0;
            entry.body.grounded = false;
            entry.body.ground_normal = Vector2::ZERO;
        }
    }

    fn refresh_bounds(&mut self) {
        for (_, entry) in self.bodies.iter_mut() {
            let transform = entry.transform;
            if let Some(collider) = entry.collider.as_mut() {
                if collider.enabled {
                    collider.bounds(&transform);
                }
            }
        }
    }

    /// Collect candidate pairs in slot order
    ///
    /// A pair qualifies when both colliders are enabled, the bodies are
    /// not both Static, at least one participant can currently move (an
    /// awake Dynamic or a Kinematic), the cached bounds overlap and the
    /// layers are mutually compatible.
    fn broad_phase(&self) -> Vec<(BodyHandle, BodyHandle)> {
        let handles = self.bodies.handles();
        let mut candidates = Vec::new();
        for (i, &ha) in handles.iter().enumerate() {
            for &hb in &handles[i + 1..] {
                if self.should_test(ha, hb) {
                    candidates.push((ha, hb));
                }
            }
        }
        candidates
    }

    fn should_test(&self, ha: BodyHandle, hb: BodyHandle) -> bool {
        let (ea, eb) = match (self.bodies.get(ha), self.bodies.get(hb)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        let (ca, cb) = match (ea.collider.as_ref(), eb.collider.as_ref()) {
            (Some(a), Some(b)) if a.enabled && b.enabled => (a, b),
            _ => return false,
        };
        if ea.body.body_type() == BodyType::Static && eb.body.body_type() == BodyType::Static {
            return false;
        }
        if !Self::is_awake_mover(&ea.body) && !Self::is_awake_mover(&eb.body) {
            return false;
        }
        ca.cached_bounds().overlaps(&cb.cached_bounds()) && ca.can_collide_with(cb)
    }

    fn is_awake_mover(body: &Rigidbody2D) -> bool {
        match body.body_type() {
            BodyType::Dynamic => !body.is_sleeping(),
            BodyType::Kinematic => true,
            BodyType::Static => false,
        }
    }

    /// Exact test for one candidate pair
    ///
    /// Returns the separation plus the pair's trigger flag and combined
    /// material coefficients, or `None` when the shapes are disjoint.
    fn narrow_phase(
        &self,
        ha: BodyHandle,
        hb: BodyHandle,
    ) -> Option<(Separation, bool, f32, f32)> {
        let ea = self.bodies.get(ha)?;
        let eb = self.bodies.get(hb)?;
        let ca = ea.collider.as_ref()?;
        let cb = eb.collider.as_ref()?;
        let separation = compute_separation(ca, &ea.transform, cb, &eb.transform)?;
        Some((
            separation,
            ca.is_trigger || cb.is_trigger,
            PhysicsMaterial2D::combine_restitution(&ca.material, &cb.material),
            PhysicsMaterial2D::combine_friction(&ca.material, &cb.material),
        ))
    }

    /// Apply impulses and positional correction for one solid contact
    fn resolve_contact(
        &mut self,
        ha: BodyHandle,
        hb: BodyHandle,
        separation: &Separation,
        restitution: f32,
        friction: f32,
        up: Vector2,
    ) -> Option<Collision2D> {
        let threshold = self.ground_normal_threshold;
        let (ea, eb) = self.bodies.get_pair_mut(ha, hb)?;

        let normal = separation.normal;
        let inv_a = ea.body.inverse_mass();
        let inv_b = eb.body.inverse_mass();
        let inv_sum = inv_a + inv_b;
        let relative_velocity = eb.body.velocity() - ea.body.velocity();
        let approach = relative_velocity.dot(normal);

        let mut normal_impulse = 0.0;
        let mut tangent_impulse = 0.0;
        // Separating contacts get no impulse, only bookkeeping
        if approach < 0.0 && inv_sum > 0.0 {
            let j = -(1.0 + restitution) * approach / inv_sum;
            let impulse = normal * j;
            if inv_a > 0.0 {
                ea.body.apply_contact_impulse(-impulse * inv_a);
            }
            if inv_b > 0.0 {
                eb.body.apply_contact_impulse(impulse * inv_b);
            }
            normal_impulse = j;

            // Coulomb friction against the post-impulse tangential velocity
            let rel = eb.body.velocity() - ea.body.velocity();
            let tangential = rel - normal * rel.dot(normal);
            if tangential.length_squared() > f32::EPSILON {
                let tangent = tangential.normalized();
                let jt = (-rel.dot(tangent) / inv_sum).clamp(-friction * j, friction * j);
                let friction_impulse = tangent * jt;
                if inv_a > 0.0 {
                    ea.body.apply_contact_impulse(-friction_impulse * inv_a);
                }
                if inv_b > 0.0 {
                    eb.body.apply_contact_impulse(friction_impulse * inv_b);
                }
                tangent_impulse = jt.abs();
            }
        }

        // Positional correction keeps resting stacks from sinking; the
        // offset splits by inverse-mass ratio so immovable bodies stay put
        if inv_sum > 0.0 {
            let amount = CORRECTION_PERCENT * (separation.depth - CORRECTION_SLOP).max(0.0);
            if amount > 0.0 {
                let correction = normal * (amount / inv_sum);
                if inv_a > 0.0 {
                    ea.transform.position -= correction * inv_a;
                    if let Some(collider) = ea.collider.as_mut() {
                        collider.mark_bounds_dirty();
                    }
                }
                if inv_b > 0.0 {
                    eb.transform.position += correction * inv_b;
                    if let Some(collider) = eb.collider.as_mut() {
                        collider.mark_bounds_dirty();
                    }
                }
            }
        }

        ea.body.contact_count += 1;
        eb.body.contact_count += 1;

        // Ground support: the normal pushing the body away from the other
        // must oppose gravity closely enough
        let facing_a = -normal;
        if ea.body.body_type() == BodyType::Dynamic && facing_a.dot(up) > threshold {
            ea.body.grounded = true;
            ea.body.ground_normal = facing_a;
        }
        if eb.body.body_type() == BodyType::Dynamic && normal.dot(up) > threshold {
            eb.body.grounded = true;
            eb.body.ground_normal = normal;
        }

        Some(Collision2D {
            body_a: ha,
            body_b: hb,
            contact: ContactPoint2D {
                point: separation.contact,
                normal,
                depth: separation.depth,
            },
            relative_velocity,
            normal_impulse,
            tangent_impulse,
        })
    }

    /// Keep pairs alive whose participants are all asleep
    ///
    /// The broad phase skips pairs with no awake mover, but a sleeping
    /// stack is still in contact; dropping its pairs would fire spurious
    /// Exit events. A skipped pair is carried over while both bodies exist
    /// with enabled, bounds-overlapping, layer-compatible colliders and
    /// nothing in the pair is awake. Carried pairs produce no events.
    fn carry_dormant_pairs(
        &self,
        current_solid: &mut BTreeSet<PairKey>,
        current_trigger: &mut BTreeSet<PairKey>,
    ) {
        for (previous, current) in [
            (&self.solid_pairs, current_solid),
            (&self.trigger_pairs, current_trigger),
        ] {
            for key in previous {
                if !current.contains(key) && self.pair_is_dormant(*key) {
                    current.insert(*key);
                }
            }
        }
    }

    fn pair_is_dormant(&self, key: PairKey) -> bool {
        let (ea, eb) = match (self.bodies.get(key.a), self.bodies.get(key.b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if Self::is_awake_mover(&ea.body) || Self::is_awake_mover(&eb.body) {
            return false;
        }
        let (ca, cb) = match (ea.collider.as_ref(), eb.collider.as_ref()) {
            (Some(a), Some(b)) if a.enabled && b.enabled => (a, b),
            _ => return false,
        };
        ca.cached_bounds().overlaps(&cb.cached_bounds()) && ca.can_collide_with(cb)
    }

    /// Diff current pair sets against the previous step's
    fn collect_events(
        &mut self,
        collisions: &[Collision2D],
        current_solid: &BTreeSet<PairKey>,
        current_trigger: &BTreeSet<PairKey>,
    ) {
        for collision in collisions {
            let key = PairKey::new(collision.body_a, collision.body_b);
            if self.solid_pairs.contains(&key) {
                self.events.push(PhysicsEvent::CollisionStay(*collision));
            } else {
                self.events.push(PhysicsEvent::CollisionEnter(*collision));
            }
        }
        for key in &self.solid_pairs {
            if !current_solid.contains(key) {
                self.events.push(PhysicsEvent::CollisionExit {
                    body_a: key.a,
                    body_b: key.b,
                });
            }
        }

        for key in current_trigger {
            // Dormant carried pairs are present in both sets but produced
            // no narrow-phase work; they stay silent
            if self.pair_is_dormant(*key) {
                continue;
            }
            if self.trigger_pairs.contains(key) {
                self.events.push(PhysicsEvent::TriggerStay {
                    body_a: key.a,
                    body_b: key.b,
                });
            } else {
                self.events.push(PhysicsEvent::TriggerEnter {
                    body_a: key.a,
                    body_b: key.b,
                });
            }
        }
        for key in &self.trigger_pairs {
            if !current_trigger.contains(key) {
                self.events.push(PhysicsEvent::TriggerExit {
                    body_a: key.a,
                    body_b: key.b,
                });
            }
        }
    }

    fn dispatch_events(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.events);
        for listener in &mut self.listeners {
            for event in &events {
                match event {
                    PhysicsEvent::CollisionEnter(c) => listener.on_collision_enter(c),
                    PhysicsEvent::CollisionStay(c) => listener.on_collision_stay(c),
                    PhysicsEvent::CollisionExit { body_a, body_b } => {
                        listener.on_collision_exit(*body_a, *body_b)
                    }
                    PhysicsEvent::TriggerEnter { body_a, body_b } => {
                        listener.on_trigger_enter(*body_a, *body_b)
                    }
                    PhysicsEvent::TriggerStay { body_a, body_b } => {
                        listener.on_trigger_stay(*body_a, *body_b)
                    }
                    PhysicsEvent::TriggerExit { body_a, body_b } => {
                        listener.on_trigger_exit(*body_a, *body_b)
                    }
                }
            }
        }
        // Keep the buffer queryable until the next step
        self.events = events;
    }
}

impl Default for Physics2DWorld {
    fn default() -> Self {
        Physics2DWorld::new()
    }
}
