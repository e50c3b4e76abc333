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
//! Rigid body dynamics state
//!
//! A [`Rigidbody2D`] holds the per-body simulation state: mass, drag,
//! velocities, force/torque accumulators, constraint freezes and the
//! sleep lifecycle. Motion is integrated with semi-implicit Euler
//! (`v' = v + a·dt`, then `p' = p + v'·dt`), which is more stable than
//! explicit Euler for game simulations.
//!
//! Bodies never touch their own transform directly; the world feeds the
//! transform through [`Rigidbody2D::integrate_transform`] so the scene
//! graph remains the single authority on placement.

use crate::math::{Transform2D, Vector2};

/// How a body participates in simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// Fully simulated: integrates forces, receives collision impulses
    #[default]
    Dynamic,
    /// Moves only via explicit position/velocity assignment; exerts full
    /// collision influence on dynamic bodies without receiving any
    Kinematic,
    /// Never moves; reports infinite mass
    Static,
}

/// Unit and timing semantics of a force application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Accumulated; integrated as `a = F/m` on the next step (mass-dependent)
    Force,
    /// Immediate `v += f / m`; wakes the body (mass-dependent)
    Impulse,
    /// Accumulated pre-multiplied by mass, so the resulting acceleration is
    /// mass-independent
    Acceleration,
    /// Immediate `v += f`; wakes the body (mass-independent)
    VelocityChange,
}

/// Per-body dynamics state
///
/// # Examples
///
/// ```
/// use physics2d::body::{BodyType, ForceMode, Rigidbody2D};
/// use physics2d::math::Vector2;
///
/// let mut body = Rigidbody2D::new(BodyType::Dynamic);
/// body.add_force(Vector2::new(0.0, 10.0), ForceMode::Impulse);
/// assert_eq!(body.velocity(), Vector2::new(0.0, 10.0));
/// ```
#[derive(Debug, Clone)]
pub struct Rigidbody2D {
    body_type: BodyType,
    mass: f32,
    inertia: f32,
    drag: f32,
    angular_drag: f32,
    /// Multiplier on the world's gravity for this body
    pub gravity_scale: f32,
    /// Suppress all rotation (torque is ignored, angular velocity frozen)
    pub freeze_rotation: bool,
    /// Suppress motion along the world x axis
    pub freeze_position_x: bool,
    /// Suppress motion along the world y axis
    pub freeze_position_y: bool,
    velocity: Vector2,
    angular_velocity: f32,
    forces: Vector2,
    torque: f32,
    sleeping: bool,
    sleep_timer: f32,
    /// Speed below which the body is considered still, in units/s
    pub sleep_velocity_threshold: f32,
    /// Seconds the body must stay still before falling asleep
    pub sleep_time_threshold: f32,
    pub(crate) contact_count: u32,
    pub(crate) grounded: bool,
    pub(crate) ground_normal: Vector2,
}

impl Rigidbody2D {
    /// Minimum body mass; `set_mass` clamps below this to keep `1/m` finite
    pub const MIN_MASS: f32 = 0.1;

    /// Create a body of the given type with unit mass and no damping
    pub fn new(body_type: BodyType) -> Self {
        Rigidbody2D {
            body_type,
            mass: 1.0,
            inertia: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            gravity_scale: 1.0,
            freeze_rotation: false,
            freeze_position_x: false,
            freeze_position_y: false,
            velocity: Vector2::ZERO,
            angular_velocity: 0.0,
            forces: Vector2::ZERO,
            torque: 0.0,
            sleeping: false,
            sleep_timer: 0.0,
            sleep_velocity_threshold: 0.5,
            sleep_time_threshold: 0.5,
            contact_count: 0,
            grounded: false,
            ground_normal: Vector2::ZERO,
        }
    }

    /// Shorthand for a dynamic body
    pub fn dynamic() -> Self {
        Rigidbody2D::new(BodyType::Dynamic)
    }

    /// Shorthand for a kinematic body
    pub fn kinematic() -> Self {
        Rigidbody2D::new(BodyType::Kinematic)
    }

    /// Shorthand for a static body
    pub fn fixed() -> Self {
        Rigidbody2D::new(BodyType::Static)
    }

    /// The body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Change the body type
    ///
    /// Switching to Static zeroes velocities and clears the sleep state,
    /// since the concept does not apply to static bodies.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        if body_type == BodyType::Static {
            self.velocity = Vector2::ZERO;
            self.angular_velocity = 0.0;
            self.sleeping = false;
            self.sleep_timer = 0.0;
        }
    }

    /// The body's mass; Static bodies report infinity
    pub fn mass(&self) -> f32 {
        if self.body_type == BodyType::Static {
            f32::INFINITY
        } else {
            self.mass
        }
    }

    /// Set the mass, clamped to [`MIN_MASS`](Self::MIN_MASS)
    ///
    /// Inertia scales with the mass so an attached shape keeps its
    /// distribution.
    pub fn set_mass(&mut self, mass: f32) {
        let mass = if mass.is_finite() { mass } else { Self::MIN_MASS };
        let clamped = mass.max(Self::MIN_MASS);
        self.inertia *= clamped / self.mass;
        self.mass = clamped;
    }

    /// Inverse mass used by the resolver
    ///
    /// Zero for Static and Kinematic bodies, which makes them immovable by
    /// impulses while still contributing velocity to contacts.
    pub fn inverse_mass(&self) -> f32 {
        match self.body_type {
            BodyType::Dynamic => 1.0 / self.mass,
            BodyType::Kinematic | BodyType::Static => 0.0,
        }
    }

    /// Rotational inertia about the center of mass
    pub fn inertia(&self) -> f32 {
        if self.body_type == BodyType::Static {
            f32::INFINITY
        } else {
            self.inertia
        }
    }

    /// Set the rotational inertia; non-positive or non-finite values are
    /// clamped to a small minimum
    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia = if inertia.is_finite() {
            inertia.max(1e-4)
        } else {
            self.mass
        };
    }

    /// Inverse inertia; zero for Static/Kinematic bodies and frozen rotation
    pub fn inverse_inertia(&self) -> f32 {
        if self.freeze_rotation {
            return 0.0;
        }
        match self.body_type {
            BodyType::Dynamic => 1.0 / self.inertia,
            BodyType::Kinematic | BodyType::Static => 0.0,
        }
    }

    /// Linear drag coefficient
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Set the linear drag coefficient, clamped to `>= 0`
    pub fn set_drag(&mut self, drag: f32) {
        self.drag = drag.max(0.0);
    }

    /// Angular drag coefficient
    pub fn angular_drag(&self) -> f32 {
        self.angular_drag
    }

    /// Set the angular drag coefficient, clamped to `[0, 1]`
    pub fn set_angular_drag(&mut self, angular_drag: f32) {
        self.angular_drag = angular_drag.clamp(0.0, 1.0);
    }

    /// Current linear velocity
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Assign the linear velocity, waking the body
    ///
    /// Ignored for Static bodies. Non-finite input is rejected with a
    /// warning.
    pub fn set_velocity(&mut self, velocity: Vector2) {
        if self.body_type == BodyType::Static {
            return;
        }
        if !velocity.is_valid() {
            log::warn!("ignoring non-finite velocity assignment {velocity:?}");
            return;
        }
        self.velocity = velocity;
        self.wake();
    }

    /// Current angular velocity in radians/s
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Assign the angular velocity, waking the body
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if self.body_type == BodyType::Static {
            return;
        }
        if !angular_velocity.is_finite() {
            log::warn!("ignoring non-finite angular velocity assignment");
            return;
        }
        self.angular_velocity = angular_velocity;
        self.wake();
    }

    /// Apply a force under the given mode
    ///
    /// Static and Kinematic bodies ignore all force calls. Any accepted
    /// call wakes a sleeping body. Non-finite input is rejected with a
    /// warning rather than poisoning the accumulator.
    pub fn add_force(&mut self, force: Vector2, mode: ForceMode) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        if !force.is_valid() {
            log::warn!("ignoring non-finite force {force:?}");
            return;
        }
        match mode {
            ForceMode::Force => self.forces += force,
            ForceMode::Acceleration => self.forces += force * self.mass,
            ForceMode::Impulse => self.velocity += force * self.inverse_mass(),
            ForceMode::VelocityChange => self.velocity += force,
        }
        self.wake();
    }

    /// Apply a torque under the given mode
    ///
    /// No-op when rotation is frozen or the body is not Dynamic.
    pub fn add_torque(&mut self, torque: f32, mode: ForceMode) {
        if self.body_type != BodyType::Dynamic || self.freeze_rotation {
            return;
        }
        if !torque.is_finite() {
            log::warn!("ignoring non-finite torque");
            return;
        }
        match mode {
            ForceMode::Force => self.torque += torque,
            ForceMode::Acceleration => self.torque += torque * self.inertia,
            ForceMode::Impulse => self.angular_velocity += torque * self.inverse_inertia(),
            ForceMode::VelocityChange => self.angular_velocity += torque,
        }
        self.wake();
    }

    /// Apply a force at a world-space point, deriving torque from the lever
    /// arm about `center` (the body's world position)
    pub fn add_force_at_position(
        &mut self,
        force: Vector2,
        position: Vector2,
        center: Vector2,
        mode: ForceMode,
    ) {
        self.add_force(force, mode);
        if !self.freeze_rotation {
            let lever = position - center;
            self.add_torque(lever.cross(force), mode);
        }
    }

    /// Apply a resolver impulse directly to the velocity
    ///
    /// Wakes a sleeping receiver but leaves an awake body's sleep timer
    /// untouched, so a body held at rest by contact impulses can still
    /// fall asleep.
    pub(crate) fn apply_contact_impulse(&mut self, delta: Vector2) {
        if self.sleeping {
            self.wake();
        }
        self.velocity += delta;
    }

    /// Whether the body is asleep
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Seconds the body has currently been below the sleep thresholds
    pub fn sleep_timer(&self) -> f32 {
        self.sleep_timer
    }

    /// Wake the body, resetting the sleep timer
    ///
    /// Static bodies have no sleep lifecycle; this is a no-op for them.
    pub fn wake(&mut self) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// Force the body to sleep immediately, zeroing its velocities
    pub fn sleep(&mut self) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        self.sleeping = true;
        self.sleep_timer = self.sleep_time_threshold;
        self.velocity = Vector2::ZERO;
        self.angular_velocity = 0.0;
    }

    /// Number of contacts involving this body during the last step
    pub fn contact_count(&self) -> u32 {
        self.contact_count
    }

    /// Whether the body rested on an upward-facing contact last step
    ///
    /// Rederived every step from fresh contacts; not persisted.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Normal of the supporting contact, valid when
    /// [`is_grounded`](Self::is_grounded) is true
    pub fn ground_normal(&self) -> Vector2 {
        self.ground_normal
    }

    /// Accumulate forces into velocity and apply drag
    ///
    /// Called once per step by the world before position integration.
    /// Sleeping and non-Dynamic bodies only have their accumulators
    /// cleared.
    pub fn integrate_forces(&mut self, gravity: Vector2, dt: f32) {
        if self.body_type != BodyType::Dynamic || self.sleeping {
            self.forces = Vector2::ZERO;
            self.torque = 0.0;
            return;
        }

        let acceleration = self.forces * self.inverse_mass() + gravity * self.gravity_scale;
        self.velocity += acceleration * dt;
        self.angular_velocity += self.torque * self.inverse_inertia() * dt;

        // Linear drag acts as an opposing force proportional to velocity;
        // angular drag decays exponentially
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.angular_velocity *= (1.0 - self.angular_drag).max(0.0).powf(dt);

        self.forces = Vector2::ZERO;
        self.torque = 0.0;
    }

    /// Advance the sleep timer and transition to sleeping when due
    pub fn update_sleep(&mut self, dt: f32) {
        if self.body_type != BodyType::Dynamic || self.sleeping {
            return;
        }
        let still = self.velocity.length() < self.sleep_velocity_threshold
            && self.angular_velocity.abs() < self.sleep_velocity_threshold;
        if still {
            self.sleep_timer += dt;
            if self.sleep_timer >= self.sleep_time_threshold {
                self.sleeping = true;
                self.velocity = Vector2::ZERO;
                self.angular_velocity = 0.0;
            }
        } else {
            self.sleep_timer = 0.0;
        }
    }

    /// Integrate the owning transform from current velocities
    ///
    /// Dynamic bodies honor the per-axis freeze flags; Kinematic bodies
    /// advance by their explicitly assigned velocity; Static and sleeping
    /// bodies do not move.
    pub fn integrate_transform(&self, transform: &mut Transform2D, dt: f32) {
        match self.body_type {
            BodyType::Static => {}
            BodyType::Kinematic => {
                transform.position += self.velocity * dt;
                transform.rotation += self.angular_velocity * dt;
            }
            BodyType::Dynamic => {
                if self.sleeping {
                    return;
                }
                let mut delta = self.velocity * dt;
                if self.freeze_position_x {
                    delta.x = 0.0;
                }
                if self.freeze_position_y {
                    delta.y = 0.0;
                }
                transform.position += delta;
                if !self.freeze_rotation {
                    transform.rotation += self.angular_velocity * dt;
                }
            }
        }
    }
}

impl Default for Rigidbody2D {
    fn default() -> Self {
        Rigidbody2D::dynamic()
    }
}
