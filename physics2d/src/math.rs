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
//! 2D vector math primitives
//!
//! This module provides the value types the rest of the crate is built on:
//! [`Vector2`] for positions, velocities and forces, [`Transform2D`] as the
//! narrow interface to the scene graph, and [`Bounds2D`] for axis-aligned
//! bounding boxes used by the broad phase.
//!
//! All types are `Copy` value types. Operations return new instances except
//! for the explicit `*Assign` operator overloads.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector with single-precision components
///
/// # Examples
///
/// ```
/// use physics2d::math::Vector2;
///
/// let v = Vector2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert_eq!(v + Vector2::new(1.0, 1.0), Vector2::new(4.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector2 {
    /// The zero vector
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    /// The vector (1, 1)
    pub const ONE: Vector2 = Vector2 { x: 1.0, y: 1.0 };
    /// The canonical up direction, used as the fallback normal for
    /// degenerate geometry
    pub const UP: Vector2 = Vector2 { x: 0.0, y: 1.0 };
    /// Unit vector along the x axis
    pub const RIGHT: Vector2 = Vector2 { x: 1.0, y: 0.0 };

    /// Create a new vector with the given components
    pub const fn new(x: f32, y: f32) -> Self {
        Vector2 { x, y }
    }

    /// Dot product of two vectors
    pub fn dot(&self, other: Vector2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product, returning the scalar z component
    ///
    /// Positive when `other` is counter-clockwise from `self`.
    pub fn cross(&self, other: Vector2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// The vector rotated 90 degrees counter-clockwise
    pub fn perp(&self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }

    /// Squared length of the vector
    ///
    /// Cheaper than [`length`](Self::length); prefer it for comparisons.
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude) of the vector
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// The vector scaled to unit length
    ///
    /// The zero vector (and vectors short enough that normalization would
    /// not be meaningful) normalizes to zero. Callers that need a direction
    /// for degenerate input fall back to [`Vector2::UP`].
    pub fn normalized(&self) -> Vector2 {
        let len_sq = self.length_squared();
        if len_sq <= f32::EPSILON * f32::EPSILON {
            return Vector2::ZERO;
        }
        *self / len_sq.sqrt()
    }

    /// Distance between two points
    pub fn distance(&self, other: Vector2) -> f32 {
        (*self - other).length()
    }

    /// The vector rotated by `angle` radians (counter-clockwise)
    ///
    /// # Examples
    ///
    /// ```
    /// use physics2d::math::Vector2;
    ///
    /// let v = Vector2::RIGHT.rotated(std::f32::consts::FRAC_PI_2);
    /// assert!((v.x - 0.0).abs() < 1e-6);
    /// assert!((v.y - 1.0).abs() < 1e-6);
    /// ```
    pub fn rotated(&self, angle: f32) -> Vector2 {
        let (sin, cos) = angle.sin_cos();
        Vector2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Linear interpolation from `self` to `other` by `t`
    ///
    /// `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: Vector2, t: f32) -> Vector2 {
        let t = t.clamp(0.0, 1.0);
        *self + (other - *self) * t
    }

    /// Component-wise clamp between `min` and `max`
    pub fn clamp(&self, min: Vector2, max: Vector2) -> Vector2 {
        Vector2::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }

    /// Component-wise scale by another vector
    pub fn scale(&self, other: Vector2) -> Vector2 {
        Vector2::new(self.x * other.x, self.y * other.y)
    }

    /// Check that both components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector2> for f32 {
    type Output = Vector2;
    fn mul(self, rhs: Vector2) -> Vector2 {
        rhs * self
    }
}

impl MulAssign<f32> for Vector2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vector2 {
    type Output = Vector2;
    fn div(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position, rotation and scale of a body
///
/// The scene graph owns the authoritative transform of each game object;
/// the physics world holds a copy per registered body, reads it before
/// integration and writes it back afterwards. Rotation is in radians,
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// World position
    pub position: Vector2,
    /// Rotation in radians
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vector2,
}

impl Transform2D {
    /// Create a transform at the given position with no rotation and unit scale
    pub fn at(position: Vector2) -> Self {
        Transform2D {
            position,
            rotation: 0.0,
            scale: Vector2::ONE,
        }
    }

    /// Check that all fields are finite
    pub fn is_valid(&self) -> bool {
        self.position.is_valid() && self.rotation.is_finite() && self.scale.is_valid()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Transform2D::at(Vector2::ZERO)
    }
}

/// An axis-aligned bounding box
///
/// Stored as min/max corners. Used by colliders as the cached world-space
/// bounds and by the broad phase as the cheap overlap pre-filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    /// Minimum corner
    pub min: Vector2,
    /// Maximum corner
    pub max: Vector2,
}

impl Bounds2D {
    /// Create bounds from min/max corners
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Bounds2D { min, max }
    }

    /// Create bounds from a center point and half-extents
    pub fn from_center_extents(center: Vector2, extents: Vector2) -> Self {
        Bounds2D {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Center of the bounds
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    /// Half-extents of the bounds
    pub fn extents(&self) -> Vector2 {
        (self.max - self.min) * 0.5
    }

    /// Check whether two bounds overlap (touching counts as overlapping)
    pub fn overlaps(&self, other: &Bounds2D) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Check whether a point lies inside the bounds (inclusive)
    pub fn contains_point(&self, point: Vector2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// The bounds grown by `amount` on every side
    pub fn expanded(&self, amount: f32) -> Bounds2D {
        let pad = Vector2::new(amount, amount);
        Bounds2D {
            min: self.min - pad,
            max: self.max + pad,
        }
    }
}
