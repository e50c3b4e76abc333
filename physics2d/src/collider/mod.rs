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
//! Colliders and collision geometry
//!
//! A [`Collider2D`] attaches a shape to a rigid body: a box or a circle,
//! offset from the body's transform, with a material, a trigger flag and a
//! layer/mask pair for filtering. The shape set is a closed enum so the
//! narrow phase can dispatch with an exhaustive double-match instead of
//! open-ended virtual dispatch.
//!
//! The collider caches its world-space axis-aligned bounds. The cache is
//! invalidated when the shape, offset or owning transform changes and is
//! recomputed lazily on the next access — never implicitly stale beyond one
//! invalidation.

mod narrow;
mod raycast;

pub use narrow::{compute_separation, overlaps, Separation};
pub use raycast::{raycast_shape, RaycastHit2D};

use crate::material::PhysicsMaterial2D;
use crate::math::{Bounds2D, Transform2D, Vector2};

/// Smallest allowed box side or circle radius; smaller values are clamped
pub const MIN_SHAPE_EXTENT: f32 = 0.01;

/// Collision shape variants
///
/// The set is fixed and small by design (spec'd narrow phase covers
/// box-box, box-circle and circle-circle), so new shapes are a deliberate
/// API change rather than a trait impl.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned (in local space) rectangle with full side lengths `size`
    Box {
        /// Full width and height in local units
        size: Vector2,
    },
    /// Circle with the given local radius
    Circle {
        /// Radius in local units
        radius: f32,
    },
}

/// A collider's shape resolved into world space
///
/// All narrow-phase math, bounds computation and ray tests run against
/// this resolved form so the transform is applied in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    /// Oriented box in world space
    Box {
        /// World-space center
        center: Vector2,
        /// Half side lengths after scaling
        half_extents: Vector2,
        /// World rotation in radians
        rotation: f32,
    },
    /// Circle in world space
    Circle {
        /// World-space center
        center: Vector2,
        /// Radius after scaling
        radius: f32,
    },
}

impl WorldShape {
    /// World-space center of the shape
    pub fn center(&self) -> Vector2 {
        match *self {
            WorldShape::Box { center, .. } => center,
            WorldShape::Circle { center, .. } => center,
        }
    }

    /// Tight axis-aligned bounds of the shape
    pub fn bounds(&self) -> Bounds2D {
        match *self {
            WorldShape::Circle { center, radius } => {
                Bounds2D::from_center_extents(center, Vector2::new(radius, radius))
            }
            WorldShape::Box {
                center,
                half_extents,
                rotation,
            } => {
                // Project the rotated half-extents onto the world axes
                let (sin, cos) = rotation.sin_cos();
                let ex = half_extents.x * cos.abs() + half_extents.y * sin.abs();
                let ey = half_extents.x * sin.abs() + half_extents.y * cos.abs();
                Bounds2D::from_center_extents(center, Vector2::new(ex, ey))
            }
        }
    }

    /// Whether a world-space point lies on or inside the shape
    pub fn contains_point(&self, point: Vector2) -> bool {
        match *self {
            WorldShape::Circle { center, radius } => {
                (point - center).length_squared() <= radius * radius
            }
            WorldShape::Box {
                center,
                half_extents,
                rotation,
            } => {
                let local = (point - center).rotated(-rotation);
                local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y
            }
        }
    }

    /// The closest point on or inside the shape to a world-space point
    pub fn closest_point(&self, point: Vector2) -> Vector2 {
        match *self {
            WorldShape::Circle { center, radius } => {
                let to_point = point - center;
                if to_point.length_squared() <= radius * radius {
                    point
                } else {
                    // Degenerate direction falls back to the canonical up axis
                    let dir = to_point.normalized();
                    let dir = if dir == Vector2::ZERO { Vector2::UP } else { dir };
                    center + dir * radius
                }
            }
            WorldShape::Box {
                center,
                half_extents,
                rotation,
            } => {
                let local = (point - center).rotated(-rotation);
                let clamped = local.clamp(-half_extents, half_extents);
                center + clamped.rotated(rotation)
            }
        }
    }

    /// The two local axes of a box in world space, or `None` for circles
    pub(crate) fn box_axes(&self) -> Option<(Vector2, Vector2)> {
        match *self {
            WorldShape::Box { rotation, .. } => {
                let u = Vector2::RIGHT.rotated(rotation);
                Some((u, u.perp()))
            }
            WorldShape::Circle { .. } => None,
        }
    }
}

/// A shape attached to a rigid body
///
/// # Examples
///
/// ```
/// use physics2d::collider::Collider2D;
/// use physics2d::math::{Transform2D, Vector2};
///
/// let mut collider = Collider2D::new_box(Vector2::new(2.0, 2.0));
/// let transform = Transform2D::at(Vector2::new(10.0, 0.0));
/// let bounds = collider.bounds(&transform);
/// assert_eq!(bounds.center(), Vector2::new(10.0, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Collider2D {
    shape: Shape,
    offset: Vector2,
    /// Triggers detect overlap but produce no physical response
    pub is_trigger: bool,
    /// Surface material used when resolving contacts
    pub material: PhysicsMaterial2D,
    layer: u32,
    /// Bit mask of layers this collider is willing to touch
    pub layer_mask: u32,
    /// Disabled colliders are skipped by the broad phase and by queries
    pub enabled: bool,
    cached_bounds: Bounds2D,
    bounds_dirty: bool,
}

impl Collider2D {
    /// Create a box collider with the given full side lengths
    ///
    /// Sides smaller than [`MIN_SHAPE_EXTENT`] are clamped.
    pub fn new_box(size: Vector2) -> Self {
        Collider2D::with_shape(Shape::Box {
            size: Vector2::new(size.x.max(MIN_SHAPE_EXTENT), size.y.max(MIN_SHAPE_EXTENT)),
        })
    }

    /// Create a circle collider with the given radius
    ///
    /// Radii smaller than [`MIN_SHAPE_EXTENT`] are clamped.
    pub fn new_circle(radius: f32) -> Self {
        Collider2D::with_shape(Shape::Circle {
            radius: radius.max(MIN_SHAPE_EXTENT),
        })
    }

    fn with_shape(shape: Shape) -> Self {
        Collider2D {
            shape,
            offset: Vector2::ZERO,
            is_trigger: false,
            material: PhysicsMaterial2D::default(),
            layer: 0,
            layer_mask: u32::MAX,
            enabled: true,
            cached_bounds: Bounds2D::new(Vector2::ZERO, Vector2::ZERO),
            bounds_dirty: true,
        }
    }

    /// Builder-style material override
    pub fn with_material(mut self, material: PhysicsMaterial2D) -> Self {
        self.material = material;
        self
    }

    /// Builder-style trigger flag
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Builder-style layer assignment (clamped to `[0, 31]`)
    pub fn on_layer(mut self, layer: u32) -> Self {
        self.set_layer(layer);
        self
    }

    /// The collider's shape
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Replace the shape, invalidating cached bounds
    ///
    /// Degenerate extents are clamped to [`MIN_SHAPE_EXTENT`].
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = match shape {
            Shape::Box { size } => Shape::Box {
                size: Vector2::new(size.x.max(MIN_SHAPE_EXTENT), size.y.max(MIN_SHAPE_EXTENT)),
            },
            Shape::Circle { radius } => Shape::Circle {
                radius: radius.max(MIN_SHAPE_EXTENT),
            },
        };
        self.bounds_dirty = true;
    }

    /// Offset from the owning body's transform, in local units
    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    /// Set the local offset, invalidating cached bounds
    pub fn set_offset(&mut self, offset: Vector2) {
        self.offset = offset;
        self.bounds_dirty = true;
    }

    /// The collision layer this collider lives on, in `[0, 31]`
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Set the collision layer; values above 31 are clamped
    pub fn set_layer(&mut self, layer: u32) {
        self.layer = layer.min(31);
    }

    /// Mark the cached bounds stale
    ///
    /// The world calls this whenever it writes the owning transform.
    pub fn mark_bounds_dirty(&mut self) {
        self.bounds_dirty = true;
    }

    /// Whether the cached bounds need recomputing
    pub fn bounds_dirty(&self) -> bool {
        self.bounds_dirty
    }

    /// World-space bounds, recomputed only if the cache is stale
    pub fn bounds(&mut self, transform: &Transform2D) -> Bounds2D {
        if self.bounds_dirty {
            self.cached_bounds = self.compute_bounds(transform);
            self.bounds_dirty = false;
        }
        self.cached_bounds
    }

    /// The last cached bounds without recomputation
    pub fn cached_bounds(&self) -> Bounds2D {
        self.cached_bounds
    }

    /// Compute the tight world-space axis-aligned bounds of the shape
    ///
    /// For a circle, rotation is ignored and non-uniform scale uses the
    /// larger scale component. For a box, the result is the AABB of the
    /// rotated rectangle.
    pub fn compute_bounds(&self, transform: &Transform2D) -> Bounds2D {
        self.world_shape(transform).bounds()
    }

    /// Resolve the shape into world space under the owning transform
    pub fn world_shape(&self, transform: &Transform2D) -> WorldShape {
        let center = transform.position + self.offset.scale(transform.scale).rotated(transform.rotation);
        match self.shape {
            Shape::Circle { radius } => WorldShape::Circle {
                center,
                radius: radius * transform.scale.x.abs().max(transform.scale.y.abs()),
            },
            Shape::Box { size } => WorldShape::Box {
                center,
                half_extents: size.scale(transform.scale) * 0.5,
                rotation: transform.rotation,
            },
        }
    }

    /// Whether a world-space point lies on or inside the collider
    pub fn contains_point(&self, transform: &Transform2D, point: Vector2) -> bool {
        self.world_shape(transform).contains_point(point)
    }

    /// The closest point on or inside the collider to a world-space point
    pub fn closest_point(&self, transform: &Transform2D, point: Vector2) -> Vector2 {
        self.world_shape(transform).closest_point(point)
    }

    /// Layer filter between two colliders
    ///
    /// Both sides must admit the other's layer:
    /// `(1 << layer) & other.layer_mask != 0` and vice versa. Note this is
    /// deliberately *not* symmetric by construction — each collider's mask
    /// is consulted against the other's layer.
    pub fn can_collide_with(&self, other: &Collider2D) -> bool {
        (1u32 << self.layer) & other.layer_mask != 0 && (1u32 << other.layer) & self.layer_mask != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_clamping() {
        let c = Collider2D::new_circle(-5.0);
        assert_eq!(c.shape(), Shape::Circle { radius: MIN_SHAPE_EXTENT });

        let b = Collider2D::new_box(Vector2::new(0.0, -1.0));
        assert_eq!(
            b.shape(),
            Shape::Box {
                size: Vector2::new(MIN_SHAPE_EXTENT, MIN_SHAPE_EXTENT)
            }
        );
    }

    #[test]
    fn test_bounds_cache_is_lazy() {
        let mut c = Collider2D::new_box(Vector2::new(2.0, 4.0));
        let t = Transform2D::at(Vector2::new(1.0, 1.0));
        assert!(c.bounds_dirty());

        let b = c.bounds(&t);
        assert!(!c.bounds_dirty());
        assert_eq!(b.center(), Vector2::new(1.0, 1.0));
        assert_eq!(b.extents(), Vector2::new(1.0, 2.0));

        // Mutating the offset marks the cache stale; the cached value is
        // untouched until the next access
        c.set_offset(Vector2::new(5.0, 0.0));
        assert!(c.bounds_dirty());
        assert_eq!(c.cached_bounds(), b);

        let b2 = c.bounds(&t);
        assert_eq!(b2.center(), Vector2::new(6.0, 1.0));
    }

    #[test]
    fn test_rotated_box_bounds() {
        let c = Collider2D::new_box(Vector2::new(2.0, 2.0));
        let mut t = Transform2D::at(Vector2::ZERO);
        t.rotation = std::f32::consts::FRAC_PI_4;

        // A unit half-extent box rotated 45 degrees spans sqrt(2) per axis
        let b = c.compute_bounds(&t);
        let expected = 2.0f32.sqrt();
        assert!((b.extents().x - expected).abs() < 1e-5);
        assert!((b.extents().y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_circle_bounds_ignore_rotation_use_max_scale() {
        let c = Collider2D::new_circle(2.0);
        let mut t = Transform2D::at(Vector2::ZERO);
        t.rotation = 1.3;
        t.scale = Vector2::new(1.0, 3.0);

        let b = c.compute_bounds(&t);
        assert_eq!(b.extents(), Vector2::new(6.0, 6.0));
    }

    #[test]
    fn test_contains_and_closest_point() {
        let c = Collider2D::new_box(Vector2::new(4.0, 2.0));
        let t = Transform2D::at(Vector2::ZERO);

        assert!(c.contains_point(&t, Vector2::new(1.9, 0.9)));
        assert!(!c.contains_point(&t, Vector2::new(2.1, 0.0)));

        let p = c.closest_point(&t, Vector2::new(10.0, 0.0));
        assert_eq!(p, Vector2::new(2.0, 0.0));

        // Points inside map to themselves
        let inside = Vector2::new(0.5, 0.5);
        assert_eq!(c.closest_point(&t, inside), inside);

        let circle = Collider2D::new_circle(1.0);
        let q = circle.closest_point(&t, Vector2::new(3.0, 0.0));
        assert!((q.x - 1.0).abs() < 1e-6);
        assert!(q.y.abs() < 1e-6);
    }

    #[test]
    fn test_layer_clamped() {
        let mut c = Collider2D::new_circle(1.0);
        c.set_layer(99);
        assert_eq!(c.layer(), 31);
    }

    #[test]
    fn test_layer_filter_is_bidirectional_and() {
        let mut a = Collider2D::new_circle(1.0);
        let mut b = Collider2D::new_circle(1.0);
        a.set_layer(1);
        b.set_layer(2);

        // Both masks admit everything by default
        assert!(a.can_collide_with(&b));
        assert!(b.can_collide_with(&a));

        // a stops admitting layer 2: both orderings now fail, because the
        // check is an AND over both masks
        a.layer_mask = !(1 << 2);
        assert!(!a.can_collide_with(&b));
        assert!(!b.can_collide_with(&a));
    }

    #[test]
    fn test_offset_scales_and_rotates_with_transform() {
        let mut c = Collider2D::new_circle(1.0);
        c.set_offset(Vector2::new(1.0, 0.0));
        let mut t = Transform2D::at(Vector2::ZERO);
        t.rotation = std::f32::consts::FRAC_PI_2;
        t.scale = Vector2::new(2.0, 2.0);

        match c.world_shape(&t) {
            WorldShape::Circle { center, radius } => {
                assert!((center.x - 0.0).abs() < 1e-6);
                assert!((center.y - 2.0).abs() < 1e-6);
                assert!((radius - 2.0).abs() < 1e-6);
            }
            WorldShape::Box { .. } => panic!("expected circle"),
        }
    }
}
