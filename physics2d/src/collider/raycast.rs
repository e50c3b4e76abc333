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
//! Analytic ray casts against collider shapes
//!
//! Ray-circle solves the quadratic intersection equation and keeps the
//! nearest non-negative root; ray-box runs a slab test in the box's local
//! space. Both return the closest hit only, and fail (return `None`) when
//! there is no intersection, the intersection lies beyond `max_distance`,
//! or it lies behind the ray origin.

use crate::collider::{Collider2D, WorldShape};
use crate::handle::BodyHandle;
use crate::math::{Transform2D, Vector2};

/// Result of a successful ray cast
///
/// Transient per-query value; constructed fresh for each cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit2D {
    /// Body the hit collider is attached to; `None` when the cast was run
    /// against a free-standing collider rather than through the world
    pub body: Option<BodyHandle>,
    /// World-space hit point
    pub point: Vector2,
    /// Surface normal at the hit point
    pub normal: Vector2,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// `distance / max_distance`, in `[0, 1]`
    pub fraction: f32,
}

impl Collider2D {
    /// Cast a ray against this collider
    ///
    /// `direction` does not need to be normalized; a zero direction or a
    /// non-positive `max_distance` yields `None`. A ray starting inside the
    /// shape hits the surface it exits through.
    pub fn raycast(
        &self,
        transform: &Transform2D,
        origin: Vector2,
        direction: Vector2,
        max_distance: f32,
    ) -> Option<RaycastHit2D> {
        raycast_shape(&self.world_shape(transform), origin, direction, max_distance)
    }
}

/// Cast a ray against a resolved world shape
pub fn raycast_shape(
    shape: &WorldShape,
    origin: Vector2,
    direction: Vector2,
    max_distance: f32,
) -> Option<RaycastHit2D> {
    if max_distance <= 0.0 {
        return None;
    }
    let dir = direction.normalized();
    if dir == Vector2::ZERO {
        return None;
    }

    let (distance, normal) = match *shape {
        WorldShape::Circle { center, radius } => ray_circle(origin, dir, center, radius)?,
        WorldShape::Box {
            center,
            half_extents,
            rotation,
        } => {
            // Slab test in the box's local frame, then rotate the normal back
            let local_origin = (origin - center).rotated(-rotation);
            let local_dir = dir.rotated(-rotation);
            let (t, local_normal) = ray_slabs(local_origin, local_dir, half_extents)?;
            (t, local_normal.rotated(rotation))
        }
    };

    if distance > max_distance {
        return None;
    }
    Some(RaycastHit2D {
        body: None,
        point: origin + dir * distance,
        normal,
        distance,
        fraction: distance / max_distance,
    })
}

/// Nearest non-negative intersection of a ray with a circle
fn ray_circle(origin: Vector2, dir: Vector2, center: Vector2, radius: f32) -> Option<(f32, Vector2)> {
    let m = origin - center;
    let b = m.dot(dir);
    let c = m.length_squared() - radius * radius;

    // Ray starts outside and points away
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    // Nearest root first; fall through to the far root when the origin is
    // inside the circle
    let mut t = -b - sqrt_d;
    if t < 0.0 {
        t = -b + sqrt_d;
    }
    if t < 0.0 {
        return None;
    }

    let point = origin + dir * t;
    let normal = (point - center).normalized();
    let normal = if normal == Vector2::ZERO { Vector2::UP } else { normal };
    Some((t, normal))
}

/// Slab intersection of a ray with an axis-aligned box at the origin
fn ray_slabs(origin: Vector2, dir: Vector2, half_extents: Vector2) -> Option<(f32, Vector2)> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut min_normal = Vector2::UP;
    let mut max_normal = Vector2::UP;

    for axis in 0..2 {
        let (o, d, h, unit) = if axis == 0 {
            (origin.x, dir.x, half_extents.x, Vector2::RIGHT)
        } else {
            (origin.y, dir.y, half_extents.y, Vector2::UP)
        };

        if d.abs() < f32::EPSILON {
            // Ray parallel to this slab: misses unless the origin is inside it
            if o.abs() > h {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        // t1 is the time at the -h face, whose outward normal is -unit
        let mut t1 = (-h - o) * inv;
        let mut t2 = (h - o) * inv;
        let mut near_normal = -unit;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            near_normal = -near_normal;
        }
        if t1 > t_min {
            t_min = t1;
            min_normal = near_normal;
        }
        if t2 < t_max {
            t_max = t2;
            max_normal = -near_normal;
        }
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        // Box is entirely behind the ray
        return None;
    }
    if t_min >= 0.0 {
        Some((t_min, min_normal))
    } else {
        // Origin inside the box: report the exit face
        Some((t_max, max_normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn at(x: f32, y: f32) -> Transform2D {
        Transform2D::at(Vector2::new(x, y))
    }

    #[test]
    fn test_ray_circle_direct_hit() {
        let c = Collider2D::new_circle(1.0);
        let hit = c
            .raycast(&at(10.0, 0.0), Vector2::ZERO, Vector2::RIGHT, 20.0)
            .unwrap();
        assert!((hit.distance - 9.0).abs() < EPS);
        assert!((hit.point.x - 9.0).abs() < EPS);
        assert!((hit.normal.x + 1.0).abs() < EPS);
        assert!((hit.fraction - 9.0 / 20.0).abs() < EPS);
        assert!(hit.body.is_none());
    }

    #[test]
    fn test_ray_circle_miss_and_range() {
        let c = Collider2D::new_circle(1.0);
        // Beyond max distance
        assert!(c
            .raycast(&at(10.0, 0.0), Vector2::ZERO, Vector2::RIGHT, 5.0)
            .is_none());
        // Pointing away
        assert!(c
            .raycast(&at(10.0, 0.0), Vector2::ZERO, -Vector2::RIGHT, 50.0)
            .is_none());
        // Offset ray passes above the circle
        assert!(c
            .raycast(&at(10.0, 0.0), Vector2::new(0.0, 2.0), Vector2::RIGHT, 50.0)
            .is_none());
    }

    #[test]
    fn test_ray_circle_from_inside_hits_exit() {
        let c = Collider2D::new_circle(2.0);
        let hit = c
            .raycast(&at(0.0, 0.0), Vector2::ZERO, Vector2::RIGHT, 10.0)
            .unwrap();
        assert!((hit.distance - 2.0).abs() < EPS);
        assert!((hit.normal.x - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ray_box_slab_hit() {
        let b = Collider2D::new_box(Vector2::new(2.0, 2.0));
        let hit = b
            .raycast(&at(5.0, 0.0), Vector2::ZERO, Vector2::RIGHT, 10.0)
            .unwrap();
        assert!((hit.distance - 4.0).abs() < EPS);
        assert!((hit.normal.x + 1.0).abs() < EPS);
        assert!(hit.normal.y.abs() < EPS);
    }

    #[test]
    fn test_ray_box_parallel_miss() {
        let b = Collider2D::new_box(Vector2::new(2.0, 2.0));
        // Parallel to the box's top edge, above it
        assert!(b
            .raycast(&at(5.0, 0.0), Vector2::new(0.0, 2.0), Vector2::RIGHT, 20.0)
            .is_none());
    }

    #[test]
    fn test_ray_box_rotated() {
        let b = Collider2D::new_box(Vector2::new(2.0, 2.0));
        let mut t = at(5.0, 0.0);
        t.rotation = std::f32::consts::FRAC_PI_4;

        // A 45-degree box presents a corner toward the ray at distance
        // 5 - sqrt(2)
        let hit = b
            .raycast(&t, Vector2::ZERO, Vector2::RIGHT, 10.0)
            .unwrap();
        let expected = 5.0 - 2.0f32.sqrt();
        assert!((hit.distance - expected).abs() < 1e-3);
    }

    #[test]
    fn test_ray_box_behind_origin() {
        let b = Collider2D::new_box(Vector2::new(2.0, 2.0));
        assert!(b
            .raycast(&at(-5.0, 0.0), Vector2::ZERO, Vector2::RIGHT, 20.0)
            .is_none());
    }

    #[test]
    fn test_ray_zero_direction_and_bad_range() {
        let c = Collider2D::new_circle(1.0);
        assert!(c
            .raycast(&at(5.0, 0.0), Vector2::ZERO, Vector2::ZERO, 10.0)
            .is_none());
        assert!(c
            .raycast(&at(5.0, 0.0), Vector2::ZERO, Vector2::RIGHT, 0.0)
            .is_none());
    }

    #[test]
    fn test_ray_unnormalized_direction() {
        let c = Collider2D::new_circle(1.0);
        let hit = c
            .raycast(&at(10.0, 0.0), Vector2::ZERO, Vector2::new(100.0, 0.0), 20.0)
            .unwrap();
        // Direction magnitude must not affect the reported distance
        assert!((hit.distance - 9.0).abs() < EPS);
    }
}
