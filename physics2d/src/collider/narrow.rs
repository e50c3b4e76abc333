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
//! Narrow-phase intersection tests
//!
//! Exact shape-vs-shape tests dispatched over the pair of concrete shapes:
//! circle-circle (squared-distance), box-box (separating axis theorem over
//! the four box axes) and box-circle (clamp-to-local-space). Each test
//! produces a [`Separation`] whose normal points from the first shape
//! toward the second and whose depth is the minimum translation distance.
//!
//! Degenerate geometry (coincident centers, zero-length normals) falls back
//! to the canonical up direction so resolution always has a well-defined
//! axis to push along.

use crate::collider::{Collider2D, WorldShape};
use crate::math::{Transform2D, Vector2};

/// Penetration overlaps closer than this are treated as a tie during SAT
/// axis selection and broken in favor of the more vertical axis
const SAT_TIE_EPSILON: f32 = 1e-6;

/// Result of a successful narrow-phase test
///
/// Translating the second shape by `normal * depth` (or the first by
/// `-normal * depth`) separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Unit collision normal, pointing from the first shape to the second
    pub normal: Vector2,
    /// Penetration depth along the normal, always `> 0`
    pub depth: f32,
    /// Representative world-space contact point
    pub contact: Vector2,
}

/// Test whether two colliders overlap under their owning transforms
pub fn overlaps(a: &Collider2D, ta: &Transform2D, b: &Collider2D, tb: &Transform2D) -> bool {
    compute_separation(a, ta, b, tb).is_some()
}

/// Compute the separation between two colliders, if they overlap
///
/// Returns `None` when the shapes are disjoint or merely touching
/// (zero-depth contact).
pub fn compute_separation(
    a: &Collider2D,
    ta: &Transform2D,
    b: &Collider2D,
    tb: &Transform2D,
) -> Option<Separation> {
    separate_shapes(&a.world_shape(ta), &b.world_shape(tb))
}

/// Shape-pair dispatch over resolved world shapes
pub(crate) fn separate_shapes(a: &WorldShape, b: &WorldShape) -> Option<Separation> {
    match (a, b) {
        (WorldShape::Circle { .. }, WorldShape::Circle { .. }) => circle_circle(a, b),
        (WorldShape::Box { .. }, WorldShape::Box { .. }) => box_box(a, b),
        (WorldShape::Box { .. }, WorldShape::Circle { .. }) => box_circle(a, b),
        (WorldShape::Circle { .. }, WorldShape::Box { .. }) => {
            // Run the box-circle test with the box first, then flip the
            // normal back into circle-to-box orientation
            box_circle(b, a).map(|sep| Separation {
                normal: -sep.normal,
                ..sep
            })
        }
    }
}

fn circle_circle(a: &WorldShape, b: &WorldShape) -> Option<Separation> {
    let (ca, ra) = match *a {
        WorldShape::Circle { center, radius } => (center, radius),
        _ => unreachable!("circle_circle called with non-circle"),
    };
    let (cb, rb) = match *b {
        WorldShape::Circle { center, radius } => (center, radius),
        _ => unreachable!("circle_circle called with non-circle"),
    };

    let delta = cb - ca;
    let radii = ra + rb;
    let dist_sq = delta.length_squared();
    if dist_sq >= radii * radii {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centers: no direction to derive, push along the up axis
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vector2::UP
    };
    let depth = radii - dist;
    Some(Separation {
        normal,
        depth,
        contact: ca + normal * (ra - depth * 0.5),
    })
}

fn box_box(a: &WorldShape, b: &WorldShape) -> Option<Separation> {
    let (ca, ha) = match *a {
        WorldShape::Box {
            center,
            half_extents,
            ..
        } => (center, half_extents),
        _ => unreachable!("box_box called with non-box"),
    };
    let (cb, hb) = match *b {
        WorldShape::Box {
            center,
            half_extents,
            ..
        } => (center, half_extents),
        _ => unreachable!("box_box called with non-box"),
    };
    let (au1, au2) = a.box_axes().expect("box shape");
    let (bu1, bu2) = b.box_axes().expect("box shape");

    let delta = cb - ca;
    let axes = [au1, au2, bu1, bu2];

    let mut best_overlap = f32::INFINITY;
    let mut best_axis = Vector2::UP;
    for axis in axes {
        // Projection radius of each box onto the candidate axis
        let ra = ha.x * axis.dot(au1).abs() + ha.y * axis.dot(au2).abs();
        let rb = hb.x * axis.dot(bu1).abs() + hb.y * axis.dot(bu2).abs();
        let distance = delta.dot(axis).abs();
        let overlap = ra + rb - distance;
        if overlap <= 0.0 {
            // Found a separating axis
            return None;
        }
        if overlap < best_overlap - SAT_TIE_EPSILON {
            best_overlap = overlap;
            best_axis = axis;
        } else if (overlap - best_overlap).abs() <= SAT_TIE_EPSILON
            && axis.y.abs() > best_axis.y.abs()
        {
            // Tie between axes: prefer the more vertical one so exactly
            // aligned stacked boxes resolve straight up instead of
            // jittering on axis iteration order
            best_overlap = best_overlap.min(overlap);
            best_axis = axis;
        }
    }

    // Orient the minimum-translation axis from a toward b
    let normal = if delta.dot(best_axis) >= 0.0 {
        best_axis
    } else {
        -best_axis
    };
    Some(Separation {
        normal,
        depth: best_overlap,
        contact: a.closest_point(cb),
    })
}

fn box_circle(bx: &WorldShape, circle: &WorldShape) -> Option<Separation> {
    let (cb, hb, rotation) = match *bx {
        WorldShape::Box {
            center,
            half_extents,
            rotation,
        } => (center, half_extents, rotation),
        _ => unreachable!("box_circle called with non-box first"),
    };
    let (cc, radius) = match *circle {
        WorldShape::Circle { center, radius } => (center, radius),
        _ => unreachable!("box_circle called with non-circle second"),
    };

    // Work in the box's local space so the clamp is axis-aligned
    let local = (cc - cb).rotated(-rotation);
    let clamped = local.clamp(-hb, hb);

    if clamped == local {
        // Circle center is inside the box: push out through the nearest face
        let dx = hb.x - local.x.abs();
        let dy = hb.y - local.y.abs();
        let (local_normal, face_depth) = if dx < dy {
            (Vector2::new(local.x.signum(), 0.0), dx)
        } else {
            (Vector2::new(0.0, local.y.signum()), dy)
        };
        let normal = local_normal.rotated(rotation);
        return Some(Separation {
            normal,
            depth: face_depth + radius,
            contact: cc,
        });
    }

    let delta = local - clamped;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = (delta / dist).rotated(rotation);
    Some(Separation {
        normal,
        depth: radius - dist,
        contact: cb + clamped.rotated(rotation),
    })
}
