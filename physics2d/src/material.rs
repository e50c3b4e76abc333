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
//! Physics materials
//!
//! A [`PhysicsMaterial2D`] bundles the surface properties of a collider:
//! friction, restitution (bounciness) and density, together with the rule
//! used to combine each property when two materials meet during contact
//! resolution. Materials are immutable value types; cloning produces an
//! independent copy.
//!
//! Out-of-range values are clamped at construction rather than rejected,
//! so the resolver never has to deal with a negative friction coefficient
//! or a restitution above 1.

/// Rule for combining a property of two touching materials
///
/// When two colliders with different combine modes meet, the more
/// restrictive of the two modes wins (see [`CombineMode::priority`]),
/// and that rule is applied to both property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    /// Arithmetic mean of the two values
    #[default]
    Average,
    /// The smaller of the two values
    Minimum,
    /// The product of the two values
    Multiply,
    /// The larger of the two values
    Maximum,
}

impl CombineMode {
    /// Restrictiveness ranking used to pick the winning mode of a pair
    ///
    /// Higher priority wins: `Average < Minimum < Multiply < Maximum`.
    pub fn priority(&self) -> u8 {
        match self {
            CombineMode::Average => 0,
            CombineMode::Minimum => 1,
            CombineMode::Multiply => 2,
            CombineMode::Maximum => 3,
        }
    }

    /// Apply this combine rule to two property values
    pub fn apply(&self, a: f32, b: f32) -> f32 {
        match self {
            CombineMode::Average => (a + b) * 0.5,
            CombineMode::Minimum => a.min(b),
            CombineMode::Multiply => a * b,
            CombineMode::Maximum => a.max(b),
        }
    }

    /// The more restrictive of two modes
    pub fn more_restrictive(a: CombineMode, b: CombineMode) -> CombineMode {
        if b.priority() > a.priority() {
            b
        } else {
            a
        }
    }
}

/// Surface properties of a collider
///
/// # Examples
///
/// ```
/// use physics2d::material::PhysicsMaterial2D;
///
/// let ice = PhysicsMaterial2D::ice();
/// let rubber = PhysicsMaterial2D::rubber();
/// // Ice combines friction with Minimum, which beats rubber's Average
/// let mu = PhysicsMaterial2D::combine_friction(&ice, &rubber);
/// assert_eq!(mu, ice.friction.min(rubber.friction));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsMaterial2D {
    /// Descriptive name, used for debugging only
    pub name: &'static str,
    /// Coulomb friction coefficient, clamped to `>= 0`
    pub friction: f32,
    /// Bounciness, clamped to `[0, 1]`: 0 = fully inelastic, 1 = fully elastic
    pub restitution: f32,
    /// Mass density, clamped to `>= 0.1` to keep mass math finite
    pub density: f32,
    /// Rule for combining friction with another material
    pub friction_combine: CombineMode,
    /// Rule for combining restitution with another material
    pub restitution_combine: CombineMode,
}

impl PhysicsMaterial2D {
    /// Minimum density; lower values are clamped up to avoid degenerate mass
    pub const MIN_DENSITY: f32 = 0.1;

    /// Create a material with the given properties and Average combine modes
    ///
    /// Values outside their valid range are clamped, never rejected.
    pub fn new(name: &'static str, friction: f32, restitution: f32, density: f32) -> Self {
        PhysicsMaterial2D {
            name,
            friction: friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
            density: density.max(Self::MIN_DENSITY),
            friction_combine: CombineMode::Average,
            restitution_combine: CombineMode::Average,
        }
    }

    /// Builder-style override of the friction combine mode
    pub fn with_friction_combine(mut self, mode: CombineMode) -> Self {
        self.friction_combine = mode;
        self
    }

    /// Builder-style override of the restitution combine mode
    pub fn with_restitution_combine(mut self, mode: CombineMode) -> Self {
        self.restitution_combine = mode;
        self
    }

    /// Combined friction coefficient for a contact between two materials
    pub fn combine_friction(a: &PhysicsMaterial2D, b: &PhysicsMaterial2D) -> f32 {
        CombineMode::more_restrictive(a.friction_combine, b.friction_combine)
            .apply(a.friction, b.friction)
    }

    /// Combined restitution for a contact between two materials
    pub fn combine_restitution(a: &PhysicsMaterial2D, b: &PhysicsMaterial2D) -> f32 {
        CombineMode::more_restrictive(a.restitution_combine, b.restitution_combine)
            .apply(a.restitution, b.restitution)
    }

    /// Generic surface: moderate friction, almost no bounce
    pub fn default_material() -> Self {
        PhysicsMaterial2D::new("Default", 0.4, 0.0, 1.0)
    }

    /// Very low friction, no bounce; friction combines with Minimum
    pub fn ice() -> Self {
        PhysicsMaterial2D::new("Ice", 0.02, 0.0, 0.92)
            .with_friction_combine(CombineMode::Minimum)
    }

    /// High friction and high bounce; restitution combines with Maximum
    pub fn rubber() -> Self {
        PhysicsMaterial2D::new("Rubber", 1.0, 0.8, 1.1)
            .with_restitution_combine(CombineMode::Maximum)
    }

    /// Low friction, slight bounce, heavy
    pub fn metal() -> Self {
        PhysicsMaterial2D::new("Metal", 0.15, 0.05, 7.8)
    }

    /// Moderate friction, low bounce
    pub fn wood() -> Self {
        PhysicsMaterial2D::new("Wood", 0.45, 0.2, 0.7)
    }

    /// Maximally bouncy; restitution combines with Maximum
    pub fn bouncy() -> Self {
        PhysicsMaterial2D::new("Bouncy", 0.3, 1.0, 1.0)
            .with_restitution_combine(CombineMode::Maximum)
    }
}

impl Default for PhysicsMaterial2D {
    fn default() -> Self {
        PhysicsMaterial2D::default_material()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_mode_apply() {
        assert_eq!(CombineMode::Average.apply(0.2, 0.6), 0.4);
        assert_eq!(CombineMode::Minimum.apply(0.2, 0.6), 0.2);
        assert_eq!(CombineMode::Maximum.apply(0.2, 0.6), 0.6);
        assert!((CombineMode::Multiply.apply(0.5, 0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_more_restrictive_ordering() {
        use CombineMode::*;
        assert_eq!(CombineMode::more_restrictive(Average, Minimum), Minimum);
        assert_eq!(CombineMode::more_restrictive(Minimum, Multiply), Multiply);
        assert_eq!(CombineMode::more_restrictive(Multiply, Maximum), Maximum);
        assert_eq!(CombineMode::more_restrictive(Maximum, Average), Maximum);
        // Equal priorities keep the first mode
        assert_eq!(CombineMode::more_restrictive(Minimum, Minimum), Minimum);
    }

    #[test]
    fn test_construction_clamps() {
        let m = PhysicsMaterial2D::new("bad", -1.0, 2.0, 0.0);
        assert_eq!(m.friction, 0.0);
        assert_eq!(m.restitution, 1.0);
        assert_eq!(m.density, PhysicsMaterial2D::MIN_DENSITY);

        let n = PhysicsMaterial2D::new("bad2", 0.5, -0.5, 1.0);
        assert_eq!(n.restitution, 0.0);
    }

    #[test]
    fn test_pair_combination_uses_restrictive_mode() {
        let ice = PhysicsMaterial2D::ice();
        let wood = PhysicsMaterial2D::wood();
        // Ice's Minimum friction combine beats wood's Average
        let mu = PhysicsMaterial2D::combine_friction(&ice, &wood);
        assert_eq!(mu, ice.friction.min(wood.friction));
        // Order of arguments does not matter
        assert_eq!(mu, PhysicsMaterial2D::combine_friction(&wood, &ice));

        let bouncy = PhysicsMaterial2D::bouncy();
        // Bouncy's Maximum restitution combine beats wood's Average
        let e = PhysicsMaterial2D::combine_restitution(&bouncy, &wood);
        assert_eq!(e, bouncy.restitution.max(wood.restitution));
    }

    #[test]
    fn test_presets_are_plain_values() {
        for preset in [
            PhysicsMaterial2D::default_material(),
            PhysicsMaterial2D::ice(),
            PhysicsMaterial2D::rubber(),
            PhysicsMaterial2D::metal(),
            PhysicsMaterial2D::wood(),
            PhysicsMaterial2D::bouncy(),
        ] {
            assert!(preset.friction >= 0.0);
            assert!((0.0..=1.0).contains(&preset.restitution));
            assert!(preset.density >= PhysicsMaterial2D::MIN_DENSITY);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let a = PhysicsMaterial2D::wood();
        let mut b = a.clone();
        b.friction = 9.0;
        assert_eq!(a.friction, PhysicsMaterial2D::wood().friction);
        assert_ne!(a.friction, b.friction);
    }
}
