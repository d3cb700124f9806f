// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::math::aabb::AABB;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;

/// Geometric query surface the integrators sample paths against.
pub trait PathSpace: Sync {
    /// Closest positive hit, or the invalid record on a miss.
    fn intersect(&self, ray: &Ray3f) -> IntersectInfo;

    /// Any-hit visibility predicate over `[t_min, t_max]` along `ray`.
    /// Returns the blocking distance when occluded.
    fn has_intersect(&self, ray: &Ray3f, t_min: Float, t_max: Float) -> Option<Float>;

    /// World bounds of everything intersectable.
    fn aabb(&self) -> AABB;
}
