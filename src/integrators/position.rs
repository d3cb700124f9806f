// Copyright @yucwang 2026

use crate::core::light::LightSources;
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::Color3f;
use crate::math::ray::Ray3f;

/// Debug tracer: first-hit position normalized into the scene bounds.
pub struct PositionTracer;

impl PathTracer for PositionTracer {
    fn sample(&self,
              _rng: &mut dyn Rng,
              _rays: &[Ray3f],
              first_hits: &[FirstHit],
              path_space: &dyn PathSpace,
              _mats: &MaterialContainer,
              _light_sources: &LightSources) -> Vec<Color3f> {
        let bounds = path_space.aabb();
        let range = bounds.diagonal();
        let mut rad = vec![Color3f::zeros(); first_hits.len()];
        for (i, hit) in first_hits.iter().enumerate() {
            if hit.intersect.valid() {
                let p = hit.intersect.vertex - bounds.p_min;
                rad[i] = p.component_div(&range);
            }
        }
        rad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;
    use crate::core::tracer::compute_first_hit;
    use crate::math::constants::Vector3f;
    use crate::scenes;

    #[test]
    fn test_positions_are_normalized_and_deterministic() {
        let rig = scenes::cornell_box();
        let lights = rig.scene.light_sources();
        let mut rays = Vec::new();
        for k in 0..16 {
            let x = -0.6 + 0.08 * k as f32;
            rays.push(Ray3f::new(Vector3f::new(x, 0.0, 3.0),
                                 Vector3f::new(-x * 0.1, 0.05, -1.0), None, None));
        }
        let hits = compute_first_hit(&rays, &rig.scene, &lights);

        let tracer = PositionTracer;
        let mut rng = LcgRng::new(1);
        let first = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
        let second = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
        assert_eq!(first, second);

        for value in &first {
            for c in 0..3 {
                assert!(value[c] >= 0.0 && value[c] <= 1.0);
            }
        }
    }

    #[test]
    fn test_miss_is_zero() {
        let rig = scenes::unit_sphere();
        let lights = rig.scene.light_sources();
        let rays = vec![Ray3f::new(Vector3f::new(0.0, 3.0, -3.0),
                                   Vector3f::new(0.0, 1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        let mut rng = LcgRng::new(1);
        let rad = PositionTracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
        assert_eq!(rad[0], Color3f::zeros());
    }
}
