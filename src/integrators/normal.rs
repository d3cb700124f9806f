// Copyright @yucwang 2026

use crate::core::light::LightSources;
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::{ Color3f, Vector3f };
use crate::math::ray::Ray3f;

/// Debug tracer: first-hit shading normal remapped into [0, 1].
pub struct NormalTracer;

impl PathTracer for NormalTracer {
    fn sample(&self,
              _rng: &mut dyn Rng,
              _rays: &[Ray3f],
              first_hits: &[FirstHit],
              _path_space: &dyn PathSpace,
              _mats: &MaterialContainer,
              _light_sources: &LightSources) -> Vec<Color3f> {
        let mut rad = vec![Color3f::zeros(); first_hits.len()];
        for (i, hit) in first_hits.iter().enumerate() {
            if hit.intersect.valid() {
                rad[i] = (hit.intersect.normal + Vector3f::new(1.0, 1.0, 1.0)) / 2.0;
            }
        }
        rad
    }
}
