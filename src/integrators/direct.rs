// Copyright @yucwang 2026

use crate::core::light::LightSources;
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::Color3f;
use crate::math::ray::Ray3f;

use super::path::transport_direct_illum;
use super::DEFAULT_DIRECT_LIGHT_SAMPLES;

/// Single-bounce tracer: next-event estimate at the first hit, plus the
/// projected radiance of an emitter hit directly.
pub struct DirectTracer {
    multi_light_samps: u32,
}

impl DirectTracer {
    pub fn new() -> Self {
        Self { multi_light_samps: DEFAULT_DIRECT_LIGHT_SAMPLES }
    }

    pub fn with_light_samples(multi_light_samps: u32) -> Self {
        Self { multi_light_samps: multi_light_samps.max(1) }
    }
}

impl Default for DirectTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTracer for DirectTracer {
    fn sample(&self,
              rng: &mut dyn Rng,
              rays: &[Ray3f],
              first_hits: &[FirstHit],
              path_space: &dyn PathSpace,
              mats: &MaterialContainer,
              light_sources: &LightSources) -> Vec<Color3f> {
        let mut rad = vec![Color3f::zeros(); rays.len()];
        for i in 0..rays.len() {
            if !first_hits[i].intersect.valid() {
                continue;
            }
            rad[i] = transport_direct_illum(rng, &-rays[i].dir(), &first_hits[i].intersect,
                                            path_space, mats, light_sources,
                                            self.multi_light_samps);
            if let Some(light) = first_hits[i].light {
                rad[i] += light.projected_radiance(&-rays[i].dir(),
                                                   &first_hits[i].intersect.normal);
            }
        }
        rad
    }
}
