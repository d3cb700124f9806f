// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::LightSources;
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::{ Color3f, Float, Vector3f };
use crate::math::ray::Ray3f;

use super::path::{ brdf, sample_brdf, transport_direct_illum };
use super::{ DEFAULT_DIRECT_LIGHT_SAMPLES, DEFAULT_INDIRECT_SPLIT, RR_SURVIVAL,
             SHADOW_RAY_MIN };

/// BRDF walk with a next-event estimate folded in at every vertex. The
/// walk never collects emission it lands on, since the direct term
/// already covers it; only the pixel-primary emitter hit is re-added by
/// the dispatch.
pub struct UnidirectNeeTracer {
    multi_light_samps: u32,
    multi_indirect_samps: u32,
}

impl UnidirectNeeTracer {
    pub fn new() -> Self {
        Self {
            multi_light_samps: DEFAULT_DIRECT_LIGHT_SAMPLES,
            multi_indirect_samps: DEFAULT_INDIRECT_SPLIT,
        }
    }

    pub fn with_splitting(multi_light_samps: u32, multi_indirect_samps: u32) -> Self {
        Self {
            multi_light_samps: multi_light_samps.max(1),
            multi_indirect_samps: multi_indirect_samps.max(1),
        }
    }

    fn sample_indirect_illum(&self,
                             rng: &mut dyn Rng,
                             o: &Vector3f,
                             vert: &IntersectInfo,
                             path_space: &dyn PathSpace,
                             mats: &MaterialContainer,
                             light_sources: &LightSources,
                             depth: u32) -> Color3f {
        const MUTATE_DEPTH: u32 = 2;
        let mut p_survive = RR_SURVIVAL;
        if depth >= MUTATE_DEPTH {
            if rng.draw() >= p_survive {
                return Color3f::zeros();
            }
        } else {
            p_survive = 1.0;
        }

        // Splitting is only worth it at the pixel-primary vertex.
        let multi_indirect_samps = if depth >= 1 { 1 } else { self.multi_indirect_samps };

        // Direct.
        let direct = transport_direct_illum(rng, o, vert, path_space, mats, light_sources,
                                            self.multi_light_samps);

        // Indirect.
        let mut multi_indirect = Color3f::zeros();
        for _ in 0..multi_indirect_samps {
            let (i, proj_solid_dens) = sample_brdf(rng, vert, o, mats);
            if proj_solid_dens == 0.0 {
                break;
            }
            let indirect_vert = path_space.intersect(
                &Ray3f::new(vert.vertex, i, Some(SHADOW_RAY_MIN), None));
            if !indirect_vert.valid() || indirect_vert.normal.dot(&-i) <= 0.0 {
                break;
            }

            let indirect = self.sample_indirect_illum(rng, &-i, &indirect_vert, path_space,
                                                      mats, light_sources, depth + 1);
            let cos_w = vert.normal.dot(&i);
            multi_indirect += indirect.component_mul(&brdf(vert, o, &i, mats))
                * cos_w / proj_solid_dens;
        }

        (direct + multi_indirect / multi_indirect_samps as Float) / p_survive
    }
}

impl Default for UnidirectNeeTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTracer for UnidirectNeeTracer {
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
            let estimate = self.sample_indirect_illum(rng, &-rays[i].dir(),
                                                      &first_hits[i].intersect,
                                                      path_space, mats, light_sources,
                                                      /*depth=*/0);
            rad[i] = match first_hits[i].light {
                Some(light) => estimate + light.radiance(&-rays[i].dir(),
                                                         &first_hits[i].intersect.normal),
                None => estimate,
            };
        }
        rad
    }
}
