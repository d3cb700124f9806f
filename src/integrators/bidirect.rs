// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::LightSources;
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::{ Color3f, Vector3f };
use crate::math::ray::Ray3f;

use super::path::{ brdf, sample_brdf, transport_direct_illum };
use super::{ RR_SURVIVAL, SHADOW_RAY_CLIP, SHADOW_RAY_MIN };

/// Bidirectional estimator with a fixed one-vertex light subpath: at every
/// camera vertex a next-event estimate and a traced light-bounce
/// connection are combined with equal weights. At the pixel-primary
/// vertex the next-event strategy keeps full weight.
pub struct BidirectTracer;

impl BidirectTracer {
    fn join_with_light_paths(&self,
                             rng: &mut dyn Rng,
                             o: &Vector3f,
                             poi: &IntersectInfo,
                             path_space: &dyn PathSpace,
                             mats: &MaterialContainer,
                             light_sources: &LightSources,
                             cam_path_len: u32) -> Color3f {
        let p1_direct = transport_direct_illum(rng, o, poi, path_space, mats,
                                               light_sources, 1);

        // Sample one emission ray and bounce it once.
        let (light, light_prob_mass) = match light_sources.sample_light(rng) {
            Some(selected) => selected,
            None => return p1_direct,
        };
        let emission = light.sample_emission(rng);
        if emission.solid_angle_dens <= 0.0 || emission.surface.area_dens <= 0.0 {
            return p1_direct;
        }
        let light_path = Ray3f::new(emission.surface.p, emission.w,
                                    Some(SHADOW_RAY_MIN), None);
        let terminate = path_space.intersect(&light_path);
        if !terminate.valid() {
            return Color3f::zeros();
        }

        let light_illum = light.projected_radiance(&emission.w, &emission.surface.n)
            / (light_prob_mass * emission.surface.area_dens * emission.solid_angle_dens);
        let tray = -emission.w;

        // Evaluate the area integral over the join segment.
        let join_path = poi.vertex - terminate.vertex;
        let distance = join_path.norm();
        let join_path = join_path / distance;
        let join_ray = Ray3f::new(terminate.vertex, join_path, None, None);
        let cos_w2 = terminate.normal.dot(&tray);
        let cos_wo = terminate.normal.dot(&join_path);
        let cos_wi = poi.normal.dot(&-join_path);
        if cos_w2 > 0.0 && cos_wo > 0.0 && cos_wi > 0.0
            && path_space
                .has_intersect(&join_ray, SHADOW_RAY_MIN, distance - SHADOW_RAY_CLIP)
                .is_none()
        {
            let f2 = light_illum
                .component_mul(&brdf(&terminate, &join_path, &tray, mats)) * cos_w2;
            let p2_direct = f2
                .component_mul(&brdf(poi, o, &-join_path, mats))
                * (cos_wo / (distance * distance))
                * cos_wi;
            if cam_path_len == 0 {
                return p1_direct + 0.5 * p2_direct;
            } else {
                return 0.5 * (p1_direct + p2_direct);
            }
        }
        p1_direct
    }

    fn sample_indirect_illum(&self,
                             rng: &mut dyn Rng,
                             o: &Vector3f,
                             vert: &IntersectInfo,
                             path_space: &dyn PathSpace,
                             mats: &MaterialContainer,
                             light_sources: &LightSources,
                             depth: u32) -> Color3f {
        const MUTATE_DEPTH: u32 = 1;
        let mut p_survive = RR_SURVIVAL;
        if depth >= MUTATE_DEPTH {
            if rng.draw() >= p_survive {
                return Color3f::zeros();
            }
        } else {
            p_survive = 1.0;
        }

        let bidirect = self.join_with_light_paths(rng, o, vert, path_space, mats,
                                                  light_sources, depth);

        // Indirect continuation.
        let mut r = Color3f::zeros();
        let (i, mat_pdf) = sample_brdf(rng, vert, o, mats);
        if mat_pdf > 0.0 {
            let indirect_info = path_space.intersect(
                &Ray3f::new(vert.vertex, i, Some(SHADOW_RAY_MIN), None));
            if indirect_info.valid() {
                let indirect = self.sample_indirect_illum(rng, &-i, &indirect_info,
                                                          path_space, mats, light_sources,
                                                          depth + 1);
                let cos_w = vert.normal.dot(&i);
                if cos_w < 0.0 {
                    return Color3f::zeros();
                }
                r = indirect.component_mul(&brdf(vert, o, &i, mats)) * cos_w / mat_pdf;
            }
        }
        (bidirect + r) / p_survive
    }
}

impl PathTracer for BidirectTracer {
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
                                                      path_space, mats, light_sources, 0);
            rad[i] = match first_hits[i].light {
                Some(light) => estimate + light.projected_radiance(
                    &-rays[i].dir(), &first_hits[i].intersect.normal),
                None => estimate,
            };
        }
        rad
    }
}
