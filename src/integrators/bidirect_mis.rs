// Copyright @yucwang 2026

use crate::core::light::{ EmissionSample, Light, LightSources };
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::{ Color3f, Float };
use crate::math::ray::Ray3f;

use super::path::{ brdf, sample_path, sample_path_from_hit, transport_illum_source,
                   PathThroughput, SampledPathlet };
use super::{ DEFAULT_MAX_PATH_LEN, SHADOW_RAY_CLIP, SHADOW_RAY_MIN };

/// Full bidirectional estimator: a camera walk and a light walk are
/// connected at every compatible (camera, light) prefix pair, and the
/// strategies of a common path length are averaged with uniform weights.
pub struct BidirectMisTracer {
    max_path_len: usize,
}

impl BidirectMisTracer {
    pub fn new(max_path_len: usize) -> Self {
        Self { max_path_len: max_path_len.max(1) }
    }

    fn sample_illum_source<'a>(&self,
                               rng: &mut dyn Rng,
                               light_sources: &'a LightSources)
                               -> Option<(&'a dyn Light, EmissionSample)> {
        let (light, light_prob_mass) = light_sources.sample_light(rng)?;
        let mut emission = light.sample_emission(rng);
        emission.surface.area_dens *= light_prob_mass;
        Some((light, emission))
    }
}

impl Default for BidirectMisTracer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PATH_LEN)
    }
}

/// Sweep every path length reachable from the two subpaths and connect
/// each compatible prefix pair with one joining segment. Strategies of a
/// partition accumulate into a weighted sum; a partition with no live
/// strategy contributes nothing. The pure light path is kept in the sweep
/// but a pinhole camera is never hit, so it contributes neither radiance
/// nor weight.
fn transport_all_connectible_subpaths(cam_path: &[SampledPathlet],
                                      light_path: &[SampledPathlet],
                                      emission: &EmissionSample,
                                      light: &dyn Light,
                                      path_space: &dyn PathSpace,
                                      mats: &MaterialContainer) -> Color3f {
    if cam_path.is_empty() {
        // Nothing to sample.
        return Color3f::zeros();
    }

    let cam_transport = PathThroughput::radiance(cam_path, mats);
    let light_transport = PathThroughput::importance(light_path, mats);

    let max_cam_path_len = cam_path.len();
    let max_light_path_len = light_path.len();

    let mut rad = Color3f::zeros();

    // Both cam_plen and light_plen are one-offset prefix lengths; a
    // partition holds every split of the same total length.
    for plen in 1..=(max_cam_path_len + max_light_path_len + 1) {
        let hi = (plen - 1).min(max_cam_path_len);
        let lo = (plen - 1).saturating_sub(max_light_path_len);

        let mut partition_rad_sum = Color3f::zeros();
        let mut partition_weight_sum: Float = 0.0;
        let cur_path_weight: Float = 1.0;

        for cam_plen in (lo..=hi).rev() {
            let light_plen = plen - 1 - cam_plen;

            if light_plen == 0 && cam_plen == 0 {
                // The camera ray hit an emitter directly.
                if let Some(hit_light) = cam_path[0].light {
                    let path_rad = hit_light.radiance(&cam_path[0].towards_prev(),
                                                      &cam_path[0].vert.normal);
                    partition_rad_sum += cur_path_weight * path_rad;
                }
                partition_weight_sum += cur_path_weight;
            } else if light_plen == 0 {
                // Next-event style: the emission point connects straight
                // to a camera vertex; its direction was not drawn by any
                // random process, so only the area density divides.
                let cam_join_vert = &cam_path[cam_plen - 1];
                let transported_importance = transport_illum_source(
                    light, &emission.surface.p, &emission.surface.n,
                    &cam_join_vert.vert, &cam_join_vert.towards_prev(),
                    path_space, mats) / emission.surface.area_dens;

                let path_rad = transported_importance
                    .component_mul(&cam_transport.transport(cam_plen - 1))
                    / cam_path[0].dens;

                partition_rad_sum += cur_path_weight * path_rad;
                partition_weight_sum += cur_path_weight;
            } else if cam_plen == 0 {
                // The chance of the light path hitting the camera is zero.
            } else {
                let light_join_vert = &light_path[light_plen - 1];
                let cam_join_vert = &cam_path[cam_plen - 1];
                let join_path = cam_join_vert.vert.vertex - light_join_vert.vert.vertex;
                let join_distance = join_path.norm();
                let join_path = join_path / join_distance;

                let join_ray = Ray3f::new(light_join_vert.vert.vertex, join_path,
                                          Some(SHADOW_RAY_MIN), None);
                let cos_wo = light_join_vert.vert.normal.dot(&join_path);
                let cos_wi = cam_join_vert.vert.normal.dot(&-join_path);
                if cos_wo > 0.0 && cos_wi > 0.0
                    && path_space
                        .has_intersect(&join_ray, SHADOW_RAY_CLIP,
                                       join_distance - SHADOW_RAY_CLIP)
                        .is_none()
                {
                    // Emitted importance carried to the light-side join
                    // vertex.
                    let light_emission = light.projected_radiance(
                        &light_path[0].towards(), &emission.surface.n)
                        / (light_path[0].dens * emission.surface.area_dens);
                    let light_subpath_importance = light_emission
                        .component_mul(&light_transport.transport(light_plen - 1));

                    // Transport over the join segment in area measure.
                    let to_area_differential =
                        cos_wi * cos_wo / (join_distance * join_distance);
                    let light_join_weight = brdf(&light_join_vert.vert, &join_path,
                                                 &light_join_vert.towards_prev(), mats);
                    let cam_join_weight = brdf(&cam_join_vert.vert,
                                               &cam_join_vert.towards_prev(),
                                               &-join_path, mats);
                    let transported_importance = light_subpath_importance
                        .component_mul(&light_join_weight)
                        .component_mul(&cam_join_weight)
                        * to_area_differential;

                    let cam_subpath_radiance = transported_importance
                        .component_mul(&cam_transport.transport(cam_plen - 1))
                        / cam_path[0].dens;

                    partition_rad_sum += cur_path_weight * cam_subpath_radiance;
                }
                partition_weight_sum += cur_path_weight;
            }
        }

        if partition_weight_sum > 0.0 {
            rad += partition_rad_sum / partition_weight_sum;
        }
    }
    rad
}

impl PathTracer for BidirectMisTracer {
    fn sample(&self,
              rng: &mut dyn Rng,
              rays: &[Ray3f],
              first_hits: &[FirstHit],
              path_space: &dyn PathSpace,
              mats: &MaterialContainer,
              light_sources: &LightSources) -> Vec<Color3f> {
        let mut rad = vec![Color3f::zeros(); rays.len()];

        // Subpath scratch is shared across the whole batch.
        let mut cam_path = vec![SampledPathlet::default(); self.max_path_len];
        let mut light_path = vec![SampledPathlet::default(); self.max_path_len];

        for i in 0..rays.len() {
            let cam_path_len = sample_path_from_hit(rng, &mut cam_path, &rays[i],
                                                    &first_hits[i], path_space, mats);

            let (light, emission_sample) = match self.sample_illum_source(rng, light_sources) {
                Some(selected) => selected,
                None => continue,
            };
            let light_path0 = Ray3f::new(emission_sample.surface.p, emission_sample.w,
                                         Some(SHADOW_RAY_MIN), None);
            let light_path_len = sample_path(rng, &mut light_path, &light_path0,
                                             emission_sample.solid_angle_dens,
                                             path_space, mats);

            rad[i] = transport_all_connectible_subpaths(
                &cam_path[..cam_path_len], &light_path[..light_path_len],
                &emission_sample, light, path_space, mats);
        }

        rad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;
    use crate::core::scene::Scene;
    use crate::core::tracer::compute_first_hit;
    use crate::math::constants::{ PI, Vector3f };
    use crate::scenes;

    #[test]
    fn test_empty_scene_is_exactly_black() {
        let scene = Scene::new();
        let mats = crate::core::material::MaterialContainer::new();
        let lights = scene.light_sources();
        let rays = vec![Ray3f::new(Vector3f::zeros(),
                                   Vector3f::new(0.0, 0.0, 1.0), None, None)];
        let hits = compute_first_hit(&rays, &scene, &lights);
        let mut rng = LcgRng::new(8);
        let rad = BidirectMisTracer::default()
            .sample(&mut rng, &rays, &hits, &scene, &mats, &lights);
        assert_eq!(rad[0], Color3f::zeros());
    }

    #[test]
    fn test_black_floor_stays_black() {
        let rig = scenes::black_floor_under_panel_light();
        let lights = rig.scene.light_sources();
        // Down onto the floor, clear of the panel's footprint.
        let rays = vec![Ray3f::new(Vector3f::new(0.9, 1.4, 0.0),
                                   Vector3f::new(0.0, -1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        assert!(hits[0].intersect.valid());

        let tracer = BidirectMisTracer::default();
        let mut rng = LcgRng::new(12);
        for _ in 0..64 {
            let rad = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            assert_eq!(rad[0], Color3f::zeros());
        }
    }

    // On the flat rig the only transport is the length-two partition,
    // whose single strategy is the next-event connection; the estimate
    // must agree with the direct tracer's reference.
    #[test]
    fn test_length_two_partition_matches_direct_reference() {
        let emission = Color3f::new(1.0, 1.0, 1.0);
        let rig = scenes::floor_under_panel_light(400.0, 1.0, emission);
        let lights = rig.scene.light_sources();

        let rays = vec![Ray3f::new(Vector3f::new(0.0, 0.5, 0.1),
                                   Vector3f::new(0.0, -1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        assert!(hits[0].intersect.valid());

        let p = hits[0].intersect.vertex;
        let n = hits[0].intersect.normal;
        let expected = scenes::panel_irradiance(&p, &n, 1.0, scenes::PANEL_HALF_EXTENT, 256)
            * 0.8 / PI as f64;

        let tracer = BidirectMisTracer::default();
        let mut rng = LcgRng::new(505);
        let samples = 20000;
        let mut mean = 0.0f64;
        for _ in 0..samples {
            let rad = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            assert!(rad[0][0].is_finite());
            mean += rad[0][0] as f64;
        }
        mean /= samples as f64;
        let relative = (mean - expected).abs() / expected;
        assert!(relative < 0.07, "mean {} expected {}", mean, expected);
    }

    // Scenario check against the direct tracer on the sphere rig: same
    // mean within a few percent, finite everywhere.
    #[test]
    fn test_sphere_rig_agrees_with_direct_tracer() {
        let emission = Color3f::new(1.0, 1.0, 1.0);
        let rig = scenes::sphere_under_panel_light(2.0, emission);
        let lights = rig.scene.light_sources();

        let origin = Vector3f::new(1.5, 2.0, 0.0);
        let target = Vector3f::new(0.0, 1.0, 0.0);
        let rays = vec![Ray3f::new(origin, (target - origin).normalize(), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        assert!(hits[0].intersect.valid());

        let direct = crate::integrators::direct::DirectTracer::new();
        let bidirect = BidirectMisTracer::default();
        let mut rng = LcgRng::new(7070);
        let samples = 20000;
        let mut direct_mean = 0.0f64;
        let mut bidirect_mean = 0.0f64;
        for _ in 0..samples {
            let d = direct.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            let b = bidirect.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            assert!(d[0][0].is_finite() && b[0][0].is_finite());
            direct_mean += d[0][0] as f64;
            bidirect_mean += b[0][0] as f64;
        }
        direct_mean /= samples as f64;
        bidirect_mean /= samples as f64;

        let relative = (bidirect_mean - direct_mean).abs() / direct_mean;
        assert!(relative < 0.08, "bidirect {} direct {}", bidirect_mean, direct_mean);
    }

    #[test]
    fn test_emitter_hit_partition() {
        let emission = Color3f::new(2.5, 2.5, 2.5);
        let rig = scenes::floor_under_panel_light(200.0, 1.0, emission);
        let lights = rig.scene.light_sources();
        let rays = vec![Ray3f::new(Vector3f::new(0.0, 0.5, 0.0),
                                   Vector3f::new(0.0, 1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        assert!(hits[0].light.is_some());

        let tracer = BidirectMisTracer::default();
        let mut rng = LcgRng::new(15);
        let samples = 256;
        let mut mean = 0.0f64;
        for _ in 0..samples {
            let rad = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            assert!(rad[0][0].is_finite());
            mean += rad[0][0] as f64;
        }
        mean /= samples as f64;
        // The length-one partition sees the emitter; everything longer is
        // killed by the panel's black material.
        assert!((mean - 2.5).abs() < 0.05, "mean {}", mean);
    }
}
