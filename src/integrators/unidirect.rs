// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::LightSources;
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::{ FirstHit, PathTracer };
use crate::math::constants::{ Color3f, Vector3f };
use crate::math::ray::Ray3f;

use super::path::{ brdf, sample_brdf };
use super::{ RR_SURVIVAL, SHADOW_RAY_MIN };

/// Pure BRDF-sampling estimator: the walk only collects radiance when it
/// lands on an emitter. Russian roulette keeps the recursion unbiased
/// once it reaches the mutation depth.
pub struct UnidirectTracer;

impl UnidirectTracer {
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

        // Direct.
        let mut light_emission = Color3f::zeros();
        if let Some(geo) = vert.geometry {
            if let Some(light) = light_sources.obj_light(geo.id) {
                light_emission = light.radiance(o, &vert.normal);
            }
        }

        // Indirect.
        let (i, proj_solid_dens) = sample_brdf(rng, vert, o, mats);
        if proj_solid_dens == 0.0 {
            return light_emission / p_survive;
        }
        let indirect_vert = path_space.intersect(
            &Ray3f::new(vert.vertex, i, Some(SHADOW_RAY_MIN), None));
        if !indirect_vert.valid() || indirect_vert.normal.dot(&-i) <= 0.0 {
            return light_emission / p_survive;
        }

        let p_depth_to_inf = self.sample_indirect_illum(rng, &-i, &indirect_vert, path_space,
                                                        mats, light_sources, depth + 1);
        let cos_w = vert.normal.dot(&i);
        let indirect = p_depth_to_inf.component_mul(&brdf(vert, o, &i, mats))
            * cos_w / proj_solid_dens;

        (light_emission + indirect) / p_survive
    }
}

impl PathTracer for UnidirectTracer {
    fn sample(&self,
              rng: &mut dyn Rng,
              rays: &[Ray3f],
              first_hits: &[FirstHit],
              path_space: &dyn PathSpace,
              mats: &MaterialContainer,
              light_sources: &LightSources) -> Vec<Color3f> {
        let mut rad = vec![Color3f::zeros(); rays.len()];
        for i in 0..rays.len() {
            if first_hits[i].intersect.valid() {
                rad[i] = self.sample_indirect_illum(rng, &-rays[i].dir(),
                                                    &first_hits[i].intersect,
                                                    path_space, mats, light_sources,
                                                    /*depth=*/0);
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
    use crate::math::constants::PI;
    use crate::scenes;

    #[test]
    fn test_black_floor_stays_black() {
        let rig = scenes::black_floor_under_panel_light();
        let lights = rig.scene.light_sources();
        // Down onto the floor, clear of the panel's footprint.
        let rays = vec![Ray3f::new(Vector3f::new(0.8, 1.5, 0.1),
                                   Vector3f::new(0.0, -1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        assert!(hits[0].intersect.valid());

        let tracer = UnidirectTracer;
        let mut rng = LcgRng::new(17);
        for _ in 0..128 {
            let rad = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            assert_eq!(rad[0], Color3f::zeros());
        }
    }

    // The BRDF-sampling estimator and the quadrature reference agree on a
    // floor point under a large panel; this exercises the unbiasedness of
    // the roulette termination since most of the signal arrives at depth
    // one and survives roulette only half of the time beyond depth two.
    #[test]
    fn test_matches_quadrature_under_large_panel() {
        // A low, wide panel subtends a large solid angle, keeping the
        // hit-the-light variance manageable.
        let emission = Color3f::new(1.0, 1.0, 1.0);
        let rig = scenes::floor_under_panel_light(200.0, 0.5, emission);
        let lights = rig.scene.light_sources();

        let rays = vec![Ray3f::new(Vector3f::new(0.0, 0.25, 0.0),
                                   Vector3f::new(0.05, -1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &rig.scene, &lights);
        assert!(hits[0].intersect.valid());

        let p = hits[0].intersect.vertex;
        let n = hits[0].intersect.normal;
        let direct = scenes::panel_irradiance(&p, &n, 0.5, scenes::PANEL_HALF_EXTENT, 256)
            * 0.8 / PI as f64;

        let tracer = UnidirectTracer;
        let mut rng = LcgRng::new(1234);
        let samples = 60000;
        let mut mean = 0.0f64;
        for _ in 0..samples {
            let rad = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            assert!(rad[0][0].is_finite());
            mean += rad[0][0] as f64;
        }
        mean /= samples as f64;

        // Multi-bounce floor-to-floor transport is geometrically
        // impossible here, so the estimate converges to the direct term.
        let relative = (mean - direct).abs() / direct;
        assert!(relative < 0.1, "mean {} direct {}", mean, direct);
    }

    #[test]
    fn test_enclosed_box_conserves_energy() {
        let emission = Color3f::new(1.0, 1.0, 1.0);
        let rig = scenes::enclosed_box(0.7, emission);
        let lights = rig.scene.light_sources();

        let mut rays = Vec::new();
        for k in 0..8 {
            let x = -0.7 + 0.2 * k as f32;
            rays.push(Ray3f::new(Vector3f::new(x * 0.5, 0.0, 0.9),
                                 Vector3f::new(x * 0.1, -0.2, -1.0), None, None));
        }
        let hits = compute_first_hit(&rays, &rig.scene, &lights);

        let tracer = UnidirectTracer;
        let mut rng = LcgRng::new(99);
        let rounds = 600;
        let mut mean = vec![0.0f64; rays.len()];
        for _ in 0..rounds {
            let rad = tracer.sample(&mut rng, &rays, &hits, &rig.scene, &rig.mats, &lights);
            for (i, value) in rad.iter().enumerate() {
                for c in 0..3 {
                    assert!(value[c].is_finite() && value[c] >= 0.0);
                }
                mean[i] += value[0] as f64;
            }
        }
        // Interreflection never lifts a wall above the source radiance.
        for m in &mean {
            let value = m / rounds as f64;
            assert!(value <= 1.0, "wall radiance {}", value);
        }
    }
}
