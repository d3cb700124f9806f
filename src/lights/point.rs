// Copyright @yucwang 2026

use crate::core::light::{ EmissionSample, Light, SurfaceSample };
use crate::core::rng::Rng;
use crate::math::constants::{ Color3f, Vector2f, Vector3f };
use crate::math::warp::{ sample_uniform_sphere, sample_uniform_sphere_pdf };

/// Isotropic point emitter. It has no surface, so it is never hit by a
/// ray; its position sample carries unit area density.
pub struct PointLight {
    position: Vector3f,
    intensity: Color3f,
}

impl PointLight {
    pub fn new(position: Vector3f, intensity: Color3f) -> Self {
        Self { position, intensity }
    }
}

impl Light for PointLight {
    fn radiance(&self, _w_out: &Vector3f, _n_light: &Vector3f) -> Color3f {
        Color3f::zeros()
    }

    // Radiant intensity stands in for the projected surface radiance of a
    // delta emitter.
    fn projected_radiance(&self, _w_out: &Vector3f, _n_light: &Vector3f) -> Color3f {
        self.intensity
    }

    fn sample_emission_surface(&self, _rng: &mut dyn Rng) -> SurfaceSample {
        SurfaceSample {
            p: self.position,
            n: Vector3f::new(0.0, 0.0, 1.0),
            area_dens: 1.0,
        }
    }

    fn sample_emission(&self, rng: &mut dyn Rng) -> EmissionSample {
        let u = Vector2f::new(rng.draw(), rng.draw());
        let w = sample_uniform_sphere(&u);
        EmissionSample {
            surface: SurfaceSample { p: self.position, n: w, area_dens: 1.0 },
            w,
            solid_angle_dens: sample_uniform_sphere_pdf(),
        }
    }

    fn eval(&self, l: &Vector3f, _n_light: &Vector3f, n_target: &Vector3f) -> Color3f {
        let dist2 = l.dot(l);
        if dist2 <= 0.0 {
            return Color3f::zeros();
        }
        let dir = l / dist2.sqrt();
        let cos_target = n_target.dot(&-dir);
        if cos_target <= 0.0 {
            return Color3f::zeros();
        }
        self.intensity * (cos_target / dist2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;

    #[test]
    fn test_point_light_falloff() {
        let light = PointLight::new(Vector3f::zeros(), Color3f::new(4.0, 4.0, 4.0));
        let n_target = Vector3f::new(0.0, 0.0, -1.0);
        let near = light.eval(&Vector3f::new(0.0, 0.0, 1.0), &Vector3f::zeros(), &n_target);
        let far = light.eval(&Vector3f::new(0.0, 0.0, 2.0), &Vector3f::zeros(), &n_target);
        assert!((near[0] / far[0] - 4.0).abs() < 1e-4);
        assert_eq!(light.radiance(&Vector3f::new(0.0, 0.0, 1.0), &n_target), Color3f::zeros());
    }

    #[test]
    fn test_emission_covers_the_sphere() {
        let light = PointLight::new(Vector3f::zeros(), Color3f::new(1.0, 1.0, 1.0));
        let mut rng = LcgRng::new(5);
        let mut saw_up = false;
        let mut saw_down = false;
        for _ in 0..128 {
            let emission = light.sample_emission(&mut rng);
            assert!((emission.solid_angle_dens - sample_uniform_sphere_pdf()).abs() < 1e-7);
            assert!(emission.surface.area_dens == 1.0);
            if emission.w.z > 0.0 { saw_up = true; } else { saw_down = true; }
        }
        assert!(saw_up && saw_down);
    }
}
