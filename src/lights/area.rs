// Copyright @yucwang 2026

use crate::core::light::{ EmissionSample, Light, SurfaceSample };
use crate::core::rng::Rng;
use crate::core::shape::Shape;
use crate::core::tangent_frame::{ build_tangent_frame, local_to_world };
use crate::math::constants::{ Color3f, Vector2f, Vector3f };
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };
use std::sync::Arc;

/// Diffuse emitter attached to a shape: constant radiance over the front
/// side, cosine-distributed emission.
pub struct AreaLight {
    shape: Arc<dyn Shape>,
    radiance: Color3f,
}

impl AreaLight {
    pub fn from_shape(shape: Arc<dyn Shape>, radiance: Color3f) -> Self {
        Self { shape, radiance }
    }
}

impl Light for AreaLight {
    fn radiance(&self, w_out: &Vector3f, n_light: &Vector3f) -> Color3f {
        if n_light.dot(w_out) > 0.0 {
            self.radiance
        } else {
            Color3f::zeros()
        }
    }

    fn sample_emission_surface(&self, rng: &mut dyn Rng) -> SurfaceSample {
        let u = Vector2f::new(rng.draw(), rng.draw());
        self.shape.sample(&u)
    }

    fn sample_emission(&self, rng: &mut dyn Rng) -> EmissionSample {
        let surface = self.sample_emission_surface(rng);
        let u = Vector2f::new(rng.draw(), rng.draw());
        let local = sample_cosine_hemisphere(&u);
        let (tangent, bitangent) = build_tangent_frame(&surface.n);
        let w = local_to_world(&local, &tangent, &bitangent, &surface.n);
        EmissionSample {
            surface,
            w,
            solid_angle_dens: sample_cosine_hemisphere_pdf(local.z),
        }
    }

    fn eval(&self, l: &Vector3f, n_light: &Vector3f, n_target: &Vector3f) -> Color3f {
        let dist2 = l.dot(l);
        if dist2 <= 0.0 {
            return Color3f::zeros();
        }
        let dist = dist2.sqrt();
        let dir = l / dist;

        let cos_light = n_light.dot(&dir);
        let cos_target = n_target.dot(&-dir);
        if cos_light <= 0.0 || cos_target <= 0.0 {
            return Color3f::zeros();
        }

        self.radiance * (cos_light * cos_target / dist2)
    }
}
