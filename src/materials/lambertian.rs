// Copyright @yucwang 2026

use crate::core::material::Material;
use crate::core::rng::Rng;
use crate::core::tangent_frame::{ build_tangent_frame, local_to_world };
use crate::math::constants::{ Color3f, Float, INV_PI, Vector2f, Vector3f };
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

pub struct LambertianBRDF {
    albedo: Color3f,
}

impl LambertianBRDF {
    pub fn new(albedo: Color3f) -> Self {
        Self { albedo }
    }
}

impl Material for LambertianBRDF {
    fn eval(&self, _uv: &Vector2f, n: &Vector3f, wo: &Vector3f, wi: &Vector3f) -> Color3f {
        if n.dot(wo) <= 0.0 || n.dot(wi) <= 0.0 {
            return Color3f::zeros();
        }
        self.albedo * INV_PI
    }

    fn sample(&self, rng: &mut dyn Rng, _uv: &Vector2f, n: &Vector3f, wo: &Vector3f)
        -> (Vector3f, Float) {
        if n.dot(wo) <= 0.0 {
            return (*n, 0.0);
        }
        let u = Vector2f::new(rng.draw(), rng.draw());
        let local = sample_cosine_hemisphere(&u);
        let (tangent, bitangent) = build_tangent_frame(n);
        let wi = local_to_world(&local, &tangent, &bitangent, n);
        (wi, sample_cosine_hemisphere_pdf(local.z))
    }
}
