// Copyright @yucwang 2026

use crate::core::material::Material;
use crate::core::rng::Rng;
use crate::core::tangent_frame::{ build_tangent_frame, local_to_world, world_to_local };
use crate::math::constants::{ Color3f, Float, INV_PI, Vector2f, Vector3f };
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

/// Oren-Nayar rough diffuse reflection (the A/B approximation).
pub struct OrenNayarBRDF {
    albedo: Color3f,
    a: Float,
    b: Float,
}

impl OrenNayarBRDF {
    /// `sigma` is the surface roughness in degrees; 0 degenerates to
    /// Lambertian.
    pub fn new(albedo: Color3f, sigma: Float) -> Self {
        let sigma_rad = sigma.to_radians();
        let sigma2 = sigma_rad * sigma_rad;
        let a = 1.0 - sigma2 / (2.0 * (sigma2 + 0.33));
        let b = 0.45 * sigma2 / (sigma2 + 0.09);
        Self { albedo, a, b }
    }
}

impl Material for OrenNayarBRDF {
    fn eval(&self, _uv: &Vector2f, n: &Vector3f, wo: &Vector3f, wi: &Vector3f) -> Color3f {
        if n.dot(wo) <= 0.0 || n.dot(wi) <= 0.0 {
            return Color3f::zeros();
        }

        let (tangent, bitangent) = build_tangent_frame(n);
        let lo = world_to_local(wo, &tangent, &bitangent, n);
        let li = world_to_local(wi, &tangent, &bitangent, n);

        let sin_theta_o = (1.0 - lo.z * lo.z).max(0.0).sqrt();
        let sin_theta_i = (1.0 - li.z * li.z).max(0.0).sqrt();

        let mut max_cos = 0.0;
        if sin_theta_o > 1e-4 && sin_theta_i > 1e-4 {
            let d_cos = (li.x * lo.x + li.y * lo.y) / (sin_theta_i * sin_theta_o);
            max_cos = d_cos.max(0.0);
        }

        let (sin_alpha, tan_beta) = if li.z.abs() > lo.z.abs() {
            (sin_theta_o, sin_theta_i / li.z.abs())
        } else {
            (sin_theta_i, sin_theta_o / lo.z.abs())
        };

        self.albedo * INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_roughness_matches_lambertian() {
        let brdf = OrenNayarBRDF::new(Color3f::new(0.6, 0.6, 0.6), 0.0);
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.3, 0.1, 0.9).normalize();
        let wi = Vector3f::new(-0.2, 0.4, 0.8).normalize();
        let uv = Vector2f::new(0.0, 0.0);
        let f = brdf.eval(&uv, &n, &wo, &wi);
        assert!((f[0] - 0.6 * INV_PI).abs() < 1e-5);
    }

    #[test]
    fn test_roughness_darkens_normal_incidence() {
        let smooth = OrenNayarBRDF::new(Color3f::new(0.6, 0.6, 0.6), 0.0);
        let rough = OrenNayarBRDF::new(Color3f::new(0.6, 0.6, 0.6), 30.0);
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let w = Vector3f::new(0.0, 0.0, 1.0);
        let uv = Vector2f::new(0.0, 0.0);
        // Straight-on reflection loses energy relative to Lambertian.
        assert!(rough.eval(&uv, &n, &w, &w)[0] < smooth.eval(&uv, &n, &w, &w)[0]);
    }

    #[test]
    fn test_backside_is_black() {
        let brdf = OrenNayarBRDF::new(Color3f::new(0.6, 0.6, 0.6), 20.0);
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let below = Vector3f::new(0.0, 0.0, -1.0);
        let uv = Vector2f::new(0.0, 0.0);
        assert_eq!(brdf.eval(&uv, &n, &wo, &below), Color3f::zeros());
    }
}
