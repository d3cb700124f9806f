// Copyright @yucwang 2026

use crate::core::interaction::GeometryId;
use crate::core::rng::Rng;
use crate::math::constants::{ Color3f, Float, Vector3f };
use std::collections::HashMap;
use std::sync::Arc;

/// Area-sampled point on an emitter surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub p: Vector3f,
    pub n: Vector3f,
    pub area_dens: Float,
}

/// Area-sampled emitter point together with an outgoing direction drawn
/// from the emitter's angular distribution.
#[derive(Debug, Clone, Copy)]
pub struct EmissionSample {
    pub surface: SurfaceSample,
    pub w: Vector3f,
    pub solid_angle_dens: Float,
}

pub trait Light: Send + Sync {
    /// Radiance leaving the light in world direction `w_out`; zero on the
    /// back side.
    fn radiance(&self, w_out: &Vector3f, n_light: &Vector3f) -> Color3f;

    /// `radiance * max(0, n·w)`.
    fn projected_radiance(&self, w_out: &Vector3f, n_light: &Vector3f) -> Color3f {
        self.radiance(w_out, n_light) * n_light.dot(w_out).max(0.0)
    }

    fn sample_emission_surface(&self, rng: &mut dyn Rng) -> SurfaceSample;

    fn sample_emission(&self, rng: &mut dyn Rng) -> EmissionSample;

    /// Radiance arriving at a surface point over the connection vector `l`
    /// (pointing from the light sample to the target). Folds the emitter
    /// cosine, the receiver cosine and the inverse-square falloff, so
    /// shadow-connection code multiplies it by the bare BRDF only.
    fn eval(&self, l: &Vector3f, n_light: &Vector3f, n_target: &Vector3f) -> Color3f;
}

pub struct LightSources {
    lights: Vec<Arc<dyn Light>>,
    by_geometry: HashMap<GeometryId, usize>,
}

impl LightSources {
    pub fn new() -> Self {
        Self { lights: Vec::new(), by_geometry: HashMap::new() }
    }

    pub fn add(&mut self, light: Arc<dyn Light>, geometry: Option<GeometryId>) {
        if let Some(id) = geometry {
            self.by_geometry.insert(id, self.lights.len());
        }
        self.lights.push(light);
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Uniform discrete selection of one emitter. Returns the light and
    /// its selection probability mass, or None for a scene with no
    /// emitters.
    pub fn sample_light(&self, rng: &mut dyn Rng) -> Option<(&dyn Light, Float)> {
        if self.lights.is_empty() {
            return None;
        }
        let count = self.lights.len();
        let mut index = (rng.draw() * count as Float) as usize;
        if index >= count {
            index = count - 1;
        }
        Some((self.lights[index].as_ref(), 1.0 / count as Float))
    }

    /// Reverse lookup from hit geometry to the emitter attached to it.
    pub fn obj_light(&self, geometry: GeometryId) -> Option<&dyn Light> {
        self.by_geometry
            .get(&geometry)
            .map(|index| self.lights[*index].as_ref())
    }
}

impl Default for LightSources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;
    use crate::lights::point::PointLight;

    #[test]
    fn test_empty_sources_sample_nothing() {
        let sources = LightSources::new();
        let mut rng = LcgRng::new(1);
        assert!(sources.sample_light(&mut rng).is_none());
        assert!(sources.obj_light(0).is_none());
    }

    #[test]
    fn test_selection_mass_is_uniform() {
        let mut sources = LightSources::new();
        let intensity = Color3f::new(1.0, 1.0, 1.0);
        sources.add(Arc::new(PointLight::new(Vector3f::zeros(), intensity)), None);
        sources.add(Arc::new(PointLight::new(Vector3f::new(1.0, 0.0, 0.0), intensity)), Some(4));

        let mut rng = LcgRng::new(9);
        for _ in 0..32 {
            let (_, mass) = sources.sample_light(&mut rng).unwrap();
            assert!((mass - 0.5).abs() < 1e-6);
        }
        assert!(sources.obj_light(4).is_some());
        assert!(sources.obj_light(5).is_none());
    }
}
