// Copyright @yucwang 2026

use crate::core::interaction::MaterialId;
use crate::core::rng::Rng;
use crate::math::constants::{ Color3f, Float, Vector2f, Vector3f };
use std::sync::Arc;

/// Surface reflectance contract used by the transport estimators. All
/// directions are world-space and unit length; `wo` points toward the
/// previous path vertex, `wi` toward the next one.
pub trait Material: Send + Sync {
    /// BRDF value at the surface point. Zero whenever either direction is
    /// on the back side of an opaque surface.
    fn eval(&self, uv: &Vector2f, n: &Vector3f, wo: &Vector3f, wi: &Vector3f) -> Color3f;

    /// Importance-sample an incoming direction. The returned density is
    /// measured in projected solid angle; a zero density means the walk
    /// was absorbed and the returned direction must not be used.
    fn sample(&self, rng: &mut dyn Rng, uv: &Vector2f, n: &Vector3f, wo: &Vector3f)
        -> (Vector3f, Float);
}

pub struct MaterialContainer {
    materials: Vec<Arc<dyn Material>>,
}

impl MaterialContainer {
    pub fn new() -> Self {
        Self { materials: Vec::new() }
    }

    pub fn add(&mut self, material: Arc<dyn Material>) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn find(&self, id: MaterialId) -> &dyn Material {
        self.materials[id].as_ref()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialContainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::lambertian::LambertianBRDF;

    #[test]
    fn test_container_lookup() {
        let mut mats = MaterialContainer::new();
        assert!(mats.is_empty());
        let white = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.8, 0.8, 0.8))));
        let red = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.6, 0.0, 0.0))));
        assert_eq!(white, 0);
        assert_eq!(red, 1);
        assert_eq!(mats.len(), 2);

        let n = Vector3f::new(0.0, 0.0, 1.0);
        let w = Vector3f::new(0.0, 0.0, 1.0);
        let uv = Vector2f::new(0.0, 0.0);
        let f = mats.find(red).eval(&uv, &n, &w, &w);
        assert!(f[0] > 0.0 && f[1] == 0.0);
    }
}
