// Copyright @yucwang 2026

use crate::core::interaction::{ GeometryRef, IntersectInfo, MaterialId };
use crate::core::light::LightSources;
use crate::core::path_space::PathSpace;
use crate::core::shape::Shape;
use crate::lights::area::AreaLight;
use crate::math::aabb::AABB;
use crate::math::constants::{ Color3f, Float };
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: MaterialId,
    pub emission: Option<Color3f>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: MaterialId) -> Self {
        Self { shape, material, emission: None }
    }

    pub fn with_emission(shape: Arc<dyn Shape>, material: MaterialId, emission: Color3f) -> Self {
        Self { shape, material, emission: Some(emission) }
    }
}

/// Linear scene layout: the object index doubles as the geometry id that
/// hit records and emitter lookups refer back to.
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    pub fn with_objects(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// One diffuse area light per emissive object.
    pub fn light_sources(&self) -> LightSources {
        let mut sources = LightSources::new();
        for (id, object) in self.objects.iter().enumerate() {
            if let Some(emission) = object.emission {
                let light = AreaLight::from_shape(object.shape.clone(), emission);
                sources.add(Arc::new(light), Some(id));
            }
        }
        sources
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSpace for Scene {
    fn intersect(&self, ray: &Ray3f) -> IntersectInfo {
        let mut closest = IntersectInfo::none();
        let mut closest_t = std::f32::MAX;

        for (id, object) in self.objects.iter().enumerate() {
            if let Some(mut hit) = object.shape.ray_intersection(ray) {
                if hit.t < closest_t {
                    closest_t = hit.t;
                    hit.geometry = Some(GeometryRef { id, material: object.material });
                    closest = hit;
                }
            }
        }

        closest
    }

    fn has_intersect(&self, ray: &Ray3f, t_min: Float, t_max: Float) -> Option<Float> {
        if t_max <= t_min {
            return None;
        }
        let clipped = Ray3f::new(ray.origin(), ray.dir(), Some(t_min), Some(t_max));
        for object in &self.objects {
            if let Some(hit) = object.shape.ray_intersection(&clipped) {
                return Some(hit.t);
            }
        }
        None
    }

    fn aabb(&self) -> AABB {
        let mut bounds = AABB::default();
        for object in &self.objects {
            bounds.expand_by_aabb(&object.shape.bounding_box());
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::{ Vector2f, Vector3f };
    use crate::core::light::SurfaceSample;

    // Plane z = depth facing -z, infinite in x/y.
    struct TestSlab {
        depth: Float,
    }

    impl Shape for TestSlab {
        fn bounding_box(&self) -> AABB {
            AABB::new(Vector3f::new(-1.0, -1.0, self.depth),
                      Vector3f::new(1.0, 1.0, self.depth))
        }

        fn ray_intersection(&self, ray: &Ray3f) -> Option<IntersectInfo> {
            if ray.dir().z.abs() < 1e-8 {
                return None;
            }
            let t = (self.depth - ray.origin().z) / ray.dir().z;
            if !ray.test_segment(t) {
                return None;
            }
            Some(IntersectInfo::new(
                ray.at(t),
                Vector3f::new(0.0, 0.0, -1.0),
                Vector2f::new(0.0, 0.0),
                t,
                None,
            ))
        }

        fn sample(&self, _u: &Vector2f) -> SurfaceSample {
            SurfaceSample {
                p: Vector3f::new(0.0, 0.0, self.depth),
                n: Vector3f::new(0.0, 0.0, -1.0),
                area_dens: 0.25,
            }
        }

        fn surface_area(&self) -> Float {
            4.0
        }
    }

    fn slab_scene(depths: &[Float]) -> Scene {
        let mut scene = Scene::new();
        for depth in depths {
            scene.add_object(SceneObject::new(Arc::new(TestSlab { depth: *depth }), 0));
        }
        scene
    }

    #[test]
    fn test_closest_hit_wins() {
        let scene = slab_scene(&[5.0, 2.0, 10.0]);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = scene.intersect(&ray);
        assert!(hit.valid());
        assert!((hit.t - 2.0).abs() < 1e-6);
        assert_eq!(hit.geometry.map(|geo| geo.id), Some(1));
    }

    #[test]
    fn test_any_hit_respects_range() {
        let scene = slab_scene(&[5.0]);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(scene.has_intersect(&ray, 1e-4, 10.0).is_some());
        assert!(scene.has_intersect(&ray, 1e-4, 4.0).is_none());
        assert!(scene.has_intersect(&ray, 6.0, 10.0).is_none());
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::new();
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(!scene.intersect(&ray).valid());
        assert!(scene.light_sources().is_empty());
        assert!(!scene.aabb().is_valid());
    }
}
