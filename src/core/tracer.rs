// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::{ Light, LightSources };
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::math::constants::Color3f;
use crate::math::ray::Ray3f;

/// Primary-visibility record for one pixel ray. The emitter reference is
/// present only when the first hit lands on an emissive object.
pub struct FirstHit<'a> {
    pub intersect: IntersectInfo,
    pub light: Option<&'a dyn Light>,
}

/// Shared primary-visibility stage. Back-facing first hits are demoted to
/// misses before the emitter lookup.
pub fn compute_first_hit<'a>(rays: &[Ray3f],
                             path_space: &dyn PathSpace,
                             light_sources: &'a LightSources) -> Vec<FirstHit<'a>> {
    let mut hits = Vec::with_capacity(rays.len());
    for ray in rays {
        let mut intersect = path_space.intersect(ray);
        if intersect.normal.dot(&-ray.dir()) <= 0.0 {
            intersect = IntersectInfo::none();
        }
        let light = match intersect.geometry {
            Some(geo) if intersect.valid() => light_sources.obj_light(geo.id),
            _ => None,
        };
        hits.push(FirstHit { intersect, light });
    }
    hits
}

/// A path tracer estimates the radiance carried by each camera ray. One
/// call is pure: it borrows the scene containers immutably and owns its
/// path scratch for the duration of the call.
pub trait PathTracer: Send + Sync {
    fn sample(&self,
              rng: &mut dyn Rng,
              rays: &[Ray3f],
              first_hits: &[FirstHit],
              path_space: &dyn PathSpace,
              mats: &MaterialContainer,
              light_sources: &LightSources) -> Vec<Color3f>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{ Scene, SceneObject };
    use crate::core::material::MaterialContainer;
    use crate::materials::lambertian::LambertianBRDF;
    use crate::math::constants::Vector3f;
    use crate::shapes::rectangle::Rectangle;
    use crate::math::transform::Transform;
    use std::sync::Arc;

    fn single_panel_scene(emission: Option<Color3f>) -> (Scene, MaterialContainer) {
        let mut mats = MaterialContainer::new();
        let white = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.7, 0.7, 0.7))));
        // Unit panel at z = 2 facing the origin.
        let to_world = Transform::translate_rotate_y_scale(
            Vector3f::new(0.0, 0.0, 2.0),
            std::f32::consts::PI,
            Vector3f::new(1.0, 1.0, 1.0),
        );
        let panel: Arc<dyn crate::core::shape::Shape> = Arc::new(Rectangle::new(to_world));
        let mut scene = Scene::new();
        match emission {
            Some(e) => scene.add_object(SceneObject::with_emission(panel, white, e)),
            None => scene.add_object(SceneObject::new(panel, white)),
        }
        (scene, mats)
    }

    #[test]
    fn test_front_hit_records_emitter() {
        let (scene, _mats) = single_panel_scene(Some(Color3f::new(1.0, 1.0, 1.0)));
        let lights = scene.light_sources();
        let rays = vec![Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None)];
        let hits = compute_first_hit(&rays, &scene, &lights);
        assert!(hits[0].intersect.valid());
        assert!(hits[0].light.is_some());
    }

    #[test]
    fn test_back_hit_is_demoted_to_miss() {
        let (scene, _mats) = single_panel_scene(None);
        let lights = scene.light_sources();
        // Approaching the panel from behind.
        let rays = vec![Ray3f::new(Vector3f::new(0.0, 0.0, 4.0),
                                   Vector3f::new(0.0, 0.0, -1.0), None, None)];
        let hits = compute_first_hit(&rays, &scene, &lights);
        assert!(!hits[0].intersect.valid());
        assert!(hits[0].light.is_none());
    }

    #[test]
    fn test_miss_records_no_light() {
        let (scene, _mats) = single_panel_scene(Some(Color3f::new(1.0, 1.0, 1.0)));
        let lights = scene.light_sources();
        let rays = vec![Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None)];
        let hits = compute_first_hit(&rays, &scene, &lights);
        assert!(!hits[0].intersect.valid());
        assert!(hits[0].light.is_none());
    }
}
