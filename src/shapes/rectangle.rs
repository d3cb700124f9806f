// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::SurfaceSample;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

/// The canonical [-1, 1]^2 quad in the z = 0 plane, placed by `to_world`.
pub struct Rectangle {
    to_world: Transform,
    normal: Vector3f,
    area: Float,
    inv_area: Float,
}

impl Rectangle {
    pub fn new(to_world: Transform) -> Self {
        let dp_du = to_world.apply_vector(Vector3f::new(2.0, 0.0, 0.0));
        let dp_dv = to_world.apply_vector(Vector3f::new(0.0, 2.0, 0.0));
        let area = dp_du.cross(&dp_dv).norm();
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };
        let mut normal = dp_du.cross(&dp_dv);
        if normal.norm() > 0.0 {
            normal = normal.normalize();
        } else {
            normal = to_world.apply_normal(Vector3f::new(0.0, 0.0, 1.0)).normalize();
        }

        Self { to_world, normal, area, inv_area }
    }

    fn intersect_local(&self, ray: &Ray3f) -> Option<(Vector3f, Vector2f)> {
        let ray_local = self.to_world.inv_apply_ray(ray);
        let dir = ray_local.dir();
        if dir.z.abs() < EPSILON {
            return None;
        }

        let t_local = -ray_local.origin().z / dir.z;
        if t_local < 0.0 {
            return None;
        }
        let p_local = ray_local.at(t_local);
        if p_local.x.abs() > 1.0 || p_local.y.abs() > 1.0 {
            return None;
        }

        let uv = Vector2f::new(0.5 * (p_local.x + 1.0), 0.5 * (p_local.y + 1.0));
        Some((p_local, uv))
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::default();
        let corners = [
            Vector3f::new(-1.0, -1.0, 0.0),
            Vector3f::new(-1.0,  1.0, 0.0),
            Vector3f::new( 1.0, -1.0, 0.0),
            Vector3f::new( 1.0,  1.0, 0.0),
        ];
        for corner in &corners {
            let p = self.to_world.apply_point(*corner);
            bbox.expand_by_point(&p);
        }
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<IntersectInfo> {
        let (p_local, uv) = self.intersect_local(ray)?;
        let p_world = self.to_world.apply_point(p_local);
        let t_world = (p_world - ray.origin()).dot(&ray.dir());
        if !ray.test_segment(t_world) {
            return None;
        }

        Some(IntersectInfo::new(p_world, self.normal, uv, t_world, None))
    }

    fn sample(&self, u: &Vector2f) -> SurfaceSample {
        let p_local = Vector3f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0, 0.0);
        let p_world = self.to_world.apply_point(p_local);
        SurfaceSample { p: p_world, n: self.normal, area_dens: self.inv_area }
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_rectangle_hit_and_area() {
        let quad = Rectangle::new(Transform::default());
        assert!((quad.surface_area() - 4.0).abs() < 1e-5);

        let ray = Ray3f::new(Vector3f::new(0.25, -0.5, -3.0),
                             Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = quad.ray_intersection(&ray).expect("expected intersection");
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!((hit.uv - Vector2f::new(0.625, 0.25)).norm() < 1e-5);

        let outside = Ray3f::new(Vector3f::new(1.5, 0.0, -3.0),
                                 Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(quad.ray_intersection(&outside).is_none());
    }

    #[test]
    fn test_sample_density_matches_area() {
        let to_world = Transform::translate_scale(Vector3f::new(0.0, 5.0, 0.0),
                                                  Vector3f::new(2.0, 2.0, 1.0));
        let quad = Rectangle::new(to_world);
        let sample = quad.sample(&Vector2f::new(0.5, 0.5));
        assert!((sample.p - Vector3f::new(0.0, 5.0, 0.0)).norm() < 1e-5);
        assert!((sample.area_dens - 1.0 / quad.surface_area()).abs() < 1e-6);
    }
}
