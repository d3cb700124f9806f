// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::SurfaceSample;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::sample_uniform_sphere;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
    area: Float,
    inv_area: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        let area = 4.0 * PI * radius * radius;
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };
        Self { center, radius, area, inv_area }
    }

    fn sphere_uv(n: &Vector3f) -> Vector2f {
        let mut phi = n.y.atan2(n.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        let theta = n.z.clamp(-1.0, 1.0).acos();
        Vector2f::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Shape for Sphere {
    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - r, self.center + r)
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<IntersectInfo> {
        let o = ray.origin() - self.center;
        let d = ray.dir();

        let a = d.dot(&d);
        let b = 2.0 * d.dot(&o);
        let c = o.dot(&o) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();

        // Numerically stable quadratic roots.
        let q = if b < 0.0 {
            -0.5 * (b - root)
        } else {
            -0.5 * (b + root)
        };
        let mut t0 = q / a;
        let mut t1 = if q != 0.0 { c / q } else { t0 };
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        let t = if ray.test_segment(t0) {
            t0
        } else if ray.test_segment(t1) {
            t1
        } else {
            return None;
        };

        let p = ray.at(t);
        let n = (p - self.center).normalize();
        Some(IntersectInfo::new(p, n, Self::sphere_uv(&n), t, None))
    }

    fn sample(&self, u: &Vector2f) -> SurfaceSample {
        let n = sample_uniform_sphere(u);
        SurfaceSample {
            p: self.center + n * self.radius,
            n,
            area_dens: self.inv_area,
        }
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}
