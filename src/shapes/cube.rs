// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::SurfaceSample;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

/// The canonical [-1, 1]^3 box placed by `to_world`.
pub struct Cube {
    to_world: Transform,
    face_areas: [Float; 6],
    area: Float,
}

impl Cube {
    pub fn new(to_world: Transform) -> Self {
        let dx = to_world.apply_vector(Vector3f::new(2.0, 0.0, 0.0));
        let dy = to_world.apply_vector(Vector3f::new(0.0, 2.0, 0.0));
        let dz = to_world.apply_vector(Vector3f::new(0.0, 0.0, 2.0));
        let area_xy = dx.cross(&dy).norm();
        let area_xz = dx.cross(&dz).norm();
        let area_yz = dy.cross(&dz).norm();
        let face_areas = [area_xy, area_xy, area_xz, area_xz, area_yz, area_yz];
        let area = 2.0 * (area_xy + area_xz + area_yz);
        Self { to_world, face_areas, area }
    }

    fn intersect_local(&self, ray: &Ray3f) -> Option<(Vector3f, Vector3f)> {
        let ray_local = self.to_world.inv_apply_ray(ray);
        let o = ray_local.origin();
        let d = ray_local.dir();

        let mut t_min = 0.0f32;
        let mut t_max = std::f32::MAX;

        for axis in 0..3 {
            let dir = d[axis];
            if dir.abs() < EPSILON {
                if o[axis] < -1.0 || o[axis] > 1.0 {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (-1.0 - o[axis]) * inv;
            let mut t1 = (1.0 - o[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        let t_hit = if t_min > 0.0 { t_min } else { t_max };
        let p_local = ray_local.at(t_hit);
        let n_local = cube_normal(p_local);
        Some((p_local, n_local))
    }

    fn sample_face(face: usize, u: &Vector2f) -> (Vector3f, Vector3f) {
        let a = 2.0 * u.x - 1.0;
        let b = 2.0 * u.y - 1.0;
        match face {
            0 => (Vector3f::new(a, b, 1.0), Vector3f::new(0.0, 0.0, 1.0)),
            1 => (Vector3f::new(a, b, -1.0), Vector3f::new(0.0, 0.0, -1.0)),
            2 => (Vector3f::new(a, 1.0, b), Vector3f::new(0.0, 1.0, 0.0)),
            3 => (Vector3f::new(a, -1.0, b), Vector3f::new(0.0, -1.0, 0.0)),
            4 => (Vector3f::new(1.0, a, b), Vector3f::new(1.0, 0.0, 0.0)),
            _ => (Vector3f::new(-1.0, a, b), Vector3f::new(-1.0, 0.0, 0.0)),
        }
    }
}

impl Shape for Cube {
    fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::default();
        for ix in [-1.0f32, 1.0] {
            for iy in [-1.0f32, 1.0] {
                for iz in [-1.0f32, 1.0] {
                    let p = self.to_world.apply_point(Vector3f::new(ix, iy, iz));
                    bbox.expand_by_point(&p);
                }
            }
        }
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<IntersectInfo> {
        let (p_local, n_local) = self.intersect_local(ray)?;
        let p_world = self.to_world.apply_point(p_local);
        let t_world = (p_world - ray.origin()).dot(&ray.dir());
        if !ray.test_segment(t_world) {
            return None;
        }
        let n_world = self.to_world.apply_normal(n_local).normalize();
        let uv = face_uv(p_local, n_local);
        Some(IntersectInfo::new(p_world, n_world, uv, t_world, None))
    }

    fn sample(&self, u: &Vector2f) -> SurfaceSample {
        if self.area <= 0.0 {
            return SurfaceSample {
                p: self.to_world.apply_point(Vector3f::zeros()),
                n: Vector3f::new(0.0, 0.0, 1.0),
                area_dens: 0.0,
            };
        }

        // Pick a face proportionally to its area, then reuse u.x within it.
        let target = u.x * self.area;
        let mut accum = 0.0;
        let mut face = 5usize;
        for i in 0..6 {
            accum += self.face_areas[i];
            if target <= accum {
                face = i;
                break;
            }
        }
        let prev = accum - self.face_areas[face];
        let local_u = if self.face_areas[face] > 0.0 {
            ((target - prev) / self.face_areas[face]).clamp(0.0, 1.0)
        } else {
            0.5
        };

        let (p_local, n_local) = Self::sample_face(face, &Vector2f::new(local_u, u.y));
        SurfaceSample {
            p: self.to_world.apply_point(p_local),
            n: self.to_world.apply_normal(n_local).normalize(),
            area_dens: 1.0 / self.area,
        }
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}

fn cube_normal(p: Vector3f) -> Vector3f {
    let ax = p.x.abs();
    let ay = p.y.abs();
    let az = p.z.abs();
    if ax >= ay && ax >= az {
        Vector3f::new(p.x.signum(), 0.0, 0.0)
    } else if ay >= az {
        Vector3f::new(0.0, p.y.signum(), 0.0)
    } else {
        Vector3f::new(0.0, 0.0, p.z.signum())
    }
}

fn face_uv(p_local: Vector3f, n_local: Vector3f) -> Vector2f {
    let (u, v) = if n_local.z.abs() > 0.5 {
        (0.5 * (p_local.x + 1.0), 0.5 * (p_local.y + 1.0))
    } else if n_local.y.abs() > 0.5 {
        (0.5 * (p_local.x + 1.0), 0.5 * (p_local.z + 1.0))
    } else {
        (0.5 * (p_local.y + 1.0), 0.5 * (p_local.z + 1.0))
    };
    Vector2f::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_hit_from_outside() {
        let cube = Cube::new(Transform::default());
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, -4.0),
                             Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = cube.ray_intersection(&ray).expect("expected intersection");
        assert!((hit.t - 3.0).abs() < 1e-4);
        assert!((hit.normal - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn test_cube_hit_from_inside() {
        let cube = Cube::new(Transform::default());
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let hit = cube.ray_intersection(&ray).expect("expected intersection");
        assert!((hit.t - 1.0).abs() < 1e-4);
        assert!((hit.normal - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_cube_area_and_sampling() {
        let cube = Cube::new(Transform::translate_scale(Vector3f::zeros(),
                                                        Vector3f::new(0.5, 0.5, 0.5)));
        assert!((cube.surface_area() - 6.0).abs() < 1e-4);
        let sample = cube.sample(&Vector2f::new(0.37, 0.83));
        assert!((sample.area_dens - 1.0 / 6.0).abs() < 1e-5);
        // The sampled point sits on the unit-half-extent box surface.
        let p = sample.p;
        let max_axis = p.x.abs().max(p.y.abs()).max(p.z.abs());
        assert!((max_axis - 0.5).abs() < 1e-4);
    }
}
