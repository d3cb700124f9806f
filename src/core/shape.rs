// Copyright @yucwang 2023

use crate::core::interaction::IntersectInfo;
use crate::core::light::SurfaceSample;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector2f };
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn bounding_box(&self) -> AABB;

    /// Closest hit within the ray's clip range. The returned record has no
    /// geometry reference; the scene attaches one.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<IntersectInfo>;

    /// Uniform area sample of the surface.
    fn sample(&self, u: &Vector2f) -> SurfaceSample;

    fn surface_area(&self) -> Float;
}
