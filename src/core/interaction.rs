// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector2f, Vector3f };

pub type GeometryId = usize;
pub type MaterialId = usize;

/// Non-owning back-reference from a surface hit into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryRef {
    pub id: GeometryId,
    pub material: MaterialId,
}

/// Record of the closest positive hit along a ray. The distinguished miss
/// is the default record, for which `valid()` is false.
#[derive(Debug, Clone, Copy)]
pub struct IntersectInfo {
    pub vertex: Vector3f,
    pub normal: Vector3f,
    pub uv: Vector2f,
    pub t: Float,
    pub geometry: Option<GeometryRef>,
}

impl Default for IntersectInfo {
    fn default() -> Self {
        Self::none()
    }
}

impl IntersectInfo {
    pub fn new(vertex: Vector3f,
               normal: Vector3f,
               uv: Vector2f,
               t: Float,
               geometry: Option<GeometryRef>) -> Self {
        Self { vertex, normal, uv, t, geometry }
    }

    pub fn none() -> Self {
        Self {
            vertex: Vector3f::zeros(),
            normal: Vector3f::zeros(),
            uv: Vector2f::new(0.0, 0.0),
            t: -1.0,
            geometry: None,
        }
    }

    pub fn valid(&self) -> bool {
        self.t > 0.0 && self.geometry.is_some()
    }

    pub fn material_id(&self) -> Option<MaterialId> {
        self.geometry.map(|geo| geo.material)
    }
}
