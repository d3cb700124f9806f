// Copyright @yucwang 2026

//! Built-in scenes: the Cornell box the binary renders, and the small
//! light rigs the transport tests measure against.

use crate::core::interaction::GeometryRef;
use crate::core::material::MaterialContainer;
use crate::core::scene::{ Scene, SceneObject };
use crate::core::shape::Shape;
use crate::materials::lambertian::LambertianBRDF;
use crate::math::constants::{ Color3f, Float, Vector3f };
use crate::math::transform::Transform;
use crate::shapes::cube::Cube;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;

use nalgebra as na;
use std::sync::Arc;

/// Half extent of the square light panel every rig shares; the panel is
/// centered on the y axis and faces -y.
pub const PANEL_HALF_EXTENT: Float = 0.5;

pub struct SceneRig {
    pub scene: Scene,
    pub mats: MaterialContainer,
    floor: Option<GeometryRef>,
}

impl SceneRig {
    pub fn floor_geometry(&self) -> Option<GeometryRef> {
        self.floor
    }
}

fn horizontal_rect(y: Float, half: Float, facing_up: bool) -> Arc<dyn Shape> {
    let angle = if facing_up { -std::f32::consts::FRAC_PI_2 } else { std::f32::consts::FRAC_PI_2 };
    let rotation = na::Rotation3::from_axis_angle(&Vector3f::x_axis(), angle);
    let matrix = crate::math::constants::Matrix4f::new_translation(&Vector3f::new(0.0, y, 0.0))
        * rotation.to_homogeneous()
        * crate::math::constants::Matrix4f::new_nonuniform_scaling(&Vector3f::new(half, half, 1.0));
    Arc::new(Rectangle::new(Transform::new(matrix)))
}

// The canonical quad faces +z; a y rotation turns it into any wall.
fn vertical_rect(translation: Vector3f, angle_y: Float, half: Float) -> Arc<dyn Shape> {
    Arc::new(Rectangle::new(Transform::translate_rotate_y_scale(
        translation, angle_y, Vector3f::new(half, half, 1.0))))
}

fn floor_rig(floor_half: Float, light_height: Float, emission: Color3f,
             floor_albedo: Float, occluder_height: Option<Float>) -> SceneRig {
    let mut mats = MaterialContainer::new();
    let floor_mat = mats.add(Arc::new(LambertianBRDF::new(
        Color3f::new(floor_albedo, floor_albedo, floor_albedo))));
    let dark = mats.add(Arc::new(LambertianBRDF::new(Color3f::zeros())));

    let mut scene = Scene::new();
    scene.add_object(SceneObject::new(horizontal_rect(0.0, floor_half, true), floor_mat));
    scene.add_object(SceneObject::with_emission(
        horizontal_rect(light_height, PANEL_HALF_EXTENT, false), dark, emission));
    if let Some(height) = occluder_height {
        scene.add_object(SceneObject::new(horizontal_rect(height, 2.0, false), dark));
    }

    SceneRig {
        scene,
        mats,
        floor: Some(GeometryRef { id: 0, material: floor_mat }),
    }
}

/// A grey floor in the y = 0 plane below the shared light panel.
pub fn floor_under_panel_light(floor_half: Float, light_height: Float,
                               emission: Color3f) -> SceneRig {
    floor_rig(floor_half, light_height, emission, 0.8, None)
}

/// Same rig with a perfectly black floor.
pub fn black_floor_under_panel_light() -> SceneRig {
    floor_rig(200.0, 1.0, Color3f::new(1.0, 1.0, 1.0), 0.0, None)
}

/// Same rig with an opaque plane between floor and light.
pub fn occluded_floor_under_panel_light() -> SceneRig {
    floor_rig(200.0, 1.0, Color3f::new(1.0, 1.0, 1.0), 0.8, Some(0.5))
}

/// Diffuse unit sphere at the origin below the shared light panel.
pub fn sphere_under_panel_light(light_height: Float, emission: Color3f) -> SceneRig {
    let mut mats = MaterialContainer::new();
    let grey = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.8, 0.8, 0.8))));
    let dark = mats.add(Arc::new(LambertianBRDF::new(Color3f::zeros())));

    let mut scene = Scene::new();
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::zeros(), 1.0)), grey));
    scene.add_object(SceneObject::with_emission(
        horizontal_rect(light_height, PANEL_HALF_EXTENT, false), dark, emission));

    SceneRig { scene, mats, floor: None }
}

/// Bare unit sphere, no emitters; the debug tracers render this.
pub fn unit_sphere() -> SceneRig {
    let mut mats = MaterialContainer::new();
    let grey = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.5, 0.5, 0.5))));
    let mut scene = Scene::new();
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::zeros(), 1.0)), grey));
    SceneRig { scene, mats, floor: None }
}

/// Closed [-1, 1]^3 room of uniform albedo with the shared light panel
/// under the ceiling. The energy-conservation tests run in here.
pub fn enclosed_box(albedo: Float, emission: Color3f) -> SceneRig {
    let mut mats = MaterialContainer::new();
    let wall = mats.add(Arc::new(LambertianBRDF::new(
        Color3f::new(albedo, albedo, albedo))));
    let dark = mats.add(Arc::new(LambertianBRDF::new(Color3f::zeros())));

    let mut scene = Scene::new();
    scene.add_object(SceneObject::new(horizontal_rect(-1.0, 1.0, true), wall));
    scene.add_object(SceneObject::new(horizontal_rect(1.0, 1.0, false), wall));
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(0.0, 0.0, -1.0), 0.0, 1.0), wall));
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(0.0, 0.0, 1.0), std::f32::consts::PI, 1.0), wall));
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(-1.0, 0.0, 0.0), std::f32::consts::FRAC_PI_2, 1.0), wall));
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(1.0, 0.0, 0.0), -std::f32::consts::FRAC_PI_2, 1.0), wall));
    scene.add_object(SceneObject::with_emission(
        horizontal_rect(0.98, PANEL_HALF_EXTENT, false), dark, emission));

    SceneRig { scene, mats, floor: Some(GeometryRef { id: 0, material: wall }) }
}

/// The classic two-box Cornell room.
pub fn cornell_box() -> SceneRig {
    let mut mats = MaterialContainer::new();
    let white = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.725, 0.71, 0.68))));
    let red = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.63, 0.065, 0.05))));
    let green = mats.add(Arc::new(LambertianBRDF::new(Color3f::new(0.14, 0.45, 0.091))));
    let dark = mats.add(Arc::new(LambertianBRDF::new(Color3f::zeros())));

    let mut scene = Scene::new();
    // Floor, ceiling, back wall.
    scene.add_object(SceneObject::new(horizontal_rect(-1.0, 1.0, true), white));
    scene.add_object(SceneObject::new(horizontal_rect(1.0, 1.0, false), white));
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(0.0, 0.0, -1.0), 0.0, 1.0), white));
    // Colored side walls.
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(-1.0, 0.0, 0.0), std::f32::consts::FRAC_PI_2, 1.0), red));
    scene.add_object(SceneObject::new(
        vertical_rect(Vector3f::new(1.0, 0.0, 0.0), -std::f32::consts::FRAC_PI_2, 1.0), green));
    // Tall and short boxes.
    scene.add_object(SceneObject::new(
        Arc::new(Cube::new(Transform::translate_rotate_y_scale(
            Vector3f::new(-0.35, -0.4, -0.3), 0.3,
            Vector3f::new(0.3, 0.6, 0.3)))), white));
    scene.add_object(SceneObject::new(
        Arc::new(Cube::new(Transform::translate_rotate_y_scale(
            Vector3f::new(0.4, -0.7, 0.3), -0.35,
            Vector3f::new(0.28, 0.3, 0.28)))), white));
    // Light panel just below the ceiling.
    scene.add_object(SceneObject::with_emission(
        horizontal_rect(0.98, PANEL_HALF_EXTENT, false), dark,
        Color3f::new(5.0, 5.0, 5.0)));

    SceneRig { scene, mats, floor: Some(GeometryRef { id: 0, material: white }) }
}

/// Deterministic midpoint quadrature of the panel's irradiance at `p`
/// with surface normal `n`, per unit emitted radiance. The panel sits at
/// `panel_y` facing -y with half extent `half`; occlusion is not
/// considered.
pub fn panel_irradiance(p: &Vector3f, n: &Vector3f, panel_y: Float, half: Float,
                        cells: usize) -> f64 {
    let panel_normal = Vector3f::new(0.0, -1.0, 0.0);
    let step = 2.0 * half / cells as Float;
    let cell_area = (step * step) as f64;

    let mut sum = 0.0f64;
    for iy in 0..cells {
        for ix in 0..cells {
            let q = Vector3f::new(-half + (ix as Float + 0.5) * step,
                                  panel_y,
                                  -half + (iy as Float + 0.5) * step);
            let l = p - q;
            let d2 = l.norm_squared();
            if d2 <= 0.0 {
                continue;
            }
            let dir = l / d2.sqrt();
            let cos_l = panel_normal.dot(&dir);
            let cos_p = n.dot(&-dir);
            if cos_l > 0.0 && cos_p > 0.0 {
                sum += (cos_l * cos_p / d2) as f64 * cell_area;
            }
        }
    }
    sum
}
