// Copyright @yucwang 2026

use crate::core::interaction::IntersectInfo;
use crate::core::light::{ Light, LightSources, SurfaceSample };
use crate::core::material::MaterialContainer;
use crate::core::path_space::PathSpace;
use crate::core::rng::Rng;
use crate::core::tracer::FirstHit;
use crate::math::constants::{ Color3f, Float, Vector3f };
use crate::math::ray::Ray3f;

use super::{ SHADOW_RAY_CLIP, SHADOW_RAY_MIN };

/// One hop of a random walk. The vector points from the hop's end vertex
/// back toward the previous vertex, so it is anchored at `vert` rather
/// than at the vertex the hop was sampled from. `dens` is the projected
/// solid-angle density the hop direction was drawn with, conditioned on
/// every hop before it. Only the first hop of a camera walk may carry an
/// emitter reference.
#[derive(Clone, Copy)]
pub(crate) struct SampledPathlet<'a> {
    pub v: Vector3f,
    pub dens: Float,
    pub vert: IntersectInfo,
    pub light: Option<&'a dyn Light>,
}

impl Default for SampledPathlet<'_> {
    fn default() -> Self {
        Self {
            v: Vector3f::zeros(),
            dens: 0.0,
            vert: IntersectInfo::none(),
            light: None,
        }
    }
}

impl<'a> SampledPathlet<'a> {
    fn new(away: Vector3f, vert: IntersectInfo, light: Option<&'a dyn Light>, dens: Float) -> Self {
        Self { v: away, dens, vert, light }
    }

    pub fn towards_prev(&self) -> Vector3f {
        self.v
    }

    pub fn towards(&self) -> Vector3f {
        -self.v
    }

    fn sample_brdf(&self, rng: &mut dyn Rng, mats: &MaterialContainer) -> (Vector3f, Float) {
        sample_brdf(rng, &self.vert, &self.towards_prev(), mats)
    }
}

pub(crate) fn sample_brdf(rng: &mut dyn Rng,
                          vert: &IntersectInfo,
                          o: &Vector3f,
                          mats: &MaterialContainer) -> (Vector3f, Float) {
    match vert.material_id() {
        Some(id) => mats.find(id).sample(rng, &vert.uv, &vert.normal, o),
        None => (*o, 0.0),
    }
}

pub(crate) fn brdf(vert: &IntersectInfo,
                   o: &Vector3f,
                   i: &Vector3f,
                   mats: &MaterialContainer) -> Color3f {
    match vert.material_id() {
        Some(id) => mats.find(id).eval(&vert.uv, &vert.normal, o, i),
        None => Color3f::zeros(),
    }
}

fn projected_brdf(current: &SampledPathlet,
                  next: &SampledPathlet,
                  mats: &MaterialContainer) -> Color3f {
    let cos_w = current.vert.normal.dot(&next.towards());
    brdf(&current.vert, &next.towards(), &current.towards_prev(), mats) * cos_w
}

fn projected_adjoint_brdf(current: &SampledPathlet,
                          next: &SampledPathlet,
                          mats: &MaterialContainer) -> Color3f {
    let cos_w = current.vert.normal.dot(&next.towards());
    brdf(&current.vert, &current.towards_prev(), &next.towards(), mats) * cos_w
}

/// Extend an already bootstrapped walk one BRDF sample at a time until the
/// scratch slice is full, the sample is absorbed, the continuation ray
/// escapes, or it lands on a back face.
fn extend_path<'a>(rng: &mut dyn Rng,
                   sampled_path: &mut [SampledPathlet<'a>],
                   mut depth: usize,
                   path_space: &dyn PathSpace,
                   mats: &MaterialContainer) -> usize {
    while depth < sampled_path.len() {
        let (i, w_dens) = sampled_path[depth - 1].sample_brdf(rng, mats);
        if w_dens == 0.0 {
            return depth;
        }

        let ray = Ray3f::new(sampled_path[depth - 1].vert.vertex, i,
                             Some(SHADOW_RAY_MIN), None);
        let next_vert = path_space.intersect(&ray);
        if next_vert.valid() && next_vert.normal.dot(&-i) > 0.0 {
            // Only the first hop needs the emitter lookup.
            sampled_path[depth] = SampledPathlet::new(-i, next_vert, None, w_dens);
            depth += 1;
        } else {
            return depth;
        }
    }
    depth
}

/// Sample a walk conditioned on the bootstrap ray `r0` whose direction was
/// drawn with density `dens0`. Returns the number of pathlets written,
/// which is short of the scratch length whenever the walk leaves the path
/// space.
pub(crate) fn sample_path<'a>(rng: &mut dyn Rng,
                              sampled_path: &mut [SampledPathlet<'a>],
                              r0: &Ray3f,
                              dens0: Float,
                              path_space: &dyn PathSpace,
                              mats: &MaterialContainer) -> usize {
    if sampled_path.is_empty() || dens0 == 0.0 {
        return 0;
    }
    let vert0 = path_space.intersect(r0);
    if !vert0.valid() || vert0.normal.dot(&-r0.dir()) <= 0.0 {
        return 0;
    }
    sampled_path[0] = SampledPathlet::new(-r0.dir(), vert0, None, dens0);
    extend_path(rng, sampled_path, 1, path_space, mats)
}

/// Same walk, bootstrapped from a deterministic first hit (density one).
pub(crate) fn sample_path_from_hit<'a>(rng: &mut dyn Rng,
                                       sampled_path: &mut [SampledPathlet<'a>],
                                       r0: &Ray3f,
                                       hit: &FirstHit<'a>,
                                       path_space: &dyn PathSpace,
                                       mats: &MaterialContainer) -> usize {
    if sampled_path.is_empty() || !hit.intersect.valid() {
        return 0;
    }
    sampled_path[0] = SampledPathlet::new(-r0.dir(), hit.intersect, hit.light, 1.0);
    extend_path(rng, sampled_path, 1, path_space, mats)
}

/// Connect a known emitter point to `target_vert` and evaluate the
/// transported radiance. The light's `eval` folds the geometric terms, so
/// an unoccluded connection contributes `illum * f_r` and nothing else.
pub(crate) fn transport_illum_source(light: &dyn Light,
                                     p_illum: &Vector3f,
                                     n_illum: &Vector3f,
                                     target_vert: &IntersectInfo,
                                     target_o_ray: &Vector3f,
                                     path_space: &dyn PathSpace,
                                     mats: &MaterialContainer) -> Color3f {
    let l = target_vert.vertex - p_illum;
    let illum = light.eval(&l, n_illum, &target_vert.normal);
    if illum == Color3f::zeros() {
        return Color3f::zeros();
    }

    let distance = l.norm();
    let i = -l / distance;

    let light_ray = Ray3f::new(target_vert.vertex, i, None, None);
    if path_space
        .has_intersect(&light_ray, SHADOW_RAY_MIN, distance - SHADOW_RAY_CLIP)
        .is_none()
    {
        illum.component_mul(&brdf(target_vert, target_o_ray, &i, mats))
    } else {
        Color3f::zeros()
    }
}

pub(crate) struct LightSample<'a> {
    pub light: &'a dyn Light,
    pub surface: SurfaceSample,
}

/// Select an emitter and a point on it. The returned area density is
/// already scaled by the selection probability mass.
pub(crate) fn sample_light_source<'a>(rng: &mut dyn Rng,
                                      light_sources: &'a LightSources)
                                      -> Option<LightSample<'a>> {
    let (light, light_prob_mass) = light_sources.sample_light(rng)?;
    let mut surface = light.sample_emission_surface(rng);
    surface.area_dens *= light_prob_mass;
    Some(LightSample { light, surface })
}

/// Next-event estimate at `target_vert`: average `multi_light_samps`
/// single-connection samples, each divided by its selection-scaled area
/// density.
pub(crate) fn transport_direct_illum(rng: &mut dyn Rng,
                                     target_o_ray: &Vector3f,
                                     target_vert: &IntersectInfo,
                                     path_space: &dyn PathSpace,
                                     mats: &MaterialContainer,
                                     light_sources: &LightSources,
                                     multi_light_samps: u32) -> Color3f {
    let mut rad = Color3f::zeros();
    for _ in 0..multi_light_samps {
        let sample = match sample_light_source(rng, light_sources) {
            Some(sample) => sample,
            None => return Color3f::zeros(),
        };
        if sample.surface.area_dens <= 0.0 {
            continue;
        }
        rad += transport_illum_source(sample.light, &sample.surface.p, &sample.surface.n,
                                      target_vert, target_o_ray, path_space, mats)
            / sample.surface.area_dens;
    }
    rad / multi_light_samps as Float
}

/// Prefix light transport over a sampled subpath, so a bidirectional
/// strategy sweep reads any prefix throughput in constant time.
/// `radiance` walks the camera side; `importance` walks the light side
/// with the BRDF argument order swapped, since importance travels the
/// reverse of radiance.
pub(crate) struct PathThroughput {
    prefix_transport: Vec<Color3f>,
}

impl PathThroughput {
    pub fn radiance(path: &[SampledPathlet], mats: &MaterialContainer) -> Self {
        Self::accumulate(path, mats, false)
    }

    pub fn importance(path: &[SampledPathlet], mats: &MaterialContainer) -> Self {
        Self::accumulate(path, mats, true)
    }

    fn accumulate(path: &[SampledPathlet], mats: &MaterialContainer, importance: bool) -> Self {
        let mut prefix_transport = vec![Color3f::new(1.0, 1.0, 1.0); path.len()];
        let mut transport = Color3f::new(1.0, 1.0, 1.0);
        for k in 0..path.len().saturating_sub(1) {
            let hop = if importance {
                projected_brdf(&path[k], &path[k + 1], mats)
            } else {
                projected_adjoint_brdf(&path[k], &path[k + 1], mats)
            };
            transport = transport.component_mul(&hop) / path[k + 1].dens;
            prefix_transport[k + 1] = transport;
        }
        Self { prefix_transport }
    }

    pub fn transport(&self, subpath_len: usize) -> Color3f {
        self.prefix_transport[subpath_len]
    }
}
