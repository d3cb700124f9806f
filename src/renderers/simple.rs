// Copyright @yucwang 2026

use crate::core::material::MaterialContainer;
use crate::core::rng::{ LcgRng, Rng };
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::tracer::{ compute_first_hit, PathTracer };
use crate::math::bitmap::Bitmap;
use crate::math::constants::{ Color3f, Float, Vector2f };
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

pub use super::renderer::Renderer;

/// Block-parallel driver: the frame is cut into square tiles, worker
/// threads pull tiles off an atomic counter, and each tile runs the full
/// ray generation / first-hit / estimate pipeline with its own generator.
pub struct SimpleRenderer {
    tracer: Box<dyn PathTracer>,
    samples_per_pixel: u32,
    seed: u64,
}

const BLOCK_SIZE: usize = 64;

impl SimpleRenderer {
    pub fn new(tracer: Box<dyn PathTracer>, samples_per_pixel: u32, seed: u64) -> Self {
        Self {
            tracer,
            samples_per_pixel: samples_per_pixel.max(1),
            seed,
        }
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene, mats: &MaterialContainer,
              sensor: &mut dyn Sensor) -> Bitmap {
        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width(), bmp.height())
        };
        if width == 0 || height == 0 {
            return Bitmap::new(0, 0);
        }

        let light_sources = scene.light_sources();
        let spp = self.samples_per_pixel;
        let inv_spp = 1.0 / (spp as Float);

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;

        log::info!("rendering {}x{} at {} spp over {} blocks",
                   width, height, spp, total_blocks);

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let sensor_ref: &dyn Sensor = sensor;
        let tracer_ref: &dyn PathTracer = self.tracer.as_ref();
        let lights_ref = &light_sources;
        let output = Arc::new(Mutex::new(Bitmap::new(width, height)));
        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let output = Arc::clone(&output);
                let next_block = Arc::clone(&next_block);
                let progress = progress.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * BLOCK_SIZE;
                        let y0 = by * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);
                        let block_w = x1 - x0;
                        let block_h = y1 - y0;

                        let mut rng = LcgRng::new(self.seed.wrapping_add(
                            (block_index as u64).wrapping_mul(0x9E3779B97F4A7C15)));
                        let mut block = vec![Color3f::zeros(); block_w * block_h];

                        for _ in 0..spp {
                            let mut rays = Vec::with_capacity(block_w * block_h);
                            for y in y0..y1 {
                                for x in x0..x1 {
                                    let u = (x as Float + rng.draw()) / width as Float;
                                    let v = (y as Float + rng.draw()) / height as Float;
                                    rays.push(sensor_ref.sample_ray(&Vector2f::new(u, v)));
                                }
                            }
                            let hits = compute_first_hit(&rays, scene, lights_ref);
                            let estimate = tracer_ref.sample(&mut rng, &rays, &hits,
                                                             scene, mats, lights_ref);
                            for (acc, value) in block.iter_mut().zip(estimate.iter()) {
                                *acc += *value;
                            }
                        }

                        let mut bitmap = match output.lock() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        for y in y0..y1 {
                            for x in x0..x1 {
                                bitmap[(x, y)] =
                                    block[(x - x0) + block_w * (y - y0)] * inv_spp;
                            }
                        }
                        progress.inc(1);
                    }
                });
            }
        });
        progress.finish_and_clear();

        let bitmap = match Arc::try_unwrap(output) {
            Ok(mutex) => match mutex.into_inner() {
                Ok(bmp) => bmp,
                Err(poisoned) => poisoned.into_inner(),
            },
            Err(arc) => arc.lock().map(|bmp| bmp.clone()).unwrap_or_else(|e| e.into_inner().clone()),
        };
        *sensor.bitmap_mut() = bitmap.clone();
        bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrators::normal::NormalTracer;
    use crate::integrators::position::PositionTracer;
    use crate::math::constants::Vector3f;
    use crate::scenes;
    use crate::sensors::perspective::PerspectiveCamera;

    #[test]
    fn test_render_fills_the_film() {
        let rig = scenes::unit_sphere();
        let mut camera = PerspectiveCamera::new(Vector3f::new(0.0, 0.0, -3.0),
                                                Vector3f::zeros(),
                                                Vector3f::new(0.0, 1.0, 0.0),
                                                std::f32::consts::FRAC_PI_3,
                                                32, 24);
        let renderer = SimpleRenderer::new(Box::new(NormalTracer), 1, 0);
        let image = renderer.render(&rig.scene, &rig.mats, &mut camera);
        assert_eq!(image.width(), 32);
        assert_eq!(image.height(), 24);

        // Center pixel sees the sphere pole, edge pixels miss. Pixel
        // jitter tilts the encoded normal a little.
        let center = image[(16, 12)];
        assert!((center - Color3f::new(0.5, 0.5, 0.0)).norm() < 0.12);
        assert_eq!(image[(0, 0)], Color3f::zeros());
    }

    #[test]
    fn test_render_is_deterministic_for_fixed_seed() {
        let rig = scenes::unit_sphere();
        let build_camera = || PerspectiveCamera::new(Vector3f::new(0.0, 0.0, -3.0),
                                                     Vector3f::zeros(),
                                                     Vector3f::new(0.0, 1.0, 0.0),
                                                     std::f32::consts::FRAC_PI_3,
                                                     16, 16);
        let renderer = SimpleRenderer::new(Box::new(PositionTracer), 2, 42);
        let mut cam_a = build_camera();
        let mut cam_b = build_camera();
        let a = renderer.render(&rig.scene, &rig.mats, &mut cam_a);
        let b = renderer.render(&rig.scene, &rig.mats, &mut cam_b);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(a[(x, y)], b[(x, y)]);
            }
        }
    }
}
