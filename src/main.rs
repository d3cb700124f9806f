// Copyright 2020 TwoCookingMice

#![allow(dead_code)]

mod core;
mod io;
mod integrators;
mod lights;
mod materials;
mod math;
mod renderers;
mod scenes;
mod sensors;
mod shapes;

use crate::core::tracer::PathTracer;
use crate::integrators::bidirect::BidirectTracer;
use crate::integrators::bidirect_mis::BidirectMisTracer;
use crate::integrators::direct::DirectTracer;
use crate::integrators::normal::NormalTracer;
use crate::integrators::position::PositionTracer;
use crate::integrators::unidirect::UnidirectTracer;
use crate::integrators::unidirect_nee::UnidirectNeeTracer;
use crate::math::constants::Vector3f;
use crate::renderers::simple::{ Renderer, SimpleRenderer };
use crate::sensors::perspective::PerspectiveCamera;

use std::env;

fn build_tracer(name: &str) -> Option<Box<dyn PathTracer>> {
    match name {
        "position" => Some(Box::new(PositionTracer)),
        "normal" => Some(Box::new(NormalTracer)),
        "direct" => Some(Box::new(DirectTracer::new())),
        "unidirect" => Some(Box::new(UnidirectTracer)),
        "unidirect-nee" => Some(Box::new(UnidirectNeeTracer::new())),
        "bidirect" => Some(Box::new(BidirectTracer)),
        "bidirect-mis" => Some(Box::new(BidirectMisTracer::default())),
        _ => None,
    }
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.exr> [--tracer NAME] [--spp N] [--width N] [--height N] [--seed N] [--png FILE]",
                  args[0]);
        eprintln!("Tracers: position, normal, direct, unidirect, unidirect-nee, bidirect, bidirect-mis");
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut tracer_name = String::from("unidirect-nee");
    let mut spp: u32 = 64;
    let mut width: usize = 800;
    let mut height: usize = 600;
    let mut seed: u64 = 0;
    let mut png_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--tracer" => {
                i += 1;
                if let Some(value) = args.get(i) {
                    tracer_name = value.clone();
                }
            }
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(spp);
            }
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(height);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(seed);
            }
            "--png" => {
                i += 1;
                png_path = args.get(i).cloned();
            }
            _ => {}
        }
        i += 1;
    }

    let tracer = match build_tracer(&tracer_name) {
        Some(tracer) => tracer,
        None => {
            eprintln!("unknown tracer: {}", tracer_name);
            std::process::exit(1);
        }
    };

    let rig = scenes::cornell_box();
    let mut camera = PerspectiveCamera::new(Vector3f::new(0.0, 0.0, 3.4),
                                            Vector3f::new(0.0, 0.0, 0.0),
                                            Vector3f::new(0.0, 1.0, 0.0),
                                            0.66,
                                            width, height);

    let renderer = SimpleRenderer::new(tracer, spp, seed);
    let image = renderer.render(&rig.scene, &rig.mats, &mut camera);

    let raw = image.raw_copy();
    io::exr_utils::write_exr_to_file(&raw, image.width(), image.height(), output_path)
        .expect("failed to write EXR output");
    if let Some(path) = png_path {
        io::exr_utils::write_png_to_file(&raw, image.width(), image.height(), &path)
            .expect("failed to write PNG preview");
    }
}
