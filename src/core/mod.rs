// Copyright @yucwang 2026

pub mod interaction;
pub mod light;
pub mod material;
pub mod path_space;
pub mod rng;
pub mod scene;
pub mod sensor;
pub mod shape;
pub mod tangent_frame;
pub mod tracer;
