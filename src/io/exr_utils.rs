/* Copyright 2020 @TwoCookingMice */

use crate::math::constants::Float;

use exr::prelude::*;

// Write a linear HDR image to an EXR file.
pub fn write_exr_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) -> std::result::Result<(), exr::error::Error> {
    log::info!("writing {}x{} OpenEXR image to {}", width, height, file_path);

    write_rgb_file(file_path, width, height, |x, y| {
        let (r, g, b) = image[x + y * width];
        (r, g, b)
    })
}

// Write a gamma-mapped LDR preview next to the HDR output.
pub fn write_png_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) -> std::result::Result<(), image::ImageError> {
    log::info!("writing {}x{} PNG preview to {}", width, height, file_path);

    let mut png = image::RgbImage::new(width as u32, height as u32);
    for (x, y, pixel) in png.enumerate_pixels_mut() {
        let (r, g, b) = image[x as usize + y as usize * width];
        *pixel = image::Rgb([to_srgb_byte(r), to_srgb_byte(g), to_srgb_byte(b)]);
    }
    png.save(file_path)
}

fn to_srgb_byte(linear: Float) -> u8 {
    let mapped = linear.max(0.0).powf(1.0 / 2.2).min(1.0);
    (mapped * 255.0 + 0.5) as u8
}
