//! Frame driver: walks the pixel grid in parallel and hands finished rows to
//! a pixel sink.

use image::{Rgb, RgbImage};
use log::info;
use rayon::prelude::*;

use crate::math::{Ray, Vec3};
use crate::scene::Scene;

/// Destination for finished pixels. Colors are linear floats in [0, 1]; no
/// gamma correction is applied before the sink.
pub trait PixelSink {
    fn set_pixel(&mut self, x: u32, y: u32, color: Vec3);
}

impl PixelSink for RgbImage {
    fn set_pixel(&mut self, x: u32, y: u32, color: Vec3) {
        let c = color.clamp01();
        self.put_pixel(
            x,
            y,
            Rgb([
                (c.x * 255.999) as u8,
                (c.y * 255.999) as u8,
                (c.z * 255.999) as u8,
            ]),
        );
    }
}

/// Render one frame of `width` by `height` pixels into the sink.
///
/// The scene is validated first and a default light installed if none is
/// configured. Tracing is parallel over scanlines; the sink only sees the
/// buffer after every pixel has completed.
pub fn render(
    scene: &mut Scene,
    width: u32,
    height: u32,
    sink: &mut dyn PixelSink,
) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!("frame size must be positive, got {width}x{height}"));
    }
    scene.validate()?;
    if scene.lights().is_empty() {
        info!("scene has no lights, installing the default light");
        scene.ensure_default_light();
    }

    let scene = &*scene;
    let camera = *scene
        .active_camera()
        .ok_or_else(|| "scene has no active camera".to_string())?;

    let w = width as usize;
    let mut buffer = vec![Vec3::splat(0.0); w * height as usize];

    info!(
        "rendering {width}x{height} on {} threads",
        rayon::current_num_threads()
    );
    let started = std::time::Instant::now();

    buffer
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, slot) in row.iter_mut().enumerate() {
                let ray = Ray::from_view(x as u32, y as u32, width, height, &camera);
                *slot = scene.trace(&ray);
            }
        });

    info!("frame traced in {:.2?}", started.elapsed());

    for y in 0..height {
        for x in 0..width {
            sink.set_pixel(x, y, buffer[(y as usize * w) + x as usize]);
        }
    }

    Ok(())
}
