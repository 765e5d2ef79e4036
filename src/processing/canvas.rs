//! Rotation-aware canvas rendering for the screenshot editor.
//!
//! The source is drawn centred on a transparent canvas just large enough to
//! hold it at the requested angle. Quarter turns take the exact pixel-copy
//! path; other angles are resampled bilinearly.

use image::{DynamicImage, Rgba, RgbaImage, imageops};

use super::filters::FilterChain;

/// Maps any angle in degrees into `0..360`.
pub fn normalize_rotation(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Size of the bounding box of a `width` x `height` image rotated by `degrees`.
pub fn rotated_canvas_size(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    match normalize_rotation(degrees) {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        angle => {
            let (sin, cos) = (angle as f64).to_radians().sin_cos();
            let (sin, cos) = (sin.abs(), cos.abs());
            let (w, h) = (width as f64, height as f64);
            (snap_ceil(w * cos + h * sin), snap_ceil(w * sin + h * cos))
        }
    }
}

/// `ceil`, except values within float noise of an integer snap to it.
fn snap_ceil(value: f64) -> u32 {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        rounded as u32
    } else {
        value.ceil() as u32
    }
}

/// Draws `image` with `filter` applied, rotated clockwise by `degrees`.
pub fn render(image: &DynamicImage, degrees: i32, filter: &FilterChain) -> RgbaImage {
    let mut source = image.to_rgba8();
    filter.apply(&mut source);

    match normalize_rotation(degrees) {
        0 => source,
        90 => imageops::rotate90(&source),
        180 => imageops::rotate180(&source),
        270 => imageops::rotate270(&source),
        angle => rotate_free(&source, angle),
    }
}

fn rotate_free(source: &RgbaImage, degrees: i32) -> RgbaImage {
    let (width, height) = rotated_canvas_size(source.width(), source.height(), degrees);
    let (sin, cos) = (degrees as f64).to_radians().sin_cos();

    let (src_cx, src_cy) = (source.width() as f64 / 2.0, source.height() as f64 / 2.0);
    let (dst_cx, dst_cy) = (width as f64 / 2.0, height as f64 / 2.0);

    RgbaImage::from_fn(width, height, |x, y| {
        let dx = x as f64 + 0.5 - dst_cx;
        let dy = y as f64 + 0.5 - dst_cy;
        // Inverse of the clockwise rotation in y-down coordinates
        let sx = dx * cos + dy * sin + src_cx;
        let sy = -dx * sin + dy * cos + src_cy;
        sample_bilinear(source, sx - 0.5, sy - 0.5)
    })
}

/// Samples with premultiplied alpha; everything outside the source is transparent.
fn sample_bilinear(source: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = [0f64; 4];
    for (ox, oy, weight) in [
        (0, 0, (1.0 - fx) * (1.0 - fy)),
        (1, 0, fx * (1.0 - fy)),
        (0, 1, (1.0 - fx) * fy),
        (1, 1, fx * fy),
    ] {
        let (px, py) = (x0 + ox, y0 + oy);
        if weight == 0.0
            || px < 0
            || py < 0
            || px >= source.width() as i64
            || py >= source.height() as i64
        {
            continue;
        }
        let p = source.get_pixel(px as u32, py as u32);
        let alpha = p[3] as f64 / 255.0 * weight;
        acc[0] += p[0] as f64 * alpha;
        acc[1] += p[1] as f64 * alpha;
        acc[2] += p[2] as f64 * alpha;
        acc[3] += alpha;
    }

    if acc[3] <= f64::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |v: f64| (v / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba([
        channel(acc[0]),
        channel(acc[1]),
        channel(acc[2]),
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
