use glam::Vec2;
use image::{Rgb, RgbImage};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::annotations::BoundingBox;

/// Box and grid-point color of the original tooling.
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Upper bound on pixel coordinates the drawing math can represent.
const COORD_LIMIT: f32 = i32::MAX as f32;

/// Draws a box outline, `thickness` one-pixel rectangles nested inward
/// from the box boundary.
///
/// Nothing happens unless the box is visible and valid; skipping is the
/// normal path for sentinel and degenerate boxes, not an error. Touched
/// pixels stay inside [xmin, xmax] x [ymin, ymax], clipped to the image.
pub fn draw_box(img: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, thickness: u32) {
    if !bbox.is_visible() || !bbox.is_valid() {
        return;
    }
    for inset in 0..thickness as i64 {
        let x0 = bbox.xmin as i64 + inset;
        let y0 = bbox.ymin as i64 + inset;
        let x1 = bbox.xmax as i64 - inset;
        let y1 = bbox.ymax as i64 - inset;
        if x0 > x1 || y0 > y1 {
            break;
        }
        draw_rect_outline(img, x0, y0, x1, y1, color);
    }
}

/// Draws a filled disc at `p`.
///
/// The point is skipped unless both coordinates are finite, non-negative
/// and representable; projection emits off-frame and non-finite positions
/// freely, so the check lives here rather than at every call site.
pub fn draw_point(img: &mut RgbImage, p: Vec2, radius: i32, color: Rgb<u8>) {
    if !p.x.is_finite() || !p.y.is_finite() {
        return;
    }
    if p.x < 0.0 || p.y < 0.0 || p.x > COORD_LIMIT || p.y > COORD_LIMIT {
        return;
    }
    let cx = p.x.round() as i64;
    let cy = p.y.round() as i64;
    let r = radius.max(0) as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put_pixel_checked(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Deterministic color for an id, stable across runs.
pub fn id_to_color(id: usize) -> Rgb<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
    let color_num = rng.random_range(0..2u32.pow(24));
    Rgb([
        ((color_num >> 16) % 256) as u8,
        ((color_num >> 8) % 256) as u8,
        (color_num % 256) as u8,
    ])
}

fn draw_rect_outline(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    for x in x0..=x1 {
        put_pixel_checked(img, x, y0, color);
        put_pixel_checked(img, x, y1, color);
    }
    for y in y0..=y1 {
        put_pixel_checked(img, x0, y, color);
        put_pixel_checked(img, x1, y, color);
    }
}

fn put_pixel_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && x < img.width() as i64 && y >= 0 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}
