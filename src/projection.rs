use glam::{Vec2, Vec3};
use nalgebra as na;

use crate::error::{Error, Result};
use crate::types::CameraModel;

struct Distortion {
    k1: f64,
    k2: f64,
    p1: f64,
    p2: f64,
    k3: f64,
}

/// Projects a batch of world points into pixel coordinates.
///
/// Output order matches input order and nothing is clipped: points behind
/// the camera or outside the frame come back negative or out of range, and
/// a point at depth zero yields non-finite coordinates. Callers filter by
/// whatever bounds apply to them.
pub fn project_points(model: &CameraModel, points: &[Vec3]) -> Result<Vec<Vec2>> {
    let dist = distortion_terms(model)?;
    let rot = model.rotation();
    let k = &model.camera_matrix;
    let fx = k[(0, 0)];
    let skew = k[(0, 1)];
    let cx = k[(0, 2)];
    let fy = k[(1, 1)];
    let cy = k[(1, 2)];

    Ok(points
        .iter()
        .map(|p| {
            let p_world = na::Vector3::new(p.x as f64, p.y as f64, p.z as f64);
            let p_cam = rot * p_world + model.tvec;
            let (xd, yd) = distort(p_cam.x / p_cam.z, p_cam.y / p_cam.z, &dist);
            let u = fx * xd + skew * yd + cx;
            let v = fy * yd + cy;
            Vec2::new(u as f32, v as f32)
        })
        .collect())
}

/// Accepted coefficient layouts: empty, `k1 k2 p1 p2` or `k1 k2 p1 p2 k3`.
fn distortion_terms(model: &CameraModel) -> Result<Distortion> {
    let d = &model.distortion;
    match d.len() {
        0 => Ok(Distortion {
            k1: 0.0,
            k2: 0.0,
            p1: 0.0,
            p2: 0.0,
            k3: 0.0,
        }),
        4 => Ok(Distortion {
            k1: d[0],
            k2: d[1],
            p1: d[2],
            p2: d[3],
            k3: 0.0,
        }),
        5 => Ok(Distortion {
            k1: d[0],
            k2: d[1],
            p1: d[2],
            p2: d[3],
            k3: d[4],
        }),
        n => Err(Error::ShapeMismatch(format!(
            "distortion vector has {} coefficients, expected 0, 4 or 5",
            n
        ))),
    }
}

fn distort(x: f64, y: f64, d: &Distortion) -> (f64, f64) {
    let r2 = x * x + y * y;
    let r4 = r2 * r2;
    let r6 = r4 * r2;
    let radial = 1.0 + d.k1 * r2 + d.k2 * r4 + d.k3 * r6;
    let xd = x * radial + 2.0 * d.p1 * x * y + d.p2 * (r2 + 2.0 * x * x);
    let yd = y * radial + d.p1 * (r2 + 2.0 * y * y) + 2.0 * d.p2 * x * y;
    (xd, yd)
}
