use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ground-plane evaluation grid, in the dataset's world units (cm).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    origin_x: f32,
    origin_y: f32,
    origin_z: f32,
    width: u32,
    height: u32,
    step: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin_x: -300.0,
            origin_y: -90.0,
            origin_z: 0.0,
            width: 1440,
            height: 480,
            step: 2.5,
        }
    }
}

impl GridConfig {
    pub fn points(&self) -> Vec<Vec3> {
        generate(
            Vec3::new(self.origin_x, self.origin_y, self.origin_z),
            (self.width, self.height),
            self.step,
        )
    }
}

/// Enumerates `width * height` ground-plane points.
///
/// Index i maps to x = origin.x + step * (i / height) and
/// y = origin.y + step * (i % height): y advances on every index, x once
/// per full run of `height` indices. The mapping is fixed; projected
/// outputs are compared point-for-point against references built with it.
pub fn generate(origin: Vec3, size: (u32, u32), step: f32) -> Vec<Vec3> {
    let (width, height) = size;
    let total = width as u64 * height as u64;
    (0..total)
        .map(|i| {
            let dx = (i / height as u64) as f32;
            let dy = (i % height as u64) as f32;
            Vec3::new(origin.x + step * dx, origin.y + step * dy, origin.z)
        })
        .collect()
}

pub fn create_default_grid() -> Vec<Vec3> {
    GridConfig::default().points()
}
