/// Flat RGB color of a voxel face or a raster pixel
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blends `top` over this color with the given opacity (0.0..=1.0)
    pub fn blend(self, top: Rgb, alpha: f64) -> Rgb {
        let mix = |under: u8, over: u8| {
            (under as f64 * (1.0 - alpha) + over as f64 * alpha).round() as u8
        };
        Rgb(mix(self.0, top.0), mix(self.1, top.1), mix(self.2, top.2))
    }
}

/// Voxel structure with 3D position, face color, and rotation flag
#[derive(Clone, Copy, Debug)]
pub struct Voxel {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: Rgb,
    /// Static voxels never receive the scene rotation
    pub is_static: bool,
}
