use crate::graphics::Canvas;
use crate::math::{project, rotate_y, Camera, Projected};
use crate::scene::{GLASS_RADIUS, GLOBE_CENTER_Y};
use crate::snow::Flake;
use crate::voxel::{Rgb, Voxel};

const GLASS_TINT: Rgb = Rgb(165, 243, 252);
const GLASS_ALPHA: f64 = 0.03;
const RIM_TINT: Rgb = Rgb(255, 255, 255);
const RIM_ALPHA: f64 = 0.5;
const SNOW_WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(0, 0, 0);

/// One screen-space square awaiting rasterization
#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub screen_x: f64,
    pub screen_y: f64,
    pub depth: f64,
    pub color: Rgb,
    pub is_snow: bool,
}

/// Camera of the globe layer, centered on the given surface
pub fn globe_camera(width: usize, height: usize, pixel_size: u32) -> Camera {
    Camera {
        fov: 400.0,
        offset: 85.0,
        center_x: width as f64 / 2.0,
        center_y: height as f64 * 0.6,
        scale: pixel_size as f64,
    }
}

/// Camera of the ground decoration layer, lower center and a wider fov
pub fn ground_camera(width: usize, height: usize, pixel_size: u32) -> Camera {
    Camera {
        fov: 450.0,
        offset: 80.0,
        center_x: width as f64 / 2.0,
        center_y: height as f64 * 0.75,
        scale: pixel_size as f64,
    }
}

/// Renders the globe scene, reusing its projection buffer across frames
pub struct GlobeRenderer {
    sprites: Vec<Sprite>,
}

impl GlobeRenderer {
    pub fn new() -> Self {
        GlobeRenderer {
            sprites: Vec::new(),
        }
    }

    /// Projects voxels and snow for one frame and depth-sorts them
    /// back-to-front. Exposed separately from drawing so the sort order can
    /// be inspected.
    pub fn project_frame(
        &mut self,
        voxels: &[Voxel],
        snow: &[Flake],
        angle: f64,
        cam: &Camera,
    ) -> &[Sprite] {
        let (sin, cos) = angle.sin_cos();
        self.sprites.clear();

        for v in voxels {
            let (rx, rz) = if v.is_static {
                (v.x, v.z)
            } else {
                rotate_y(v.x, v.z, sin, cos)
            };
            if let Some(p) = project(cam, rx, v.y, rz) {
                self.sprites.push(Sprite {
                    screen_x: p.screen_x,
                    screen_y: p.screen_y,
                    depth: p.depth,
                    color: v.color,
                    is_snow: false,
                });
            }
        }

        // Snow rotates with the scene so it reads as suspended in the liquid
        for f in snow {
            let (rx, rz) = rotate_y(f.x, f.z, sin, cos);
            if let Some(p) = project(cam, rx, f.y, rz) {
                self.sprites.push(Sprite {
                    screen_x: p.screen_x,
                    screen_y: p.screen_y,
                    depth: p.depth,
                    color: SNOW_WHITE,
                    is_snow: true,
                });
            }
        }

        // Painter's algorithm: small depth means far away, draw that first
        self.sprites
            .sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));
        &self.sprites
    }

    /// Projects, rasterizes, and seals the frame with the glass shell
    pub fn render(
        &mut self,
        canvas: &mut Canvas,
        voxels: &[Voxel],
        snow: &[Flake],
        angle: f64,
        cam: &Camera,
    ) {
        self.project_frame(voxels, snow, angle, cam);
        for s in &self.sprites {
            let size = if s.is_snow {
                ((cam.scale * s.depth * 0.22).ceil() as i32).max(1)
            } else {
                (cam.scale * s.depth * 1.02).ceil() as i32
            };
            canvas.fill_rect(
                (s.screen_x - size as f64 / 2.0).floor() as i32,
                (s.screen_y - size as f64 / 2.0).floor() as i32,
                size,
                size,
                s.color,
            );
        }
        draw_glass(canvas, cam);
    }
}

/// Composites the static glass shell over the finished scene.
///
/// Scans pixel-step bands from the sphere's top down to a cutoff near the
/// equator, deriving each band's chord half-width from the circle equation.
/// Ignores both rotation and the depth sort; it is always on top.
fn draw_glass(canvas: &mut Canvas, cam: &Camera) {
    let depth = cam.fov / (cam.fov + cam.offset * 10.0);
    let center_x = cam.center_x;
    let center_y = cam.center_y - GLOBE_CENTER_Y * cam.scale * depth;

    let screen_radius = (GLASS_RADIUS * cam.scale * depth).ceil();
    let step = (cam.scale * depth).ceil().max(1.0);
    let cutoff = (24.0 * cam.scale * depth).floor();

    let mut y = -screen_radius;
    while y <= cutoff {
        let mut half_width = (screen_radius * screen_radius - y * y).max(0.0).sqrt();
        // Keep the pole band from vanishing between steps
        if half_width < step && y.abs() <= screen_radius {
            half_width = step / 2.0;
        }
        if half_width > 0.0 {
            let band_w = (half_width * 2.0).max(step);
            let band_y = (center_y + y).floor() as i32;
            let left_x = (center_x - half_width).floor() as i32;
            let right_x = (center_x + half_width - step).floor() as i32;

            canvas.blend_rect(
                left_x,
                band_y,
                band_w.floor() as i32,
                step as i32,
                GLASS_TINT,
                GLASS_ALPHA,
            );
            canvas.blend_rect(left_x, band_y, step as i32, step as i32, RIM_TINT, RIM_ALPHA);
            canvas.blend_rect(right_x, band_y, step as i32, step as i32, RIM_TINT, RIM_ALPHA);
        }
        y += step;
    }
}

/// Draws the decoration layer outside the globe under a fixed rotation.
///
/// This layer orders cells by descending rotated z rather than by projected
/// depth; with the camera looking down +z both conventions draw far cells
/// first. Each cell casts a small offset drop shadow.
pub fn render_ground(canvas: &mut Canvas, voxels: &[Voxel], cam: &Camera) {
    let fixed_angle = -std::f64::consts::PI / 8.0;
    let (sin, cos) = fixed_angle.sin_cos();

    let mut projected: Vec<(Projected, Rgb)> = voxels
        .iter()
        .filter_map(|v| {
            let (rx, rz) = rotate_y(v.x, v.z, sin, cos);
            // Raise by the ground offset so props sit on the screen baseline
            project(cam, rx, v.y + 6.0, rz).map(|p| (p, v.color))
        })
        .collect();

    projected.sort_by(|a, b| {
        b.0.rotated_z
            .partial_cmp(&a.0.rotated_z)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (p, color) in &projected {
        let size = (cam.scale * p.depth * 1.05).ceil() as i32;
        let x = (p.screen_x - size as f64 / 2.0).floor() as i32;
        let y = (p.screen_y - size as f64 / 2.0).floor() as i32;
        canvas.blend_rect(x + 2, y + 2, size, size, SHADOW, 0.2);
        canvas.fill_rect(x, y, size, size, *color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene;
    use crate::snow::SnowField;
    use rand::{rngs::StdRng, SeedableRng};

    fn cam() -> Camera {
        globe_camera(200, 160, 32)
    }

    #[test]
    fn projected_frame_is_sorted_ascending_by_depth() {
        let mut rng = StdRng::seed_from_u64(2);
        let voxels = scene::build_globe_scene(true, &mut rng);
        let snow = SnowField::new(150, &mut rng);
        let mut renderer = GlobeRenderer::new();
        let sprites = renderer.project_frame(&voxels, snow.flakes(), 0.8, &cam());
        assert!(!sprites.is_empty());
        for pair in sprites.windows(2) {
            assert!(pair[0].depth <= pair[1].depth);
        }
    }

    #[test]
    fn zero_angle_projection_matches_identity_rotation() {
        // rotation_speed 0 / pixel_size 32 / no decorations: screen positions
        // must equal the raw projection of unrotated coordinates
        let mut rng = StdRng::seed_from_u64(0);
        let voxels = scene::build_globe_scene(false, &mut rng);
        let camera = cam();
        let mut renderer = GlobeRenderer::new();
        let sprites = renderer.project_frame(&voxels, &[], 0.0, &camera);

        let mut expected: Vec<(f64, f64)> = voxels
            .iter()
            .filter_map(|v| project(&camera, v.x, v.y, v.z))
            .map(|p| (p.screen_x, p.screen_y))
            .collect();
        let mut got: Vec<(f64, f64)> = sprites.iter().map(|s| (s.screen_x, s.screen_y)).collect();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        got.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(expected.len(), got.len());
        for (e, g) in expected.iter().zip(&got) {
            assert!((e.0 - g.0).abs() < 1e-9 && (e.1 - g.1).abs() < 1e-9);
        }
    }

    #[test]
    fn static_voxels_ignore_rotation() {
        let base = Voxel {
            x: 12.0,
            y: -20.0,
            z: 3.0,
            color: Rgb(1, 2, 3),
            is_static: true,
        };
        let camera = cam();
        let mut renderer = GlobeRenderer::new();
        for angle in [0.0, 1.0, -2.5, 7.9] {
            let sprites = renderer.project_frame(&[base], &[], angle, &camera);
            let still = project(&camera, base.x, base.y, base.z).unwrap();
            assert!((sprites[0].screen_x - still.screen_x).abs() < 1e-9);
            assert!((sprites[0].screen_y - still.screen_y).abs() < 1e-9);
        }
    }

    #[test]
    fn moving_voxels_follow_the_rotation_formula() {
        let base = Voxel {
            x: 10.0,
            y: 0.0,
            z: -4.0,
            color: Rgb(0, 0, 0),
            is_static: false,
        };
        let camera = cam();
        let mut renderer = GlobeRenderer::new();
        for angle in [0.0, -0.3, 1.7] {
            let sprites = renderer.project_frame(&[base], &[], angle, &camera);
            let (sin, cos) = angle.sin_cos();
            let (rx, rz) = (base.x * cos - base.z * sin, base.x * sin + base.z * cos);
            let expected = project(&camera, rx, base.y, rz).unwrap();
            assert!((sprites[0].screen_x - expected.screen_x).abs() < 1e-9);
            assert!((sprites[0].screen_y - expected.screen_y).abs() < 1e-9);
        }
    }

    #[test]
    fn points_behind_the_camera_are_dropped_not_fatal() {
        let behind = Voxel {
            x: 0.0,
            y: 0.0,
            z: -200.0,
            color: Rgb(0, 0, 0),
            is_static: true,
        };
        let mut renderer = GlobeRenderer::new();
        let sprites = renderer.project_frame(&[behind], &[], 0.0, &cam());
        assert!(sprites.is_empty());
    }

    #[test]
    fn render_paints_inside_the_canvas() {
        let mut rng = StdRng::seed_from_u64(4);
        let voxels = scene::build_globe_scene(false, &mut rng);
        let snow = SnowField::new(50, &mut rng);
        let mut canvas = Canvas::new(120, 60);
        let camera = globe_camera(canvas.width(), canvas.height(), 2);
        let mut renderer = GlobeRenderer::new();
        renderer.render(&mut canvas, &voxels, snow.flakes(), 0.25, &camera);
        let mut touched = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) != Some(crate::graphics::BACKDROP) {
                    touched += 1;
                }
            }
        }
        assert!(touched > 0);
    }

    #[test]
    fn ground_layer_draws_without_panicking_on_small_surfaces() {
        let voxels = scene::build_ground_scene();
        let mut canvas = Canvas::new(40, 12);
        let camera = ground_camera(canvas.width(), canvas.height(), 1);
        render_ground(&mut canvas, &voxels, &camera);
    }
}
