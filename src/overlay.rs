use crate::graphics::Canvas;
use crate::voxel::Rgb;
use rand::{rngs::StdRng, Rng};

const FLAKE_TINT: Rgb = Rgb(255, 255, 255);
const FLAKE_ALPHA: f64 = 0.8;

struct OverlayFlake {
    x: f64,
    y: f64,
    /// Half the drawn square size
    r: f64,
    /// Speed factor in 0..1
    d: f64,
}

/// Full-screen decorative snowfall behind the globe.
///
/// Screen-space only; shares nothing with the in-globe snow field. Flakes
/// drift horizontally on a slow shared sine, wrap at the side edges, and
/// respawn at the top once past the bottom. Dimensions are taken from the
/// surface every frame, so the layer follows terminal resizes.
pub struct SnowOverlay {
    flakes: Vec<OverlayFlake>,
    angle: f64,
}

impl SnowOverlay {
    pub fn new(count: usize, width: usize, height: usize, rng: &mut StdRng) -> Self {
        let flakes = (0..count)
            .map(|_| OverlayFlake {
                x: rng.random::<f64>() * width as f64,
                y: rng.random::<f64>() * height as f64,
                r: rng.random::<f64>() * 3.0 + 1.0,
                d: rng.random::<f64>(),
            })
            .collect();
        SnowOverlay { flakes, angle: 0.0 }
    }

    pub fn update(&mut self, width: usize, height: usize, rng: &mut StdRng) {
        let (w, h) = (width as f64, height as f64);
        self.angle += 0.01;
        let drift = self.angle.sin() * 0.3;
        for f in &mut self.flakes {
            f.y += f.d * 0.5 + 0.2;
            f.x += drift;
            if f.y > h {
                f.x = rng.random::<f64>() * w;
                f.y = -10.0;
            }
            if f.x > w + 5.0 {
                f.x = -5.0;
            } else if f.x < -5.0 {
                f.x = w + 5.0;
            }
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        for f in &self.flakes {
            let size = (f.r * 2.0) as i32;
            canvas.blend_rect(f.x as i32, f.y as i32, size, size, FLAKE_TINT, FLAKE_ALPHA);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn flakes_start_on_screen() {
        let mut rng = StdRng::seed_from_u64(1);
        let overlay = SnowOverlay::new(100, 80, 50, &mut rng);
        for f in &overlay.flakes {
            assert!(f.x >= 0.0 && f.x < 80.0);
            assert!(f.y >= 0.0 && f.y < 50.0);
        }
    }

    #[test]
    fn fallen_flakes_respawn_at_the_top() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut overlay = SnowOverlay::new(1, 40, 20, &mut rng);
        overlay.flakes[0].y = 19.9;
        overlay.flakes[0].d = 1.0;
        overlay.update(40, 20, &mut rng);
        assert!((overlay.flakes[0].y - -10.0).abs() < 1e-9);
        assert!(overlay.flakes[0].x >= 0.0 && overlay.flakes[0].x < 40.0);
    }

    #[test]
    fn horizontal_wrap_keeps_flakes_near_the_screen() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut overlay = SnowOverlay::new(1, 40, 200, &mut rng);
        overlay.flakes[0].x = 46.0;
        overlay.flakes[0].y = 0.0;
        overlay.update(40, 200, &mut rng);
        assert!((overlay.flakes[0].x - -5.0).abs() < 1e-9);
    }
}
