use crate::scene::{GLOBE_CENTER_Y, SCENE_BASE_Y, SNOW_RADIUS};
use rand::{rngs::StdRng, Rng};

/// Resample attempts before giving up and using the fixed fallback spot
const RESET_ATTEMPTS: u32 = 5;

/// A single flake inside the globe
#[derive(Clone, Copy, Debug)]
pub struct Flake {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub speed: f64,
}

/// Fixed-size set of snow particles confined to the glass sphere.
///
/// Particles are recycled rather than destroyed: whenever one falls past the
/// ground plane it is thrown back into the upper part of the sphere.
pub struct SnowField {
    flakes: Vec<Flake>,
}

impl SnowField {
    /// Fills the field via rejection sampling over the sphere's bounding cube
    pub fn new(count: usize, rng: &mut StdRng) -> Self {
        let mut flakes = Vec::with_capacity(count);
        for _ in 0..count {
            let (x, y, z) = loop {
                let x = (rng.random::<f64>() - 0.5) * 2.0 * SNOW_RADIUS;
                let y = (rng.random::<f64>() - 0.5) * 2.0 * SNOW_RADIUS;
                let z = (rng.random::<f64>() - 0.5) * 2.0 * SNOW_RADIUS;
                if x * x + y * y + z * z <= SNOW_RADIUS * SNOW_RADIUS {
                    break (x, y, z);
                }
            };
            flakes.push(Flake {
                x,
                y: y + GLOBE_CENTER_Y,
                z,
                speed: rng.random::<f64>() * 0.08 + 0.04,
            });
        }
        SnowField { flakes }
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    /// Advances every particle one frame: fall, conditional reset, then the
    /// boundary clamp. The clamp runs last so a freshly reset particle is
    /// subject to the same correction.
    pub fn update(&mut self, rng: &mut StdRng) {
        for flake in &mut self.flakes {
            flake.y -= flake.speed;

            if flake.y < SCENE_BASE_Y as f64 {
                let mut placed = false;
                for _ in 0..RESET_ATTEMPTS {
                    let tx = (rng.random::<f64>() - 0.5) * 2.0 * SNOW_RADIUS;
                    let tz = (rng.random::<f64>() - 0.5) * 2.0 * SNOW_RADIUS;
                    let ty = GLOBE_CENTER_Y + rng.random::<f64>() * (SNOW_RADIUS * 0.8);
                    let dy = ty - GLOBE_CENTER_Y;
                    if tx * tx + tz * tz + dy * dy < SNOW_RADIUS * SNOW_RADIUS {
                        flake.x = tx;
                        flake.z = tz;
                        flake.y = ty;
                        placed = true;
                        break;
                    }
                }
                if !placed {
                    flake.x = 0.0;
                    flake.z = 0.0;
                    flake.y = GLOBE_CENTER_Y + 30.0;
                }
            }

            let dy = flake.y - GLOBE_CENTER_Y;
            let dist_sq = flake.x * flake.x + flake.z * flake.z + dy * dy;
            if dist_sq > SNOW_RADIUS * SNOW_RADIUS {
                // Pull back just inside the surface
                let scale = (SNOW_RADIUS - 0.5) / dist_sq.sqrt();
                flake.x *= scale;
                flake.z *= scale;
                flake.y = GLOBE_CENTER_Y + dy * scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn dist_from_center(f: &Flake) -> f64 {
        let dy = f.y - GLOBE_CENTER_Y;
        (f.x * f.x + f.z * f.z + dy * dy).sqrt()
    }

    #[test]
    fn initial_positions_are_inside_the_sphere() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = SnowField::new(150, &mut rng);
        assert_eq!(field.flakes().len(), 150);
        for f in field.flakes() {
            assert!(dist_from_center(f) <= SNOW_RADIUS + 1e-9);
        }
    }

    #[test]
    fn containment_holds_across_many_frames() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = SnowField::new(80, &mut rng);
        for _ in 0..2000 {
            field.update(&mut rng);
            for f in field.flakes() {
                assert!(dist_from_center(f) <= SNOW_RADIUS + 1e-9);
            }
        }
    }

    #[test]
    fn speeds_fall_in_the_configured_band() {
        let mut rng = StdRng::seed_from_u64(5);
        let field = SnowField::new(200, &mut rng);
        for f in field.flakes() {
            assert!(f.speed >= 0.04 && f.speed < 0.12);
        }
    }

    #[test]
    fn fallen_particle_is_recycled_above_ground() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut field = SnowField::new(1, &mut rng);
        // Start at the center, fall slowly toward the ground plane
        field.flakes[0] = Flake {
            x: 0.0,
            y: GLOBE_CENTER_Y,
            z: 0.0,
            speed: 0.1,
        };
        // Ground is 25 units below the center; enough frames to cross it
        for _ in 0..300 {
            field.update(&mut rng);
        }
        let f = field.flakes()[0];
        assert!(f.y >= SCENE_BASE_Y as f64, "particle stuck below ground");
        assert!(dist_from_center(&f) <= SNOW_RADIUS + 1e-9);
    }

    #[test]
    fn clamp_pulls_escaped_particles_back_to_the_surface() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = SnowField::new(1, &mut rng);
        field.flakes[0] = Flake {
            x: SNOW_RADIUS * 2.0,
            y: GLOBE_CENTER_Y + SNOW_RADIUS,
            z: -SNOW_RADIUS,
            speed: 0.0,
        };
        field.update(&mut rng);
        let f = field.flakes()[0];
        let d = dist_from_center(&f);
        assert!(d <= SNOW_RADIUS);
        assert!(d > SNOW_RADIUS - 1.0, "clamp should land near the surface");
    }
}
