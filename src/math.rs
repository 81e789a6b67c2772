/// Perspective camera for one rendered layer
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Field-of-view constant of the hyperbolic falloff
    pub fov: f64,
    /// Offset added to rotated z to move the scene in front of the camera
    pub offset: f64,
    /// Screen-space center of projection
    pub center_x: f64,
    pub center_y: f64,
    /// Base pixel size of one voxel at zero depth
    pub scale: f64,
}

/// A point projected onto the output surface
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    pub screen_x: f64,
    pub screen_y: f64,
    /// Perspective falloff; small = far away, large = close
    pub depth: f64,
    /// Rotated camera-space z before the offset
    pub rotated_z: f64,
}

/// Rotates a point about the vertical axis given precomputed sin/cos
pub fn rotate_y(x: f64, z: f64, sin: f64, cos: f64) -> (f64, f64) {
    (x * cos - z * sin, x * sin + z * cos)
}

/// Projects a rotated 3D point to screen space.
///
/// Returns `None` when the point sits behind or at the camera plane
/// (`camera_z < 1`); such points are skipped for the frame.
pub fn project(cam: &Camera, rx: f64, y: f64, rz: f64) -> Option<Projected> {
    let camera_z = rz + cam.offset;
    if camera_z < 1.0 {
        return None;
    }
    let depth = cam.fov / (cam.fov + camera_z * 10.0);
    Some(Projected {
        screen_x: cam.center_x + rx * cam.scale * depth,
        screen_y: cam.center_y - y * cam.scale * depth,
        depth,
        rotated_z: rz,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn test_camera() -> Camera {
        Camera {
            fov: 400.0,
            offset: 85.0,
            center_x: 100.0,
            center_y: 80.0,
            scale: 32.0,
        }
    }

    #[test]
    fn rotate_y_identity_at_angle_zero() {
        let (s, c) = 0.0_f64.sin_cos();
        let (rx, rz) = rotate_y(3.5, -7.25, s, c);
        assert!((rx - 3.5).abs() < EPS);
        assert!((rz - -7.25).abs() < EPS);
    }

    #[test]
    fn rotate_y_matches_formula_for_arbitrary_angles() {
        for angle in [0.37, -1.2, std::f64::consts::PI, 42.0] {
            let (s, c) = angle.sin_cos();
            let (x, z) = (2.0, 5.0);
            let (rx, rz) = rotate_y(x, z, s, c);
            assert!((rx - (x * c - z * s)).abs() < EPS);
            assert!((rz - (x * s + z * c)).abs() < EPS);
        }
    }

    #[test]
    fn rotate_y_quarter_turn_swaps_axes() {
        let (s, c) = std::f64::consts::FRAC_PI_2.sin_cos();
        let (rx, rz) = rotate_y(1.0, 0.0, s, c);
        assert!(rx.abs() < EPS);
        assert!((rz - 1.0).abs() < EPS);
    }

    #[test]
    fn project_rejects_points_behind_camera() {
        let cam = test_camera();
        assert!(project(&cam, 0.0, 0.0, -85.0).is_none());
        assert!(project(&cam, 0.0, 0.0, -84.5).is_none());
        assert!(project(&cam, 0.0, 0.0, -84.0).is_some());
    }

    #[test]
    fn project_matches_hyperbolic_falloff() {
        let cam = test_camera();
        let p = project(&cam, 4.0, -2.0, 10.0).unwrap();
        let expected_depth = 400.0 / (400.0 + (10.0 + 85.0) * 10.0);
        assert!((p.depth - expected_depth).abs() < EPS);
        assert!((p.screen_x - (100.0 + 4.0 * 32.0 * expected_depth)).abs() < EPS);
        assert!((p.screen_y - (80.0 + 2.0 * 32.0 * expected_depth)).abs() < EPS);
    }

    #[test]
    fn depth_decreases_with_distance() {
        let cam = test_camera();
        let near = project(&cam, 0.0, 0.0, 0.0).unwrap();
        let far = project(&cam, 0.0, 0.0, 40.0).unwrap();
        assert!(far.depth < near.depth);
    }
}
