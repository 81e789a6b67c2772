use crate::voxel::{Rgb, Voxel};
use rand::{rngs::StdRng, Rng};

/// Elevation of the ground plane the tree and gifts stand on
pub const SCENE_BASE_Y: i32 = -15;
/// 3D center of the glass sphere, offset above the ground plane
pub const GLOBE_CENTER_Y: f64 = (SCENE_BASE_Y + 25) as f64;
/// Snow stays inside this radius, slightly under the glass shell
pub const SNOW_RADIUS: f64 = 40.0;
/// Visual radius of the glass shell itself
pub const GLASS_RADIUS: f64 = 45.0;
/// Ground elevation of the decoration layer outside the globe
pub const GROUND_BASE_Y: i32 = -6;

const TREE_LAYERS: i32 = 6;

// Palette
const WOOD: Rgb = Rgb(69, 26, 3);
const SNOW_FLOOR: Rgb = Rgb(241, 245, 249);
const BASE_RED: Rgb = Rgb(153, 27, 27);
const TRIM_GOLD: Rgb = Rgb(245, 158, 11);
const TRUNK_BROWN: Rgb = Rgb(93, 64, 55);
const NEEDLE_DARK: Rgb = Rgb(21, 128, 61);
const NEEDLE_LIGHT: Rgb = Rgb(22, 163, 74);
const GARLAND_DEEP: Rgb = Rgb(185, 28, 28);
const GARLAND_BRIGHT: Rgb = Rgb(239, 68, 68);
pub const STAR_GOLD: Rgb = Rgb(250, 204, 21);
const CANE_WHITE: Rgb = Rgb(248, 250, 252);
const CANE_RED: Rgb = Rgb(220, 38, 38);
const STICK_YELLOW: Rgb = Rgb(252, 211, 77);
const LOLLY_PINK: Rgb = Rgb(236, 72, 153);
const LOLLY_CREAM: Rgb = Rgb(253, 242, 248);
const LOLLY_PURPLE: Rgb = Rgb(168, 85, 247);
const WRAPPER_CREAM: Rgb = Rgb(254, 243, 199);

const BAUBLES: [Rgb; 4] = [
    Rgb(234, 88, 12),
    Rgb(37, 99, 235),
    Rgb(219, 39, 119),
    Rgb(202, 138, 4),
];
const LIGHTS: [Rgb; 4] = [
    Rgb(34, 211, 238),
    Rgb(163, 230, 53),
    Rgb(254, 240, 138),
    Rgb(244, 114, 182),
];
const CONFETTI: [Rgb; 2] = [Rgb(255, 255, 255), Rgb(226, 232, 240)];

#[derive(Clone, Copy, PartialEq)]
enum Pattern {
    Solid,
    VerticalStripes,
    Checkered,
}

#[derive(Clone, Copy)]
struct GiftColors {
    main: Rgb,
    secondary: Option<Rgb>,
    ribbon: Rgb,
}

fn add(out: &mut Vec<Voxel>, x: i32, y: i32, z: i32, color: Rgb) {
    out.push(Voxel {
        x: x as f64,
        y: y as f64,
        z: z as f64,
        color,
        is_static: false,
    });
}

fn add_static(out: &mut Vec<Voxel>, x: i32, y: i32, z: i32, color: Rgb) {
    out.push(Voxel {
        x: x as f64,
        y: y as f64,
        z: z as f64,
        color,
        is_static: true,
    });
}

/// Builds the full globe scene: bases, tree, star, and props.
///
/// Pure apart from `rng`, which is consumed only by the ornament pass and
/// only when `show_decorations` is set; without decorations the output is
/// fully deterministic.
pub fn build_globe_scene(show_decorations: bool, rng: &mut StdRng) -> Vec<Voxel> {
    let mut v = Vec::new();

    // Inner wooden stand. Shell only; the interior is never visible. The top
    // ring is the snow floor and rotates with the tree, the wood does not.
    let base_radius: i32 = 38;
    let base_height: i32 = 12;
    for y in 0..base_height {
        let r = if y < 2 {
            base_radius + 2
        } else if y > base_height - 3 {
            base_radius + 1
        } else {
            base_radius
        };
        for x in -r..=r {
            for z in -r..=r {
                let d2 = x * x + z * z;
                if d2 > r * r {
                    continue;
                }
                if d2 > (r - 2) * (r - 2) || y == base_height - 1 {
                    if y == base_height - 1 {
                        add(&mut v, x, SCENE_BASE_Y - base_height + y, z, SNOW_FLOOR);
                    } else {
                        add_static(&mut v, x, SCENE_BASE_Y - base_height + y, z, WOOD);
                    }
                }
            }
        }
    }

    // Outer decorative frustum sealing the bottom of the glass, one below the
    // snow floor to avoid overlap. Entirely static.
    let outer_top_y = SCENE_BASE_Y - 1;
    let outer_bottom_y = -27;
    let (bottom_r, top_r) = (42.0, 34.0);
    for y in outer_bottom_y..outer_top_y {
        let progress = (y - outer_bottom_y) as f64 / (outer_top_y - outer_bottom_y) as f64;
        let current_r = (bottom_r * (1.0 - progress) + top_r * progress).floor() as i32;
        let color = if y > outer_top_y - 4 || y < outer_bottom_y + 3 {
            TRIM_GOLD
        } else {
            BASE_RED
        };
        for x in -current_r..=current_r {
            for z in -current_r..=current_r {
                let d2 = x * x + z * z;
                if d2 > current_r * current_r {
                    continue;
                }
                let is_shell = d2 > (current_r - 2) * (current_r - 2);
                let is_cap = y == outer_top_y - 1;
                if is_shell || is_cap {
                    add_static(&mut v, x, y, z, color);
                }
            }
        }
    }

    // Trunk, corners dropped for an octagonal cross-section
    for y in 0..12 {
        for x in -2i32..=2 {
            for z in -2i32..=2 {
                if x.abs() == 2 && z.abs() == 2 {
                    continue;
                }
                add(&mut v, x, SCENE_BASE_Y + y, z, TRUNK_BROWN);
            }
        }
    }

    // Foliage: stacked tapered layers with a cosine-perturbed silhouette,
    // a helical garland, and the optional random ornament pass.
    for i in 0..TREE_LAYERS {
        let layer_y = SCENE_BASE_Y + 8 + i * 7;
        let height = 11;
        let base_r = 18.0 - i as f64 * 2.5;
        let top_r = (4.0 - i as f64 * 0.7).max(0.0);

        for ly in 0..height {
            let y = layer_y + ly;
            let progress = ly as f64 / height as f64;
            let current_r = base_r * (1.0 - progress) + top_r * progress;
            let reach = (current_r + 1.0).ceil() as i32;

            for x in -reach..=reach {
                for z in -reach..=reach {
                    let dist = ((x * x + z * z) as f64).sqrt();
                    let angle = (z as f64).atan2(x as f64);
                    let wave_freq = (7 + i % 2) as f64;
                    let branch_mod = (angle * wave_freq + i as f64).cos() * 1.5;
                    if dist > current_r + branch_mod {
                        continue;
                    }

                    let mut color = NEEDLE_DARK;
                    if dist > current_r * 0.75 {
                        color = NEEDLE_LIGHT;
                    }

                    let abs_height = (i * 7 + ly) as f64;
                    let spiral_phase = angle + abs_height * 0.5;
                    let is_garland = spiral_phase.sin() > 0.9 && dist > current_r * 0.85;
                    if is_garland {
                        color = GARLAND_DEEP;
                        if spiral_phase.sin() > 0.96 {
                            color = GARLAND_BRIGHT;
                        }
                    } else if show_decorations && dist > current_r * 0.6 {
                        if rng.random::<f64>() > 0.85 {
                            let kind = rng.random::<f64>();
                            color = if kind > 0.65 {
                                BAUBLES[rng.random_range(0..BAUBLES.len())]
                            } else if kind > 0.35 {
                                LIGHTS[rng.random_range(0..LIGHTS.len())]
                            } else {
                                CONFETTI[rng.random_range(0..CONFETTI.len())]
                            };
                        }
                    }

                    add(&mut v, x, y, z, color);
                }
            }
        }
    }

    // Star topper: a 3D plus of seven cells
    let top_y = SCENE_BASE_Y + 8 + TREE_LAYERS * 7 + 5;
    add(&mut v, 0, top_y, 0, STAR_GOLD);
    add(&mut v, 0, top_y + 1, 0, STAR_GOLD);
    add(&mut v, 0, top_y + 2, 0, STAR_GOLD);
    add(&mut v, -1, top_y + 1, 0, STAR_GOLD);
    add(&mut v, 1, top_y + 1, 0, STAR_GOLD);
    add(&mut v, 0, top_y + 1, -1, STAR_GOLD);
    add(&mut v, 0, top_y + 1, 1, STAR_GOLD);

    // Gifts and candy, roughly mirrored for symmetry
    gift(
        &mut v,
        (-18, SCENE_BASE_Y, 8),
        (10, 8, 10),
        GiftColors {
            main: Rgb(30, 58, 138),
            secondary: Some(Rgb(96, 165, 250)),
            ribbon: STAR_GOLD,
        },
        Pattern::VerticalStripes,
        true,
    );
    gift(
        &mut v,
        (-25, SCENE_BASE_Y, -6),
        (8, 12, 8),
        GiftColors {
            main: BASE_RED,
            secondary: Some(GARLAND_BRIGHT),
            ribbon: Rgb(34, 197, 94),
        },
        Pattern::Checkered,
        false,
    );
    lollipop(&mut v, -14, SCENE_BASE_Y, 16, 8, 4);
    wrapped_candy(&mut v, -15, SCENE_BASE_Y, 20, Rgb(249, 115, 22));

    gift(
        &mut v,
        (12, SCENE_BASE_Y, 8),
        (10, 7, 8),
        GiftColors {
            main: Rgb(22, 101, 52),
            secondary: None,
            ribbon: CANE_RED,
        },
        Pattern::Solid,
        true,
    );
    gift(
        &mut v,
        (25, SCENE_BASE_Y, -6),
        (7, 7, 7),
        GiftColors {
            main: STAR_GOLD,
            secondary: Some(Rgb(254, 240, 138)),
            ribbon: GARLAND_BRIGHT,
        },
        Pattern::VerticalStripes,
        true,
    );
    candy_cane(&mut v, 14, SCENE_BASE_Y, 14, 12, true);
    wrapped_candy(&mut v, 16, SCENE_BASE_Y, 20, Rgb(139, 92, 246));

    v
}

/// Builds the wider prop arrangement drawn at ground level outside the globe.
/// Deterministic; the layer is drawn under a fixed rotation, so every cell is
/// left non-static.
pub fn build_ground_scene() -> Vec<Voxel> {
    let mut v = Vec::new();

    gift(
        &mut v,
        (-32, GROUND_BASE_Y, 6),
        (11, 10, 11),
        GiftColors {
            main: Rgb(30, 58, 138),
            secondary: Some(Rgb(96, 165, 250)),
            ribbon: STAR_GOLD,
        },
        Pattern::VerticalStripes,
        true,
    );
    gift(
        &mut v,
        (-44, GROUND_BASE_Y, -4),
        (8, 14, 8),
        GiftColors {
            main: BASE_RED,
            secondary: Some(GARLAND_BRIGHT),
            ribbon: Rgb(34, 197, 94),
        },
        Pattern::Checkered,
        false,
    );
    lollipop(&mut v, -20, GROUND_BASE_Y, 14, 10, 5);
    wrapped_candy(&mut v, -22, GROUND_BASE_Y, 20, Rgb(249, 115, 22));

    gift(
        &mut v,
        (20, GROUND_BASE_Y, 6),
        (12, 8, 10),
        GiftColors {
            main: Rgb(22, 101, 52),
            secondary: None,
            ribbon: CANE_RED,
        },
        Pattern::Solid,
        true,
    );
    gift(
        &mut v,
        (44, GROUND_BASE_Y, -4),
        (7, 7, 7),
        GiftColors {
            main: STAR_GOLD,
            secondary: Some(Rgb(254, 240, 138)),
            ribbon: GARLAND_BRIGHT,
        },
        Pattern::VerticalStripes,
        true,
    );
    candy_cane(&mut v, 20, GROUND_BASE_Y, 14, 14, true);
    wrapped_candy(&mut v, 22, GROUND_BASE_Y, 20, Rgb(139, 92, 246));

    v
}

/// Gift box: shell body with pattern and cross ribbon, an optional
/// overhanging two-tall lid, and a bow of a knot plus radiating loops
fn gift(
    out: &mut Vec<Voxel>,
    origin: (i32, i32, i32),
    size: (i32, i32, i32),
    colors: GiftColors,
    pattern: Pattern,
    has_lid: bool,
) {
    let (ox, oy, oz) = origin;
    let (w, h, d) = size;
    let secondary = colors.secondary.unwrap_or(colors.main);
    let body_h = if has_lid { h - 2 } else { h };

    // Ribbon bands run along the box midlines of the full height
    let (mx, mz, my) = (w / 2, d / 2, h / 2);
    let ribbon_x = |x: i32| x == mx || (w > 6 && x == mx - 1);
    let ribbon_z = |z: i32| z == mz || (d > 6 && z == mz - 1);
    let ribbon_y = |y: i32| y == my || (h > 6 && y == my - 1);

    for x in 0..w {
        for y in 0..body_h {
            for z in 0..d {
                // Shell only
                if x > 0 && x < w - 1 && y > 0 && y < body_h - 1 && z > 0 && z < d - 1 {
                    continue;
                }
                let mut c = colors.main;
                match pattern {
                    Pattern::VerticalStripes if (x + z) % 2 == 0 => c = secondary,
                    Pattern::Checkered if (x + y + z) % 2 == 0 => c = secondary,
                    _ => {}
                }
                if ribbon_x(x) || ribbon_z(z) || ribbon_y(y) {
                    c = colors.ribbon;
                }
                add(out, ox + x, oy + y, oz + z, c);
            }
        }
    }

    if has_lid {
        let lid_y = oy + body_h;
        for x in -1..=w {
            for y in 0..2 {
                for z in -1..=d {
                    let mut c = colors.main;
                    if ribbon_x(x) || ribbon_z(z) {
                        c = colors.ribbon;
                    }
                    add(out, ox + x, lid_y + y, oz + z, c);
                }
            }
        }
    }

    // Bow: two-cell knot and four radiating loops
    let top_y = oy + h;
    add(out, ox + mx, top_y, oz + mz, colors.ribbon);
    add(out, ox + mx, top_y + 1, oz + mz, colors.ribbon);
    let loop_w = 3.min(w / 2);
    for i in 1..=loop_w {
        let rise = i.min(2);
        add(out, ox + mx + i, top_y + rise, oz + mz, colors.ribbon);
        add(out, ox + mx - i, top_y + rise, oz + mz, colors.ribbon);
        add(out, ox + mx, top_y + rise, oz + mz + i, colors.ribbon);
        add(out, ox + mx, top_y + rise, oz + mz - i, colors.ribbon);
    }
}

/// Candy cane: striped three-cell stick with a curved hook and hanging tip
fn candy_cane(out: &mut Vec<Voxel>, ox: i32, oy: i32, oz: i32, h: i32, facing_right: bool) {
    for y in 0..h {
        let c = if (y + ox).rem_euclid(3) == 0 {
            CANE_RED
        } else {
            CANE_WHITE
        };
        add(out, ox, oy + y, oz, c);
        add(out, ox + 1, oy + y, oz, c);
        add(out, ox, oy + y, oz + 1, c);
    }
    let top_y = oy + h;
    let dir = if facing_right { 1 } else { -1 };
    for i in 0..4 {
        add(out, ox + i * dir, top_y, oz, CANE_RED);
        add(out, ox + i * dir, top_y + 1, oz, CANE_RED);
    }
    add(out, ox + 3 * dir, top_y - 1, oz, CANE_WHITE);
    add(out, ox + 3 * dir, top_y - 2, oz, CANE_WHITE);
}

/// Lollipop: stick plus a two-deep disk with a three-color spiral swirl
fn lollipop(out: &mut Vec<Voxel>, ox: i32, oy: i32, oz: i32, h: i32, r: i32) {
    for y in 0..h {
        add(out, ox, oy + y, oz, STICK_YELLOW);
    }
    let cy = oy + h + r - 2;
    for x in -r..=r {
        for y in -r..=r {
            if x * x + y * y > r * r {
                continue;
            }
            let dist = ((x * x + y * y) as f64).sqrt();
            let angle = (y as f64).atan2(x as f64);
            let swirl = (dist * 0.5 + angle * 3.0).sin();
            let mut color = LOLLY_PINK;
            if swirl > 0.5 {
                color = LOLLY_CREAM;
            }
            if swirl < -0.5 {
                color = LOLLY_PURPLE;
            }
            add(out, ox + x, cy + y, oz, color);
            add(out, ox + x, cy + y, oz + 1, color);
        }
    }
}

/// Wrapped hard candy: a solid block with wrapper twists at both ends
fn wrapped_candy(out: &mut Vec<Voxel>, ox: i32, oy: i32, oz: i32, color: Rgb) {
    for x in 0..4 {
        for y in 0..3 {
            for z in 0..3 {
                add(out, ox + x, oy + y, oz + z, color);
            }
        }
    }
    add(out, ox - 1, oy + 1, oz + 1, WRAPPER_CREAM);
    add(out, ox - 2, oy, oz, WRAPPER_CREAM);
    add(out, ox - 2, oy + 2, oz + 2, WRAPPER_CREAM);
    add(out, ox + 4, oy + 1, oz + 1, WRAPPER_CREAM);
    add(out, ox + 5, oy, oz, WRAPPER_CREAM);
    add(out, ox + 5, oy + 2, oz, WRAPPER_CREAM);
    add(out, ox + 5, oy, oz + 2, WRAPPER_CREAM);
    add(out, ox + 5, oy + 2, oz + 2, WRAPPER_CREAM);
}
