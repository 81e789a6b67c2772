mod audio;
mod graphics;
mod math;
mod overlay;
mod render;
mod scene;
mod snow;
mod state;
mod voxel;

use anyhow::{ensure, Context, Result};
use audio::AudioEngine;
use clap::Parser;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use graphics::Canvas;
use log::debug;
use overlay::SnowOverlay;
use rand::{rngs::StdRng, SeedableRng};
use render::{globe_camera, ground_camera, render_ground, GlobeRenderer};
use snow::SnowField;
use state::AppState;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

/// Animated pixel-art snow globe for the terminal
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Angular increment per frame (radians)
    #[arg(long, default_value_t = 0.005, value_parser = parse_positive_f64)]
    rotation_speed: f64,
    /// Base pixel size of one voxel at zero depth
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pixel_size: u32,
    /// Start without the random ornament pass
    #[arg(long)]
    no_decorations: bool,
    /// Seed for ornament colors and snow placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Number of snow particles inside the globe
    #[arg(long, default_value_t = 150)]
    snow_count: usize,
    /// Start without music
    #[arg(long)]
    mute: bool,
}

fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(String::from("must be greater than zero"))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // A missing or degenerate surface is fatal; nothing is rendered
    let size = termsize::get().context("cannot determine terminal size (not a tty?)")?;
    ensure!(
        size.cols >= 20 && size.rows >= 10,
        "terminal too small: {}x{}",
        size.cols,
        size.rows
    );

    let mut out = stdout();
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide)?;

    let result = run(&mut out, &args);

    // Teardown must run on error paths too, before the surface goes away
    let _ = execute!(out, Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    result
}

fn run(out: &mut impl Write, args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    debug!("seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut state = AppState {
        angle: 0.0,
        paused: false,
        debug: false,
        show_decorations: !args.no_decorations,
    };

    let mut voxels = scene::build_globe_scene(state.show_decorations, &mut rng);
    let ground = scene::build_ground_scene();
    debug!("scene: {} globe voxels, {} ground voxels", voxels.len(), ground.len());

    let size = termsize::get().context("terminal size unavailable")?;
    let mut canvas = Canvas::new(size.cols as usize, size.rows as usize);
    let mut snow = SnowField::new(args.snow_count, &mut rng);
    let mut snow_overlay = SnowOverlay::new(100, canvas.width(), canvas.height(), &mut rng);
    let mut globe = GlobeRenderer::new();

    let mut audio = AudioEngine::new();
    if !args.mute {
        audio.start();
    }

    // FPS bookkeeping
    let mut frames_since_last_update = 0usize;
    let mut last_fps_calculation = Instant::now();
    let mut fps = 0.0f64;

    let frame_budget = Duration::from_millis(16);

    loop {
        let frame_start = Instant::now();

        // Drain pending input first
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('p') | KeyCode::Char('P') => state.paused = !state.paused,
                    KeyCode::Char('d') | KeyCode::Char('D') => {
                        state.show_decorations = !state.show_decorations;
                        voxels = scene::build_globe_scene(state.show_decorations, &mut rng);
                        debug!(
                            "scene regenerated, decorations {}",
                            if state.show_decorations { "on" } else { "off" }
                        );
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => audio.toggle(),
                    KeyCode::Char('i') | KeyCode::Char('I') => state.debug = !state.debug,
                    _ => {}
                },
                Event::Resize(cols, rows) => canvas.resize(cols as usize, rows as usize),
                _ => {}
            }
        }

        if !state.paused {
            // The decorative layers follow terminal resizes every frame
            if let Some(dims) = termsize::get() {
                canvas.resize(dims.cols as usize, dims.rows as usize);
            }
            let (w, h) = (canvas.width(), canvas.height());

            canvas.clear();
            snow_overlay.update(w, h, &mut rng);
            snow_overlay.draw(&mut canvas);
            render_ground(&mut canvas, &ground, &ground_camera(w, h, args.pixel_size));

            snow.update(&mut rng);
            globe.render(
                &mut canvas,
                &voxels,
                snow.flakes(),
                state.angle,
                &globe_camera(w, h, args.pixel_size),
            );
            state.angle += args.rotation_speed;

            canvas.present(out)?;
        }

        frames_since_last_update += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(last_fps_calculation);
        if elapsed.as_secs_f64() >= 1.0 {
            fps = frames_since_last_update as f64 / elapsed.as_secs_f64();
            frames_since_last_update = 0;
            last_fps_calculation = now;
        }

        if state.debug {
            let info = format!(
                "{} {}  fps {:>5.1}  angle {:.2}  voxels {}  snow {}  music {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                fps,
                state.angle,
                voxels.len(),
                args.snow_count,
                if audio.is_playing() { "on" } else { "off" },
            );
            queue!(
                out,
                MoveTo(0, 0),
                SetForegroundColor(Color::White),
                SetBackgroundColor(Color::Black),
                Print(info),
                ResetColor
            )?;
            out.flush()?;
        }
        if state.paused {
            queue!(
                out,
                MoveTo(0, 0),
                SetForegroundColor(Color::White),
                SetBackgroundColor(Color::Black),
                Print("PAUSED"),
                ResetColor
            )?;
            out.flush()?;
        }

        // Yield the rest of the frame, waking early for input
        let spent = frame_start.elapsed();
        if spent < frame_budget {
            event::poll(frame_budget - spent)?;
        }
    }
}
