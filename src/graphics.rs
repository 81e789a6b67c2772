use crate::voxel::Rgb;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::Write;

/// Background color behind the whole scene (deep night blue)
pub const BACKDROP: Rgb = Rgb(15, 23, 42);

/// An RGB pixel buffer presented to the terminal with half-block glyphs.
///
/// One terminal cell carries two vertically stacked pixels: the upper pixel
/// is the foreground color of `▀`, the lower pixel its background. A grid of
/// `cols` x `rows` cells therefore exposes a `cols` x `2 * rows` raster.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        let (width, height) = (cols, rows * 2);
        Canvas {
            width,
            height,
            pixels: vec![BACKDROP; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes the buffer if the terminal dimensions changed
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols != self.width || rows * 2 != self.height {
            *self = Canvas::new(cols, rows);
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BACKDROP);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fills an axis-aligned rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        let (x0, y0, x1, y1) = match self.clip(x, y, w, h) {
            Some(bounds) => bounds,
            None => return,
        };
        for py in y0..y1 {
            let row = py * self.width;
            for px in x0..x1 {
                self.pixels[row + px] = color;
            }
        }
    }

    /// Blends a translucent rectangle over the existing pixels
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: f64) {
        let (x0, y0, x1, y1) = match self.clip(x, y, w, h) {
            Some(bounds) => bounds,
            None => return,
        };
        for py in y0..y1 {
            let row = py * self.width;
            for px in x0..x1 {
                self.pixels[row + px] = self.pixels[row + px].blend(color, alpha);
            }
        }
    }

    fn clip(&self, x: i32, y: i32, w: i32, h: i32) -> Option<(usize, usize, usize, usize)> {
        if w <= 0 || h <= 0 {
            return None;
        }
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w)).clamp(0, self.width as i32) as usize;
        let y1 = (y.saturating_add(h)).clamp(0, self.height as i32) as usize;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    /// Writes the buffer to the terminal, two pixels per cell
    pub fn present(&self, out: &mut impl Write) -> std::io::Result<()> {
        let mut last_fg: Option<Rgb> = None;
        let mut last_bg: Option<Rgb> = None;
        for row in 0..self.height / 2 {
            queue!(out, MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let upper = self.pixels[(row * 2) * self.width + col];
                let lower = self.pixels[(row * 2 + 1) * self.width + col];
                if last_fg != Some(upper) {
                    queue!(out, SetForegroundColor(to_term(upper)))?;
                    last_fg = Some(upper);
                }
                if last_bg != Some(lower) {
                    queue!(out, SetBackgroundColor(to_term(lower)))?;
                    last_bg = Some(lower);
                }
                queue!(out, Print('▀'))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

fn to_term(color: Rgb) -> Color {
    Color::Rgb {
        r: color.0,
        g: color.1,
        b: color.2,
    }
}
