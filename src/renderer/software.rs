//! ---------------------------------------------------------------------------
//! CPU top-down rasteriser
//!
//! * Fills an internal `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Calls arrive in painter's order, so no depth buffer is needed.
//! * Everything is clipped to the frame; off-screen geometry is free.
//! ---------------------------------------------------------------------------

use glam::Vec2;

use crate::renderer::{BACKGROUND, DrawCall, Renderer, Rgba, TopDownView};

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    view: Option<TopDownView>,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize, view: TopDownView) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(BACKGROUND);
        self.view = Some(view);
    }

    fn draw(&mut self, call: &DrawCall) {
        let Some(view) = self.view else {
            return;
        };
        match *call {
            DrawCall::Rect { min, max, colour } => {
                let (x0, y0) = view.to_screen(min, self.width, self.height);
                let (x1, y1) = view.to_screen(max, self.width, self.height);
                self.fill_rect(x0, y0, x1, y1, colour);
            }
            DrawCall::Disc {
                centre,
                radius,
                colour,
            } => {
                let (cx, cy) = view.to_screen(centre, self.width, self.height);
                let r = (radius * view.pixels_per_metre).round().max(1.0) as i32;
                self.fill_disc(cx, cy, r, colour);
            }
            DrawCall::Line { from, to, colour } => {
                let (x0, y0) = view.to_screen(from, self.width, self.height);
                let (x1, y1) = view.to_screen(to, self.width, self.height);
                self.draw_line(x0, y0, x1, y1, colour);
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── primitives ─────────────────────────────────*/

impl Software {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.scratch[y * self.width + x])
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, colour: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.scratch[y as usize * self.width + x as usize] = colour;
        }
    }

    /// Inclusive-exclusive pixel rectangle, clipped to the frame.
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let clamp_x = |v: i32| v.clamp(0, self.width as i32) as usize;
        let clamp_y = |v: i32| v.clamp(0, self.height as i32) as usize;
        let (xa, xb) = (clamp_x(x0.min(x1)), clamp_x(x0.max(x1).max(x0.min(x1) + 1)));
        let (ya, yb) = (clamp_y(y0.min(y1)), clamp_y(y0.max(y1).max(y0.min(y1) + 1)));
        for y in ya..yb {
            let row = y * self.width;
            self.scratch[row + xa..row + xb].fill(colour);
        }
    }

    fn fill_disc(&mut self, cx: i32, cy: i32, r: i32, colour: Rgba) {
        let r2 = r * r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.put(cx + dx, cy + dy, colour);
                }
            }
        }
    }

    /// Bresenham, clipped per pixel.
    fn draw_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Pick a zoom so the rectangle `lo..hi` (world XZ) fits into the frame
/// with a small margin.
pub fn fit_view(lo: Vec2, hi: Vec2, width: usize, height: usize) -> TopDownView {
    let extent = (hi - lo).max(Vec2::splat(1.0)) * 1.1;
    let ppm = (width as f32 / extent.x).min(height as f32 / extent.y);
    TopDownView {
        centre: (lo + hi) * 0.5,
        pixels_per_metre: ppm,
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
