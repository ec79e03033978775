pub mod hud;

pub use hud::Hud;

use crate::sim::{Disc, Rgb, Simulation, WORLD_HEIGHT};
use std::io::Write;

/// Smallest radius, in pixels, that still covers the pixel under a disc's
/// center.
const MIN_PIXEL_RADIUS: f32 = 0.75;

/// Off-screen RGB framebuffer, two pixels per terminal cell vertically.
pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    bg_color: Rgb,
    pixels: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, bg_color: Rgb) -> Self {
        let width = cols.max(1);
        let height = rows.max(1) * 2;
        Self {
            width,
            height,
            scale: height as f32 / WORLD_HEIGHT,
            bg_color,
            pixels: vec![rgb_f32(bg_color); width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// World width that maps onto this canvas at a uniform scale.
    pub fn world_width(&self) -> f32 {
        self.width as f32 / self.scale
    }

    pub fn clear(&mut self) {
        self.pixels.fill(rgb_f32(self.bg_color));
    }

    /// Alpha-blends a disc over whatever is already drawn.
    pub fn draw(&mut self, disc: &Disc) {
        let a = (disc.alpha / 255.0).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }

        let cx = disc.x * self.scale;
        let cy = disc.y * self.scale;
        let r = (disc.radius * self.scale).max(MIN_PIXEL_RADIUS);
        let color = rgb_f32(disc.color);

        let x0 = (cx - r).floor().max(0.0) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((cy + r).ceil().max(0.0) as usize).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let pixel = &mut self.pixels[py * self.width + px];
                for (channel, c) in pixel.iter_mut().zip(color) {
                    *channel = *channel * (1.0 - a) + c * a;
                }
            }
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| {
            let [r, g, b] = self.pixels[y * self.width + x];
            (r as u8, g as u8, b as u8)
        })
    }

    /// Encodes the framebuffer as truecolor half-block cells, starting at
    /// the home position.
    pub fn encode(&mut self) -> std::io::Result<&[u8]> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Rgb = (255, 255, 255);
        let mut prev_bot: Rgb = (255, 255, 255);

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixel(x, y).unwrap_or(self.bg_color);
                let bot = self.pixel(x, y + 1).unwrap_or(top);

                if top != prev_top {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = bot;
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = (255, 255, 255);
            prev_bot = (255, 255, 255);
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        Ok(&self.output_buf)
    }
}

/// Paints every live firework onto a freshly cleared canvas.
pub fn draw_scene(canvas: &mut Canvas, sim: &Simulation) {
    canvas.clear();
    for firework in sim.fireworks() {
        for disc in firework.primitives() {
            canvas.draw(&disc);
        }
    }
}

fn rgb_f32((r, g, b): Rgb) -> [f32; 3] {
    [r as f32, g as f32, b as f32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Adjust, Config, Firework};
    use fastrand::Rng;

    const BG: Rgb = (5, 5, 25);

    #[test]
    fn world_width_tracks_aspect_ratio() {
        let canvas = Canvas::new(200, 50, BG);
        assert_eq!(canvas.size(), (200, 100));
        assert!((canvas.world_width() - 1800.0).abs() < 1e-2);
    }

    #[test]
    fn opaque_disc_covers_center_pixel() {
        let mut canvas = Canvas::new(160, 45, BG);
        canvas.draw(&Disc { x: 450.0, y: 450.0, radius: 1.0, color: (255, 0, 0), alpha: 255.0 });
        // scale is 0.1, so the center lands in pixel (45, 45)
        assert_eq!(canvas.pixel(45, 45), Some((255, 0, 0)));
        assert_eq!(canvas.pixel(50, 45), Some(BG));
    }

    #[test]
    fn half_transparent_disc_blends_with_background() {
        let mut canvas = Canvas::new(10, 5, (0, 0, 0));
        canvas.draw(&Disc { x: 450.0, y: 450.0, radius: 900.0, color: (200, 100, 50), alpha: 127.5 });
        assert_eq!(canvas.pixel(0, 0), Some((100, 50, 25)));
    }

    #[test]
    fn off_screen_discs_are_ignored() {
        let mut canvas = Canvas::new(10, 5, BG);
        canvas.draw(&Disc { x: -500.0, y: 2000.0, radius: 10.0, color: (255, 255, 255), alpha: 255.0 });
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(canvas.pixel(x, y), Some(BG));
            }
        }
    }

    #[test]
    fn encode_emits_one_row_per_two_pixels() {
        let mut canvas = Canvas::new(4, 3, BG);
        let out = String::from_utf8(canvas.encode().unwrap().to_vec()).unwrap();
        assert!(out.starts_with("\x1b[H"));
        assert_eq!(out.matches('▄').count(), 12);
        assert_eq!(out.matches("\r\n").count(), 2);
        // uniform background: one color pair per row
        assert_eq!(out.matches("\x1b[48;2;5;5;25m").count(), 3);
    }

    #[test]
    fn scene_shows_ascending_rocket() {
        let mut canvas = Canvas::new(160, 45, BG);
        let config = Config {
            firework_spawn_rate: 1.0,
            ..Config::default()
        };
        let mut sim = Simulation::new(canvas.world_width(), WORLD_HEIGHT, config, Rng::with_seed(21));
        sim.step(None::<Adjust>);
        draw_scene(&mut canvas, &sim);
        let fw = &sim.fireworks()[0];
        let (px, py) = ((fw.x * 0.1) as usize, (fw.y * 0.1) as usize);
        let lit = canvas.pixel(px, py).unwrap();
        assert_ne!(lit, BG);
        assert!(lit.0 >= 250);

        canvas.clear();
        assert_eq!(canvas.pixel(px, py), Some(BG));
    }

    #[test]
    fn exploded_firework_paints_its_color() {
        let mut canvas = Canvas::new(160, 45, (0, 0, 0));
        let mut rng = Rng::with_seed(22);
        let config = Config::default();
        let mut fw = Firework::new(800.0, 450.0, -1.0, config.gravity, WORLD_HEIGHT);
        fw.update(&config, &mut rng);
        for disc in fw.primitives() {
            canvas.draw(&disc);
        }
        let lit = (0..90)
            .flat_map(|y| (0..160).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) != Some((0, 0, 0)))
            .count();
        assert!(lit > 0);
    }
}
