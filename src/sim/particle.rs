use super::{Config, Disc, Rgb};
use fastrand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;

pub const TRAIL_LEN: usize = 28;
const DRAG: f32 = 0.95;
const FALL_THRESHOLD: f32 = 0.48;
const FALL_DRAG_X: f32 = 0.965;
const FALL_GRAVITY_SCALE: f32 = 2.8;
const FALL_FADE: f32 = 2.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

/// One spark of an exploded firework.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    gravity: f32,
    lifespan: u32,
    age: u32,
    alpha: f32,
    fade_speed: f32,
    fall_mode: bool,
    trail: VecDeque<TrailSample>,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, color: Rgb, gravity: f32, lifespan: u32, fade_speed: f32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            color,
            gravity,
            lifespan,
            age: 0,
            alpha: 255.0,
            // alpha must never rise, whatever the config file says
            fade_speed: fade_speed.max(0.0),
            fall_mode: false,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    /// Launches a spark from around `(x, y)` in a random direction.
    pub fn burst(x: f32, y: f32, color: Rgb, gravity: f32, config: &Config, power: f32, rng: &mut Rng) -> Self {
        let x = x + uniform(rng, -10.0, 10.0);
        let y = y + uniform(rng, -10.0, 10.0);
        let angle = rng.f32() * TAU;
        let speed = uniform(rng, 9.0, 17.0) * config.particle_spread * power;
        Self::new(
            x,
            y,
            angle.cos() * speed,
            angle.sin() * speed,
            color,
            gravity,
            config.particle_lifespan,
            config.fade_speed,
        )
    }

    pub fn update(&mut self) {
        self.age += 1;
        if self.age as f32 > self.lifespan as f32 * FALL_THRESHOLD {
            self.fall_mode = true;
        }

        if self.fall_mode {
            self.vx *= FALL_DRAG_X;
            self.vy += self.gravity * FALL_GRAVITY_SCALE;
            self.alpha = (self.alpha - FALL_FADE).max(0.0);
        } else {
            self.vy += self.gravity;
            self.vx *= DRAG;
            self.vy *= DRAG;
            self.alpha = (self.alpha - self.fade_speed).max(0.0);
        }

        self.x += self.vx;
        self.y += self.vy;

        self.trail.push_back(TrailSample { x: self.x, y: self.y, alpha: self.alpha });
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn in_fall_mode(&self) -> bool {
        self.fall_mode
    }

    /// Oldest sample first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = &TrailSample> {
        self.trail.iter()
    }

    /// Trail dots (oldest, faintest first) followed by the glow, core and
    /// highlight discs of the spark itself.
    pub fn primitives(&self) -> impl Iterator<Item = Disc> + '_ {
        let n = self.trail.len() as f32;
        let trail = self.trail.iter().enumerate().filter_map(move |(i, s)| {
            let t = i as f32 / n;
            let alpha = (s.alpha * t.powf(1.3)).trunc();
            if alpha <= 8.0 {
                return None;
            }
            let radius = (7.0 * t).floor().max(2.0);
            Some(Disc { x: s.x, y: s.y, radius, color: self.color, alpha })
        });

        let glow = (self.alpha > 10.0).then(|| {
            let alpha = self.alpha.min(255.0);
            let (r, g, b) = self.color;
            let bright = (r.saturating_add(120), g.saturating_add(120), b.saturating_add(120));
            [
                Disc { x: self.x, y: self.y, radius: 12.0, color: self.color, alpha: alpha * (alpha * 0.5).trunc() / 255.0 },
                Disc { x: self.x, y: self.y, radius: 8.0, color: self.color, alpha },
                Disc { x: self.x, y: self.y, radius: 4.0, color: bright, alpha },
            ]
        });

        trail.chain(glow.into_iter().flatten())
    }
}

pub(crate) fn uniform(rng: &mut Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}
