use super::particle::{Particle, uniform};
use super::{Config, Disc, Rgb};
use fastrand::Rng;
use tracing::trace;

const VIBRANT_COLORS: [Rgb; 9] = [
    (255, 80, 80),
    (255, 180, 60),
    (255, 255, 120),
    (120, 255, 120),
    (120, 255, 255),
    (100, 180, 255),
    (160, 120, 255),
    (255, 120, 255),
    (255, 150, 200),
];

const LAUNCH_DECEL: f32 = 0.18;
const EXPLODE_VY: f32 = -1.5;
const BURST_POWER: f32 = 1.3;
const SPAWN_MARGIN: u32 = 200;

const ROCKET_COLOR: Rgb = (255, 255, 255);
const ROCKET_TAIL_COLOR: Rgb = (255, 180, 80);
const ROCKET_TAIL_LEN: usize = 8;

#[derive(Debug, Clone)]
pub enum Stage {
    Ascending { vy: f32 },
    Exploded { particles: Vec<Particle> },
}

#[derive(Debug, Clone)]
pub struct Firework {
    pub x: f32,
    pub y: f32,
    gravity: f32,
    ground: f32,
    stage: Stage,
}

impl Firework {
    /// Launches from the bottom of a `width` x `height` world.
    pub fn launch(width: f32, height: f32, config: &Config, rng: &mut Rng) -> Self {
        let width = width.max(0.0) as u32;
        let x = if width >= SPAWN_MARGIN * 2 {
            rng.u32(SPAWN_MARGIN..=width - SPAWN_MARGIN)
        } else {
            rng.u32(0..=width)
        };
        let vy = uniform(rng, config.firework_min_speed, config.firework_max_speed);
        Self::new(x as f32, height, vy, config.gravity, height)
    }

    pub fn new(x: f32, y: f32, vy: f32, gravity: f32, ground: f32) -> Self {
        Self {
            x,
            y,
            gravity,
            ground,
            stage: Stage::Ascending { vy },
        }
    }

    /// Advances one tick. `config` is the configuration in effect now and
    /// shapes the burst if this tick is the one that explodes.
    pub fn update(&mut self, config: &Config, rng: &mut Rng) {
        match &mut self.stage {
            Stage::Ascending { vy } => {
                self.y += *vy;
                *vy += LAUNCH_DECEL;
                if *vy >= EXPLODE_VY {
                    self.explode(config, rng);
                }
            }
            Stage::Exploded { particles } => {
                particles.retain_mut(|p| {
                    p.update();
                    !p.is_dead()
                });
            }
        }
    }

    fn explode(&mut self, config: &Config, rng: &mut Rng) {
        let color = VIBRANT_COLORS[rng.usize(..VIBRANT_COLORS.len())];
        let count = rng.u32(config.particle_count_range());
        let particles = (0..count)
            .map(|_| Particle::burst(self.x, self.y, color, self.gravity, config, BURST_POWER, rng))
            .collect();
        trace!(x = self.x, y = self.y, count, "firework exploded");
        self.stage = Stage::Exploded { particles };
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn is_exploded(&self) -> bool {
        matches!(self.stage, Stage::Exploded { .. })
    }

    /// Empty while ascending.
    pub fn particles(&self) -> &[Particle] {
        match &self.stage {
            Stage::Ascending { .. } => &[],
            Stage::Exploded { particles } => particles,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(&self.stage, Stage::Exploded { particles } if particles.is_empty())
    }

    pub fn primitives(&self) -> Box<dyn Iterator<Item = Disc> + '_> {
        match &self.stage {
            Stage::Ascending { .. } => {
                let (x, y, ground) = (self.x, self.y, self.ground);
                let head = Disc { x, y, radius: 5.0, color: ROCKET_COLOR, alpha: 255.0 };
                let tail = (0..ROCKET_TAIL_LEN).filter_map(move |i| {
                    let ty = y + i as f32 * 10.0;
                    if ty > ground {
                        return None;
                    }
                    let t = i as f32 / ROCKET_TAIL_LEN as f32;
                    Some(Disc {
                        x,
                        y: ty,
                        radius: 5.0 - i as f32 * 0.6,
                        color: ROCKET_TAIL_COLOR,
                        alpha: (255.0 * (1.0 - t)).trunc(),
                    })
                });
                Box::new(std::iter::once(head).chain(tail))
            }
            Stage::Exploded { particles } => Box::new(particles.iter().flat_map(|p| p.primitives())),
        }
    }
}
