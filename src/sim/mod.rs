pub mod config;
pub mod firework;
pub mod particle;

pub use config::{Adjust, Config};
pub use firework::{Firework, Stage};
pub use particle::Particle;

use fastrand::Rng;
use tracing::info;

pub type Rgb = (u8, u8, u8);

/// Logical world height. Width follows the terminal aspect ratio.
pub const WORLD_HEIGHT: f32 = 900.0;

/// A filled circle in world coordinates. `alpha` is 0-255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

pub struct Simulation {
    width: f32,
    height: f32,
    config: Config,
    defaults: Config,
    fireworks: Vec<Firework>,
    paused: bool,
    version: u64,
    rng: Rng,
}

impl Simulation {
    pub fn new(width: f32, height: f32, config: Config, rng: Rng) -> Self {
        Self {
            width,
            height,
            config,
            defaults: Config::default(),
            fireworks: Vec::new(),
            paused: false,
            version: 0,
            rng,
        }
    }

    /// One frame of simulation. Does nothing while paused.
    pub fn step(&mut self, held: impl IntoIterator<Item = Adjust>) {
        if self.paused {
            return;
        }

        let mut changed = false;
        for adjust in held {
            self.config.apply(adjust);
            changed = true;
        }
        if changed {
            self.config.clamp();
            self.version += 1;
        }

        if self.rng.f32() < self.config.firework_spawn_rate {
            self.fireworks
                .push(Firework::launch(self.width, self.height, &self.config, &mut self.rng));
        }

        let (config, rng) = (&self.config, &mut self.rng);
        self.fireworks.retain_mut(|fw| {
            fw.update(config, rng);
            !fw.is_done()
        });
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.version += 1;
        info!(paused = self.paused, "pause toggled");
    }

    /// Clears the sky and restores the built-in defaults, discarding any
    /// values loaded from the config file.
    pub fn reset(&mut self) {
        self.config = self.defaults;
        self.fireworks.clear();
        self.version += 1;
        info!("simulation reset");
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|fw| fw.particles().len()).sum()
    }

    #[cfg(test)]
    fn push(&mut self, firework: Firework) {
        self.fireworks.push(firework);
    }
}
