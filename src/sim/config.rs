use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable simulation parameters.
///
/// Every field is optional in the config file; missing keys keep their
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gravity: f32,
    /// Frames before a spark switches into fall mode (at 48% of this).
    pub particle_lifespan: u32,
    pub particle_count_min: u32,
    pub particle_count_max: u32,
    pub particle_spread: f32,
    /// Alpha lost per frame before fall mode.
    pub fade_speed: f32,
    /// Per-frame probability of launching a firework.
    pub firework_spawn_rate: f32,
    pub firework_min_speed: f32,
    pub firework_max_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity: 0.09,
            particle_lifespan: 75,
            particle_count_min: 60,
            particle_count_max: 80,
            particle_spread: 0.75,
            fade_speed: 4.0,
            firework_spawn_rate: 0.02,
            firework_min_speed: -15.0,
            firework_max_speed: -13.0,
        }
    }
}

/// A single live edit produced by a held key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjust {
    GravityUp,
    GravityDown,
    /// Faster launches: both speed bounds move further negative.
    SpeedUp,
    SpeedDown,
    SpawnRateUp,
    SpawnRateDown,
    SpreadUp,
    SpreadDown,
    CountUp,
    CountDown,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a JSON object. Blank input yields the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Loads `path`, silently falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                debug!(path = %path.display(), %err, "using default config");
                Self::default()
            }
        }
    }

    pub fn apply(&mut self, adjust: Adjust) {
        match adjust {
            Adjust::GravityUp => self.gravity += 0.02,
            Adjust::GravityDown => self.gravity -= 0.02,
            Adjust::SpeedUp => {
                self.firework_min_speed -= 0.5;
                self.firework_max_speed -= 0.5;
            }
            Adjust::SpeedDown => {
                self.firework_min_speed += 0.5;
                self.firework_max_speed += 0.5;
            }
            Adjust::SpawnRateUp => self.firework_spawn_rate += 0.002,
            Adjust::SpawnRateDown => self.firework_spawn_rate -= 0.002,
            Adjust::SpreadUp => self.particle_spread += 0.03,
            Adjust::SpreadDown => self.particle_spread -= 0.03,
            Adjust::CountUp => {
                self.particle_count_min = self.particle_count_min.saturating_add(3);
                self.particle_count_max = self.particle_count_max.saturating_add(6);
            }
            Adjust::CountDown => {
                self.particle_count_min = self.particle_count_min.saturating_sub(3);
                self.particle_count_max = self.particle_count_max.saturating_sub(6);
            }
        }
    }

    pub fn clamp(&mut self) {
        self.gravity = self.gravity.clamp(0.01, 0.5);
        self.firework_spawn_rate = self.firework_spawn_rate.clamp(0.001, 0.2);
        self.particle_spread = self.particle_spread.clamp(0.3, 2.5);
        self.particle_count_min = self.particle_count_min.max(20);
        self.particle_count_max = self
            .particle_count_max
            .max(self.particle_count_min.saturating_add(10));
    }

    /// Inclusive particle count range; tolerates a file with max < min.
    pub fn particle_count_range(&self) -> std::ops::RangeInclusive<u32> {
        self.particle_count_min..=self.particle_count_max.max(self.particle_count_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let c = Config::default();
        assert_eq!(c.gravity, 0.09);
        assert_eq!(c.particle_lifespan, 75);
        assert_eq!(c.particle_count_min, 60);
        assert_eq!(c.particle_count_max, 80);
        assert_eq!(c.particle_spread, 0.75);
        assert_eq!(c.fade_speed, 4.0);
        assert_eq!(c.firework_spawn_rate, 0.02);
        assert_eq!(c.firework_min_speed, -15.0);
        assert_eq!(c.firework_max_speed, -13.0);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let c = Config::from_json(r#"{"gravity": 0.2, "fade_speed": 3, "unknown": true}"#).unwrap();
        assert_eq!(c.gravity, 0.2);
        assert_eq!(c.fade_speed, 3.0);
        assert_eq!(c.particle_count_min, 60);
    }

    #[test]
    fn example_file_spells_out_defaults() {
        let c = Config::from_json(include_str!("../../config.example.json")).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn blank_input_is_default() {
        assert_eq!(Config::from_json("  \n").unwrap(), Config::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"gravity\": 0.3, ").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Parse(_))));
        assert_eq!(Config::load_or_default(file.path()), Config::default());
    }

    #[test]
    fn wrong_field_type_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gravity": 0.3, "particle_count_min": 12.5}}"#).unwrap();
        assert_eq!(Config::load_or_default(file.path()), Config::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Read(_))));
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn valid_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"particle_count_min": 30, "particle_count_max": 45}}"#).unwrap();
        let c = Config::load_or_default(file.path());
        assert_eq!(c.particle_count_range(), 30..=45);
    }

    #[test]
    fn raising_min_past_max_pushes_max_up() {
        let mut c = Config {
            particle_count_min: 75,
            ..Config::default()
        };
        c.clamp();
        assert_eq!(c.particle_count_max, 85);
    }

    #[test]
    fn count_down_stops_at_floor() {
        let mut c = Config::default();
        for _ in 0..50 {
            c.apply(Adjust::CountDown);
            c.clamp();
        }
        assert_eq!(c.particle_count_min, 20);
        assert_eq!(c.particle_count_max, 30);
    }

    #[test]
    fn speed_bounds_move_together() {
        let mut c = Config::default();
        c.apply(Adjust::SpeedUp);
        assert_eq!((c.firework_min_speed, c.firework_max_speed), (-15.5, -13.5));
        c.apply(Adjust::SpeedDown);
        c.apply(Adjust::SpeedDown);
        assert_eq!((c.firework_min_speed, c.firework_max_speed), (-14.5, -12.5));
    }

    #[test]
    fn inverted_count_range_uses_min() {
        let c = Config {
            particle_count_min: 50,
            particle_count_max: 10,
            ..Config::default()
        };
        assert_eq!(c.particle_count_range(), 50..=50);
    }

    fn any_adjust() -> impl Strategy<Value = Adjust> {
        prop_oneof![
            Just(Adjust::GravityUp),
            Just(Adjust::GravityDown),
            Just(Adjust::SpeedUp),
            Just(Adjust::SpeedDown),
            Just(Adjust::SpawnRateUp),
            Just(Adjust::SpawnRateDown),
            Just(Adjust::SpreadUp),
            Just(Adjust::SpreadDown),
            Just(Adjust::CountUp),
            Just(Adjust::CountDown),
        ]
    }

    proptest! {
        #[test]
        fn clamped_config_stays_in_range(edits in proptest::collection::vec(any_adjust(), 0..400)) {
            let mut c = Config::default();
            for edit in edits {
                c.apply(edit);
                c.clamp();
                prop_assert!((0.01..=0.5).contains(&c.gravity));
                prop_assert!((0.001..=0.2).contains(&c.firework_spawn_rate));
                prop_assert!((0.3..=2.5).contains(&c.particle_spread));
                prop_assert!(c.particle_count_min >= 20);
                prop_assert!(c.particle_count_max >= c.particle_count_min + 10);
            }
        }
    }
}
