//! Engine configuration: defaults, clamping normalization, and optional
//! TOML override of the defaults (ENGINE_CONFIG_PATH).
//!
//! Normalization repairs out-of-range values silently; it never rejects.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Hard floor for the per-question time budget. Children always get at least
/// this long to answer, whatever the settings say.
pub const MIN_ALLOWED_MIN_TIME_MS: i64 = 1_500;
pub const MAX_MIN_TIME_MS: i64 = 60_000;
pub const MAX_START_TIME_MS: i64 = 120_000;

pub const OPERAND_CAP_MIN: i64 = 1;
pub const OPERAND_CAP_MAX: i64 = 999;

/// Host color theme. Persisted with the config so it survives restarts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
  Light,
  Dark,
}

impl Default for Theme {
  fn default() -> Self { Theme::Light }
}

/// User-adjustable settings, persisted inside the progress record.
/// Field names stay camelCase on disk for compatibility with the original
/// storage format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
  pub sound_on: bool,
  pub theme: Theme,
  /// Per-operation operand caps (for div, the cap bounds the dividend).
  pub max_add: i64,
  pub max_sub: i64,
  pub max_mul: i64,
  pub max_div: i64,
  pub min_time_ms: i64,
  pub start_time_ms: i64,
  /// Pacing decrement unit per level / streak step.
  pub time_step_ms: i64,
  pub streak_to_speed_up: i64,
  pub streak_to_level_up: i64,
  pub level_max: i64,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      sound_on: true,
      theme: Theme::Light,
      max_add: 100,
      max_sub: 100,
      max_mul: 12,
      max_div: 100,
      min_time_ms: 2_200,
      start_time_ms: 5_000,
      time_step_ms: 150,
      streak_to_speed_up: 3,
      streak_to_level_up: 5,
      level_max: 12,
    }
  }
}

impl EngineConfig {
  /// Clamp every field into its allowed window. Runs on every load and save,
  /// so `min_time_ms <= start_time_ms` always holds afterwards.
  pub fn normalize(&mut self) {
    self.max_add = self.max_add.clamp(OPERAND_CAP_MIN, OPERAND_CAP_MAX);
    self.max_sub = self.max_sub.clamp(OPERAND_CAP_MIN, OPERAND_CAP_MAX);
    self.max_mul = self.max_mul.clamp(OPERAND_CAP_MIN, OPERAND_CAP_MAX);
    self.max_div = self.max_div.clamp(OPERAND_CAP_MIN, OPERAND_CAP_MAX);

    self.min_time_ms = self.min_time_ms.clamp(MIN_ALLOWED_MIN_TIME_MS, MAX_MIN_TIME_MS);
    self.start_time_ms = self.start_time_ms.clamp(self.min_time_ms, MAX_START_TIME_MS);

    if self.time_step_ms < 0 {
      self.time_step_ms = 0;
    }
    // The streak divisors and the level ceiling must stay positive.
    if self.streak_to_speed_up < 1 {
      self.streak_to_speed_up = 1;
    }
    if self.streak_to_level_up < 1 {
      self.streak_to_level_up = 1;
    }
    if self.level_max < 1 {
      self.level_max = 1;
    }
  }
}

/// Attempt to load default-config overrides from ENGINE_CONFIG_PATH (TOML).
/// On any IO/parsing error, returns None and the built-in defaults apply.
pub fn load_default_config_from_env() -> Option<EngineConfig> {
  let path = std::env::var("ENGINE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<EngineConfig>(&s) {
      Ok(mut cfg) => {
        cfg.normalize();
        info!(target: "engine", %path, "Loaded engine config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "engine", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "engine", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_already_normal() {
    let mut cfg = EngineConfig::default();
    let before = cfg.clone();
    cfg.normalize();
    assert_eq!(cfg, before);
  }

  #[test]
  fn normalize_repairs_inverted_time_window() {
    let mut cfg = EngineConfig { min_time_ms: 9_000, start_time_ms: 3_000, ..EngineConfig::default() };
    cfg.normalize();
    assert!(cfg.min_time_ms <= cfg.start_time_ms);
    assert_eq!(cfg.start_time_ms, 9_000);
  }

  #[test]
  fn normalize_clamps_caps_and_floors() {
    let mut cfg = EngineConfig {
      max_add: 0,
      max_mul: 5_000,
      min_time_ms: 10,
      streak_to_speed_up: 0,
      level_max: -3,
      ..EngineConfig::default()
    };
    cfg.normalize();
    assert_eq!(cfg.max_add, OPERAND_CAP_MIN);
    assert_eq!(cfg.max_mul, OPERAND_CAP_MAX);
    assert_eq!(cfg.min_time_ms, MIN_ALLOWED_MIN_TIME_MS);
    assert_eq!(cfg.streak_to_speed_up, 1);
    assert_eq!(cfg.level_max, 1);
  }

  #[test]
  fn normalize_is_idempotent() {
    let mut cfg = EngineConfig { min_time_ms: 0, start_time_ms: 500_000, ..EngineConfig::default() };
    cfg.normalize();
    let once = cfg.clone();
    cfg.normalize();
    assert_eq!(cfg, once);
  }

  #[test]
  fn toml_round_trip_keeps_camel_case() {
    let cfg = EngineConfig::default();
    let s = toml::to_string(&cfg).unwrap();
    assert!(s.contains("startTimeMs"));
    let back: EngineConfig = toml::from_str(&s).unwrap();
    assert_eq!(back, cfg);
  }
}
