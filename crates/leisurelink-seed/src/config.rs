//! Run configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::{Error, Result, geo::GeoSampler};

/// The password every generated user can log in with.
pub const DEFAULT_PASSWORD: &str = "123456789";

/// How many records to generate and which optional phases to run.
///
/// Counts only scale loop bounds. Every field has a default so a partial
/// config file (or none at all) is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
  pub users:             usize,
  pub events:            usize,
  /// Categories to create before events. With 0, linking uses whatever
  /// categories already exist.
  pub categories:        usize,
  pub comments:          usize,

  pub link_categories:   bool,
  pub link_memberships:  bool,
  pub generate_comments: bool,
  pub link_comments:     bool,

  /// Events are scattered within this distance of a reference city.
  pub radius_km:         f64,
  /// Shared plaintext password, hashed separately for every user.
  pub password:          String,
  /// argon2 time cost (iterations).
  pub hash_cost:         u32,
  /// argon2 memory cost in KiB.
  pub hash_memory_kib:   u32,

  /// Fixed RNG seed for a reproducible dataset.
  pub seed:              Option<u64>,
  /// Directory of `.png`/`.jpg`/`.jpeg` files attached to events.
  pub event_image_dir:   Option<PathBuf>,
  /// Directory of profile photos attached to users.
  pub user_photo_dir:    Option<PathBuf>,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self {
      users:             100,
      events:            1000,
      categories:        12,
      comments:          20,
      link_categories:   true,
      link_memberships:  true,
      generate_comments: true,
      link_comments:     true,
      radius_km:         20.0,
      password:          DEFAULT_PASSWORD.to_owned(),
      hash_cost:         2,
      hash_memory_kib:   19 * 1024,
      seed:              None,
      event_image_dir:   None,
      user_photo_dir:    None,
    }
  }
}

impl SeedConfig {
  /// Reject settings a run cannot start with.
  pub fn validate(&self) -> Result<()> {
    if GeoSampler::new(self.radius_km).is_err() {
      return Err(Error::Configuration(format!(
        "radius_km must be positive, got {}",
        self.radius_km
      )));
    }
    if self.password.is_empty() {
      return Err(Error::Configuration("password must not be empty".into()));
    }
    if self.hash_cost == 0 {
      return Err(Error::Configuration("hash_cost must be at least 1".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let cfg = SeedConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.users, 100);
    assert_eq!(cfg.events, 1000);
    assert_eq!(cfg.password, "123456789");
  }

  #[test]
  fn non_positive_radius_is_rejected() {
    for radius in [0.0, -5.0, f64::NAN, 5e-324] {
      let cfg = SeedConfig { radius_km: radius, ..Default::default() };
      assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
    }
  }

  #[test]
  fn empty_password_is_rejected() {
    let cfg = SeedConfig { password: String::new(), ..Default::default() };
    assert!(cfg.validate().is_err());
  }
}
