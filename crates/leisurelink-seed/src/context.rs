//! The generation context: randomness, fake data and a fixed clock, owned by
//! one run and passed down explicitly.

use chrono::{DateTime, Utc};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use uuid::Uuid;

use crate::fake::{FakeSource, WordLists};

pub struct GenContext<F = WordLists> {
  pub rng:  StdRng,
  pub fake: F,
  /// "Now" as far as the run is concerned; captured once so every date in a
  /// run is relative to the same instant.
  pub now:  DateTime<Utc>,
}

impl GenContext<WordLists> {
  /// A context seeded from the operating system.
  pub fn from_entropy() -> Self {
    Self::new(StdRng::from_entropy(), WordLists, Utc::now())
  }

  /// A reproducible context: the same seed (and clock) yields the same data.
  pub fn seeded(seed: u64) -> Self {
    Self::new(StdRng::seed_from_u64(seed), WordLists, Utc::now())
  }

  /// Seeded if `seed` is given, from entropy otherwise.
  pub fn from_seed(seed: Option<u64>) -> Self {
    seed.map_or_else(Self::from_entropy, Self::seeded)
  }
}

impl<F: FakeSource> GenContext<F> {
  pub fn new(rng: StdRng, fake: F, now: DateTime<Utc>) -> Self {
    Self { rng, fake, now }
  }

  /// Pin the clock, e.g. for reproducible tests.
  pub fn at(mut self, now: DateTime<Utc>) -> Self {
    self.now = now;
    self
  }

  /// A version-4 UUID drawn from the context RNG.
  pub fn new_id(&mut self) -> Uuid {
    uuid::Builder::from_random_bytes(self.rng.r#gen()).into_uuid()
  }
}
