//! Password hashing for generated accounts.

use argon2::{
  Algorithm, Argon2, Params, PasswordHasher as _, Version,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// A slow, salted one-way password hash.
pub trait CredentialHasher {
  /// Hash `plaintext` into a self-describing (PHC) string.
  fn hash(&self, plaintext: &str) -> Result<String>;
}

/// argon2id with a configurable work factor and a fresh salt per call.
#[derive(Clone)]
pub struct Argon2Hasher {
  argon2: Argon2<'static>,
}

impl Argon2Hasher {
  /// `memory_kib` is the argon2 memory cost, `time_cost` the iteration count.
  pub fn new(memory_kib: u32, time_cost: u32) -> Result<Self> {
    let params = Params::new(memory_kib, time_cost, Params::DEFAULT_P_COST, None)
      .map_err(|e| Error::Configuration(format!("argon2 parameters: {e}")))?;
    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

impl Default for Argon2Hasher {
  fn default() -> Self { Self { argon2: Argon2::default() } }
}

impl CredentialHasher for Argon2Hasher {
  fn hash(&self, plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(
      self
        .argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| Error::Hash(e.to_string()))?
        .to_string(),
    )
  }
}
