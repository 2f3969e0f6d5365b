//! Entity types: the rows a generation run produces.
//!
//! Every entity is created once during a run and never deleted. The only
//! post-creation mutation is the `user_details_id` back-reference on
//! [`User`], set after the matching [`UserDetails`] row exists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};
use uuid::Uuid;

use crate::geo::GeoPoint;

// ─── Binary objects ──────────────────────────────────────────────────────────

/// Opaque reference to a stored binary object, usable as a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobRef(pub i64);

// ─── Users ───────────────────────────────────────────────────────────────────

/// Application role bitmask stored in `users.app_user_roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppRole {
  /// An ordinary user; the only role fixtures are created with.
  #[default]
  User,
  Admin,
}

impl AppRole {
  pub fn bits(self) -> i64 {
    match self {
      Self::User => 1,
      Self::Admin => 2,
    }
  }

  pub fn from_bits(bits: i64) -> Option<Self> {
    match bits {
      1 => Some(Self::User),
      2 => Some(Self::Admin),
      _ => None,
    }
  }
}

/// An account row. The password is only ever held as a PHC hash string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:              Uuid,
  pub email:           String,
  pub password_hash:   String,
  pub is_activated:    bool,
  pub role:            AppRole,
  /// Set after the profile row is written.
  pub user_details_id: Option<Uuid>,
}

/// The profile sub-record of a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
  pub id:           Uuid,
  pub user_id:      Uuid,
  pub name:         String,
  pub last_name:    String,
  pub address:      String,
  pub birth_date:   NaiveDate,
  pub phone_number: String,
  pub photo:        Option<BlobRef>,
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub id:          Uuid,
  pub name:        String,
  pub description: String,
  pub address:     String,
  pub start_date:  DateTime<Utc>,
  /// Always 1 to 14 whole days after `start_date`.
  pub end_date:    DateTime<Utc>,
  pub location:    GeoPoint,
}

/// An image attached to an event; the bytes live in the blob store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventImage {
  pub id:       Uuid,
  pub event_id: Uuid,
  pub image:    BlobRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  pub id:   Uuid,
  /// A single word.
  pub name: String,
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub id:           Uuid,
  pub content:      String,
  pub comment_date: DateTime<Utc>,
  /// In `1..=5`.
  pub grade:        u8,
  pub event_id:     Uuid,
  pub user_id:      Uuid,
}

// ─── Memberships ─────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
  EnumString, EnumIter,
)]
pub enum MembershipStatus {
  #[strum(serialize = "STATUS_ACTIVE")]
  #[serde(rename = "STATUS_ACTIVE")]
  Active,
  #[strum(serialize = "STATUS_INACTIVE")]
  #[serde(rename = "STATUS_INACTIVE")]
  Inactive,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
  EnumString, EnumIter,
)]
pub enum MembershipRole {
  #[strum(serialize = "ROLE_HOST")]
  #[serde(rename = "ROLE_HOST")]
  Host,
  #[strum(serialize = "ROLE_GUEST")]
  #[serde(rename = "ROLE_GUEST")]
  Guest,
}

/// A user's participation in an event. Each event has exactly one
/// [`MembershipRole::Host`] membership once linking is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
  pub id:       Uuid,
  pub status:   MembershipStatus,
  pub role:     MembershipRole,
  pub event_id: Uuid,
  pub user_id:  Uuid,
}
