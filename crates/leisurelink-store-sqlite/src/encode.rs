//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so they compare correctly as text. Dates are
//! `YYYY-MM-DD`. Points are EWKT. UUIDs are hyphenated lowercase strings.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use leisurelink_core::{
  entity::{
    AppRole, BlobRef, Event, Membership, MembershipRole, MembershipStatus,
    User, UserDetails,
  },
  geo::GeoPoint,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── GeoPoint ─────────────────────────────────────────────────────────────────

pub fn encode_point(p: &GeoPoint) -> String { p.to_ewkt() }

pub fn decode_point(s: &str) -> Result<GeoPoint> { Ok(GeoPoint::parse_wkt(s)?) }

// ─── Membership enums ─────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<MembershipStatus> {
  MembershipStatus::from_str(s).map_err(|_| Error::Decode {
    column: "members.status",
    value:  s.to_owned(),
  })
}

pub fn decode_role(s: &str) -> Result<MembershipRole> {
  MembershipRole::from_str(s).map_err(|_| Error::Decode {
    column: "members.type",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:              String,
  pub app_user_roles:  i64,
  pub is_activated:    bool,
  pub email:           String,
  pub password:        String,
  pub user_details_id: Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    let role = AppRole::from_bits(self.app_user_roles).ok_or_else(|| {
      Error::Decode {
        column: "users.app_user_roles",
        value:  self.app_user_roles.to_string(),
      }
    })?;

    Ok(User {
      id: decode_uuid(&self.id)?,
      email: self.email,
      password_hash: self.password,
      is_activated: self.is_activated,
      role,
      user_details_id: self
        .user_details_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
    })
  }
}

/// Raw values read directly from a `user_details` row.
pub struct RawUserDetails {
  pub id:           String,
  pub user_id:      String,
  pub name:         String,
  pub last_name:    String,
  pub address:      String,
  pub birth_date:   String,
  pub phone_number: String,
  pub photo:        Option<i64>,
}

impl RawUserDetails {
  pub fn into_user_details(self) -> Result<UserDetails> {
    Ok(UserDetails {
      id:           decode_uuid(&self.id)?,
      user_id:      decode_uuid(&self.user_id)?,
      name:         self.name,
      last_name:    self.last_name,
      address:      self.address,
      birth_date:   decode_date(&self.birth_date)?,
      phone_number: self.phone_number,
      photo:        self.photo.map(BlobRef),
    })
  }
}

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub id:          String,
  pub name:        String,
  pub description: String,
  pub address:     String,
  pub start_date:  String,
  pub end_date:    String,
  pub location:    String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      description: self.description,
      address:     self.address,
      start_date:  decode_dt(&self.start_date)?,
      end_date:    decode_dt(&self.end_date)?,
      location:    decode_point(&self.location)?,
    })
  }
}

/// Raw strings read directly from a `members` row.
pub struct RawMembership {
  pub id:       String,
  pub status:   String,
  pub role:     String,
  pub event_id: String,
  pub user_id:  String,
}

impl RawMembership {
  pub fn into_membership(self) -> Result<Membership> {
    Ok(Membership {
      id:       decode_uuid(&self.id)?,
      status:   decode_status(&self.status)?,
      role:     decode_role(&self.role)?,
      event_id: decode_uuid(&self.event_id)?,
      user_id:  decode_uuid(&self.user_id)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let a = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let b = a + chrono::Duration::milliseconds(1);
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn dates_are_plain_iso() {
    let d = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
    assert_eq!(encode_date(d), "1990-04-12");
    assert_eq!(decode_date("1990-04-12").unwrap(), d);
    assert!(matches!(decode_date("12/04/1990"), Err(Error::DateParse(_))));
  }

  #[test]
  fn unknown_member_type_is_a_decode_error() {
    let err = decode_role("ROLE_OWNER").unwrap_err();
    assert!(matches!(err, Error::Decode { column: "members.type", .. }));
  }
}
