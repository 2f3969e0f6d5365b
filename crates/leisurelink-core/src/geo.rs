//! Geographic points and the fixed table of reference cities.
//!
//! Points are stored as WGS84 (SRID 4326) longitude/latitude pairs. The text
//! form follows WKT, which puts longitude first: `POINT(lon lat)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Spatial reference identifier for WGS84.
pub const SRID_WGS84: u32 = 4326;

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.32;

// ─── GeoPoint ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub latitude:  f64,
  pub longitude: f64,
}

impl GeoPoint {
  pub const fn new(latitude: f64, longitude: f64) -> Self {
    Self { latitude, longitude }
  }

  /// WKT literal, e.g. `POINT(21.0122 52.2297)`.
  pub fn to_wkt(&self) -> String {
    format!("POINT({} {})", self.longitude, self.latitude)
  }

  /// Extended WKT carrying the spatial reference, e.g.
  /// `SRID=4326;POINT(21.0122 52.2297)`.
  pub fn to_ewkt(&self) -> String {
    format!("SRID={SRID_WGS84};{}", self.to_wkt())
  }

  /// Parse either a plain `POINT(lon lat)` or its `SRID=…;` prefixed form.
  pub fn parse_wkt(s: &str) -> Result<Self> {
    let malformed = || Error::MalformedPoint(s.to_owned());

    let body = match s.split_once(';') {
      Some((srid, rest)) if srid.trim_start().starts_with("SRID=") => rest,
      Some(_) => return Err(malformed()),
      None => s,
    };

    let coords = body
      .trim()
      .strip_prefix("POINT")
      .map(str::trim_start)
      .and_then(|r| r.strip_prefix('('))
      .and_then(|r| r.strip_suffix(')'))
      .ok_or_else(malformed)?;

    let mut parts = coords.split_whitespace();
    let lon = parts.next().and_then(|p| p.parse::<f64>().ok());
    let lat = parts.next().and_then(|p| p.parse::<f64>().ok());
    match (lon, lat, parts.next()) {
      (Some(longitude), Some(latitude), None) => {
        Ok(Self { latitude, longitude })
      }
      _ => Err(malformed()),
    }
  }

  /// Planar offset from `other`, in degrees, with the longitude component
  /// scaled back by `cos(latitude)` of `other`. This is the inverse of the
  /// displacement applied when scattering points around a city.
  pub fn planar_offset_degrees(&self, other: &GeoPoint) -> f64 {
    let d_lat = self.latitude - other.latitude;
    let d_lon =
      (self.longitude - other.longitude) * other.latitude.to_radians().cos();
    d_lat.hypot(d_lon)
  }
}

impl fmt::Display for GeoPoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_wkt())
  }
}

// ─── Reference cities ────────────────────────────────────────────────────────

/// A named city that events are scattered around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
  pub name:   &'static str,
  pub center: GeoPoint,
}

/// The twelve Polish cities events are placed near.
pub const POLISH_CITIES: [City; 12] = [
  City { name: "Warsaw",    center: GeoPoint::new(52.2297, 21.0122) },
  City { name: "Krakow",    center: GeoPoint::new(50.0647, 19.9450) },
  City { name: "Lodz",      center: GeoPoint::new(51.7592, 19.4560) },
  City { name: "Wroclaw",   center: GeoPoint::new(51.1079, 17.0385) },
  City { name: "Poznan",    center: GeoPoint::new(52.4064, 16.9252) },
  City { name: "Gdansk",    center: GeoPoint::new(54.3520, 18.6466) },
  City { name: "Szczecin",  center: GeoPoint::new(53.4285, 14.5528) },
  City { name: "Bydgoszcz", center: GeoPoint::new(53.1235, 18.0084) },
  City { name: "Lublin",    center: GeoPoint::new(51.2465, 22.5684) },
  City { name: "Katowice",  center: GeoPoint::new(50.2709, 19.0390) },
  City { name: "Bialystok", center: GeoPoint::new(53.1325, 23.1688) },
  City { name: "Gdynia",    center: GeoPoint::new(54.5189, 18.5305) },
];
