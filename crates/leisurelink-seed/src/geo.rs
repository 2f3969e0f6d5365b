//! Scattering event locations around reference cities.

use std::f64::consts::TAU;

use leisurelink_core::{
  Error, Result,
  geo::{GeoPoint, KM_PER_DEGREE},
};
use rand::Rng;

/// Latitudes whose cosine is below this cannot be longitude-corrected.
const MIN_COS_LATITUDE: f64 = 1e-9;

/// Draws random points within a fixed radius of a centre.
///
/// The angle and the distance are each drawn uniformly, so point density is
/// higher near the centre than at the rim. Downstream fixtures depend on this
/// shape; do not switch to an area-uniform draw without checking them.
#[derive(Debug, Clone, Copy)]
pub struct GeoSampler {
  radius_km: f64,
}

impl GeoSampler {
  /// Fails unless the radius is finite and still positive once converted
  /// to degrees; a subnormal radius would leave an empty distance range.
  pub fn new(radius_km: f64) -> Result<Self> {
    let sampler = Self { radius_km };
    if !(radius_km.is_finite() && sampler.radius_degrees() > 0.0) {
      return Err(Error::InvalidRadius(radius_km));
    }
    Ok(sampler)
  }

  pub fn radius_km(&self) -> f64 { self.radius_km }

  /// The radius as an angle, using 1° ≈ 111.32 km.
  pub fn radius_degrees(&self) -> f64 { self.radius_km / KM_PER_DEGREE }

  /// A point at a uniformly random bearing and a uniformly random distance
  /// in `[0, radius)` from `center`. The longitude delta is divided by
  /// `cos(latitude)` so the offset is roughly the same on the ground at any
  /// latitude away from the poles.
  pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, center: GeoPoint) -> Result<GeoPoint> {
    let cos_lat = center.latitude.to_radians().cos();
    if cos_lat.abs() < MIN_COS_LATITUDE {
      return Err(Error::PolarLatitude(center.latitude));
    }

    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen_range(0.0..self.radius_degrees());

    let delta_lat = distance * angle.cos();
    let delta_lon = distance * angle.sin() / cos_lat;

    Ok(GeoPoint::new(
      center.latitude + delta_lat,
      center.longitude + delta_lon,
    ))
  }
}

/// One-shot form of [`GeoSampler::sample`] taking raw coordinates.
pub fn sample_point<R: Rng + ?Sized>(
  rng: &mut R,
  center_lat: f64,
  center_lon: f64,
  radius_km: f64,
) -> Result<(f64, f64)> {
  let p = GeoSampler::new(radius_km)?
    .sample(rng, GeoPoint::new(center_lat, center_lon))?;
  Ok((p.latitude, p.longitude))
}
