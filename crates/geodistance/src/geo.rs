use serde::{Deserialize, Serialize};

use crate::{units::DistanceUnit, GeoDistanceError, Result};

/// The (approximate) mean radius of the earth in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.756;

/// The (approximate) mean radius of the earth in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Rejects non-finite values and values outside [-90, 90] latitude or
    /// [-180, 180] longitude.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoDistanceError::InvalidArgument(
                "latitude out of range or missing".to_owned(),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoDistanceError::InvalidArgument(
                "longitude out of range or missing".to_owned(),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Great-circle distance between two points on a sphere of the given radius,
/// using the spherical law of cosines, rounded to 3 decimal places.
///
/// The cosine-law argument is clamped to [-1, 1] before the inverse cosine:
/// for identical or antipodal points floating point error can push it just
/// outside the domain of ACOS.
pub fn distance_on_sphere(from: GeoPoint, to: GeoPoint, sphere_radius: f64) -> f64 {
    let argument = to_radians(from.latitude()).cos()
        * to_radians(to.latitude()).cos()
        * (to_radians(to.longitude()) - to_radians(from.longitude())).cos()
        + to_radians(from.latitude()).sin() * to_radians(to.latitude()).sin();

    round_distance(sphere_radius * argument.clamp(-1.0, 1.0).acos())
}

/// Great-circle distance between two points in the requested unit.
pub fn distance_between(from: GeoPoint, to: GeoPoint, unit: DistanceUnit) -> f64 {
    distance_on_sphere(from, to, unit.earth_radius())
}

pub(crate) fn round_distance(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
