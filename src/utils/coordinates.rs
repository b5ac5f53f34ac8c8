//! Conversions between geodetic coordinates and the planet-centred
//! Cartesian frame the integrator works in.
//!
//! The planet is treated as a sphere of radius [`PLANET_RADIUS`]. Angles are
//! degrees at the public boundary and radians internally.

use serde::{Deserialize, Serialize};

use crate::constants::PLANET_RADIUS;
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    pub altitude: f64,  // meters above the sphere
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        GeodeticPosition {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn to_cartesian(&self) -> Vector3D {
        to_cartesian(self.latitude, self.longitude, self.altitude)
    }
}

pub fn to_cartesian(latitude: f64, longitude: f64, altitude: f64) -> Vector3D {
    let lat_rad = latitude.to_radians();
    let lon_rad = longitude.to_radians();
    let r = PLANET_RADIUS + altitude;

    Vector3D::new(
        r * lat_rad.cos() * lon_rad.cos(),
        r * lat_rad.cos() * lon_rad.sin(),
        r * lat_rad.sin(),
    )
}

/// Inverse of [`to_cartesian`].
///
/// Latitude uses `atan2(z, hypot(x, y))`, which equals `asin(z / r)` but keeps
/// full precision near the poles. The origin has no defined direction; it
/// maps to latitude and longitude 0 at depth `-PLANET_RADIUS`.
pub fn to_geodetic(position: &Vector3D) -> GeodeticPosition {
    let r = position.magnitude();
    if r == 0.0 {
        return GeodeticPosition::new(0.0, 0.0, -PLANET_RADIUS);
    }

    let horizontal = position.x.hypot(position.y);
    let lat_rad = position.z.atan2(horizontal);
    let lon_rad = position.y.atan2(position.x);

    GeodeticPosition {
        latitude: lat_rad.to_degrees(),
        longitude: lon_rad.to_degrees(),
        altitude: r - PLANET_RADIUS,
    }
}

/// Unit vector pointing away from the planet centre through `position`.
pub fn local_up(position: &Vector3D) -> Vector3D {
    position.normalize()
}

/// Rotates a local east/north/up vector at the given site into the Cartesian frame.
pub fn local_to_cartesian(latitude: f64, longitude: f64, east: f64, north: f64, up: f64) -> Vector3D {
    let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();

    let east_axis = Vector3D::new(-sin_lon, cos_lon, 0.0);
    let north_axis = Vector3D::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up_axis = Vector3D::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    east_axis * east + north_axis * north + up_axis * up
}

/// Great-circle distance over the sphere surface between two geodetic points, in meters.
pub fn surface_distance(from: &GeodeticPosition, to: &GeodeticPosition) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * PLANET_RADIUS * a.sqrt().min(1.0).asin()
}
