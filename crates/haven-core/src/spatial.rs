//! Spatial math for zone distance calculations.

use crate::models::Coordinates;

/// Mean Earth radius in meters, used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance in meters between two [`Coordinates`].
pub fn distance_m(a: Coordinates, b: Coordinates) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon)
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lat(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert an east/west offset in meters to degrees longitude.
/// Requires the reference latitude for proper scaling.
pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lon(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(40.7128, -74.0060, 40.7128, -74.0060);
        assert!(dist < 0.001);
    }

    #[test]
    fn test_haversine_symmetric() {
        let pairs = [
            (40.7128, -74.0060, 34.0522, -118.2437),
            (0.0, 0.0, -33.8688, 151.2093),
            (89.9, 10.0, -89.9, -170.0),
        ];
        for (lat1, lon1, lat2, lon2) in pairs {
            let forward = haversine_distance(lat1, lon1, lat2, lon2);
            let reverse = haversine_distance(lat2, lon2, lat1, lon1);
            assert!((forward - reverse).abs() < 1e-9);
        }
    }

    #[test]
    fn test_haversine_out_of_range_is_finite() {
        // Degraded but defined: bogus degrees still produce a number.
        let dist = haversine_distance(400.0, -500.0, -250.0, 999.0);
        assert!(dist.is_finite());
        assert!(dist >= 0.0);
    }

    #[test]
    fn test_meters_to_lat_round_trip() {
        let lat = 40.0;
        let deg = meters_to_lat(1000.0, lat);
        let dist = haversine_distance(lat, 0.0, lat + deg, 0.0);
        assert!((dist - 1000.0).abs() < 2.0, "got {dist}");
    }

    #[test]
    fn test_meters_to_lon_round_trip() {
        let lat = 40.0;
        let deg = meters_to_lon(1000.0, lat);
        let dist = haversine_distance(lat, 0.0, lat, deg);
        assert!((dist - 1000.0).abs() < 2.0, "got {dist}");
    }
}
