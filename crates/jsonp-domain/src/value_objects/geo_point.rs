//! Geographic coordinate value object

use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG), kilometres
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, degrees north
    pub lat: f64,
    /// Longitude, degrees east
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from degrees
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometres (haversine, spherical
    /// Earth).
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_MEAN_RADIUS_KM * c
    }

    /// Arithmetic mean of `points`, `None` when empty
    #[must_use]
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<GeoPoint> {
        let (count, lat, lon) = points
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lat, lon), p| {
                (n + 1, lat + p.lat, lon + p.lon)
            });

        (count > 0).then(|| GeoPoint::new(lat / count as f64, lon / count as f64))
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(45.0, 7.0);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        // 2 * pi * R / 360
        assert!((a.distance_km(&b) - 111.195).abs() < 0.01);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let rome = GeoPoint::new(41.9028, 12.4964);
        let athens = GeoPoint::new(37.9838, 23.7275);
        let there = rome.distance_km(&athens);
        let back = athens.distance_km(&rome);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 1052.0).abs() < 10.0);
    }

    #[test]
    fn test_centroid() {
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(3.0, 6.0),
            GeoPoint::new(6.0, 3.0),
        ];
        assert_eq!(GeoPoint::centroid(&points), Some(GeoPoint::new(3.0, 3.0)));
        assert_eq!(GeoPoint::centroid(&[]), None);
    }
}
