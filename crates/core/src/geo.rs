//! Great-circle distance used to rank pending alerts for a responder.

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinate pairs, in kilometres,
/// via the haversine formula.
///
/// Always non-negative, zero for identical points, and symmetric in its
/// two coordinate pairs. Inputs outside valid latitude/longitude ranges
/// are accepted uncorrected; range validation is the caller's job.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_have_zero_distance() {
        assert_eq!(distance_km(33.6844, 73.0479, 33.6844, 73.0479), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let d1 = distance_km(33.6844, 73.0479, 24.8607, 67.0011);
        let d2 = distance_km(24.8607, 67.0011, 33.6844, 73.0479);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn quarter_circumference_along_equator() {
        // 90 degrees of longitude at the equator is a quarter of the
        // mean circumference: ~10007.5 km.
        let d = distance_km(0.0, 0.0, 0.0, 90.0);
        assert!((d - 10007.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn known_city_pair_is_plausible() {
        // Islamabad to Karachi is roughly 1100 km as the crow flies.
        let d = distance_km(33.6844, 73.0479, 24.8607, 67.0011);
        assert!((1000.0..1200.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_non_negative() {
        assert!(distance_km(-45.0, -170.0, 60.0, 150.0) >= 0.0);
    }
}
