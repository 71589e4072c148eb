//! Relative-position geodesy for traffic and airport display.
//!
//! Provides bearing and distance between two latitude/longitude pairs using
//! a flat-earth-corrected projection. This is not a true great-circle
//! solution, but at the regional scale the traffic display operates in
//! (well under 200 NM) the error is negligible and the math is cheap enough
//! to run on every inbound traffic message.

/// Mean Earth radius in meters (IUGG value).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Conversion factor: meters to nautical miles.
const METERS_TO_NM: f64 = 0.000_539_957;

/// Bearing and distance from one point to another.
///
/// Returns `(bearing_deg, distance_nm)` where the bearing is normalized to
/// [0, 360) with 0 = North, 90 = East.
///
/// Latitude deltas map directly to northward distance; longitude deltas are
/// scaled by the cosine of the mean latitude before mapping to eastward
/// distance. The two are combined with a Euclidean norm.
pub fn bearing_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let mean_lat = ((lat1 + lat2) / 2.0).to_radians();

    let north_m = dlat * EARTH_RADIUS_M;
    let east_m = dlon * mean_lat.cos() * EARTH_RADIUS_M;

    let distance_nm = north_m.hypot(east_m) * METERS_TO_NM;
    let bearing = normalize_degrees(east_m.atan2(north_m).to_degrees());

    (bearing, distance_nm)
}

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_has_zero_distance() {
        let (_, distance) = bearing_distance(53.5, 10.0, 53.5, 10.0);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_bearing_due_north() {
        let (bearing, _) = bearing_distance(53.0, 10.0, 53.1, 10.0);
        assert!(bearing.abs() < 0.1, "Expected ~0°, got {}°", bearing);
    }

    #[test]
    fn test_bearing_due_east() {
        let (bearing, _) = bearing_distance(0.0, 10.0, 0.0, 10.1);
        assert!((bearing - 90.0).abs() < 0.1, "Expected ~90°, got {}°", bearing);
    }

    #[test]
    fn test_bearing_due_south() {
        let (bearing, _) = bearing_distance(53.1, 10.0, 53.0, 10.0);
        assert!((bearing - 180.0).abs() < 0.1, "Expected ~180°, got {}°", bearing);
    }

    #[test]
    fn test_bearing_due_west() {
        let (bearing, _) = bearing_distance(0.0, 10.1, 0.0, 10.0);
        assert!((bearing - 270.0).abs() < 0.1, "Expected ~270°, got {}°", bearing);
    }

    #[test]
    fn test_one_degree_of_latitude_is_sixty_nm() {
        // One degree of latitude is 60 NM by definition of the nautical mile,
        // within the tolerance of the IUGG radius.
        let (_, distance) = bearing_distance(45.0, 10.0, 46.0, 10.0);
        assert!(
            (distance - 60.0).abs() < 0.2,
            "Expected ~60 NM, got {} NM",
            distance
        );
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        // A degree of longitude at 60°N spans half the distance it does at
        // the equator (cos 60° = 0.5).
        let (_, at_equator) = bearing_distance(0.0, 10.0, 0.0, 11.0);
        let (_, at_sixty) = bearing_distance(60.0, 10.0, 60.0, 11.0);
        assert!(
            (at_sixty / at_equator - 0.5).abs() < 0.01,
            "Expected ratio ~0.5, got {}",
            at_sixty / at_equator
        );
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(90.0), 90.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(-720.0), 0.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bearing_always_in_range(
                lat1 in -80.0..80.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let (bearing, _) = bearing_distance(lat1, lon1, lat2, lon2);
                prop_assert!(
                    (0.0..360.0).contains(&bearing),
                    "Bearing {} out of [0, 360)",
                    bearing
                );
            }

            #[test]
            fn test_distance_never_negative(
                lat1 in -80.0..80.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let (_, distance) = bearing_distance(lat1, lon1, lat2, lon2);
                prop_assert!(distance >= 0.0);
            }

            #[test]
            fn test_identity_distance_is_zero(
                lat in -80.0..80.0_f64,
                lon in -180.0..180.0_f64
            ) {
                let (_, distance) = bearing_distance(lat, lon, lat, lon);
                prop_assert_eq!(distance, 0.0);
            }

            #[test]
            fn test_reverse_distance_symmetric(
                lat1 in -60.0..60.0_f64,
                lon1 in -170.0..170.0_f64,
                lat2 in -60.0..60.0_f64,
                lon2 in -170.0..170.0_f64
            ) {
                let (_, forward) = bearing_distance(lat1, lon1, lat2, lon2);
                let (_, back) = bearing_distance(lat2, lon2, lat1, lon1);
                prop_assert!(
                    (forward - back).abs() < 1e-9,
                    "Distance not symmetric: {} vs {}",
                    forward, back
                );
            }

            #[test]
            fn test_normalize_in_range(degrees in -10_000.0..10_000.0_f64) {
                let normalized = normalize_degrees(degrees);
                prop_assert!((0.0..360.0).contains(&normalized));
            }
        }
    }
}
