//! Great-circle distance in statute miles.

use crate::domain::model::Location;

pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Nautical miles per degree of arc
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Distance between two points in statute miles.
///
/// Haversine central angle, converted through nautical miles. Symmetric and
/// exactly zero for identical points.
pub fn distance(a: &Location, b: &Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = b.longitude.to_radians() - a.longitude.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let angle = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero() {
        let p = Location::new(33.817_595, -117.922_008);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Location::new(44.96, -93.27);
        let b = Location::new(-33.86, 151.21);
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(&Location::new(0.0, 0.0), &Location::new(1.0, 0.0));
        // 60 nautical miles
        assert!((d - 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn minneapolis_to_st_paul() {
        let d = distance(&Location::new(44.96, -93.27), &Location::new(44.94, -93.09));
        assert!((d - 9.0).abs() < 1.0, "expected ~9 miles, got {d}");
    }

    #[test]
    fn small_offset_near_equator() {
        let d = distance(&Location::new(0.0, 0.0), &Location::new(0.0, 0.001));
        assert!((d - 0.069).abs() < 0.001, "got {d}");
    }
}
