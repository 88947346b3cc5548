//! Great-circle distance properties

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tour_rewards::{distance, Location};

fn random_point(rng: &mut StdRng) -> Location {
    Location::new(rng.random_range(-90.0..=90.0), rng.random_range(-180.0..=180.0))
}

#[test]
fn distance_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10_000 {
        let (a, b) = (random_point(&mut rng), random_point(&mut rng));
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-9, "{a:?} {b:?}");
    }
}

#[test]
fn distance_to_self_is_zero() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..10_000 {
        let a = random_point(&mut rng);
        assert_eq!(distance(&a, &a), 0.0, "{a:?}");
    }
}

#[test]
fn distance_is_finite_and_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    // half of a great circle
    let max = 180.0 * 60.0 * tour_rewards::domain::geo::STATUTE_MILES_PER_NAUTICAL_MILE;
    for _ in 0..10_000 {
        let d = distance(&random_point(&mut rng), &random_point(&mut rng));
        assert!(d.is_finite() && d >= 0.0 && d <= max + 1e-6, "{d}");
    }
}

#[test]
fn antipodes_are_half_a_circumference_apart() {
    let d = distance(&Location::new(0.0, 0.0), &Location::new(0.0, 180.0));
    assert!((d - 12_428.4).abs() < 1.0, "{d}");
}
