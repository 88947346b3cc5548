//! Grid lookups must agree with a linear scan

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tour_rewards::domain::model::AttractionId;
use tour_rewards::{distance, Attraction, Location, SpatialIndex};

fn random_catalog(
    rng: &mut StdRng,
    size: usize,
    lat: (f64, f64),
    lon: (f64, f64),
) -> Vec<Attraction> {
    (0..size)
        .map(|i| {
            let location = Location::new(
                rng.random_range(lat.0..lat.1),
                rng.random_range(lon.0..lon.1),
            );
            Attraction::new(format!("poi-{i}"), "", "", location)
        })
        .collect()
}

fn linear_scan(catalog: &[Attraction], point: &Location, radius: f64) -> HashSet<AttractionId> {
    catalog
        .iter()
        .filter(|a| distance(point, &a.location) <= radius)
        .map(|a| a.attraction_id)
        .collect()
}

fn grid_scan(index: &SpatialIndex, point: &Location, radius: f64) -> HashSet<AttractionId> {
    index
        .nearby(point, radius)
        .into_iter()
        .map(|a| a.attraction_id)
        .collect()
}

#[test]
fn matches_linear_scan_in_a_dense_region() {
    let mut rng = StdRng::seed_from_u64(7);
    let catalog = random_catalog(&mut rng, 2_000, (33.0, 35.0), (-119.0, -117.0));
    let index = SpatialIndex::build(catalog.clone(), 0.01).unwrap();

    for _ in 0..200 {
        let point = Location::new(rng.random_range(32.5..35.5), rng.random_range(-119.5..-116.5));
        let radius = rng.random_range(0.0..25.0);
        assert_eq!(
            grid_scan(&index, &point, radius),
            linear_scan(&catalog, &point, radius),
            "mismatch at {point:?} r={radius}"
        );
    }
}

#[test]
fn matches_linear_scan_worldwide() {
    let mut rng = StdRng::seed_from_u64(42);
    let catalog = random_catalog(&mut rng, 1_000, (-89.0, 89.0), (-180.0, 180.0));

    for cell_size in [0.01, 0.5, 3.0] {
        let index = SpatialIndex::build(catalog.clone(), cell_size).unwrap();
        for _ in 0..100 {
            let point = Location::new(
                rng.random_range(-89.0..89.0),
                rng.random_range(-180.0..180.0),
            );
            let radius = rng.random_range(0.0..1_500.0);
            assert_eq!(
                grid_scan(&index, &point, radius),
                linear_scan(&catalog, &point, radius),
                "mismatch at {point:?} r={radius} cell={cell_size}"
            );
        }
    }
}

#[test]
fn radius_beyond_catalog_span_returns_everything() {
    let mut rng = StdRng::seed_from_u64(3);
    let catalog = random_catalog(&mut rng, 300, (-60.0, 60.0), (-170.0, 170.0));
    let index = SpatialIndex::build(catalog.clone(), 0.01).unwrap();
    let everything: HashSet<_> = catalog.iter().map(|a| a.attraction_id).collect();

    // half the circumference covers the whole globe
    assert_eq!(grid_scan(&index, &Location::new(0.0, 0.0), 13_000.0), everything);
    assert_eq!(grid_scan(&index, &Location::new(12.0, 50.0), f64::MAX), everything);
    assert_eq!(grid_scan(&index, &Location::new(-5.0, 5.0), f64::INFINITY), everything);
}

#[test]
fn distance_cache_does_not_change_results() {
    let mut rng = StdRng::seed_from_u64(11);
    let catalog = random_catalog(&mut rng, 500, (40.0, 41.0), (-75.0, -73.0));
    let plain = SpatialIndex::build(catalog.clone(), 0.01).unwrap();
    let cached = SpatialIndex::build(catalog, 0.01).unwrap().with_distance_cache(true);
    let point = Location::new(40.5, -74.0);

    for radius in [1.0, 5.0, 10.0, 5.0, 1.0] {
        assert_eq!(grid_scan(&plain, &point, radius), grid_scan(&cached, &point, radius));
    }
    assert!(cached.cached_distances() > 0);
    assert_eq!(plain.cached_distances(), 0);
}
