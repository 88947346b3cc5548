//! Uniform lat/lon grid over the attraction catalog.
//!
//! Attractions are bucketed by `floor(lat / cell, lon / cell)`. A query scans
//! the buckets that can hold a point within the radius, then filters the
//! candidates by exact great-circle distance.

use crate::domain::error::RewardError;
use crate::domain::geo::distance;
use crate::domain::model::{Attraction, AttractionId, Location};
use dashmap::DashMap;
use std::collections::HashMap;

/// Approximate miles per degree used to size the scan window
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Beyond this many cells per side the window is treated as unbounded
const MAX_REACH_CELLS: f64 = 1e12;

type CellKey = (i64, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DistanceKey {
    lat_bits: u64,
    lon_bits: u64,
    attraction: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Window {
    Cells { lat: u64, lon: u64 },
    /// Longitude is unconstrained (near a pole or across the antimeridian)
    LatitudeBand { lat: u64 },
    Everything,
}

impl Window {
    fn contains(self, center: CellKey, key: CellKey) -> bool {
        match self {
            Window::Cells { lat, lon } => {
                key.0.abs_diff(center.0) <= lat && key.1.abs_diff(center.1) <= lon
            }
            Window::LatitudeBand { lat } => key.0.abs_diff(center.0) <= lat,
            Window::Everything => true,
        }
    }
}

pub struct SpatialIndex {
    cell_size: f64,
    attractions: Vec<Attraction>,
    by_id: HashMap<AttractionId, usize>,
    cells: HashMap<CellKey, Vec<usize>>,
    distances: Option<DashMap<DistanceKey, f64>>,
}

impl SpatialIndex {
    pub fn build(attractions: Vec<Attraction>, cell_size: f64) -> Result<Self, RewardError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RewardError::Config(format!(
                "cell size must be a positive number of degrees, got {}",
                cell_size
            )));
        }

        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(attractions.len());
        for (idx, attraction) in attractions.iter().enumerate() {
            by_id.insert(attraction.attraction_id, idx);
            cells
                .entry(cell_of(&attraction.location, cell_size))
                .or_default()
                .push(idx);
        }

        tracing::debug!(
            attractions = attractions.len(),
            cells = cells.len(),
            cell_size,
            "built spatial index"
        );

        Ok(Self {
            cell_size,
            attractions,
            by_id,
            cells,
            distances: None,
        })
    }

    /// Memoize exact distances per (visited point, attraction)
    pub fn with_distance_cache(mut self, enabled: bool) -> Self {
        self.distances = enabled.then(DashMap::new);
        self
    }

    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    pub fn attraction(&self, id: &AttractionId) -> Option<&Attraction> {
        self.by_id.get(id).map(|&idx| &self.attractions[idx])
    }

    pub fn len(&self) -> usize {
        self.attractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cached_distances(&self) -> usize {
        self.distances.as_ref().map_or(0, DashMap::len)
    }

    /// Attractions within `radius_miles` of `point`
    pub fn nearby(&self, point: &Location, radius_miles: f64) -> Vec<&Attraction> {
        self.candidates(point, radius_miles)
            .into_iter()
            .filter(|&idx| self.distance_to(point, idx) <= radius_miles)
            .map(|idx| &self.attractions[idx])
            .collect()
    }

    /// The `limit` closest attractions with their distances, nearest first.
    ///
    /// Ranks the whole catalog without touching the distance memo.
    pub fn nearest(&self, point: &Location, limit: usize) -> Vec<(&Attraction, f64)> {
        let mut ranked: Vec<(&Attraction, f64)> = self
            .attractions
            .iter()
            .map(|a| (a, distance(point, &a.location)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(limit);
        ranked
    }

    fn distance_to(&self, point: &Location, idx: usize) -> f64 {
        let Some(cache) = &self.distances else {
            return distance(point, &self.attractions[idx].location);
        };

        let key = DistanceKey {
            lat_bits: point.latitude.to_bits(),
            lon_bits: point.longitude.to_bits(),
            attraction: idx,
        };
        if let Some(d) = cache.get(&key) {
            return *d;
        }
        let d = distance(point, &self.attractions[idx].location);
        cache.insert(key, d);
        d
    }

    fn candidates(&self, point: &Location, radius_miles: f64) -> Vec<usize> {
        let center = cell_of(point, self.cell_size);
        let window = self.window(point, radius_miles);

        if let Window::Cells { lat, lon } = window {
            let scanned = (2 * u128::from(lat) + 1) * (2 * u128::from(lon) + 1);
            if scanned <= self.cells.len() as u128 {
                let (lat, lon) = (lat as i64, lon as i64);
                let mut out = Vec::new();
                for dlat in -lat..=lat {
                    for dlon in -lon..=lon {
                        let key = (center.0.saturating_add(dlat), center.1.saturating_add(dlon));
                        if let Some(bucket) = self.cells.get(&key) {
                            out.extend_from_slice(bucket);
                        }
                    }
                }
                return out;
            }
        }

        // window wider than the occupied grid: walk the buckets instead
        self.cells
            .iter()
            .filter(|(key, _)| window.contains(center, **key))
            .flat_map(|(_, bucket)| bucket.iter().copied())
            .collect()
    }

    /// Cells to scan on each side of the query cell.
    ///
    /// Latitude reach is `ceil(radius / (cell * 69))`. Longitude reach is
    /// widened by `1 / cos(lat)` at the most poleward latitude the radius
    /// can touch, so results match a linear scan away from the equator too.
    fn window(&self, point: &Location, radius_miles: f64) -> Window {
        let degrees = radius_miles / MILES_PER_DEGREE;
        let lat_cells = (degrees / self.cell_size).ceil();
        if !lat_cells.is_finite() || lat_cells > MAX_REACH_CELLS {
            return Window::Everything;
        }
        let lat = lat_cells as u64;

        let poleward = (point.latitude.abs() + degrees).min(90.0);
        let cos = poleward.to_radians().cos();
        if cos <= f64::EPSILON {
            return Window::LatitudeBand { lat };
        }
        let lon_degrees = degrees / cos;
        if lon_degrees >= 180.0
            || point.longitude - lon_degrees < -180.0
            || point.longitude + lon_degrees >= 180.0
        {
            return Window::LatitudeBand { lat };
        }

        let lon_cells = (lon_degrees / self.cell_size).ceil();
        if lon_cells > MAX_REACH_CELLS {
            return Window::LatitudeBand { lat };
        }
        Window::Cells {
            lat,
            lon: lon_cells as u64,
        }
    }
}

fn cell_of(location: &Location, cell_size: f64) -> CellKey {
    (
        (location.latitude / cell_size).floor() as i64,
        (location.longitude / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attraction(name: &str, lat: f64, lon: f64) -> Attraction {
        Attraction::new(name, "", "", Location::new(lat, lon))
    }

    fn names(found: Vec<&Attraction>) -> Vec<String> {
        let mut names: Vec<String> = found.iter().map(|a| a.attraction_name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn buckets_by_floored_cell() {
        let index = SpatialIndex::build(
            vec![
                attraction("a", 0.001, 0.001),
                attraction("b", 0.009, 0.002),
                attraction("c", -0.001, 0.001),
            ],
            0.01,
        )
        .unwrap();

        // a and b share (0, 0); c floors to (-1, 0)
        assert_eq!(index.cell_count(), 2);
    }

    #[test]
    fn empty_catalog_returns_nothing() {
        let index = SpatialIndex::build(Vec::new(), 0.01).unwrap();
        assert!(index.is_empty());
        assert!(index.nearby(&Location::new(10.0, 10.0), 1_000.0).is_empty());
        assert!(index.nearby(&Location::new(10.0, 10.0), f64::INFINITY).is_empty());
    }

    #[test]
    fn filters_by_exact_distance() {
        let index = SpatialIndex::build(
            vec![attraction("near", 0.0, 0.0), attraction("far", 0.0, 5.0)],
            0.01,
        )
        .unwrap();

        let found = index.nearby(&Location::new(0.0, 0.001), 10.0);
        assert_eq!(names(found), vec!["near"]);
    }

    #[test]
    fn unbounded_radius_returns_whole_catalog() {
        let index = SpatialIndex::build(
            vec![
                attraction("a", 0.0, 0.0),
                attraction("b", 60.0, 170.0),
                attraction("c", -80.0, -179.5),
            ],
            0.01,
        )
        .unwrap();

        let found = index.nearby(&Location::new(0.0, 0.0), f64::INFINITY);
        assert_eq!(names(found), vec!["a", "b", "c"]);
    }

    #[test]
    fn finds_neighbours_across_antimeridian() {
        let index = SpatialIndex::build(
            vec![attraction("east", 10.0, 179.99), attraction("west", 10.0, -179.99)],
            0.01,
        )
        .unwrap();

        let found = index.nearby(&Location::new(10.0, 179.995), 5.0);
        assert_eq!(names(found), vec!["east", "west"]);
    }

    #[test]
    fn widens_longitude_at_high_latitude() {
        // at 70°N one degree of longitude is ~23.6 miles
        let index =
            SpatialIndex::build(vec![attraction("north", 70.0, 1.0)], 0.01).unwrap();

        let found = index.nearby(&Location::new(70.0, 0.0), 30.0);
        assert_eq!(names(found), vec!["north"]);
    }

    #[test]
    fn distance_cache_memoizes_pairs() {
        let index = SpatialIndex::build(vec![attraction("a", 0.0, 0.0)], 0.01)
            .unwrap()
            .with_distance_cache(true);
        let point = Location::new(0.0, 0.001);

        index.nearby(&point, 10.0);
        index.nearby(&point, 20.0);
        assert_eq!(index.cached_distances(), 1);
    }

    #[test]
    fn nearest_orders_by_distance() {
        let index = SpatialIndex::build(
            vec![
                attraction("far", 0.0, 3.0),
                attraction("near", 0.0, 1.0),
                attraction("mid", 0.0, 2.0),
            ],
            0.01,
        )
        .unwrap();

        let ranked = index.nearest(&Location::new(0.0, 0.0), 2);
        let ranked: Vec<&str> = ranked.iter().map(|(a, _)| a.attraction_name.as_str()).collect();
        assert_eq!(ranked, vec!["near", "mid"]);
    }

    #[test]
    fn nearest_leaves_distance_cache_alone() {
        let index = SpatialIndex::build(
            vec![attraction("a", 0.0, 0.0), attraction("b", 1.0, 1.0)],
            0.01,
        )
        .unwrap()
        .with_distance_cache(true);

        index.nearby(&Location::new(0.0, 0.001), 10.0);
        let before = index.cached_distances();
        for i in 0..20 {
            let ranked = index.nearest(&Location::new(f64::from(i), 0.5), 2);
            assert_eq!(ranked.len(), 2);
        }
        assert_eq!(index.cached_distances(), before);
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        assert!(SpatialIndex::build(Vec::new(), 0.0).is_err());
        assert!(SpatialIndex::build(Vec::new(), f64::NAN).is_err());
    }
}
