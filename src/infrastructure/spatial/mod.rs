pub mod grid;

// Re-export for convenience
pub use grid::{SpatialIndex, MILES_PER_DEGREE};
