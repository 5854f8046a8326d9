//! Loaders for NAV history and live estimates.

mod estimate;
mod nav_series;

pub use estimate::EstimateLoader;
pub use nav_series::{normalize, NavSeriesLoader};
