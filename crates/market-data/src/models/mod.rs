//! Market data models
//!
//! - `types` - Provider identifiers and data kinds
//! - `instrument` - Venue of a bare instrument code
//! - `quote` - Raw and validated exchange quotes
//! - `nav` - NAV points, series and the loaded NAV bundle
//! - `estimate` - Raw and validated live estimates

mod estimate;
mod instrument;
mod nav;
mod quote;
mod types;

pub use estimate::{EstimateSnapshot, RawEstimate};
pub use instrument::Venue;
pub use nav::{NavData, NavPoint, NavSeries, RawNavPoint, RawNavTrend};
pub use quote::{Quote, RawQuote};
pub use types::{DataKind, ProviderId};
