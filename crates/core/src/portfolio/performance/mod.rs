mod curve_builder;
pub mod performance_model;

pub use curve_builder::{
    build_curve, build_portfolio_curve, CurveInput, PortfolioCurveInput, CURVE_WINDOW,
    MIN_CURVE_POINTS,
};
pub use performance_model::*;
