//! Data source clients.
//!
//! This module contains:
//! - One trait per data kind ([`QuoteProvider`], [`NavTrendProvider`], [`EstimateProvider`])
//! - Shared HTTP plumbing
//! - Concrete clients, each specialized to a single endpoint
//!
//! Clients parse and validate; they never retry, fall back, or cache.

pub(crate) mod http;
mod traits;

pub mod eastmoney;
pub mod fundgz;
pub mod pingzhong;
pub mod sina;

pub use traits::{EstimateProvider, NavTrendProvider, QuoteProvider};
