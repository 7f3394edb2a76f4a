//! Repository Pattern Abstractions
//!
//! The forecasting engine reads price history through [`SeriesRepository`]
//! and never knows whether it came from a CSV dump, a synthetic feed or a
//! live ingestion pipeline.
//!
//! # Consistency
//!
//! `get_series` hands out an `Arc` snapshot. Implementations must never
//! mutate a snapshot after it was handed out (append is copy-on-write), so
//! predictions running in parallel with appends see a point-in-time view.

use crate::domain::errors::Result;
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use std::sync::Arc;

pub trait SeriesRepository: Send + Sync {
    /// Snapshot of the commodity's series, or `UnknownCommodity`.
    fn get_series(&self, commodity: &str) -> Result<Arc<PriceSeries>>;

    /// Appends one observation, creating the series on first use.
    fn append(&self, commodity: &str, point: PricePoint) -> Result<()>;

    /// Replaces the whole series for a commodity.
    fn replace_series(&self, commodity: &str, points: Vec<PricePoint>) -> Result<()>;

    /// Last `n` canonical daily prices.
    fn tail(&self, commodity: &str, n: usize) -> Result<Vec<f64>> {
        Ok(self.get_series(commodity)?.tail(n))
    }

    /// Known commodities, sorted.
    fn commodities(&self) -> Vec<String>;
}
