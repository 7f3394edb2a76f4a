// Market data domain
pub mod price_series;
pub mod seasonal_calendar;

pub use price_series::{DailyPrice, PricePoint, PriceSeries};
pub use seasonal_calendar::{DemandRegime, SeasonBuckets, SeasonalCalendar};
