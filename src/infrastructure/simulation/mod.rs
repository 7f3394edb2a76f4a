pub mod indicators;
pub mod synthetic_feed;

pub use indicators::{NeutralIndicators, RandomIndicators};
pub use synthetic_feed::{CommodityProfile, SyntheticFeed, kerala_profiles};
