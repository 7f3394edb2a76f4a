pub mod clock;
pub mod feed;
pub mod persistence;
pub mod repositories;
pub mod simulation;

pub use clock::{FixedClock, SystemClock};
pub use repositories::InMemorySeriesRepository;
