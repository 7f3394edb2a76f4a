pub mod csv_feed;

pub use csv_feed::{load_price_csv, read_price_csv};
