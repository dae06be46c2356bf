pub mod bar;
pub mod loader;
pub mod period;

pub use bar::{close_prices, Bar, BarError};
pub use loader::{filter_by_symbol, load_csv, parse_timestamp};
pub use period::HistoryPeriod;
