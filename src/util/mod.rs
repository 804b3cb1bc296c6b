pub mod time;

pub use time::{current_time_secs, timestamp_secs};
