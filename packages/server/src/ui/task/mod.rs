//! Background tasks.

pub mod daily_reset;
pub mod status_reporter;

pub use daily_reset::{DailyResetScheduler, default_reset_time};
pub use status_reporter::ChannelStatusReporter;
