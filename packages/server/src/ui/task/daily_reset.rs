//! Daily automatic reset.
//!
//! The next fire time is an absolute local wall-clock time. After each fire it
//! moves forward in whole days, so the schedule stays pinned to the configured
//! time of day across restarts instead of drifting.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use donation_relay_shared::time::{Clock, format_local_datetime, next_daily_occurrence};
use tokio::task::JoinHandle;

use crate::usecase::ResetDonationsUseCase;

/// 03:00 local time
pub fn default_reset_time() -> NaiveTime {
    NaiveTime::from_hms_opt(3, 0, 0).unwrap_or_default()
}

/// Fires [`ResetDonationsUseCase`] at a fixed local time every day
pub struct DailyResetScheduler {
    reset_donations_usecase: Arc<ResetDonationsUseCase>,
    clock: Arc<dyn Clock>,
    time_of_day: NaiveTime,
}

impl DailyResetScheduler {
    pub fn new(
        reset_donations_usecase: Arc<ResetDonationsUseCase>,
        clock: Arc<dyn Clock>,
        time_of_day: NaiveTime,
    ) -> Self {
        Self {
            reset_donations_usecase,
            clock,
            time_of_day,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until the task is aborted
    pub async fn run(self) {
        let mut next_fire = next_daily_occurrence(self.clock.now_local(), self.time_of_day);

        loop {
            tracing::info!(
                "Next automatic reset at {}",
                format_local_datetime(next_fire)
            );

            let wait = (next_fire - self.clock.now_local())
                .to_std()
                .unwrap_or_default();
            tokio::time::sleep(wait).await;

            tracing::info!("Running scheduled reset");
            self.reset_donations_usecase.execute().await;

            next_fire = advance(next_fire, self.clock.now_local());
        }
    }
}

/// Move `fired` forward one day, and further if still not after `now`
fn advance(fired: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    let mut next = fired + Duration::days(1);
    while next <= now {
        next += Duration::days(1);
    }
    next
}
