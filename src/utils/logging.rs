//! Logging utilities.
//!
//! Thin helpers over the `log` facade so data-quality warnings carry a
//! consistent format, plus an opt-in `env_logger` initializer.

use crate::utils::calendar::CalendarWeek;

/// Initialize `env_logger` with an `info` default filter.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
}

/// Log a data-quality warning attached to a calendar week.
pub fn warn_week(message: &str, week: CalendarWeek) {
    log::warn!("{message} (week {week})");
}
