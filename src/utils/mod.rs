//! Shared utilities: calendar-week handling and logging helpers.

pub mod calendar;
pub mod logging;

pub use calendar::CalendarWeek;
