//! Low-level utilities shared across Vigil crates.
//!
//! Business-day distance for staleness checks, atomic text writes for
//! snapshot output, and small time helpers.

pub mod atomic_io;
pub mod business_days;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use business_days::{business_days_between, is_business_day};
pub use time_utils::current_unix_timestamp;
