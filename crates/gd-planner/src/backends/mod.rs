//! Built-in backends.

mod noop;
mod speed_profile;

pub use noop::NoopPlanner;
pub use speed_profile::SpeedProfilePlanner;
