//! Core types: meeting requests, results, times, tracing setup

pub mod meeting;
pub mod time;
pub mod tracing;

pub use meeting::{
    DEFAULT_DURATION_MINUTES, DEFAULT_START_IN_MINUTES, MeetingRequest, MeetingResult,
    TimeRangeError,
};
pub use time::MeetingTime;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
