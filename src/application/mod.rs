//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate the store ports
//! to implement suggestion tracking and performance reporting.

pub mod performance;
pub mod tracker;

pub use performance::PerformanceAggregator;
pub use tracker::{
    ClosingLineInput, ClosingLineReport, ClvTracker, LineSummary, NewSuggestion, ResultAck,
    ResultInput, TrackReceipt,
};
