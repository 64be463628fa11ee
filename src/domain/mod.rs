//! Storage-agnostic domain logic: odds math, parlay consistency, suggestion
//! records and performance summaries.

pub mod consistency;
pub mod error;
pub mod id;
pub mod leg;
pub mod odds;
pub mod performance;
pub mod suggestion;

pub use consistency::{
    filter_contradictions, validate_parlay, ContradictingPair, ContradictionReport,
    ParlayValidation,
};
pub use id::{BetId, GameKey, TrackingId};
pub use leg::{Leg, MarketKind};
pub use performance::{
    PerformanceRollup, PerformanceSummary, PeriodKey, PeriodType, SummaryDelta,
};
pub use suggestion::{ClosingLine, ClvMetrics, GameResult, Outcome, TrackedSuggestion};
