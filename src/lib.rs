//! Closeline - parlay consistency checking and closing-line-value tracking.
//!
//! This crate checks betting parlays for legs that cannot all win, and tracks
//! betting suggestions from the price they were offered at to the market's
//! closing price and final result.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Pure logic with no I/O
//!   - `odds` - American/decimal conversion, implied probability, CLV
//!   - `consistency` - Contradicting legs within the same game
//!   - `suggestion` / `performance` - Tracked records and daily summaries
//! - **`port`** - Store traits the application depends on
//! - **`application`** - `ClvTracker` and `PerformanceAggregator`
//! - **`adapter`** - In-memory and SQLite stores, the CLI
//! - **`infrastructure`** - Configuration, logging and wiring
//!
//! # Modules
//!
//! - [`domain`] - Odds math, legs, suggestions, summaries
//! - [`port`] - Outbound store ports
//! - [`application`] - Tracking and aggregation use cases
//! - [`adapter`] - Store implementations and CLI handlers
//! - [`infrastructure`] - Config loading and composition root
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use closeline::domain::{validate_parlay, Leg};
//!
//! let legs = vec![
//!     Leg::new("Lakers_Celtics", "h2h", "Lakers"),
//!     Leg::new("Lakers_Celtics", "h2h", "Celtics"),
//! ];
//! let validation = validate_parlay(&legs);
//! assert!(!validation.is_valid);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
