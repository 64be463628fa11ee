//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the suggestion and
//! performance summary stores using Diesel ORM.

pub mod database;
pub mod performance;
pub mod suggestion;

pub use performance::SqlitePerformanceStore;
pub use suggestion::SqliteSuggestionStore;
