//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   ┌──────────────┐      ┌──────────────────────┐      ┌──────────────┐
//!   │  CLI adapter │ ───▶ │ application services │ ───▶ │ store ports  │
//!   └──────────────┘      └──────────────────────┘      └──────┬───────┘
//!                                                              │
//!                                              ┌───────────────┴───────────┐
//!                                              ▼                           ▼
//!                                        MemoryStore              SQLite stores
//! ```

pub mod outbound;

pub use outbound::store::{PerformanceStore, SuggestionStore};
