//! CLI module graph.

pub mod check;
pub mod command;
pub mod execute;
pub mod output;
pub mod parlay;
pub mod summary;
pub mod tracking;
