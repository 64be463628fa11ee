//! Handlers for `closeline parlay`.

use serde_json::json;
use tracing::debug;

use super::command::{LegsFileArg, ParlayCommand};
use super::output::{print_json, read_json};
use crate::domain::{filter_contradictions, validate_parlay, Leg};
use crate::error::Result;

/// Execute a `parlay` subcommand.
pub fn execute(command: &ParlayCommand) -> Result<()> {
    match command {
        ParlayCommand::Validate(args) => execute_validate(args),
        ParlayCommand::Filter(args) => execute_filter(args),
    }
}

fn execute_validate(args: &LegsFileArg) -> Result<()> {
    let legs: Vec<Leg> = read_json(&args.file)?;
    let validation = validate_parlay(&legs);
    debug!(
        legs = legs.len(),
        valid = validation.is_valid,
        "Parlay validated"
    );
    print_json(&validation)
}

fn execute_filter(args: &LegsFileArg) -> Result<()> {
    let legs: Vec<Leg> = read_json(&args.file)?;
    let kept = filter_contradictions(&legs);
    print_json(&json!({
        "legs": kept,
        "removed": legs.len() - kept.len(),
    }))
}
