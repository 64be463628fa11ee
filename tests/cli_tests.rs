use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let ws = Self { dir };
        ws.write(
            "config.toml",
            "database = \"cli.db\"\n\n[logging]\nlevel = \"warn\"\nformat = \"pretty\"\n",
        );
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_closeline"));
        cmd.current_dir(self.dir.path())
            .env_remove("CLOSELINE_DATABASE")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run closeline")
    }
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn suggestion_json() -> &'static str {
    r#"{
        "sport": "nfl",
        "homeTeam": "Chiefs",
        "awayTeam": "Bills",
        "marketType": "spreads",
        "selection": "Chiefs -2.5",
        "gameId": "nfl-2026-wk1-kc-buf",
        "commenceTime": "2026-09-11T00:20:00Z",
        "openingOddsDecimal": "1.9524",
        "openingOddsAmerican": -105,
        "openingSportsbook": "circa"
    }"#
}

fn assert_db_exists(path: &Path) {
    assert!(path.exists(), "expected database at {}", path.display());
}

#[test]
fn parlay_validate_prints_contradictions() {
    let ws = Workspace::new();
    ws.write(
        "legs.json",
        r#"[
            {"game": "A_B", "marketType": "totals", "selection": "Over 8.5"},
            {"game": "A_B", "marketType": "totals", "selection": "Under 8.5"}
        ]"#,
    );

    let json = stdout_json(&ws.run(&["parlay", "validate", "legs.json"]));
    assert_eq!(json["isValid"], false);
    assert_eq!(json["errors"][0]["game"], "A_B");
    assert!(!ws.path("cli.db").exists(), "parlay checks never open the database");
}

#[test]
fn parlay_filter_prints_kept_legs() {
    let ws = Workspace::new();
    ws.write(
        "legs.json",
        r#"[
            {"game": "A_B", "marketType": "h2h", "selection": "A"},
            {"game": "A_B", "marketType": "h2h", "selection": "B"},
            {"game": "C_D", "marketType": "h2h", "selection": "C"}
        ]"#,
    );

    let json = stdout_json(&ws.run(&["parlay", "filter", "legs.json"]));
    assert_eq!(json["removed"], 1);
    assert_eq!(json["legs"].as_array().unwrap().len(), 2);
    assert_eq!(json["legs"][1]["selection"], "C");
}

#[test]
fn lifecycle_through_cli() {
    let ws = Workspace::new();
    ws.write("suggestion.json", suggestion_json());

    let receipt = stdout_json(&ws.run(&["track", "suggestion.json"]));
    let tracking_id = receipt["trackingId"].as_str().unwrap().to_string();
    let bet_id = receipt["betId"].as_str().unwrap().to_string();
    assert_eq!(bet_id.len(), 16);
    assert_db_exists(&ws.path("cli.db"));

    let report = stdout_json(&ws.run(&[
        "close",
        &bet_id,
        "--decimal",
        "1.9091",
        "--american",
        "-110",
        "--book",
        "pinnacle",
    ]));
    assert_eq!(report["centsClv"], 5);
    assert_eq!(report["closing"]["sportsbook"], "pinnacle");

    let ack = stdout_json(&ws.run(&["settle", &tracking_id, "--outcome", "win", "--correct"]));
    assert_eq!(ack["newlySettled"], true);
    let again = stdout_json(&ws.run(&["settle", &tracking_id, "--outcome", "loss"]));
    assert_eq!(again["newlySettled"], false);

    let shown = stdout_json(&ws.run(&["show", &tracking_id]));
    assert_eq!(shown["betId"], bet_id.as_str());
    assert_eq!(shown["result"]["outcome"], "win");

    let summary = stdout_json(&ws.run(&["summary"]));
    assert_eq!(summary["totalTracked"], 1);
    assert_eq!(summary["settledCount"], 1);
    assert_eq!(summary["correctCount"], 1);

    let csv = ws.run(&["summary", "--csv"]);
    assert!(csv.status.success());
    let text = String::from_utf8_lossy(&csv.stdout);
    assert!(text.starts_with("date,total_tracked,settled_count,correct_count,accuracy_percent"));
    assert!(text.contains(",1,1,1,100"));
}

#[test]
fn track_reports_missing_fields_and_fails() {
    let ws = Workspace::new();
    ws.write("partial.json", r#"{"sport": "nhl", "homeTeam": "Oilers"}"#);

    let output = ws.run(&["track", "partial.json"]);
    assert!(!output.status.success(), "Expected nonzero exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing required fields"), "stderr: {stderr}");
    assert!(stderr.contains("awayTeam"), "stderr: {stderr}");
}

#[test]
fn close_on_unknown_key_fails() {
    let ws = Workspace::new();
    let output = ws.run(&[
        "close",
        "no-such-id",
        "--decimal",
        "2.0",
        "--american",
        "100",
        "--book",
        "circa",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn settle_without_outcome_fails() {
    let ws = Workspace::new();
    ws.write("suggestion.json", suggestion_json());
    let receipt = stdout_json(&ws.run(&["track", "suggestion.json"]));
    let tracking_id = receipt["trackingId"].as_str().unwrap();

    let output = ws.run(&["settle", tracking_id]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("outcome"), "stderr: {stderr}");
}

#[test]
fn check_config_returns_nonzero_on_invalid_value() {
    let ws = Workspace::new();
    ws.write("bad.toml", "[store]\nmax_connections = 0\n");

    let output = ws.run(&["check-config", "--config", "bad.toml"]);
    assert!(!output.status.success(), "Expected nonzero exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_connections"), "stderr: {stderr}");
}

#[test]
fn check_config_echoes_settings() {
    let ws = Workspace::new();
    let json = stdout_json(&ws.run(&["check-config"]));
    assert_eq!(json["valid"], true);
    assert_eq!(json["database"], "cli.db");
}

#[test]
fn database_env_overrides_config() {
    let ws = Workspace::new();
    ws.write("suggestion.json", suggestion_json());

    let output = ws
        .command()
        .env("CLOSELINE_DATABASE", "override.db")
        .args(["track", "suggestion.json"])
        .output()
        .expect("run closeline");
    stdout_json(&output);

    assert_db_exists(&ws.path("override.db"));
    assert!(!ws.path("cli.db").exists());
}
