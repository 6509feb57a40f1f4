use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tempfile::tempdir;

const CONFIG: &str = "\
VILLAGEVILLE
WATERFALL_TOWN
GRAVEYARD_GATE
3
Back

GRAVEYARD_GATE
VILLAGEVILLE
CABIN_INTERIOR_X
2
Left
";

#[derive(Debug, Deserialize)]
struct EventLog {
    start_level: String,
    final_level: String,
    destination_volume: Option<u32>,
    spin_through_door: bool,
    far_away: bool,
    events: Vec<Value>,
}

fn run_host(cwd: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_entrance_host"))
        .current_dir(cwd)
        .args(args)
        .output()
        .context("executing entrance_host")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn route_reports_remapped_destination() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let config_path = temp_dir.path().join("config.txt");
    fs::write(&config_path, CONFIG).context("writing config")?;
    let config_str = config_path.to_str().context("config path is not UTF-8")?;

    let output = run_host(
        temp_dir.path(),
        &[
            "--config",
            config_str,
            "--from",
            "VILLAGEVILLE",
            "--to",
            "WATERFALL_TOWN",
        ],
    )?;
    assert!(output.status.success(), "exited with {:?}", output.status);

    let transcript = stdout_of(&output);
    assert!(
        transcript.contains("From: VILLAGEVILLE, To: WATERFALL_TOWN"),
        "transition diagnostic missing: {transcript}"
    );
    assert!(
        transcript.contains("GRAVEYARD_GATE (volume 3, viewpoint BACK)"),
        "decision missing: {transcript}"
    );
    Ok(())
}

#[test]
fn route_json_omits_overrides_on_a_miss() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let config_path = temp_dir.path().join("config.txt");
    fs::write(&config_path, CONFIG).context("writing config")?;
    let config_str = config_path.to_str().context("config path is not UTF-8")?;

    let output = run_host(
        temp_dir.path(),
        &[
            "--config",
            config_str,
            "--from",
            "VILLAGEVILLE",
            "--to",
            "SOMETHING_ELSE",
            "--json",
        ],
    )?;
    assert!(output.status.success(), "exited with {:?}", output.status);

    let transcript = stdout_of(&output);
    let json_start = transcript.find('{').context("no JSON in output")?;
    let decision: Value =
        serde_json::from_str(&transcript[json_start..]).context("parsing decision JSON")?;
    assert_eq!(decision["actual_level"], "SOMETHING_ELSE");
    assert!(decision.get("volume_override").is_none());
    assert!(decision.get("viewpoint_override").is_none());
    Ok(())
}

#[test]
fn replay_writes_event_log() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let config_path = temp_dir.path().join("config.txt");
    let script_path = temp_dir.path().join("walk.json");
    let log_path = temp_dir.path().join("logs").join("events.json");
    fs::write(&config_path, CONFIG).context("writing config")?;
    fs::write(
        &script_path,
        r#"[
            {"kind": "change_level", "level": "WATERFALL_TOWN"},
            {"kind": "change_level", "level": "VILLAGEVILLE"},
            {"kind": "enter_door"},
            {"kind": "secret_check", "condition": false},
            {"kind": "report_bits", "pickups": ["cube_shard", "anti_cube"]}
        ]"#,
    )
    .context("writing replay script")?;

    let output = run_host(
        temp_dir.path(),
        &[
            "--config",
            config_path.to_str().context("config path is not UTF-8")?,
            "--script",
            script_path.to_str().context("script path is not UTF-8")?,
            "--start-level",
            "VILLAGEVILLE",
            "--event-log-json",
            log_path.to_str().context("log path is not UTF-8")?,
        ],
    )?;
    assert!(output.status.success(), "exited with {:?}", output.status);
    assert!(log_path.is_file(), "event log was not written");

    let log: EventLog = serde_json::from_str(
        &fs::read_to_string(&log_path).context("reading event log")?,
    )
    .context("parsing event log")?;
    assert_eq!(log.start_level, "VILLAGEVILLE");
    assert_eq!(log.final_level, "CABIN_INTERIOR_X");
    assert_eq!(log.destination_volume, Some(2));
    assert!(!log.spin_through_door);
    assert!(!log.far_away);

    let kinds: Vec<&str> = log
        .events
        .iter()
        .filter_map(|event| event["kind"].as_str())
        .filter(|kind| !kind.starts_with("hook_"))
        .collect();
    assert_eq!(
        kinds,
        vec![
            "destination_volume",
            "level_loaded",
            "viewpoint",
            "destination_volume",
            "level_loaded",
            "spin_through_door",
            "far_away",
            "faraway_reset",
            "door_entered",
            "secret_checked",
            "bits_reported",
        ]
    );

    let secret = log
        .events
        .iter()
        .find(|event| event["kind"] == "secret_checked")
        .context("secret check missing")?;
    assert_eq!(secret["condition"], true);
    assert_eq!(secret["revealed"], true);

    let bits = log
        .events
        .iter()
        .find(|event| event["kind"] == "bits_reported")
        .context("bit report missing")?;
    assert_eq!(bits["count"], 1);
    Ok(())
}

#[test]
fn table_json_with_a_route_is_rejected() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let config_path = temp_dir.path().join("config.txt");
    let table_path = temp_dir.path().join("table.json");
    fs::write(&config_path, CONFIG).context("writing config")?;

    let output = run_host(
        temp_dir.path(),
        &[
            "--config",
            config_path.to_str().context("config path is not UTF-8")?,
            "--table-json",
            table_path.to_str().context("table path is not UTF-8")?,
            "--from",
            "VILLAGEVILLE",
            "--to",
            "WATERFALL_TOWN",
        ],
    )?;
    assert!(!output.status.success(), "conflicting flags were accepted");
    assert!(!table_path.exists(), "table JSON should not be written");
    Ok(())
}

#[test]
fn malformed_config_fails_the_run() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let config_path = temp_dir.path().join("config.txt");
    fs::write(&config_path, "A\nB\nC\nnope\nBACK\n").context("writing config")?;

    let output = run_host(
        temp_dir.path(),
        &[
            "--config",
            config_path.to_str().context("config path is not UTF-8")?,
            "--list",
        ],
    )?;
    assert!(!output.status.success(), "malformed config was accepted");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("volume id"),
        "error should name the bad field: {stderr}"
    );
    Ok(())
}
