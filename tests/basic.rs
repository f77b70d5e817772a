use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn write_stream(path: &std::path::Path, events: &[serde_json::Value]) {
    let lines: Vec<String> = events.iter().map(|e| e.to_string()).collect();
    fs::write(path, lines.join("\n")).unwrap();
}

fn login_run() -> Vec<serde_json::Value> {
    vec![
        json!({ "event": "report:run:browser", "data": "Chrome" }),
        json!({ "event": "report:testsuite:started", "data": "Login" }),
        json!({ "event": "report:test:started", "data": { "name": "can log in" } }),
        json!({ "event": "report:assertion", "data": { "type": "title", "success": true, "message": "ok" } }),
        json!({ "event": "report:log:message", "data": "ignored" }),
        json!({ "event": "report:test:finished", "data": { "status": true } }),
        json!({ "event": "report:testsuite:finished", "data": "Login" }),
        json!({ "event": "report:runner:finished", "data": {
            "elapsedTime": "1 sec", "status": true,
            "assertions": 1, "assertionsFailed": 0, "assertionsPassed": 1
        } }),
    ]
}

#[test]
fn test_schema_command() {
    Command::cargo_bin("junit-reporter")
        .unwrap()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("$schema"))
        .stdout(predicate::str::contains("report:runner:finished"));
}

#[test]
fn test_replay_with_config_dest() -> Result<()> {
    let dir = tempdir()?;
    let stream = dir.path().join("run.ndjson");
    write_stream(&stream, &login_run());

    let out_dir = dir.path().join("ci/reports");
    let config = dir.path().join("Dalekfile.json");
    fs::write(
        &config,
        json!({ "junit-reporter": { "dest": out_dir.to_str().unwrap() } }).to_string(),
    )?;

    Command::cargo_bin("junit-reporter")?
        .arg("replay")
        .arg("--events")
        .arg(&stream)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("junit report written to"));

    let xml = fs::read_to_string(out_dir.join("dalek.xml"))?;
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"name="Login [Chrome]""#));
    assert!(xml.contains(r#"result="Passed""#));
    Ok(())
}

#[test]
fn test_replay_json_notifications_and_dest_flag() -> Result<()> {
    let dir = tempdir()?;
    let stream = dir.path().join("run.ndjson");
    write_stream(&stream, &login_run());
    let dest = dir.path().join("out.xml");

    let output = Command::cargo_bin("junit-reporter")?
        .arg("replay")
        .arg("--events")
        .arg(&stream)
        .arg("--dest")
        .arg(&dest)
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout)?;
    let notification: serde_json::Value = serde_json::from_str(line.trim())?;
    assert_eq!(notification["event"], "report:written");
    assert_eq!(notification["data"]["type"], "junit");
    assert_eq!(notification["data"]["dest"], dest.to_str().unwrap());
    assert!(dest.is_file());
    Ok(())
}

#[test]
fn test_replay_incomplete_stream() -> Result<()> {
    let dir = tempdir()?;
    let stream = dir.path().join("run.ndjson");
    let mut events = login_run();
    events.pop();
    write_stream(&stream, &events);
    let dest = dir.path().join("out.xml");

    Command::cargo_bin("junit-reporter")?
        .arg("replay")
        .arg("--events")
        .arg(&stream)
        .arg("--dest")
        .arg(&dest)
        .assert()
        .code(2);
    assert!(!dest.exists());
    Ok(())
}

#[test]
fn test_replay_rejects_out_of_order_stream() -> Result<()> {
    let dir = tempdir()?;
    let stream = dir.path().join("run.ndjson");
    write_stream(
        &stream,
        &[json!({ "event": "report:test:started", "data": { "name": "orphan" } })],
    );

    Command::cargo_bin("junit-reporter")?
        .arg("replay")
        .arg("--events")
        .arg(&stream)
        .arg("--dest")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no suite is open"));
    Ok(())
}

#[test]
fn test_replay_reports_bad_line() -> Result<()> {
    let dir = tempdir()?;
    let stream = dir.path().join("run.ndjson");
    fs::write(&stream, "{\"event\":\"report:run:browser\",\"data\":\"Chrome\"}\n{oops\n")?;

    Command::cargo_bin("junit-reporter")?
        .arg("replay")
        .arg("--events")
        .arg(&stream)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 2"));
    Ok(())
}
