use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;

mod util;
use util::TempFixtureDir;

fn base_cmd(fx: &TempFixtureDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nas"));
    // Keep the user's config and environment out of the run.
    cmd.env("XDG_CONFIG_HOME", fx.root().join("config-home"));
    cmd.env_remove("NAS_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn audio_fixture() -> TempFixtureDir {
    let fx = TempFixtureDir::new();
    fx.write(
        "nier_audio_json/voice/ch01.json",
        r#"[{"wav":"v_0001.wav","text":"Glory to mankind."},{"wav":"v_0002.wav","text":"Pod, report."}]"#,
    );
    fx.write(
        "nier_audio_json/voice/ch02.json",
        r#"[{"wav":"v_0100.wav","text":"GLORY to mankind!"}]"#,
    );
    fx.write("nier_audio_json/broken.json", "[{");
    fx
}

#[test]
fn search_prints_record_blocks() {
    let fx = audio_fixture();
    let mut cmd = base_cmd(&fx);
    cmd.args(["--color=never", "--root"])
        .arg(fx.root())
        .args(["search", "glory to mankind"]);

    cmd.assert()
        .success()
        .stdout(contains("File: nier_audio_json/voice/ch01.json"))
        .stdout(contains("  wav: v_0001.wav"))
        .stdout(contains("  text: Glory to mankind."))
        .stdout(contains("File: nier_audio_json/voice/ch02.json"))
        .stdout(contains("Error reading nier_audio_json/broken.json"))
        .stdout(contains("Pod, report.").not())
        .stdout(predicate::str::contains("\u{1b}").not());
}

#[test]
fn search_json_output() {
    let fx = audio_fixture();
    let mut cmd = base_cmd(&fx);
    cmd.arg("--root")
        .arg(fx.root())
        .args(["search", "glory", "--json", "--asset-paths"]);

    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: Value = serde_json::from_str(stdout.trim()).expect("valid JSON output");

    assert_eq!(json["phrase"], "glory");
    assert_eq!(json["count"], 2);
    assert_eq!(json["errors"], 1);
    let entries = json["entries"].as_array().expect("entries array");
    // broken.json sorts before the voice/ directory
    assert_eq!(entries[0]["type"], "error");
    assert_eq!(entries[0]["kind"], "malformed_data");
    assert_eq!(entries[1]["type"], "hit");
    assert_eq!(entries[1]["asset_path"], "voice/ch01/v_0001.wav");
    assert_eq!(entries[2]["asset_path"], "voice/ch02/v_0100.wav");
}

#[test]
fn search_not_found_succeeds_with_marker() {
    let fx = TempFixtureDir::new();
    fx.write("a.json", r#"[{"text":"foo"}]"#);
    let mut cmd = base_cmd(&fx);
    cmd.args(["--color=never", "--root"])
        .arg(fx.root())
        .args(["search", "zzz"]);

    cmd.assert()
        .success()
        .stdout("Phrase 'zzz' not found in text files.\n");
}

#[test]
fn punctuation_only_phrase_exits_2() {
    let fx = audio_fixture();
    let mut cmd = base_cmd(&fx);
    cmd.arg("--root").arg(fx.root()).args(["search", "..."]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(contains("Phrase contains only punctuation"))
        .stdout("");
}

#[test]
fn missing_root_exits_2() {
    let fx = TempFixtureDir::new();
    let mut cmd = base_cmd(&fx);
    cmd.arg("--root")
        .arg(fx.root().join("nier_json"))
        .args(["search", "glory"]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(contains("Folder not found"));
}

#[test]
fn root_from_env() {
    let fx = audio_fixture();
    let mut cmd = base_cmd(&fx);
    cmd.env("NAS_ROOT", fx.root())
        .args(["--color=never", "search", "pod report"]);

    cmd.assert()
        .success()
        .stdout(contains("wav: v_0002.wav"));
}

#[test]
fn root_from_config_file() {
    let fx = audio_fixture();
    let config_path = fx.write(
        "settings/config.toml",
        &format!("root = {:?}\n", fx.root().display().to_string()),
    );
    let mut cmd = base_cmd(&fx);
    cmd.arg("--config")
        .arg(&config_path)
        .args(["--color=never", "search", "pod"]);

    cmd.assert()
        .success()
        .stdout(contains("wav: v_0002.wav"));
}

#[test]
fn markdown_format() {
    let fx = audio_fixture();
    let mut cmd = base_cmd(&fx);
    cmd.arg("--root")
        .arg(fx.root())
        .args(["search", "pod", "--format", "markdown"]);

    cmd.assert()
        .success()
        .stdout(contains("# Search Results"))
        .stdout(contains("| wav | v\\_0002.wav |"));
}

#[test]
fn asset_path_subcommand() {
    let fx = TempFixtureDir::new();
    let mut cmd = base_cmd(&fx);
    cmd.args([
        "asset-path",
        "nier_audio_json/voice/ch01.json",
        r#"{"wav":"v_0001.wav"}"#,
    ]);
    cmd.assert().success().stdout("voice/ch01/v_0001.wav\n");

    let mut cmd = base_cmd(&fx);
    cmd.args(["asset-path", "x.json", r#"{"text":"none"}"#]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("record has no 'wav' field"));
}

#[test]
fn tui_bypasses_in_non_tty() {
    let fx = TempFixtureDir::new();
    let mut cmd = base_cmd(&fx);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(contains("TUI is disabled"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let fx = audio_fixture();
    let mut cmd = base_cmd(&fx);
    cmd.args(["-v", "--color=never", "--root"])
        .arg(fx.root())
        .args(["search", "glory"]);

    cmd.assert()
        .success()
        .stderr(contains("scan_complete"))
        .stdout(contains("scan_complete").not());
}

#[test]
fn log_file_receives_logs() {
    let fx = audio_fixture();
    let log_path = fx.root().join("nas.log");
    let mut cmd = base_cmd(&fx);
    cmd.args(["-v", "--log-file"])
        .arg(&log_path)
        .arg("--root")
        .arg(fx.root())
        .args(["search", "glory"]);

    cmd.assert().success();
    let log = std::fs::read_to_string(&log_path).expect("log file written");
    assert!(log.contains("scan_complete"));
}
