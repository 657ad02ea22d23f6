use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::Value;

fn scenario(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn keyreplay(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_keyreplay"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn keyreplay")
}

fn json_report(args: &[&str]) -> Value {
    let out = keyreplay(args);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("json report")
}

fn fired(report: &Value) -> Vec<(u64, String, String)> {
    report["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["event"] == "fired")
        .map(|e| {
            (
                e["at_ms"].as_u64().unwrap(),
                e["id"].as_str().unwrap().to_string(),
                e["callback"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn phone_scenario_json() {
    let path = scenario("phone.ron");
    let report = json_report(&["--json", path.to_str().unwrap()]);

    let expected = vec![
        (0, "phone".to_string(), "key_down".to_string()),
        (1000, "phone".to_string(), "key_down".to_string()),
        (1512, "horn".to_string(), "delayed".to_string()),
        (1600, "horn".to_string(), "key_up".to_string()),
        (1600, "radio".to_string(), "key_down".to_string()),
    ];
    assert_eq!(fired(&report), expected);

    let checks: Vec<&Value> = report["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["event"] == "check")
        .collect();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0]["valid"], true);

    let bindings = report["bindings"].as_array().unwrap();
    assert_eq!(bindings[0]["key"], "o");
    assert_eq!(bindings[0]["default_key"], "p");
    assert_eq!(bindings[3]["key"], "tab");
}

#[test]
fn tick_flag_overrides_scenario() {
    let path = scenario("phone.ron");
    let report = json_report(&["--json", "--tick-ms", "100", path.to_str().unwrap()]);
    let delayed: Vec<u64> = fired(&report)
        .into_iter()
        .filter(|(_, id, _)| id == "horn")
        .map(|(at, _, _)| at)
        .collect();
    assert_eq!(delayed, vec![1500, 1600]);
}

#[test]
fn store_flag_persists_remaps() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("keybinds.json");
    let path = scenario("phone.ron");
    json_report(&[
        "--json",
        "--store",
        store.to_str().unwrap(),
        path.to_str().unwrap(),
    ]);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
    assert_eq!(saved["keybind-phone"], 79);
    assert!(saved.get("keybind-wheel").is_none());

    // A second run restores the remap before any step runs.
    let report = json_report(&[
        "--json",
        "--store",
        store.to_str().unwrap(),
        path.to_str().unwrap(),
    ]);
    assert_eq!(report["bindings"][0]["key"], "o");
    assert!(fired(&report).iter().all(|(_, id, _)| id != "phone"));
}

#[test]
fn text_output_and_errors() {
    let path = scenario("phone.ron");
    let out = keyreplay(&[path.to_str().unwrap()]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("delayed"));
    assert!(text.contains("radio = true"));
    assert!(text.contains("(default p)"));

    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.ron");
    fs::write(&bad, "(\n  steps: [jump],\n)").unwrap();
    let out = keyreplay(&[bad.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("bad.ron:2:"));

    let out = keyreplay(&["/nonexistent/scenario.ron"]);
    assert_eq!(out.status.code(), Some(1));
}
