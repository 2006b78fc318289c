use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn recall(tmp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("recall").expect("recall binary");
    cmd.current_dir(tmp)
        .env_remove("RECALL_MARKDOWN_DIR")
        .env_remove("RECALL_DB_FILE")
        .env("RUST_LOG", "warn")
        .arg("--root")
        .arg(tmp.join("docs"))
        .arg("--db")
        .arg(tmp.join("db").join("data.json"));
    cmd
}

fn run_ok(tmp: &Path, args: &[&str]) -> Value {
    let output = recall(tmp).args(args).output().expect("run recall");
    assert!(
        output.status.success(),
        "recall {args:?} failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    serde_json::from_slice(&output.stdout).expect("json envelope")
}

fn run_err(tmp: &Path, args: &[&str]) -> Value {
    let output = recall(tmp).args(args).output().expect("run recall");
    assert!(!output.status.success(), "recall {args:?} unexpectedly succeeded");
    serde_json::from_slice(&output.stdout).expect("json envelope")
}

fn library() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(docs.join("sub")).unwrap();
    fs::write(docs.join("a.md"), "# Alpha\nbody").unwrap();
    fs::write(docs.join("sub").join("b.md"), "no heading here\n").unwrap();
    fs::write(docs.join("notes.txt"), "ignored").unwrap();
    tmp
}

#[test]
fn scan_then_list_reports_catalog() {
    let tmp = library();

    let scan = run_ok(tmp.path(), &["scan"]);
    assert_eq!(scan["status"], "ok");
    assert_eq!(scan["data"]["count"], 2);
    assert_eq!(scan["meta"]["documents"], 2);

    let list = run_ok(tmp.path(), &["list"]);
    let docs = list["data"]["documents"].as_array().unwrap();
    let titles: Vec<&str> = docs.iter().map(|d| d["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Alpha", "no heading here"]);
    assert!(docs.iter().all(|d| d["dueForReview"] == true));
    assert!(docs.iter().all(|d| d["reviewCount"] == 0));
    assert_eq!(
        list["data"]["byFolder"],
        serde_json::json!({ "root": 1, "sub": 1 })
    );

    let sub = run_ok(tmp.path(), &["list", "--folder", "sub"]);
    assert_eq!(sub["data"]["count"], 1);
    assert_eq!(sub["data"]["documents"][0]["relativePath"], "sub/b.md");
}

#[test]
fn review_persists_and_clears_due_flag() {
    let tmp = library();
    run_ok(tmp.path(), &["scan"]);
    let id = "b00a1cca9c08ec62a1adc3bac23e10f5";

    let reviewed = run_ok(tmp.path(), &["review", id]);
    assert_eq!(reviewed["data"]["reviewCount"], 1);
    assert_eq!(reviewed["data"]["dueForReview"], false);

    let due = run_ok(tmp.path(), &["list", "--due"]);
    let ids: Vec<&str> = due["data"]["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&id));
    assert_eq!(ids.len(), 1);
}

#[test]
fn show_returns_content() {
    let tmp = library();
    run_ok(tmp.path(), &["scan"]);

    let shown = run_ok(tmp.path(), &["show", "b00a1cca9c08ec62a1adc3bac23e10f5"]);
    assert_eq!(shown["data"]["title"], "Alpha");
    assert_eq!(shown["data"]["content"], "# Alpha\nbody");
}

#[test]
fn unknown_id_is_an_error_with_hint() {
    let tmp = library();
    run_ok(tmp.path(), &["scan"]);

    let response = run_err(tmp.path(), &["review", "nope"]);
    assert_eq!(response["status"], "error");
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("Document not found"));
    assert_eq!(response["hints"][0]["type"], "action");
}

#[test]
fn schedule_preview_follows_interval_table() {
    let tmp = TempDir::new().unwrap();

    let first = run_ok(
        tmp.path(),
        &["schedule", "0", "--at", "2024-01-01T00:00:00Z"],
    );
    assert_eq!(first["data"]["intervalDays"], 1);
    assert_eq!(first["data"]["nextReviewDate"], "2024-01-02T00:00:00Z");

    let capped = run_ok(
        tmp.path(),
        &["schedule", "10", "--at", "2024-01-01T00:00:00Z"],
    );
    assert_eq!(capped["data"]["intervalDays"], 30);
    assert_eq!(capped["data"]["nextReviewDate"], "2024-01-31T00:00:00Z");
}

#[test]
fn negative_schedule_count_is_rejected() {
    let tmp = TempDir::new().unwrap();

    let response = run_err(tmp.path(), &["schedule", "-1"]);
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("Invalid review count"));
    assert_eq!(response["hints"][0]["type"], "warn");
}

#[test]
fn config_echoes_resolved_paths() {
    let tmp = TempDir::new().unwrap();

    let response = run_ok(tmp.path(), &["config"]);
    let root = tmp.path().join("docs");
    assert_eq!(response["data"]["markdownDir"], root.display().to_string());
    assert!(!tmp.path().join("db").exists());
}
