//! Integration tests for the `qxp` CLI binary.
//!
//! These run the CLI as a subprocess and check exit codes, stdout and the
//! draft file left behind. Every draft test gets its own temp directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Helper: locate the `qxp` binary built by `cargo test`.
fn qxp_bin() -> String {
    let path = env!("CARGO_BIN_EXE_qxp");
    assert!(Path::new(path).exists(), "qxp binary not found at {path}");
    path.to_owned()
}

/// Helper: run qxp with args and return (`exit_code`, stdout, stderr).
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(qxp_bin())
        .args(args)
        .env_remove("QXP_STORE")
        .env_remove("QXP_PRICE_PER_TERM")
        .env_remove("QXP_CURRENCY")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute qxp");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn run_json(args: &[&str]) -> Value {
    let (code, stdout, stderr) = run(args);
    assert_eq!(code, 0, "qxp {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout should be JSON")
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    let (code, stdout, _) = run(&["--version"]);
    assert_eq!(code, 0, "qxp --version should exit 0");
    assert!(stdout.contains("qxp"), "version output should contain 'qxp': {stdout}");
}

#[test]
fn test_help_lists_commands() {
    let (code, stdout, _) = run(&["--help"]);
    assert_eq!(code, 0);
    for sub in ["quote", "tiers", "route", "draft"] {
        assert!(stdout.contains(sub), "help should list '{sub}'");
    }
}

// ── Pricing ──────────────────────────────────────────────────────────

#[test]
fn test_quote_table() {
    let (code, stdout, _) = run(&["quote", "--students", "500", "--staff", "40", "--terms", "3"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Large school"), "{stdout}");
    assert!(stdout.contains("KES 1,618,380"), "{stdout}");
    assert!(stdout.contains("KES 1,456,542"), "{stdout}");
}

#[test]
fn test_quote_json() {
    let quote = run_json(&[
        "quote",
        "--students",
        "4000",
        "--staff",
        "1000",
        "--terms",
        "1",
        "--json",
    ]);
    assert_eq!(quote["total_users"], 5000);
    assert_eq!(quote["tier"]["label"], "Enterprise");
    assert_eq!(quote["tier"]["discount_percent"], 20);
    assert_eq!(quote["total"], 3_996_000.0);
}

#[test]
fn test_quote_coerces_garbage() {
    let quote = run_json(&[
        "quote",
        "--students",
        "lots",
        "--staff",
        "-3",
        "--terms",
        "0",
        "--json",
    ]);
    assert_eq!(quote["inputs"]["student_count"], 0);
    assert_eq!(quote["inputs"]["staff_count"], 0);
    assert_eq!(quote["inputs"]["terms_per_year"], 1);
    assert_eq!(quote["tier"]["label"], "Small school");
}

#[test]
fn test_quote_price_override_from_env() {
    let output = Command::new(qxp_bin())
        .args(["quote", "--students", "10", "--terms", "1", "--json"])
        .env("QXP_PRICE_PER_TERM", "100")
        .env("QXP_CURRENCY", "USD")
        .output()
        .unwrap();
    assert!(output.status.success());
    let quote: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(quote["currency"], "USD");
    assert_eq!(quote["total"], 1000.0);
}

#[test]
fn test_negative_price_rejected() {
    let (code, _, stderr) = run(&["quote", "--price", "-1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("non-negative"), "{stderr}");
}

#[test]
fn test_tiers_json() {
    let tiers = run_json(&["tiers", "--json"]);
    let tiers = tiers.as_array().unwrap();
    assert_eq!(tiers.len(), 5);
    assert_eq!(tiers[0]["min_users"], 0);
    assert_eq!(tiers[0]["max_users"], 99);
    assert!(tiers[4]["max_users"].is_null());
}

#[test]
fn test_tiers_table() {
    let (code, stdout, _) = run(&["tiers"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("KES 999 per user per term"), "{stdout}");
    assert!(stdout.contains("5000+"), "{stdout}");
    assert!(stdout.contains("School group"), "{stdout}");
}

// ── Routing ──────────────────────────────────────────────────────────

#[test]
fn test_route_sequence() {
    let steps = run_json(&[
        "route",
        "#/marketing/pricing",
        "#/solutions/bursar",
        "#/solutions/bursar",
        "#/nowhere",
        "--json",
    ]);
    let steps = steps.as_array().unwrap();
    // The repeated fragment fires no change.
    assert_eq!(steps.len(), 3);

    assert_eq!(steps[0]["view"]["view"], "pricing");
    assert!(steps[0]["scroll"].is_null(), "initial render does not scroll");

    assert_eq!(steps[1]["view"]["view"], "solution");
    assert_eq!(steps[1]["view"]["slug"], "bursar");
    assert_eq!(steps[1]["scroll"], "instant");

    assert_eq!(steps[2]["view"]["view"], "not_found");
}

#[test]
fn test_route_entry_redirect() {
    let steps = run_json(&["route", "", "--json"]);
    assert_eq!(steps[0]["fragment"], "#/marketing");
    assert_eq!(steps[0]["redirected_from"], "");
    assert_eq!(steps[0]["view"]["view"], "home");
}

#[test]
fn test_route_table() {
    let (code, stdout, _) = run(&["route", "#/demo?ref=footer"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("demo"), "{stdout}");
    assert!(stdout.contains("Book a demo"), "{stdout}");
}

// ── Drafts ───────────────────────────────────────────────────────────

fn draft_cmd(store: &Path, args: &[&str]) -> (i32, String, String) {
    let store = store.to_str().unwrap();
    let mut full = vec!["draft", "--store", store];
    full.extend_from_slice(args);
    run(&full)
}

#[test]
fn test_draft_save_load_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("drafts.redb");

    let (code, _, stderr) = draft_cmd(
        &store,
        &["save", "contact", "name=Wanjiku", "email=w@school.ac.ke"],
    );
    assert_eq!(code, 0, "{stderr}");
    assert!(store.exists());

    let (code, stdout, _) = draft_cmd(&store, &["load", "contact"]);
    assert_eq!(code, 0);
    let draft: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(draft["name"], "Wanjiku");
    assert_eq!(draft["email"], "w@school.ac.ke");

    let (_, stdout, _) = draft_cmd(&store, &["list"]);
    assert_eq!(stdout.trim(), "contact");

    let (code, _, _) = draft_cmd(&store, &["clear", "contact"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = draft_cmd(&store, &["load", "contact"]);
    assert_eq!(serde_json::from_str::<Value>(&stdout).unwrap(), serde_json::json!({}));
}

#[test]
fn test_draft_save_merges_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("drafts.redb");

    draft_cmd(&store, &["save", "demo", "name=Otieno"]);
    draft_cmd(&store, &["save", "demo", "role=principal"]);

    let (_, stdout, _) = draft_cmd(&store, &["load", "demo"]);
    let draft: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(draft["name"], "Otieno");
    assert_eq!(draft["role"], "principal");
}

#[test]
fn test_draft_rejects_unknown_form_and_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("drafts.redb");

    let (code, _, _) = draft_cmd(&store, &["save", "careers", "name=x"]);
    assert_ne!(code, 0);

    let (code, _, stderr) = draft_cmd(&store, &["save", "contact", "shoe_size=44"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("shoe_size"), "{stderr}");

    let (code, _, stderr) = draft_cmd(&store, &["save", "contact", "nameWanjiku"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("name=value"), "{stderr}");
}

#[test]
fn test_draft_submit_validates_then_clears() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("drafts.redb");

    draft_cmd(&store, &["save", "contact", "name=Wanjiku", "email=w@school.ac.ke"]);
    let (code, _, _) = draft_cmd(&store, &["submit", "contact"]);
    assert_ne!(code, 0, "message is required");

    draft_cmd(&store, &["save", "contact", "message=Hello"]);
    let (code, _, stderr) = draft_cmd(&store, &["submit", "contact"]);
    assert_eq!(code, 0, "{stderr}");

    let (_, stdout, _) = draft_cmd(&store, &["list"]);
    assert!(stdout.trim().is_empty(), "draft should be cleared: {stdout}");
}
