use std::net::TcpListener as StdTcpListener;

use assert_cmd::Command;
use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

fn unreachable_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

fn shell(config_dir: &TempDir, api_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("customer_desk_cli").unwrap();
    cmd.env("CUSTOMER_DESK_SCRIPT", "1")
        .env("CUSTOMER_DESK_CONFIG_DIR", config_dir.path())
        .env("CUSTOMER_DESK_API_URL", api_url)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands_and_exit_stops() {
    let dir = TempDir::new().unwrap();
    shell(&dir, &unreachable_url())
        .write_stdin("help\nexit\nhelp show\n")
        .assert()
        .success()
        .stdout(contains("=== Commands ==="))
        .stdout(contains("create"))
        .stdout(contains("show: Show one customer").not());
}

#[test]
fn unknown_command_suggests_closest() {
    let dir = TempDir::new().unwrap();
    shell(&dir, &unreachable_url())
        .write_stdin("lsit\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lsit`"))
        .stdout(contains("Suggestion: `list`?"));
}

#[test]
fn list_reports_load_failure_inline() {
    let dir = TempDir::new().unwrap();
    shell(&dir, &unreachable_url())
        .write_stdin("list\nshow 42\nexit\n")
        .assert()
        .success()
        .stdout(contains("Failed to load customers. Please try again later."))
        .stdout(contains("Loading customer details..."))
        .stdout(contains(
            "Failed to load customer details. Please try again later.",
        ));
}

#[test]
fn config_set_persists_value() {
    let dir = TempDir::new().unwrap();
    shell(&dir, &unreachable_url())
        .write_stdin("config set notification_ttl_secs 9\nconfig\nexit\n")
        .assert()
        .success()
        .stdout(contains("Updated `notification_ttl_secs`."));

    let json = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    let saved: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(saved["notification_ttl_secs"], 9);
}

#[test]
fn config_rejects_zero_notification_ttl() {
    let dir = TempDir::new().unwrap();
    shell(&dir, &unreachable_url())
        .write_stdin("config set notification_ttl_secs 0\nexit\n")
        .assert()
        .success()
        .stdout(contains("must be at least one second"))
        .stdout(contains("Updated `notification_ttl_secs`.").not());
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn invalid_step_shows_errors_and_cancel_leaves_wizard() {
    let dir = TempDir::new().unwrap();
    let personal_blank = "\n\n\n\n\n\n";
    let input = format!("create\n{personal_blank}\n{personal_blank}2\nexit\n");
    shell(&dir, &unreachable_url())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("firstName: First name is required"))
        .stdout(contains("dateOfBirth: Date of birth is required"))
        .stdout(contains("Customer creation cancelled."));
}

async fn create_customer(Json(mut body): Json<Value>) -> impl IntoResponse {
    if body.get("id").is_some() {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }
    body["id"] = json!("new-1");
    (StatusCode::CREATED, Json(body)).into_response()
}

#[test]
fn full_wizard_creates_customer() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let base = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/api/customer", post(create_customer));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    });

    let script = [
        "create",
        // personal
        "Ada",
        "",
        "Lovelace",
        "1990-12-10",
        "2",
        "english",
        "",
        // address
        "12 St James Sq",
        "",
        "London",
        "LDN",
        "United Kingdom",
        "SW1Y 4JH",
        "",
        // contact
        "",
        "ada@example.com",
        "",
        // identity
        "passport",
        "P1234567",
        "2020-01-01",
        "2030-01-01",
        "",
        // summary, then success menu
        "",
        "",
        "exit",
    ]
    .join("\n");

    let dir = TempDir::new().unwrap();
    shell(&dir, &base)
        .write_stdin(format!("{script}\n"))
        .assert()
        .success()
        .stdout(contains("Customer Summary"))
        .stdout(contains("Email:  ada@example.com"))
        .stdout(contains("Customer created successfully!"))
        .stdout(contains("Customer: Ada Lovelace"))
        .stdout(contains("Customer ID: new-1"));
}
