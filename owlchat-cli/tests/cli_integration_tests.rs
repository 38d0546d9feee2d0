//! Integration tests for the owlchat binary.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use predicates::prelude::PredicateBooleanExt;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

const OFFLINE_HOST: &str = "http://127.0.0.1:9";

fn owlchat(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("owlchat");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("OWLCHAT_DATABASE_HOST")
        .env_remove("OWLCHAT_DATABASE_PATH")
        .env_remove("OWLCHAT_AUTH_PATH")
        .env_remove("OWLCHAT_LOG_LEVEL")
        .env_remove("OWLCHAT_LOG_FORMAT")
        .current_dir(home.path())
        .timeout(Duration::from_secs(10));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Command-line client for OwlChat"))
        .stdout(predicates::str::contains("workspaces"))
        .stdout(predicates::str::contains("init"))
        .stdout(predicates::str::contains("watch"))
        .stdout(predicates::str::contains("--host"));
}

#[test]
fn test_post_requires_username() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["post", "team", "general", "hello"])
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "the following required arguments were not provided",
        ))
        .stderr(predicates::str::contains("--as <USERNAME>"));
}

#[test]
fn test_react_rejects_unknown_kind() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["react", "/team/channels/general/posts/1", "shrug", "--as", "ada"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}

#[test]
fn test_blank_login_is_rejected() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["login", "  ", "--host", OFFLINE_HOST])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Please enter a non-empty username."));
}

#[test]
fn test_commands_require_login() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["workspaces", "list", "--host", OFFLINE_HOST])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Not logged in"));
}

#[test]
fn test_init_requires_login() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["init", "--host", OFFLINE_HOST])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to create the database"))
        .stderr(predicates::str::contains("Not logged in"));
}

#[test]
fn test_login_connection_failure() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["login", "ada", "--host", OFFLINE_HOST])
        .assert()
        .failure()
        .stderr(
            predicates::str::contains("login failed").and(predicates::str::contains("Network error")),
        );
    assert!(!home.path().join(".config/owlchat/token").exists());
}

#[test]
fn test_invalid_host_is_a_configuration_error() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["logout", "--host", "not a url"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Invalid configuration: database.host"));
}

#[test]
fn test_completion_script() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["completion", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicates::str::contains("owlchat"));
}

#[test]
fn test_config_generation() {
    let home = TempDir::new().unwrap();
    owlchat(&home)
        .args(["config", "--format", "json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("owlchat.json"));

    let written = std::fs::read_to_string(home.path().join("owlchat.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["database"]["host"], "http://localhost:3318");

    owlchat(&home)
        .args(["config", "--format", "toml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format"));
}

#[derive(Clone, Default)]
struct Seen {
    paths: Arc<Mutex<Vec<String>>>,
}

async fn handle(State(seen): State<Seen>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    seen.paths
        .lock()
        .unwrap()
        .push(format!("{method} {}", uri.path()));
    let meta = json!({"createdBy": "ada", "createdAt": 1, "lastModifiedBy": "ada", "lastModifiedAt": 1});

    if uri.path() == "/auth" {
        return match method {
            Method::POST => (
                [(header::CONTENT_TYPE, "application/json")],
                json!({"token": "tok"}).to_string(),
            )
                .into_response(),
            _ => StatusCode::NO_CONTENT.into_response(),
        };
    }
    if headers.get(header::AUTHORIZATION).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let body = match uri.path() {
        "/v1/owlchat/" => json!([{"path": "/team", "meta": meta, "doc": {}}]),
        "/v1/owlchat/team/channels/general/posts/" => json!([
            {"path": "/team/channels/general/posts/2", "meta": {"createdBy": "bob", "createdAt": 2, "lastModifiedBy": "bob", "lastModifiedAt": 2},
             "doc": {"msg": "a **reply**", "parent": "/team/channels/general/posts/1"}},
            {"path": "/team/channels/general/posts/1", "meta": meta,
             "doc": {"msg": "first", "reactions": {"like": ["bob", "cy"]}}}
        ]),
        _ => json!({"uri": uri.path()}),
    };
    ([(header::CONTENT_TYPE, "application/json")], body.to_string()).into_response()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_against_mock_database() {
    let seen = Seen::default();
    let app = Router::new().fallback(handle).with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let home = TempDir::new().unwrap();
    let run = move |args: Vec<&'static str>, host: String| {
        let home_path = home.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            let mut cmd = cargo_bin_cmd!("owlchat");
            cmd.env("HOME", &home_path)
                .env("XDG_CONFIG_HOME", home_path.join(".config"))
                .args(args)
                .args(["--host", &host])
                .timeout(Duration::from_secs(10))
                .output()
                .unwrap()
        })
    };

    let login = run(vec!["login", "ada"], host.clone()).await.unwrap();
    assert!(login.status.success());
    assert!(String::from_utf8_lossy(&login.stdout).contains("Logged in as"));

    let init = run(vec!["init"], host.clone()).await.unwrap();
    assert!(init.status.success());
    assert!(String::from_utf8_lossy(&init.stdout).contains("Created database"));

    let list = run(vec!["workspaces", "list"], host.clone()).await.unwrap();
    assert_eq!(String::from_utf8_lossy(&list.stdout).trim(), "- team");

    let duplicate = run(vec!["workspaces", "create", "team"], host.clone())
        .await
        .unwrap();
    assert!(!duplicate.status.success());
    assert!(String::from_utf8_lossy(&duplicate.stderr).contains("Workspace \"team\" already exists"));

    let feed = run(vec!["posts", "team", "general"], host.clone()).await.unwrap();
    let feed = String::from_utf8_lossy(&feed.stdout).to_string();
    let first = feed.find("first").unwrap();
    let reply = feed.find("reply").unwrap();
    assert!(first < reply);
    assert!(feed.contains("\u{1F44D} 2"));

    let logout = run(vec!["logout"], host.clone()).await.unwrap();
    assert!(logout.status.success());

    let paths = seen.paths.lock().unwrap().clone();
    assert!(paths.contains(&"POST /auth".to_string()));
    assert!(paths.contains(&"DELETE /auth".to_string()));
    let puts: Vec<_> = paths.iter().filter(|p| p.starts_with("PUT")).collect();
    assert_eq!(puts, vec!["PUT /v1/owlchat"]);
}
