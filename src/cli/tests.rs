//! Unit tests for CLI commands

use std::io::Write;

use crate::cli::{execute, Cli, Commands};
use crate::config::{LogFormat, RouterConfig};
use clap::Parser;

const MANIFEST: &str = r#"
[[route]]
name = "get_user"
methods = "GET"
pattern = "/users/{id}"

[[route]]
name = "secret"
methods = "GET|POST"
pattern = "/secret"
middleware = [{ kind = "query_token", param = "token", token = "s3cret" }]
"#;

fn manifest_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MANIFEST.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> serde_json::Value {
    let cli = Cli::try_parse_from(args).unwrap();
    execute(&cli.command, &RouterConfig::default()).unwrap()
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from([
        "routegate",
        "match",
        "--pattern",
        "/pets/{id}",
        "--path",
        "/pets/1",
    ])
    .unwrap();

    match cli.command {
        Commands::Match { pattern, path } => {
            assert_eq!(pattern, "/pets/{id}");
            assert_eq!(path, "/pets/1");
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "routegate",
        "routes",
        "--routes",
        "r.toml",
        "--log-format",
        "pretty",
        "--config",
        "c.toml",
    ])
    .unwrap();
    assert_eq!(cli.log_format, Some(LogFormat::Pretty));
    assert_eq!(cli.config.unwrap().to_string_lossy(), "c.toml");
}

#[test]
fn test_resolve_defaults_to_get() {
    let cli = Cli::try_parse_from(["routegate", "resolve", "--routes", "r.toml", "--path", "/"])
        .unwrap();
    match cli.command {
        Commands::Resolve { method, query, .. } => {
            assert_eq!(method, "GET");
            assert!(query.is_none());
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn test_match_output() {
    let out = run(&[
        "routegate",
        "match",
        "--pattern",
        "/users/{id}/files/:",
        "--path",
        "/users/7/files/a/b.txt",
    ]);
    assert_eq!(out["matched"], true);
    assert_eq!(out["params"]["id"], "7");
    assert_eq!(out["params"]["{catchAll}"], "a/b.txt");

    let out = run(&["routegate", "match", "--pattern", "/a", "--path", "/b"]);
    assert_eq!(out["matched"], false);
    assert!(out["params"].is_null());
}

#[test]
fn test_match_malformed_pattern_fails() {
    let cli = Cli::try_parse_from(["routegate", "match", "--pattern", "/a/{", "--path", "/a"])
        .unwrap();
    let err = execute(&cli.command, &RouterConfig::default()).unwrap_err();
    assert!(err.to_string().contains("malformed pattern"));
}

#[test]
fn test_resolve_executed_and_unmatched() {
    let file = manifest_file();
    let routes = file.path().to_str().unwrap();

    let out = run(&["routegate", "resolve", "--routes", routes, "--path", "/users/42"]);
    assert_eq!(out["status"], 200);
    assert_eq!(out["body"]["route"], "get_user");
    assert_eq!(out["body"]["params"]["id"], "42");

    let out = run(&["routegate", "resolve", "--routes", routes, "--path", "/nowhere"]);
    assert_eq!(out["status"], 404);
    assert_eq!(out["body"]["message"], "Could not find /nowhere");
}

#[test]
fn test_resolve_query_flag_and_denial() {
    let file = manifest_file();
    let routes = file.path().to_str().unwrap();

    let out = run(&[
        "routegate", "resolve", "--routes", routes, "--method", "post", "--path", "/secret",
        "--query", "token=s3cret",
    ]);
    assert_eq!(out["status"], 200);
    assert_eq!(out["body"]["route"], "secret");
    assert_eq!(out["body"]["method"], "POST");

    let out = run(&["routegate", "resolve", "--routes", routes, "--path", "/secret?token=x"]);
    assert_eq!(out["status"], 401);
    assert_eq!(out["body"]["success"], false);
    assert_eq!(out["body"]["message"], "Access denied");
}

#[test]
fn test_routes_listing() {
    let file = manifest_file();
    let routes = file.path().to_str().unwrap();
    let out = run(&["routegate", "routes", "--routes", routes]);
    let listed = out["routes"].as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed
        .iter()
        .any(|r| r["method"] == "POST" && r["pattern"] == "/secret"));
}
