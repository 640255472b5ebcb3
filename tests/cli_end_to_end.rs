#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use std::io::Write;

fn hub_cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hub-cli"));
    cmd.env_remove("HUB_BASE_URL")
        .env_remove("HUB_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn posts_list_works_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/wp-json/wp/v2/posts")
            .query_param("per_page", "2");
        then.status(200)
            .header("content-type", "application/json")
            .header("X-WP-TotalPages", "3")
            .header("X-WP-Total", "6")
            .body(r#"[{"id": 7, "slug": "spark-tuning", "date": "2024-01-01T00:00:00", "title": {"rendered": "Spark Tuning"}, "excerpt": {"rendered": "<p>Faster jobs</p>"}, "content": {"rendered": "<p>shuffle less</p>"}}]"#);
    });

    let assert = hub_cli()
        .env("HUB_BASE_URL", server.url("/wp-json/wp/v2"))
        .args(["posts", "list", "--per-page", "2"])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"slug\": \"spark-tuning\""));
    assert!(output.contains("\"totalPages\": 3"));
    assert!(output.contains("\"readTime\": \"1 min read\""));
    mock.assert();
}

#[test]
fn base_url_can_come_from_config_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/wp-json/wp/v2/categories")
            .query_param("per_page", "100");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id": 3, "name": "AWS", "slug": "aws", "count": 4}]"#);
    });

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp file");
    writeln!(
        file,
        "[api]\nbase_url = \"{}\"",
        server.url("/wp-json/wp/v2")
    )
    .expect("write config");

    hub_cli()
        .arg("--config-file")
        .arg(file.path())
        .args(["categories", "resolve", "aws"])
        .assert()
        .success()
        .stdout(contains("\"id\": 3"));
    mock.assert();
}

#[test]
fn unknown_category_fails_with_available_slugs() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/wp-json/wp/v2/categories");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id": 3, "name": "AWS", "slug": "aws", "count": 4}, {"id": 8, "name": "SQL", "slug": "sql", "count": 1}]"#);
    });

    hub_cli()
        .env("HUB_BASE_URL", server.url("/wp-json/wp/v2"))
        .args(["categories", "resolve", "postgres"])
        .assert()
        .failure()
        .stderr(contains("CategoryNotFound"))
        .stderr(contains("postgres"));
}

#[test]
fn invalid_base_url_fails_fast() {
    hub_cli()
        .args(["--base-url", "ftp://example.com", "posts", "get", "anything"])
        .assert()
        .failure()
        .stderr(contains("api.base_url"));
}
