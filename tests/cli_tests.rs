use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NESTED_OPML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="2.0">
  <head><title>Subscriptions</title></head>
  <body>
    <outline text="One" type="rss" xmlUrl="https://one.example.com/feed"/>
    <outline text="Folder">
      <outline text="Two" type="rss" xmlUrl="https://two.example.com/feed"/>
      <outline text="Inner">
        <outline text="Three" type="rss" xmlUrl="https://three.example.com/feed"/>
      </outline>
    </outline>
  </body>
</opml>"#;

const THREE_ITEM_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Local</title>
    <link>https://local.example.com/</link>
    <description>Three posts</description>
    <item><title>First</title><link>https://local.example.com/1</link></item>
    <item><title>Second</title><link>https://local.example.com/2</link></item>
    <item><title>Third</title><link>https://local.example.com/3</link></item>
  </channel>
</rss>"#;

/// Serve `body` to a single request on a local port and return the feed URL.
fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/rss+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body.as_bytes());
        }
    });

    format!("http://{}/feed.xml", addr)
}

/// A URL on a local port nothing listens on.
fn unreachable_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{}/feed.xml", port)
}

/// A command pointed at a fresh database inside `dir`.
fn feedkeeper_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("feedkeeper").unwrap();
    cmd.env("FEEDKEEPER_DB_PATH", dir.path().join("feeds.db"))
        .env("FEEDKEEPER_FETCH_TIMEOUT", "2")
        .env_remove("FEEDKEEPER_SYNC_WORKERS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("items"));
}

#[test]
fn test_list_empty() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured"));
}

#[test]
fn test_list_json_empty() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_add_then_duplicate() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .args(["add", "https://example.com/feed", "--no-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subscribed: [1] https://example.com/feed"));

    feedkeeper_cmd(&dir)
        .args(["add", "https://example.com/feed", "--no-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already subscribed"));

    feedkeeper_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] https://example.com/feed"))
        .stdout(predicate::str::contains("[2]").not());
}

#[test]
fn test_remove_existing_and_missing() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .args(["add", "https://example.com/feed", "--no-sync"])
        .assert()
        .success();

    feedkeeper_cmd(&dir)
        .args(["remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed: [1] https://example.com/feed"));

    feedkeeper_cmd(&dir)
        .args(["remove", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_import_nested_opml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subs.opml");
    fs::write(&path, NESTED_OPML).unwrap();

    feedkeeper_cmd(&dir)
        .args(["import", path.to_str().unwrap(), "--no-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete: 3 added, 0 duplicates"));

    feedkeeper_cmd(&dir)
        .args(["import", path.to_str().unwrap(), "--no-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete: 0 added, 3 duplicates"));
}

#[test]
fn test_import_syncs_even_when_everything_is_duplicate() {
    let dir = TempDir::new().unwrap();
    let url = unreachable_url();
    let path = dir.path().join("one.opml");
    fs::write(
        &path,
        format!(
            r#"<opml version="2.0"><head/><body><outline text="Local" xmlUrl="{}"/></body></opml>"#,
            url
        ),
    )
    .unwrap();

    feedkeeper_cmd(&dir)
        .args(["import", path.to_str().unwrap(), "--no-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync complete").not());

    feedkeeper_cmd(&dir)
        .args(["import", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete: 0 added, 1 duplicates"))
        .stdout(predicate::str::contains("Fetching feeds..."))
        .stdout(predicate::str::contains("Sync complete"));
}

#[test]
fn test_import_empty_body() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.opml");
    fs::write(&path, r#"<opml version="2.0"><head/><body></body></opml>"#).unwrap();

    feedkeeper_cmd(&dir)
        .args(["import", path.to_str().unwrap(), "--no-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete: 0 added, 0 duplicates"));
}

#[test]
fn test_import_malformed_leaves_store_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.opml");
    fs::write(&path, "<opml><body><outline xmlUrl=\"https://x.example.com\">").unwrap();

    feedkeeper_cmd(&dir)
        .args(["import", path.to_str().unwrap(), "--no-sync"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed subscription list"));

    feedkeeper_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured"));
}

#[test]
fn test_import_missing_file() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .args(["import", "does-not-exist.opml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading does-not-exist.opml"));
}

#[test]
fn test_export_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.opml");

    feedkeeper_cmd(&dir)
        .args(["add", "https://example.com/feed", "--no-sync"])
        .assert()
        .success();

    feedkeeper_cmd(&dir)
        .args(["export", "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported feeds to"));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("https://example.com/feed"));
}

#[test]
fn test_sync_no_feeds() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetching feeds..."))
        .stdout(predicate::str::contains("No feeds configured"));
}

#[test]
fn test_sync_records_unreachable_feed() {
    let dir = TempDir::new().unwrap();
    let url = unreachable_url();

    feedkeeper_cmd(&dir)
        .args(["add", &url, "--no-sync"])
        .assert()
        .success();

    feedkeeper_cmd(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("! {}", url)))
        .stdout(predicate::str::contains("1 feeds failed"));
}

#[test]
fn test_sync_rejects_zero_workers_from_env() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .env("FEEDKEEPER_SYNC_WORKERS", "0")
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FEEDKEEPER_SYNC_WORKERS"));
}

#[test]
fn test_items_empty_and_show_missing() {
    let dir = TempDir::new().unwrap();

    feedkeeper_cmd(&dir)
        .arg("items")
        .assert()
        .success()
        .stdout(predicate::str::contains("No items found"));

    feedkeeper_cmd(&dir)
        .args(["show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found: item 1"));
}

#[test]
fn test_items_limit_reports_total() {
    let dir = TempDir::new().unwrap();
    let url = serve_once(THREE_ITEM_RSS);

    feedkeeper_cmd(&dir)
        .args(["add", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 new, 0 already stored"));

    feedkeeper_cmd(&dir)
        .args(["items", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 2 of 3 items"));

    feedkeeper_cmd(&dir)
        .arg("items")
        .assert()
        .success()
        .stdout(predicate::str::contains("Third"))
        .stdout(predicate::str::contains("Showing").not());
}
