use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use modsync_core::{ModEntry, ModId};
use modsync_source::{HttpClient, HttpResponse};

use crate::{apply, AppliedEntry, EntryStatus, ModlistSource};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let sequence = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!(
        "modsync-installer-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ));
    fs::create_dir_all(&path).expect("must create test dir");
    path
}

/// Serves the same payload for every request and counts how many were made.
struct CountingHttp {
    status: u16,
    payload: Vec<u8>,
    calls: AtomicU64,
}

impl CountingHttp {
    fn serving(payload: &[u8]) -> Self {
        Self {
            status: 200,
            payload: payload.to_vec(),
            calls: AtomicU64::new(0),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            status,
            payload: Vec::new(),
            calls: AtomicU64::new(0),
        }
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl HttpClient for CountingHttp {
    fn get(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        _query: &[(String, String)],
    ) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(HttpResponse {
            status: self.status,
            body: self.payload.clone(),
        })
    }
}

fn entry(name: &str, file_name: &str) -> ModEntry {
    ModEntry {
        name: name.to_string(),
        mod_id: ModId::Numeric(1),
        output_dir: "mods".to_string(),
        file_name: file_name.to_string(),
        download_url: format!("https://x/{file_name}"),
    }
}

fn ignore_progress() -> impl FnMut(&AppliedEntry) {
    |_: &AppliedEntry| {}
}

#[test]
fn fresh_install_creates_the_bracketed_artifact() {
    let dir = test_dir();
    let http = CountingHttp::serving(b"jar-bytes");
    let entries = vec![entry("fabric_api", "fabric-api-0.1.jar")];

    let report = apply(&entries, &dir, &http, &mut ignore_progress()).expect("must apply");

    let expected = dir.join("mods").join("[fabric_api]fabric-api-0.1.jar");
    assert!(expected.is_file());
    assert_eq!(
        fs::read(&expected).expect("must read artifact"),
        b"jar-bytes"
    );
    assert_eq!(http.calls(), 1);
    assert!(report.confirmed.contains(&expected));
    assert!(report.removed.is_empty());
    assert_eq!(report.entries[0].status, EntryStatus::Downloaded);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn second_apply_is_idempotent_with_zero_network_calls() {
    let dir = test_dir();
    let http = CountingHttp::serving(b"jar-bytes");
    let entries = vec![entry("fabric_api", "fabric-api-0.1.jar")];

    apply(&entries, &dir, &http, &mut ignore_progress()).expect("first apply");
    let report = apply(&entries, &dir, &http, &mut ignore_progress()).expect("second apply");

    assert_eq!(http.calls(), 1, "second run must not touch the network");
    assert!(report.removed.is_empty());
    assert_eq!(report.entries[0].status, EntryStatus::UpToDate);
    assert!(dir
        .join("mods")
        .join("[fabric_api]fabric-api-0.1.jar")
        .is_file());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unreferenced_managed_file_is_deleted() {
    let dir = test_dir();
    fs::create_dir_all(dir.join("mods")).expect("must create mods dir");
    fs::write(dir.join("mods").join("[old_mod]stale.jar"), b"stale").expect("must write stale");

    let http = CountingHttp::serving(b"jar-bytes");
    let entries = vec![entry("fabric_api", "fabric-api-0.1.jar")];

    let report = apply(&entries, &dir, &http, &mut ignore_progress()).expect("must apply");

    assert!(!dir.join("mods").join("[old_mod]stale.jar").exists());
    assert!(dir
        .join("mods")
        .join("[fabric_api]fabric-api-0.1.jar")
        .is_file());
    assert_eq!(report.removed.len(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn emptied_directories_are_pruned_deepest_first() {
    let dir = test_dir();
    let nested = dir.join("mods").join("old").join("deep");
    fs::create_dir_all(&nested).expect("must create nested dirs");
    fs::write(nested.join("abandoned.jar"), b"stale").expect("must write stale");

    let http = CountingHttp::serving(b"jar-bytes");
    let entries = vec![entry("fabric_api", "fabric-api-0.1.jar")];

    apply(&entries, &dir, &http, &mut ignore_progress()).expect("must apply");

    assert!(!nested.exists());
    assert!(!dir.join("mods").join("old").exists());
    assert!(dir.join("mods").is_dir());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn confirmed_artifacts_survive_the_same_pass() {
    let dir = test_dir();
    fs::create_dir_all(dir.join("mods")).expect("must create mods dir");
    // Present before the run and still referenced: must never be deleted.
    fs::write(dir.join("mods").join("[ding]ding-1.3.0.jar"), b"old-bytes")
        .expect("must write existing");

    let http = CountingHttp::serving(b"jar-bytes");
    let entries = vec![
        entry("ding", "ding-1.3.0.jar"),
        entry("fabric_api", "fabric-api-0.1.jar"),
    ];

    let report = apply(&entries, &dir, &http, &mut ignore_progress()).expect("must apply");

    assert!(dir.join("mods").join("[ding]ding-1.3.0.jar").is_file());
    assert_eq!(
        fs::read(dir.join("mods").join("[ding]ding-1.3.0.jar")).expect("must read"),
        b"old-bytes",
        "an up-to-date artifact is not re-downloaded"
    );
    assert_eq!(report.confirmed.len(), 2);
    assert!(report.removed.is_empty());
    assert_eq!(http.calls(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_download_skips_that_entry_and_continues() {
    let dir = test_dir();
    let http = CountingHttp::failing(502);
    let entries = vec![
        entry("broken", "broken-1.0.jar"),
        entry("also_broken", "also-broken-1.0.jar"),
    ];

    let report =
        apply(&entries, &dir, &http, &mut ignore_progress()).expect("failures must not abort");

    assert_eq!(http.calls(), 2, "every entry is still attempted");
    assert!(report.confirmed.is_empty());
    assert!(report
        .entries
        .iter()
        .all(|applied| applied.status == EntryStatus::Failed));
    assert!(!dir.join("mods").join("[broken]broken-1.0.jar").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn observer_sees_every_entry_in_order() {
    let dir = test_dir();
    let http = CountingHttp::serving(b"jar-bytes");
    let entries = vec![
        entry("alpha", "alpha-1.0.jar"),
        entry("beta", "beta-1.0.jar"),
    ];

    let mut seen = Vec::new();
    apply(&entries, &dir, &http, &mut |applied: &AppliedEntry| {
        seen.push(applied.name.clone());
    })
    .expect("must apply");

    assert_eq!(seen, vec!["alpha", "beta"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn modlist_source_prefers_local_when_asked() {
    let dir = test_dir();
    let local = dir.join("modlist.json");
    fs::write(
        &local,
        r#"[{"name": "ding", "mod_id": 231275, "output_dir": "mods",
            "file_name": "ding-1.3.0.jar", "download_url": "https://x/ding-1.3.0.jar"}]"#,
    )
    .expect("must write modlist");

    let source = ModlistSource {
        local,
        remote: Some("https://raw.example.test/modlist.json".to_string()),
    };
    let http = CountingHttp::failing(500);

    let entries = source.load(&http, true).expect("must load locally");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "ding");
    assert_eq!(http.calls(), 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn modlist_source_fetches_remote_copy() {
    let dir = test_dir();
    let payload = br#"[{"name": "ding", "mod_id": 231275, "output_dir": "mods",
        "file_name": "ding-1.3.0.jar", "download_url": "https://x/ding-1.3.0.jar"}]"#;

    let source = ModlistSource {
        local: dir.join("missing.json"),
        remote: Some("https://raw.example.test/modlist.json".to_string()),
    };
    let http = CountingHttp::serving(payload);

    let entries = source.load(&http, false).expect("must load remotely");
    assert_eq!(entries.len(), 1);
    assert_eq!(http.calls(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn remote_modlist_failure_is_fatal() {
    let dir = test_dir();
    let source = ModlistSource {
        local: dir.join("missing.json"),
        remote: Some("https://raw.example.test/modlist.json".to_string()),
    };
    let http = CountingHttp::failing(404);

    let err = source
        .load(&http, false)
        .expect_err("unreachable remote modlist must fail the run");
    assert!(err.to_string().contains("could not fetch remote modlist"));

    let _ = fs::remove_dir_all(&dir);
}
