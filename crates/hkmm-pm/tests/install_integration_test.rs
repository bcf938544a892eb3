//! Integration tests for the mod installer
//!
//! These tests run the full resolve, fetch, place and recurse pipeline
//! against an in-process HTTP server standing in for the mod hosts.

mod common;

use std::sync::Arc;

use common::{
    file_set, manifest_entry, truncated_response, write_modlinks, zip_bytes, FakeServer, RecordingListener, Route,
};
use hkmm_pm::downloader::compute_sha256;
use hkmm_pm::{ArtifactFetcher, HttpClient, ManifestStore, ModError, ModInstaller};
use tempfile::TempDir;

fn installer(temp: &TempDir, entries: &[String]) -> ModInstaller {
    let path = write_modlinks(temp.path(), entries);
    let manifest = ManifestStore::new(path).load().unwrap();
    let fetcher = ArtifactFetcher::new(Arc::new(HttpClient::new().unwrap()));
    ModInstaller::new(manifest, fetcher)
}

#[test]
fn test_round_trip_zip_without_readme() {
    let server = FakeServer::start(vec![(
        "/m.zip",
        Route::ok(zip_bytes(&[("Mod.dll", "assembly"), ("README.md", "docs")])),
    )]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("M", &server.url("/m.zip"), &[])]);

    let report = installer.install(&mods_root, "M").unwrap();

    assert_eq!(report.installed, vec!["M"]);
    assert_eq!(report.path, mods_root.join("M"));
    assert!(!report.has_warnings());
    assert_eq!(std::fs::read(mods_root.join("M/Mod.dll")).unwrap(), b"assembly");
    assert!(!mods_root.join("M/README.md").exists());
}

#[test]
fn test_destination_named_after_mod_not_file() {
    let server = FakeServer::start(vec![(
        "/download/42",
        Route::ok(zip_bytes(&[("Lib/Core.dll", "core"), ("Core.pdb", "pdb")]))
            .attachment("Some-Release-1.2.zip"),
    )]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("Core Lib", &server.url("/download/42"), &[])]);

    installer.install(&mods_root, "Core Lib").unwrap();

    assert_eq!(file_set(&mods_root.join("Core Lib")), vec!["Core.pdb", "Lib/Core.dll"]);
    assert!(!mods_root.join("Some-Release-1.2").exists());
}

#[test]
fn test_non_archive_is_copied_verbatim() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(50_000).collect();
    let server = FakeServer::start(vec![(
        "/files/raw",
        Route::ok(payload.clone()).attachment("Satchel.dll"),
    )]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("Satchel", &server.url("/files/raw"), &[])]);

    installer.install(&mods_root, "Satchel").unwrap();

    assert_eq!(file_set(&mods_root.join("Satchel")), vec!["Satchel.dll"]);
    assert_eq!(std::fs::read(mods_root.join("Satchel/Satchel.dll")).unwrap(), payload);
}

#[test]
fn test_unknown_mod_fails_without_writes() {
    let server = FakeServer::start(vec![("/m.zip", Route::ok(zip_bytes(&[("Mod.dll", "x")])))]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("M", &server.url("/m.zip"), &[])]);

    let err = installer.install(&mods_root, "Missing").unwrap_err();

    assert!(matches!(err, ModError::ModNotFound { ref name } if name == "Missing"));
    assert_eq!(err.exit_code(), 2);
    assert!(!mods_root.exists());
    assert_eq!(server.hits("/m.zip"), 0);
}

#[test]
fn test_failed_dependency_is_a_warning() {
    let server = FakeServer::start(vec![
        ("/parent.zip", Route::ok(zip_bytes(&[("Parent.dll", "p")]))),
        ("/b.zip", Route::ok(zip_bytes(&[("B.dll", "b")]))),
    ]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let listener = Arc::new(RecordingListener::default());
    let installer = installer(
        &temp,
        &[
            manifest_entry("Parent", &server.url("/parent.zip"), &["A", "B"]),
            manifest_entry("B", &server.url("/b.zip"), &[]),
        ],
    )
    .with_listener(listener.clone());

    let report = installer.install(&mods_root, "Parent").unwrap();

    assert_eq!(report.installed, vec!["Parent", "B"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].parent, "Parent");
    assert_eq!(report.failures[0].name, "A");
    assert_eq!(report.failures[0].exit_code, 2);
    assert!(mods_root.join("Parent/Parent.dll").exists());
    assert!(mods_root.join("B/B.dll").exists());
    assert!(!mods_root.join("A").exists());
    assert!(listener.events().contains(&"warning:Parent->A".to_string()));
}

#[test]
fn test_dependency_download_failure_does_not_stop_siblings() {
    let server = FakeServer::start(vec![
        ("/parent.zip", Route::ok(zip_bytes(&[("Parent.dll", "p")]))),
        ("/broken.zip", Route::status(500)),
        ("/c.dll", Route::ok(b"c".to_vec())),
    ]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(
        &temp,
        &[
            manifest_entry("Parent", &server.url("/parent.zip"), &["Broken", "C"]),
            manifest_entry("Broken", &server.url("/broken.zip"), &[]),
            manifest_entry("C", &server.url("/c.dll"), &[]),
        ],
    );

    let report = installer.install(&mods_root, "Parent").unwrap();

    assert_eq!(report.installed, vec!["Parent", "C"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Broken");
    assert_eq!(report.failures[0].exit_code, 3);
    assert_eq!(std::fs::read(mods_root.join("C/c.dll")).unwrap(), b"c");
}

#[test]
fn test_transitive_dependencies_installed_depth_first() {
    let server = FakeServer::start(vec![
        ("/a.zip", Route::ok(zip_bytes(&[("A.dll", "a")]))),
        ("/b.zip", Route::ok(zip_bytes(&[("B.dll", "b")]))),
        ("/c.zip", Route::ok(zip_bytes(&[("C.dll", "c")]))),
        ("/d.zip", Route::ok(zip_bytes(&[("D.dll", "d")]))),
    ]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(
        &temp,
        &[
            manifest_entry("A", &server.url("/a.zip"), &["B", "D"]),
            manifest_entry("B", &server.url("/b.zip"), &["C"]),
            manifest_entry("C", &server.url("/c.zip"), &[]),
            manifest_entry("D", &server.url("/d.zip"), &[]),
        ],
    );

    let report = installer.install(&mods_root, "A").unwrap();

    assert_eq!(report.installed, vec!["A", "B", "C", "D"]);
    for name in ["A", "B", "C", "D"] {
        assert!(mods_root.join(name).join(format!("{}.dll", name)).exists());
    }
}

#[test]
fn test_cyclic_dependencies_terminate() {
    let server = FakeServer::start(vec![
        ("/a.zip", Route::ok(zip_bytes(&[("A.dll", "a")]))),
        ("/b.zip", Route::ok(zip_bytes(&[("B.dll", "b")]))),
    ]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let listener = Arc::new(RecordingListener::default());
    let installer = installer(
        &temp,
        &[
            manifest_entry("A", &server.url("/a.zip"), &["B"]),
            manifest_entry("B", &server.url("/b.zip"), &["A"]),
        ],
    )
    .with_listener(listener.clone());

    let report = installer.install(&mods_root, "A").unwrap();

    assert_eq!(report.installed, vec!["A", "B"]);
    assert_eq!(report.skipped, vec!["A"]);
    assert!(report.failures.is_empty());
    assert_eq!(server.hits("/a.zip"), 1);
    assert!(listener.events().contains(&"skipped:A".to_string()));
}

#[test]
fn test_install_twice_is_idempotent() {
    let server = FakeServer::start(vec![
        (
            "/m.zip",
            Route::ok(zip_bytes(&[("Mod.dll", "m"), ("Data/", ""), ("Data/a.json", "{}"), ("README.txt", "r")])),
        ),
        ("/dep.dll", Route::ok(b"dep".to_vec())),
    ]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(
        &temp,
        &[
            manifest_entry("M", &server.url("/m.zip"), &["Dep"]),
            manifest_entry("Dep", &server.url("/dep.dll"), &[]),
        ],
    );

    installer.install(&mods_root, "M").unwrap();
    let first = (file_set(&mods_root.join("M")), file_set(&mods_root.join("Dep")));
    installer.install(&mods_root, "M").unwrap();
    let second = (file_set(&mods_root.join("M")), file_set(&mods_root.join("Dep")));

    assert_eq!(first, second);
    assert_eq!(first.0, vec!["Data/a.json", "Mod.dll"]);
    // Dependencies are fetched again on every install
    assert_eq!(server.hits("/dep.dll"), 2);
}

#[test]
fn test_reinstall_keeps_stale_files() {
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let stale = mods_root.join("M").join("Old.dll");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, b"old layout").unwrap();

    let server = FakeServer::start(vec![("/m.zip", Route::ok(zip_bytes(&[("New.dll", "new")])))]);
    let installer = installer(&temp, &[manifest_entry("M", &server.url("/m.zip"), &[])]);

    installer.install(&mods_root, "M").unwrap();

    assert_eq!(file_set(&mods_root.join("M")), vec!["New.dll", "Old.dll"]);
}

#[test]
fn test_top_level_download_failure() {
    let server = FakeServer::start(vec![]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("M", &server.url("/gone.zip"), &[])]);

    let err = installer.install(&mods_root, "M").unwrap_err();

    match &err {
        ModError::DownloadFailed { status, .. } => assert_eq!(*status, Some(404)),
        other => panic!("Expected DownloadFailed, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!mods_root.join("M").exists());
}

#[test]
fn test_top_level_corrupt_archive() {
    let server = FakeServer::start(vec![("/m.zip", Route::ok(b"PK but not really".to_vec()))]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("M", &server.url("/m.zip"), &[])]);

    let err = installer.install(&mods_root, "M").unwrap_err();

    match &err {
        ModError::UnpackFailed { artifact, .. } => assert_eq!(artifact, "m.zip"),
        other => panic!("Expected UnpackFailed, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 4);
    // A failed placement leaves the mod uninstalled
    assert!(!mods_root.join("M").exists());
}

#[test]
fn test_dependency_unpack_failure_does_not_stop_parent() {
    let server = FakeServer::start(vec![
        ("/parent.zip", Route::ok(zip_bytes(&[("Parent.dll", "p")]))),
        ("/corrupt.zip", Route::ok(b"not an archive".to_vec())),
        ("/c.zip", Route::ok(zip_bytes(&[("C.dll", "c")]))),
    ]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let listener = Arc::new(RecordingListener::default());
    let installer = installer(
        &temp,
        &[
            manifest_entry("Parent", &server.url("/parent.zip"), &["Corrupt", "C"]),
            manifest_entry("Corrupt", &server.url("/corrupt.zip"), &[]),
            manifest_entry("C", &server.url("/c.zip"), &[]),
        ],
    )
    .with_listener(listener.clone());

    let report = installer.install(&mods_root, "Parent").unwrap();

    assert_eq!(report.installed, vec!["Parent", "C"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Corrupt");
    assert_eq!(report.failures[0].exit_code, 4);
    assert!(!mods_root.join("Corrupt").exists());
    assert!(mods_root.join("C/C.dll").exists());
    assert!(listener.events().contains(&"warning:Parent->Corrupt".to_string()));
}

#[test]
fn test_blank_dependency_names_are_ignored() {
    let server = FakeServer::start(vec![("/m.zip", Route::ok(zip_bytes(&[("Mod.dll", "m")])))]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let listener = Arc::new(RecordingListener::default());
    let installer = installer(&temp, &[manifest_entry("M", &server.url("/m.zip"), &["", "   "])])
        .with_listener(listener.clone());

    let report = installer.install(&mods_root, "M").unwrap();

    assert_eq!(report.installed, vec!["M"]);
    assert!(report.failures.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(listener.events(), vec!["download:M", "installed:M"]);
    assert_eq!(file_set(&mods_root), vec!["M/Mod.dll"]);
}

#[test]
fn test_connection_dropped_mid_download() {
    let (url, handle) = truncated_response("/cut.zip", 10_000, b"PK partial body");
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let installer = installer(&temp, &[manifest_entry("M", &url, &[])]);

    let err = installer.install(&mods_root, "M").unwrap_err();
    handle.join().unwrap();

    match &err {
        ModError::DownloadFailed { status, url: failed, .. } => {
            assert_eq!(*status, None);
            assert_eq!(failed, &url);
        }
        other => panic!("Expected DownloadFailed, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!mods_root.join("M").exists());
}

fn record_progress(body_len: usize) -> Vec<(u64, u64)> {
    let server = FakeServer::start(vec![("/big.dll", Route::ok(vec![7u8; body_len]))]);
    let temp = TempDir::new().unwrap();
    let mods_root = temp.path().join("Mods");
    let listener = Arc::new(RecordingListener::default());
    let installer = installer(&temp, &[manifest_entry("Big", &server.url("/big.dll"), &[])])
        .with_listener(listener.clone());

    installer.install(&mods_root, "Big").unwrap();

    let progress = listener.progress.lock().unwrap();
    progress.clone()
}

#[test]
fn test_progress_with_known_length() {
    // Small enough for the server to send a Content-Length, larger than one chunk
    let progress = record_progress(30_000);

    assert!(progress.len() > 1);
    assert!(progress.windows(2).all(|w| w[0].0 < w[1].0));
    assert_eq!(progress.last().unwrap().0, 30_000);
    assert!(progress.iter().all(|(_, total)| *total == 30_000));
}

#[test]
fn test_progress_with_unknown_length() {
    // Large bodies are sent chunked, without a Content-Length
    let progress = record_progress(100_000);

    assert!(progress.len() > 1);
    assert!(progress.windows(2).all(|w| w[0].0 < w[1].0));
    assert_eq!(progress.last().unwrap().0, 100_000);
    assert!(progress.iter().all(|(_, total)| *total == 0));
}

#[test]
fn test_checksum_is_verified_when_published() {
    let archive = zip_bytes(&[("Mod.dll", "checked")]);
    let temp = TempDir::new().unwrap();
    let sample = temp.path().join("sample.zip");
    std::fs::write(&sample, &archive).unwrap();
    let good = compute_sha256(&sample).unwrap();

    let server = FakeServer::start(vec![("/m.zip", Route::ok(archive))]);
    let link = server.url("/m.zip");
    let entry = |sha: &str| {
        format!(
            "<Manifest><Name>M</Name><Link SHA256=\"{}\">{}</Link></Manifest>",
            sha, link
        )
    };

    let mods_root = temp.path().join("Mods");
    let ok = installer(&temp, &[entry(&good.to_uppercase())]);
    ok.install(&mods_root, "M").unwrap();
    assert!(mods_root.join("M/Mod.dll").exists());

    let other_root = temp.path().join("Other");
    let bad = installer(&temp, &[entry(&"0".repeat(64))]);
    let err = bad.install(&other_root, "M").unwrap_err();
    assert!(matches!(err, ModError::ChecksumMismatch { .. }));
    assert!(!other_root.join("M").exists());
}

#[test]
fn test_fetched_artifact_is_removed_on_drop() {
    let server = FakeServer::start(vec![("/files/x.dll", Route::ok(b"x".to_vec()))]);
    let fetcher = ArtifactFetcher::new(Arc::new(HttpClient::new().unwrap()));

    let artifact = fetcher.fetch(&server.url("/files/x.dll"), None::<fn(u64, u64)>).unwrap();
    let path = artifact.path().to_path_buf();
    assert_eq!(artifact.filename(), "x.dll");
    assert_eq!(artifact.size(), 1);
    assert!(path.exists());

    drop(artifact);
    assert!(!path.exists());
    assert!(!path.parent().unwrap().exists());
}
