mod common;

use common::*;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

fn run(args: &[&str], files: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mp4erase"))
        .args(args)
        .args(files)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run mp4erase")
}

#[test]
fn success_is_silent_and_erases_every_file() {
    let a = temp_file(&full_drm_file());
    let b = temp_file(&drm_file(&[(b"ownr", b"x")]));

    let out = run(&[], &[a.path(), b.path()]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());

    for f in [&a, &b] {
        let after = std::fs::read(f.path()).unwrap();
        let tree = mp4erase::parse_all(&mut std::io::Cursor::new(&full_drm_file())).unwrap();
        let pinf = mp4erase::find(&tree, tag(b"pinf")).found().unwrap();
        assert!(after[pinf.data_start_pos as usize..pinf.end_pos() as usize]
            .iter()
            .all(|&b| b == 0));
    }
}

#[test]
fn batch_stops_at_first_failing_file() {
    let missing = temp_file(&atom(b"ftyp", b"M4A \x00\x00\x00\x00"));
    let good_bytes = full_drm_file();
    let good = temp_file(&good_bytes);

    let out = run(&[], &[missing.path(), good.path()]);
    assert!(!out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(&missing.path().display().to_string()), "{}", stderr);
    assert!(stderr.contains("atom not found: pinf"), "{}", stderr);

    // the second file was never touched
    assert_eq!(std::fs::read(good.path()).unwrap(), good_bytes);
}

#[test]
fn dump_prints_payload_before_and_after() {
    let f = temp_file(&full_drm_file());
    let out = run(&["--dump", "-t", "ownr"], &[f.path()]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ownr payload"), "{}", stdout);
    assert!(stdout.contains("|Some One|"), "{}", stdout);
    assert!(stdout.contains("-- after --"), "{}", stdout);
    assert!(stdout.contains("00 00 00 00 00 00 00 00"), "{}", stdout);
}

#[test]
fn tree_and_dump_conflict() {
    let bytes = full_drm_file();
    let f = temp_file(&bytes);
    let out = run(&["--tree", "--dump"], &[f.path()]);
    assert!(!out.status.success());
    assert_eq!(std::fs::read(f.path()).unwrap(), bytes);
}

#[test]
fn tree_prints_json_without_erasing() {
    let bytes = full_drm_file();
    let f = temp_file(&bytes);
    let out = run(&["--tree"], &[f.path()]);
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["moov"]["children"]["udta"]["children"]["meta"]["children"]["ilst"]
        ["children"]["ownr"]["data_len"], 8);
    assert_eq!(std::fs::read(f.path()).unwrap(), bytes);
}
