use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_rundelta").to_string()
}

#[test]
fn cli_diff_patch_roundtrip() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("old.bin");
    let new = dir.path().join("new.bin");
    let package = dir.path().join("state.pkg");
    let output = dir.path().join("output.bin");

    std::fs::write(&old, b"abcde12345abcde12345").unwrap();
    std::fs::write(&new, b"abcdeXXXXXabcde12346").unwrap();

    let st = Command::new(bin())
        .args(["diff", "--threshold", "2", "--validate"])
        .arg(&old)
        .arg(&new)
        .arg(&package)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .arg("patch")
        .arg(&old)
        .arg(&package)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&new).unwrap()
    );
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("old.bin");
    let new = dir.path().join("new.bin");
    let package = dir.path().join("state.pkg");
    std::fs::write(&old, [0u8; 8]).unwrap();
    std::fs::write(&new, [1u8; 8]).unwrap();
    std::fs::write(&package, b"keep").unwrap();

    let st = Command::new(bin())
        .arg("diff")
        .arg(&old)
        .arg(&new)
        .arg(&package)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&package).unwrap(), b"keep");

    let st = Command::new(bin())
        .args(["--force", "diff"])
        .arg(&old)
        .arg(&new)
        .arg(&package)
        .status()
        .unwrap();
    assert!(st.success());
}

#[test]
fn cli_validate_reports_mismatch() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("old.bin");
    let new = dir.path().join("new.bin");
    let other = dir.path().join("other.bin");
    let package = dir.path().join("state.pkg");
    std::fs::write(&old, [0u8; 16]).unwrap();
    std::fs::write(&new, [0, 0, 9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    std::fs::write(&other, [9u8; 16]).unwrap();

    let st = Command::new(bin())
        .arg("diff")
        .arg(&old)
        .arg(&new)
        .arg(&package)
        .status()
        .unwrap();
    assert!(st.success());

    let ok = Command::new(bin())
        .arg("validate")
        .arg(&old)
        .arg(&new)
        .arg(&package)
        .status()
        .unwrap();
    assert!(ok.success());

    let bad = Command::new(bin())
        .args(["--quiet", "validate"])
        .arg(&old)
        .arg(&other)
        .arg(&package)
        .status()
        .unwrap();
    assert!(!bad.success());
}

#[test]
fn cli_inspect_and_sweep() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("old.bin");
    let new = dir.path().join("new.bin");
    let package = dir.path().join("state.pkg");
    std::fs::write(&old, [10, 20, 30, 40, 50]).unwrap();
    std::fs::write(&new, [10, 99, 98, 40, 51]).unwrap();

    let st = Command::new(bin())
        .args(["diff", "--threshold", "0"])
        .arg(&old)
        .arg(&new)
        .arg(&package)
        .status()
        .unwrap();
    assert!(st.success());

    let out = Command::new(bin())
        .arg("inspect")
        .arg(&package)
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("run count:     2"), "{text}");
    assert!(text.contains("touched bytes: 3"), "{text}");

    let out = Command::new(bin())
        .args(["sweep", "--max-threshold", "2"])
        .arg(&old)
        .arg(&new)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 4);
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
}
