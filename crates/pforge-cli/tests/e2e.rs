//! End-to-end tests for the pforge CLI.
//!
//! Each test builds a fake P toolchain out of shell scripts and runs the
//! real binary against it.

#![cfg(unix)]
#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const DOMAIN_COMPILER_OK: &str = r#"#!/bin/sh
out=""
for a in "$@"; do
  case "$a" in
    /outputDir:*) out="${a#/outputDir:}" ;;
  esac
done
echo "zing model" > "$out/output.zing"
echo "PCompiler: compiled $2"
"#;

const DOMAIN_COMPILER_FAIL: &str = r#"#!/bin/sh
echo "Foo.p (1, 1): syntax error near 'machin'"
echo "Compilation failed" 1>&2
exit 1
"#;

const MODEL_CHECKER: &str = r#"#!/bin/sh
[ -f SMRuntime.zing ] || { echo "SMRuntime.zing missing"; exit 1; }
lib=""
for a in "$@"; do
  case "$a" in
    /out:*) lib="${a#/out:}" ;;
  esac
done
echo "library" > "$lib"
"#;

const PROJECT_GENERATOR: &str = r#"#!/bin/sh
echo "main=$5" > "$1/$2.vcxproj"
"#;

const NATIVE_BUILD_OK: &str = r#"#!/bin/sh
dir=$(dirname "$1")
name=$(basename "$1" .vcxproj)
mkdir -p "$dir/Debug"
echo "binary" > "$dir/Debug/$name.exe"
printf 'Build started.\r\n\r\nBuild succeeded.\r\n    0 Error(s)\r\n'
"#;

const NATIVE_BUILD_NO_MARKER: &str = r#"#!/bin/sh
printf 'Microsoft (R) Build Engine\r\nDone.\r\n'
"#;

const FOO_SOURCE: &str = r#"event Ping;

main machine Foo {
    start state Init { }
}
"#;

/// A temporary P toolchain plus a source file and output directory.
struct FakeToolchain {
    temp_dir: TempDir,
    root: PathBuf,
    source: PathBuf,
    output: PathBuf,
    native_build: PathBuf,
}

impl FakeToolchain {
    fn new(source: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("toolchain");
        fs::create_dir_all(root.join("Compiler")).expect("Failed to create Compiler dir");
        fs::create_dir_all(root.join("Runtime")).expect("Failed to create Runtime dir");
        fs::write(root.join("Runtime").join("SMRuntime.zing"), "// runtime")
            .expect("Failed to write support file");

        let source_path = temp_dir.path().join("Foo.p");
        fs::write(&source_path, source).expect("Failed to write source");

        let toolchain = Self {
            output: temp_dir.path().join("out"),
            native_build: temp_dir.path().join("msbuild"),
            source: source_path,
            root,
            temp_dir,
        };

        toolchain.install(Path::new("Compiler/PCompiler"), DOMAIN_COMPILER_OK);
        toolchain.install(Path::new("Compiler/zc"), MODEL_CHECKER);
        toolchain.install(Path::new("Compiler/PrtGen"), PROJECT_GENERATOR);
        write_script(&toolchain.native_build, NATIVE_BUILD_OK);
        toolchain
    }

    fn install(&self, relative: &Path, script: &str) {
        write_script(&self.root.join(relative), script);
    }

    fn command(&self, flags: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("pforge").expect("Failed to find pforge binary");
        cmd.env_remove("PFORGE_ROOT")
            .env("PFORGE_NATIVE_BUILD", &self.native_build)
            .current_dir(self.temp_dir.path())
            .arg(&self.source)
            .arg(&self.output)
            .arg("--toolchain-root")
            .arg(&self.root)
            .args(flags);
        cmd
    }
}

fn write_script(path: &Path, script: &str) {
    fs::write(path, script).expect("Failed to write script");
    let mut perms = fs::metadata(path).expect("Failed to stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to chmod script");
}

// =============================================================================
// Validation
// =============================================================================

#[test]
#[serial]
fn test_cc_without_proj_is_rejected() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);

    toolchain
        .command(&["--cc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--proj"));

    assert!(!toolchain.output.exists(), "no stage should have run");
}

#[test]
#[serial]
fn test_missing_input() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);
    fs::remove_file(&toolchain.source).expect("Failed to remove source");

    toolchain
        .command(&[])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("input not found"));
}

#[test]
#[serial]
fn test_missing_toolchain_root() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);

    Command::cargo_bin("pforge")
        .expect("Failed to find pforge binary")
        .env_remove("PFORGE_ROOT")
        .arg(&toolchain.source)
        .arg(&toolchain.output)
        .assert()
        .code(255)
        .stderr(predicate::str::contains("toolchain root not found"));
}

// =============================================================================
// Pipeline runs
// =============================================================================

#[test]
#[serial]
fn test_domain_compile_only() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);

    toolchain
        .command(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running PCompiler"));

    assert!(toolchain.output.join("output.zing").exists());
    assert!(!toolchain.output.join("Foo.vcxproj").exists());
}

#[test]
#[serial]
fn test_full_pipeline() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);

    toolchain
        .command(&["--zc", "--proj", "--cc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Main machine is"))
        .stdout(predicate::str::contains("Foo"))
        .stdout(predicate::str::contains("Built:"));

    assert!(toolchain.output.join("Foo.dll").exists());
    assert!(
        !toolchain.output.join("SMRuntime.zing").exists(),
        "support file should be cleaned up"
    );
    assert_eq!(
        fs::read_to_string(toolchain.output.join("Foo.vcxproj")).unwrap(),
        "main=Foo\n"
    );
    assert!(toolchain.output.join("Debug").join("Foo.exe").exists());
}

#[test]
#[serial]
fn test_domain_compile_failure_reports_output() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);
    toolchain.install(Path::new("Compiler/PCompiler"), DOMAIN_COMPILER_FAIL);

    toolchain
        .command(&["--zc", "--proj"])
        .assert()
        .code(255)
        .stderr(predicate::str::contains("domain compile failed"))
        .stderr(predicate::str::contains("syntax error near 'machin'"))
        .stderr(predicate::str::contains("Compilation failed"));

    assert!(!toolchain.output.join("Foo.dll").exists());
    assert!(!toolchain.output.join("Foo.vcxproj").exists());
}

#[test]
#[serial]
fn test_missing_main_machine() {
    let toolchain = FakeToolchain::new("machine Foo {\n}\n");

    toolchain
        .command(&["--proj"])
        .assert()
        .code(255)
        .stderr(predicate::str::contains("no main machine declaration"));

    assert!(toolchain.output.join("output.zing").exists());
    assert!(!toolchain.output.join("Foo.vcxproj").exists());
}

#[test]
#[serial]
fn test_native_build_without_marker_fails() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);
    write_script(&toolchain.native_build, NATIVE_BUILD_NO_MARKER);

    toolchain
        .command(&["--proj", "--cc"])
        .assert()
        .code(255)
        .stderr(predicate::str::contains("native build failed"))
        .stderr(predicate::str::contains("Microsoft (R) Build Engine"));
}

#[test]
#[serial]
fn test_missing_tool_is_stage_failure() {
    let toolchain = FakeToolchain::new(FOO_SOURCE);
    fs::remove_file(toolchain.root.join("Compiler/zc")).expect("Failed to remove zc");

    toolchain
        .command(&["--zc"])
        .assert()
        .code(255)
        .stderr(predicate::str::contains("process not found"));

    assert!(!toolchain.output.join("SMRuntime.zing").exists());
}
