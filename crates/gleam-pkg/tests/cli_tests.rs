//! Integration tests for the gleam-pkg CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "1.1.0": {
    "aarch64-darwin": {
      "url": "https://github.com/gleam-lang/gleam/releases/download/v1.1.0/gleam-v1.1.0-aarch64-apple-darwin.tar.gz",
      "sha256": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    },
    "x86_64-linux": {
      "url": "https://github.com/gleam-lang/gleam/releases/download/v1.1.0/gleam-v1.1.0-x86_64-unknown-linux-musl.tar.gz",
      "sha256": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    }
  },
  "1.1.0-rc1": {
    "x86_64-linux": {
      "url": "https://github.com/gleam-lang/gleam/releases/download/v1.1.0-rc1/gleam-v1.1.0-rc1-x86_64-unknown-linux-musl.tar.gz",
      "sha256": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    }
  },
  "latest": {
    "aarch64-darwin": {
      "url": "https://github.com/gleam-lang/gleam/releases/download/v1.1.0/gleam-v1.1.0-aarch64-apple-darwin.tar.gz",
      "sha256": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    },
    "x86_64-linux": {
      "url": "https://github.com/gleam-lang/gleam/releases/download/v1.1.0/gleam-v1.1.0-x86_64-unknown-linux-musl.tar.gz",
      "sha256": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    }
  }
}"#;

/// Temporary working directory with a manifest and a template in place
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        fs::write(temp_dir.path().join("gleam_hashes.json"), MANIFEST).unwrap();
        fs::write(
            temp_dir.path().join("README.md.hbs"),
            "# Gleam\n\n{{versions_table}}\n{{platforms_list}}\n\n{{platform_version_matrix}}",
        )
        .unwrap();
        Self { temp_dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gleam-pkg"));
        cmd.current_dir(self.temp_dir.path());
        cmd.env("RUST_LOG", "info");
        cmd
    }

    fn readme(&self, template: &Path) -> std::process::Output {
        self.cmd()
            .arg("readme")
            .arg("--manifest")
            .arg(self.path("gleam_hashes.json"))
            .arg("--template")
            .arg(template)
            .arg("--output")
            .arg(self.path("README.md"))
            .output()
            .expect("failed to run gleam-pkg")
    }
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.cmd().arg("--help").output().expect("failed to run gleam-pkg");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("fetch"));
    assert!(stdout.contains("readme"));
}

#[test]
fn test_readme_renders() {
    let ctx = TestContext::new();
    let output = ctx.readme(&ctx.path("README.md.hbs"));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));

    let readme = fs::read_to_string(ctx.path("README.md")).unwrap();
    assert!(readme.starts_with("# Gleam\n"));
    assert!(readme.contains("| `1.1.0` | `gleam-1_1_0` |"));
    assert!(readme.contains("| `1.1.0-rc1` | `gleam-1_1_0_rc1` |"));
    assert!(readme.contains("| `latest` | `gleam-latest` (alias for `1.1.0`) |"));
    assert!(readme.contains("| `1.1.0-rc1` | ❌ | ✅ |"));
    assert!(!readme.contains("| `latest` | ✅"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 versions and 2 platforms"));
}

#[test]
fn test_readme_default_paths() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.path("doc_templates")).unwrap();
    fs::copy(ctx.path("README.md.hbs"), ctx.path("doc_templates/README.md.hbs")).unwrap();

    let output = ctx.cmd().arg("readme").output().expect("failed to run gleam-pkg");
    assert!(output.status.success());
    assert!(ctx.path("README.md").exists());
}

#[test]
fn test_readme_missing_template_exits_nonzero() {
    let ctx = TestContext::new();
    let output = ctx.readme(&ctx.path("missing.hbs"));
    assert_eq!(output.status.code(), Some(1));
    assert!(!ctx.path("README.md").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to read template"));
}

#[test]
fn test_readme_invalid_manifest_exits_nonzero() {
    let ctx = TestContext::new();
    fs::write(ctx.path("gleam_hashes.json"), "{\"1.0.0\": [").unwrap();
    let output = ctx.readme(&ctx.path("README.md.hbs"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_fetch_unreachable_source_exits_nonzero() {
    let ctx = TestContext::new();
    let output = ctx
        .cmd()
        .arg("fetch")
        .arg("--no-nightly")
        .arg("--releases-url")
        .arg("http://127.0.0.1:1/releases")
        .arg("--output")
        .arg(ctx.path("fresh.json"))
        .output()
        .expect("failed to run gleam-pkg");

    assert_eq!(output.status.code(), Some(1));
    assert!(!ctx.path("fresh.json").exists());
}
