//! Test utilities for svgdxf
//!
//! This crate provides shared testing utilities used across the svgdxf workspace.

use std::path::PathBuf;
use tempfile::TempDir;

#[cfg(unix)]
pub mod fake;

#[cfg(unix)]
pub use fake::{FakeBehavior, FakeTool};

/// Minimal SVG containing a single rectangle
pub const RECT_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100mm" height="50mm" viewBox="0 0 100 50">
  <rect x="10" y="10" width="80" height="30" fill="none" stroke="black"/>
</svg>
"#;

/// Minimal SVG containing a single circle
pub const CIRCLE_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="60mm" height="60mm" viewBox="0 0 60 60">
  <circle cx="30" cy="30" r="25" fill="none" stroke="black"/>
</svg>
"#;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// This keeps test files in one gitignored location that is easy to clean
/// up manually if a test aborts.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot
/// be created.
///
/// # Examples
///
/// ```rust
/// use svgdxf_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.svg");
/// std::fs::write(&file_path, "<svg/>").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Get the path to a compiled example binary
///
/// Example binaries are built by `cargo test` into `target/<profile>/examples/`.
///
/// # Panics
///
/// Panics if unable to determine the current executable path
///
/// # Examples
///
/// ```no_run
/// use svgdxf_testkit::example_bin;
/// use std::process::Command;
///
/// fn test_with_example() {
///     let status = Command::new(example_bin("warmup_child"))
///         .arg("/tmp/tool")
///         .arg("/tmp/warmup.lock")
///         .status()
///         .unwrap();
///     assert!(status.success());
/// }
/// ```
pub fn example_bin(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("Failed to get current executable path");

    // Navigate from target/debug/deps/test_binary to target/debug/examples/
    path.pop();
    path.pop();
    path.push("examples");
    path.push(name);

    if cfg!(target_os = "windows") {
        path.set_extension("exe");
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(path.exists());
        assert!(
            path.parent().unwrap().ends_with(".tmp"),
            "Temp dir should live under .tmp/: {}",
            path.display()
        );
    }

    #[test]
    fn test_example_bin_returns_correct_path() {
        let path = example_bin("test_example");

        assert!(path.to_string_lossy().contains("examples"));
        let file_name = path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("test_example"));
    }

    #[test]
    fn test_sample_svgs_are_svg() {
        for svg in [RECT_SVG, CIRCLE_SVG] {
            assert!(svg.contains("<svg"));
            assert!(svg.trim_end().ends_with("</svg>"));
        }
    }
}
