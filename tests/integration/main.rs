//! Integration tests for pycycle
//!
//! These run the reader and the `pycycle` binary against real directories.

use pycycle_indexer::{read_project, ProjectError, ReadOptions};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn create_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }
    temp_dir
}

fn pycycle(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pycycle"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pycycle")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn large_circle() -> TempDir {
    create_project(&[
        ("__main__.py", "import a_module.a_file\n"),
        ("a_module/a_file.py", "import a_module.b_module.b_file\n"),
        ("a_module/b_module/b_file.py", "import c_module.c_file\n"),
        ("c_module/c_file.py", "import d_module.d_file\n"),
        ("d_module/d_file.py", "import a_module.a_file\n"),
    ])
}

/// Test that the CLI prints help and exits cleanly without a target
#[test]
fn test_cli_without_target_prints_help() {
    let dir = TempDir::new().unwrap();
    let output = pycycle(&[], dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("--here"));
    assert!(text.contains("pycycle --source"));
}

#[test]
fn test_cli_reports_mutual_import() {
    let project = create_project(&[("a.py", "import b\n"), ("b.py", "import a\n")]);
    let output = pycycle(&["--here"], project.path());

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("Cycle Found :("));
    assert!(text.contains("b -> a: Line 1 =>> b"));
}

#[test]
fn test_cli_clean_project_exits_zero() {
    let project = create_project(&[("a.py", "import b\n"), ("b.py", "import os\n")]);
    let cwd = TempDir::new().unwrap();
    let source = project.path().to_string_lossy().into_owned();
    let output = pycycle(&["--source", &source], cwd.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("No worries, no cycles here!"));
}

#[test]
fn test_cli_large_circle() {
    let project = large_circle();
    let output = pycycle(&["--here"], project.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(
        "a_module.a_file -> a_module.b_module.b_file: Line 1 -> c_module.c_file: Line 1 \
         -> d_module.d_file: Line 1 =>> a_module.a_file"
    ));
}

#[test]
fn test_cli_invalid_directory() {
    let cwd = TempDir::new().unwrap();
    let output = pycycle(&["--source", "does/not/exist"], cwd.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a directory"));
}

#[test]
fn test_cli_ignore_flag() {
    let project = create_project(&[
        ("a.py", "import third_party.b\n"),
        ("third_party/b.py", "import a\n"),
    ]);

    let output = pycycle(&["--here"], project.path());
    assert_eq!(output.status.code(), Some(1));

    let output = pycycle(&["--here", "--ignore", "build,third_party"], project.path());
    assert!(output.status.success());
}

#[test]
fn test_cli_rejects_bad_ignore_pattern() {
    let project = create_project(&[("a.py", "import b\n")]);
    let output = pycycle(&["--here", "--ignore", "[unclosed"], project.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid ignore pattern"));
}

#[test]
fn test_cli_broken_pyproject_still_checks() {
    let project = create_project(&[
        ("pyproject.toml", "[tool.poetry\n"),
        ("a.py", "import b\n"),
        ("b.py", "import a\n"),
    ]);
    let output = pycycle(&["--here"], project.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("b -> a: Line 1 =>> b"));
}

#[test]
fn test_cli_json_output() {
    let project = create_project(&[("a.py", "import b\n"), ("b.py", "import a\n")]);
    let output = pycycle(&["--here", "--format", "json", "--all-cycles"], project.path());

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["cycle"], true);
    assert_eq!(report["path"].as_array().unwrap().len(), 2);
    assert_eq!(report["structural_cycles"][0]["names"], serde_json::json!(["a", "b"]));
}

#[test]
fn test_cli_guarded_import_is_not_a_cycle() {
    let project = create_project(&[
        ("a.py", "class Thing:\n    pass\n\nimport b\n"),
        ("b.py", "def make():\n    from a import Thing\n    return Thing()\n"),
    ]);
    let output = pycycle(&["--here", "--all-cycles"], project.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("No worries"));
    assert!(text.contains("{a, b}"));
}

#[test]
fn test_read_project_relative_package_import() {
    let project = create_project(&[
        ("main.py", "import myapp.models\n"),
        ("myapp/__init__.py", ""),
        ("myapp/managers.py", "import myapp.models\n"),
        ("myapp/models.py", "from . import managers\n"),
    ]);
    let result = read_project(project.path(), &ReadOptions::default()).unwrap();

    assert!(result.has_cycle());
    assert_eq!(
        result.cycle_path().to_string(),
        "myapp.models -> managers: Line 1 =>> myapp.models"
    );
}

#[test]
fn test_read_project_twice_gives_same_answer() {
    let project = large_circle();
    let first = read_project(project.path(), &ReadOptions::default()).unwrap();
    let second = read_project(project.path(), &ReadOptions::default()).unwrap();

    assert_eq!(first.has_cycle(), second.has_cycle());
    assert_eq!(first.cycle_path().to_string(), second.cycle_path().to_string());
    assert_eq!(first.graph.module_count(), second.graph.module_count());
}

#[test]
fn test_read_project_rejects_file_root() {
    let project = create_project(&[("a.py", "")]);
    let result = read_project(project.path().join("a.py"), &ReadOptions::default());

    assert!(matches!(result, Err(ProjectError::NotADirectory(_))));
}
