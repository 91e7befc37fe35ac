//! Test utilities for pycycle-indexer

use std::fs;
use tempfile::TempDir;

/// Create a temporary project with the given `(relative path, contents)` files.
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    create_repo_with_bytes(
        &structure
            .iter()
            .map(|(path, content)| (*path, content.as_bytes()))
            .collect::<Vec<_>>(),
    )
}

/// Like [`create_repo_with_structure`] for files that are not UTF-8.
pub fn create_repo_with_bytes(structure: &[(&str, &[u8])]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

/// Mutual import between `a.py` and `b.py`, both on line 1.
pub fn create_mutual_import_repo() -> TempDir {
    create_repo_with_structure(&[("a.py", "import b\n"), ("b.py", "import a\n")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo_with_structure() {
        let repo = create_repo_with_structure(&[("pkg/mod.py", "x = 1\n")]);

        let content = fs::read_to_string(repo.path().join("pkg/mod.py")).unwrap();
        assert_eq!(content, "x = 1\n");
    }
}
