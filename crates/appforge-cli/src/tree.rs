//! Reading and writing project trees on disk

use anyhow::{bail, Context, Result};
use appforge_files::FileSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory names never read into a baseline
pub const IGNORED_DIRS: &[&str] = &[".git", "node_modules", ".expo", "dist", "build"];

/// Read every UTF-8 file under `root` into a [`FileSet`]
///
/// Paths are relative to `root` with `/` separators, sorted for a stable
/// baseline order. Non-UTF-8 files are skipped with a warning.
///
/// # Errors
/// `root` is not a directory, a directory cannot be listed, or a relative
/// path is rejected by path cleaning.
pub fn read_tree(root: &Path) -> Result<FileSet> {
    if !root.is_dir() {
        bail!("baseline {} is not a directory", root.display());
    }

    let mut files = Vec::new();
    collect(root, root, &mut files)?;
    files.sort();

    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
        let Ok(content) = String::from_utf8(bytes) else {
            warn!(path = %file.display(), "skipping non-UTF-8 file");
            continue;
        };
        let relative = file
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", file.display(), root.display()))?;
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push((key, content));
    }

    debug!(root = %root.display(), files = entries.len(), "baseline read");
    FileSet::try_from_entries(entries).with_context(|| format!("invalid path under {}", root.display()))
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let listing = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in listing {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry.file_type().with_context(|| format!("inspecting {}", path.display()))?;
        if file_type.is_dir() {
            let name = entry.file_name();
            if IGNORED_DIRS.iter().any(|ignored| name == *ignored) {
                debug!(path = %path.display(), "skipping ignored directory");
                continue;
            }
            collect(root, &path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Write every record under `root`, creating directories as needed
///
/// # Errors
/// Any directory creation or write failure.
pub fn write_tree(root: &Path, files: &FileSet) -> Result<usize> {
    for record in files.records() {
        let target = root.join(record.path().as_str());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&target, record.content()).with_context(|| format!("writing {}", target.display()))?;
    }
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_test_utils::expo_baseline;

    #[test]
    fn tree_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = expo_baseline();
        assert_eq!(write_tree(dir.path(), &baseline).unwrap(), baseline.len());

        let read = read_tree(dir.path()).unwrap();
        assert_eq!(read.len(), baseline.len());
        assert_eq!(read.content("app/(tabs)/index.tsx"), baseline.content("app/(tabs)/index.tsx"));
    }

    #[test]
    fn ignored_and_binary_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/react")).unwrap();
        fs::write(dir.path().join("node_modules/react/index.js"), "x").unwrap();
        fs::write(dir.path().join("icon.png"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("app.json"), "{}").unwrap();

        let read = read_tree(dir.path()).unwrap();
        let paths: Vec<_> = read.paths().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["app.json"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_tree(&dir.path().join("nope")).is_err());
    }
}
