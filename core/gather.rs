use crate::config::Config;
use crate::error::{AppError, Result};
use log;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Header,
    Implementation,
}

impl SourceKind {
    pub fn suffix(self) -> &'static str {
        match self {
            SourceKind::Header => ".h",
            SourceKind::Implementation => ".c",
        }
    }
}

/// Candidate files for one run, each list sorted by absolute path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSet {
    pub headers: Vec<PathBuf>,
    pub implementations: Vec<PathBuf>,
}

pub fn gather_sources(config: &Config) -> Result<SourceSet> {
    log::debug!("Starting source discovery under {} root(s)...", config.src.len());
    // Generated files from a previous run must never feed back in.
    let mut reject_files = config.reject_file.clone();
    reject_files.push(config.dest.join(config.header_file_name()));
    reject_files.push(config.dest.join(config.source_file_name()));

    let headers = find_files(
        &config.src,
        &config.reject_dir,
        &reject_files,
        SourceKind::Header.suffix(),
    )?;
    let implementations = find_files(
        &config.src,
        &config.reject_dir,
        &reject_files,
        SourceKind::Implementation.suffix(),
    )?;
    log::info!(
        "Discovery complete. Found {} header(s) and {} implementation file(s).",
        headers.len(),
        implementations.len()
    );
    Ok(SourceSet {
        headers,
        implementations,
    })
}

/// Lists files under `roots` whose name ends with `suffix`.
///
/// Files sitting directly inside a rejected directory are skipped, but the
/// walk still descends into its subdirectories. Overlapping roots are
/// deduplicated and the result is sorted by path string, so `list.c`
/// comes before `list/node.c`.
pub fn find_files(
    roots: &[PathBuf],
    reject_dirs: &[PathBuf],
    reject_files: &[PathBuf],
    suffix: &str,
) -> Result<Vec<PathBuf>> {
    let reject_dirs: HashSet<&Path> = reject_dirs.iter().map(PathBuf::as_path).collect();
    let reject_files: HashSet<&Path> = reject_files.iter().map(PathBuf::as_path).collect();
    let mut found = HashSet::new();

    for root in roots {
        if !root.is_dir() {
            return Err(AppError::WalkDir(format!(
                "source directory '{}' does not exist or is not a directory",
                root.display()
            )));
        }
        log::info!("Walking source directory: {}", root.display());

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_suffix = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix));
            if !matches_suffix {
                continue;
            }
            if path.parent().is_some_and(|p| reject_dirs.contains(p)) {
                log::trace!("Skipping file in rejected directory: {}", path.display());
                continue;
            }
            if reject_files.contains(path) {
                log::trace!("Skipping rejected file: {}", path.display());
                continue;
            }
            log::trace!("Including: {}", path.display());
            found.insert(path.to_path_buf());
        }
    }

    let mut found: Vec<PathBuf> = found.into_iter().collect();
    sort_by_path_string(&mut found);
    Ok(found)
}

/// Byte-wise order of the whole path, unlike `PathBuf`'s per-component `Ord`.
pub fn sort_by_path_string(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_find_files_filters_by_suffix_and_sorts() {
        let td = TempDir::new().unwrap();
        let root = td.path().canonicalize().unwrap();
        let b = touch(&root, "b.h");
        let a = touch(&root, "sub/a.h");
        touch(&root, "main.c");
        touch(&root, "notes.txt");
        touch(&root, "x.hpp");

        let found = find_files(&[root.clone()], &[], &[], ".h").unwrap();
        let mut expected = vec![a, b];
        sort_by_path_string(&mut expected);
        assert_eq!(found, expected);
    }

    #[test]
    fn test_rejected_dir_skips_direct_files_only() {
        let td = TempDir::new().unwrap();
        let root = td.path().canonicalize().unwrap();
        touch(&root, "vendor/skip.c");
        let nested = touch(&root, "vendor/inner/keep.c");
        let top = touch(&root, "top.c");

        let found = find_files(&[root.clone()], &[root.join("vendor")], &[], ".c").unwrap();
        let mut expected = vec![top, nested];
        sort_by_path_string(&mut expected);
        assert_eq!(found, expected);
    }

    #[test]
    fn test_rejected_file_is_excluded() {
        let td = TempDir::new().unwrap();
        let root = td.path().canonicalize().unwrap();
        let skip = touch(&root, "skip.h");
        let keep = touch(&root, "keep.h");

        let found = find_files(&[root.clone()], &[], &[skip], ".h").unwrap();
        assert_eq!(found, vec![keep]);
    }

    #[test]
    fn test_overlapping_roots_are_deduplicated() {
        let td = TempDir::new().unwrap();
        let root = td.path().canonicalize().unwrap();
        let file = touch(&root, "sub/a.c");

        let found = find_files(&[root.clone(), root.join("sub")], &[], &[], ".c").unwrap();
        assert_eq!(found, vec![file]);
    }

    #[test]
    fn test_file_sorts_before_same_named_directory() {
        let td = TempDir::new().unwrap();
        let root = td.path().canonicalize().unwrap();
        let nested = touch(&root, "list/node.c");
        let file = touch(&root, "list.c");

        let found = find_files(&[root.clone()], &[], &[], ".c").unwrap();
        assert_eq!(found, vec![file, nested]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let td = TempDir::new().unwrap();
        let err = find_files(&[td.path().join("missing")], &[], &[], ".c").unwrap_err();
        assert!(matches!(err, AppError::WalkDir(_)));
    }
}
