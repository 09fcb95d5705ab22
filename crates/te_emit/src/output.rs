//! Where emitted files go, and clearing that place out beforehand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use te_specifier::emitted_extension;
use tracing::info;

/// Longest directory containing every file in `files`.
///
/// This is what `rootDir` defaults to. `None` for an empty list or when the
/// files share no common ancestor (different drives).
pub fn common_source_dir(files: &[PathBuf]) -> Option<PathBuf> {
    let mut dirs = files.iter().filter_map(|file| file.parent());
    let mut common = dirs.next()?.to_path_buf();
    for dir in dirs {
        while !dir.starts_with(&common) {
            if !common.pop() {
                return None;
            }
        }
    }
    Some(common)
}

/// Output location for `source`.
///
/// With an output directory the path relative to `root_dir` is re-rooted
/// under `out_dir`; without one the output lands beside the source. The
/// extension goes through the same `t` → `j` swap as specifiers do, so
/// `view.tsx` becomes `view.jsx` and `lib.mts` becomes `lib.mjs`. Without JSX
/// output (`jsx` false) a `.tsx` source is written as `.js`, which is where
/// the specifier fallback points.
///
/// Returns `None` when `source` lies outside `root_dir`.
pub fn output_path(
    source: &Path,
    root_dir: Option<&Path>,
    out_dir: Option<&Path>,
    jsx: bool,
) -> Option<PathBuf> {
    let mut target = match out_dir {
        Some(out_dir) => {
            let relative = root_dir.and_then(|root| source.strip_prefix(root).ok())?;
            out_dir.join(relative)
        }
        None => source.to_path_buf(),
    };

    let extension = target
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| match ext {
            "tsx" if !jsx => "js".to_string(),
            _ => emitted_extension(ext),
        })
        .unwrap_or_else(|| "js".to_string());
    target.set_extension(extension);
    Some(target)
}

/// Recursively delete `out_dir`. A directory that does not exist yet is
/// fine; anything else that stops the removal is fatal.
pub fn clean_out_dir(out_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(out_dir) {
        Ok(()) => {
            info!(path = %out_dir.display(), "removed output directory");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("failed to remove output directory {}", out_dir.display())),
    }
}

pub fn write_output(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, code).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn common_dir_of_nested_sources() {
        let files = vec![
            PathBuf::from("/p/src/a.ts"),
            PathBuf::from("/p/src/lib/b.ts"),
            PathBuf::from("/p/src/views/c.tsx"),
        ];
        assert_eq!(common_source_dir(&files), Some(PathBuf::from("/p/src")));
        assert_eq!(
            common_source_dir(&[PathBuf::from("/p/src/lib/b.ts")]),
            Some(PathBuf::from("/p/src/lib"))
        );
        assert_eq!(common_source_dir(&[]), None);
    }

    #[test]
    fn output_is_rerooted_under_out_dir() {
        let root = Path::new("/p/src");
        let out = Path::new("/p/dist");
        assert_eq!(
            output_path(Path::new("/p/src/lib/b.ts"), Some(root), Some(out), true),
            Some(PathBuf::from("/p/dist/lib/b.js"))
        );
        assert_eq!(
            output_path(Path::new("/p/src/view.tsx"), Some(root), Some(out), true),
            Some(PathBuf::from("/p/dist/view.jsx"))
        );
        assert_eq!(
            output_path(Path::new("/p/src/server.mts"), Some(root), Some(out), true),
            Some(PathBuf::from("/p/dist/server.mjs"))
        );
        assert_eq!(output_path(Path::new("/p/other/x.ts"), Some(root), Some(out), true), None);
    }

    #[test]
    fn output_beside_source_without_out_dir() {
        assert_eq!(
            output_path(Path::new("/p/src/a.cts"), None, None, false),
            Some(PathBuf::from("/p/src/a.cjs"))
        );
    }

    #[test]
    fn tsx_without_jsx_output_is_written_as_js() {
        assert_eq!(
            output_path(Path::new("/p/src/view.tsx"), Some(Path::new("/p/src")), Some(Path::new("/p/dist")), false),
            Some(PathBuf::from("/p/dist/view.js"))
        );
        assert_eq!(
            output_path(Path::new("/p/src/main.ts"), None, None, false),
            Some(PathBuf::from("/p/src/main.js"))
        );
    }

    #[test]
    fn cleaning_a_regular_file_fails() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("dist");
        fs::write(&out, "not a directory").unwrap();

        let err = clean_out_dir(&out).unwrap_err();
        assert!(err.to_string().contains("failed to remove output directory"), "{err:#}");
        assert!(out.is_file());
    }

    #[test]
    fn cleaning_missing_dir_is_ok() {
        let dir = tempdir().unwrap();
        clean_out_dir(&dir.path().join("dist")).unwrap();
    }

    #[test]
    fn cleaning_removes_stale_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("dist");
        write_output(&out.join("nested/stale.js"), "stale").unwrap();

        clean_out_dir(&out).unwrap();
        assert!(!out.exists());
    }
}
