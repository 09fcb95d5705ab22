//! Locating the project config and the source files it covers.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::tsconfig::{normalize_path, TsConfig, CONFIG_FILE_NAME};

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];
const DECLARATION_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];
const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Search `start` and each of its ancestors for a `tsconfig.json`.
pub fn find_tsconfig(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Resolve an explicit `--project` argument, or fall back to the upward search.
pub fn resolve_tsconfig_path(cwd: &Path, project: Option<&Path>) -> Result<PathBuf> {
    let Some(project) = project else {
        return find_tsconfig(cwd).with_context(|| {
            format!(
                "could not find a {CONFIG_FILE_NAME} in {} or any parent directory",
                cwd.display()
            )
        });
    };

    let mut candidate = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };

    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }

    if !candidate.exists() {
        bail!("tsconfig not found at {}", candidate.display());
    }

    if !candidate.is_file() {
        bail!("project path is not a file: {}", candidate.display());
    }

    Ok(candidate)
}

/// Whether `path` is a TypeScript source that produces an output file.
pub fn is_emittable_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if DECLARATION_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Expand `files`/`include`/`exclude` into a sorted, deduplicated list.
///
/// Entries are expected to be anchored already (see `load_tsconfig`);
/// relative entries are joined onto `base_dir`.
pub fn discover_files(
    base_dir: &Path,
    config: &TsConfig,
    out_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();

    if let Some(files) = &config.files {
        for file in files {
            let path = normalize_path(&base_dir.join(file));
            if !path.is_file() {
                bail!("file listed in tsconfig does not exist: {}", path.display());
            }
            if is_emittable_source(&path) {
                found.insert(path);
            }
        }
    }

    let includes: Vec<String> = match &config.include {
        Some(include) => include.clone(),
        None if config.files.is_some() => Vec::new(),
        None => vec!["**/*".to_string()],
    };

    if includes.is_empty() {
        return Ok(found.into_iter().collect());
    }

    let include_patterns: Vec<String> = includes
        .iter()
        .map(|pattern| include_pattern(&anchor(base_dir, pattern)))
        .collect();
    let include_set = build_globset(&include_patterns)?;

    let mut exclude_patterns: Vec<String> = match &config.exclude {
        Some(exclude) => exclude.iter().map(|p| anchor(base_dir, p)).collect(),
        None => DEFAULT_EXCLUDES
            .iter()
            .map(|p| anchor(base_dir, p))
            .collect(),
    };
    if let Some(out_dir) = out_dir {
        exclude_patterns.push(normalize_path(out_dir).to_string_lossy().into_owned());
    }
    let exclude_patterns: Vec<String> = exclude_patterns
        .iter()
        .flat_map(|p| [p.clone(), format!("{}/**", p.trim_end_matches('/'))])
        .collect();
    let exclude_set = build_globset(&exclude_patterns)?;

    let roots: BTreeSet<PathBuf> = include_patterns.iter().map(|p| walk_root(p)).collect();
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !exclude_set.is_match(entry.path()));
        for entry in walker {
            let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && include_set.is_match(path)
                && is_emittable_source(path)
            {
                found.insert(path.to_path_buf());
            }
        }
    }

    debug!(count = found.len(), "discovered source files");
    Ok(found.into_iter().collect())
}

fn anchor(base_dir: &Path, pattern: &str) -> String {
    normalize_path(&base_dir.join(pattern))
        .to_string_lossy()
        .into_owned()
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// A pattern whose last segment has neither a wildcard nor an extension
/// names a directory and matches everything below it.
fn include_pattern(pattern: &str) -> String {
    let last = pattern.rsplit('/').next().unwrap_or(pattern);
    if !has_wildcard(last) && Path::new(last).extension().is_none() {
        format!("{}/**/*", pattern.trim_end_matches('/'))
    } else {
        pattern.to_string()
    }
}

/// The literal directory prefix of a glob, where walking can start.
fn walk_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if has_wildcard(&text) {
            return root;
        }
        root.push(component.as_os_str());
    }
    root.parent().map(Path::to_path_buf).unwrap_or(root)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern in tsconfig: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to compile tsconfig globs")
}
