//! `tsconfig.json` model, JSONC parsing and `extends` resolution.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// The subset of `compilerOptions` tsesm acts on. Unknown options are ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub jsx: Option<String>,
    #[serde(default)]
    pub jsx_factory: Option<String>,
    #[serde(default)]
    pub react_namespace: Option<String>,
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
}

pub fn parse_tsconfig(source: &str) -> Result<TsConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let config = serde_json::from_str(&normalized).context("failed to parse tsconfig JSON")?;
    Ok(config)
}

/// Load a config file and fold in its `extends` chain.
///
/// Path-valued entries (`outDir`, `rootDir`, `files`, `include`, `exclude`)
/// are anchored to the directory of the file that declares them, so values
/// inherited from a base config keep pointing where the base meant.
pub fn load_tsconfig(path: &Path) -> Result<TsConfig> {
    let mut visited = HashSet::new();
    load_tsconfig_inner(path, &mut visited)
}

fn load_tsconfig_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<TsConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("tsconfig extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;
    let mut config = parse_tsconfig(&source)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;

    let base_dir = path
        .parent()
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;
    anchor_paths(&mut config, base_dir);

    let extends = config.extends.take();
    if let Some(extends_path) = extends {
        let base_path = resolve_extends_path(path, &extends_path)?;
        let base_config = load_tsconfig_inner(&base_path, visited)?;
        config = merge_configs(base_config, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    if !(extends.starts_with("./") || extends.starts_with("../") || Path::new(extends).is_absolute())
    {
        bail!(
            "tsconfig extends '{}' is not a relative path; package configs are not supported",
            extends
        );
    }

    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;
    // `./tsconfig.base` names `tsconfig.base.json`, so only a literal
    // `.json` suffix counts as already having one.
    let candidate = if extends.ends_with(".json") {
        PathBuf::from(extends)
    } else {
        PathBuf::from(format!("{extends}.json"))
    };

    let resolved = if candidate.is_absolute() {
        candidate
    } else {
        base_dir.join(candidate)
    };

    if !resolved.is_file() {
        bail!("tsconfig extends target not found: {}", resolved.display());
    }
    Ok(resolved)
}

fn anchor_paths(config: &mut TsConfig, base_dir: &Path) {
    let anchor = |value: &str| -> String {
        normalize_path(&base_dir.join(value))
            .to_string_lossy()
            .into_owned()
    };

    if let Some(options) = config.compiler_options.as_mut() {
        options.out_dir = options.out_dir.as_deref().map(anchor);
        options.root_dir = options.root_dir.as_deref().map(anchor);
    }
    for list in [&mut config.files, &mut config.include, &mut config.exclude] {
        if let Some(entries) = list.as_mut() {
            for entry in entries.iter_mut() {
                *entry = anchor(entry);
            }
        }
    }
}

fn merge_configs(base: TsConfig, mut child: TsConfig) -> TsConfig {
    let merged_compiler_options = match (base.compiler_options, child.compiler_options.take()) {
        (Some(base_opts), Some(child_opts)) => Some(merge_compiler_options(base_opts, child_opts)),
        (Some(base_opts), None) => Some(base_opts),
        (None, Some(child_opts)) => Some(child_opts),
        (None, None) => None,
    };

    TsConfig {
        extends: None,
        compiler_options: merged_compiler_options,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        files: child.files.or(base.files),
    }
}

fn merge_compiler_options(base: CompilerOptions, child: CompilerOptions) -> CompilerOptions {
    CompilerOptions {
        target: child.target.or(base.target),
        module: child.module.or(base.module),
        jsx: child.jsx.or(base.jsx),
        jsx_factory: child.jsx_factory.or(base.jsx_factory),
        react_namespace: child.react_namespace.or(base.react_namespace),
        root_dir: child.root_dir.or(base.root_dir),
        out_dir: child.out_dir.or(base.out_dir),
    }
}

/// Lexically normalize `path`: drop `.` components and fold `..` into
/// the preceding component. Does not touch the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' {
                if let Some('/') = chars.peek().copied() {
                    chars.next();
                    in_block_comment = false;
                }
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == '/' {
            match chars.peek().copied() {
                Some('/') => {
                    chars.next();
                    in_line_comment = true;
                    continue;
                }
                Some('*') => {
                    chars.next();
                    in_block_comment = true;
                    continue;
                }
                _ => {}
            }
        }

        out.push(ch);
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            let next_significant = chars.clone().find(|c| !c.is_whitespace());
            if matches!(next_significant, Some('}') | Some(']')) {
                continue;
            }
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_comments_and_trailing_commas() {
        let source = r#"{
            // line comment
            "compilerOptions": {
                /* block */ "outDir": "dist",
                "jsx": "react",
            },
            "include": ["src/**/*", "https://not-a-comment"],
        }"#;
        let config = parse_tsconfig(source).unwrap();
        let options = config.compiler_options.unwrap();
        assert_eq!(options.out_dir.as_deref(), Some("dist"));
        assert_eq!(options.jsx.as_deref(), Some("react"));
        assert_eq!(
            config.include.unwrap(),
            vec!["src/**/*".to_string(), "https://not-a-comment".to_string()]
        );
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_tsconfig("{ \"compilerOptions\": ").is_err());
    }

    #[test]
    fn anchors_paths_to_declaring_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{ "compilerOptions": { "outDir": "./dist" }, "include": ["src"] }"#,
        )
        .unwrap();

        let config = load_tsconfig(&path).unwrap();
        let out_dir = config.compiler_options.unwrap().out_dir.unwrap();
        assert_eq!(PathBuf::from(out_dir), dir.path().join("dist"));
        assert_eq!(
            PathBuf::from(&config.include.unwrap()[0]),
            dir.path().join("src")
        );
    }

    #[test]
    fn child_options_override_extended_base() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("configs")).unwrap();
        fs::write(
            dir.path().join("configs").join("base.json"),
            r#"{ "compilerOptions": { "outDir": "../lib", "jsx": "preserve", "module": "esnext" } }"#,
        )
        .unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{ "extends": "./configs/base", "compilerOptions": { "jsx": "react" } }"#,
        )
        .unwrap();

        let options = load_tsconfig(&path).unwrap().compiler_options.unwrap();
        assert_eq!(options.jsx.as_deref(), Some("react"));
        assert_eq!(options.module.as_deref(), Some("esnext"));
        assert_eq!(
            PathBuf::from(options.out_dir.unwrap()),
            dir.path().join("lib")
        );
    }

    #[test]
    fn dotted_extends_name_gets_json_suffix() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tsconfig.base.json"),
            r#"{ "compilerOptions": { "module": "commonjs" } }"#,
        )
        .unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "extends": "./tsconfig.base" }"#).unwrap();

        let options = load_tsconfig(&path).unwrap().compiler_options.unwrap();
        assert_eq!(options.module.as_deref(), Some("commonjs"));
    }

    #[test]
    fn extends_cycle_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = load_tsconfig(&dir.path().join("a.json")).unwrap_err();
        assert!(format!("{err:#}").contains("cycle"), "got: {err:#}");
    }

    #[test]
    fn package_extends_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "extends": "@tsconfig/node20" }"#).unwrap();

        assert!(load_tsconfig(&path).is_err());
    }

    #[test]
    fn normalize_folds_parent_components() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./../c")),
            PathBuf::from("/a/c")
        );
    }
}
