use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::info;

use crate::discover::{discover_files, resolve_tsconfig_path};
use crate::options::{resolve_compiler_options, ResolvedCompilerOptions};
use crate::tsconfig::load_tsconfig;

/// Everything the driver needs from the project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub base_dir: PathBuf,
    pub options: ResolvedCompilerOptions,
    pub files: Vec<PathBuf>,
}

/// Locate, parse and resolve the project configuration.
///
/// Every failure here is fatal: nothing has been emitted yet.
pub fn load_project(cwd: &Path, project: Option<&Path>) -> Result<ProjectConfig> {
    let config_path = resolve_tsconfig_path(cwd, project)?;
    info!(path = %config_path.display(), "using project configuration");

    let config = load_tsconfig(&config_path)?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;

    let options = resolve_compiler_options(config.compiler_options.as_ref())?;
    let files = discover_files(&base_dir, &config, options.out_dir.as_deref())?;

    Ok(ProjectConfig {
        config_path,
        base_dir,
        options,
        files,
    })
}
