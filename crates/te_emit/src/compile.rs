use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use te_ast::{Diagnostic, JsxMode, Severity};
use te_config::{is_emittable_source, load_project, ProjectConfig};
use te_jsx::JsxFactory;
use te_specifier::ResolveOptions;
use tracing::{debug, info, warn};

use crate::emit::{emit_source, EmitError, EmitOptions};
use crate::output::{clean_out_dir, common_source_dir, output_path, write_output};

/// What the caller asked for: a working directory and an optional explicit
/// project (a `tsconfig.json` or the directory holding one).
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub cwd: PathBuf,
    pub project: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct CompileOutcome {
    /// Written files, in emit order.
    pub emitted: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Load the project and emit it.
///
/// Errors returned here are fatal (configuration, output cleanup, JSX that
/// cannot be lowered, I/O). Everything else ends up in the outcome's
/// diagnostics.
pub fn compile(request: &CompileRequest) -> Result<CompileOutcome> {
    let project = load_project(&request.cwd, request.project.as_deref())?;
    compile_project(&project)
}

pub fn compile_project(project: &ProjectConfig) -> Result<CompileOutcome> {
    let options = &project.options;
    let mut outcome = CompileOutcome::default();

    if !options.module.is_esm() {
        let message = format!(
            "module '{}' is not an ECMAScript module format; output is emitted as ES modules",
            options.module
        );
        warn!("{message}");
        outcome
            .diagnostics
            .push(Diagnostic::global(Severity::Warning, message));
    }

    let jsx_factory = match options.jsx {
        Some(JsxMode::React) => {
            let factory = JsxFactory::parse(&options.jsx_factory)?;
            debug!(%factory, "lowering JSX to factory calls");
            Some(factory)
        }
        Some(mode) => {
            let message = format!("jsx '{mode}' is not lowered; JSX is emitted as written");
            warn!("{message}");
            outcome
                .diagnostics
                .push(Diagnostic::global(Severity::Warning, message));
            None
        }
        None => None,
    };

    if let Some(out_dir) = options.out_dir.as_deref() {
        if project.base_dir.starts_with(out_dir) {
            bail!(
                "refusing to clear output directory {}: it contains the project",
                out_dir.display()
            );
        }
        clean_out_dir(out_dir)?;
    }

    let root_dir = options
        .root_dir
        .clone()
        .or_else(|| common_source_dir(&project.files));

    let emit_options = EmitOptions {
        target: options.target,
        jsx_factory,
        resolve: ResolveOptions {
            jsx: options.jsx_enabled(),
        },
    };

    for file in &project.files {
        if !is_emittable_source(file) {
            debug!(path = %file.display(), "skipping non-emittable source");
            continue;
        }
        let jsx_output = options.jsx_enabled();
        let Some(target) = output_path(
            file,
            root_dir.as_deref(),
            options.out_dir.as_deref(),
            jsx_output,
        ) else {
            outcome.diagnostics.push(Diagnostic {
                file: Some(file.clone()),
                position: None,
                severity: Severity::Error,
                message: format!(
                    "file is not under rootDir '{}'",
                    root_dir
                        .as_ref()
                        .map(|dir| dir.display().to_string())
                        .unwrap_or_default()
                ),
            });
            continue;
        };

        if !jsx_output && has_extension(file, "tsx") {
            let message =
                "compilerOptions.jsx is not set; JSX in this file is emitted as written".to_string();
            warn!(path = %file.display(), "{message}");
            outcome.diagnostics.push(Diagnostic {
                file: Some(file.clone()),
                position: None,
                severity: Severity::Warning,
                message,
            });
        }

        if let Some(path) = emit_file(file, &target, &emit_options, &mut outcome.diagnostics)? {
            outcome.emitted.push(path);
        }
    }

    info!(
        emitted = outcome.emitted.len(),
        diagnostics = outcome.diagnostics.len(),
        "compilation finished"
    );
    Ok(outcome)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Emit one file. `Ok(None)` means the file was skipped with diagnostics.
fn emit_file(
    file: &Path,
    target: &Path,
    options: &EmitOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<PathBuf>> {
    let source =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;

    match emit_source(&source, file, options) {
        Ok(emitted) => {
            diagnostics.extend(emitted.diagnostics);
            write_output(target, &emitted.code)?;
            info!(source = %file.display(), output = %target.display(), "emitted");
            Ok(Some(target.to_path_buf()))
        }
        Err(EmitError::Parse(err)) => {
            warn!(path = %file.display(), "skipping file that failed to parse");
            diagnostics.extend(err.diagnostics);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
