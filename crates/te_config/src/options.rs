//! Turning raw `compilerOptions` strings into typed settings.

use std::path::PathBuf;

use anyhow::{bail, Result};
use swc_ecma_ast::EsVersion;
use te_ast::{JsxMode, ModuleKind};

use crate::tsconfig::CompilerOptions;

pub const DEFAULT_JSX_FACTORY: &str = "React.createElement";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCompilerOptions {
    pub out_dir: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
    pub module: ModuleKind,
    pub target: EsVersion,
    pub jsx: Option<JsxMode>,
    /// Dotted callee used for lowered JSX, e.g. `React.createElement` or `h`.
    pub jsx_factory: String,
}

impl Default for ResolvedCompilerOptions {
    fn default() -> Self {
        Self {
            out_dir: None,
            root_dir: None,
            module: ModuleKind::ESNext,
            target: EsVersion::latest(),
            jsx: None,
            jsx_factory: DEFAULT_JSX_FACTORY.to_string(),
        }
    }
}

impl ResolvedCompilerOptions {
    /// Whether `.tsx`/`.jsx` files take part in emit and specifier probing.
    pub fn jsx_enabled(&self) -> bool {
        self.jsx.is_some()
    }
}

pub fn resolve_compiler_options(options: Option<&CompilerOptions>) -> Result<ResolvedCompilerOptions> {
    let mut resolved = ResolvedCompilerOptions::default();
    let Some(options) = options else {
        return Ok(resolved);
    };

    if let Some(target) = options.target.as_deref() {
        resolved.target = parse_script_target(target)?;
    }
    if let Some(module) = options.module.as_deref() {
        resolved.module = parse_module_kind(module)?;
    }
    if let Some(jsx) = options.jsx.as_deref() {
        resolved.jsx = Some(parse_jsx_mode(jsx)?);
    }

    if let Some(factory) = options.jsx_factory.as_deref() {
        resolved.jsx_factory = factory.trim().to_string();
    } else if let Some(namespace) = options.react_namespace.as_deref() {
        resolved.jsx_factory = format!("{}.createElement", namespace.trim());
    }

    resolved.out_dir = options.out_dir.as_deref().map(PathBuf::from);
    resolved.root_dir = options.root_dir.as_deref().map(PathBuf::from);

    Ok(resolved)
}

fn parse_script_target(value: &str) -> Result<EsVersion> {
    let target = match normalize_option(value).as_str() {
        "es3" => EsVersion::Es3,
        "es5" => EsVersion::Es5,
        "es6" | "es2015" => EsVersion::Es2015,
        "es2016" => EsVersion::Es2016,
        "es2017" => EsVersion::Es2017,
        "es2018" => EsVersion::Es2018,
        "es2019" => EsVersion::Es2019,
        "es2020" => EsVersion::Es2020,
        "es2021" => EsVersion::Es2021,
        "es2022" => EsVersion::Es2022,
        "es2023" | "es2024" | "esnext" => EsVersion::EsNext,
        _ => bail!("unsupported compilerOptions.target '{}'", value),
    };

    Ok(target)
}

fn parse_module_kind(value: &str) -> Result<ModuleKind> {
    let module = match normalize_option(value).as_str() {
        "none" => ModuleKind::None,
        "commonjs" => ModuleKind::CommonJS,
        "amd" => ModuleKind::Amd,
        "umd" => ModuleKind::Umd,
        "system" => ModuleKind::System,
        "es6" | "es2015" => ModuleKind::ES2015,
        "es2020" => ModuleKind::ES2020,
        "es2022" => ModuleKind::ES2022,
        "esnext" => ModuleKind::ESNext,
        "node16" => ModuleKind::Node16,
        "nodenext" => ModuleKind::NodeNext,
        "preserve" => ModuleKind::Preserve,
        _ => bail!("unsupported compilerOptions.module '{}'", value),
    };

    Ok(module)
}

fn parse_jsx_mode(value: &str) -> Result<JsxMode> {
    let jsx = match normalize_option(value).as_str() {
        "react" => JsxMode::React,
        "preserve" => JsxMode::Preserve,
        "reactnative" => JsxMode::ReactNative,
        "reactjsx" => JsxMode::ReactJsx,
        "reactjsxdev" => JsxMode::ReactJsxDev,
        _ => bail!("unsupported compilerOptions.jsx '{}'", value),
    };

    Ok(jsx)
}

fn normalize_option(value: &str) -> String {
    value
        .chars()
        .filter(|ch| *ch != '-' && *ch != '_' && !ch.is_whitespace())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
