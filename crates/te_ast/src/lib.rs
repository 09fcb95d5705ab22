//! Shared types for tsesm.
//!
//! The small set of types passed between the configuration layer, the passes
//! and the driver (the passes use the SWC AST directly):
//! - JSX emit modes and module kinds as declared in `tsconfig.json`
//! - Diagnostics surfaced to the user after an emit

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use swc_common::{SourceMap, Span};

/// How JSX in `.tsx` sources is emitted (`compilerOptions.jsx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsxMode {
    /// Classic `React.createElement(...)` calls. The only mode that is lowered.
    React,
    /// Keep JSX as written.
    Preserve,
    /// Keep JSX as written, emitted with a `.js` extension by tsc.
    ReactNative,
    /// Automatic runtime (`react/jsx-runtime`).
    ReactJsx,
    /// Automatic runtime, development flavour.
    ReactJsxDev,
}

impl fmt::Display for JsxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsxMode::React => write!(f, "react"),
            JsxMode::Preserve => write!(f, "preserve"),
            JsxMode::ReactNative => write!(f, "react-native"),
            JsxMode::ReactJsx => write!(f, "react-jsx"),
            JsxMode::ReactJsxDev => write!(f, "react-jsxdev"),
        }
    }
}

/// Module format requested by `compilerOptions.module`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    None,
    CommonJS,
    Amd,
    Umd,
    System,
    ES2015,
    ES2020,
    ES2022,
    ESNext,
    Node16,
    NodeNext,
    Preserve,
}

impl ModuleKind {
    /// Whether the kind is satisfied by emitting ECMAScript `import`/`export`.
    pub fn is_esm(self) -> bool {
        matches!(
            self,
            ModuleKind::ES2015
                | ModuleKind::ES2020
                | ModuleKind::ES2022
                | ModuleKind::ESNext
                | ModuleKind::Node16
                | ModuleKind::NodeNext
                | ModuleKind::Preserve
        )
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleKind::None => "none",
            ModuleKind::CommonJS => "commonjs",
            ModuleKind::Amd => "amd",
            ModuleKind::Umd => "umd",
            ModuleKind::System => "system",
            ModuleKind::ES2015 => "es2015",
            ModuleKind::ES2020 => "es2020",
            ModuleKind::ES2022 => "es2022",
            ModuleKind::ESNext => "esnext",
            ModuleKind::Node16 => "node16",
            ModuleKind::NodeNext => "nodenext",
            ModuleKind::Preserve => "preserve",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// 1-based line and column of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A problem found while compiling. Never fatal on its own: the driver
/// collects these and the CLI prints them after emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: Option<PathBuf>,
    pub position: Option<Position>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic that is not tied to a source file.
    pub fn global(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: None,
            position: None,
            severity,
            message: message.into(),
        }
    }

    /// A diagnostic pointing at `span` inside `file`.
    ///
    /// Dummy spans (synthesized nodes) keep the file but drop the position.
    pub fn at_span(
        file: &Path,
        source_map: &SourceMap,
        span: Span,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        let position = if span.is_dummy() {
            None
        } else {
            let loc = source_map.lookup_char_pos(span.lo);
            Some(Position {
                line: loc.line,
                column: loc.col.0 + 1,
            })
        };

        Self {
            file: Some(file.to_path_buf()),
            position,
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.position) {
            (Some(file), Some(pos)) => {
                write!(f, "{}:{}:{} - ", file.display(), pos.line, pos.column)?
            }
            (Some(file), None) => write!(f, "{} - ", file.display())?,
            _ => {}
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_es_module_kinds_are_esm() {
        assert!(ModuleKind::ESNext.is_esm());
        assert!(ModuleKind::NodeNext.is_esm());
        assert!(!ModuleKind::CommonJS.is_esm());
        assert!(!ModuleKind::Umd.is_esm());
    }

    #[test]
    fn diagnostic_display_includes_position() {
        let diag = Diagnostic {
            file: Some(PathBuf::from("src/a.ts")),
            position: Some(Position { line: 3, column: 7 }),
            severity: Severity::Error,
            message: "Expression expected".into(),
        };
        assert_eq!(diag.to_string(), "src/a.ts:3:7 - error: Expression expected");

        let global = Diagnostic::global(Severity::Warning, "module kind ignored");
        assert_eq!(global.to_string(), "warning: module kind ignored");
    }

    #[test]
    fn diagnostic_serializes_lowercase_severity() {
        let diag = Diagnostic::global(Severity::Warning, "x");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["file"], serde_json::Value::Null);
    }
}
