use std::path::Path;

use swc_common::{Mark, GLOBALS, DUMMY_SP};
use swc_ecma_ast::{EsVersion, Pass, Program};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};
use swc_ecma_transforms_base::{fixer::fixer, hygiene::hygiene, resolver};
use swc_ecma_transforms_typescript::strip;
use swc_ecma_visit::VisitMutWith;
use te_ast::{Diagnostic, Severity};
use te_jsx::{lower_module, JsxFactory};
use te_parser::{parse_typescript, ParseError, ParseResult};
use te_specifier::{DiskProbe, ResolveOptions, SpecifierRewriter};
use thiserror::Error;
use tracing::debug;

/// Per-run settings shared by every file.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub target: EsVersion,
    /// Factory for JSX lowering. `None` leaves JSX in the output.
    pub jsx_factory: Option<JsxFactory>,
    pub resolve: ResolveOptions,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            target: EsVersion::latest(),
            jsx_factory: None,
            resolve: ResolveOptions::default(),
        }
    }
}

/// The printed module plus whatever the parser recovered from.
#[derive(Debug, Clone)]
pub struct EmittedSource {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    pub rewritten_specifiers: usize,
}

#[derive(Debug, Error)]
pub enum EmitError {
    /// The source is not a module. Reported, and the file is skipped.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// JSX that cannot be lowered. Aborts the run.
    #[error("{0}")]
    Jsx(Diagnostic),

    #[error("failed to print {path}")]
    Print {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Compile one TypeScript source into ECMAScript module text.
///
/// `path` decides the syntax (`.tsx` enables JSX) and the directory
/// relative specifiers are probed against.
pub fn emit_source(source: &str, path: &Path, options: &EmitOptions) -> Result<EmittedSource, EmitError> {
    let ParseResult {
        module,
        comments,
        source_map,
        diagnostics,
    } = parse_typescript(source, path)?;

    // Lowering runs before type stripping so the factory's root identifier
    // counts as a use of its import.
    let module = match &options.jsx_factory {
        Some(factory) => lower_module(module, factory, comments.clone()).map_err(|err| {
            EmitError::Jsx(Diagnostic::at_span(
                path,
                &source_map,
                err.span().unwrap_or(DUMMY_SP),
                Severity::Error,
                err.to_string(),
            ))
        })?,
        None => module,
    };

    let source_dir = path.parent().unwrap_or_else(|| Path::new("."));

    GLOBALS.set(&Default::default(), || -> Result<EmittedSource, EmitError> {
        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();

        let mut program = Program::Module(module);
        let mut passes = (
            resolver(unresolved_mark, top_level_mark, true),
            strip(unresolved_mark, top_level_mark),
            hygiene(),
            fixer(Some(&comments)),
        );
        passes.process(&mut program);

        let mut rewriter = SpecifierRewriter::new(&DiskProbe, source_dir, options.resolve);
        program.visit_mut_with(&mut rewriter);
        let rewritten_specifiers = rewriter.rewritten();
        debug!(path = %path.display(), rewritten_specifiers, "rewrote specifiers");

        let mut buf = Vec::new();
        {
            let mut emitter = Emitter {
                cfg: swc_ecma_codegen::Config::default().with_target(options.target),
                cm: source_map.clone(),
                comments: Some(&comments),
                wr: JsWriter::new(source_map.clone(), "\n", &mut buf, None),
            };
            program.emit_with(&mut emitter).map_err(|source| EmitError::Print {
                path: path.display().to_string(),
                source,
            })?;
        }

        Ok(EmittedSource {
            code: String::from_utf8_lossy(&buf).into_owned(),
            diagnostics,
            rewritten_specifiers,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn react_options() -> EmitOptions {
        EmitOptions {
            jsx_factory: Some(JsxFactory::default()),
            resolve: ResolveOptions { jsx: true },
            ..Default::default()
        }
    }

    #[test]
    fn strips_types_and_rewrites_specifiers() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ts"), "export const a = 1;").unwrap();
        let source = "import { a } from './a';\n\
                      import type { T } from './types';\n\
                      interface Local { x: T }\n\
                      export const b: number = a;\n";

        let out = emit_source(source, &dir.path().join("b.ts"), &EmitOptions::default()).unwrap();

        assert!(out.code.contains("./a.js"), "{}", out.code);
        assert!(!out.code.contains("./types"), "{}", out.code);
        assert!(!out.code.contains("interface"), "{}", out.code);
        assert!(!out.code.contains(": number"), "{}", out.code);
        assert!(out.code.contains("export const b = a;"), "{}", out.code);
        assert_eq!(out.rewritten_specifiers, 1);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn reexports_are_rewritten() {
        let dir = tempdir().unwrap();
        let source = "export * from './all';\nexport { x } from \"../up\";\n";

        let out = emit_source(source, &dir.path().join("index.ts"), &EmitOptions::default()).unwrap();

        assert!(out.code.contains("'./all.js'"), "{}", out.code);
        assert!(out.code.contains("\"../up.js\""), "{}", out.code);
    }

    #[test]
    fn lowers_jsx_with_pure_annotation() {
        let dir = tempdir().unwrap();
        let source = "import React from 'react';\n\
                      export const el = <div a=\"1\">text</div>;\n";

        let out = emit_source(source, &dir.path().join("view.tsx"), &react_options()).unwrap();

        assert!(out.code.contains("import React from 'react'"), "{}", out.code);
        assert!(out.code.contains("/*#__PURE__*/"), "{}", out.code);
        assert!(out.code.contains("React.createElement(div"), "{}", out.code);
        assert!(out.code.contains("\"text\""), "{}", out.code);
        assert!(!out.code.contains("<div"), "{}", out.code);
    }

    #[test]
    fn jsx_is_kept_without_factory() {
        let dir = tempdir().unwrap();
        let source = "export const el = <div>text</div>;\n";
        let options = EmitOptions {
            resolve: ResolveOptions { jsx: true },
            ..Default::default()
        };

        let out = emit_source(source, &dir.path().join("view.tsx"), &options).unwrap();

        assert!(out.code.contains("<div>"), "{}", out.code);
        assert!(!out.code.contains("createElement"), "{}", out.code);
    }

    #[test]
    fn enums_are_lowered_to_plain_javascript() {
        let dir = tempdir().unwrap();
        let source = "enum Color { Red, Green }\n\
                      export const c = Color.Red;\n";

        let out = emit_source(source, &dir.path().join("color.ts"), &EmitOptions::default()).unwrap();

        assert!(!out.code.contains("enum "), "{}", out.code);
        assert!(out.code.contains("Color.Red"), "{}", out.code);
        assert!(!out.code.contains("Color#"), "{}", out.code);
        let second = emit_source(source, &dir.path().join("color.ts"), &EmitOptions::default()).unwrap();
        assert_eq!(out.code, second.code);
    }

    #[test]
    fn parse_failure_is_reported() {
        let dir = tempdir().unwrap();
        let err = emit_source("const = 1;\n", &dir.path().join("bad.ts"), &EmitOptions::default())
            .unwrap_err();

        let EmitError::Parse(err) = err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(err.diagnostics.iter().all(Diagnostic::is_error));
        assert!(!err.diagnostics.is_empty());
    }

    #[test]
    fn spread_child_aborts_with_position() {
        let dir = tempdir().unwrap();
        let source = "import React from 'react';\n\
                      export const el = <div>{...items}</div>;\n";

        let err = emit_source(source, &dir.path().join("list.tsx"), &react_options()).unwrap_err();

        let EmitError::Jsx(diagnostic) = err else {
            panic!("expected a JSX error, got {err:?}");
        };
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.position.map(|pos| pos.line), Some(2));
    }

    #[test]
    fn output_is_deterministic() {
        let dir = tempdir().unwrap();
        let source = "import React from 'react';\n\
                      import { helper } from './helper';\n\
                      export const el = <><b>{helper()}</b></>;\n";
        let path = dir.path().join("app.tsx");

        let first = emit_source(source, &path, &react_options()).unwrap();
        let second = emit_source(source, &path, &react_options()).unwrap();
        assert_eq!(first.code, second.code);
    }
}
