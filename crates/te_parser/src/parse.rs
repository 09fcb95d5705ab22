use std::path::{Path, PathBuf};

use swc_common::{comments::SingleThreadedComments, sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{error::Error as SwcError, Syntax, TsSyntax};
use te_ast::{Diagnostic, Severity};
use thiserror::Error;

/// Result of parsing one source file.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
    /// Errors the parser recovered from. The module is still usable.
    pub diagnostics: Vec<Diagnostic>,
}

/// The file could not be turned into a module at all.
#[derive(Debug, Error)]
#[error("failed to parse {}", path.display())]
pub struct ParseError {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a TypeScript source string. `.tsx` files enable JSX; `.mts`/`.cts`
/// disallow the ambiguous `<T>expr` assertion syntax, as tsc does.
pub fn parse_typescript(source: &str, path: &Path) -> Result<ParseResult, ParseError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Real(path.to_path_buf())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let ts_syntax = Syntax::Typescript(TsSyntax {
        tsx: extension == "tsx",
        decorators: true,
        disallow_ambiguous_jsx_like: matches!(extension, "mts" | "cts"),
        ..Default::default()
    });

    let mut recovered = vec![];
    let parsed = swc_ecma_parser::parse_file_as_module(
        &source_file,
        ts_syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    );

    let mut diagnostics: Vec<Diagnostic> = recovered
        .into_iter()
        .map(|err| to_diagnostic(path, &source_map, err))
        .collect();

    match parsed {
        Ok(module) => Ok(ParseResult {
            module,
            comments,
            source_map,
            diagnostics,
        }),
        Err(err) => {
            diagnostics.push(to_diagnostic(path, &source_map, err));
            Err(ParseError {
                path: path.to_path_buf(),
                diagnostics,
            })
        }
    }
}

fn to_diagnostic(path: &Path, source_map: &SourceMap, err: SwcError) -> Diagnostic {
    Diagnostic::at_span(
        path,
        source_map,
        err.span(),
        Severity::Error,
        err.kind().msg(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typescript_module() {
        let parsed = parse_typescript(
            "import { a } from './a';\nexport const b: number = a;\n",
            Path::new("src/b.ts"),
        )
        .unwrap();
        assert_eq!(parsed.module.body.len(), 2);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn jsx_only_parses_in_tsx_files() {
        let source = "export const el = <div />;\n";
        assert!(parse_typescript(source, Path::new("view.tsx")).is_ok());
        let as_ts = parse_typescript(source, Path::new("view.ts"));
        assert!(as_ts.map_or(true, |parsed| !parsed.diagnostics.is_empty()));
    }

    #[test]
    fn fatal_error_reports_position() {
        let err = parse_typescript("const = 1;\n", Path::new("bad.ts"))
            .err()
            .expect("parse should fail");
        assert_eq!(err.path, PathBuf::from("bad.ts"));
        let diag = err.diagnostics.last().unwrap();
        assert!(diag.is_error());
        assert_eq!(diag.file.as_deref(), Some(Path::new("bad.ts")));
        assert_eq!(diag.position.map(|p| p.line), Some(1));
    }
}
