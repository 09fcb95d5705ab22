use colored::Colorize;
use te_ast::{Diagnostic, Severity};

/// Render one diagnostic for the terminal:
/// `src/a.ts:3:7 - error: Expected ident`.
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let mut out = String::new();
    match (&diagnostic.file, diagnostic.position) {
        (Some(file), Some(pos)) => {
            out.push_str(&format!("{}:{}:{}", file.display(), pos.line, pos.column).cyan().to_string());
            out.push_str(" - ");
        }
        (Some(file), None) => {
            out.push_str(&file.display().to_string().cyan().to_string());
            out.push_str(" - ");
        }
        _ => {}
    }

    let label = match diagnostic.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };
    out.push_str(&format!("{label}: {}", diagnostic.message));
    out
}

pub fn summary(emitted: usize, diagnostics: &[Diagnostic]) -> String {
    let errors = diagnostics.iter().filter(|diag| diag.is_error()).count();
    let warnings = diagnostics.len() - errors;
    let files = if emitted == 1 { "file" } else { "files" };

    let mut line = format!("emitted {emitted} {files}");
    if errors > 0 {
        line.push_str(&format!(
            ", {} {}",
            errors,
            if errors == 1 { "error" } else { "errors" }
        ));
    }
    if warnings > 0 {
        line.push_str(&format!(
            ", {} {}",
            warnings,
            if warnings == 1 { "warning" } else { "warnings" }
        ));
    }
    line
}
