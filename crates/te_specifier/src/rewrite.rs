use std::path::Path;

use swc_ecma_ast::{ExportAll, ImportDecl, Module, NamedExport, Str};
use swc_ecma_visit::{VisitMut, VisitMutWith};
use tracing::debug;

use crate::resolve::{rewrite_specifier_with, DiskProbe, FileProbe, ResolveOptions};

/// Rewrites the string specifier of every static `import`/`export ... from`
/// declaration. Dynamic `import()` and `require` calls are left alone.
pub struct SpecifierRewriter<'a, P: FileProbe + ?Sized = DiskProbe> {
    probe: &'a P,
    source_dir: &'a Path,
    options: ResolveOptions,
    rewritten: usize,
}

impl<'a, P: FileProbe + ?Sized> SpecifierRewriter<'a, P> {
    pub fn new(probe: &'a P, source_dir: &'a Path, options: ResolveOptions) -> Self {
        Self {
            probe,
            source_dir,
            options,
            rewritten: 0,
        }
    }

    /// Number of specifiers changed so far.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    fn rewrite(&mut self, src: &mut Str) {
        let Some(current) = src.value.as_str().map(str::to_string) else {
            return;
        };
        let Some(next) = rewrite_specifier_with(self.probe, &current, self.source_dir, self.options)
        else {
            return;
        };

        debug!(from = %current, to = %next, "rewrote module specifier");
        // Keep the author's quote style when the new text needs no escaping.
        src.raw = quote_of(src.raw.as_deref())
            .filter(|quote| !next.contains(*quote) && !next.contains('\\'))
            .map(|quote| format!("{quote}{next}{quote}").into());
        src.value = next.as_str().into();
        self.rewritten += 1;
    }
}

impl<P: FileProbe + ?Sized> VisitMut for SpecifierRewriter<'_, P> {
    fn visit_mut_import_decl(&mut self, decl: &mut ImportDecl) {
        self.rewrite(&mut decl.src);
    }

    fn visit_mut_named_export(&mut self, export: &mut NamedExport) {
        if let Some(src) = export.src.as_mut() {
            self.rewrite(src);
        }
    }

    fn visit_mut_export_all(&mut self, export: &mut ExportAll) {
        self.rewrite(&mut export.src);
    }
}

fn quote_of(raw: Option<&str>) -> Option<char> {
    raw?.chars().next().filter(|ch| matches!(ch, '\'' | '"'))
}

/// Rewrite every relative specifier in `module`, probing next to
/// `source_dir`. Returns the module and the number of specifiers changed.
pub fn rewrite_module_specifiers(
    mut module: Module,
    source_dir: &Path,
    options: ResolveOptions,
) -> (Module, usize) {
    let mut rewriter = SpecifierRewriter::new(&DiskProbe, source_dir, options);
    module.visit_mut_with(&mut rewriter);
    let rewritten = rewriter.rewritten();
    (module, rewritten)
}
