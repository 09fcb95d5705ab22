//! Best-effort, disk-based extension resolution for one specifier.
//!
//! This is not a module resolver: package manifests, export conditions and
//! directory indexes are never consulted.

use std::path::Path;

/// Extensions that already name an emitted file; such specifiers are final.
pub const EMITTED_EXTENSIONS: &[&str] = &["js", "cjs", "mjs", "jsx", "json"];

const TS_SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];
const DECLARATION_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

/// Probe order. The flag marks candidates only tried when JSX is enabled.
const PROBE_SUFFIXES: &[(&str, bool)] = &[
    (".ts", false),
    (".tsx", true),
    (".json", false),
    (".js", false),
    (".jsx", true),
];

/// Filesystem existence check used while probing candidates.
pub trait FileProbe {
    fn is_file(&self, path: &Path) -> bool;
}

/// Probes the real filesystem, uncached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl FileProbe for DiskProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Whether `.tsx`/`.jsx` candidates take part in probing.
    pub jsx: bool,
}

/// `./x` and `../x` are relative; everything else is a package or URL.
///
/// Bare `.` and `..` name directories. Directory index files are not
/// resolved, so those specifiers are left as written.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Map a source extension to its emitted counterpart by swapping the first
/// `t` for a `j`: `ts` → `js`, `.tsx` → `.jsx`, `mts` → `mjs`. Extensions
/// without a `t` (`json`, `js`) come back unchanged.
pub fn emitted_extension(extension: &str) -> String {
    extension.replacen('t', "j", 1)
}

/// Rewrite `specifier` as imported from a file in `source_dir`, probing the
/// real filesystem. `None` means the specifier is left as written.
pub fn rewrite_specifier(
    specifier: &str,
    source_dir: &Path,
    options: ResolveOptions,
) -> Option<String> {
    rewrite_specifier_with(&DiskProbe, specifier, source_dir, options)
}

pub fn rewrite_specifier_with<P: FileProbe + ?Sized>(
    probe: &P,
    specifier: &str,
    source_dir: &Path,
    options: ResolveOptions,
) -> Option<String> {
    if !is_relative(specifier) {
        return None;
    }

    if let Some(extension) = Path::new(specifier).extension().and_then(|ext| ext.to_str()) {
        if EMITTED_EXTENSIONS.contains(&extension) {
            return None;
        }
        // `./a.ts` written out explicitly
        if TS_SOURCE_EXTENSIONS.contains(&extension)
            && !DECLARATION_SUFFIXES
                .iter()
                .any(|suffix| specifier.ends_with(suffix))
        {
            let stem = &specifier[..specifier.len() - extension.len()];
            return Some(format!("{stem}{}", emitted_extension(extension)));
        }
    }

    for (suffix, jsx_only) in PROBE_SUFFIXES {
        if *jsx_only && !options.jsx {
            continue;
        }
        let candidate = source_dir.join(format!("{specifier}{suffix}"));
        if probe.is_file(&candidate) {
            return Some(format!("{specifier}{}", emitted_extension(suffix)));
        }
    }

    Some(format!("{specifier}.js"))
}
