//! Specifier rewriting pass for tsesm.
//!
//! Strict ESM resolution wants `import "./a.js"`, while TypeScript sources
//! are usually written as `import "./a"`. This pass appends the emitted
//! extension to every relative `import`/`export ... from` specifier, probing
//! the source tree to tell `./a.ts` from `./a.tsx` or `./a.json`.

pub mod resolve;
pub mod rewrite;

pub use resolve::{
    emitted_extension, is_relative, rewrite_specifier, rewrite_specifier_with, DiskProbe,
    FileProbe, ResolveOptions, EMITTED_EXTENSIONS,
};
pub use rewrite::{rewrite_module_specifiers, SpecifierRewriter};
