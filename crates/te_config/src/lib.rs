//! Project configuration for tsesm.
//!
//! Reads `tsconfig.json` the way `tsc` does for the options tsesm cares
//! about:
//!
//! - upward discovery from the working directory (or an explicit project path)
//! - JSONC input (comments, trailing commas) and relative `extends` chains
//! - `files`/`include`/`exclude` expansion into the list of sources to emit

pub mod discover;
pub mod options;
pub mod project;
pub mod tsconfig;

pub use discover::{discover_files, find_tsconfig, is_emittable_source, resolve_tsconfig_path};
pub use options::{resolve_compiler_options, ResolvedCompilerOptions, DEFAULT_JSX_FACTORY};
pub use project::{load_project, ProjectConfig};
pub use tsconfig::{load_tsconfig, normalize_path, parse_tsconfig, CompilerOptions, TsConfig};
