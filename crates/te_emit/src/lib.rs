//! The tsesm compile driver.
//!
//! [`compile`] loads the project, clears the output directory and emits
//! every source file through [`emit_source`]:
//!
//! parse → JSX lowering → scope resolution + type stripping → specifier
//! rewriting → print → write.

pub mod compile;
pub mod emit;
pub mod output;

pub use compile::{compile, compile_project, CompileOutcome, CompileRequest};
pub use emit::{emit_source, EmitError, EmitOptions, EmittedSource};
pub use output::{clean_out_dir, common_source_dir, output_path, write_output};
