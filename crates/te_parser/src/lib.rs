//! TypeScript/TSX parsing for tsesm.
//!
//! Wraps the standard SWC parser: picks the syntax from the file extension,
//! collects comments for re-emission and turns parser errors into
//! [`te_ast::Diagnostic`]s instead of printing them.

pub mod parse;

pub use parse::{parse_typescript, ParseError, ParseResult};
