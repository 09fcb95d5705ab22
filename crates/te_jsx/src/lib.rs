//! JSX lowering pass for tsesm.
//!
//! Rewrites JSX elements and fragments into classic factory calls before
//! types are erased:
//! - `<div a="1">hi</div>` → `/*#__PURE__*/ React.createElement(div, { a: "1" }, "hi")`
//! - `<>{x}</>`            → `/*#__PURE__*/ React.createElement(x)`
//!
//! Spread children and other constructs without a classic-runtime
//! equivalent are rejected with a [`JsxError`].

pub mod error;
pub mod factory;
pub mod lower;
pub mod text;

pub use error::JsxError;
pub use factory::JsxFactory;
pub use lower::{lower_module, JsxLowering};
