use swc_common::Span;
use thiserror::Error;

/// Failures of the JSX lowering pass. All of them abort the run.
#[derive(Debug, Error)]
pub enum JsxError {
    #[error("invalid JSX factory '{0}': expected a dotted identifier path such as `React.createElement`")]
    InvalidFactory(String),

    #[error("unsupported JSX child: {kind}")]
    UnsupportedChild { kind: &'static str, span: Span },

    #[error("JSX attribute '{name}' has an empty expression")]
    EmptyAttributeExpression { name: String, span: Span },
}

impl JsxError {
    /// Where in the source the problem is, if it comes from a node.
    pub fn span(&self) -> Option<Span> {
        match self {
            JsxError::InvalidFactory(_) => None,
            JsxError::UnsupportedChild { span, .. }
            | JsxError::EmptyAttributeExpression { span, .. } => Some(*span),
        }
    }
}
