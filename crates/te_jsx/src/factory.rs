//! The callee of lowered JSX and the call nodes built around it.
//!
//! `<a />` → `/*#__PURE__*/ React.createElement(a, {}, null)`

use std::fmt;

use swc_common::{Span, DUMMY_SP};
use swc_ecma_ast as ast;

use crate::error::JsxError;

/// A dotted identifier path such as `React.createElement` or `h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxFactory {
    root: String,
    members: Vec<String>,
}

impl JsxFactory {
    pub fn parse(name: &str) -> Result<Self, JsxError> {
        let mut segments = name.split('.').map(str::to_string);
        let root = segments.next().unwrap_or_default();
        let members: Vec<String> = segments.collect();
        if !is_identifier(&root) || members.iter().any(|member| !is_identifier(member)) {
            return Err(JsxError::InvalidFactory(name.to_string()));
        }
        Ok(Self { root, members })
    }

    /// Build the callee expression (`React.createElement`).
    pub fn callee(&self) -> ast::Expr {
        let mut expr =
            ast::Expr::Ident(ast::Ident::new_no_ctxt(self.root.as_str().into(), DUMMY_SP));
        for segment in &self.members {
            expr = ast::Expr::Member(ast::MemberExpr {
                span: DUMMY_SP,
                obj: Box::new(expr),
                prop: ast::MemberProp::Ident(ast::IdentName::new(segment.as_str().into(), DUMMY_SP)),
            });
        }
        expr
    }
}

impl Default for JsxFactory {
    fn default() -> Self {
        Self {
            root: "React".to_string(),
            members: vec!["createElement".to_string()],
        }
    }
}

impl fmt::Display for JsxFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for member in &self.members {
            write!(f, ".{member}")?;
        }
        Ok(())
    }
}

/// Build `factory(args...)`.
pub(crate) fn make_factory_call(span: Span, factory: &JsxFactory, args: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::Call(ast::CallExpr {
        span,
        callee: ast::Callee::Expr(Box::new(factory.callee())),
        args: args
            .into_iter()
            .map(|expr| ast::ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
        ..Default::default()
    })
}

pub(crate) fn str_lit(span: Span, value: &str) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Str(ast::Str {
        span,
        value: value.into(),
        raw: None,
    }))
}

pub(crate) fn null_lit() -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Null(ast::Null { span: DUMMY_SP }))
}

pub(crate) fn true_lit(span: Span) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Bool(ast::Bool { span, value: true }))
}

/// ECMAScript identifier check (Unicode ID_Start/ID_Continue plus `$` and
/// `_`). Reserved words are not rejected: `class` is still a fine property key.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if ast::Ident::is_valid_start(first) => {}
        _ => return false,
    }
    chars.all(ast::Ident::is_valid_continue)
}
