//! JSX lowering pass.
//!
//! Rewrites every JSX element and fragment into a call of the configured
//! factory, marked `/*#__PURE__*/` so minifiers can drop unused trees:
//!
//! - `<div a="1" {...rest}>text</div>` → `React.createElement(div, { a: "1", ...rest }, "text")`
//! - `<></>` → `React.createElement(null)`

use swc_common::{comments::Comments, Span, Spanned, DUMMY_SP};
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::error::JsxError;
use crate::factory::{is_identifier, make_factory_call, null_lit, str_lit, true_lit, JsxFactory};
use crate::text::{decode_entities, normalize_jsx_text};

/// Lower all JSX in `module`. The first unsupported construct aborts the pass.
pub fn lower_module<C: Comments>(
    mut module: ast::Module,
    factory: &JsxFactory,
    comments: C,
) -> Result<ast::Module, JsxError> {
    let mut lowering = JsxLowering::new(factory, comments);
    module.visit_mut_with(&mut lowering);
    lowering.finish()?;
    Ok(module)
}

/// Visitor that replaces JSX expressions with factory calls.
pub struct JsxLowering<'a, C: Comments> {
    factory: &'a JsxFactory,
    comments: C,
    lowered: usize,
    error: Option<JsxError>,
}

impl<'a, C: Comments> JsxLowering<'a, C> {
    pub fn new(factory: &'a JsxFactory, comments: C) -> Self {
        Self {
            factory,
            comments,
            lowered: 0,
            error: None,
        }
    }

    /// Number of calls produced so far, or the error that stopped the pass.
    pub fn finish(self) -> Result<usize, JsxError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.lowered),
        }
    }

    fn lower_element(&mut self, element: ast::JSXElement) -> Result<ast::Expr, JsxError> {
        let ast::JSXElement {
            span,
            opening,
            children,
            ..
        } = element;

        let mut args = vec![
            lower_tag(opening.name),
            ast::Expr::Object(ast::ObjectLit {
                span: DUMMY_SP,
                props: self.lower_attrs(opening.attrs)?,
            }),
        ];
        args.extend(self.lower_children(children)?);

        Ok(self.make_call(span, args))
    }

    /// Fragments have no tag and no attributes: only the children.
    fn lower_fragment(&mut self, fragment: ast::JSXFragment) -> Result<ast::Expr, JsxError> {
        let args = self.lower_children(fragment.children)?;
        Ok(self.make_call(fragment.span, args))
    }

    fn make_call(&mut self, span: Span, args: Vec<ast::Expr>) -> ast::Expr {
        if !span.is_dummy() {
            self.comments.add_pure_comment(span.lo);
        }
        self.lowered += 1;
        make_factory_call(span, self.factory, args)
    }

    fn lower_attrs(
        &mut self,
        attrs: Vec<ast::JSXAttrOrSpread>,
    ) -> Result<Vec<ast::PropOrSpread>, JsxError> {
        let mut props = Vec::with_capacity(attrs.len());

        for attr in attrs {
            match attr {
                ast::JSXAttrOrSpread::JSXAttr(attr) => {
                    let (key, name) = attr_key(attr.name);
                    let value = self.lower_attr_value(&name, attr.span, attr.value)?;
                    props.push(ast::PropOrSpread::Prop(Box::new(ast::Prop::KeyValue(
                        ast::KeyValueProp {
                            key,
                            value: Box::new(value),
                        },
                    ))));
                }
                ast::JSXAttrOrSpread::SpreadElement(spread) => {
                    props.push(ast::PropOrSpread::Spread(ast::SpreadElement {
                        dot3_token: spread.dot3_token,
                        expr: self.lower_expr(spread.expr)?,
                    }));
                }
            }
        }

        Ok(props)
    }

    fn lower_attr_value(
        &mut self,
        name: &str,
        span: Span,
        value: Option<ast::JSXAttrValue>,
    ) -> Result<ast::Expr, JsxError> {
        let Some(value) = value else {
            return Ok(true_lit(span));
        };

        match value {
            ast::JSXAttrValue::Str(s) => Ok(match s.value.as_str() {
                Some(text) => str_lit(s.span, &decode_entities(text)),
                None => ast::Expr::Lit(ast::Lit::Str(s)),
            }),
            ast::JSXAttrValue::JSXExprContainer(container) => match container.expr {
                ast::JSXExpr::Expr(expr) => Ok(*self.lower_expr(expr)?),
                ast::JSXExpr::JSXEmptyExpr(_) => Err(JsxError::EmptyAttributeExpression {
                    name: name.to_string(),
                    span: container.span,
                }),
            },
            ast::JSXAttrValue::JSXElement(element) => self.lower_element(*element),
            ast::JSXAttrValue::JSXFragment(fragment) => self.lower_fragment(fragment),
        }
    }

    /// Flatten children into call arguments; an empty list becomes `null`.
    fn lower_children(
        &mut self,
        children: Vec<ast::JSXElementChild>,
    ) -> Result<Vec<ast::Expr>, JsxError> {
        let mut args = Vec::with_capacity(children.len());

        for child in children {
            match child {
                ast::JSXElementChild::JSXText(text) => {
                    if let Some(value) = normalize_jsx_text(&text.raw) {
                        args.push(str_lit(text.span, &value));
                    }
                }
                ast::JSXElementChild::JSXExprContainer(container) => match container.expr {
                    ast::JSXExpr::Expr(expr) => args.push(*self.lower_expr(expr)?),
                    // `{/* comment */}`
                    ast::JSXExpr::JSXEmptyExpr(_) => {}
                },
                ast::JSXElementChild::JSXElement(element) => {
                    args.push(self.lower_element(*element)?);
                }
                ast::JSXElementChild::JSXFragment(fragment) => {
                    args.push(self.lower_fragment(fragment)?);
                }
                ast::JSXElementChild::JSXSpreadChild(spread) => {
                    return Err(JsxError::UnsupportedChild {
                        kind: "spread child",
                        span: spread.span,
                    });
                }
                #[allow(unreachable_patterns)]
                other => {
                    return Err(JsxError::UnsupportedChild {
                        kind: "unknown node",
                        span: other.span(),
                    });
                }
            }
        }

        if args.is_empty() {
            args.push(null_lit());
        }
        Ok(args)
    }

    /// Lower JSX nested anywhere inside an embedded expression.
    fn lower_expr(&mut self, mut expr: Box<ast::Expr>) -> Result<Box<ast::Expr>, JsxError> {
        expr.visit_mut_with(self);
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }
}

impl<C: Comments> VisitMut for JsxLowering<'_, C> {
    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        if self.error.is_some() {
            return;
        }

        let original = std::mem::replace(expr, ast::Expr::Invalid(ast::Invalid { span: DUMMY_SP }));
        let lowered = match original {
            ast::Expr::JSXElement(element) => self.lower_element(*element),
            ast::Expr::JSXFragment(fragment) => self.lower_fragment(fragment),
            other => {
                *expr = other;
                expr.visit_mut_children_with(self);
                return;
            }
        };

        match lowered {
            Ok(call) => *expr = call,
            Err(err) => self.error = Some(err),
        }
    }
}

/// `div` → `div`, `a.b` → `a.b`, `this` → `this`; names that are not
/// identifiers (`my-el`, `svg:rect`) become string literals.
fn lower_tag(name: ast::JSXElementName) -> ast::Expr {
    match name {
        ast::JSXElementName::Ident(ident) => {
            if &*ident.sym == "this" {
                ast::Expr::This(ast::ThisExpr { span: ident.span })
            } else if is_identifier(&ident.sym) {
                ast::Expr::Ident(ident)
            } else {
                str_lit(ident.span, &ident.sym)
            }
        }
        ast::JSXElementName::JSXMemberExpr(member) => lower_member_tag(member),
        ast::JSXElementName::JSXNamespacedName(name) => str_lit(
            name.span(),
            &format!("{}:{}", name.ns.sym, name.name.sym),
        ),
    }
}

fn lower_member_tag(member: ast::JSXMemberExpr) -> ast::Expr {
    let span = member.span();
    let obj = match member.obj {
        ast::JSXObject::Ident(ident) if &*ident.sym == "this" => {
            ast::Expr::This(ast::ThisExpr { span: ident.span })
        }
        ast::JSXObject::Ident(ident) => ast::Expr::Ident(ident),
        ast::JSXObject::JSXMemberExpr(inner) => lower_member_tag(*inner),
    };

    ast::Expr::Member(ast::MemberExpr {
        span,
        obj: Box::new(obj),
        prop: ast::MemberProp::Ident(member.prop),
    })
}

/// Object key for an attribute, plus its name for error messages.
fn attr_key(name: ast::JSXAttrName) -> (ast::PropName, String) {
    match name {
        ast::JSXAttrName::Ident(ident) => {
            let text = ident.sym.to_string();
            let key = if is_identifier(&text) {
                ast::PropName::Ident(ident)
            } else {
                ast::PropName::Str(ast::Str {
                    span: ident.span,
                    value: text.as_str().into(),
                    raw: None,
                })
            };
            (key, text)
        }
        ast::JSXAttrName::JSXNamespacedName(name) => {
            let text = format!("{}:{}", name.ns.sym, name.name.sym);
            let key = ast::PropName::Str(ast::Str {
                span: name.span(),
                value: text.as_str().into(),
                raw: None,
            });
            (key, text)
        }
    }
}
