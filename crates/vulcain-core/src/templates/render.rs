//! Template rendering for the replace pass
//!
//! Templates use EJS-style tags:
//!
//! - `<%= expr %>` writes the HTML-escaped value of `expr`
//! - `<%- expr %>` writes the value unescaped
//! - `<%# ... %>` is a comment
//! - `<%%` writes a literal `<%`
//! - closing a tag with `-%>` also swallows the newline that follows it
//!
//! `expr` is a dotted path into the render context (`project.name`,
//! `data.port`, `fileName`). Code blocks (`<% ... %>`) are rejected.

use serde_json::Value;

use crate::error::{RenderError, RenderErrorKind};

const OPEN: &str = "<%";
const CLOSE: &str = "%>";

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Escaped,
    Raw,
    Comment,
    Scriptlet,
}

/// Render `template` against `context`
pub fn render(template: &str, context: &Value) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(offset) = template[pos..].find(OPEN) {
        let tag_start = pos + offset;
        out.push_str(&template[pos..tag_start]);

        let after_open = tag_start + OPEN.len();
        let line = line_of(template, tag_start);

        if template[after_open..].starts_with('%') {
            out.push_str(OPEN);
            pos = after_open + 1;
            continue;
        }

        let (kind, body_start) = match template[after_open..].chars().next() {
            Some('=') => (TagKind::Escaped, after_open + 1),
            Some('-') => (TagKind::Raw, after_open + 1),
            Some('#') => (TagKind::Comment, after_open + 1),
            _ => (TagKind::Scriptlet, after_open),
        };

        let close = template[body_start..]
            .find(CLOSE)
            .map(|i| body_start + i)
            .ok_or(RenderError {
                line,
                kind: RenderErrorKind::UnclosedTag,
            })?;

        let mut body = &template[body_start..close];
        let slurp_newline = body.ends_with('-');
        if slurp_newline {
            body = &body[..body.len() - 1];
        }

        match kind {
            TagKind::Comment => {}
            TagKind::Scriptlet => {
                return Err(RenderError {
                    line,
                    kind: RenderErrorKind::Scriptlet(body.trim().to_string()),
                })
            }
            TagKind::Escaped | TagKind::Raw => {
                let value =
                    evaluate(body.trim(), context).map_err(|kind| RenderError { line, kind })?;
                let text = display(value);
                if kind == TagKind::Escaped {
                    escape_into(&mut out, &text);
                } else {
                    out.push_str(&text);
                }
            }
        }

        pos = close + CLOSE.len();
        if slurp_newline {
            if template[pos..].starts_with("\r\n") {
                pos += 2;
            } else if template[pos..].starts_with('\n') {
                pos += 1;
            }
        }
    }

    out.push_str(&template[pos..]);
    Ok(out)
}

fn line_of(template: &str, index: usize) -> usize {
    template[..index].matches('\n').count() + 1
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn evaluate<'a>(expr: &str, context: &'a Value) -> Result<&'a Value, RenderErrorKind> {
    if expr.is_empty() || !expr.split('.').all(is_identifier) {
        return Err(RenderErrorKind::InvalidExpression(expr.to_string()));
    }

    let undefined = || RenderErrorKind::Undefined(expr.to_string());
    let mut segments = expr.split('.').peekable();
    let mut value = segments
        .next()
        .and_then(|root| context.get(root))
        .ok_or_else(undefined)?;

    while let Some(segment) = segments.next() {
        value = match value.get(segment) {
            Some(next) => next,
            // A missing property of an existing object renders as nothing
            None if segments.peek().is_none() && value.is_object() => &NULL,
            None => return Err(undefined()),
        };
    }

    Ok(value)
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
