//! Mustache-style rendering on top of handlebars.
//!
//! Handlebars already understands `{{var}}`, `{{{raw}}}` and comments.
//! Mustache sections have no direct handlebars spelling, so they are
//! rewritten against the variables before rendering:
//!
//! | mustache          | value            | handlebars                 |
//! |-------------------|------------------|----------------------------|
//! | `{{#name}}`       | array            | `{{#each name}}`           |
//! | `{{#name}}`       | object           | `{{#with name}}`           |
//! | `{{#name}}`       | anything else    | `{{#if name}}`             |
//! | `{{^name}}`       | any              | `{{#unless name}}`         |
//! | `{{&name}}`       | any              | `{{{name}}}`               |
//! | `{{.}}`           | current item     | `{{this}}`                 |
//!
//! Native block helpers (`{{#if x}}`, `{{#each xs}}`) pass through untouched.

use std::sync::OnceLock;

use handlebars::Handlebars;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::instrument;

use hexp_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::Variables,
    error::HexpResult,
};

const BUILTIN_BLOCKS: &[&str] = &["if", "unless", "each", "with", "lookup", "log"];

fn section_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"\{\{\s*([#^/])\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("section regex is valid")
    })
}

fn ampersand_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"\{\{\s*&\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("ampersand regex is valid")
    })
}

fn dot_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"\{\{\s*\.\s*\}\}").expect("dot regex is valid"))
}

/// Renders mustache-family templates. Missing variables render empty.
pub struct MustacheRenderer {
    handlebars: Handlebars<'static>,
}

impl MustacheRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        Self { handlebars }
    }
}

impl Default for MustacheRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MustacheRenderer {
    #[instrument(skip_all, fields(bytes = template.len()))]
    fn render(&self, template: &str, variables: &Variables) -> HexpResult<String> {
        let source = to_handlebars(template, variables);
        self.handlebars
            .render_template(&source, variables)
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// Rewrite mustache sections into handlebars block helpers.
fn to_handlebars(template: &str, variables: &Variables) -> String {
    let template = ampersand_tag().replace_all(template, "{{{$1}}}");
    let template = dot_tag().replace_all(&template, "{{this}}");

    // Open sections: (name, closing tag to emit).
    let mut open: Vec<(String, &'static str)> = Vec::new();

    section_tag()
        .replace_all(&template, |caps: &Captures<'_>| {
            let whole = caps[0].to_string();
            let name = &caps[2];
            match &caps[1] {
                "#" if !BUILTIN_BLOCKS.contains(&name) => {
                    let helper = match lookup(variables, name) {
                        Some(Value::Array(_)) => "each",
                        Some(Value::Object(_)) => "with",
                        _ => "if",
                    };
                    open.push((name.to_string(), helper));
                    format!("{{{{#{helper} {name}}}}}")
                }
                "^" => {
                    open.push((name.to_string(), "unless"));
                    format!("{{{{#unless {name}}}}}")
                }
                "/" if open.last().is_some_and(|(top, _)| top == name) => match open.pop() {
                    Some((_, helper)) => format!("{{{{/{helper}}}}}"),
                    None => whole,
                },
                _ => whole,
            }
        })
        .into_owned()
}

/// Resolve a dotted variable path.
fn lookup<'a>(variables: &'a Variables, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = variables.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}
