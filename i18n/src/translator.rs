use std::sync::Arc;

use crate::{catalog::Catalog, locale::Locale};

/// Looks up copy in one locale's catalog. Lookups never fail.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<Catalog>,
}

impl Translator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn locale(&self) -> Locale {
        self.catalog.locale()
    }

    pub fn t(&self, key: &str) -> String {
        self.translate(key, None, &[])
    }

    pub fn t_or(&self, key: &str, fallback: &str) -> String {
        self.translate(key, Some(fallback), &[])
    }

    /// Resolves `key`, then `fallback`, then the key itself, and substitutes `vars`.
    pub fn translate(&self, key: &str, fallback: Option<&str>, vars: &[(&str, &str)]) -> String {
        let template = self.catalog.get(key).or(fallback).unwrap_or(key);
        if vars.is_empty() {
            template.to_string()
        } else {
            interpolate(template, vars)
        }
    }
}

/// Replaces every `{name}` that has a matching entry in `vars`.
///
/// Single pass: substituted values are never re-scanned. Placeholders without a
/// value and unbalanced braces are copied through untouched.
pub fn interpolate(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                let name = &after[..close];
                match vars.iter().find(|(var, _)| *var == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
