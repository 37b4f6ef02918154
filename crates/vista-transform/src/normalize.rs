//! Expression normalizer
//!
//! Rewrites free-form expressions (`"width >= 100"`) into their compact URL
//! form (`"w_gte_100"`). User variable references (`$name`) are copied through
//! untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::alias::{OPERATORS, PARAMETERS};

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ _]+").unwrap());

static USER_VARIABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$_*[^_]+").unwrap());

/// Operators (each followed by a separator) or nice names, longest first so
/// that `>=` wins over `>` and `initial_width` over `width`.
static ALIAS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let mut operators: Vec<&str> = OPERATORS.iter().map(|(symbol, _)| *symbol).collect();
    operators.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut names: Vec<&str> = PARAMETERS.iter().map(|(nice, _)| *nice).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()));

    let pattern = format!(
        r"(?P<op>{})(?P<sep>[ _])|(?P<name>{})",
        operators
            .iter()
            .map(|op| regex::escape(op))
            .collect::<Vec<_>>()
            .join("|"),
        names.join("|"),
    );
    Regex::new(&pattern).unwrap()
});

/// Normalize an expression. Returns `None` for absent or empty input.
pub fn normalize(expression: Option<&str>) -> Option<String> {
    match expression {
        Some(expr) if !expr.is_empty() => Some(normalize_str(expr)),
        _ => None,
    }
}

/// Normalize an expression, mapping empty input to an empty string.
pub fn normalize_str(expression: &str) -> String {
    if expression.is_empty() {
        return String::new();
    }

    let collapsed = SEPARATORS.replace_all(expression, "_");

    let mut result = String::with_capacity(collapsed.len());
    let mut last = 0;
    for var in USER_VARIABLE.find_iter(&collapsed) {
        result.push_str(&replace_aliases(&collapsed[last..var.start()]));
        result.push_str(var.as_str());
        last = var.end();
    }
    result.push_str(&replace_aliases(&collapsed[last..]));

    if result != expression {
        tracing::trace!(input = %expression, output = %result, "Normalized expression");
    }
    result
}

fn replace_aliases(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    ALIAS_PATTERN
        .replace_all(text, |caps: &Captures| {
            if let Some(op) = caps.name("op") {
                let code = OPERATORS
                    .iter()
                    .find(|(symbol, _)| *symbol == op.as_str())
                    .map(|(_, code)| *code)
                    .unwrap_or(op.as_str());
                let sep = caps.name("sep").map(|m| m.as_str()).unwrap_or_default();
                return format!("{}{}", code, sep);
            }

            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
            // Names preceded by `$` belong to a variable reference.
            if text[..start].ends_with('$') {
                return whole.to_string();
            }
            PARAMETERS
                .iter()
                .find(|(nice, _)| *nice == whole)
                .map(|(_, code)| code.to_string())
                .unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}
