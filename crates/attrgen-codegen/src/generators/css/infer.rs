//! Storage-category inference from CSS value grammars.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};

use attrgen_core::{CssPropertyDecl, CssPropertyRow, CssValueKind};

/// Defaults the published property table states in prose.
const BUILTIN_DEFAULT_PATCHES: &[(&str, &str)] = &[
    ("color", "black"),
    ("font-family", "serif"),
    ("font", "normal"),
    ("marker", "none"),
    ("text-align", "start"),
    ("direction", "ltr"),
];

/// Value types stored as a number with a unit.
const NUMERIC_TYPES: &[&str] = &[
    "number",
    "length",
    "percentage",
    "integer",
    "angle",
    "alphavalue",
    "opacity-value",
    "miterlimit",
];

/// A numeric property may still accept this many named keywords.
const MAX_NUMERIC_KEYWORDS: usize = 2;

fn parens_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^()]*\)").expect("valid regex"))
}

fn brackets_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\[\]]*\]").expect("valid regex"))
}

fn type_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<([A-Za-z0-9_-]+)>$").expect("valid regex"))
}

fn keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[A-Za-z][A-Za-z0-9_-]*$").expect("valid regex"))
}

/// Keyword alternatives and referenced value types of one grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarTerms {
    pub keywords: Vec<String>,
    pub types: BTreeSet<String>,
}

/// Split a value grammar into keywords and `<type>` references.
///
/// Parenthesised examples and bracketed optional groups are dropped. A
/// bracket group that opens the grammar is unwrapped instead, since it
/// holds the main alternatives.
pub fn extract_terms(grammar: &str) -> GrammarTerms {
    let mut text = grammar.trim().to_string();
    while parens_re().is_match(&text) {
        text = parens_re().replace_all(&text, " ").into_owned();
    }

    let text = match text.strip_prefix('[') {
        Some(rest) => match rest.find(']') {
            Some(close) => format!(
                "{} {}",
                &rest[..close],
                brackets_re().replace_all(&rest[close + 1..], " ")
            ),
            None => rest.to_string(),
        },
        None => brackets_re().replace_all(&text, " ").into_owned(),
    };

    let filtered: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '|' | '-' | '_' | '<' | '>') {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut terms = GrammarTerms::default();
    for alternative in filtered.split('|') {
        for token in alternative.split_whitespace() {
            if let Some(caps) = type_ref_re().captures(token) {
                terms.types.insert(caps[1].to_ascii_lowercase());
            } else if keyword_re().is_match(token) {
                if !terms.keywords.iter().any(|k| k == token) {
                    terms.keywords.push(token.to_string());
                }
            } else {
                debug!(token, "ignoring grammar token");
            }
        }
    }
    terms
}

/// The fixed-priority decision table.
pub fn classify_terms(terms: &GrammarTerms) -> Option<CssValueKind> {
    let has = |name: &str| terms.types.contains(name);
    let current_color = terms
        .keywords
        .iter()
        .any(|k| k.eq_ignore_ascii_case("currentColor"));

    if has("paint") || (has("color") && current_color) {
        return Some(CssValueKind::Paint);
    }
    if has("color") {
        return Some(CssValueKind::Color);
    }
    if has("dasharray") {
        return Some(CssValueKind::DashArray);
    }
    if NUMERIC_TYPES.iter().any(|t| has(t)) && terms.keywords.len() <= MAX_NUMERIC_KEYWORDS {
        return Some(CssValueKind::Numeric);
    }
    if has("family-name") {
        return Some(CssValueKind::FamilyName);
    }
    if !terms.types.is_empty() {
        return Some(CssValueKind::Generic);
    }
    if !terms.keywords.is_empty() {
        return Some(CssValueKind::Identifier);
    }
    None
}

/// Infer one declaration per row, in table order.
///
/// `patches` wins over the built-in default patches.
pub fn infer_properties(
    rows: &[CssPropertyRow],
    patches: &IndexMap<String, String>,
) -> Vec<CssPropertyDecl> {
    let mut seen = BTreeSet::new();
    let mut decls = Vec::with_capacity(rows.len());

    for row in rows {
        if !seen.insert(row.name.clone()) {
            warn!(property = %row.name, line = row.line, "duplicate property row ignored");
            continue;
        }
        decls.push(infer_property(row, patches));
    }
    decls
}

fn infer_property(row: &CssPropertyRow, patches: &IndexMap<String, String>) -> CssPropertyDecl {
    let terms = extract_terms(&row.values);
    let kind = classify_terms(&terms).unwrap_or_else(|| {
        warn!(
            property = %row.name,
            line = row.line,
            "no value types or keywords, using the generic category"
        );
        CssValueKind::Generic
    });

    let default = patches
        .get(&row.name)
        .map(String::as_str)
        .or_else(|| {
            BUILTIN_DEFAULT_PATCHES
                .iter()
                .find(|(name, _)| *name == row.name)
                .map(|(_, value)| *value)
        })
        .map(str::to_string)
        .unwrap_or_else(|| row.initial.clone());

    debug!(property = %row.name, %default, ?kind, "inferred css property");

    CssPropertyDecl {
        name: row.name.clone(),
        kind,
        default,
        keywords: terms.keywords,
        referenced_types: terms.types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, values: &str, initial: &str) -> CssPropertyRow {
        CssPropertyRow {
            name: name.to_string(),
            values: values.to_string(),
            initial: initial.to_string(),
            line: 1,
        }
    }

    fn kind_of(values: &str) -> CssValueKind {
        infer_properties(&[row("p", values, "")], &IndexMap::new())[0].kind
    }

    #[test]
    fn test_extract_terms() {
        let terms = extract_terms("butt | round | square | inherit");
        assert_eq!(terms.keywords, ["butt", "round", "square", "inherit"]);
        assert!(terms.types.is_empty());

        let terms = extract_terms("<paint> (See Specifying paint) | inherit");
        assert_eq!(terms.keywords, ["inherit"]);
        assert!(terms.types.contains("paint"));
    }

    #[test]
    fn test_bracket_groups() {
        let terms = extract_terms("[ <family-name> | <generic-family> ] [, <family-name>]* | inherit");
        assert!(terms.types.contains("family-name"));
        assert!(terms.types.contains("generic-family"));
        assert_eq!(terms.keywords, ["inherit"]);

        let terms = extract_terms("normal | <length> [ optional ]");
        assert_eq!(terms.keywords, ["normal"]);
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(kind_of("<paint> | inherit"), CssValueKind::Paint);
        assert_eq!(kind_of("currentColor | <color> | inherit"), CssValueKind::Paint);
        assert_eq!(kind_of("<color> | inherit"), CssValueKind::Color);
        assert_eq!(kind_of("none | <dasharray> | inherit"), CssValueKind::DashArray);
        assert_eq!(kind_of("<opacity-value> | inherit"), CssValueKind::Numeric);
        assert_eq!(kind_of("auto | <length> | inherit"), CssValueKind::Numeric);
        assert_eq!(
            kind_of("normal | small | large | <length> | inherit"),
            CssValueKind::Generic
        );
        assert_eq!(kind_of("[<family-name>] | inherit"), CssValueKind::FamilyName);
        assert_eq!(kind_of("<uri> | none | inherit"), CssValueKind::Generic);
        assert_eq!(kind_of("nonzero | evenodd | inherit"), CssValueKind::Identifier);
        assert_eq!(kind_of(""), CssValueKind::Generic);
    }

    #[test]
    fn test_default_patches() {
        let rows = [
            row("color", "<color> | inherit", "depends on user agent"),
            row("fill", "<paint> | inherit", "black"),
            row("font-family", "[<family-name>] | inherit", "depends on user agent"),
        ];
        let mut patches = IndexMap::new();
        patches.insert("font-family".to_string(), "sans-serif".to_string());

        let decls = infer_properties(&rows, &patches);
        assert_eq!(decls[0].default, "black");
        assert_eq!(decls[1].default, "black");
        assert_eq!(decls[2].default, "sans-serif");
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let rows = [
            row("fill", "<paint> | inherit", "black"),
            row("fill", "<color>", "white"),
        ];
        let decls = infer_properties(&rows, &IndexMap::new());
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].kind, CssValueKind::Paint);
    }
}
