//! Document-type grammar parser.
//!
//! Declarations are located with whole-document regex scans. Choice lists
//! such as `(a|b|(c))` can nest, which a regex cannot match reliably, so
//! attribute types are cut out with [`matching_close`] instead.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use attrgen_core::{
    line_of, AllowedValues, DtdAttributeDecl, DtdDocument, EntityFragment, Grammar, ParseError,
    Presence,
};

use crate::lexer::{matching_close, strip_sgml_comments};

/// How deep attribute-group entities may nest inside one another.
const MAX_GROUP_DEPTH: usize = 8;

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<!ENTITY\s+%\s+([\w.:-]+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#)
            .expect("valid entity regex")
    })
}

fn element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!ELEMENT\s+([\w.:-]+)").expect("valid element regex"))
}

fn attlist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!ATTLIST\s+([\w.:-]+)").expect("valid attlist regex"))
}

fn entity_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%([\w.:-]+);").expect("valid entity reference regex"))
}

/// Parse a document-type grammar.
pub fn parse_dtd(source: &str) -> Result<DtdDocument, ParseError> {
    let text = strip_sgml_comments(source);
    let mut doc = DtdDocument::new();

    for caps in entity_re().captures_iter(&text) {
        let name = &caps[1];
        let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        let fragment = classify_entity(value, &doc);
        debug!(entity = name, ?fragment, "entity");
        doc.entities.insert(name.to_string(), fragment);
    }

    for caps in element_re().captures_iter(&text) {
        doc.declare_element(&caps[1]);
    }

    for m in attlist_re().captures_iter(&text) {
        let whole = m.get(0).map_or(0..0, |g| g.range());
        let element = m[1].to_string();
        let body_start = whole.end;
        let body_end = declaration_end(&text, body_start).ok_or_else(|| ParseError::Unterminated {
            grammar: Grammar::DocumentType,
            construct: format!("ATTLIST {}", element),
            line: line_of(&text, whole.start),
        })?;

        let body = expand_groups(&text[body_start..body_end], &doc, 0);
        let line = line_of(&text, whole.start);
        let attributes = parse_attribute_defs(&element, &body, &doc, line)?;

        doc.declare_element(&element);
        if let Some(list) = doc.elements.get_mut(&element) {
            list.extend(attributes);
        }
    }

    Ok(doc)
}

/// Classify an entity's replacement text.
///
/// A bare reference to an earlier entity takes that entity's classification.
fn classify_entity(value: &str, doc: &DtdDocument) -> EntityFragment {
    let value = value.trim();

    if value.starts_with('(') && matching_close(value, 0, '(', ')') == Some(value.len() - 1) {
        return EntityFragment::Choice(split_choices(value));
    }

    if !value.is_empty() && !value.contains(char::is_whitespace) {
        if let Some(caps) = entity_ref_re().captures(value) {
            if caps.get(0).map(|m| m.as_str()) == Some(value) {
                if let Some(target) = doc.entities.get(&caps[1]) {
                    return target.clone();
                }
                return EntityFragment::AttributeGroup(value.to_string());
            }
        }
        return EntityFragment::Primitive(value.to_string());
    }

    EntityFragment::AttributeGroup(value.to_string())
}

/// Split `(a | b | c)` into its alternatives.
fn split_choices(group: &str) -> Vec<String> {
    let inner = group
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(group);

    inner
        .split('|')
        .map(|alt| alt.trim().trim_matches(|c| c == '(' || c == ')').trim())
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Byte index of the `>` closing a declaration, skipping quoted text.
fn declaration_end(text: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (i, c) in text[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(from + i),
            _ => {}
        }
    }

    None
}

/// Textually expand attribute-group entities inside an ATTLIST body.
///
/// References to choice or primitive entities are left alone; they are
/// attribute types and get resolved per attribute.
fn expand_groups(body: &str, doc: &DtdDocument, depth: usize) -> String {
    if depth >= MAX_GROUP_DEPTH {
        return body.to_string();
    }

    let mut expanded_any = false;
    let expanded = entity_ref_re().replace_all(body, |caps: &regex::Captures| {
        match doc.entities.get(&caps[1]) {
            Some(EntityFragment::AttributeGroup(text)) => {
                expanded_any = true;
                format!(" {} ", text)
            }
            _ => caps[0].to_string(),
        }
    });

    if expanded_any {
        expand_groups(&expanded, doc, depth + 1)
    } else {
        expanded.into_owned()
    }
}

/// Cursor over an ATTLIST body.
struct AttlistCursor<'a> {
    body: &'a str,
    pos: usize,
}

impl<'a> AttlistCursor<'a> {
    fn new(body: &'a str) -> Self {
        Self { body, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.body[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.body.len()
    }

    /// A run of non-whitespace characters.
    fn word(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// A parenthesised group, brackets included.
    fn group(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let close = matching_close(self.body, self.pos, '(', ')')?;
        let group = &self.body[self.pos..=close];
        self.pos = close + 1;
        Some(group)
    }

    /// A quoted literal, quotes removed.
    fn quoted(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let end = rest[1..].find(quote)? + 1;
        self.pos += end + 1;
        Some(&rest[1..end])
    }

    fn peek_char(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }
}

/// Tokenise attribute definitions: `name type default`.
fn parse_attribute_defs(
    element: &str,
    body: &str,
    doc: &DtdDocument,
    line: usize,
) -> Result<Vec<DtdAttributeDecl>, ParseError> {
    let mut cursor = AttlistCursor::new(body);
    let mut attributes = Vec::new();
    let malformed = |found: &str, expected: &str| ParseError::UnexpectedToken {
        grammar: Grammar::DocumentType,
        found: found.to_string(),
        expected: expected.to_string(),
        line,
    };

    while !cursor.at_end() {
        let Some(name) = cursor.word() else { break };

        // An attribute-group reference that did not expand.
        if name.starts_with('%') {
            debug!(element, reference = name, "unresolved attribute group, skipped");
            continue;
        }

        let raw_type = match cursor.peek_char() {
            Some('(') => cursor.group(),
            _ => cursor.word(),
        }
        .ok_or_else(|| malformed(name, "attribute type"))?;

        // NOTATION (a|b)
        let raw_type = if raw_type == "NOTATION" {
            cursor
                .group()
                .ok_or_else(|| malformed(raw_type, "notation list"))?
        } else {
            raw_type
        };

        let (presence, default) = match cursor.peek_char() {
            Some('#') => {
                let keyword = cursor.word().unwrap_or_default();
                match keyword {
                    "#IMPLIED" => (Presence::Implied, None),
                    "#REQUIRED" => (Presence::Required, None),
                    "#FIXED" => {
                        let value = cursor
                            .quoted()
                            .ok_or_else(|| malformed(keyword, "fixed value"))?;
                        (Presence::Fixed, Some(value.to_string()))
                    }
                    other => return Err(malformed(other, "#IMPLIED, #REQUIRED or #FIXED")),
                }
            }
            Some('"') | Some('\'') => {
                let value = cursor
                    .quoted()
                    .ok_or_else(|| malformed(name, "closing quote"))?;
                (Presence::Default, Some(value.to_string()))
            }
            _ => {
                let found = cursor.word().unwrap_or("end of declaration");
                return Err(malformed(found, "attribute default"));
            }
        };

        match resolve_type(raw_type, doc) {
            Some(allowed) => attributes.push(DtdAttributeDecl {
                element: element.to_string(),
                name: name.to_string(),
                raw_type: raw_type.to_string(),
                allowed,
                presence,
                default,
            }),
            None => {
                debug!(element, attribute = name, raw_type, "undefined type fragment, attribute dropped");
            }
        }
    }

    Ok(attributes)
}

/// Resolve an attribute type with one level of entity substitution.
fn resolve_type(raw: &str, doc: &DtdDocument) -> Option<AllowedValues> {
    if raw.starts_with('(') {
        return Some(AllowedValues::Choice(split_choices(raw)));
    }

    let Some(reference) = raw.strip_prefix('%').and_then(|r| r.strip_suffix(';')) else {
        return Some(AllowedValues::Primitive(raw.to_string()));
    };

    match doc.entities.get(reference)? {
        EntityFragment::Choice(values) => Some(AllowedValues::Choice(values.clone())),
        EntityFragment::Primitive(primitive) => Some(AllowedValues::Primitive(primitive.clone())),
        EntityFragment::AttributeGroup(_) => None,
    }
}
