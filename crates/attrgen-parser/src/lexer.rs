//! Lexical helpers shared by the grammar parsers.

use nom::{
    bytes::complete::{tag, take_while, take_while1},
    combinator::recognize,
    multi::many0,
    sequence::{pair, preceded},
    IResult,
};

/// Parse an identifier (starts with letter/underscore, followed by alphanumeric/underscore).
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse a possibly module-qualified identifier such as `events::EventTarget`.
pub fn qualified_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        preceded(opt_scope, identifier),
        many0(preceded(tag("::"), identifier)),
    ))(input)
}

/// An optional leading `::` on a scoped name.
fn opt_scope(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ':')(input)
}

/// The last segment of a qualified identifier.
pub fn unqualified(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Whether `c` can appear inside an identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Blank out `//` and `/* */` comments, keeping newlines so byte offsets
/// still map to the original lines.
pub fn strip_c_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                out.push(' ');
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                    out.push(' ');
                }
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for c in chars.by_ref() {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Blank out `<!-- ... -->` comments, keeping newlines.
pub fn strip_sgml_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let end = after.find("-->").map(|i| i + 3).unwrap_or(after.len());
        out.extend(after[..end].chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
        rest = &after[end..];
    }
    out.push_str(rest);

    out
}

/// Find the byte index of the bracket closing the one at `open_idx`.
///
/// Nested pairs of the same kind are skipped; quoted text is not
/// treated specially.
pub fn matching_close(input: &str, open_idx: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;

    for (i, c) in input[open_idx..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(open_idx + i);
            }
        }
    }

    None
}

/// Split by `sep`, respecting parentheses. Empty pieces are dropped.
pub fn split_top_level(input: &str, sep: char) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut paren_depth = 0i32;

    for (i, c) in input.char_indices() {
        match c {
            '(' => paren_depth += 1,
            ')' => paren_depth -= 1,
            c if c == sep && paren_depth == 0 => {
                if !input[start..i].trim().is_empty() {
                    parts.push((start, &input[start..i]));
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if start < input.len() && !input[start..].trim().is_empty() {
        parts.push((start, &input[start..]));
    }

    parts
}

/// Find `keyword` as a whole word at or after `from`.
pub fn find_keyword(input: &str, keyword: &str, from: usize) -> Option<usize> {
    let mut pos = from;

    while let Some(rel) = input.get(pos..)?.find(keyword) {
        let idx = pos + rel;
        let before_ok = input[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c));
        let after_ok = input[idx + keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_ident_char(c));
        if before_ok && after_ok {
            return Some(idx);
        }
        pos = idx + keyword.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("SVGElement : x"), Ok((" : x", "SVGElement")));
        assert!(identifier("9abc").is_err());
    }

    #[test]
    fn test_qualified_identifier() {
        assert_eq!(
            qualified_identifier("events::EventTarget {"),
            Ok((" {", "events::EventTarget"))
        );
        assert_eq!(unqualified("events::EventTarget"), "EventTarget");
        assert_eq!(unqualified("Element"), "Element");
    }

    #[test]
    fn test_strip_c_comments_keeps_lines() {
        let src = "a // one\n/* two\nthree */ b";
        let stripped = strip_c_comments(src);
        assert_eq!(stripped.lines().count(), 3);
        assert!(!stripped.contains("one"));
        assert!(!stripped.contains("three"));
        assert!(stripped.trim_end().ends_with('b'));
        assert_eq!(stripped.len(), src.len());
    }

    #[test]
    fn test_strip_sgml_comments() {
        let src = "<!-- x\ny -->\n<!ELEMENT a EMPTY>";
        let stripped = strip_sgml_comments(src);
        assert!(!stripped.contains('x'));
        assert_eq!(stripped.lines().count(), 3);
        assert!(stripped.contains("<!ELEMENT a EMPTY>"));
    }

    #[test]
    fn test_matching_close_nested() {
        let s = "((a|b)|c) rest";
        assert_eq!(matching_close(s, 0, '(', ')'), Some(8));
        assert_eq!(matching_close(s, 1, '(', ')'), Some(5));
        assert_eq!(matching_close("(a|b", 0, '(', ')'), None);
    }

    #[test]
    fn test_split_top_level() {
        let parts: Vec<&str> = split_top_level("a; f(x; y); b;", ';')
            .into_iter()
            .map(|(_, s)| s.trim())
            .collect();
        assert_eq!(parts, ["a", "f(x; y)", "b"]);
    }

    #[test]
    fn test_find_keyword_whole_word() {
        let s = "myinterface x; interface Y";
        assert_eq!(find_keyword(s, "interface", 0), Some(15));
        assert_eq!(find_keyword("interfaces", "interface", 0), None);
    }
}
