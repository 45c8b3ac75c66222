//! Interface grammar parser.
//!
//! The document is comment-stripped, then scanned for `interface` blocks.
//! Anything outside them (modules, typedefs, exceptions) is skipped.
//! Inside a block, members are split on top-level `;` and each one is
//! parsed with nom combinators.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, rest, verify},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use tracing::debug;

use attrgen_core::{
    line_of, ArgDirection, ArgumentDecl, AttributeDecl, EnumConstant, EnumGroupDecl, Grammar,
    InterfaceDecl, InterfaceTable, MethodDecl, ParseError, TypeRef,
};

use crate::lexer::*;

const RAISES_KEYWORDS: [&str; 3] = ["raises", "getraises", "setraises"];

/// Parse an interface grammar document into the global interface table.
pub fn parse_interfaces(source: &str) -> Result<InterfaceTable, ParseError> {
    let text = strip_c_comments(source);
    let mut table = InterfaceTable::new();
    let mut pos = 0;

    while let Some(start) = find_keyword(&text, "interface", pos) {
        let (rest, (name, bases)) =
            interface_header(&text[start..]).map_err(|_| ParseError::UnexpectedToken {
                grammar: Grammar::Interface,
                found: snippet(&text[start..]),
                expected: "interface header".to_string(),
                line: line_of(&text, start),
            })?;
        let header_end = text.len() - rest.len();

        // Forward declaration: `interface Foo;`
        if rest.starts_with(';') {
            pos = header_end + 1;
            continue;
        }

        let open = header_end;
        let close = matching_close(&text, open, '{', '}').ok_or_else(|| ParseError::Unterminated {
            grammar: Grammar::Interface,
            construct: format!("interface {}", name),
            line: line_of(&text, start),
        })?;

        let mut decl = InterfaceDecl::new(name);
        decl.inherits.extend(bases.iter().map(|b| unqualified(b).to_string()));
        parse_members(&text, open + 1, &text[open + 1..close], &mut decl)?;

        debug!(
            interface = %decl.name,
            attributes = decl.attributes.len(),
            enums = decl.enums.len(),
            methods = decl.methods.len(),
            "parsed interface"
        );
        table.insert(decl);
        pos = close + 1;
    }

    Ok(table)
}

/// Parse `interface Name [: Base, Base]` up to the `{` or `;`.
fn interface_header(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (input, _) = tag("interface")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, bases) = opt(preceded(
        pair(char(':'), multispace0),
        separated_list1(
            tuple((multispace0, char(','), multispace0)),
            qualified_identifier,
        ),
    ))(input)?;
    let (input, _) = multispace0(input)?;

    if !(input.starts_with('{') || input.starts_with(';')) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    Ok((input, (name, bases.unwrap_or_default())))
}

/// Parse the members of one interface body.
///
/// `body_offset` is the byte offset of `body` inside `text`, for line numbers.
fn parse_members(
    text: &str,
    body_offset: usize,
    body: &str,
    decl: &mut InterfaceDecl,
) -> Result<(), ParseError> {
    let mut constants = Vec::new();

    for (offset, raw) in split_top_level(body, ';') {
        let stmt = raw.trim();
        let line = line_of(text, body_offset + offset + (raw.len() - raw.trim_start().len()));
        let first = stmt.split_whitespace().next().unwrap_or("");

        match first {
            "attribute" | "readonly" => {
                let attr = parse_with(attribute_member, stmt, "attribute declaration", line)?;
                decl.attributes.push(attr);
            }
            "const" => {
                if let Some(constant) = parse_constant(stmt, line)? {
                    constants.push(constant);
                } else {
                    debug!(interface = %decl.name, line, "skipping non-enum constant: {}", snippet(stmt));
                }
            }
            "typedef" | "exception" | "interface" => {
                debug!(interface = %decl.name, line, "skipping member: {}", snippet(stmt));
            }
            _ if stmt.contains('(') => {
                let method = parse_with(method_member, stmt, "method signature", line)?;
                decl.methods.push(method);
            }
            _ => {
                debug!(interface = %decl.name, line, "skipping member: {}", snippet(stmt));
            }
        }
    }

    decl.enums = group_constants(constants);
    Ok(())
}

/// Run a member parser over a whole statement.
fn parse_with<'a, T>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    stmt: &'a str,
    expected: &str,
    line: usize,
) -> Result<T, ParseError> {
    all_consuming(terminated(parser, multispace0))(stmt)
        .map(|(_, value)| value)
        .map_err(|_| ParseError::UnexpectedToken {
            grammar: Grammar::Interface,
            found: snippet(stmt),
            expected: expected.to_string(),
            line,
        })
}

fn is_raises_keyword(word: &str) -> bool {
    RAISES_KEYWORDS.contains(&word)
}

/// One type/name word, excluding the raises keywords.
fn type_word(input: &str) -> IResult<&str, &str> {
    verify(qualified_identifier, |w: &str| !is_raises_keyword(w))(input)
}

/// A run of words whose last one is a name and the rest a type.
fn typed_name(input: &str) -> IResult<&str, (String, &str)> {
    let (input, words) = many1(preceded(multispace0, type_word))(input)?;
    match words.split_last() {
        Some((name, ty)) if !ty.is_empty() => Ok((input, (ty.join(" "), *name))),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Many1,
        ))),
    }
}

/// `raises(A, B)`, `getraises(...)` or `setraises(...)`.
fn raises_clause(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(
        pair(
            alt((tag("getraises"), tag("setraises"), tag("raises"))),
            multispace0,
        ),
        delimited(
            pair(char('('), multispace0),
            separated_list0(tuple((multispace0, char(','), multispace0)), qualified_identifier),
            pair(multispace0, char(')')),
        ),
    )(input)
}

fn raises_list(input: &str) -> IResult<&str, Vec<String>> {
    map(many0(preceded(multispace0, raises_clause)), |clauses| {
        clauses
            .into_iter()
            .flatten()
            .map(|name| unqualified(name).to_string())
            .collect()
    })(input)
}

/// `[readonly] attribute Type name [raises(...)]`
fn attribute_member(input: &str) -> IResult<&str, AttributeDecl> {
    let (input, readonly) = opt(terminated(tag("readonly"), multispace1))(input)?;
    let (input, _) = tag("attribute")(input)?;
    let (input, (ty, name)) = typed_name(input)?;
    let (input, raises) = raises_list(input)?;

    Ok((
        input,
        AttributeDecl {
            name: name.to_string(),
            type_ref: TypeRef::parse(&ty),
            readonly: readonly.is_some(),
            raises,
        },
    ))
}

/// `in|out|inout Type name`
fn argument(input: &str) -> IResult<&str, ArgumentDecl> {
    let (input, direction) = preceded(
        multispace0,
        alt((tag("inout"), tag("in"), tag("out"))),
    )(input)?;
    let (input, _) = multispace1(input)?;
    let (input, (type_name, name)) = typed_name(input)?;

    Ok((
        input,
        ArgumentDecl {
            direction: ArgDirection::from_keyword(direction).unwrap_or(ArgDirection::In),
            type_name,
            name: name.to_string(),
        },
    ))
}

/// `ReturnType name(args) [raises(...)]`
fn method_member(input: &str) -> IResult<&str, MethodDecl> {
    let (input, (return_type, name)) = typed_name(input)?;
    let (input, arguments) = delimited(
        pair(multispace0, char('(')),
        separated_list0(preceded(multispace0, char(',')), argument),
        pair(multispace0, char(')')),
    )(input)?;
    let (input, raises) = raises_list(input)?;

    Ok((
        input,
        MethodDecl {
            name: name.to_string(),
            return_type,
            arguments,
            raises,
        },
    ))
}

/// Only this constant type feeds enumeration grouping.
const ENUM_CONSTANT_TYPE: &str = "unsigned short";

/// `const Type NAME = VALUE`. Constants of any other type are `None`.
fn parse_constant(stmt: &str, line: usize) -> Result<Option<EnumConstant>, ParseError> {
    let (ty, name, value) = parse_with(constant_member, stmt, "constant declaration", line)?;
    if ty != ENUM_CONSTANT_TYPE {
        return Ok(None);
    }

    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };

    parsed
        .map(|value| {
            Some(EnumConstant {
                name: name.to_string(),
                value,
            })
        })
        .map_err(|_| ParseError::InvalidConstant {
            grammar: Grammar::Interface,
            name: name.to_string(),
            value: value.to_string(),
            line,
        })
}

fn constant_member(input: &str) -> IResult<&str, (String, &str, &str)> {
    let (input, _) = tag("const")(input)?;
    let (input, (ty, name)) = typed_name(input)?;
    let (input, _) = tuple((multispace0, char('='), multispace0))(input)?;
    let (input, value) = rest(input)?;
    Ok((input, (ty, name, value)))
}

/// Group an ordered constant stream into enumerations.
///
/// A constant with value `0` opens a new group, except the very first
/// constant, which seeds the first group whatever its value. Every other
/// constant joins the currently open group.
pub fn group_constants(constants: Vec<EnumConstant>) -> Vec<EnumGroupDecl> {
    let mut groups: Vec<EnumGroupDecl> = Vec::new();

    for constant in constants {
        match groups.last_mut() {
            Some(open) if constant.value != 0 => open.constants.push(constant),
            _ => groups.push(EnumGroupDecl::seeded_by(constant)),
        }
    }

    groups
}

/// Short excerpt of a statement for error messages.
fn snippet(s: &str) -> String {
    let line = s.lines().next().unwrap_or("").trim();
    if line.len() > 60 {
        let mut end = 60;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &line[..end])
    } else {
        line.to_string()
    }
}
