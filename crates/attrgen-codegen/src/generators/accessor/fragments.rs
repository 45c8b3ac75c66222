//! C++ code templates per accessor kind and category.
//!
//! Every function here matches [`Category`] exhaustively, so a new
//! category cannot be added without deciding how each kind marshals it.

use attrgen_core::Category;

use super::pass::AccessorKind;
use super::plan::{AccessorEntry, InterfacePlan};
use crate::generators::cpp_string;
use crate::generators::enums::ENUMERATIONS_FILE;

const INDENT: &str = "    ";

/// The whole implementation file for one kind, banner excluded.
pub fn file(kind: AccessorKind, includes: &[&str], functions: &[String]) -> String {
    let mut lines = Vec::new();

    if matches!(kind, AccessorKind::Get | AccessorKind::Set) {
        lines.push(format!("#include \"{}\"", ENUMERATIONS_FILE));
    }
    for include in includes {
        lines.push(format!("#include \"{}.h\"", include));
    }
    lines.push(String::new());
    match kind {
        AccessorKind::Get => lines.push("#include <cstdio>".to_string()),
        AccessorKind::Set => lines.push("#include <cstdlib>".to_string()),
        AccessorKind::Has | AccessorKind::GetAll => {}
    }
    lines.push("#include <string>".to_string());
    lines.push(String::new());

    if kind == AccessorKind::Get {
        lines.push("namespace {".to_string());
        lines.push(String::new());
        lines.push("std::string FormatFloat(float value)".to_string());
        lines.push("{".to_string());
        lines.push("    char buffer[32];".to_string());
        lines.push("    snprintf(buffer, sizeof(buffer), \"%g\", value);".to_string());
        lines.push("    return buffer;".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push("} // namespace".to_string());
        lines.push(String::new());
    }

    for function in functions {
        lines.push(function.clone());
    }

    lines.join("\n")
}

/// One interface's function for `kind`.
pub fn function(kind: AccessorKind, iface: &InterfacePlan, delegates: &[&str]) -> String {
    let class = &iface.name;
    let mut lines = Vec::new();

    lines.push(match kind {
        AccessorKind::Get => {
            format!("std::string {}::GetAttribute(const std::string& name) const", class)
        }
        AccessorKind::Set => format!(
            "bool {}::SetAttribute(const std::string& name, const std::string& value)",
            class
        ),
        AccessorKind::Has => format!("bool {}::HasAttribute(const std::string& name) const", class),
        AccessorKind::GetAll => {
            format!("void {}::GetAllAttributes(AttributeMap& attributes) const", class)
        }
    });
    lines.push("{".to_string());

    for entry in &iface.entries {
        let body = match kind {
            AccessorKind::Get => get_entry(entry),
            AccessorKind::Set => set_entry(entry),
            AccessorKind::Has => has_entry(entry),
            AccessorKind::GetAll => get_all_entry(class, entry),
        };
        lines.extend(body.into_iter().map(|line| format!("{}{}", INDENT, line)));
    }

    for base in delegates {
        let call = match kind {
            AccessorKind::Get => vec![
                format!("if ({}::HasAttribute(name))", base),
                format!("{}return {}::GetAttribute(name);", INDENT, base),
            ],
            AccessorKind::Set => vec![
                format!("if ({}::HasAttribute(name))", base),
                format!("{}return {}::SetAttribute(name, value);", INDENT, base),
            ],
            AccessorKind::Has => vec![
                format!("if ({}::HasAttribute(name))", base),
                format!("{}return true;", INDENT),
            ],
            AccessorKind::GetAll => vec![format!("{}::GetAllAttributes(attributes);", base)],
        };
        lines.extend(call.into_iter().map(|line| format!("{}{}", INDENT, line)));
    }

    let terminal = match (kind, iface.custom) {
        (AccessorKind::Get, true) => Some("return GetCustomAttribute(name);"),
        (AccessorKind::Get, false) => Some("return std::string();"),
        (AccessorKind::Set, true) => Some("return SetCustomAttribute(name, value);"),
        (AccessorKind::Set, false) => Some("return false;"),
        (AccessorKind::Has, true) => Some("return HasCustomAttribute(name);"),
        (AccessorKind::Has, false) => Some("return false;"),
        (AccessorKind::GetAll, true) => Some("GetCustomAttributes(attributes);"),
        (AccessorKind::GetAll, false) => None,
    };
    if let Some(terminal) = terminal {
        lines.push(format!("{}{}", INDENT, terminal));
    }

    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Expression reading the current (base) value.
fn read(entry: &AccessorEntry) -> String {
    if entry.animated() {
        format!("{}.GetBase()", entry.field())
    } else {
        entry.field()
    }
}

/// Statement storing `value`.
fn write(entry: &AccessorEntry, value: &str) -> String {
    if entry.animated() {
        format!("{}.SetBase({});", entry.field(), value)
    } else {
        format!("{} = {};", entry.field(), value)
    }
}

fn name_test(entry: &AccessorEntry) -> String {
    format!("if (name == {})", cpp_string(&entry.name))
}

fn get_entry(entry: &AccessorEntry) -> Vec<String> {
    let value = read(entry);
    let simple = |expr: String| vec![name_test(entry), format!("{}return {};", INDENT, expr)];

    match entry.category {
        Category::Enum => match &entry.binding {
            Some(binding) => {
                let mut lines = vec![
                    format!("{} {{", name_test(entry)),
                    format!("{}switch ({}) {{", INDENT, value),
                ];
                for case in &binding.cases {
                    lines.push(format!("{}case {}:", INDENT, case.constant));
                    lines.push(format!("{0}{0}return {1};", INDENT, cpp_string(&case.keyword)));
                }
                lines.push(format!("{}default:", INDENT));
                lines.push(format!("{0}{0}return std::string();", INDENT));
                lines.push(format!("{}}}", INDENT));
                lines.push("}".to_string());
                lines
            }
            None => simple(format!("std::to_string({})", value)),
        },
        Category::Integer => simple(format!("std::to_string({})", value)),
        Category::Boolean => simple(format!("{} ? \"true\" : \"false\"", value)),
        Category::Float => simple(format!("FormatFloat({})", value)),
        Category::String => simple(value),
        Category::Length | Category::ListOrRect | Category::OpaqueSerializable => {
            simple(format!("{}.GetValueAsString()", value))
        }
        Category::StyleDeclaration => vec![
            format!("if ({}.HasAttribute(name))", entry.field()),
            format!("{}return {}.GetAttribute(name);", INDENT, entry.field()),
        ],
    }
}

fn set_entry(entry: &AccessorEntry) -> Vec<String> {
    let open = format!("{} {{", name_test(entry));
    let mut lines = vec![open];
    let inner = |line: String| format!("{}{}", INDENT, line);

    match entry.category {
        Category::Enum => match &entry.binding {
            Some(binding) => {
                for case in &binding.cases {
                    lines.push(inner(format!("if (value == {}) {{", cpp_string(&case.keyword))));
                    lines.push(inner(format!("{}{}", INDENT, write(entry, &case.constant))));
                    lines.push(inner(format!("{}return true;", INDENT)));
                    lines.push(inner("}".to_string()));
                }
                lines.push(inner("return false;".to_string()));
            }
            None => {
                lines.extend(parse_number("long", "strtol(value.c_str(), &end, 10)"));
                lines.push(inner("if (parsed < 0 || parsed > 65535)".to_string()));
                lines.push(inner(format!("{}return false;", INDENT)));
                lines.push(inner(write(entry, "static_cast<unsigned short>(parsed)")));
                lines.push(inner("return true;".to_string()));
            }
        },
        Category::Integer => {
            lines.extend(parse_number("long", "strtol(value.c_str(), &end, 10)"));
            lines.push(inner(write(entry, "parsed")));
            lines.push(inner("return true;".to_string()));
        }
        Category::Float => {
            lines.extend(parse_number("float", "strtof(value.c_str(), &end)"));
            lines.push(inner(write(entry, "parsed")));
            lines.push(inner("return true;".to_string()));
        }
        Category::Boolean => {
            lines.push(inner("if (value == \"true\")".to_string()));
            lines.push(inner(format!("{}{}", INDENT, write(entry, "true"))));
            lines.push(inner("else if (value == \"false\")".to_string()));
            lines.push(inner(format!("{}{}", INDENT, write(entry, "false"))));
            lines.push(inner("else".to_string()));
            lines.push(inner(format!("{}return false;", INDENT)));
            lines.push(inner("return true;".to_string()));
        }
        Category::String => {
            lines.push(inner(write(entry, "value")));
            lines.push(inner("return true;".to_string()));
        }
        Category::Length | Category::ListOrRect | Category::OpaqueSerializable => {
            if entry.animated() {
                let storage = entry.category.storage_type(&entry.type_ref);
                lines.push(inner(format!("{} parsed;", storage)));
                lines.push(inner("if (!parsed.SetValueAsString(value))".to_string()));
                lines.push(inner(format!("{}return false;", INDENT)));
                lines.push(inner(write(entry, "parsed")));
                lines.push(inner("return true;".to_string()));
            } else {
                lines.push(inner(format!(
                    "return {}.SetValueAsString(value);",
                    entry.field()
                )));
            }
        }
        Category::StyleDeclaration => {
            return vec![
                format!("if ({}.SetAttribute(name, value))", entry.field()),
                format!("{}return true;", INDENT),
            ];
        }
    }

    lines.push("}".to_string());
    lines
}

/// `parsed` from `value`, rejecting empty input and trailing garbage.
fn parse_number(ty: &str, call: &str) -> Vec<String> {
    vec![
        format!("{}char* end = nullptr;", INDENT),
        format!("{}{} parsed = {};", INDENT, ty, call),
        format!("{}if (end == value.c_str() || *end != '\\0')", INDENT),
        format!("{0}{0}return false;", INDENT),
    ]
}

fn has_entry(entry: &AccessorEntry) -> Vec<String> {
    match entry.category {
        Category::StyleDeclaration => vec![
            format!("if ({}.HasAttribute(name))", entry.field()),
            format!("{}return true;", INDENT),
        ],
        Category::Enum
        | Category::Integer
        | Category::Boolean
        | Category::Float
        | Category::String
        | Category::Length
        | Category::ListOrRect
        | Category::OpaqueSerializable => {
            vec![name_test(entry), format!("{}return true;", INDENT)]
        }
    }
}

fn get_all_entry(class: &str, entry: &AccessorEntry) -> Vec<String> {
    match entry.category {
        Category::StyleDeclaration => {
            vec![format!("{}.GetAllAttributes(attributes);", entry.field())]
        }
        Category::Enum
        | Category::Integer
        | Category::Boolean
        | Category::Float
        | Category::String
        | Category::Length
        | Category::ListOrRect
        | Category::OpaqueSerializable => {
            let name = cpp_string(&entry.name);
            vec![format!(
                "attributes.insert(AttributeMap::value_type({}, {}::GetAttribute({})));",
                name, class, name
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::accessor::plan::AccessorPlan;
    use crate::config::Overrides;
    use crate::model::CodegenModel;
    use crate::test_support::model_with_overrides;

    const IDL: &str = r#"
interface SVGGradientElement {
  const unsigned short SVG_SPREADMETHOD_UNKNOWN = 0;
  const unsigned short SVG_SPREADMETHOD_PAD = 1;
  const unsigned short SVG_SPREADMETHOD_REFLECT = 2;
  readonly attribute SVGAnimatedEnumeration spreadMethod;
};
interface SVGLinearGradientElement : SVGGradientElement {
  readonly attribute SVGAnimatedLength x1;
  readonly attribute SVGAnimatedNumber k1;
  readonly attribute SVGAnimatedBoolean externalResourcesRequired;
  attribute DOMString xmlspace;
};
"#;

    const DTD: &str = r#"
<!ELEMENT linearGradient EMPTY>
<!ATTLIST linearGradient
  spreadMethod (pad|reflect|repeat) 'pad'
  x1 CDATA #IMPLIED
  k1 CDATA #IMPLIED
  externalResourcesRequired (false|true) 'false'
  xml:space (default|preserve) #FIXED 'preserve' >
"#;

    fn model() -> CodegenModel {
        let mut overrides = Overrides::default();
        overrides
            .enum_overrides
            .insert("spreadMethod".into(), "SVG_SPREADMETHOD".into());
        model_with_overrides(IDL, DTD, "", overrides)
    }

    fn render(kind: AccessorKind, interface: &str) -> String {
        let model = model();
        let plan = AccessorPlan::build(&model).unwrap();
        let iface = plan.get(plan.id_of(interface).unwrap()).unwrap();
        let delegates: Vec<&str> = iface
            .bases
            .iter()
            .map(|&b| plan.get(b).unwrap().name.as_str())
            .collect();
        function(kind, iface, &delegates)
    }

    #[test]
    fn test_get_enum_switch_skips_zero() {
        let code = render(AccessorKind::Get, "SVGGradientElement");
        assert!(code.contains("switch (m_spreadMethod.GetBase()) {"));
        assert!(code.contains("case SVG_SPREADMETHOD_PAD:\n            return \"pad\";"));
        assert!(code.contains("case SVG_SPREADMETHOD_REFLECT:"));
        assert!(!code.contains("SVG_SPREADMETHOD_UNKNOWN"));
        assert!(code.trim_end().ends_with("return std::string();\n}"));
    }

    #[test]
    fn test_get_per_category() {
        let code = render(AccessorKind::Get, "SVGLinearGradientElement");
        assert!(code.starts_with(
            "std::string SVGLinearGradientElement::GetAttribute(const std::string& name) const\n{"
        ));
        assert!(code.contains("return m_x1.GetBase().GetValueAsString();"));
        assert!(code.contains("return FormatFloat(m_k1.GetBase());"));
        assert!(code.contains("return m_externalResourcesRequired.GetBase() ? \"true\" : \"false\";"));
        assert!(code.contains("if (name == \"xml:space\")\n        return m_xmlspace;"));
        assert!(code.contains(
            "if (SVGGradientElement::HasAttribute(name))\n        return SVGGradientElement::GetAttribute(name);"
        ));
    }

    #[test]
    fn test_set_per_category() {
        let code = render(AccessorKind::Set, "SVGLinearGradientElement");
        assert!(code.contains("SVGLength parsed;"));
        assert!(code.contains("m_x1.SetBase(parsed);"));
        assert!(code.contains("float parsed = strtof(value.c_str(), &end);"));
        assert!(code.contains("m_xmlspace = value;"));
        assert!(code.contains("return SVGGradientElement::SetAttribute(name, value);"));
        assert!(code.trim_end().ends_with("return false;\n}"));

        let gradient = render(AccessorKind::Set, "SVGGradientElement");
        assert!(gradient.contains("if (value == \"reflect\") {"));
        assert!(gradient.contains("m_spreadMethod.SetBase(SVG_SPREADMETHOD_REFLECT);"));
    }

    #[test]
    fn test_has_and_get_all() {
        let has = render(AccessorKind::Has, "SVGLinearGradientElement");
        assert!(has.contains("if (name == \"k1\")\n        return true;"));
        assert!(has.contains("if (SVGGradientElement::HasAttribute(name))\n        return true;"));

        let all = render(AccessorKind::GetAll, "SVGLinearGradientElement");
        assert!(all.contains(
            "attributes.insert(AttributeMap::value_type(\"x1\", SVGLinearGradientElement::GetAttribute(\"x1\")));"
        ));
        assert!(all.contains("SVGGradientElement::GetAllAttributes(attributes);"));
    }

    #[test]
    fn test_custom_chain_before_terminal() {
        let model = {
            let mut model = model();
            model.overrides.custom_accessors.push("SVGGradientElement".into());
            model
        };
        let plan = AccessorPlan::build(&model).unwrap();
        let iface = plan.get(plan.id_of("SVGGradientElement").unwrap()).unwrap();

        assert!(function(AccessorKind::Get, iface, &[]).contains("return GetCustomAttribute(name);"));
        assert!(function(AccessorKind::Set, iface, &[]).contains("return SetCustomAttribute(name, value);"));
        assert!(function(AccessorKind::Has, iface, &[]).contains("return HasCustomAttribute(name);"));
        assert!(function(AccessorKind::GetAll, iface, &[]).contains("GetCustomAttributes(attributes);"));
    }
}
