//! Enumeration binding and the `SVGEnumerations.h` header.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use attrgen_core::{AttributeDecl, EnumGroupDecl, InterfaceId, InterfaceTable};

use super::templates::TemplateEngine;
use super::{FileGenerator, GeneratedFile};
use crate::config::Overrides;
use crate::error::{CodegenError, Result};
use crate::model::CodegenModel;

pub const ENUMERATIONS_FILE: &str = "SVGEnumerations.h";

/// One keyword of an enumerated attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCase {
    pub constant: String,
    pub value: u32,
    pub keyword: String,
}

/// The constant group an enumerated attribute is marshalled through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumBinding {
    pub group: String,
    /// Non-zero constants only; zero is the "unknown" value.
    pub cases: Vec<EnumCase>,
}

impl EnumBinding {
    pub fn keyword_of(&self, value: u32) -> Option<&str> {
        self.cases
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.keyword.as_str())
    }

    pub fn value_of(&self, keyword: &str) -> Option<u32> {
        self.cases
            .iter()
            .find(|c| c.keyword == keyword)
            .map(|c| c.value)
    }
}

/// Find the enumeration group for an attribute of `owner`.
///
/// Only the override table binds a group. `None` means numeric marshalling.
pub fn bind_enum(
    table: &InterfaceTable,
    owner: InterfaceId,
    attribute: &AttributeDecl,
    choices: &[String],
    overrides: &Overrides,
) -> Result<Option<EnumBinding>> {
    let owner_name = table.by_id(owner).map_or("", |d| d.name.as_str());

    let Some(name) = overrides.enum_override(owner_name, &attribute.name) else {
        debug!(interface = owner_name, attribute = %attribute.name, "no enum override, numeric fallback");
        return Ok(None);
    };

    let group = table
        .enum_group(name)
        .ok_or_else(|| CodegenError::UnknownEnumGroup {
            attribute: format!("{}.{}", owner_name, attribute.name),
            group: name.to_string(),
        })?;

    Ok(Some(EnumBinding {
        group: group.name.clone(),
        cases: cases_for(group, choices),
    }))
}

/// Lower-case alphanumerics only: `SVG_SPREADMETHOD` -> `svgspreadmethod`.
fn fold(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Keyword per non-zero constant: the DTD choice equal to the constant's
/// suffix (ignoring case and hyphens), else the lower-cased suffix.
fn cases_for(group: &EnumGroupDecl, choices: &[String]) -> Vec<EnumCase> {
    group
        .constants
        .iter()
        .filter(|c| c.value != 0)
        .map(|constant| {
            let suffix = group.suffix_of(constant);
            let folded = fold(suffix);
            let keyword = choices
                .iter()
                .find(|choice| fold(choice) == folded)
                .cloned()
                .unwrap_or_else(|| suffix.to_ascii_lowercase());
            EnumCase {
                constant: constant.name.clone(),
                value: constant.value,
                keyword,
            }
        })
        .collect()
}

#[derive(Serialize)]
struct GroupData<'a> {
    name: &'a str,
    interface: &'a str,
    constants: Vec<ConstantData<'a>>,
}

#[derive(Serialize)]
struct ConstantData<'a> {
    name: &'a str,
    value: u32,
}

const ENUMERATIONS_TEMPLATE: &str = r#"#ifndef {{guard file}}
#define {{guard file}}

{{#each groups}}
// Declared by {{interface}}.
enum {{name}}
{
{{#each constants}}
    {{name}} = {{value}},
{{/each}}
};

{{/each}}
#endif // {{guard file}}
"#;

/// Emits one C++ enum per constant group.
pub struct EnumerationGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> EnumerationGenerator<'a> {
    pub fn new() -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("enumerations", ENUMERATIONS_TEMPLATE)?;
        Ok(Self { engine })
    }
}

impl FileGenerator for EnumerationGenerator<'_> {
    fn name(&self) -> &'static str {
        "enumerations"
    }

    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>> {
        let mut seen_groups = HashSet::new();
        let mut seen_constants = HashSet::new();
        let mut groups = Vec::new();

        for (iface, group) in model.interfaces.enum_groups() {
            if !seen_groups.insert(group.name.as_str()) {
                debug!(group = %group.name, interface = %iface.name, "duplicate enum group skipped");
                continue;
            }

            let constants = group
                .constants
                .iter()
                .filter(|c| {
                    let fresh = seen_constants.insert(c.name.as_str());
                    if !fresh {
                        warn!(constant = %c.name, group = %group.name, "constant already declared, skipped");
                    }
                    fresh
                })
                .map(|c| ConstantData {
                    name: &c.name,
                    value: c.value,
                })
                .collect();

            groups.push(GroupData {
                name: &group.name,
                interface: &iface.name,
                constants,
            });
        }

        let body = self.engine.render(
            "enumerations",
            &serde_json::json!({ "file": ENUMERATIONS_FILE, "groups": groups }),
        )?;

        Ok(vec![GeneratedFile::new(ENUMERATIONS_FILE, &body)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrgen_parser::parse_interfaces;

    const IDL: &str = r#"
interface SVGUnitTypes {
  const unsigned short SVG_UNIT_TYPE_UNKNOWN = 0;
  const unsigned short SVG_UNIT_TYPE_USERSPACEONUSE = 1;
  const unsigned short SVG_UNIT_TYPE_OBJECTBOUNDINGBOX = 2;
};
interface SVGGradientElement : SVGUnitTypes {
  const unsigned short SVG_SPREADMETHOD_UNKNOWN = 0;
  const unsigned short SVG_SPREADMETHOD_PAD = 1;
  const unsigned short SVG_SPREADMETHOD_REFLECT = 2;
  readonly attribute SVGAnimatedEnumeration gradientUnits;
  readonly attribute SVGAnimatedEnumeration spreadMethod;
  readonly attribute SVGAnimatedEnumeration colorInterpolation;
};
"#;

    fn attr<'t>(table: &'t InterfaceTable, name: &str) -> &'t AttributeDecl {
        table.get("SVGGradientElement").unwrap().attribute(name).unwrap()
    }

    #[test]
    fn test_bind_through_override() {
        let table = parse_interfaces(IDL).unwrap();
        let owner = table.id_of("SVGGradientElement").unwrap();
        let choices = vec!["pad".to_string(), "reflect".to_string(), "repeat".to_string()];
        let mut overrides = Overrides::default();
        overrides
            .enum_overrides
            .insert("spreadMethod".into(), "SVG_SPREADMETHOD".into());

        let binding = bind_enum(&table, owner, attr(&table, "spreadMethod"), &choices, &overrides)
            .unwrap()
            .unwrap();
        assert_eq!(binding.group, "SVG_SPREADMETHOD");
        assert_eq!(binding.cases.len(), 2);
        assert_eq!(binding.keyword_of(1), Some("pad"));
        assert_eq!(binding.value_of("reflect"), Some(2));
        assert_eq!(binding.keyword_of(0), None);
    }

    #[test]
    fn test_override_and_dtd_spelling() {
        let table = parse_interfaces(IDL).unwrap();
        let owner = table.id_of("SVGGradientElement").unwrap();
        let mut overrides = Overrides::default();
        overrides
            .enum_overrides
            .insert("gradientUnits".into(), "SVG_UNIT_TYPE".into());
        let choices = vec!["userSpaceOnUse".to_string(), "objectBoundingBox".to_string()];

        let binding = bind_enum(&table, owner, attr(&table, "gradientUnits"), &choices, &overrides)
            .unwrap()
            .unwrap();
        assert_eq!(binding.keyword_of(1), Some("userSpaceOnUse"));
        assert_eq!(binding.keyword_of(2), Some("objectBoundingBox"));
    }

    #[test]
    fn test_lowercase_suffix_without_choices() {
        let table = parse_interfaces(IDL).unwrap();
        let owner = table.id_of("SVGGradientElement").unwrap();
        let mut overrides = Overrides::default();
        overrides
            .enum_overrides
            .insert("SVGGradientElement.gradientUnits".into(), "SVG_UNIT_TYPE".into());

        let binding = bind_enum(&table, owner, attr(&table, "gradientUnits"), &[], &overrides)
            .unwrap()
            .unwrap();
        assert_eq!(binding.keyword_of(1), Some("userspaceonuse"));
    }

    #[test]
    fn test_unbound_and_unknown_override() {
        let table = parse_interfaces(IDL).unwrap();
        let owner = table.id_of("SVGGradientElement").unwrap();

        let unbound = bind_enum(&table, owner, attr(&table, "colorInterpolation"), &[], &Overrides::default()).unwrap();
        assert!(unbound.is_none());

        // A matching group name alone does not bind.
        let spread = bind_enum(&table, owner, attr(&table, "spreadMethod"), &[], &Overrides::default()).unwrap();
        assert!(spread.is_none());

        let mut overrides = Overrides::default();
        overrides
            .enum_overrides
            .insert("colorInterpolation".into(), "SVG_NOPE".into());
        let err = bind_enum(&table, owner, attr(&table, "colorInterpolation"), &[], &overrides).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownEnumGroup { .. }));
    }

    #[test]
    fn test_enumerations_header() {
        let table = parse_interfaces(IDL).unwrap();
        let model = crate::test_support::model_with(table);
        let files = EnumerationGenerator::new().unwrap().generate(&model).unwrap();

        assert_eq!(files.len(), 1);
        let content = &files[0].content;
        assert!(content.contains("#ifndef SVG_ENUMERATIONS_H"));
        assert!(content.contains("enum SVG_UNIT_TYPE"));
        assert!(content.contains("SVG_UNIT_TYPE_OBJECTBOUNDINGBOX = 2,"));
        assert!(content.contains("enum SVG_SPREADMETHOD"));
        let unit = content.find("enum SVG_UNIT_TYPE").unwrap();
        let spread = content.find("enum SVG_SPREADMETHOD").unwrap();
        assert!(unit < spread);
    }
}
