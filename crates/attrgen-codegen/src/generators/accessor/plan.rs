//! Accessor plan: what each interface's generated accessors handle.
//!
//! The plan is kind-independent. Every accessor kind renders it, and the
//! in-memory [`AttributeInstance`](super::AttributeInstance) executes it.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use attrgen_core::{classify, Category, InterfaceId, TypeRef};
use attrgen_resolver::{known_bases, AttributeKey};

use crate::error::Result;
use crate::generators::enums::{bind_enum, EnumBinding};
use crate::model::CodegenModel;

/// One marshalled attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorEntry {
    pub key: AttributeKey,
    /// Marshalled (DTD) name.
    pub name: String,
    /// Interface attribute name.
    pub attribute: String,
    pub category: Category,
    pub type_ref: TypeRef,
    /// Set only for [`Category::Enum`] attributes with a bound group.
    pub binding: Option<EnumBinding>,
}

impl AccessorEntry {
    /// The C++ member holding this attribute.
    pub fn field(&self) -> String {
        format!("m_{}", self.attribute)
    }

    /// Animated attributes are read and written through their base value.
    pub fn animated(&self) -> bool {
        self.type_ref.animated
    }
}

/// Accessor plan for one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfacePlan {
    pub id: InterfaceId,
    pub name: String,
    /// Own marshalled attributes, in declaration order.
    pub entries: Vec<AccessorEntry>,
    /// Bases present in the table, in declaration order.
    pub bases: Vec<InterfaceId>,
    /// Chains into a hand-written accessor before giving up.
    pub custom: bool,
}

/// Accessor plans for every interface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessorPlan {
    interfaces: IndexMap<InterfaceId, InterfacePlan>,
    /// Names the generated style declaration answers to.
    pub style_properties: BTreeSet<String>,
}

impl AccessorPlan {
    /// Build the plan from a reconciled model.
    pub fn build(model: &CodegenModel) -> Result<Self> {
        let table = &model.interfaces;
        let mapping = &model.reconciliation.attributes;
        let mut interfaces = IndexMap::new();

        for id in table.ids() {
            let Some(decl) = table.by_id(id) else { continue };
            let mut entries = Vec::new();

            for (index, attr) in decl.attributes.iter().enumerate() {
                let key = AttributeKey {
                    interface: id,
                    index,
                };
                let Some(mapped) = mapping.get(key) else {
                    continue;
                };
                let category = classify(&attr.type_ref);

                let binding = match category {
                    Category::Enum => {
                        bind_enum(table, id, attr, &mapped.choices, &model.overrides)?
                    }
                    _ => None,
                };

                entries.push(AccessorEntry {
                    key,
                    name: mapped.dtd_name.clone(),
                    attribute: attr.name.clone(),
                    category,
                    type_ref: attr.type_ref.clone(),
                    binding,
                });
            }

            let plan = InterfacePlan {
                id,
                name: decl.name.clone(),
                entries,
                bases: known_bases(table, decl),
                custom: model.overrides.has_custom_accessors(&decl.name),
            };
            debug!(interface = %plan.name, entries = plan.entries.len(), "planned accessors");
            interfaces.insert(id, plan);
        }

        Ok(Self {
            interfaces,
            style_properties: model.css_properties.iter().map(|p| p.name.clone()).collect(),
        })
    }

    pub fn get(&self, id: InterfaceId) -> Option<&InterfacePlan> {
        self.interfaces.get(&id)
    }

    pub fn id_of(&self, name: &str) -> Option<InterfaceId> {
        self.interfaces
            .values()
            .find(|plan| plan.name == name)
            .map(|plan| plan.id)
    }

    /// Plans in interface declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &InterfacePlan> {
        self.interfaces.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = InterfaceId> + '_ {
        self.interfaces.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::model_from_sources;

    #[test]
    fn test_only_mapped_attributes_are_planned() {
        let model = model_from_sources(
            r#"
interface SVGElement { attribute DOMString id; attribute DOMString xmlbase; };
interface SVGRectElement : SVGElement, Missing {
  readonly attribute SVGAnimatedLength x;
  readonly attribute SVGAnimatedLength y;
};
"#,
            "<!ELEMENT rect EMPTY>\n<!ATTLIST rect id ID #IMPLIED x CDATA \"0\">",
        );
        let plan = AccessorPlan::build(&model).unwrap();

        let rect = plan.get(plan.id_of("SVGRectElement").unwrap()).unwrap();
        let names: Vec<&str> = rect.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["x"]);
        assert_eq!(rect.entries[0].field(), "m_x");
        assert!(rect.entries[0].animated());
        assert_eq!(rect.entries[0].category, Category::Length);
        assert_eq!(rect.bases, [plan.id_of("SVGElement").unwrap()]);

        let element = plan.get(plan.id_of("SVGElement").unwrap()).unwrap();
        assert_eq!(element.entries.len(), 1);
        assert_eq!(element.entries[0].name, "id");
    }

    #[test]
    fn test_style_declaration_planned() {
        let model = model_from_sources(
            "interface SVGStylable { readonly attribute CSSStyleDeclaration style; };\n\
             interface SVGGElement : SVGStylable {};",
            "<!ELEMENT g EMPTY>\n<!ATTLIST g style CDATA #IMPLIED>",
        );
        let plan = AccessorPlan::build(&model).unwrap();
        let stylable = plan.get(plan.id_of("SVGStylable").unwrap()).unwrap();
        assert_eq!(stylable.entries.len(), 1);
        assert_eq!(stylable.entries[0].category, Category::StyleDeclaration);
    }
}
