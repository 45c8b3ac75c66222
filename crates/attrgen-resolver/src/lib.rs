//! Name reconciliation for attrgen.
//!
//! This crate cross-references the two parsed grammars:
//! - Element names to interfaces (`rect` -> `SVGRectElement`); a miss is fatal
//! - DTD attribute names to interface attributes (`stroke-width` -> `strokeWidth`);
//!   a miss only drops the attribute from marshalling
//! - Inheritance order queries shared with code generation

mod attributes;
mod elements;
mod hierarchy;

pub use attributes::{
    candidate_names, AttributeKey, AttributeNameMapping, MappedAttribute, UnmappedAttribute,
};
pub use elements::{interface_name_for, ElementNameMapping};
pub use hierarchy::{check_acyclic, known_bases, search_order};

use indexmap::IndexMap;
use tracing::info;

use attrgen_core::{DtdDocument, InterfaceTable, ReconcileError};

/// Naming inputs for reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Prefix of generated interface names, `SVG` for `SVGRectElement`.
    pub interface_prefix: String,
    /// Element name to interface name, consulted before the naming rule.
    pub element_exceptions: IndexMap<String, String>,
    /// DTD attribute name to interface attribute name.
    pub attribute_aliases: IndexMap<String, String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            interface_prefix: "SVG".to_string(),
            element_exceptions: IndexMap::new(),
            attribute_aliases: IndexMap::new(),
        }
    }
}

/// Both mappings produced from one pair of grammars.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub elements: ElementNameMapping,
    pub attributes: AttributeNameMapping,
}

/// Reconcile the interface table with the document-type grammar.
pub fn reconcile(
    table: &InterfaceTable,
    dtd: &DtdDocument,
    options: &ReconcileOptions,
) -> Result<Reconciliation, ReconcileError> {
    check_acyclic(table)?;

    let elements = ElementNameMapping::build(
        dtd,
        table,
        &options.interface_prefix,
        &options.element_exceptions,
    )?;
    let attributes = AttributeNameMapping::build(
        dtd.all_attributes(),
        table,
        &elements,
        &options.attribute_aliases,
    );

    info!(
        elements = elements.len(),
        attributes = attributes.len(),
        unmapped = attributes.unmapped().len(),
        "reconciled grammars"
    );

    Ok(Reconciliation {
        elements,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrgen_parser::{parse_dtd, parse_interfaces};

    const IDL: &str = r#"
interface SVGElement {
  attribute DOMString id;
};
interface SVGStylable {
  readonly attribute SVGAnimatedString className;
};
interface SVGStrokeA {
  readonly attribute SVGAnimatedLength strokeWidth;
};
interface SVGStrokeB {
  readonly attribute SVGAnimatedNumber strokeWidth;
};
interface SVGPathElement : SVGElement, SVGStrokeA, SVGStrokeB, SVGStylable {
  readonly attribute SVGAnimatedNumber pathLength;
};
"#;

    const DTD: &str = r#"
<!ELEMENT path EMPTY>
<!ATTLIST path
  id ID #IMPLIED
  class CDATA #IMPLIED
  stroke-width CDATA #IMPLIED
  pathLength CDATA #IMPLIED
  d CDATA #REQUIRED >
"#;

    fn options() -> ReconcileOptions {
        let mut options = ReconcileOptions::default();
        options
            .attribute_aliases
            .insert("class".into(), "className".into());
        options
    }

    #[test]
    fn test_first_base_in_declaration_order_wins() {
        let table = parse_interfaces(IDL).unwrap();
        let dtd = parse_dtd(DTD).unwrap();
        let result = reconcile(&table, &dtd, &options()).unwrap();

        let targets = result.attributes.targets_of("stroke-width");
        assert_eq!(targets.len(), 1);
        let winner = table.by_id(targets[0].interface).unwrap();
        assert_eq!(winner.name, "SVGStrokeA");
        assert_eq!(
            winner.attributes[targets[0].index].type_ref.base,
            "SVGLength"
        );
    }

    #[test]
    fn test_aliases_and_unmapped() {
        let table = parse_interfaces(IDL).unwrap();
        let dtd = parse_dtd(DTD).unwrap();
        let result = reconcile(&table, &dtd, &options()).unwrap();

        let class = result.attributes.targets_of("class");
        assert_eq!(class.len(), 1);
        assert_eq!(result.attributes.name_of(class[0]), Some("class"));

        let unmapped: Vec<&str> = result
            .attributes
            .unmapped()
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(unmapped, ["d"]);
        assert_eq!(result.attributes.len(), 4);
    }

    #[test]
    fn test_first_dtd_spelling_is_marshalled_name() {
        let table = parse_interfaces(IDL).unwrap();
        let dtd = parse_dtd(
            "<!ELEMENT path EMPTY>\n<!ATTLIST path pathlength CDATA #IMPLIED pathLength CDATA #IMPLIED>",
        )
        .unwrap();
        let result = reconcile(&table, &dtd, &options()).unwrap();

        let keys = result.attributes.targets_of("pathLength");
        assert_eq!(keys.len(), 1);
        assert_eq!(result.attributes.name_of(keys[0]), Some("pathlength"));
    }

    #[test]
    fn test_cycle_is_fatal() {
        let table = parse_interfaces(
            "interface SVGAElement : SVGBElement {}; interface SVGBElement : SVGAElement {};",
        )
        .unwrap();
        let err = reconcile(&table, &DtdDocument::new(), &options()).unwrap_err();
        assert!(matches!(err, ReconcileError::InheritanceCycle { .. }));
    }
}
