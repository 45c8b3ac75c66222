//! Document-type grammar model.

use indexmap::IndexMap;

/// A named, reusable fragment declared with `<!ENTITY % Name "...">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityFragment {
    /// An enumerated choice list, `(a|b|c)`.
    Choice(Vec<String>),
    /// A primitive attribute type such as `CDATA` or `NMTOKEN`.
    Primitive(String),
    /// Anything else, typically a run of attribute definitions (`%stdAttrs;`).
    AttributeGroup(String),
}

/// The allowed values of one attribute after entity substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedValues {
    Choice(Vec<String>),
    Primitive(String),
}

impl AllowedValues {
    /// The keyword alternatives, if this is a choice list.
    pub fn choices(&self) -> &[String] {
        match self {
            Self::Choice(values) => values,
            Self::Primitive(_) => &[],
        }
    }
}

/// How an attribute's default is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Implied,
    Required,
    Fixed,
    Default,
}

/// One attribute definition from an `<!ATTLIST>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdAttributeDecl {
    /// Owning element name.
    pub element: String,
    /// Attribute name in DTD spelling, e.g. `stroke-width` or `xlink:href`.
    pub name: String,
    /// The type fragment as written, e.g. `%Length.datatype;` or `(a|b)`.
    pub raw_type: String,
    pub allowed: AllowedValues,
    pub presence: Presence,
    /// Default value literal, if any.
    pub default: Option<String>,
}

/// A parsed document-type grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DtdDocument {
    /// Parameter entities in declaration order.
    pub entities: IndexMap<String, EntityFragment>,
    /// Element name to attribute list, in declaration order.
    pub elements: IndexMap<String, Vec<DtdAttributeDecl>>,
}

impl DtdDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn attributes_of(&self, element: &str) -> &[DtdAttributeDecl] {
        self.elements
            .get(element)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every attribute of every element, in document order.
    pub fn all_attributes(&self) -> impl Iterator<Item = &DtdAttributeDecl> {
        self.elements.values().flatten()
    }

    /// Register an element, keeping the first position it was seen at.
    pub fn declare_element(&mut self, name: &str) {
        if !self.elements.contains_key(name) {
            self.elements.insert(name.to_string(), Vec::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_element_keeps_order_and_attributes() {
        let mut doc = DtdDocument::new();
        doc.declare_element("svg");
        doc.declare_element("rect");
        doc.elements.get_mut("svg").unwrap().push(DtdAttributeDecl {
            element: "svg".into(),
            name: "width".into(),
            raw_type: "CDATA".into(),
            allowed: AllowedValues::Primitive("CDATA".into()),
            presence: Presence::Implied,
            default: None,
        });
        doc.declare_element("svg");

        assert_eq!(doc.element_names().collect::<Vec<_>>(), ["svg", "rect"]);
        assert_eq!(doc.attributes_of("svg").len(), 1);
        assert!(doc.attributes_of("circle").is_empty());
    }
}
