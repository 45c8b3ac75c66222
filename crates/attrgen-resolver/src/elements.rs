//! Element name to interface mapping.

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use tracing::debug;

use attrgen_core::{DtdDocument, InterfaceId, InterfaceTable, ReconcileError};

/// Element names whose interface name does not follow the Pascal-case rule.
const BUILTIN_EXCEPTIONS: &[(&str, &str)] = &[
    ("svg", "SVGSVGElement"),
    ("tref", "SVGTRefElement"),
    ("tspan", "SVGTSpanElement"),
    ("mpath", "SVGMPathElement"),
    ("hkern", "SVGHKernElement"),
    ("vkern", "SVGVKernElement"),
];

/// Element name to interface, in DTD element order.
#[derive(Debug, Clone, Default)]
pub struct ElementNameMapping {
    entries: IndexMap<String, InterfaceId>,
}

impl ElementNameMapping {
    /// Map every element of `dtd`. The first element without an interface
    /// aborts the whole mapping.
    pub fn build(
        dtd: &DtdDocument,
        table: &InterfaceTable,
        prefix: &str,
        exceptions: &IndexMap<String, String>,
    ) -> Result<Self, ReconcileError> {
        let mut entries = IndexMap::new();

        for element in dtd.element_names() {
            let candidate = interface_name_for(element, prefix, exceptions);
            let id = table
                .id_of(&candidate)
                .ok_or_else(|| ReconcileError::UnmappedElement {
                    element: element.to_string(),
                    candidate: candidate.clone(),
                })?;
            debug!(element, interface = %candidate, "element mapped");
            entries.insert(element.to_string(), id);
        }

        Ok(Self { entries })
    }

    /// The interface for an element name.
    pub fn get(&self, element: &str) -> Option<InterfaceId> {
        self.entries.get(element).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, InterfaceId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The interface name an element is expected to map to.
///
/// Configured exceptions win over the built-in table, which wins over the
/// `prefix + PascalCase(name) + "Element"` rule. Filter primitives keep
/// their `FE` acronym: `feGaussianBlur` maps to `SVGFEGaussianBlurElement`.
pub fn interface_name_for(
    element: &str,
    prefix: &str,
    exceptions: &IndexMap<String, String>,
) -> String {
    if let Some(name) = exceptions.get(element) {
        return name.clone();
    }
    if let Some((_, name)) = BUILTIN_EXCEPTIONS.iter().find(|(e, _)| *e == element) {
        return name.to_string();
    }

    let stem = match element.strip_prefix("fe") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => {
            format!("FE{}", rest.to_case(Case::Pascal))
        }
        _ => element.to_case(Case::Pascal),
    };

    format!("{}{}Element", prefix, stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrgen_core::InterfaceDecl;

    fn no_exceptions() -> IndexMap<String, String> {
        IndexMap::new()
    }

    #[test]
    fn test_interface_name_rule() {
        let ex = no_exceptions();
        assert_eq!(interface_name_for("rect", "SVG", &ex), "SVGRectElement");
        assert_eq!(
            interface_name_for("linearGradient", "SVG", &ex),
            "SVGLinearGradientElement"
        );
        assert_eq!(
            interface_name_for("font-face-src", "SVG", &ex),
            "SVGFontFaceSrcElement"
        );
        assert_eq!(
            interface_name_for("feGaussianBlur", "SVG", &ex),
            "SVGFEGaussianBlurElement"
        );
        assert_eq!(interface_name_for("feFuncR", "SVG", &ex), "SVGFEFuncRElement");
        assert_eq!(interface_name_for("svg", "SVG", &ex), "SVGSVGElement");
        assert_eq!(interface_name_for("tspan", "SVG", &ex), "SVGTSpanElement");
    }

    #[test]
    fn test_configured_exception_wins() {
        let mut ex = no_exceptions();
        ex.insert("svg".into(), "SVGRootElement".into());
        assert_eq!(interface_name_for("svg", "SVG", &ex), "SVGRootElement");
    }

    #[test]
    fn test_unmapped_element_is_fatal() {
        let mut dtd = DtdDocument::new();
        dtd.declare_element("rect");
        dtd.declare_element("blink");

        let mut table = InterfaceTable::new();
        table.insert(InterfaceDecl::new("SVGRectElement"));

        let err = ElementNameMapping::build(&dtd, &table, "SVG", &no_exceptions()).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::UnmappedElement { ref element, ref candidate }
                if element == "blink" && candidate == "SVGBlinkElement"
        ));
    }

    #[test]
    fn test_mapping_in_dtd_order() {
        let mut dtd = DtdDocument::new();
        dtd.declare_element("svg");
        dtd.declare_element("rect");

        let mut table = InterfaceTable::new();
        let rect = table.insert(InterfaceDecl::new("SVGRectElement"));
        let svg = table.insert(InterfaceDecl::new("SVGSVGElement"));

        let mapping = ElementNameMapping::build(&dtd, &table, "SVG", &no_exceptions()).unwrap();
        assert_eq!(mapping.iter().collect::<Vec<_>>(), [("svg", svg), ("rect", rect)]);
        assert_eq!(mapping.get("rect"), Some(rect));
        assert_eq!(mapping.get("circle"), None);
    }
}
