//! Hand-maintained override tables, read from `attrgen.toml`.
//!
//! ```toml
//! interface_prefix = "SVG"
//! fallback_element = "SVGGElement"
//! custom_accessors = ["SVGSVGElement"]
//! hand_written_lists = ["SVGPathSegList"]
//!
//! [element_exceptions]
//! svg = "SVGSVGElement"
//!
//! [attribute_aliases]
//! class = "className"
//!
//! [enum_overrides]
//! "SVGGradientElement.gradientUnits" = "SVG_UNIT_TYPE"
//!
//! [css_default_patches]
//! "font-family" = "serif"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use attrgen_resolver::ReconcileOptions;

use crate::error::{CodegenError, Result};

/// Every override table. All fields are optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub interface_prefix: String,
    /// Concrete type created for unknown element names.
    pub fallback_element: String,
    pub element_exceptions: IndexMap<String, String>,
    pub attribute_aliases: IndexMap<String, String>,
    /// `Interface.attribute` or bare `attribute` to enum group name.
    pub enum_overrides: IndexMap<String, String>,
    /// Interfaces with a hand-written accessor chain.
    pub custom_accessors: Vec<String>,
    /// List types whose container header is written by hand.
    pub hand_written_lists: Vec<String>,
    pub css_default_patches: IndexMap<String, String>,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            interface_prefix: "SVG".to_string(),
            fallback_element: "SVGGElement".to_string(),
            element_exceptions: IndexMap::new(),
            attribute_aliases: IndexMap::new(),
            enum_overrides: IndexMap::new(),
            custom_accessors: Vec::new(),
            hand_written_lists: Vec::new(),
            css_default_patches: IndexMap::new(),
        }
    }
}

impl Overrides {
    /// Parse overrides from TOML text. `origin` is only used in errors.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| CodegenError::InvalidOverrides {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load overrides from `path`; a missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no overrides file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(CodegenError::io(path, err)),
        }
    }

    /// The enum group configured for an attribute, qualified name first.
    pub fn enum_override(&self, interface: &str, attribute: &str) -> Option<&str> {
        self.enum_overrides
            .get(&format!("{}.{}", interface, attribute))
            .or_else(|| self.enum_overrides.get(attribute))
            .map(String::as_str)
    }

    pub fn has_custom_accessors(&self, interface: &str) -> bool {
        self.custom_accessors.iter().any(|name| name == interface)
    }

    pub fn is_hand_written_list(&self, type_name: &str) -> bool {
        self.hand_written_lists.iter().any(|name| name == type_name)
    }

    /// Naming inputs for the reconciler.
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            interface_prefix: self.interface_prefix.clone(),
            element_exceptions: self.element_exceptions.clone(),
            attribute_aliases: self.attribute_aliases.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let overrides = Overrides::from_toml("", Path::new("attrgen.toml")).unwrap();
        assert_eq!(overrides.interface_prefix, "SVG");
        assert_eq!(overrides.fallback_element, "SVGGElement");
        assert!(overrides.enum_overrides.is_empty());
    }

    #[test]
    fn test_tables_parse() {
        let text = r#"
custom_accessors = ["SVGSVGElement"]

[attribute_aliases]
class = "className"

[enum_overrides]
"SVGGradientElement.gradientUnits" = "SVG_UNIT_TYPE"
maskUnits = "SVG_UNIT_TYPE"
"#;
        let overrides = Overrides::from_toml(text, Path::new("attrgen.toml")).unwrap();
        assert_eq!(overrides.attribute_aliases["class"], "className");
        assert!(overrides.has_custom_accessors("SVGSVGElement"));
        assert_eq!(
            overrides.enum_override("SVGGradientElement", "gradientUnits"),
            Some("SVG_UNIT_TYPE")
        );
        assert_eq!(
            overrides.enum_override("SVGMaskElement", "maskUnits"),
            Some("SVG_UNIT_TYPE")
        );
        assert_eq!(overrides.enum_override("SVGMaskElement", "x"), None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Overrides::from_toml("prefix = \"X\"", Path::new("attrgen.toml")).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidOverrides { .. }));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = Overrides::load(&dir.path().join("attrgen.toml")).unwrap();
        assert!(overrides.custom_accessors.is_empty());
    }
}
