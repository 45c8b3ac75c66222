//! Element-kind enumeration and the element factory.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use super::templates::TemplateEngine;
use super::{constant_case, cpp_string, FileGenerator, GeneratedFile};
use crate::error::Result;
use crate::model::CodegenModel;

pub const ELEMENT_KIND_FILE: &str = "SVGElementKind.h";
pub const ELEMENT_FACTORY_FILE: &str = "SVGElementFactory.cpp";

const ELEMENT_KIND_TEMPLATE: &str = r#"#ifndef {{guard file}}
#define {{guard file}}

#include <string>

enum SVGElementKind
{
    SVG_ELEMENT_UNKNOWN = 0,
{{#each elements}}
    {{this.kind}} = {{this.value}},
{{/each}}
};

// Local name or qualified name; a namespace prefix is ignored.
SVGElementKind GetSVGElementKind(const std::string& name);

#endif // {{guard file}}
"#;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Serialize)]
struct ElementData {
    name: String,
    kind: String,
    value: usize,
    interface: String,
}

#[derive(Debug, Clone, Serialize)]
struct KindHeader<'d> {
    file: &'static str,
    elements: &'d [ElementData],
}

/// Emits `SVGElementKind.h` and `SVGElementFactory.cpp`.
pub struct ElementFactoryGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> ElementFactoryGenerator<'a> {
    pub fn new() -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("element_kind", ELEMENT_KIND_TEMPLATE)?;
        Ok(Self { engine })
    }

    fn elements(model: &CodegenModel) -> Vec<ElementData> {
        let table = &model.interfaces;
        model
            .dtd
            .element_names()
            .filter_map(|name| {
                let id = model.reconciliation.elements.get(name)?;
                let decl = table.by_id(id)?;
                Some((name, decl.name.clone()))
            })
            .enumerate()
            .map(|(index, (name, interface))| ElementData {
                name: name.to_string(),
                kind: format!("SVG_ELEMENT_{}", constant_case(name)),
                value: index + 1,
                interface,
            })
            .collect()
    }

    fn factory(&self, elements: &[ElementData], fallback: &str) -> String {
        let includes: BTreeSet<&str> = elements
            .iter()
            .map(|e| e.interface.as_str())
            .chain(std::iter::once(fallback))
            .collect();

        let mut lines = vec![format!("#include \"{}\"", ELEMENT_KIND_FILE)];
        lines.push(String::new());
        for include in includes {
            lines.push(format!("#include \"{}.h\"", include));
        }
        lines.push(String::new());
        lines.push("#include <string>".to_string());
        lines.push(String::new());

        lines.push("namespace {".to_string());
        lines.push(String::new());
        lines.push("std::string LocalName(const std::string& name)".to_string());
        lines.push("{".to_string());
        lines.push(format!("{}std::string::size_type colon = name.find(':');", INDENT));
        lines.push(format!(
            "{}return colon == std::string::npos ? name : name.substr(colon + 1);",
            INDENT
        ));
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push("} // namespace".to_string());
        lines.push(String::new());

        lines.push("SVGElementKind GetSVGElementKind(const std::string& name)".to_string());
        lines.push("{".to_string());
        lines.push(format!("{}const std::string local = LocalName(name);", INDENT));
        for element in elements {
            lines.push(format!("{}if (local == {})", INDENT, cpp_string(&element.name)));
            lines.push(format!("{0}{0}return {1};", INDENT, element.kind));
        }
        lines.push(format!("{}return SVG_ELEMENT_UNKNOWN;", INDENT));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push("SVGElement* CreateSVGElement(const std::string& name)".to_string());
        lines.push("{".to_string());
        lines.push(format!("{}switch (GetSVGElementKind(name)) {{", INDENT));
        for element in elements {
            lines.push(format!("{}case {}:", INDENT, element.kind));
            lines.push(format!("{0}{0}return new {1}();", INDENT, element.interface));
        }
        lines.push(format!("{}case SVG_ELEMENT_UNKNOWN:", INDENT));
        lines.push(format!("{}default:", INDENT));
        lines.push(format!("{0}{0}return new {1}();", INDENT, fallback));
        lines.push(format!("{}}}", INDENT));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

impl FileGenerator for ElementFactoryGenerator<'_> {
    fn name(&self) -> &'static str {
        "element factory"
    }

    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>> {
        let elements = Self::elements(model);
        let fallback = &model.overrides.fallback_element;
        if !model.interfaces.contains(fallback) {
            debug!(fallback = %fallback, "fallback element is not a known interface");
        }

        let header = self.engine.render(
            "element_kind",
            &KindHeader {
                file: ELEMENT_KIND_FILE,
                elements: &elements,
            },
        )?;
        let factory = self.factory(&elements, fallback);

        info!(elements = elements.len(), "generated element factory");
        Ok(vec![
            GeneratedFile::new(ELEMENT_KIND_FILE, &header),
            GeneratedFile::new(ELEMENT_FACTORY_FILE, &factory),
        ])
    }
}
