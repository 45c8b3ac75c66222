//! Animated-value wrapper headers, one per animated type.
//!
//! Small value types keep `base` and `anim` in lock-step fields. Object
//! types keep a lazily allocated deep copy as the animated override, which
//! `SetBase` releases.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use attrgen_core::{classify, TypeRef};

use super::templates::TemplateEngine;
use super::{FileGenerator, GeneratedFile};
use crate::error::Result;
use crate::model::CodegenModel;

const VALUE_WRAPPER_TEMPLATE: &str = r#"#ifndef {{guard file}}
#define {{guard file}}

{{#if include}}
#include {{include}}

{{/if}}
class {{class_name}}
{
public:
    {{class_name}}()
        : m_base()
        , m_anim()
    {
    }

    explicit {{class_name}}({{storage}} value)
        : m_base(value)
        , m_anim(value)
    {
    }

    {{storage}} GetBase() const { return m_base; }

    void SetBase({{storage}} value)
    {
        m_base = value;
        m_anim = value;
    }

    {{storage}} GetAnim() const { return m_anim; }

    void SetAnim({{storage}} value) { m_anim = value; }

private:
    {{storage}} m_base;
    {{storage}} m_anim;
};

#endif // {{guard file}}
"#;

const OBJECT_WRAPPER_TEMPLATE: &str = r#"#ifndef {{guard file}}
#define {{guard file}}

#include <memory>
#include {{include}}

class {{class_name}}
{
public:
    {{class_name}}() {}

    explicit {{class_name}}(const {{storage}}& value)
        : m_base(value)
    {
    }

    {{class_name}}(const {{class_name}}& other)
        : m_base(other.m_base)
        , m_anim(other.m_anim ? new {{storage}}(*other.m_anim) : nullptr)
    {
    }

    {{class_name}}& operator=(const {{class_name}}& other)
    {
        if (this != &other) {
            m_base = other.m_base;
            m_anim.reset(other.m_anim ? new {{storage}}(*other.m_anim) : nullptr);
        }
        return *this;
    }

    const {{storage}}& GetBase() const { return m_base; }

    void SetBase(const {{storage}}& value)
    {
        m_base = value;
        m_anim.reset();
    }

    const {{storage}}& GetAnim() const
    {
        if (!m_anim)
            m_anim.reset(new {{storage}}(m_base));
        return *m_anim;
    }

    void SetAnim(const {{storage}}& value) { m_anim.reset(new {{storage}}(value)); }

private:
    {{storage}} m_base;
    mutable std::unique_ptr<{{storage}}> m_anim;
};

#endif // {{guard file}}
"#;

/// Template data for one wrapper.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct WrapperData {
    file: String,
    class_name: String,
    storage: String,
    /// `<header>` or `"header"`, if the storage type needs one.
    include: Option<String>,
    #[serde(skip)]
    value_type: bool,
}

impl WrapperData {
    fn for_type(type_ref: &TypeRef) -> Self {
        let category = classify(type_ref);
        let storage = category.storage_type(type_ref);
        let include = if category.is_value_type() {
            None
        } else if storage == "std::string" {
            Some("<string>".to_string())
        } else {
            Some(format!("\"{}.h\"", storage))
        };

        Self {
            file: format!("{}.h", type_ref.declared),
            class_name: type_ref.declared.clone(),
            storage,
            include,
            value_type: category.is_value_type(),
        }
    }
}

/// Emits `SVGAnimated*.h` wrapper headers.
pub struct AnimatedWrapperGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> AnimatedWrapperGenerator<'a> {
    pub fn new() -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("value_wrapper", VALUE_WRAPPER_TEMPLATE)?;
        engine.register_template("object_wrapper", OBJECT_WRAPPER_TEMPLATE)?;
        Ok(Self { engine })
    }
}

impl FileGenerator for AnimatedWrapperGenerator<'_> {
    fn name(&self) -> &'static str {
        "animated wrappers"
    }

    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>> {
        // Sorted by class name so output order does not depend on the grammar.
        let wrappers: BTreeMap<String, WrapperData> = model
            .interfaces
            .iter()
            .flat_map(|iface| iface.attributes.iter())
            .filter(|attr| attr.type_ref.animated)
            .map(|attr| {
                let data = WrapperData::for_type(&attr.type_ref);
                (data.class_name.clone(), data)
            })
            .collect();

        let mut files = Vec::with_capacity(wrappers.len());
        for data in wrappers.values() {
            let template = if data.value_type {
                "value_wrapper"
            } else {
                "object_wrapper"
            };
            debug!(class = %data.class_name, template, "animated wrapper");
            let body = self.engine.render(template, data)?;
            files.push(GeneratedFile::new(data.file.clone(), &body));
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrgen_parser::parse_interfaces;

    fn generate(idl: &str) -> Vec<GeneratedFile> {
        let model = crate::test_support::model_with(parse_interfaces(idl).unwrap());
        AnimatedWrapperGenerator::new().unwrap().generate(&model).unwrap()
    }

    #[test]
    fn test_one_header_per_animated_type() {
        let files = generate(
            r#"
interface SVGRectElement {
  readonly attribute SVGAnimatedLength x;
  readonly attribute SVGAnimatedLength y;
  readonly attribute SVGAnimatedBoolean externalResourcesRequired;
  readonly attribute SVGLength plain;
};
"#,
        );
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["SVGAnimatedBoolean.h", "SVGAnimatedLength.h"]);
    }

    #[test]
    fn test_value_wrapper_shape() {
        let files = generate("interface A { readonly attribute SVGAnimatedNumber n; };");
        let content = &files[0].content;
        assert!(content.contains("#ifndef SVG_ANIMATED_NUMBER_H"));
        assert!(content.contains("class SVGAnimatedNumber"));
        assert!(content.contains("float GetBase() const { return m_base; }"));
        assert!(content.contains("        m_anim = value;"));
        assert!(!content.contains("unique_ptr"));
        assert!(!content.contains("#include"));
    }

    #[test]
    fn test_object_wrapper_shape() {
        let files = generate("interface A { readonly attribute SVGAnimatedLengthList xs; };");
        let content = &files[0].content;
        assert_eq!(files[0].path, "SVGAnimatedLengthList.h");
        assert!(content.contains("#include \"SVGLengthList.h\""));
        assert!(content.contains("mutable std::unique_ptr<SVGLengthList> m_anim;"));
        assert!(content.contains("m_anim.reset();"));
        assert!(content.contains("m_anim(other.m_anim ? new SVGLengthList(*other.m_anim) : nullptr)"));
        assert!(content.contains("m_anim.reset(new SVGLengthList(m_base));"));
    }

    #[test]
    fn test_string_wrapper_includes_string() {
        let files = generate("interface A { readonly attribute SVGAnimatedString s; };");
        assert!(files[0].content.contains("#include <string>"));
        assert!(files[0].content.contains("const std::string& GetBase() const"));
    }
}
