//! CSS style-declaration header and property data tables.

mod infer;

pub use infer::{classify_terms, extract_terms, infer_properties, GrammarTerms};

use std::collections::{BTreeMap, BTreeSet};

use convert_case::{Case, Casing};
use tracing::info;

use attrgen_core::{CssPropertyDecl, CssValueKind};

use super::{constant_case, cpp_string, include_guard, FileGenerator, GeneratedFile};
use crate::error::Result;
use crate::model::CodegenModel;

pub const STYLE_DECLARATION_FILE: &str = "SVGCSSStyleDeclaration.h";
pub const PROPERTY_TABLE_FILE: &str = "SVGCSSPropertyTable.cpp";

/// The generated declaration class, matching the `CSSStyleDeclaration` IDL type.
const DECLARATION_CLASS: &str = "CSSStyleDeclaration";

const INDENT: &str = "    ";

fn property_id(name: &str) -> String {
    format!("SVG_CSS_PROPERTY_{}", constant_case(name))
}

fn value_id(keyword: &str) -> String {
    format!("SVG_CSS_VALUE_{}", constant_case(keyword))
}

fn method_suffix(name: &str) -> String {
    name.to_case(Case::Pascal)
}

fn keyword_table(name: &str) -> String {
    format!("k{}Keywords", method_suffix(name))
}

/// Keyword enumerators: sorted, one per distinct identifier.
fn value_ids(properties: &[CssPropertyDecl]) -> BTreeMap<String, String> {
    let mut ids = BTreeMap::new();
    for keyword in properties.iter().flat_map(|p| p.keywords.iter()) {
        ids.entry(value_id(keyword)).or_insert_with(|| keyword.clone());
    }
    ids
}

/// Emits `SVGCSSStyleDeclaration.h` and `SVGCSSPropertyTable.cpp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssPropertyTableGenerator;

impl CssPropertyTableGenerator {
    pub fn new() -> Self {
        Self
    }

    fn header(&self, properties: &[CssPropertyDecl]) -> String {
        let guard = include_guard(STYLE_DECLARATION_FILE);
        let mut lines = vec![
            format!("#ifndef {}", guard),
            format!("#define {}", guard),
            String::new(),
            "#include \"SVGAttributeMap.h\"".to_string(),
        ];

        let headers: BTreeSet<&str> = properties
            .iter()
            .map(|p| p.kind.storage_type())
            .filter(|ty| *ty != "std::string" && *ty != "SVGCSSValueID")
            .collect();
        for header in headers {
            lines.push(format!("#include \"{}.h\"", header));
        }
        lines.push(String::new());
        lines.push("#include <map>".to_string());
        lines.push("#include <memory>".to_string());
        lines.push("#include <string>".to_string());
        lines.push(String::new());

        lines.push("enum SVGCSSPropertyID".to_string());
        lines.push("{".to_string());
        lines.push(format!("{}SVG_CSS_PROPERTY_UNKNOWN = 0,", INDENT));
        for (index, property) in properties.iter().enumerate() {
            lines.push(format!("{}{} = {},", INDENT, property_id(&property.name), index + 1));
        }
        lines.push(format!("{}SVG_CSS_PROPERTY_COUNT = {}", INDENT, properties.len() + 1));
        lines.push("};".to_string());
        lines.push(String::new());

        let values = value_ids(properties);
        lines.push("enum SVGCSSValueID".to_string());
        lines.push("{".to_string());
        lines.push(format!("{}SVG_CSS_VALUE_UNKNOWN = 0,", INDENT));
        for (index, id) in values.keys().enumerate() {
            lines.push(format!("{}{} = {},", INDENT, id, index + 1));
        }
        lines.push(format!("{}SVG_CSS_VALUE_COUNT = {}", INDENT, values.len() + 1));
        lines.push("};".to_string());
        lines.push(String::new());

        lines.push("enum SVGCSSValueKind".to_string());
        lines.push("{".to_string());
        let kinds: Vec<String> = CssValueKind::ALL
            .iter()
            .map(|kind| format!("{}{}", INDENT, kind.table_name()))
            .collect();
        lines.push(kinds.join(",\n"));
        lines.push("};".to_string());
        lines.push(String::new());

        lines.extend(
            [
                "SVGCSSPropertyID GetSVGCSSPropertyID(const std::string& name);",
                "const char* GetSVGCSSPropertyName(SVGCSSPropertyID property);",
                "SVGCSSValueKind GetSVGCSSValueKind(SVGCSSPropertyID property);",
                "const char* GetSVGCSSDefaultValue(SVGCSSPropertyID property);",
                "const SVGCSSValueID* GetSVGCSSKeywords(SVGCSSPropertyID property);",
                "SVGCSSValueID GetSVGCSSValueID(const std::string& keyword);",
                "const char* GetSVGCSSValueName(SVGCSSValueID value);",
                "",
                "// Specialised by hand for every storage type.",
                "template <typename T>",
                "bool ParseSVGCSSValue(const std::string& text, T& value);",
                "",
                "template <typename T>",
                "std::string SerializeSVGCSSValue(const T& value);",
                "",
                "class SVGCSSBoxedValue",
                "{",
                "public:",
                "    virtual ~SVGCSSBoxedValue() {}",
                "    virtual std::string GetValueAsString() const = 0;",
                "};",
                "",
                "template <typename T>",
                "class SVGCSSTypedValue : public SVGCSSBoxedValue",
                "{",
                "public:",
                "    SVGCSSTypedValue(const T& value, const std::string& text)",
                "        : m_value(value)",
                "        , m_text(text)",
                "    {",
                "    }",
                "",
                "    const T& GetValue() const { return m_value; }",
                "    std::string GetValueAsString() const { return m_text; }",
                "",
                "private:",
                "    T m_value;",
                "    std::string m_text;",
                "};",
                "",
            ]
            .into_iter()
            .map(str::to_string),
        );

        lines.push(format!("class {}", DECLARATION_CLASS));
        lines.push("{".to_string());
        lines.push("public:".to_string());
        for property in properties {
            let id = property_id(&property.name);
            let suffix = method_suffix(&property.name);
            let storage = property.kind.storage_type();
            lines.push(format!(
                "{}const {}* Get{}() const {{ return GetTyped<{}>({}); }}",
                INDENT, storage, suffix, storage, id
            ));
            lines.push(format!(
                "{}bool Has{}() const {{ return m_values.count({}) != 0; }}",
                INDENT, suffix, id
            ));
            lines.push(format!(
                "{}void Set{}(const {}& value) {{ SetTyped({}, value, SerializeSVGCSSValue(value)); }}",
                INDENT, suffix, storage, id
            ));
            lines.push(String::new());
        }
        lines.extend(
            [
                "    std::string GetAttribute(const std::string& name) const;",
                "    bool SetAttribute(const std::string& name, const std::string& value);",
                "    bool HasAttribute(const std::string& name) const;",
                "    void GetAllAttributes(AttributeMap& attributes) const;",
                "",
                "private:",
                "    template <typename T>",
                "    const T* GetTyped(SVGCSSPropertyID property) const",
                "    {",
                "        ValueMap::const_iterator it = m_values.find(property);",
                "        if (it == m_values.end())",
                "            return nullptr;",
                "        return &static_cast<const SVGCSSTypedValue<T>*>(it->second.get())->GetValue();",
                "    }",
                "",
                "    template <typename T>",
                "    void SetTyped(SVGCSSPropertyID property, const T& value, const std::string& text)",
                "    {",
                "        m_values[property].reset(new SVGCSSTypedValue<T>(value, text));",
                "    }",
                "",
                "    template <typename T>",
                "    bool SetParsed(SVGCSSPropertyID property, const std::string& text)",
                "    {",
                "        T value;",
                "        if (!ParseSVGCSSValue(text, value))",
                "            return false;",
                "        SetTyped(property, value, text);",
                "        return true;",
                "    }",
                "",
                "    typedef std::map<SVGCSSPropertyID, std::unique_ptr<SVGCSSBoxedValue> > ValueMap;",
                "    ValueMap m_values;",
                "};",
                "",
            ]
            .into_iter()
            .map(str::to_string),
        );
        lines.push(format!("#endif // {}", guard));
        lines.push(String::new());
        lines.join("\n")
    }

    fn table(&self, properties: &[CssPropertyDecl]) -> String {
        let values = value_ids(properties);
        let mut lines = vec![
            format!("#include \"{}\"", STYLE_DECLARATION_FILE),
            String::new(),
            "namespace {".to_string(),
            String::new(),
            "struct SVGCSSPropertyInfo".to_string(),
            "{".to_string(),
            format!("{}const char* name;", INDENT),
            format!("{}SVGCSSValueKind kind;", INDENT),
            format!("{}const char* defaultValue;", INDENT),
            format!("{}// Terminated by SVG_CSS_VALUE_UNKNOWN.", INDENT),
            format!("{}const SVGCSSValueID* keywords;", INDENT),
            "};".to_string(),
            String::new(),
            "const SVGCSSValueID kNoKeywords[] = { SVG_CSS_VALUE_UNKNOWN };".to_string(),
        ];

        for property in properties.iter().filter(|p| !p.keywords.is_empty()) {
            let mut ids: Vec<String> = property.keywords.iter().map(|k| value_id(k)).collect();
            ids.push("SVG_CSS_VALUE_UNKNOWN".to_string());
            lines.push(format!(
                "const SVGCSSValueID {}[] = {{ {} }};",
                keyword_table(&property.name),
                ids.join(", ")
            ));
        }
        lines.push(String::new());

        lines.push("const SVGCSSPropertyInfo kProperties[SVG_CSS_PROPERTY_COUNT] = {".to_string());
        lines.push(format!("{}{{ \"\", CSS_KIND_GENERIC, \"\", kNoKeywords }},", INDENT));
        for property in properties {
            let keywords = if property.keywords.is_empty() {
                "kNoKeywords".to_string()
            } else {
                keyword_table(&property.name)
            };
            lines.push(format!(
                "{}{{ {}, {}, {}, {} }},",
                INDENT,
                cpp_string(&property.name),
                property.kind.table_name(),
                cpp_string(&property.default),
                keywords
            ));
        }
        lines.push("};".to_string());
        lines.push(String::new());

        lines.push("const char* const kValueNames[SVG_CSS_VALUE_COUNT] = {".to_string());
        lines.push(format!("{}\"\",", INDENT));
        for keyword in values.values() {
            lines.push(format!("{}{},", INDENT, cpp_string(keyword)));
        }
        lines.push("};".to_string());
        lines.push(String::new());
        lines.push("} // namespace".to_string());
        lines.push(String::new());

        lines.extend(
            [
                "SVGCSSPropertyID GetSVGCSSPropertyID(const std::string& name)",
                "{",
                "    for (int i = 1; i < SVG_CSS_PROPERTY_COUNT; ++i) {",
                "        if (name == kProperties[i].name)",
                "            return static_cast<SVGCSSPropertyID>(i);",
                "    }",
                "    return SVG_CSS_PROPERTY_UNKNOWN;",
                "}",
                "",
                "const char* GetSVGCSSPropertyName(SVGCSSPropertyID property)",
                "{",
                "    return kProperties[property].name;",
                "}",
                "",
                "SVGCSSValueKind GetSVGCSSValueKind(SVGCSSPropertyID property)",
                "{",
                "    return kProperties[property].kind;",
                "}",
                "",
                "const char* GetSVGCSSDefaultValue(SVGCSSPropertyID property)",
                "{",
                "    return kProperties[property].defaultValue;",
                "}",
                "",
                "const SVGCSSValueID* GetSVGCSSKeywords(SVGCSSPropertyID property)",
                "{",
                "    return kProperties[property].keywords;",
                "}",
                "",
                "SVGCSSValueID GetSVGCSSValueID(const std::string& keyword)",
                "{",
                "    for (int i = 1; i < SVG_CSS_VALUE_COUNT; ++i) {",
                "        if (keyword == kValueNames[i])",
                "            return static_cast<SVGCSSValueID>(i);",
                "    }",
                "    return SVG_CSS_VALUE_UNKNOWN;",
                "}",
                "",
                "const char* GetSVGCSSValueName(SVGCSSValueID value)",
                "{",
                "    return kValueNames[value];",
                "}",
                "",
            ]
            .into_iter()
            .map(str::to_string),
        );

        let class = DECLARATION_CLASS;
        lines.push(format!(
            "std::string {}::GetAttribute(const std::string& name) const",
            class
        ));
        lines.push("{".to_string());
        lines.push(format!(
            "{}ValueMap::const_iterator it = m_values.find(GetSVGCSSPropertyID(name));",
            INDENT
        ));
        lines.push(format!("{}if (it == m_values.end())", INDENT));
        lines.push(format!("{0}{0}return std::string();", INDENT));
        lines.push(format!("{}return it->second->GetValueAsString();", INDENT));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!(
            "bool {}::SetAttribute(const std::string& name, const std::string& value)",
            class
        ));
        lines.push("{".to_string());
        lines.push(format!("{}SVGCSSPropertyID property = GetSVGCSSPropertyID(name);", INDENT));
        lines.push(format!("{}switch (property) {{", INDENT));
        for property in properties {
            lines.push(format!("{}case {}:", INDENT, property_id(&property.name)));
            lines.push(format!(
                "{0}{0}return SetParsed<{1}>(property, value);",
                INDENT,
                property.kind.storage_type()
            ));
        }
        lines.push(format!("{}default:", INDENT));
        lines.push(format!("{0}{0}return false;", INDENT));
        lines.push(format!("{}}}", INDENT));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!(
            "bool {}::HasAttribute(const std::string& name) const",
            class
        ));
        lines.push("{".to_string());
        lines.push(format!(
            "{}return GetSVGCSSPropertyID(name) != SVG_CSS_PROPERTY_UNKNOWN;",
            INDENT
        ));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!(
            "void {}::GetAllAttributes(AttributeMap& attributes) const",
            class
        ));
        lines.push("{".to_string());
        lines.push(format!(
            "{}for (ValueMap::const_iterator it = m_values.begin(); it != m_values.end(); ++it) {{",
            INDENT
        ));
        lines.push(format!(
            "{0}{0}attributes.insert(AttributeMap::value_type(GetSVGCSSPropertyName(it->first), it->second->GetValueAsString()));",
            INDENT
        ));
        lines.push(format!("{}}}", INDENT));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

impl FileGenerator for CssPropertyTableGenerator {
    fn name(&self) -> &'static str {
        "css property table"
    }

    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>> {
        let properties = &model.css_properties;
        info!(
            properties = properties.len(),
            values = value_ids(properties).len(),
            "generated css property table"
        );

        Ok(vec![
            GeneratedFile::new(STYLE_DECLARATION_FILE, &self.header(properties)),
            GeneratedFile::new(PROPERTY_TABLE_FILE, &self.table(properties)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::model_from_parts;

    const CSS: &str = "\
'fill'\t<paint> | inherit\tblack
stroke-linecap\tbutt | round | square | inherit\tbutt
stroke-width\t<length> | inherit\t1
fill-rule\tnonzero | evenodd | inherit\tnonzero
";

    fn generate() -> Vec<GeneratedFile> {
        let model = model_from_parts("interface SVGGElement {};", "<!ELEMENT g EMPTY>", CSS);
        CssPropertyTableGenerator::new().generate(&model).unwrap()
    }

    #[test]
    fn test_header_enums() {
        let files = generate();
        assert_eq!(files[0].path, STYLE_DECLARATION_FILE);
        let header = &files[0].content;

        assert!(header.contains("    SVG_CSS_PROPERTY_FILL = 1,"));
        assert!(header.contains("    SVG_CSS_PROPERTY_FILL_RULE = 4,"));
        assert!(header.contains("    SVG_CSS_PROPERTY_COUNT = 5"));

        // Sorted and deduplicated across properties.
        assert!(header.contains("    SVG_CSS_VALUE_BUTT = 1,"));
        assert!(header.contains("    SVG_CSS_VALUE_EVENODD = 2,"));
        assert!(header.contains("    SVG_CSS_VALUE_INHERIT = 3,"));
        assert!(header.contains("    SVG_CSS_VALUE_COUNT = 7"));
    }

    #[test]
    fn test_typed_accessors() {
        let header = &generate()[0].content;
        assert!(header.contains(
            "const SVGPaint* GetFill() const { return GetTyped<SVGPaint>(SVG_CSS_PROPERTY_FILL); }"
        ));
        assert!(header.contains("bool HasStrokeWidth() const"));
        assert!(header.contains("void SetStrokeLinecap(const SVGCSSValueID& value)"));
        assert!(header.contains("#include \"CSSNumericValue.h\""));
        assert!(header.contains("#include \"SVGPaint.h\""));
        assert!(!header.contains("#include \"SVGColor.h\""));
    }

    #[test]
    fn test_property_table() {
        let table = &generate()[1].content;
        assert!(table.contains("{ \"fill\", CSS_KIND_PAINT, \"black\", kFillKeywords },"));
        assert!(table.contains(
            "const SVGCSSValueID kStrokeLinecapKeywords[] = { SVG_CSS_VALUE_BUTT, SVG_CSS_VALUE_ROUND, SVG_CSS_VALUE_SQUARE, SVG_CSS_VALUE_INHERIT, SVG_CSS_VALUE_UNKNOWN };"
        ));
        assert!(table.contains("{ \"stroke-width\", CSS_KIND_NUMERIC, \"1\", kStrokeWidthKeywords },"));
        assert!(table.contains("        return SetParsed<SVGCSSValueID>(property, value);"));
    }
}
