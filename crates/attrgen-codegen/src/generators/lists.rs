//! List container headers.
//!
//! Each list type becomes a `std::vector` of its element storage type with
//! empty string conversion stubs. Types that need real serialization are
//! listed in `hand_written_lists` and skipped here.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use attrgen_core::{classify_element, TypeRef};

use super::templates::TemplateEngine;
use super::{FileGenerator, GeneratedFile};
use crate::error::Result;
use crate::model::CodegenModel;

const LIST_TEMPLATE: &str = r#"#ifndef {{guard file}}
#define {{guard file}}

{{#each includes}}
#include {{this}}
{{/each}}
#include <string>
#include <vector>

class {{class_name}} : public std::vector<{{element}}>
{
public:
    std::string GetValueAsString() const
    {
        return std::string();
    }

    bool SetValueAsString(const std::string& value)
    {
        (void)value;
        return true;
    }
};

#endif // {{guard file}}
"#;

#[derive(Debug, Clone, Serialize)]
struct ListData {
    file: String,
    class_name: String,
    element: String,
    includes: Vec<String>,
}

impl ListData {
    fn for_type(type_ref: &TypeRef) -> Self {
        let category = classify_element(type_ref);
        let element = category.storage_type(type_ref);
        let includes = if category.is_value_type() || element == "std::string" {
            Vec::new()
        } else {
            vec![format!("\"{}.h\"", element)]
        };

        Self {
            file: format!("{}.h", type_ref.value_type),
            class_name: type_ref.value_type.clone(),
            element,
            includes,
        }
    }
}

/// Emits one container header per list value type.
pub struct ListContainerGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> ListContainerGenerator<'a> {
    pub fn new() -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("list", LIST_TEMPLATE)?;
        Ok(Self { engine })
    }
}

impl FileGenerator for ListContainerGenerator<'_> {
    fn name(&self) -> &'static str {
        "list containers"
    }

    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>> {
        let mut lists: BTreeMap<String, ListData> = BTreeMap::new();

        for attr in model.interfaces.iter().flat_map(|iface| iface.attributes.iter()) {
            let type_ref = &attr.type_ref;
            if !type_ref.is_list() || lists.contains_key(&type_ref.value_type) {
                continue;
            }
            if model.overrides.is_hand_written_list(&type_ref.value_type) {
                debug!(list = %type_ref.value_type, "hand-written list, skipped");
                continue;
            }
            lists.insert(type_ref.value_type.clone(), ListData::for_type(type_ref));
        }

        lists
            .values()
            .map(|data| {
                let body = self.engine.render("list", data)?;
                Ok(GeneratedFile::new(data.file.clone(), &body))
            })
            .collect()
    }
}
