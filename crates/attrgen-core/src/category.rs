//! Marshalling categories.
//!
//! Every downstream generator selects its code template from the closed
//! [`Category`] set produced by [`classify`], so adding a value kind means
//! adding a variant and letting the compiler point at every match that
//! needs a new arm.

use crate::idl::TypeRef;

/// How an attribute value is converted to and from its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Enum,
    Integer,
    Boolean,
    Float,
    String,
    Length,
    ListOrRect,
    StyleDeclaration,
    /// Any value type with its own string (de)serialization contract.
    OpaqueSerializable,
}

impl Category {
    /// Small value types are copied; everything else is an object type.
    pub fn is_value_type(self) -> bool {
        matches!(
            self,
            Self::Enum | Self::Integer | Self::Boolean | Self::Float
        )
    }

    /// The C++ type holding one element of a value of this category.
    pub fn storage_type(self, type_ref: &TypeRef) -> String {
        match self {
            Self::Enum => "unsigned short".to_string(),
            Self::Integer => "long".to_string(),
            Self::Boolean => "bool".to_string(),
            Self::Float => "float".to_string(),
            Self::String => "std::string".to_string(),
            Self::Length | Self::StyleDeclaration | Self::OpaqueSerializable => {
                type_ref.base.clone()
            }
            Self::ListOrRect => type_ref.value_type.clone(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::String => "string",
            Self::Length => "length",
            Self::ListOrRect => "list-or-rect",
            Self::StyleDeclaration => "style-declaration",
            Self::OpaqueSerializable => "opaque",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a declared attribute type.
pub fn classify(type_ref: &TypeRef) -> Category {
    if type_ref.base == "CSSStyleDeclaration" {
        return Category::StyleDeclaration;
    }
    if type_ref.is_list() || type_ref.base.ends_with("Rect") {
        return Category::ListOrRect;
    }
    classify_scalar(&type_ref.base)
}

/// Classify a scalar (non-list) base type name.
fn classify_scalar(base: &str) -> Category {
    match base {
        "unsigned short" | "SVGEnumeration" => Category::Enum,
        "short" | "long" | "unsigned long" | "long long" | "unsigned long long"
        | "SVGInteger" => Category::Integer,
        "boolean" | "SVGBoolean" => Category::Boolean,
        "float" | "double" | "unrestricted float" | "unrestricted double" | "SVGNumber" => {
            Category::Float
        }
        "DOMString" | "SVGString" => Category::String,
        "SVGLength" => Category::Length,
        _ => Category::OpaqueSerializable,
    }
}

/// Classify the element type of a list, used to type the list container.
pub fn classify_element(type_ref: &TypeRef) -> Category {
    classify_scalar(&type_ref.base)
}
