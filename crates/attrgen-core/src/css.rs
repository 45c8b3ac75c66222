//! CSS property table model.

use std::collections::BTreeSet;

/// One raw row of the CSS property table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssPropertyRow {
    pub name: String,
    /// Value grammar text, e.g. `butt | round | square | inherit`.
    pub values: String,
    /// Initial value text as written in the table.
    pub initial: String,
    /// 1-based line in the table source.
    pub line: usize,
}

/// Storage category inferred for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CssValueKind {
    Paint,
    Color,
    DashArray,
    Numeric,
    FamilyName,
    Generic,
    Identifier,
}

impl CssValueKind {
    /// The C++ type used to store a value of this kind.
    pub fn storage_type(self) -> &'static str {
        match self {
            Self::Paint => "SVGPaint",
            Self::Color => "SVGColor",
            Self::DashArray => "SVGLengthList",
            Self::Numeric => "CSSNumericValue",
            Self::FamilyName => "std::string",
            Self::Generic => "CSSValue",
            Self::Identifier => "SVGCSSValueID",
        }
    }

    /// The enumerator naming this kind in the generated data table.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Paint => "CSS_KIND_PAINT",
            Self::Color => "CSS_KIND_COLOR",
            Self::DashArray => "CSS_KIND_DASHARRAY",
            Self::Numeric => "CSS_KIND_NUMERIC",
            Self::FamilyName => "CSS_KIND_FAMILY_NAME",
            Self::Generic => "CSS_KIND_GENERIC",
            Self::Identifier => "CSS_KIND_IDENTIFIER",
        }
    }

    pub const ALL: [CssValueKind; 7] = [
        Self::Paint,
        Self::Color,
        Self::DashArray,
        Self::Numeric,
        Self::FamilyName,
        Self::Generic,
        Self::Identifier,
    ];
}

/// A property after value-grammar inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssPropertyDecl {
    pub name: String,
    pub kind: CssValueKind,
    pub default: String,
    /// Literal keyword alternatives, deduplicated, in grammar order.
    pub keywords: Vec<String>,
    /// Abstract value types (`<color>`, `<length>`, ...) seen in the grammar.
    /// Only inference reads these.
    pub referenced_types: BTreeSet<String>,
}
