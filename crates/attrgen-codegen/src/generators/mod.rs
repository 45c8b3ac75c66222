//! Generators for every emitted C++ file.

pub mod accessor;
mod animated;
pub mod css;
mod elements;
mod enums;
mod lists;
mod templates;

pub use accessor::{AccessorGenerator, AccessorKind};
pub use animated::AnimatedWrapperGenerator;
pub use css::CssPropertyTableGenerator;
pub use elements::ElementFactoryGenerator;
pub use enums::{bind_enum, EnumBinding, EnumCase, EnumerationGenerator};
pub use lists::ListContainerGenerator;
pub use templates::TemplateEngine;

use crate::error::Result;
use crate::model::CodegenModel;

/// Common trait for file generators.
pub trait FileGenerator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Generate every file this generator owns.
    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>>;
}

/// Generated project output.
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    /// Generated files, in generation order.
    pub files: Vec<GeneratedFile>,
}

impl GeneratedProject {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File path relative to the output directory.
    pub path: String,
    /// File content, banner included.
    pub content: String,
}

impl GeneratedFile {
    /// Wrap `body` with the generated-file banner.
    pub fn new(path: impl Into<String>, body: &str) -> Self {
        Self {
            path: path.into(),
            content: format!("{}{}", banner(), body),
        }
    }
}

/// The banner at the top of every generated file.
pub fn banner() -> &'static str {
    "// This file is generated by attrgen. DO NOT EDIT.\n\
     // Changes are overwritten on the next run; edit the input grammars instead.\n\n"
}

/// `#ifndef` guard name for a header file name: `SVGAnimatedLength.h` -> `SVG_ANIMATED_LENGTH_H`.
pub(crate) fn include_guard(file_name: &str) -> String {
    use convert_case::{Case, Casing};

    let stem = file_name.trim_end_matches(".h");
    format!("{}_H", stem.to_case(Case::UpperSnake))
}

/// Escape text for a C++ string literal.
pub(crate) fn cpp_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Upper-case identifier form of a free-form name: `stroke-linecap` -> `STROKE_LINECAP`.
pub(crate) fn constant_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_underscore = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
            last_underscore = false;
        } else if !last_underscore {
            out.push('_');
            last_underscore = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    out
}
