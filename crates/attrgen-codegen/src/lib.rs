//! C++ accessor generation for attrgen.
//!
//! This crate turns reconciled grammars into C++ sources:
//! - Get/Set/Has/GetAll accessor files, one per accessor kind
//! - Animated-value wrappers and list containers
//! - The CSS style declaration and its property tables
//! - The element-kind enumeration and element factory
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//!
//! let report = attrgen_codegen::run(Path::new("grammars"), Path::new("generated"))?;
//! println!("{} files written", report.written.len());
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod generators;
pub mod model;
pub mod pipeline;

pub use config::Overrides;
pub use emitter::{backup_path, EmitReport, OutputEmitter};
pub use error::{AttrgenError, CodegenError, Result};
pub use generators::{
    AccessorGenerator, AccessorKind, AnimatedWrapperGenerator, CssPropertyTableGenerator,
    ElementFactoryGenerator, EnumerationGenerator, FileGenerator, GeneratedFile,
    GeneratedProject, ListContainerGenerator, TemplateEngine,
};
pub use generators::accessor::{AccessorPlan, AttributeInstance};
pub use model::CodegenModel;
pub use pipeline::{build_model, generate, generate_project, run, Inputs};

#[cfg(test)]
pub(crate) mod test_support {
    use attrgen_core::{DtdDocument, InterfaceTable};
    use attrgen_parser::{parse_css_table, parse_dtd, parse_interfaces};
    use attrgen_resolver::reconcile;

    use crate::config::Overrides;
    use crate::generators::css::infer_properties;
    use crate::model::CodegenModel;

    /// A model over `table` alone: no DTD, nothing reconciled.
    pub fn model_with(table: InterfaceTable) -> CodegenModel {
        let overrides = Overrides::default();
        let dtd = DtdDocument::new();
        let reconciliation = reconcile(&table, &dtd, &overrides.reconcile_options()).unwrap();
        CodegenModel {
            interfaces: table,
            dtd,
            reconciliation,
            css_properties: Vec::new(),
            overrides,
        }
    }

    pub fn model_from_sources(idl: &str, dtd: &str) -> CodegenModel {
        model_from_parts(idl, dtd, "")
    }

    pub fn model_from_parts(idl: &str, dtd: &str, css: &str) -> CodegenModel {
        model_with_overrides(idl, dtd, css, Overrides::default())
    }

    pub fn model_with_overrides(
        idl: &str,
        dtd: &str,
        css: &str,
        overrides: Overrides,
    ) -> CodegenModel {
        let interfaces = parse_interfaces(idl).unwrap();
        let dtd = parse_dtd(dtd).unwrap();
        let reconciliation = reconcile(&interfaces, &dtd, &overrides.reconcile_options()).unwrap();
        let css_properties =
            infer_properties(&parse_css_table(css), &overrides.css_default_patches);
        CodegenModel {
            interfaces,
            dtd,
            reconciliation,
            css_properties,
            overrides,
        }
    }
}
