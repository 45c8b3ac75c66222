//! Get/Set/Has/GetAll accessor generation.
//!
//! [`AccessorPlan`] records which attributes each interface marshals.
//! One [`AccessorPass`] per [`AccessorKind`] walks the inheritance graph
//! over that plan and renders one combined C++ file.

mod eval;
mod fragments;
mod pass;
mod plan;

pub use eval::{format_g, AttributeInstance};
pub use pass::{AccessorKind, AccessorPass, GenerationMemo, PassOutput};
pub use plan::{AccessorEntry, AccessorPlan, InterfacePlan};

use super::{FileGenerator, GeneratedFile};
use crate::error::Result;
use crate::model::CodegenModel;

/// Emits the four accessor implementation files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessorGenerator;

impl AccessorGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Run every pass over one plan.
    pub fn passes(plan: &AccessorPlan) -> Vec<PassOutput> {
        AccessorKind::ALL
            .iter()
            .map(|&kind| AccessorPass::new(kind, plan).run())
            .collect()
    }
}

impl FileGenerator for AccessorGenerator {
    fn name(&self) -> &'static str {
        "accessors"
    }

    fn generate(&self, model: &CodegenModel) -> Result<Vec<GeneratedFile>> {
        let plan = AccessorPlan::build(model)?;

        Ok(Self::passes(&plan)
            .into_iter()
            .map(|output| GeneratedFile::new(output.kind.file_name(), &output.body))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::model_from_sources;

    #[test]
    fn test_four_files_in_kind_order() {
        let model = model_from_sources(
            "interface SVGRectElement { readonly attribute SVGAnimatedLength x; };",
            "<!ELEMENT rect EMPTY>\n<!ATTLIST rect x CDATA \"0\">",
        );
        let files = AccessorGenerator::new().generate(&model).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "SVGGetAttribute.cpp",
                "SVGSetAttribute.cpp",
                "SVGHasAttribute.cpp",
                "SVGGetAllAttributes.cpp"
            ]
        );
        assert!(files[0].content.contains("#include \"SVGRectElement.h\""));
        assert!(files[0].content.contains("std::string FormatFloat(float value)"));
        assert!(files[1].content.contains("#include <cstdlib>"));
    }
}
