//! One generation pass per accessor kind.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, info};

use attrgen_core::InterfaceId;

use super::fragments;
use super::plan::{AccessorPlan, InterfacePlan};

/// The four generated accessor functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessorKind {
    Get,
    Set,
    Has,
    GetAll,
}

impl AccessorKind {
    pub const ALL: [AccessorKind; 4] = [Self::Get, Self::Set, Self::Has, Self::GetAll];

    /// The combined implementation file for this kind.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Get => "SVGGetAttribute.cpp",
            Self::Set => "SVGSetAttribute.cpp",
            Self::Has => "SVGHasAttribute.cpp",
            Self::GetAll => "SVGGetAllAttributes.cpp",
        }
    }
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Set => write!(f, "set"),
            Self::Has => write!(f, "has"),
            Self::GetAll => write!(f, "get-all"),
        }
    }
}

/// Coverage per `(interface, kind)`, owned by one pass.
pub type GenerationMemo = HashMap<(InterfaceId, AccessorKind), usize>;

/// What one pass produced.
#[derive(Debug, Clone)]
pub struct PassOutput {
    pub kind: AccessorKind,
    /// Interfaces with generated code, in declaration order.
    pub emitted: Vec<InterfaceId>,
    /// Coverage of every interface, in declaration order.
    pub coverage: IndexMap<InterfaceId, usize>,
    /// File body without the banner.
    pub body: String,
}

/// Walks the inheritance graph for one accessor kind.
pub struct AccessorPass<'p> {
    kind: AccessorKind,
    plan: &'p AccessorPlan,
    memo: GenerationMemo,
    in_progress: HashSet<InterfaceId>,
}

impl<'p> AccessorPass<'p> {
    pub fn new(kind: AccessorKind, plan: &'p AccessorPlan) -> Self {
        Self {
            kind,
            plan,
            memo: GenerationMemo::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Attributes handled by the interface's function, own plus inherited.
    ///
    /// An ancestor reachable along two paths is counted once per path.
    pub fn coverage(&mut self, id: InterfaceId) -> usize {
        if let Some(&count) = self.memo.get(&(id, self.kind)) {
            return count;
        }
        // Cycles are rejected during reconciliation; this only stops recursion.
        if !self.in_progress.insert(id) {
            return 0;
        }

        let plan = self.plan;
        let count = match plan.get(id) {
            Some(iface) => {
                let inherited: usize = iface.bases.iter().map(|&base| self.coverage(base)).sum();
                iface.entries.len() + inherited
            }
            None => 0,
        };

        self.in_progress.remove(&id);
        self.memo.insert((id, self.kind), count);
        count
    }

    /// Whether an interface gets a generated function.
    fn is_emitted(&mut self, iface: &InterfacePlan) -> bool {
        self.coverage(iface.id) > 0 || iface.custom
    }

    /// Bases an interface delegates to, in declaration order.
    fn delegates(&mut self, iface: &InterfacePlan) -> Vec<&'p str> {
        let plan = self.plan;
        iface
            .bases
            .iter()
            .filter_map(|&base| plan.get(base))
            .filter(|base| self.is_emitted(base))
            .map(|base| base.name.as_str())
            .collect()
    }

    /// Generate the combined file body for this kind.
    pub fn run(mut self) -> PassOutput {
        let plan = self.plan;
        let mut emitted = Vec::new();
        let mut functions = Vec::new();

        for iface in plan.iter() {
            if !self.is_emitted(iface) {
                debug!(kind = %self.kind, interface = %iface.name, "no coverage, omitted");
                continue;
            }
            let delegates = self.delegates(iface);
            functions.push(fragments::function(self.kind, iface, &delegates));
            emitted.push(iface.id);
        }

        let includes: Vec<&str> = emitted
            .iter()
            .filter_map(|&id| plan.get(id))
            .map(|iface| iface.name.as_str())
            .collect();
        let body = fragments::file(self.kind, &includes, &functions);

        let coverage: IndexMap<InterfaceId, usize> =
            plan.ids().map(|id| (id, self.coverage(id))).collect();

        info!(
            kind = %self.kind,
            interfaces = emitted.len(),
            "generated accessor pass"
        );

        PassOutput {
            kind: self.kind,
            emitted,
            coverage,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::model_from_sources;

    const IDL: &str = r#"
interface SVGElement { attribute DOMString id; };
interface SVGTests { readonly attribute SVGStringList requiredFeatures; };
interface SVGLocatable { readonly attribute SVGElement nearestViewportElement; };
interface SVGRectElement : SVGElement, SVGTests, SVGLocatable {
  readonly attribute SVGAnimatedLength x;
  readonly attribute SVGAnimatedLength width;
};
interface SVGCircleElement : SVGElement {
  readonly attribute SVGAnimatedLength r;
};
"#;

    const DTD: &str = r#"
<!ENTITY % stdAttrs "id ID #IMPLIED">
<!ELEMENT rect EMPTY>
<!ATTLIST rect %stdAttrs; requiredFeatures CDATA #IMPLIED x CDATA "0" width CDATA #REQUIRED>
<!ELEMENT circle EMPTY>
<!ATTLIST circle %stdAttrs; r CDATA #REQUIRED>
"#;

    #[test]
    fn test_coverage_equal_across_kinds() {
        let model = model_from_sources(IDL, DTD);
        let plan = AccessorPlan::build(&model).unwrap();

        let outputs: Vec<PassOutput> = AccessorKind::ALL
            .iter()
            .map(|&kind| AccessorPass::new(kind, &plan).run())
            .collect();

        for output in &outputs[1..] {
            assert_eq!(output.coverage, outputs[0].coverage);
            assert_eq!(output.emitted, outputs[0].emitted);
        }

        let rect = plan.id_of("SVGRectElement").unwrap();
        assert_eq!(outputs[0].coverage[&rect], 4);
        let locatable = plan.id_of("SVGLocatable").unwrap();
        assert_eq!(outputs[0].coverage[&locatable], 0);
    }

    #[test]
    fn test_zero_coverage_omitted_from_includes() {
        let model = model_from_sources(IDL, DTD);
        let plan = AccessorPlan::build(&model).unwrap();
        let output = AccessorPass::new(AccessorKind::Get, &plan).run();

        assert!(output.body.contains("#include \"SVGRectElement.h\""));
        assert!(!output.body.contains("SVGLocatable"));
        assert!(output.body.contains("if (SVGTests::HasAttribute(name))"));
    }

    #[test]
    fn test_memo_is_per_pass() {
        let model = model_from_sources(IDL, DTD);
        let plan = AccessorPlan::build(&model).unwrap();
        let circle = plan.id_of("SVGCircleElement").unwrap();

        let mut pass = AccessorPass::new(AccessorKind::Has, &plan);
        assert_eq!(pass.coverage(circle), 2);
        assert_eq!(pass.memo.len(), 2);
        assert!(pass.memo.keys().all(|(_, kind)| *kind == AccessorKind::Has));
    }
}
