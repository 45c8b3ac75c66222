//! The reconciled model every generator reads from.

use attrgen_core::{CssPropertyDecl, DtdDocument, InterfaceTable};
use attrgen_resolver::Reconciliation;

use crate::config::Overrides;

/// Parsed and reconciled inputs of one run.
#[derive(Debug, Clone)]
pub struct CodegenModel {
    pub interfaces: InterfaceTable,
    pub dtd: DtdDocument,
    pub reconciliation: Reconciliation,
    /// CSS properties after value-grammar inference, in table order.
    pub css_properties: Vec<CssPropertyDecl>,
    pub overrides: Overrides,
}
