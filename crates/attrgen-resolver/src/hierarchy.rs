//! Inheritance graph queries.
//!
//! Base lists are walked in declaration order everywhere; that order is the
//! tie-break for multiple inheritance.

use std::collections::HashSet;

use tracing::debug;

use attrgen_core::{InterfaceDecl, InterfaceId, InterfaceTable, ReconcileError};

/// Bases of `decl` that exist in the table, in declaration order.
///
/// Bases from other grammar modules are not in the table and are skipped.
pub fn known_bases(table: &InterfaceTable, decl: &InterfaceDecl) -> Vec<InterfaceId> {
    decl.inherits
        .iter()
        .filter_map(|base| {
            let id = table.id_of(base);
            if id.is_none() {
                debug!(interface = %decl.name, base = %base, "base not declared, skipped");
            }
            id
        })
        .collect()
}

/// `id` followed by all of its ancestors, depth-first in declaration order.
///
/// An interface reachable along two paths appears once, at its first
/// position.
pub fn search_order(table: &InterfaceTable, id: InterfaceId) -> Vec<InterfaceId> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    visit(table, id, &mut order, &mut seen);
    order
}

fn visit(
    table: &InterfaceTable,
    id: InterfaceId,
    order: &mut Vec<InterfaceId>,
    seen: &mut HashSet<InterfaceId>,
) {
    if !seen.insert(id) {
        return;
    }
    order.push(id);

    if let Some(decl) = table.by_id(id) {
        for base in known_bases(table, decl) {
            visit(table, base, order, seen);
        }
    }
}

/// Fail if any interface inherits from itself, directly or not.
pub fn check_acyclic(table: &InterfaceTable) -> Result<(), ReconcileError> {
    let mut finished = HashSet::new();

    for id in table.ids() {
        let mut stack = Vec::new();
        walk(table, id, &mut stack, &mut finished)?;
    }

    Ok(())
}

fn walk(
    table: &InterfaceTable,
    id: InterfaceId,
    stack: &mut Vec<InterfaceId>,
    finished: &mut HashSet<InterfaceId>,
) -> Result<(), ReconcileError> {
    if finished.contains(&id) {
        return Ok(());
    }

    if let Some(pos) = stack.iter().position(|&on_stack| on_stack == id) {
        let mut cycle: Vec<String> = stack[pos..]
            .iter()
            .filter_map(|&i| table.by_id(i).map(|d| d.name.clone()))
            .collect();
        if let Some(decl) = table.by_id(id) {
            cycle.push(decl.name.clone());
        }
        return Err(ReconcileError::InheritanceCycle { cycle });
    }

    stack.push(id);
    if let Some(decl) = table.by_id(id) {
        for base in known_bases(table, decl) {
            walk(table, base, stack, finished)?;
        }
    }
    stack.pop();
    finished.insert(id);

    Ok(())
}
