//! Attribute name reconciliation.
//!
//! Each DTD attribute is matched against the interface its element maps to,
//! then that interface's ancestors depth-first in declaration order. The
//! first interface declaring a case-insensitively equal attribute wins.

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use tracing::debug;

use attrgen_core::{AttributeDecl, DtdAttributeDecl, InterfaceId, InterfaceTable};

use crate::elements::ElementNameMapping;
use crate::hierarchy::search_order;

/// An attribute of a specific interface, by declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeKey {
    pub interface: InterfaceId,
    pub index: usize,
}

/// A reconciled interface attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedAttribute {
    pub key: AttributeKey,
    /// The DTD spelling used as the marshalled name.
    pub dtd_name: String,
    /// Keyword alternatives of the first matching DTD declaration.
    pub choices: Vec<String>,
    /// DTD default of the first matching declaration.
    pub default: Option<String>,
}

/// A DTD attribute without an interface counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedAttribute {
    pub element: String,
    pub name: String,
}

/// Bidirectional index between DTD attribute names and interface attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeNameMapping {
    forward: IndexMap<AttributeKey, MappedAttribute>,
    reverse: IndexMap<String, Vec<AttributeKey>>,
    unmapped: Vec<UnmappedAttribute>,
}

impl AttributeNameMapping {
    /// Reconcile every DTD attribute of every mapped element.
    pub fn build<'a>(
        attributes: impl IntoIterator<Item = &'a DtdAttributeDecl>,
        table: &InterfaceTable,
        elements: &ElementNameMapping,
        aliases: &IndexMap<String, String>,
    ) -> Self {
        let mut mapping = Self::default();

        for decl in attributes {
            let Some(owner) = elements.get(&decl.element) else {
                mapping.record_unmapped(decl);
                continue;
            };

            match find_attribute(table, owner, &decl.name, aliases) {
                Some((key, attr)) => {
                    debug!(
                        element = %decl.element,
                        attribute = %decl.name,
                        target = %attr.name,
                        "attribute mapped"
                    );
                    mapping.insert(key, decl);
                }
                None => mapping.record_unmapped(decl),
            }
        }

        mapping
    }

    fn insert(&mut self, key: AttributeKey, decl: &DtdAttributeDecl) {
        self.forward.entry(key).or_insert_with(|| MappedAttribute {
            key,
            dtd_name: decl.name.clone(),
            choices: decl.allowed.choices().to_vec(),
            default: decl.default.clone(),
        });

        let keys = self.reverse.entry(decl.name.clone()).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    fn record_unmapped(&mut self, decl: &DtdAttributeDecl) {
        debug!(element = %decl.element, attribute = %decl.name, "attribute has no interface counterpart");
        self.unmapped.push(UnmappedAttribute {
            element: decl.element.clone(),
            name: decl.name.clone(),
        });
    }

    /// The reconciled entry for an interface attribute.
    pub fn get(&self, key: AttributeKey) -> Option<&MappedAttribute> {
        self.forward.get(&key)
    }

    /// The marshalled name of an interface attribute.
    pub fn name_of(&self, key: AttributeKey) -> Option<&str> {
        self.forward.get(&key).map(|m| m.dtd_name.as_str())
    }

    /// Every interface attribute a DTD name was reconciled to.
    pub fn targets_of(&self, dtd_name: &str) -> &[AttributeKey] {
        self.reverse.get(dtd_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unmapped(&self) -> &[UnmappedAttribute] {
        &self.unmapped
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappedAttribute> {
        self.forward.values()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Names to look for, in order: the configured alias, the camelCase form,
/// then the local part of a namespaced name.
pub fn candidate_names(dtd_name: &str, aliases: &IndexMap<String, String>) -> Vec<String> {
    let mut candidates = Vec::with_capacity(3);

    if let Some(alias) = aliases.get(dtd_name) {
        candidates.push(alias.clone());
    }

    candidates.push(dtd_name.replace(':', "-").to_case(Case::Camel));

    if let Some((_, local)) = dtd_name.split_once(':') {
        let local = local.to_case(Case::Camel);
        if !candidates.contains(&local) {
            candidates.push(local);
        }
    }

    candidates
}

/// Search `owner` and its ancestors for the attribute a DTD name refers to.
fn find_attribute<'t>(
    table: &'t InterfaceTable,
    owner: InterfaceId,
    dtd_name: &str,
    aliases: &IndexMap<String, String>,
) -> Option<(AttributeKey, &'t AttributeDecl)> {
    let order = search_order(table, owner);

    for candidate in candidate_names(dtd_name, aliases) {
        for &id in &order {
            let Some(decl) = table.by_id(id) else { continue };
            let found = decl
                .attributes
                .iter()
                .enumerate()
                .find(|(_, a)| a.name.eq_ignore_ascii_case(&candidate));
            if let Some((index, attr)) = found {
                return Some((AttributeKey { interface: id, index }, attr));
            }
        }
    }

    None
}
