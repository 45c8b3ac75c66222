//! Parsers for the attrgen input grammars.
//!
//! - [`parse_interfaces`]: W3C-style interface grammar into an [`InterfaceTable`]
//!   (nom combinators over comment-stripped text).
//! - [`parse_dtd`]: document-type grammar into a [`DtdDocument`]
//!   (regex scans plus explicit paren matching for choice lists).
//! - [`parse_css_table`]: tab-separated CSS property table into raw rows.

mod lexer;
mod idl;
mod dtd;
mod css;

pub use css::parse_css_table;
pub use dtd::parse_dtd;
pub use idl::{group_constants, parse_interfaces};
