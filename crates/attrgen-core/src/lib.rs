//! Core types for the attrgen accessor compiler.
//!
//! This crate provides the foundational types shared by every other attrgen crate:
//! - Interface grammar model (interfaces, attributes, constant groups, methods)
//! - Document-type grammar model (entities, per-element attribute lists)
//! - CSS property declarations
//! - The closed set of marshalling categories and the type classifier
//! - Error types

pub mod category;
pub mod css;
pub mod dtd;
pub mod errors;
pub mod idl;

pub use category::*;
pub use css::*;
pub use dtd::*;
pub use errors::*;
pub use idl::*;
