//! Error types for code generation.

use std::path::PathBuf;

use thiserror::Error;

use attrgen_core::{ParseError, ReconcileError};

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// Invalid template.
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] handlebars::TemplateError),

    /// An enum override names a group no interface declares.
    #[error("Enum override for '{attribute}' names unknown group '{group}'")]
    UnknownEnumGroup { attribute: String, group: String },

    /// The overrides file could not be parsed.
    #[error("Invalid overrides in {path}: {source}")]
    InvalidOverrides {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Reading an input or writing an output failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any failure of a full generation run.
#[derive(Error, Debug)]
pub enum AttrgenError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}
