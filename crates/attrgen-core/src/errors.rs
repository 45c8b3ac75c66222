//! Error types for the attrgen pipeline.

use thiserror::Error;

/// Which input grammar an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Interface,
    DocumentType,
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interface => write!(f, "interface grammar"),
            Self::DocumentType => write!(f, "document-type grammar"),
        }
    }
}

/// Errors during parsing of the input grammars.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{grammar}, line {line}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        grammar: Grammar,
        found: String,
        expected: String,
        line: usize,
    },

    #[error("{grammar}, line {line}: unterminated {construct}")]
    Unterminated {
        grammar: Grammar,
        construct: String,
        line: usize,
    },

    #[error("{grammar}, line {line}: invalid value {value:?} for constant {name}")]
    InvalidConstant {
        grammar: Grammar,
        name: String,
        value: String,
        line: usize,
    },
}

/// Errors while reconciling the two grammars.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("DTD element '{element}' has no interface (looked for '{candidate}')")]
    UnmappedElement { element: String, candidate: String },

    #[error("Inheritance cycle: {}", .cycle.join(" -> "))]
    InheritanceCycle { cycle: Vec<String> },
}

/// 1-based line number of a byte offset.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
