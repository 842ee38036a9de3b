use std::path::PathBuf;

use angular_compiler::directive_matching::SelectorError;
use angular_compiler::StaticSymbol;
use thiserror::Error;

/// A metadata lookup that could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unable to resolve metadata for {0}")]
    UnknownType(StaticSymbol),
    #[error("{0}")]
    Message(String),
}

/// Why a template could not be turned into an AST. Reported to the host as
/// a diagnostic covering the whole template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageServiceError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Expression forms the type evaluator does not handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Unsupported expression: {0}")]
    Unsupported(&'static str),
    #[error("Identifier '{0}' is not defined")]
    Undefined(String),
    #[error("No type information available")]
    NoQuery,
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Template in {file} is outside the file ({start}..{end})")]
    TemplateOutOfBounds { file: String, start: usize, end: usize },
    #[error("File {0} declares no content and no path")]
    MissingContent(String),
    #[error("Class {class} cannot extend {base}: {base} already derives from it")]
    CyclicBase { class: String, base: String },
    #[error("File {0} is not part of the project")]
    UnknownFile(String),
}
