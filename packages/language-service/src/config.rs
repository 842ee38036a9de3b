use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Elements never offered as completions.
const HIDDEN_HTML_ELEMENTS: &[&str] = &[
    "html", "script", "noscript", "base", "body", "title", "head", "link",
];

/// How diagnostics of a file with several templates are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticsAggregation {
    /// Only the diagnostics of the last template in the file.
    #[default]
    LastTemplate,
    AllTemplates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageServiceConfig {
    pub diagnostics_aggregation: DiagnosticsAggregation,
    /// Offer the element names of directive selectors as element completions.
    pub include_directive_elements: bool,
    pub hidden_elements: Vec<String>,
    /// Url reported in markup parse errors.
    pub template_url: String,
}

impl Default for LanguageServiceConfig {
    fn default() -> Self {
        LanguageServiceConfig {
            diagnostics_aggregation: DiagnosticsAggregation::default(),
            include_directive_elements: true,
            hidden_elements: HIDDEN_HTML_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            template_url: String::new(),
        }
    }
}

impl LanguageServiceConfig {
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ProjectError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
