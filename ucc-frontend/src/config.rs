//! Front end configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use ucc_common::CompilerError;

/// Switches consumed by the semantic passes. The default enables every
/// language feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Reject function definitions nested inside function bodies
    #[serde(default)]
    pub no_nested_functions: bool,
}

impl FrontendConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, CompilerError> {
        serde_json::from_str(text).map_err(|err| CompilerError::IoError {
            message: format!("invalid configuration: {}", err),
        })
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
