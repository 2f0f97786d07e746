//! Serializable engine configuration.
//!
//! The engine's primary construction path is in-memory config structs; JSON
//! loading is a convenience for applications that keep their knowledge base
//! on disk. No file format is mandated beyond what serde supports.
//!
//! All semantic validation lives in the build step
//! (`FuzzyEngine::from_config`), so a config that deserializes cleanly can
//! still be rejected with a precise `ConfigError`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::ConfigError;
use crate::membership::Shape;
use crate::rules::Rule;
use crate::variable::LinguisticVariable;

/// Full engine description: input variables, output variable, rule list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub inputs: Vec<VariableConfig>,
    pub output: VariableConfig,
    pub rules: Vec<Rule>,
}

/// One linguistic variable: range, sampling step, labeled shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub terms: Vec<TermConfig>,
}

/// One labeled membership shape of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub label: String,
    #[serde(flatten)]
    pub shape: Shape,
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse engine config JSON: {:?}", path))
    }
}

impl VariableConfig {
    /// Build the runtime variable, validating domain and shapes.
    pub(crate) fn build(&self) -> Result<LinguisticVariable, ConfigError> {
        let domain = Domain::new(self.min, self.max, self.step)?;

        let terms = self
            .terms
            .iter()
            .map(|t| Ok((t.label.clone(), t.shape.build()?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        LinguisticVariable::new(self.name.clone(), domain, terms)
    }
}
