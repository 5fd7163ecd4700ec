use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level project configuration loaded from `.mcpgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct McpgenConfig {
    pub input: String,
    /// Pre-computed operation catalog. Derived from `input` when absent.
    pub catalog: Option<String>,
    pub output: String,
    pub naming: NamingConfig,
    pub composition: CompositionConfig,
    pub resources: bool,
    pub tests: bool,
}

impl Default for McpgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            catalog: None,
            output: "generated_mcp".to_string(),
            naming: NamingConfig::default(),
            composition: CompositionConfig::default(),
            resources: true,
            tests: true,
        }
    }
}

/// Override and abbreviation tables for the naming engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Raw method name → tool name, applied verbatim.
    pub overrides: IndexMap<String, String>,
    /// Substring → replacement, tried in order on over-length names.
    pub abbreviations: IndexMap<String, String>,
}

/// How generated modules are merged into the composed server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub strategy: CompositionStrategy,
    pub resource_prefix_format: ResourcePrefixFormat,
}

/// Composition strategy for the top-level server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStrategy {
    /// Live delegation; modules are registered by reference.
    #[default]
    Mount,
    /// One-time asynchronous copy of each module's surface.
    Import,
}

impl CompositionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionStrategy::Mount => "mount",
            CompositionStrategy::Import => "import",
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, CompositionStrategy::Import)
    }
}

impl fmt::Display for CompositionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address prefix format for resources of composed modules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePrefixFormat {
    /// `resource://prefix/path`
    #[default]
    Path,
    /// `prefix+resource://path`
    Protocol,
}

impl ResourcePrefixFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourcePrefixFormat::Path => "path",
            ResourcePrefixFormat::Protocol => "protocol",
        }
    }
}

impl fmt::Display for ResourcePrefixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".mcpgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<McpgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: McpgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# mcpgen configuration
input: openapi.yaml
# catalog: catalog.json   # pre-computed operation catalog (derived from input when omitted)
output: generated_mcp

naming:
  overrides: {}
    # list_healthcare_users_by_role: list_users_by_role
  abbreviations: {}
    # healthcare: hc
    # configuration: config

composition:
  strategy: mount                # mount | import
  resource_prefix_format: path   # path | protocol

resources: true   # emit resource templates for GET endpoints with parameters
tests: true       # emit pytest scaffolding
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = McpgenConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.output, "generated_mcp");
        assert!(config.catalog.is_none());
        assert!(config.naming.overrides.is_empty());
        assert_eq!(config.composition.strategy, CompositionStrategy::Mount);
        assert_eq!(
            config.composition.resource_prefix_format,
            ResourcePrefixFormat::Path
        );
        assert!(config.resources);
        assert!(config.tests);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: spec.json
catalog: catalog.yaml
output: out
naming:
  overrides:
    legacyOp: custom_tool
  abbreviations:
    healthcare: hc
    configuration: config
composition:
  strategy: import
  resource_prefix_format: protocol
resources: false
"#;
        let config: McpgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "spec.json");
        assert_eq!(config.catalog.as_deref(), Some("catalog.yaml"));
        assert_eq!(config.naming.overrides["legacyOp"], "custom_tool");
        let abbreviations: Vec<&str> = config
            .naming
            .abbreviations
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(abbreviations, vec!["healthcare", "configuration"]);
        assert_eq!(config.composition.strategy, CompositionStrategy::Import);
        assert_eq!(
            config.composition.resource_prefix_format,
            ResourcePrefixFormat::Protocol
        );
        assert!(!config.resources);
        assert!(config.tests);
    }

    #[test]
    fn test_default_config_content_parses() {
        let config: McpgenConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.composition.strategy, CompositionStrategy::Mount);
        assert!(config.naming.abbreviations.is_empty());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let yaml = "composition:\n  strategy: merge\n";
        assert!(serde_yaml_ng::from_str::<McpgenConfig>(yaml).is_err());
    }
}
