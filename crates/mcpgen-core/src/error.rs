use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("reference cycle through {0}")]
    Cycle(String),
}

/// Failures while loading or deriving the operation catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("catalog resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("catalog contains no operation groups")]
    Empty,
}

/// Tool names that cannot be emitted as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error(
        "tool name collision in group '{group}': '{first}' and '{second}' both map to '{name}' (add a naming override)"
    )]
    Collision {
        group: String,
        name: String,
        first: String,
        second: String,
    },

    #[error(
        "tool name '{name}' in group '{group}' is {len} characters, limit is {max} (add an override or abbreviation)"
    )]
    Overflow {
        group: String,
        name: String,
        len: usize,
        max: usize,
    },
}
