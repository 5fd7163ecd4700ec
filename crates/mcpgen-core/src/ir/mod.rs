pub mod metadata;
pub mod security;
pub mod tools;

pub use metadata::ApiMetadata;
pub use security::{OAuthConfig, OAuthFlowConfig, OAuthFlowKind, SecurityConfig};
pub use tools::{ModuleSpec, ParameterInfo, ResourceSpec, ToolSpec};

use indexmap::IndexMap;

use crate::catalog::{OperationCatalog, ResourceEndpoint, resource_endpoints};
use crate::extract;
use crate::parse::spec::OpenApiSpec;

/// Everything a code generator consumes, produced once per run.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub metadata: ApiMetadata,
    pub security: SecurityConfig,
    pub catalog: OperationCatalog,
    /// GET endpoints eligible for resource templates, keyed by group id.
    pub resource_endpoints: IndexMap<String, Vec<ResourceEndpoint>>,
}

impl GenerationInput {
    /// Assemble the generator input from a parsed document and its catalog.
    pub fn new(spec: &OpenApiSpec, catalog: OperationCatalog) -> Self {
        Self {
            metadata: extract::metadata_from_spec(spec),
            security: extract::security_from_spec(spec),
            catalog,
            resource_endpoints: resource_endpoints(spec),
        }
    }

    /// Resource endpoints of one group.
    pub fn endpoints_for(&self, group_id: &str) -> &[ResourceEndpoint] {
        self.resource_endpoints
            .get(group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
