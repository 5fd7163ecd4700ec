pub mod name_normalizer;
pub mod resource_builder;
pub mod tool_builder;

pub use name_normalizer::{camel_to_snake, canonical_name, validate_tool_names};
pub use resource_builder::build_resource_spec;
pub use tool_builder::build_tool_spec;

use crate::catalog::{GroupDescriptor, OperationCatalog, ResourceEndpoint};
use crate::config::NamingConfig;
use crate::error::NamingError;
use crate::ir::{ResourceSpec, ToolSpec};

/// Tools and resource templates of one operation group.
#[derive(Debug, Clone, Default)]
pub struct GroupSpecs {
    pub tools: Vec<ToolSpec>,
    pub resources: Vec<ResourceSpec>,
}

/// Build every tool and resource of a group, in method-name order.
///
/// Fails when two methods canonicalize to the same tool name or a name is
/// over the length limit.
pub fn build_group(
    group: &GroupDescriptor,
    catalog: &OperationCatalog,
    endpoints: &[ResourceEndpoint],
    naming: &NamingConfig,
) -> Result<GroupSpecs, NamingError> {
    let group_id = group.api_var_name();

    let mut methods: Vec<_> = group.methods.iter().collect();
    methods.sort_by(|a, b| a.name.cmp(&b.name));
    let tools: Vec<ToolSpec> = methods
        .into_iter()
        .filter_map(|m| build_tool_spec(&group_id, m, catalog, naming))
        .collect();
    validate_tool_names(&group_id, &tools)?;

    let resources = endpoints
        .iter()
        .filter_map(|endpoint| {
            if group.method(&endpoint.method_name).is_none() {
                log::debug!(
                    "{group_id}: no method {} for GET {}",
                    endpoint.method_name,
                    endpoint.path
                );
                return None;
            }
            build_resource_spec(&group_id, endpoint, &endpoint.method_name)
        })
        .collect();

    Ok(GroupSpecs { tools, resources })
}
