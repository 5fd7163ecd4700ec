use heck::ToSnakeCase;
use mcpgen_core::config::{CompositionStrategy, ResourcePrefixFormat};
use mcpgen_core::ir::{ApiMetadata, ModuleSpec, SecurityConfig};
use minijinja::{Environment, Value, context};

use crate::generator::GeneratorError;

/// Python module name of the composed server, e.g. `petstore_mcp_generated`.
pub fn server_module_name(metadata: &ApiMetadata) -> String {
    format!("{}_mcp_generated", metadata.server_name())
}

/// Modules in composition order, with their import alias and mount prefix.
pub(crate) fn module_contexts(modules: &[ModuleSpec]) -> Vec<Value> {
    let mut sorted: Vec<&ModuleSpec> = modules.iter().collect();
    sorted.sort_by(|a, b| a.module_name.cmp(&b.module_name));
    sorted
        .into_iter()
        .map(|m| {
            let prefix = m.module_name.to_snake_case();
            context! {
                alias => format!("{prefix}_mcp"),
                prefix => prefix,
                import_path => m.import_path(),
                module_name => m.module_name,
                tool_names => m.tool_names,
                resource_uris => m.resource_uris,
            }
        })
        .collect()
}

/// Compose every module into the top-level server.
///
/// Modules are ordered by module name so repeated runs emit identical
/// output. Authentication wiring is only emitted when the document declares
/// security schemes.
pub fn compose(
    env: &Environment<'_>,
    modules: &[ModuleSpec],
    metadata: &ApiMetadata,
    security: &SecurityConfig,
    strategy: CompositionStrategy,
    prefix_format: ResourcePrefixFormat,
) -> Result<String, GeneratorError> {
    let total_tools: usize = modules.iter().map(|m| m.tool_count).sum();
    let has_auth = security.has_authentication();
    log::debug!(
        "composing {} modules with {strategy} strategy (authentication: {has_auth})",
        modules.len()
    );

    let tmpl = env.get_template("server.py.j2")?;
    Ok(tmpl.render(context! {
        title => metadata.title,
        description => metadata.description,
        version => metadata.version,
        contact_email => metadata.contact.email,
        license_name => metadata.license.as_ref().map(|l| l.name.as_str()).filter(|n| !n.is_empty()),
        docs_url => metadata.external_docs.as_ref().map(|d| d.url.as_str()).filter(|u| !u.is_empty()),
        backend_url => metadata.backend_url(),
        strategy => strategy.as_str(),
        async_compose => strategy.is_async(),
        prefix_format => prefix_format.as_str(),
        modules => module_contexts(modules),
        module_count => modules.len(),
        total_tools => total_tools,
        has_auth => has_auth,
    })?)
}
