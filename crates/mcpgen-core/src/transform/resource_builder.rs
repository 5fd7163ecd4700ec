use crate::catalog::{ParamType, ResourceEndpoint};
use crate::ir::{ParameterInfo, ResourceSpec};
use crate::parse::schema::SchemaType;

/// Resource templates always serve JSON.
pub const RESOURCE_MIME_TYPE: &str = "application/json";

/// Build a resource template for a GET endpoint.
///
/// Returns `None` when the endpoint has neither path nor query parameters,
/// since a template needs at least one variable.
pub fn build_resource_spec(
    group_id: &str,
    endpoint: &ResourceEndpoint,
    method_name: &str,
) -> Option<ResourceSpec> {
    if endpoint.path_params.is_empty() && endpoint.query_params.is_empty() {
        log::debug!(
            "{group_id}: {} has no parameters, not a resource",
            endpoint.path
        );
        return None;
    }

    let resource_name = resource_name(endpoint);
    let scheme = uri_scheme(&resource_name);

    let mut uri_path = endpoint.path.trim_start_matches('/').to_string();
    for param in &endpoint.path_params {
        uri_path = uri_path.replace(
            &format!("{{{}}}", param.name),
            &format!("{{{}}}", param.python_name),
        );
    }
    let mut uri_template = format!("{scheme}://{uri_path}");
    if !endpoint.query_params.is_empty() {
        let names: Vec<&str> = endpoint
            .query_params
            .iter()
            .map(|q| q.python_name.as_str())
            .collect();
        uri_template.push_str(&format!("{{?{}}}", names.join(",")));
    }

    let query_params = endpoint
        .query_params
        .iter()
        .map(|q| ParameterInfo {
            name: q.python_name.clone(),
            ty: query_type(q.schema_type),
            required: false,
            description: q
                .description
                .as_deref()
                .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Query parameter".to_string()),
            example_json: None,
            model: None,
        })
        .collect();

    let description = endpoint
        .summary
        .as_deref()
        .or(endpoint.description.as_deref())
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(ResourceSpec {
        resource_name,
        uri_template,
        method_name: method_name.to_string(),
        api_var_name: group_id.to_string(),
        path_params: endpoint
            .path_params
            .iter()
            .map(|p| p.python_name.clone())
            .collect(),
        query_params,
        description,
        mime_type: RESOURCE_MIME_TYPE.to_string(),
    })
}

/// Last non-parameter path segment, or the operation id without `get`.
fn resource_name(endpoint: &ResourceEndpoint) -> String {
    endpoint
        .path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .next_back()
        .map(str::to_string)
        .unwrap_or_else(|| {
            endpoint
                .operation_id
                .replace("get", "")
                .replace('_', "-")
                .to_lowercase()
        })
}

/// URI schemes allow letters, digits, `+`, `-` and `.`, starting with a letter.
fn uri_scheme(resource_name: &str) -> String {
    let scheme: String = resource_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    match scheme.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => scheme,
        _ => format!("r{scheme}"),
    }
}

fn query_type(schema_type: Option<SchemaType>) -> ParamType {
    match schema_type {
        Some(SchemaType::Integer) => ParamType::Integer,
        Some(SchemaType::Number) => ParamType::Number,
        Some(SchemaType::Boolean) => ParamType::Boolean,
        Some(SchemaType::Array) => ParamType::array_of(ParamType::String),
        _ => ParamType::String,
    }
}
