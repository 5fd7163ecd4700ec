use indexmap::IndexMap;
use serde::Serialize;

use super::derive::{group_id_for_tag, method_name_for};
use crate::parse::operation::ParameterLocation;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::schema::SchemaType;
use crate::parse::spec::OpenApiSpec;
use crate::transform::name_normalizer::python_identifier;

/// A path parameter of a GET endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointParam {
    /// Name as written in the document path template.
    pub name: String,
    /// Name of the matching client method argument.
    pub python_name: String,
}

/// A query parameter of a GET endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParam {
    pub name: String,
    pub python_name: String,
    pub required: bool,
    pub schema_type: Option<SchemaType>,
    pub description: Option<String>,
}

/// A GET operation that may be exposed as a resource template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceEndpoint {
    pub path: String,
    pub operation_id: String,
    /// Client method implementing this endpoint.
    pub method_name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub path_params: Vec<EndpointParam>,
    pub query_params: Vec<QueryParam>,
}

/// Collect GET endpoints with an `operationId`, keyed by the id of the group
/// owning their primary tag. Keys are sorted.
pub fn resource_endpoints(spec: &OpenApiSpec) -> IndexMap<String, Vec<ResourceEndpoint>> {
    let resolver = RefResolver::new(spec);
    let mut by_group: IndexMap<String, Vec<ResourceEndpoint>> = IndexMap::new();

    for (path, item) in &spec.paths {
        let Some(get) = &item.get else { continue };
        let Some(operation_id) = &get.operation_id else {
            log::debug!("GET {path} has no operationId, not a resource candidate");
            continue;
        };

        let mut path_params = Vec::new();
        let mut query_params = Vec::new();
        for param in item.parameters.iter().chain(&get.parameters) {
            let param = match resolver.parameter(param) {
                Ok(param) => param,
                Err(err) => {
                    log::warn!("GET {path}: skipping parameter: {err}");
                    continue;
                }
            };
            match param.location {
                ParameterLocation::Path => {
                    if path_params.iter().any(|p: &EndpointParam| p.name == param.name) {
                        continue;
                    }
                    path_params.push(EndpointParam {
                        name: param.name.clone(),
                        python_name: python_identifier(&param.name),
                    });
                }
                ParameterLocation::Query => {
                    let schema_type = param
                        .schema
                        .as_ref()
                        .and_then(|s| resolver.schema(s).ok())
                        .and_then(|s| s.schema.primary_type());
                    query_params.retain(|q: &QueryParam| q.name != param.name);
                    query_params.push(QueryParam {
                        name: param.name.clone(),
                        python_name: python_identifier(&param.name),
                        required: param.required,
                        schema_type,
                        description: param.description.clone(),
                    });
                }
                ParameterLocation::Header | ParameterLocation::Cookie => {}
            }
        }

        let group = group_id_for_tag(get.tags.first().map(String::as_str));
        by_group.entry(group).or_default().push(ResourceEndpoint {
            path: path.clone(),
            operation_id: operation_id.clone(),
            method_name: method_name_for(operation_id),
            summary: get.summary.clone(),
            description: get.description.clone(),
            path_params,
            query_params,
        });
    }

    by_group.sort_keys();
    by_group
}
