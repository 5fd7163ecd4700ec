use serde::Serialize;

use crate::catalog::ParamType;

/// A tool or resource parameter after classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
    pub description: String,
    /// Pretty-printed JSON example for structured model parameters.
    pub example_json: Option<String>,
    /// Model type name when the parameter is a structured validation model.
    pub model: Option<String>,
}

impl ParameterInfo {
    pub fn is_model(&self) -> bool {
        self.model.is_some()
    }
}

/// A callable tool derived from one catalog method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub tool_name: String,
    pub method_name: String,
    pub api_var_name: String,
    pub parameters: Vec<ParameterInfo>,
    pub docstring: String,
    pub has_model_params: bool,
}

impl ToolSpec {
    /// Model type names referenced by this tool, in parameter order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter_map(|p| p.model.as_deref())
    }
}

/// A read-only resource template derived from a GET endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSpec {
    pub resource_name: String,
    /// RFC 6570 template, e.g. `pet://pet/{petId}{?fields}`.
    pub uri_template: String,
    pub method_name: String,
    pub api_var_name: String,
    pub path_params: Vec<String>,
    /// Always optional; the protocol requires defaults for query parameters.
    pub query_params: Vec<ParameterInfo>,
    pub description: String,
    pub mime_type: String,
}

/// One rendered module per operation group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSpec {
    pub filename: String,
    pub api_var_name: String,
    pub api_class_name: String,
    /// Stable module identity; filenames are presentation only.
    pub module_name: String,
    pub tool_count: usize,
    pub resource_count: usize,
    pub tool_names: Vec<String>,
    pub resource_uris: Vec<String>,
    #[serde(skip)]
    pub code: String,
}

impl ModuleSpec {
    /// Python import path of the module inside the `servers` package.
    pub fn import_path(&self) -> String {
        let stem = self.filename.strip_suffix(".py").unwrap_or(&self.filename);
        format!("servers.{stem}")
    }
}
