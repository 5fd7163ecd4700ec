use serde_json::{Map, Value};

use crate::catalog::{FieldDescriptor, MethodDescriptor, ModelDescriptor, OperationCatalog, ParamType};
use crate::config::NamingConfig;
use crate::ir::{ParameterInfo, ToolSpec};
use crate::transform::name_normalizer::canonical_name;

/// Name markers of raw-response variants that must not be exposed twice.
const INTERNAL_MARKERS: [&str; 2] = ["with_http_info", "without_preload"];

/// Parameters that never become tool arguments.
const RESERVED_PARAMS: [&str; 3] = ["self", "kwargs", "args"];

/// Whether a catalog method is an internal or raw variant.
pub fn is_internal_method(name: &str) -> bool {
    name.starts_with('_') || INTERNAL_MARKERS.iter().any(|m| name.contains(m))
}

/// Build the tool for one catalog method, or `None` for internal variants.
pub fn build_tool_spec(
    group_id: &str,
    method: &MethodDescriptor,
    catalog: &OperationCatalog,
    naming: &NamingConfig,
) -> Option<ToolSpec> {
    if is_internal_method(&method.name) {
        log::debug!("{group_id}: skipping internal method {}", method.name);
        return None;
    }

    let parameters: Vec<ParameterInfo> = method
        .params
        .iter()
        .filter(|p| !RESERVED_PARAMS.contains(&p.name.as_str()) && !p.name.starts_with('_'))
        .map(|p| {
            let required = !p.has_default;
            match &p.ty {
                ParamType::Model { name } => match catalog.model(name) {
                    Some(model) => model_parameter(&p.name, name, model, required),
                    None => {
                        log::warn!(
                            "{group_id}.{}: model {name} of parameter {} is not described, using str",
                            method.name,
                            p.name
                        );
                        plain_parameter(&p.name, ParamType::String, None, required)
                    }
                },
                ParamType::Unsupported => {
                    log::warn!(
                        "{group_id}.{}: unsupported type for parameter {}, using str",
                        method.name,
                        p.name
                    );
                    plain_parameter(&p.name, ParamType::String, None, required)
                }
                ty => plain_parameter(&p.name, ty.clone(), p.description.as_deref(), required),
            }
        })
        .collect();

    let summary = method
        .summary
        .clone()
        .unwrap_or_else(|| format!("Call {}", method.name));
    let docstring = build_docstring(&summary, &parameters, group_id, &method.name);
    let has_model_params = parameters.iter().any(ParameterInfo::is_model);

    Some(ToolSpec {
        tool_name: canonical_name(&method.name, naming),
        method_name: method.name.clone(),
        api_var_name: group_id.to_string(),
        parameters,
        docstring,
        has_model_params,
    })
}

fn plain_parameter(
    name: &str,
    ty: ParamType,
    description: Option<&str>,
    required: bool,
) -> ParameterInfo {
    let description = description
        .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("Parameter: {name}"));
    ParameterInfo {
        name: name.to_string(),
        ty,
        required,
        description,
        example_json: None,
        model: None,
    }
}

fn model_parameter(
    name: &str,
    model_name: &str,
    model: &ModelDescriptor,
    required: bool,
) -> ParameterInfo {
    let mut description = String::from("JSON object with the following fields:");
    for field in &model.fields {
        let status = if field.required { "REQUIRED" } else { "optional" };
        description.push_str(&format!("\n  - {} ({status})", field.wire_name()));
        if let Some(desc) = field.description.as_deref().filter(|d| !d.trim().is_empty()) {
            description.push_str(": ");
            description.push_str(&desc.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }

    ParameterInfo {
        name: name.to_string(),
        ty: ParamType::Model {
            name: model_name.to_string(),
        },
        required,
        description,
        example_json: Some(example_json(model)),
        model: Some(model_name.to_string()),
    }
}

/// Best-effort JSON example listing the model's required fields.
fn example_json(model: &ModelDescriptor) -> String {
    let example: Map<String, Value> = model
        .fields
        .iter()
        .filter(|f| f.required)
        .filter_map(|f| example_value(f).map(|v| (f.wire_name().to_string(), v)))
        .collect();
    serde_json::to_string_pretty(&Value::Object(example)).unwrap_or_else(|_| "{}".to_string())
}

fn example_value(field: &FieldDescriptor) -> Option<Value> {
    let lower = field.name.to_lowercase();
    match &field.ty {
        ParamType::String => Some(Value::String(if lower.contains("email") {
            "user@example.com".to_string()
        } else if lower.contains("username") {
            "username".to_string()
        } else if lower.contains("name") {
            "Example Name".to_string()
        } else {
            format!("<{}>", field.name)
        })),
        ParamType::Boolean => Some(Value::Bool(false)),
        ParamType::Integer => Some(Value::from(0)),
        _ => None,
    }
}

fn build_docstring(
    summary: &str,
    parameters: &[ParameterInfo],
    group_id: &str,
    method_name: &str,
) -> String {
    let mut lines = vec![summary.to_string(), String::new()];

    if !parameters.is_empty() {
        lines.push("Parameters:".to_string());
        for param in parameters {
            let mut desc = param.description.lines();
            lines.push(format!(
                "    {}: {}",
                param.name,
                desc.next().unwrap_or_default()
            ));
            lines.extend(desc.map(|l| format!("    {l}")));
        }
        lines.push(String::new());
    }

    let examples: Vec<(&str, &str)> = parameters
        .iter()
        .filter_map(|p| p.example_json.as_deref().map(|e| (p.name.as_str(), e)))
        .collect();
    if !examples.is_empty() {
        lines.push("Example JSON for parameters:".to_string());
        for (name, example) in examples {
            lines.push(format!("  {name}:"));
            lines.extend(example.lines().map(|l| format!("    {l}")));
        }
        lines.push(String::new());
    }

    lines.push(format!("Auto-generated from: {group_id}.{method_name}()"));
    lines.join("\n")
}
