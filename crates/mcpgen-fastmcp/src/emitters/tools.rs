use std::collections::BTreeSet;

use heck::ToPascalCase;
use mcpgen_core::ir::{ModuleSpec, ResourceSpec, ToolSpec};
use mcpgen_core::transform::name_normalizer::is_python_identifier;
use minijinja::{Environment, context};

use crate::generator::GeneratorError;
use crate::type_mapper::{resource_query_annotation, tool_param_annotation};

/// Module-level names a generated function or imported model must not shadow.
const MODULE_GLOBALS: [&str; 15] = [
    "Any",
    "ApiClient",
    "ApiException",
    "Context",
    "FastMCP",
    "Path",
    "ResourceError",
    "ToolError",
    "generated_path",
    "json",
    "logger",
    "logging",
    "mcp",
    "sys",
    "ctx",
];

fn check_global_name(name: &str) -> Result<(), GeneratorError> {
    if is_python_identifier(name) && !MODULE_GLOBALS.contains(&name) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidIdentifier(name.to_string()))
    }
}

fn check_identifier(name: &str) -> Result<(), GeneratorError> {
    // `ctx` is the injected request context of every handler.
    if is_python_identifier(name) && name != "ctx" {
        Ok(())
    } else {
        Err(GeneratorError::InvalidIdentifier(name.to_string()))
    }
}

/// Render one `@mcp.tool` handler.
pub fn render_tool(env: &Environment<'_>, tool: &ToolSpec) -> Result<String, GeneratorError> {
    check_global_name(&tool.tool_name)?;
    check_identifier(&tool.method_name)?;

    // Python wants parameters without defaults first; arguments are passed by
    // keyword so the reorder does not change the call.
    let mut ordered: Vec<_> = tool.parameters.iter().collect();
    ordered.sort_by_key(|p| !p.required);

    let mut params = Vec::with_capacity(ordered.len());
    for p in ordered {
        check_identifier(&p.name)?;
        if let Some(model) = &p.model {
            check_global_name(model)?;
        }
        params.push(context! {
            name => p.name,
            annotation => tool_param_annotation(p),
            required => p.required,
            model => p.model,
        });
    }
    let model_params: Vec<_> = tool
        .parameters
        .iter()
        .filter(|p| p.is_model())
        .map(|p| {
            context! {
                name => p.name,
                required => p.required,
                model => p.model,
            }
        })
        .collect();

    let code = env.get_template("tool.py.j2")?.render(context! {
        tool_name => tool.tool_name,
        method_name => tool.method_name,
        api_var_name => tool.api_var_name,
        docstring => tool.docstring,
        params => params,
        model_params => model_params,
    })?;
    Ok(code.trim_end().to_string())
}

/// Render one `@mcp.resource` template handler.
pub fn render_resource(
    env: &Environment<'_>,
    resource: &ResourceSpec,
) -> Result<String, GeneratorError> {
    let function_name = format!("{}_resource", resource.method_name);
    check_global_name(&function_name)?;
    check_identifier(&resource.method_name)?;
    for name in &resource.path_params {
        check_identifier(name)?;
    }
    let mut query_params = Vec::with_capacity(resource.query_params.len());
    for q in &resource.query_params {
        check_identifier(&q.name)?;
        query_params.push(context! {
            name => q.name,
            annotation => resource_query_annotation(q),
        });
    }

    let code = env.get_template("resource.py.j2")?.render(context! {
        function_name => function_name,
        uri_template => resource.uri_template,
        mime_type => resource.mime_type,
        method_name => resource.method_name,
        api_var_name => resource.api_var_name,
        path_params => resource.path_params,
        query_params => query_params,
        docstring => resource_docstring(resource),
    })?;
    Ok(code.trim_end().to_string())
}

fn resource_docstring(resource: &ResourceSpec) -> String {
    let title = if resource.description.is_empty() {
        format!("Read {}", resource.resource_name)
    } else {
        resource.description.clone()
    };
    let mut lines = vec![title, String::new()];

    if !resource.path_params.is_empty() || !resource.query_params.is_empty() {
        lines.push("Parameters:".to_string());
        lines.extend(
            resource
                .path_params
                .iter()
                .map(|p| format!("    {p}: Path parameter")),
        );
        lines.extend(
            resource
                .query_params
                .iter()
                .map(|q| format!("    {}: {}", q.name, q.description)),
        );
        lines.push(String::new());
    }

    lines.push(format!("URI: {}", resource.uri_template));
    lines.join("\n")
}

/// Canonical module name of a group, e.g. `store_orders_api` → `StoreOrders`.
pub fn module_name(group_id: &str) -> String {
    group_stem(group_id).to_pascal_case()
}

fn group_stem(group_id: &str) -> &str {
    group_id.strip_suffix("_api").unwrap_or(group_id)
}

/// Render the module of one operation group.
///
/// A tool or resource whose names cannot be emitted is skipped with a
/// warning; the rest of the module is kept.
pub fn render_module(
    env: &Environment<'_>,
    group_id: &str,
    group_class: &str,
    tools: &[ToolSpec],
    resources: &[ResourceSpec],
) -> Result<ModuleSpec, GeneratorError> {
    let mut tool_code = Vec::with_capacity(tools.len());
    let mut tool_names = Vec::with_capacity(tools.len());
    let mut model_imports = BTreeSet::new();
    for tool in tools {
        match render_tool(env, tool) {
            Ok(code) => {
                tool_code.push(code);
                tool_names.push(tool.tool_name.clone());
                model_imports.extend(tool.model_names().map(str::to_string));
            }
            Err(GeneratorError::InvalidIdentifier(name)) => {
                log::warn!(
                    "{group_id}: skipping tool {} ('{name}' is not a usable identifier)",
                    tool.tool_name
                );
            }
            Err(err) => return Err(err),
        }
    }

    let mut resource_code = Vec::with_capacity(resources.len());
    let mut resource_uris = Vec::with_capacity(resources.len());
    for resource in resources {
        match render_resource(env, resource) {
            Ok(code) => {
                resource_code.push(code);
                resource_uris.push(resource.uri_template.clone());
            }
            Err(GeneratorError::InvalidIdentifier(name)) => {
                log::warn!(
                    "{group_id}: skipping resource {} ('{name}' is not a usable identifier)",
                    resource.uri_template
                );
            }
            Err(err) => return Err(err),
        }
    }

    let module_name = module_name(group_id);
    let code = env.get_template("module.py.j2")?.render(context! {
        module_name => module_name,
        api_class_name => group_class,
        api_var_name => group_id,
        model_imports => model_imports,
        tools => tool_code,
        resources => resource_code,
        tool_count => tool_names.len(),
        resource_count => resource_uris.len(),
    })?;

    tool_names.sort();
    resource_uris.sort();
    log::debug!(
        "{group_id}: rendered {} tools and {} resources",
        tool_names.len(),
        resource_uris.len()
    );

    Ok(ModuleSpec {
        filename: format!("{}_server.py", group_stem(group_id)),
        api_var_name: group_id.to_string(),
        api_class_name: group_class.to_string(),
        module_name,
        tool_count: tool_names.len(),
        resource_count: resource_uris.len(),
        tool_names,
        resource_uris,
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;
    use mcpgen_core::catalog::ParamType;
    use mcpgen_core::ir::ParameterInfo;

    fn param(name: &str, ty: ParamType, required: bool) -> ParameterInfo {
        ParameterInfo {
            name: name.to_string(),
            ty,
            required,
            description: format!("Parameter: {name}"),
            example_json: None,
            model: None,
        }
    }

    fn tool(name: &str, parameters: Vec<ParameterInfo>) -> ToolSpec {
        ToolSpec {
            tool_name: name.to_string(),
            method_name: "find_pets_by_status".to_string(),
            api_var_name: "pet_api".to_string(),
            has_model_params: parameters.iter().any(ParameterInfo::is_model),
            parameters,
            docstring: "Finds Pets by status\n\nAuto-generated from: pet_api.find_pets_by_status()"
                .to_string(),
        }
    }

    fn resource() -> ResourceSpec {
        ResourceSpec {
            resource_name: "pet".to_string(),
            uri_template: "pet://pet/{pet_id}{?fields}".to_string(),
            method_name: "get_pet_by_id".to_string(),
            api_var_name: "pet_api".to_string(),
            path_params: vec!["pet_id".to_string()],
            query_params: vec![ParameterInfo {
                required: false,
                ..param("fields", ParamType::array_of(ParamType::String), false)
            }],
            description: String::new(),
            mime_type: "application/json".to_string(),
        }
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("store_orders_api"), "StoreOrders");
        assert_eq!(module_name("pet_api"), "Pet");
        assert_eq!(module_name("misc"), "Misc");
    }

    #[test]
    fn test_render_tool_signature_and_call() {
        let env = environment().unwrap();
        let spec = tool(
            "find_pets_by_status",
            vec![
                param("status", ParamType::String, false),
                param("limit", ParamType::Integer, true),
            ],
        );
        let code = render_tool(&env, &spec).unwrap();
        assert!(code.starts_with("@mcp.tool\nasync def find_pets_by_status(\n    ctx: Context,\n    limit: int,\n    status: str | None = None,\n) -> dict[str, Any]:"));
        assert!(code.contains("_api.find_pets_by_status(\n            limit=limit,\n            status=status,\n        )"));
        assert!(code.contains("_get_api_instances(_client)[\"pet_api\"]"));
        assert!(code.contains("return {\"result\": _normalize_response(_response)}"));
        assert!(!code.contains("model_validate"));
    }

    #[test]
    fn test_render_tool_model_parameter() {
        let env = environment().unwrap();
        let mut body = param("pet", ParamType::Model { name: "Pet".to_string() }, true);
        body.model = Some("Pet".to_string());
        let code = render_tool(&env, &tool("add_pet", vec![body])).unwrap();
        assert!(code.contains("_pet_value = Pet.model_validate(_pet_data)"));
        assert!(code.contains("pet=_pet_value,"));
    }

    #[test]
    fn test_render_tool_rejects_bad_identifiers() {
        let env = environment().unwrap();
        let err = render_tool(&env, &tool("list-pets", vec![])).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidIdentifier(name) if name == "list-pets"));

        let err = render_tool(&env, &tool("list_pets", vec![param("ctx", ParamType::String, true)]))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidIdentifier(name) if name == "ctx"));

        assert!(render_tool(&env, &tool("json", vec![])).is_err());
    }

    #[test]
    fn test_render_tool_rejects_unusable_model_names() {
        let env = environment().unwrap();
        for model in ["Job-Input", "Path", "3dModel"] {
            let mut body = param("job", ParamType::Model { name: model.to_string() }, true);
            body.model = Some(model.to_string());
            let err = render_tool(&env, &tool("create_job", vec![body])).unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidIdentifier(name) if name == model));
        }
    }

    #[test]
    fn test_docstring_text_is_escaped() {
        let env = environment().unwrap();
        let mut spec = tool("list_pets", vec![]);
        spec.docstring = r#"Say """hi""" to C:\pets {now}"#.to_string();
        let code = render_tool(&env, &spec).unwrap();
        assert!(code.contains(r#"    Say \"\"\"hi\"\"\" to C:\\pets {now}"#));
    }

    #[test]
    fn test_render_resource() {
        let env = environment().unwrap();
        let code = render_resource(&env, &resource()).unwrap();
        insta::assert_snapshot!(code.lines().take(17).collect::<Vec<_>>().join("\n"), @r#"
        @mcp.resource("pet://pet/{pet_id}{?fields}", mime_type="application/json")
        async def get_pet_by_id_resource(
            ctx: Context,
            pet_id: str,
            fields: list[str] | None = None,
        ) -> str:
            """
            Read pet

            Parameters:
                pet_id: Path parameter
                fields: Parameter: fields

            URI: pet://pet/{pet_id}{?fields}
            """
            _client = ctx.get_state("openapi_client")
            if not _client:
        "#);
        assert!(code.contains("return json.dumps(_result, indent=2, default=str)"));
    }

    #[test]
    fn test_render_module_skips_unrenderable_tools() {
        let env = environment().unwrap();
        let mut body = param("pet", ParamType::Model { name: "Pet".to_string() }, true);
        body.model = Some("Pet".to_string());
        let tools = vec![
            tool("update_pet", vec![body]),
            tool("add_pet", vec![]),
            tool("bad name", vec![]),
        ];
        let module = render_module(&env, "pet_api", "PetApi", &tools, &[resource()]).unwrap();
        assert_eq!(module.filename, "pet_server.py");
        assert_eq!(module.module_name, "Pet");
        assert_eq!(module.import_path(), "servers.pet_server");
        assert_eq!(module.tool_count, 2);
        assert_eq!(module.tool_names, vec!["add_pet", "update_pet"]);
        assert_eq!(module.resource_count, 1);
        assert!(module.code.contains("mcp = FastMCP(\"Pet\")"));
        assert!(module.code.contains("from openapi_client import ApiClient, ApiException, PetApi"));
        assert!(module.code.contains("from openapi_client.models import Pet  # noqa: E402"));
        assert!(module.code.contains("\"pet_api\": PetApi(openapi_client),"));
        assert!(module.code.contains("return \"Authentication required. User token invalid or missing.\""));
        assert!(module.code.ends_with("# Generated 2 tools and 1 resources for PetApi\n"));
        assert!(!module.code.contains("bad name"));
    }
}
