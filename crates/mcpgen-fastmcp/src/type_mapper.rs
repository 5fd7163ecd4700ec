use mcpgen_core::catalog::ParamType;
use mcpgen_core::ir::ParameterInfo;

/// Map a `ParamType` to its Python type string representation.
pub fn param_type_to_python(ty: &ParamType) -> String {
    match ty {
        ParamType::String => "str".to_string(),
        ParamType::Integer => "int".to_string(),
        ParamType::Number => "float".to_string(),
        ParamType::Boolean => "bool".to_string(),
        ParamType::Array { items } => format!("list[{}]", param_type_to_python(items)),
        ParamType::Object => "dict[str, Any]".to_string(),
        // Structured models travel as JSON text and are validated at call time.
        ParamType::Model { .. } => "str".to_string(),
        ParamType::Unsupported => "str".to_string(),
    }
}

/// Signature annotation for a tool argument, including the default for
/// optional ones.
pub fn tool_param_annotation(param: &ParameterInfo) -> String {
    let base = param_type_to_python(&param.ty);
    if param.required {
        base
    } else {
        format!("{base} | None = None")
    }
}

/// Resource query parameters are always optional.
pub fn resource_query_annotation(param: &ParameterInfo) -> String {
    format!("{} | None = None", param_type_to_python(&param.ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(ty: ParamType, required: bool) -> ParameterInfo {
        ParameterInfo {
            name: "p".to_string(),
            ty,
            required,
            description: String::new(),
            example_json: None,
            model: None,
        }
    }

    #[test]
    fn test_primitives() {
        assert_eq!(param_type_to_python(&ParamType::String), "str");
        assert_eq!(param_type_to_python(&ParamType::Number), "float");
        assert_eq!(param_type_to_python(&ParamType::Integer), "int");
        assert_eq!(param_type_to_python(&ParamType::Boolean), "bool");
        assert_eq!(param_type_to_python(&ParamType::Object), "dict[str, Any]");
        assert_eq!(param_type_to_python(&ParamType::Unsupported), "str");
    }

    #[test]
    fn test_array() {
        assert_eq!(
            param_type_to_python(&ParamType::array_of(ParamType::Integer)),
            "list[int]"
        );
    }

    #[test]
    fn test_model_is_json_text() {
        let model = ParamType::Model {
            name: "Pet".to_string(),
        };
        assert_eq!(param_type_to_python(&model), "str");
    }

    #[test]
    fn test_annotations() {
        assert_eq!(tool_param_annotation(&info(ParamType::Integer, true)), "int");
        assert_eq!(
            tool_param_annotation(&info(ParamType::Boolean, false)),
            "bool | None = None"
        );
        assert_eq!(
            resource_query_annotation(&info(ParamType::array_of(ParamType::String), true)),
            "list[str] | None = None"
        );
    }
}
