//! Typed reading of API description documents.
//!
//! Only the parts of OpenAPI needed to derive an operation catalog, resource
//! endpoints, metadata and security settings are modelled. Everything else is
//! ignored, and every `x-*` key at the root or on `info` is kept verbatim.

pub mod operation;
pub mod ref_resolve;
pub mod schema;
pub mod security;
pub mod spec;

use serde::Deserialize;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Either a `$ref` pointer into `components` or an inline object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Item(T),
}

/// Parse an API description from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse an API description from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse an API description in either serialization form.
///
/// JSON is tried first; on failure the input is parsed as YAML and the YAML
/// error is reported, since YAML is a superset of JSON.
pub fn from_str(input: &str) -> Result<OpenApiSpec, ParseError> {
    match from_json(input) {
        Ok(spec) => Ok(spec),
        Err(json_err) => {
            log::debug!("document is not JSON ({json_err}), trying YAML");
            from_yaml(input)
        }
    }
}

/// Reject documents whose paths cannot be walked as OpenAPI 3.x.
pub fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    match (&spec.openapi, &spec.swagger) {
        (Some(v), _) if v.starts_with("3.") => Ok(()),
        (Some(v), _) => Err(ParseError::UnsupportedVersion(v.clone())),
        (None, Some(v)) => Err(ParseError::UnsupportedVersion(format!("swagger {v}"))),
        (None, None) => Err(ParseError::MissingField("openapi".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_json_and_yaml() {
        let json = r#"{"openapi": "3.0.0", "info": {"title": "J", "version": "1"}}"#;
        let yaml = "openapi: 3.0.0\ninfo:\n  title: Y\n  version: '1'\n";
        assert_eq!(from_str(json).unwrap().info.title.as_deref(), Some("J"));
        assert_eq!(from_str(yaml).unwrap().info.title.as_deref(), Some("Y"));
    }

    #[test]
    fn test_malformed_input_reports_yaml_error() {
        let err = from_str("openapi: [3.0").unwrap_err();
        assert!(matches!(err, ParseError::Yaml(_)));
    }

    #[test]
    fn test_validate_version() {
        let v3 = from_yaml("openapi: 3.1.0\n").unwrap();
        assert!(validate_version(&v3).is_ok());

        let v2 = from_yaml("swagger: '2.0'\n").unwrap();
        assert!(matches!(
            validate_version(&v2),
            Err(ParseError::UnsupportedVersion(_))
        ));

        let none = from_yaml("info: {}\n").unwrap();
        assert!(matches!(
            validate_version(&none),
            Err(ParseError::MissingField(_))
        ));
    }

    #[test]
    fn test_ref_or_prefers_reference() {
        let param: RefOr<operation::Parameter> =
            serde_json::from_str(r##"{"$ref": "#/components/parameters/Limit"}"##).unwrap();
        assert!(matches!(param, RefOr::Ref { ref_path } if ref_path.ends_with("/Limit")));

        let inline: RefOr<operation::Parameter> =
            serde_json::from_str(r#"{"name": "limit", "in": "query"}"#).unwrap();
        assert!(matches!(inline, RefOr::Item(p) if p.name == "limit"));
    }
}
