use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::{ParameterRef, PathItem, RequestBodyRef};
use super::schema::SchemaRef;
use super::security::{SecurityRequirement, SecurityScheme};

/// Vendor extensions (`x-*`) and any other unmodelled keys.
pub type Extensions = IndexMap<String, serde_json::Value>;

/// Top-level API description (OpenAPI 3.x, with enough of 2.x to read metadata).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OpenApiSpec {
    pub openapi: Option<String>,
    pub swagger: Option<String>,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: IndexMap<String, PathItem>,
    pub components: Option<Components>,
    pub tags: Vec<Tag>,
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl OpenApiSpec {
    /// Look up a string-valued root key such as `x-jwks-uri` or 2.x `host`.
    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(|v| v.as_str())
    }
}

/// Every field is optional so partial documents still yield metadata.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "termsOfService")]
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerVariable {
    pub default: String,
}

impl Server {
    /// The URL with every `{variable}` replaced by its default value.
    pub fn resolved_url(&self) -> String {
        self.variables
            .iter()
            .fold(self.url.clone(), |url, (name, var)| {
                url.replace(&format!("{{{name}}}"), &var.default)
            })
    }
}

/// Reusable definitions referenced through `#/components/...`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Components {
    pub schemas: IndexMap<String, SchemaRef>,
    pub parameters: IndexMap<String, ParameterRef>,
    #[serde(rename = "requestBodies")]
    pub request_bodies: IndexMap<String, RequestBodyRef>,
    #[serde(rename = "securitySchemes")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}
