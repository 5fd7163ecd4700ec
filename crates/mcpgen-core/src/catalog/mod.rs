//! Typed operation catalog.
//!
//! The catalog describes the operation-bearing classes of a generated API
//! client: one [`GroupDescriptor`] per class, its callable methods, their
//! parameter lists and the structured models those parameters reference. It
//! is either loaded from a manifest produced by an earlier ingestion step or
//! derived from the API description with [`derive::derive`].

pub mod derive;
pub mod resources;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ParseError};
use crate::transform::name_normalizer::camel_to_snake;

pub use derive::derive;
pub use resources::{EndpointParam, QueryParam, ResourceEndpoint, resource_endpoints};

/// Class name suffix marking an operation group.
pub const GROUP_CLASS_SUFFIX: &str = "Api";

/// Semantic type of a parameter or model field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Array {
        items: Box<ParamType>,
    },
    /// Free-form JSON object.
    Object,
    /// A structured validation model, described in [`OperationCatalog::models`].
    Model {
        name: String,
    },
    /// Anything the builder cannot classify.
    #[serde(other)]
    Unsupported,
}

impl ParamType {
    pub fn array_of(items: ParamType) -> Self {
        ParamType::Array {
            items: Box::new(items),
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match self {
            ParamType::Model { name } => Some(name),
            _ => None,
        }
    }
}

/// A formal parameter of a catalog method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: ParamType,
    /// Parameters with a default value are optional.
    #[serde(default)]
    pub has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A callable operation of a group class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// One-line title of the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

/// An operation-bearing class of the generated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    pub class_name: String,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl GroupDescriptor {
    /// Stable group identifier, e.g. `StoreOrdersApi` → `store_orders_api`.
    pub fn api_var_name(&self) -> String {
        camel_to_snake(&self.class_name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A field of a structured model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Wire name when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type", default)]
    pub ty: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn wire_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Field-level schema metadata of a structured model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// The full operation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationCatalog {
    #[serde(default)]
    pub groups: Vec<GroupDescriptor>,
    #[serde(default)]
    pub models: IndexMap<String, ModelDescriptor>,
}

impl OperationCatalog {
    /// Groups following the class suffix convention, sorted by group id.
    pub fn api_groups(&self) -> Vec<&GroupDescriptor> {
        let mut groups: Vec<&GroupDescriptor> = self
            .groups
            .iter()
            .filter(|g| {
                let keep =
                    g.class_name.ends_with(GROUP_CLASS_SUFFIX) && !g.class_name.starts_with('_');
                if !keep {
                    log::debug!("ignoring non-group class {}", g.class_name);
                }
                keep
            })
            .collect();
        groups.sort_by_key(|g| g.api_var_name());
        groups
    }

    pub fn group(&self, api_var_name: &str) -> Option<&GroupDescriptor> {
        self.groups
            .iter()
            .find(|g| g.api_var_name() == api_var_name)
    }

    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    /// Load a catalog manifest in JSON or YAML form.
    pub fn from_str(input: &str) -> Result<Self, CatalogError> {
        let catalog: OperationCatalog = match serde_json::from_str(input) {
            Ok(catalog) => catalog,
            Err(json_err) => {
                log::debug!("catalog is not JSON ({json_err}), trying YAML");
                serde_yaml_ng::from_str(input).map_err(ParseError::from)?
            }
        };
        if catalog.api_groups().is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }
}
