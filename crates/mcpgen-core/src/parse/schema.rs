use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::RefOr;

pub type SchemaRef = RefOr<Schema>;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// `type` is a single keyword, or a list of them in the 3.1 nullable form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// The parts of a schema that classify a parameter or describe a model field.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,
    pub description: Option<String>,
    pub properties: IndexMap<String, SchemaRef>,
    pub required: Vec<String>,
    pub items: Option<Box<SchemaRef>>,
    #[serde(rename = "enum")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Schema {
    /// The first non-null type keyword.
    pub fn primary_type(&self) -> Option<SchemaType> {
        match self.schema_type.as_ref()? {
            TypeSet::Single(t) => Some(*t),
            TypeSet::Multiple(ts) => ts.iter().copied().find(|t| *t != SchemaType::Null),
        }
    }

    /// An object schema with declared properties, i.e. a model.
    pub fn is_structured(&self) -> bool {
        !self.properties.is_empty()
            && matches!(self.primary_type(), None | Some(SchemaType::Object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(yaml: &str) -> Schema {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_nullable_type_list() {
        assert_eq!(
            schema("type: [\"null\", integer]").primary_type(),
            Some(SchemaType::Integer)
        );
        assert_eq!(schema("type: [\"null\"]").primary_type(), None);
    }

    #[test]
    fn test_structured_schemas() {
        assert!(schema("properties: { id: { type: integer } }").is_structured());
        assert!(!schema("type: object").is_structured());
        assert!(
            !schema("type: array\nproperties: { id: { type: integer } }").is_structured()
        );
    }
}
