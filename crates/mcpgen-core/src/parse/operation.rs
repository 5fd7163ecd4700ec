use indexmap::IndexMap;
use serde::Deserialize;

use super::RefOr;
use super::schema::SchemaRef;

pub type ParameterRef = RefOr<Parameter>;
pub type RequestBodyRef = RefOr<RequestBody>;

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<SchemaRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MediaType {
    pub schema: Option<SchemaRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub content: IndexMap<String, MediaType>,
    pub required: bool,
}

impl RequestBody {
    /// Schema of the JSON payload, falling back to the first declared media
    /// type.
    pub fn payload_schema(&self) -> Option<&SchemaRef> {
        self.content
            .get("application/json")
            .or_else(|| self.content.values().next())
            .and_then(|media| media.schema.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<ParameterRef>,
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBodyRef>,
}

/// Operations of one path, keyed by HTTP method, plus the parameters they
/// share.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PathItem {
    pub parameters: Vec<ParameterRef>,
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Operations in document method order, paired with their lower-case verb.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", self.get.as_ref()),
            ("post", self.post.as_ref()),
            ("put", self.put.as_ref()),
            ("delete", self.delete.as_ref()),
            ("patch", self.patch.as_ref()),
            ("options", self.options.as_ref()),
            ("head", self.head.as_ref()),
            ("trace", self.trace.as_ref()),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.map(|o| (verb, o)))
    }
}
