use std::collections::HashSet;

use indexmap::IndexMap;

use super::RefOr;
use super::operation::{Parameter, ParameterRef, RequestBody, RequestBodyRef};
use super::schema::{Schema, SchemaRef};
use super::spec::{Components, OpenApiSpec};
use crate::error::ResolveError;

/// Follows `$ref` pointers into the document's components on demand.
pub struct RefResolver<'a> {
    components: Option<&'a Components>,
}

/// A schema together with the component name it was reached through, if any.
#[derive(Debug, Clone, Copy)]
pub struct NamedSchema<'a> {
    pub name: Option<&'a str>,
    pub schema: &'a Schema,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    pub fn parameter(&self, param: &'a ParameterRef) -> Result<&'a Parameter, ResolveError> {
        self.follow(param, "parameters", |c| &c.parameters).map(|(_, p)| p)
    }

    pub fn request_body(&self, body: &'a RequestBodyRef) -> Result<&'a RequestBody, ResolveError> {
        self.follow(body, "requestBodies", |c| &c.request_bodies).map(|(_, b)| b)
    }

    /// Resolve a schema, keeping the last component name on the chain so a
    /// model is still known by the name it was defined under.
    pub fn schema(&self, schema: &'a SchemaRef) -> Result<NamedSchema<'a>, ResolveError> {
        let (name, schema) = self.follow(schema, "schemas", |c| &c.schemas)?;
        Ok(NamedSchema { name, schema })
    }

    fn follow<T>(
        &self,
        start: &'a RefOr<T>,
        section: &str,
        table: impl Fn(&'a Components) -> &'a IndexMap<String, RefOr<T>>,
    ) -> Result<(Option<&'a str>, &'a T), ResolveError> {
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut name = None;
        let mut current = start;
        loop {
            let ref_path = match current {
                RefOr::Item(item) => return Ok((name, item)),
                RefOr::Ref { ref_path } => ref_path.as_str(),
            };
            if !visited.insert(ref_path) {
                return Err(ResolveError::Cycle(ref_path.to_string()));
            }
            let key = parse_ref_name(ref_path, section)?;
            let (component, target) = self
                .components
                .and_then(|c| table(c).get_key_value(key))
                .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))?;
            name = Some(component.as_str());
            current = target;
        }
    }
}

/// Extract `Foo` from `#/components/<section>/Foo`.
fn parse_ref_name<'a>(ref_path: &'a str, section: &str) -> Result<&'a str, ResolveError> {
    ref_path
        .strip_prefix("#/components/")
        .and_then(|rest| rest.split_once('/'))
        .filter(|(found, _)| *found == section)
        .map(|(_, name)| name)
        .ok_or_else(|| {
            ResolveError::InvalidRefFormat(format!(
                "{ref_path} (expected #/components/{section}/...)"
            ))
        })
}
