use heck::{ToPascalCase, ToSnakeCase};
use indexmap::IndexMap;

use super::{
    FieldDescriptor, GROUP_CLASS_SUFFIX, GroupDescriptor, MethodDescriptor, ModelDescriptor,
    OperationCatalog, ParamDescriptor, ParamType,
};
use crate::error::{CatalogError, ResolveError};
use crate::parse::operation::Operation;
use crate::parse::operation::{Parameter, ParameterLocation, ParameterRef};
use crate::parse::ref_resolve::{NamedSchema, RefResolver};
use crate::parse::schema::{SchemaRef, SchemaType};
use crate::parse::spec::OpenApiSpec;
use crate::parse::validate_version;
use crate::transform::name_normalizer::{camel_to_snake, python_identifier};

/// Tag used for operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// Suffixes of the raw-response variants a generated client exposes next to
/// every operation.
const RAW_VARIANT_SUFFIXES: [&str; 2] = ["_with_http_info", "_without_preload_content"];

/// Derive the operation catalog a generated Python client would expose for
/// this document.
pub fn derive(spec: &OpenApiSpec) -> Result<OperationCatalog, CatalogError> {
    validate_version(spec)?;
    let resolver = RefResolver::new(spec);
    let mut models = component_models(spec, &resolver);
    let mut groups: IndexMap<String, GroupDescriptor> = IndexMap::new();

    for (path, item) in &spec.paths {
        for (verb, op) in item.operations() {
            let class_name = group_class_name(op.tags.first().map(String::as_str));
            let method_name = match &op.operation_id {
                Some(id) => method_name_for(id),
                None => route_method_name(verb, path),
            };
            log::debug!("{verb} {path} -> {class_name}.{method_name}");

            let params =
                collect_params(&resolver, &item.parameters, op, &method_name, &mut models)?;
            let base = MethodDescriptor {
                name: method_name,
                summary: op_summary(op),
                description: op.description.clone(),
                params,
                operation_id: op.operation_id.clone(),
            };

            let group = groups
                .entry(class_name.clone())
                .or_insert_with(|| GroupDescriptor {
                    class_name,
                    methods: Vec::new(),
                });
            for suffix in RAW_VARIANT_SUFFIXES {
                group.methods.push(MethodDescriptor {
                    name: format!("{}{suffix}", base.name),
                    ..base.clone()
                });
            }
            group.methods.push(base);
        }
    }

    if groups.is_empty() {
        return Err(CatalogError::Empty);
    }

    groups.sort_keys();
    let groups = groups
        .into_values()
        .map(|mut g| {
            g.methods.sort_by(|a, b| a.name.cmp(&b.name));
            g
        })
        .collect();

    Ok(OperationCatalog { groups, models })
}

/// Class name of the group owning operations with this primary tag.
pub fn group_class_name(tag: Option<&str>) -> String {
    let pascal = tag.unwrap_or(DEFAULT_TAG).to_pascal_case();
    let pascal = if pascal.is_empty() {
        DEFAULT_TAG.to_pascal_case()
    } else {
        pascal
    };
    format!("{pascal}{GROUP_CLASS_SUFFIX}")
}

/// Group id for a primary tag, e.g. `store-orders` → `store_orders_api`.
pub fn group_id_for_tag(tag: Option<&str>) -> String {
    camel_to_snake(&group_class_name(tag))
}

/// Client method name for an `operationId`, e.g. `getPetById` → `get_pet_by_id`.
pub fn method_name_for(operation_id: &str) -> String {
    let cleaned: String = operation_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let snake = camel_to_snake(&cleaned);
    let mut collapsed = String::with_capacity(snake.len());
    for part in snake.split('_').filter(|p| !p.is_empty()) {
        if !collapsed.is_empty() {
            collapsed.push('_');
        }
        collapsed.push_str(part);
    }
    python_identifier(&collapsed)
}

/// Class name the generated client gives a component schema, e.g.
/// `Job-Input` → `JobInput`, `200_response` → `Model200Response`.
pub fn model_class_name(schema_name: &str) -> String {
    let mut class = String::with_capacity(schema_name.len());
    for part in schema_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
    {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            class.push(first.to_ascii_uppercase());
            class.push_str(chars.as_str());
        }
    }
    if class.is_empty() || class.starts_with(|c: char| c.is_ascii_digit()) {
        class.insert_str(0, "Model");
    }
    class
}

/// Method name for an operation without an `operationId`, built from the
/// route: `GET /pets/{petId}/photos` → `get_pets_photos_by_pet_id`.
fn route_method_name(verb: &str, path: &str) -> String {
    let mut resources = Vec::new();
    let mut params = Vec::new();
    for seg in path.split('/').filter(|s| !s.is_empty()) {
        match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => params.push(param.to_snake_case()),
            None => resources.push(seg.to_snake_case()),
        }
    }
    let mut name = verb.to_string();
    if !resources.is_empty() {
        name.push('_');
        name.push_str(&resources.join("_"));
    }
    if !params.is_empty() {
        name.push_str("_by_");
        name.push_str(&params.join("_and_"));
    }
    name
}

fn op_summary(op: &Operation) -> Option<String> {
    op.summary
        .as_deref()
        .or(op.description.as_deref())
        .and_then(|text| text.lines().map(str::trim).find(|l| !l.is_empty()))
        .map(str::to_string)
}

fn collect_params(
    resolver: &RefResolver<'_>,
    path_level: &[ParameterRef],
    op: &Operation,
    method_name: &str,
    models: &mut IndexMap<String, ModelDescriptor>,
) -> Result<Vec<ParamDescriptor>, ResolveError> {
    // Operation-level parameters override path-level ones with the same name
    // and location.
    let mut merged: IndexMap<(&str, ParameterLocation), &Parameter> = IndexMap::new();
    for param in path_level.iter().chain(&op.parameters) {
        let param = resolver.parameter(param)?;
        if param.location == ParameterLocation::Cookie {
            log::debug!("{method_name}: skipping cookie parameter {}", param.name);
            continue;
        }
        merged.insert((param.name.as_str(), param.location), param);
    }

    let mut required = Vec::new();
    let mut optional = Vec::new();
    for param in merged.values() {
        let is_required = param.required || param.location == ParameterLocation::Path;
        let ty = match &param.schema {
            Some(schema) => classify(resolver, schema),
            None => ParamType::String,
        };
        let descriptor = ParamDescriptor {
            name: python_identifier(&param.name),
            ty,
            has_default: !is_required,
            description: param.description.clone(),
        };
        if is_required {
            required.push(descriptor);
        } else {
            optional.push(descriptor);
        }
    }

    if let Some(body) = &op.request_body {
        let body = resolver.request_body(body)?;
        if let Some(schema) = body.payload_schema() {
            let named = resolver.schema(schema)?;
            let (name, ty) = match named.name {
                Some(model) if named.schema.is_structured() => {
                    let model = model_class_name(model);
                    (python_identifier(&model), ParamType::Model { name: model })
                }
                None if named.schema.is_structured() => {
                    let model = format!("{}Request", method_name.to_pascal_case());
                    let descriptor = model_descriptor(resolver, named);
                    models.insert(model.clone(), descriptor);
                    (python_identifier(&model), ParamType::Model { name: model })
                }
                _ => ("body".to_string(), classify(resolver, schema)),
            };
            let descriptor = ParamDescriptor {
                name,
                ty,
                has_default: !body.required,
                description: body.description.clone(),
            };
            if body.required {
                required.push(descriptor);
            } else {
                optional.push(descriptor);
            }
        }
    }

    required.extend(optional);
    for transport in ["_request_timeout", "_headers"] {
        required.push(ParamDescriptor {
            name: transport.to_string(),
            ty: ParamType::Unsupported,
            has_default: true,
            description: None,
        });
    }
    Ok(required)
}

/// Classify a schema into a parameter type. Unresolvable references degrade
/// to [`ParamType::Unsupported`] rather than failing derivation.
fn classify(resolver: &RefResolver<'_>, schema: &SchemaRef) -> ParamType {
    let named = match resolver.schema(schema) {
        Ok(named) => named,
        Err(err) => {
            log::warn!("cannot classify schema: {err}");
            return ParamType::Unsupported;
        }
    };
    let s = named.schema;
    if let Some(name) = named.name
        && s.is_structured()
    {
        return ParamType::Model {
            name: model_class_name(name),
        };
    }
    match s.primary_type() {
        Some(SchemaType::String) => ParamType::String,
        Some(SchemaType::Integer) => ParamType::Integer,
        Some(SchemaType::Number) => ParamType::Number,
        Some(SchemaType::Boolean) => ParamType::Boolean,
        Some(SchemaType::Array) => {
            let items = s
                .items
                .as_deref()
                .map(|items| classify(resolver, items))
                .unwrap_or(ParamType::String);
            ParamType::array_of(items)
        }
        Some(SchemaType::Object) => ParamType::Object,
        Some(SchemaType::Null) => ParamType::Unsupported,
        None if !s.enum_values.is_empty() => ParamType::String,
        None if s.is_structured() => ParamType::Object,
        None => ParamType::Unsupported,
    }
}

fn component_models(
    spec: &OpenApiSpec,
    resolver: &RefResolver<'_>,
) -> IndexMap<String, ModelDescriptor> {
    let mut models = IndexMap::new();
    let Some(components) = &spec.components else {
        return models;
    };
    for (name, schema) in &components.schemas {
        let named = match resolver.schema(schema) {
            Ok(named) => named,
            Err(err) => {
                log::warn!("skipping model {name}: {err}");
                continue;
            }
        };
        if named.schema.is_structured() {
            let descriptor = model_descriptor(resolver, named);
            models.insert(model_class_name(name), descriptor);
        }
    }
    models
}

fn model_descriptor(resolver: &RefResolver<'_>, named: NamedSchema<'_>) -> ModelDescriptor {
    let schema = named.schema;
    let fields = schema
        .properties
        .iter()
        .map(|(wire, prop)| {
            let name = python_identifier(wire);
            let description = resolver
                .schema(prop)
                .ok()
                .and_then(|p| p.schema.description.clone());
            FieldDescriptor {
                alias: (name != *wire).then(|| wire.clone()),
                name,
                ty: classify(resolver, prop),
                required: schema.required.iter().any(|r| r == wire),
                description,
            }
        })
        .collect();
    ModelDescriptor { fields }
}
