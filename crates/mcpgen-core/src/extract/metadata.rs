use serde_json::Value;

use crate::ir::ApiMetadata;
use crate::parse::spec::{Extensions, OpenApiSpec, Server};

/// Build [`ApiMetadata`] from a parsed document, filling gaps with defaults.
pub fn metadata_from_spec(spec: &OpenApiSpec) -> ApiMetadata {
    let defaults = ApiMetadata::default();
    let info = &spec.info;
    let (icon_url, icon_emoji) = icon_hints(&info.extensions, &spec.extensions);

    ApiMetadata {
        title: non_empty(info.title.as_deref()).unwrap_or(defaults.title),
        description: info.description.clone().unwrap_or_default(),
        version: non_empty(info.version.as_deref()).unwrap_or(defaults.version),
        contact: info.contact.clone().unwrap_or_default(),
        license: info.license.clone(),
        terms_of_service: info.terms_of_service.clone(),
        servers: server_urls(spec),
        external_docs: spec.external_docs.clone(),
        tags: spec.tags.clone(),
        icon_url,
        icon_emoji,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Server base URLs. 2.x documents describe their single server through
/// `schemes`, `host` and `basePath` at the root.
fn server_urls(spec: &OpenApiSpec) -> Vec<String> {
    if !spec.servers.is_empty() {
        return spec.servers.iter().map(Server::resolved_url).collect();
    }
    let Some(host) = spec.extension_str("host") else {
        return Vec::new();
    };
    let scheme = spec
        .extensions
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("https");
    let base_path = spec.extension_str("basePath").unwrap_or("");
    vec![format!(
        "{scheme}://{host}{}",
        base_path.trim_end_matches('/')
    )]
}

/// Icon hints from `x-logo` (object with `url`, or a plain string), `x-icon`
/// and `x-icon-emoji`, looked up on `info` first and then on the root.
fn icon_hints(info: &Extensions, root: &Extensions) -> (Option<String>, Option<String>) {
    let lookup = |key: &str| info.get(key).or_else(|| root.get(key));

    let icon_url = lookup("x-logo")
        .and_then(|logo| match logo {
            Value::String(url) => Some(url.clone()),
            Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .or_else(|| lookup("x-icon").and_then(Value::as_str).map(str::to_string));
    let icon_emoji = lookup("x-icon-emoji")
        .and_then(Value::as_str)
        .map(str::to_string);
    (icon_url, icon_emoji)
}
