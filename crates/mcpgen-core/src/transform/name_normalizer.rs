use std::collections::HashMap;

use heck::ToSnakeCase;

use crate::config::NamingConfig;
use crate::error::NamingError;
use crate::ir::ToolSpec;

/// Maximum tool name length accepted by the protocol.
pub const MAX_TOOL_NAME_LENGTH: usize = 64;

/// Python keywords and soft keywords that cannot be used as identifiers.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Map a raw operation identifier to its canonical tool name.
///
/// Overrides win outright. Otherwise the name is snake-cased, a leading HTTP
/// verb is remapped to a semantic action and, when the result is longer than
/// [`MAX_TOOL_NAME_LENGTH`], abbreviations are applied in order until it fits.
/// The result may still be too long; [`validate_tool_names`] rejects it.
///
/// Examples:
/// - `get_pets` → `list_pets`
/// - `get_pet_by_id` → `get_pet_by_id`
/// - `post_pet` → `create_pet`
/// - `put_pet_by_id` → `replace_pet_by_id`
/// - `patch_pet_by_id` → `update_pet_by_id`
/// - `findPetsByStatus` → `find_pets_by_status`
pub fn canonical_name(raw: &str, naming: &NamingConfig) -> String {
    if let Some(name) = naming.overrides.get(raw) {
        return name.clone();
    }
    if naming.overrides.values().any(|v| v == raw) {
        return raw.to_string();
    }

    let snake = camel_to_snake(raw);
    let mut name = remap_verb(&snake);

    if name.len() > MAX_TOOL_NAME_LENGTH {
        for (long, short) in &naming.abbreviations {
            name = name.replace(long.as_str(), short);
            if name.len() <= MAX_TOOL_NAME_LENGTH {
                break;
            }
        }
        if name.len() > MAX_TOOL_NAME_LENGTH {
            log::warn!(
                "tool name '{name}' is still {} characters after abbreviation",
                name.len()
            );
        }
    }
    name
}

fn remap_verb(name: &str) -> String {
    let Some((verb, rest)) = name.split_once('_') else {
        return name.to_string();
    };
    let action = match verb {
        "get" if name.contains("_by_") => "get",
        "get" => "list",
        "post" => "create",
        "put" => "replace",
        "patch" => "update",
        "delete" => "delete",
        _ => return name.to_string(),
    };
    format!("{action}_{rest}")
}

/// Insert `_` wherever a lower-case letter or digit is followed by an
/// upper-case letter, then lower-case everything.
///
/// Unlike a full word splitter this leaves acronym runs intact
/// (`PetAPI` → `pet_api`, `HTTPClient` → `httpclient`), which is what group
/// identifiers derived from class names rely on.
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        if ch.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
        prev = Some(ch);
    }
    out
}

/// Python-safe snake-case identifier for an arbitrary wire name, e.g.
/// `petId` → `pet_id`, `X-Request-ID` → `x_request_id`, `from` → `var_from`.
pub fn python_identifier(name: &str) -> String {
    let mut ident = name.to_snake_case();
    if ident.is_empty() {
        ident = "unnamed".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident = format!("var_{ident}");
    }
    if PYTHON_KEYWORDS.contains(&ident.as_str()) {
        ident = format!("var_{ident}");
    }
    ident
}

/// Whether `name` can be emitted as a Python identifier as-is.
pub fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !PYTHON_KEYWORDS.contains(&name)
}

/// Enforce that every tool name of a group is unique and within the length
/// limit. Runs before any source text is emitted.
pub fn validate_tool_names(group: &str, tools: &[ToolSpec]) -> Result<(), NamingError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for tool in tools {
        if tool.tool_name.len() > MAX_TOOL_NAME_LENGTH {
            return Err(NamingError::Overflow {
                group: group.to_string(),
                name: tool.tool_name.clone(),
                len: tool.tool_name.len(),
                max: MAX_TOOL_NAME_LENGTH,
            });
        }
        if let Some(first) = seen.insert(&tool.tool_name, &tool.method_name) {
            return Err(NamingError::Collision {
                group: group.to_string(),
                name: tool.tool_name.clone(),
                first: first.to_string(),
                second: tool.method_name.clone(),
            });
        }
    }
    Ok(())
}
