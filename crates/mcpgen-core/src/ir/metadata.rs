use serde::Serialize;

use crate::parse::spec::{Contact, ExternalDocs, License, Tag};

/// Used when the description declares no servers.
pub const FALLBACK_BACKEND_URL: &str = "http://localhost:3001";

/// API metadata extracted from the description document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiMetadata {
    pub title: String,
    pub description: String,
    pub version: String,
    pub contact: Contact,
    pub license: Option<License>,
    pub terms_of_service: Option<String>,
    /// Server base URLs in document order.
    pub servers: Vec<String>,
    pub external_docs: Option<ExternalDocs>,
    pub tags: Vec<Tag>,
    pub icon_url: Option<String>,
    pub icon_emoji: Option<String>,
}

impl Default for ApiMetadata {
    fn default() -> Self {
        Self {
            title: "Generated API".to_string(),
            description: String::new(),
            version: "0.0.1".to_string(),
            contact: Contact::default(),
            license: None,
            terms_of_service: None,
            servers: Vec::new(),
            external_docs: None,
            tags: Vec::new(),
            icon_url: None,
            icon_emoji: None,
        }
    }
}

impl ApiMetadata {
    pub fn backend_url(&self) -> &str {
        self.servers
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_BACKEND_URL)
    }

    /// Identifier-safe server name derived from the title, e.g.
    /// `"Swagger Petstore - OpenAPI 3.0"` → `swagger_petstore_openapi_3_0`.
    /// Titles starting with a digit get an `api_` prefix.
    pub fn server_name(&self) -> String {
        let mut name = String::with_capacity(self.title.len());
        for ch in self.title.trim().chars() {
            let ch = match ch {
                ' ' | '-' | '.' => '_',
                c if c.is_ascii_alphanumeric() || c == '_' => c.to_ascii_lowercase(),
                _ => continue,
            };
            if ch == '_' && name.ends_with('_') {
                continue;
            }
            name.push(ch);
        }
        let name = name.trim_matches('_');
        match name.chars().next() {
            None => "generated_api".to_string(),
            Some(first) if first.is_ascii_digit() => format!("api_{name}"),
            Some(_) => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_url_fallback() {
        let meta = ApiMetadata::default();
        assert_eq!(meta.backend_url(), FALLBACK_BACKEND_URL);

        let meta = ApiMetadata {
            servers: vec![
                "https://api.example.com/v1".to_string(),
                "https://staging.example.com".to_string(),
            ],
            ..ApiMetadata::default()
        };
        assert_eq!(meta.backend_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_server_name() {
        let meta = ApiMetadata {
            title: "Swagger Petstore - OpenAPI 3.0".to_string(),
            ..ApiMetadata::default()
        };
        assert_eq!(meta.server_name(), "swagger_petstore_openapi_3_0");
        assert_eq!(ApiMetadata::default().server_name(), "generated_api");

        let odd = ApiMetadata {
            title: "  ***  ".to_string(),
            ..ApiMetadata::default()
        };
        assert_eq!(odd.server_name(), "generated_api");

        let numeric = ApiMetadata {
            title: "3D Print API".to_string(),
            ..ApiMetadata::default()
        };
        assert_eq!(numeric.server_name(), "api_3d_print_api");
    }
}
