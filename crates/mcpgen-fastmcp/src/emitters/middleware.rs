use mcpgen_core::GeneratedFile;
use mcpgen_core::extract::security::DEFAULT_BEARER_FORMAT;
use mcpgen_core::ir::{ApiMetadata, SecurityConfig};
use minijinja::{Environment, context};

use crate::generator::GeneratorError;

const MIDDLEWARE_FILES: [&str; 4] = [
    "__init__.py",
    "authentication.py",
    "oauth_provider.py",
    "event_store.py",
];

/// Emit the `middleware` package used by authenticated servers.
///
/// Returns no files when the document declares no security.
pub fn emit_middleware(
    env: &Environment<'_>,
    metadata: &ApiMetadata,
    security: &SecurityConfig,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    if !security.has_authentication() {
        return Ok(Vec::new());
    }

    let backend_url = metadata.backend_url();
    let ctx = context! {
        title => metadata.title,
        backend_url => backend_url,
        bearer_format => security.bearer_format.as_deref().unwrap_or(DEFAULT_BEARER_FORMAT),
        jwks_uri => security.get_jwks_uri(backend_url),
        issuer => security.get_issuer(backend_url),
        audience => security.get_audience(),
        scopes => security.default_scopes,
        token_url => security.oauth_config.as_ref().and_then(|o| o.token_url()),
    };

    MIDDLEWARE_FILES
        .iter()
        .map(|file| -> Result<GeneratedFile, GeneratorError> {
            let content = env
                .get_template(&format!("middleware/{file}.j2"))?
                .render(&ctx)?;
            Ok(GeneratedFile {
                path: format!("middleware/{file}"),
                content,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;
    use mcpgen_core::ir::OAuthConfig;

    fn secured() -> SecurityConfig {
        SecurityConfig {
            oauth_config: Some(OAuthConfig::default()),
            default_scopes: vec!["records:read".to_string(), "records:write".to_string()],
            issuer: Some("https://auth.example.com".to_string()),
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_no_files_without_authentication() {
        let env = environment().unwrap();
        let files =
            emit_middleware(&env, &ApiMetadata::default(), &SecurityConfig::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_authenticated_package() {
        let env = environment().unwrap();
        let metadata = ApiMetadata {
            servers: vec!["https://records.example.com/".to_string()],
            ..ApiMetadata::default()
        };
        let files = emit_middleware(&env, &metadata, &secured()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "middleware/__init__.py",
                "middleware/authentication.py",
                "middleware/oauth_provider.py",
                "middleware/event_store.py",
            ]
        );

        let oauth = &files[2].content;
        assert!(oauth.contains(
            "JWKS_URI = os.environ.get(\"JWKS_URI\", \"https://records.example.com/.well-known/jwks.json\")"
        ));
        assert!(oauth.contains("JWT_ISSUER = os.environ.get(\"JWT_ISSUER\", \"https://auth.example.com\")"));
        assert!(oauth.contains("JWT_AUDIENCE = os.environ.get(\"JWT_AUDIENCE\", \"backend-api\")"));
        assert!(oauth.contains("    \"records:read\",\n    \"records:write\",\n]"));
        assert!(!oauth.contains("TOKEN_URL"));

        let auth = &files[1].content;
        assert!(auth.contains("BACKEND_URL = os.environ.get(\"BACKEND_API_URL\", \"https://records.example.com/\")"));
        assert!(auth.contains("BEARER_FORMAT = \"JWT\""));
    }
}
