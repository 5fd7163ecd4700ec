use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::parse::security::SecurityScheme;

/// Scope used when the document declares no global security requirements.
pub const FALLBACK_SCOPE: &str = "backend:read";

/// Audience used when the document has no `x-audience` extension.
pub const FALLBACK_AUDIENCE: &str = "backend-api";

/// The four OAuth2 flow kinds a description may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OAuthFlowKind {
    #[serde(rename = "authorizationCode")]
    AuthorizationCode,
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "clientCredentials")]
    ClientCredentials,
}

impl OAuthFlowKind {
    pub const ALL: [OAuthFlowKind; 4] = [
        OAuthFlowKind::AuthorizationCode,
        OAuthFlowKind::Implicit,
        OAuthFlowKind::Password,
        OAuthFlowKind::ClientCredentials,
    ];

    /// The key used for this flow in a description's `flows` object.
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthFlowKind::AuthorizationCode => "authorizationCode",
            OAuthFlowKind::Implicit => "implicit",
            OAuthFlowKind::Password => "password",
            OAuthFlowKind::ClientCredentials => "clientCredentials",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for OAuthFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one OAuth2 flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OAuthFlowConfig {
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub refresh_url: Option<String>,
    pub scopes: BTreeMap<String, String>,
}

/// OAuth2 configuration of a single `oauth2` scheme.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OAuthConfig {
    pub scheme_name: String,
    pub flows: BTreeMap<OAuthFlowKind, OAuthFlowConfig>,
    /// Union of every flow's scopes.
    pub all_scopes: BTreeMap<String, String>,
}

impl OAuthConfig {
    /// Token endpoint of the first flow that declares one.
    pub fn token_url(&self) -> Option<&str> {
        self.flows.values().find_map(|f| f.token_url.as_deref())
    }
}

/// Security configuration extracted from the description document.
///
/// The default value is the "no authentication" configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SecurityConfig {
    pub schemes: BTreeMap<String, SecurityScheme>,
    pub global_security: Vec<BTreeMap<String, Vec<String>>>,
    pub default_scopes: Vec<String>,
    pub oauth_config: Option<OAuthConfig>,
    pub bearer_format: Option<String>,
    pub jwks_uri: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl SecurityConfig {
    pub fn has_authentication(&self) -> bool {
        !self.schemes.is_empty() || self.oauth_config.is_some()
    }

    pub fn get_jwks_uri(&self, backend_url: &str) -> String {
        match &self.jwks_uri {
            Some(uri) => uri.clone(),
            None => format!(
                "{}/.well-known/jwks.json",
                backend_url.trim_end_matches('/')
            ),
        }
    }

    pub fn get_issuer(&self, backend_url: &str) -> String {
        self.issuer
            .clone()
            .unwrap_or_else(|| backend_url.to_string())
    }

    pub fn get_audience(&self) -> &str {
        self.audience.as_deref().unwrap_or(FALLBACK_AUDIENCE)
    }
}
