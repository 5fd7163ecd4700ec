use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a declared security scheme. Unknown kinds are kept so the scheme
/// still counts towards authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "apiKey", alias = "apikey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2", alias = "oAuth2", alias = "OAuth2")]
    OAuth2,
    #[serde(rename = "openIdConnect", alias = "openidconnect")]
    OpenIdConnect,
    #[serde(rename = "mutualTLS")]
    MutualTls,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthFlow {
    #[serde(rename = "authorizationUrl", skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(rename = "tokenUrl", skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: IndexMap<String, String>,
}

/// The flows of an `oauth2` scheme, keyed by their document name. Unknown
/// flow names are dropped later.
pub type OAuthFlows = IndexMap<String, OAuthFlow>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    /// HTTP authentication scheme, e.g. `bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(
        rename = "bearerFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bearer_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
}

impl SecurityScheme {
    pub fn is_bearer(&self) -> bool {
        self.scheme_type == SecuritySchemeType::Http
            && self
                .scheme
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("bearer"))
    }
}

/// A security requirement: scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;
