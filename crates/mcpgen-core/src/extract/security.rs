use std::collections::{BTreeMap, BTreeSet};

use crate::ir::security::FALLBACK_SCOPE;
use crate::ir::{OAuthConfig, OAuthFlowConfig, OAuthFlowKind, SecurityConfig};
use crate::parse::security::{SecurityScheme, SecuritySchemeType};
use crate::parse::spec::OpenApiSpec;

/// Bearer format recorded for `http`/`bearer` schemes that do not name one.
pub const DEFAULT_BEARER_FORMAT: &str = "JWT";

/// Build [`SecurityConfig`] from a parsed document.
///
/// A document without security schemes yields the default, unauthenticated
/// configuration.
pub fn security_from_spec(spec: &OpenApiSpec) -> SecurityConfig {
    let schemes: BTreeMap<String, SecurityScheme> = spec
        .components
        .as_ref()
        .map(|c| {
            c.security_schemes
                .iter()
                .map(|(name, scheme)| (name.clone(), scheme.clone()))
                .collect()
        })
        .unwrap_or_default();
    if schemes.is_empty() {
        log::debug!("no security schemes declared");
        return SecurityConfig::default();
    }

    let global_security: Vec<BTreeMap<String, Vec<String>>> = spec
        .security
        .iter()
        .flatten()
        .map(|req| req.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .collect();

    let scopes: BTreeSet<&String> = global_security
        .iter()
        .flat_map(|req| req.values().flatten())
        .collect();
    let default_scopes = if scopes.is_empty() {
        vec![FALLBACK_SCOPE.to_string()]
    } else {
        scopes.into_iter().cloned().collect()
    };

    let mut oauth_configs = schemes
        .iter()
        .filter(|(_, s)| s.scheme_type == SecuritySchemeType::OAuth2)
        .map(|(name, scheme)| oauth_config(name, scheme));
    let oauth = oauth_configs.next();
    for extra in oauth_configs {
        log::debug!(
            "oauth2 scheme {} ignored, using {}",
            extra.scheme_name,
            oauth.as_ref().map(|o| o.scheme_name.as_str()).unwrap_or_default()
        );
    }

    let bearer_format = schemes
        .values()
        .find(|s| s.is_bearer())
        .map(|s| {
            s.bearer_format
                .clone()
                .unwrap_or_else(|| DEFAULT_BEARER_FORMAT.to_string())
        });

    SecurityConfig {
        schemes,
        global_security,
        default_scopes,
        oauth_config: oauth,
        bearer_format,
        jwks_uri: spec.extension_str("x-jwks-uri").map(str::to_string),
        issuer: spec.extension_str("x-issuer").map(str::to_string),
        audience: spec.extension_str("x-audience").map(str::to_string),
    }
}

fn oauth_config(name: &str, scheme: &SecurityScheme) -> OAuthConfig {
    let mut config = OAuthConfig {
        scheme_name: name.to_string(),
        ..OAuthConfig::default()
    };
    let Some(flows) = &scheme.flows else {
        log::warn!("oauth2 scheme {name} declares no flows");
        return config;
    };
    for (key, flow) in flows.iter() {
        let Some(kind) = OAuthFlowKind::from_key(key) else {
            log::debug!("oauth2 scheme {name}: ignoring unknown flow {key}");
            continue;
        };
        let scopes: BTreeMap<String, String> = flow
            .scopes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        config
            .all_scopes
            .extend(scopes.iter().map(|(k, v)| (k.clone(), v.clone())));
        config.flows.insert(
            kind,
            OAuthFlowConfig {
                authorization_url: flow.authorization_url.clone(),
                token_url: flow.token_url.clone(),
                refresh_url: flow.refresh_url.clone(),
                scopes,
            },
        );
    }
    config
}
