//! Metadata and security extraction.
//!
//! Extraction never fails: a document that cannot be read in either
//! serialization form yields the defaults and a warning.

pub mod metadata;
pub mod security;

pub use metadata::metadata_from_spec;
pub use security::security_from_spec;

use crate::ir::{ApiMetadata, SecurityConfig};
use crate::parse;

pub fn extract_metadata(document: &str) -> ApiMetadata {
    match parse::from_str(document) {
        Ok(spec) => metadata_from_spec(&spec),
        Err(err) => {
            log::warn!("cannot read API description, using default metadata: {err}");
            ApiMetadata::default()
        }
    }
}

pub fn extract_security(document: &str) -> SecurityConfig {
    match parse::from_str(document) {
        Ok(spec) => security_from_spec(&spec),
        Err(err) => {
            log::warn!("cannot read API description, assuming no authentication: {err}");
            SecurityConfig::default()
        }
    }
}
