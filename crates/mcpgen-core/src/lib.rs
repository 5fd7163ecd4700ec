pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod ir;
pub mod parse;
pub mod transform;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from the extracted metadata,
/// security configuration and operation catalog.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        input: &ir::GenerationInput,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
