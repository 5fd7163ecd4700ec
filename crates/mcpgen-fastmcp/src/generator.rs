use mcpgen_core::config::{CompositionConfig, McpgenConfig, NamingConfig};
use mcpgen_core::error::NamingError;
use mcpgen_core::ir::{GenerationInput, ModuleSpec};
use mcpgen_core::transform::{self, name_normalizer::is_python_identifier};
use mcpgen_core::{CodeGenerator, GeneratedFile};
use minijinja::Environment;
use thiserror::Error;

use crate::emitters;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("'{0}' is not a usable Python identifier")]
    InvalidIdentifier(String),

    #[error("invalid generator config: {0}")]
    Config(String),
}

/// Options of the FastMCP generator.
#[derive(Debug, Clone)]
pub struct FastMcpConfig {
    pub naming: NamingConfig,
    pub composition: CompositionConfig,
    /// Emit resource templates for GET endpoints with parameters.
    pub resources: bool,
    /// Emit the pytest scaffolding.
    pub tests: bool,
}

impl Default for FastMcpConfig {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            composition: CompositionConfig::default(),
            resources: true,
            tests: true,
        }
    }
}

impl From<&McpgenConfig> for FastMcpConfig {
    fn from(config: &McpgenConfig) -> Self {
        Self {
            naming: config.naming.clone(),
            composition: config.composition,
            resources: config.resources,
            tests: config.tests,
        }
    }
}

impl FastMcpConfig {
    /// Reject naming overrides that cannot become Python function names.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        for (raw, tool) in &self.naming.overrides {
            if !is_python_identifier(tool) {
                return Err(GeneratorError::Config(format!(
                    "override for '{raw}' maps to '{tool}', which is not a valid tool name"
                )));
            }
        }
        Ok(())
    }
}

/// FastMCP 2.x server generator.
pub struct FastMcpGenerator;

impl FastMcpGenerator {
    /// Build and render one module per operation group, in group-id order.
    ///
    /// Naming problems are reported before any module is rendered.
    pub fn render_modules(
        &self,
        env: &Environment<'_>,
        input: &GenerationInput,
        config: &FastMcpConfig,
    ) -> Result<Vec<ModuleSpec>, GeneratorError> {
        let groups = input.catalog.api_groups();
        let mut built = Vec::with_capacity(groups.len());
        for group in groups {
            let endpoints: &[_] = if config.resources {
                input.endpoints_for(&group.api_var_name())
            } else {
                &[]
            };
            let specs = transform::build_group(group, &input.catalog, endpoints, &config.naming)?;
            built.push((group, specs));
        }

        built
            .into_iter()
            .map(|(group, specs)| {
                emitters::tools::render_module(
                    env,
                    &group.api_var_name(),
                    &group.class_name,
                    &specs.tools,
                    &specs.resources,
                )
            })
            .collect()
    }
}

impl CodeGenerator for FastMcpGenerator {
    type Config = FastMcpConfig;
    type Error = GeneratorError;

    fn generate(
        &self,
        input: &GenerationInput,
        config: &FastMcpConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        config.validate()?;
        let env = emitters::environment()?;
        let modules = self.render_modules(&env, input, config)?;

        let mut files = vec![GeneratedFile {
            path: "servers/__init__.py".to_string(),
            content: "\"\"\"Generated MCP server modules, one per operation group.\"\"\"\n".to_string(),
        }];
        files.extend(modules.iter().map(|m| GeneratedFile {
            path: format!("servers/{}", m.filename),
            content: m.code.clone(),
        }));

        files.push(GeneratedFile {
            path: format!(
                "{}.py",
                emitters::server::server_module_name(&input.metadata)
            ),
            content: emitters::server::compose(
                &env,
                &modules,
                &input.metadata,
                &input.security,
                config.composition.strategy,
                config.composition.resource_prefix_format,
            )?,
        });

        files.extend(emitters::middleware::emit_middleware(
            &env,
            &input.metadata,
            &input.security,
        )?);

        if config.tests {
            files.extend(emitters::tests::emit_tests(&env, &modules, &input.metadata)?);
            files.extend(emitters::tests::emit_auth_flow_tests(
                &env,
                &input.metadata,
                &input.security,
            )?);
        }

        log::info!(
            "generated {} modules with {} tools and {} resources",
            modules.len(),
            modules.iter().map(|m| m.tool_count).sum::<usize>(),
            modules.iter().map(|m| m.resource_count).sum::<usize>(),
        );
        Ok(files)
    }
}
