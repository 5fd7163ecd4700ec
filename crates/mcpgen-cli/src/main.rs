use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use mcpgen_core::catalog::{self, OperationCatalog};
use mcpgen_core::config::{
    self, CONFIG_FILE_NAME, CompositionStrategy, McpgenConfig, NamingConfig, ResourcePrefixFormat,
};
use mcpgen_core::ir::GenerationInput;
use mcpgen_core::parse::{self, spec::OpenApiSpec};
use mcpgen_core::transform;
use mcpgen_core::{CodeGenerator, GeneratedFile};
use mcpgen_fastmcp::{FastMcpConfig, FastMcpGenerator};

#[derive(Parser)]
#[command(
    name = "mcpgen",
    about = "Generate FastMCP servers from OpenAPI descriptions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate server modules, the composed server and tests
    Generate {
        /// Path to the API description (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Pre-computed operation catalog (derived from the description when omitted)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Composition strategy of the top-level server
        #[arg(long)]
        strategy: Option<StrategyArg>,

        /// Address prefix format for composed resources
        #[arg(long)]
        prefix_format: Option<PrefixFormatArg>,
    },

    /// Validate an API description and the tool names it produces
    Validate {
        /// Path to the API description
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the tools and resources an API description produces
    Inspect {
        /// Path to the API description
        #[arg(short, long)]
        input: PathBuf,

        /// Pre-computed operation catalog
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new mcpgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Mount,
    Import,
}

impl From<StrategyArg> for CompositionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Mount => CompositionStrategy::Mount,
            StrategyArg::Import => CompositionStrategy::Import,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PrefixFormatArg {
    Path,
    Protocol,
}

impl From<PrefixFormatArg> for ResourcePrefixFormat {
    fn from(arg: PrefixFormatArg) -> Self {
        match arg {
            PrefixFormatArg::Path => ResourcePrefixFormat::Path,
            PrefixFormatArg::Protocol => ResourcePrefixFormat::Protocol,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            catalog,
            output,
            strategy,
            prefix_format,
        } => cmd_generate(GenerateArgs {
            input,
            catalog,
            output,
            strategy,
            prefix_format,
        }),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect {
            input,
            catalog,
            format,
        } => cmd_inspect(input, catalog, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "mcpgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

struct GenerateArgs {
    input: Option<PathBuf>,
    catalog: Option<PathBuf>,
    output: Option<PathBuf>,
    strategy: Option<StrategyArg>,
    prefix_format: Option<PrefixFormatArg>,
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<McpgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(anyhow::Error::msg)
}

fn load_document(path: &Path) -> Result<OpenApiSpec> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read API description {}", path.display()))?;
    parse::from_str(&content)
        .with_context(|| format!("failed to parse API description {}", path.display()))
}

/// Load the catalog manifest, or derive the catalog from the description.
fn load_catalog(
    manifest: Option<&Path>,
    spec: &OpenApiSpec,
    input: &Path,
) -> Result<OperationCatalog> {
    match manifest {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read operation catalog {}", path.display()))?;
            OperationCatalog::from_str(&content)
                .with_context(|| format!("failed to load operation catalog {}", path.display()))
        }
        None => {
            log::debug!("deriving operation catalog from {}", input.display());
            catalog::derive(spec).with_context(|| {
                format!(
                    "failed to derive operation catalog from API description {}",
                    input.display()
                )
            })
        }
    }
}

fn catalog_source(manifest: Option<&Path>, input: &Path) -> String {
    match manifest {
        Some(path) => format!("operation catalog {}", path.display()),
        None => format!("operations of API description {}", input.display()),
    }
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn check_overrides(cfg: &McpgenConfig) -> Result<FastMcpConfig> {
    let fastmcp = FastMcpConfig::from(cfg);
    fastmcp
        .validate()
        .with_context(|| format!("invalid naming overrides in {CONFIG_FILE_NAME}"))?;
    Ok(fastmcp)
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(strategy) = args.strategy {
        cfg.composition.strategy = strategy.into();
    }
    if let Some(prefix_format) = args.prefix_format {
        cfg.composition.resource_prefix_format = prefix_format.into();
    }

    let input = args.input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let manifest = args.catalog.or_else(|| cfg.catalog.as_ref().map(PathBuf::from));
    let output_dir = args.output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let fastmcp = check_overrides(&cfg)?;

    let spec = load_document(&input)?;
    let catalog = load_catalog(manifest.as_deref(), &spec, &input)?;
    let generation_input = GenerationInput::new(&spec, catalog);

    eprintln!(
        "Generating {} ({} strategy) → {}",
        generation_input.metadata.title,
        cfg.composition.strategy,
        output_dir.display()
    );

    // Render everything before the first write.
    let files = FastMcpGenerator
        .generate(&generation_input, &fastmcp)
        .with_context(|| {
            format!(
                "cannot generate tools from {}",
                catalog_source(manifest.as_deref(), &input)
            )
        })?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;

    eprintln!("Generated {} files in {}", files.len(), output_dir.display());
    eprintln!(
        "\nGenerated files are overwritten on the next run; do not edit them manually."
    );
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    check_overrides(&cfg)?;
    let spec = load_document(&input)?;
    let generation_input = GenerationInput::new(&spec, load_catalog(None, &spec, &input)?);

    let metadata = &generation_input.metadata;
    eprintln!("Valid API description: {}", metadata.title);
    eprintln!("  Version: {}", metadata.version);
    eprintln!("  Backend: {}", metadata.backend_url());
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!(
        "  Authentication: {}",
        if generation_input.security.has_authentication() {
            "yes"
        } else {
            "no"
        }
    );

    let summary = summarize_groups(&generation_input, &cfg.naming)
        .with_context(|| catalog_source(None, &input))?;
    eprintln!("  Groups: {}", summary.len());
    eprintln!(
        "  Tools: {}",
        summary.iter().map(|g| g.tools.len()).sum::<usize>()
    );
    eprintln!(
        "  Resources: {}",
        summary.iter().map(|g| g.resources.len()).sum::<usize>()
    );

    eprintln!("Validation successful.");
    Ok(())
}

struct GroupSummary {
    id: String,
    class_name: String,
    tools: Vec<(String, String)>,
    resources: Vec<String>,
}

fn summarize_groups(input: &GenerationInput, naming: &NamingConfig) -> Result<Vec<GroupSummary>> {
    input
        .catalog
        .api_groups()
        .into_iter()
        .map(|group| -> Result<GroupSummary> {
            let id = group.api_var_name();
            let specs =
                transform::build_group(group, &input.catalog, input.endpoints_for(&id), naming)?;
            Ok(GroupSummary {
                tools: specs
                    .tools
                    .into_iter()
                    .map(|t| (t.tool_name, t.method_name))
                    .collect(),
                resources: specs.resources.into_iter().map(|r| r.uri_template).collect(),
                class_name: group.class_name.clone(),
                id,
            })
        })
        .collect()
}

fn cmd_inspect(input: PathBuf, manifest: Option<PathBuf>, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let spec = load_document(&input)?;
    let catalog = load_catalog(manifest.as_deref(), &spec, &input)?;
    let generation_input = GenerationInput::new(&spec, catalog);

    let summary = build_inspect_summary(&generation_input, &cfg.naming)
        .with_context(|| catalog_source(manifest.as_deref(), &input))?;

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(
    input: &GenerationInput,
    naming: &NamingConfig,
) -> Result<serde_json::Value> {
    let groups: Vec<serde_json::Value> = summarize_groups(input, naming)?
        .into_iter()
        .map(|g| {
            serde_json::json!({
                "id": g.id,
                "class": g.class_name,
                "tools": g.tools.iter().map(|(tool, method)| serde_json::json!({
                    "name": tool,
                    "method": method,
                })).collect::<Vec<_>>(),
                "resources": g.resources,
            })
        })
        .collect();

    let security = &input.security;
    Ok(serde_json::json!({
        "info": {
            "title": input.metadata.title,
            "version": input.metadata.version,
            "backend_url": input.metadata.backend_url(),
            "server_name": input.metadata.server_name(),
        },
        "security": {
            "authentication": security.has_authentication(),
            "schemes": security.schemes.keys().collect::<Vec<_>>(),
            "default_scopes": security.default_scopes,
            "oauth_flows": security
                .oauth_config
                .as_ref()
                .map(|o| o.flows.keys().map(|k| k.as_str()).collect::<Vec<_>>())
                .unwrap_or_default(),
        },
        "groups": groups,
    }))
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
