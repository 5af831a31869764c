//! CLI entrypoint for anf-mcp
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anf_application::{
    ContextDefaults, CredentialManager, IdentityProviderPort, OperationRegistry,
    OperationSchemaPort, RequestDispatcher, SystemClock,
};
use anf_domain::{OperationSpec, RiskLevel};
use anf_infrastructure::{
    ClientCredentialsProvider, ConfigLoader, FileConfig, JsonSchemaConverter, ReqwestTransport,
    UnconfiguredIdentity, build_client, default_operation_spec,
};
use anf_presentation::{Cli, Command, ConsoleFormatter, ToolServer, serve};
use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        let config = load_config(&cli)?;
        eprintln!();
        eprintln!("{}", toml::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    config.validate()?;

    // === Dependency Injection ===
    let spec = Arc::new(operation_spec(&config)?);
    let schema = Arc::new(JsonSchemaConverter);

    match cli.command() {
        Command::List {
            json,
            implemented_only,
        } => {
            if json {
                let tools: Vec<Value> = spec
                    .all()
                    .filter(|op| !implemented_only || op.is_implemented())
                    .map(|op| schema.operation_to_tool(op))
                    .collect();
                println!("{}", ConsoleFormatter::format_json(&Value::Array(tools)));
            } else {
                println!("{}", ConsoleFormatter::operation_list(&spec, implemented_only));
            }
        }
        Command::Schema { name } => {
            let Some(operation) = spec.get(&name) else {
                bail!("Unknown operation: {}", name);
            };
            println!(
                "{}",
                ConsoleFormatter::format_json(&schema.operation_to_tool(operation))
            );
        }
        Command::Call { name, args } => {
            let args: Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let registry = build_registry(&config, spec)?;
            let result = match registry.dispatch(&name, args).await {
                Ok(outcome) => outcome.to_json(),
                Err(e) => e.to_result_json(),
            };
            println!("{}", ConsoleFormatter::format_json(&result));
        }
        Command::Serve => {
            let registry = Arc::new(build_registry(&config, spec)?);
            let server = Arc::new(ToolServer::new(registry, schema));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            serve(server, stdin, tokio::io::stdout()).await?;
            info!("Tool server stopped");
        }
    }

    Ok(())
}

/// Logs go to stderr (stdout carries the tool protocol) or to `--log-file`
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")
}

/// The catalog narrowed by `[server]` settings
fn operation_spec(config: &FileConfig) -> Result<OperationSpec> {
    let mut spec = default_operation_spec().context("Operation catalog is invalid")?;
    if !config.server.include_stubs {
        spec = spec.retain(|op| op.is_implemented());
    }
    if config.server.read_only {
        spec = spec.retain(|op| op.risk_level() == RiskLevel::Low);
    }
    info!("{} operations registered", spec.len());
    Ok(spec)
}

fn build_registry(config: &FileConfig, spec: Arc<OperationSpec>) -> Result<OperationRegistry> {
    let client = build_client(&config.http).context("Failed to build HTTP client")?;

    // Missing credentials are reported per call so the server still starts
    let identity: Arc<dyn IdentityProviderPort> = match config.azure.credentials() {
        Ok(credentials) => {
            let token_url = config.azure.token_endpoint(&credentials.tenant_id);
            Arc::new(ClientCredentialsProvider::new(
                client.clone(),
                token_url,
                credentials,
                config.azure.scope.clone(),
            ))
        }
        Err(e) => {
            warn!("Azure credentials unavailable: {}", e);
            Arc::new(UnconfiguredIdentity::new(e.to_string()))
        }
    };

    let credentials = Arc::new(CredentialManager::new(identity, Arc::new(SystemClock)));
    let dispatcher = Arc::new(RequestDispatcher::new(
        credentials,
        Arc::new(ReqwestTransport::new(client)),
        config.azure.management_url.clone(),
    ));

    Ok(OperationRegistry::new(spec, dispatcher).with_defaults(ContextDefaults::new(
        config.azure.subscription_id.clone(),
        config.azure.resource_group.clone(),
    )))
}
