use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use kube_mcp_rs::config::{ConfigLoader, ConfigOverrides, ErrorMode};
use kube_mcp_rs::handlers::KubernetesHandler;
use kube_mcp_rs::kubernetes::ToolRegistry;
use kube_mcp_rs::logging::{init_logging, LogConfig};
use kube_mcp_rs::mcp::McpServer;

#[derive(Parser, Debug)]
#[command(name = "kube-mcp", version, about = "Kubernetes MCP server over stdio")]
struct Cli {
    /// Kubeconfig used for cluster requests [default: /root/.kube/conf]
    #[arg(long, env = "KUBECONFIG_PATH")]
    kubeconfig_path: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, env = "KUBE_MCP_CONFIG")]
    config: Option<String>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, env = "KUBE_MCP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Also write daily rolling log files here
    #[arg(long, env = "KUBE_MCP_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// How tool failures are reported
    #[arg(long, value_enum, env = "KUBE_MCP_ERROR_MODE")]
    error_mode: Option<ErrorMode>,

    /// Reuse one cluster client across tool calls
    #[arg(long, env = "KUBE_MCP_REUSE_CLIENT")]
    reuse_client: bool,

    /// Print the tool catalog as JSON and exit
    #[arg(long)]
    list_tools: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            kubeconfig_path: self.kubeconfig_path.clone(),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            error_mode: self.error_mode,
            reuse_client: self.reuse_client.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Server error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load_from_file(cli.config.as_deref())
        .load_from_env()
        .with_overrides(cli.overrides())
        .build()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let registry = Arc::new(ToolRegistry::kubernetes());

    if cli.list_tools {
        let tools: Vec<_> = registry.iter().map(|tool| tool.to_tool()).collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let _guard = init_logging(&LogConfig::from_server_config(&config))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        kubeconfig = %config.kubeconfig_path.display(),
        error_mode = %config.error_mode,
        reuse_client = config.reuse_client,
        tools = registry.len(),
        "Starting Kubernetes MCP server on stdio"
    );

    let handler = KubernetesHandler::from_config(registry, &config);
    McpServer::new(Arc::new(handler))
        .run_stdio()
        .await
        .context("MCP server terminated")?;

    info!("stdin closed, shutting down");
    Ok(())
}
