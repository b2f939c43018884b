use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use tokio_util::sync::CancellationToken;

use graph_client::{GraphClient, GraphConfig, TokenSource};
use intake_core::{paths, Config, FormSubmission};

#[derive(Parser)]
#[command(name = "protocol-intake")]
#[command(about = "Stability protocol intake: workbook download and form assembly")]
#[command(version)]
struct Cli {
    /// Settings file (environment variables override it)
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and populate the token cache
    Login,
    /// Download the protocol workbook from the signed-in user's drive
    Fetch {
        /// Path of the workbook inside the drive
        #[arg(long)]
        remote: Option<String>,
        /// Destination file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Assemble the replacements mapping from a filled answers file
    Submit {
        /// TOML file with the form answers
        #[arg(long)]
        input: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long, default_value = "false")]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::from_file_then_env(&cli.config);

    match cli.command {
        Commands::Login => run_login(&config).await,
        Commands::Fetch { remote, out } => run_fetch(&config, remote, out).await,
        Commands::Submit { input, pretty } => run_submit(&input, pretty),
    }
}

fn graph_config(config: &Config) -> GraphConfig {
    let mut graph = GraphConfig::new(
        config.client_id.clone(),
        config.scopes.clone(),
        config.cache_file.clone(),
    );
    if let Some(authority) = &config.authority {
        graph.authority = authority.clone();
    }
    if let Some(graph_base) = &config.graph_base {
        graph.graph_base = graph_base.clone();
    }
    graph.danger_accept_invalid_certs = config.danger_accept_invalid_certs;
    graph
}

/// Ctrl-C cancels the device-flow wait instead of killing the process
/// mid-write.
fn ctrl_c_cancellation() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

async fn run_login(config: &Config) -> anyhow::Result<()> {
    paths::ensure_intake_dir().context("creating app directory")?;
    let client = GraphClient::new(graph_config(config)).context("building HTTP client")?;
    let token = client
        .acquire_token(&ctrl_c_cancellation())
        .await
        .context("acquiring token")?;

    let how = match token.source {
        TokenSource::Cache => "cached token",
        TokenSource::Refresh => "silent refresh",
        TokenSource::DeviceCode => "device-code sign-in",
    };
    println!(
        "Signed in via {how}; token valid until {}",
        token.expires_on.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}

async fn run_fetch(
    config: &Config,
    remote: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let remote = remote.unwrap_or_else(|| config.remote_path.clone());
    let out = out.unwrap_or_else(|| config.output_dir.join(artifact_file_name(&remote)));

    paths::ensure_intake_dir().context("creating app directory")?;
    let client = GraphClient::new(graph_config(config)).context("building HTTP client")?;
    info!("fetching {remote} to {}", out.display());
    let saved = client
        .download(&remote, &out, &ctrl_c_cancellation())
        .await
        .with_context(|| format!("downloading {remote}"))?;

    println!("File downloaded and saved to: {}", saved.display());
    Ok(())
}

fn run_submit(input: &Path, pretty: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading answers file {}", input.display()))?;
    let submission: FormSubmission =
        toml::from_str(&raw).with_context(|| format!("parsing {}", input.display()))?;

    let replacements = submission.replacements();
    let json = if pretty {
        serde_json::to_string_pretty(&replacements)?
    } else {
        serde_json::to_string(&replacements)?
    };
    println!("{json}");
    Ok(())
}

fn artifact_file_name(remote: &str) -> String {
    Path::new(remote)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "downloaded.xlsx".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_is_the_remote_basename() {
        assert_eq!(
            artifact_file_name("Docs/Protocol Automation EXCEL Grid.xlsx"),
            "Protocol Automation EXCEL Grid.xlsx"
        );
        assert_eq!(artifact_file_name("grid.xlsx"), "grid.xlsx");
    }

    #[test]
    fn overrides_flow_into_the_graph_config() {
        let mut config = Config::default();
        config.authority = Some("http://localhost:9999".to_string());
        config.danger_accept_invalid_certs = true;

        let graph = graph_config(&config);
        assert_eq!(graph.authority, "http://localhost:9999");
        assert!(graph.danger_accept_invalid_certs);
        assert_eq!(graph.client_id, config.client_id);
    }
}
