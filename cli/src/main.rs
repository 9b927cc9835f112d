//! ballot: run a ballot node, or drive ballots on one.

mod commands;
mod config;

use anyhow::Context;
use ballot_rpc::{BallotRegistry, Durability, RpcConfig, RpcServer};
use ballot_types::{BallotId, ProposalName, VoterId};
use ballot_utils::{init_logging, LogFormat};
use ballot_wallet::{LocalChannel, NodeClient, Signer};
use clap::Parser;
use commands::Action;
use config::CliConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const PRIVATE_KEY_ENV: &str = "BALLOT_PRIVATE_KEY";

#[derive(Parser)]
#[command(name = "ballot", version, about = "Weighted ballot with transitive vote delegation")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and environment variables override them.
    #[arg(long, global = true, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// URL of the ballot node.
    #[arg(long, global = true, env = "BALLOT_NODE_URL")]
    node_url: Option<String>,

    /// Snapshot directory (for `serve`, and for client commands with `--local`).
    #[arg(long, global = true, env = "BALLOT_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Apply client commands directly to the state directory instead of a node.
    #[arg(long, global = true)]
    local: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Node request timeout in seconds.
    #[arg(long, global = true, env = "BALLOT_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Hex-encoded Ed25519 private key of the caller.
    #[arg(long, global = true, env = PRIVATE_KEY_ENV, hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run a ballot node.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "BALLOT_LISTEN_ADDR")]
        listen_addr: Option<SocketAddr>,
    },
    /// Deploy a new ballot; the caller becomes chairperson.
    Deploy {
        /// Proposal names, in order.
        #[arg(required = true)]
        proposals: Vec<ProposalName>,
        /// Fixed deploy salt (random when omitted).
        #[arg(long)]
        salt: Option<u64>,
    },
    /// Grant a voter the right to vote (chairperson only).
    GiveRightToVote { ballot: BallotId, voter: VoterId },
    /// Delegate the caller's vote.
    Delegate { ballot: BallotId, delegate: VoterId },
    /// Vote for a proposal by index.
    Vote { ballot: BallotId, proposal: usize },
    /// Show proposals, counts and the winner.
    Results { ballot: BallotId },
    /// Show one voter's state.
    Voter { ballot: BallotId, voter: VoterId },
    /// Print the identity of the configured private key.
    Address,
    /// Print the resolved configuration as TOML.
    Config,
}

impl Cli {
    /// File config (or defaults) with flags and env applied on top.
    fn resolve_config(&self) -> anyhow::Result<CliConfig> {
        let mut config = match &self.config {
            Some(path) => CliConfig::from_toml_file(path)?,
            None => CliConfig::default(),
        };
        if let Some(url) = &self.node_url {
            config.node_url = url.clone();
        }
        if let Some(dir) = &self.state_dir {
            config.state_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Command::Serve {
            listen_addr: Some(addr),
        } = &self.command
        {
            config.listen_addr = *addr;
        }
        Ok(config)
    }

    fn signer(&self) -> anyhow::Result<Signer> {
        let key = self
            .private_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing environment: {PRIVATE_KEY_ENV}"))?;
        Ok(Signer::from_private_key_hex(key)?)
    }
}

/// Snapshot directory for `--local`. Without one every command would run
/// against a throwaway registry.
fn local_state_dir(config: &CliConfig) -> anyhow::Result<&Path> {
    config
        .state_dir
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--local requires --state-dir"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let action = match cli.command {
        Command::Serve { .. } => return serve(config).await,
        Command::Address => {
            println!("{}", cli.signer()?.identity());
            return Ok(());
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            return Ok(());
        }
        Command::Deploy {
            ref proposals,
            salt,
        } => Action::Deploy {
            proposals: proposals.clone(),
            salt,
        },
        Command::GiveRightToVote { ballot, voter } => Action::GiveRightToVote { ballot, voter },
        Command::Delegate { ballot, delegate } => Action::Delegate { ballot, delegate },
        Command::Vote { ballot, proposal } => Action::Vote { ballot, proposal },
        Command::Results { ballot } => Action::Results { ballot },
        Command::Voter { ballot, voter } => Action::Voter { ballot, voter },
    };

    if cli.local {
        let dir = local_state_dir(&config)?;
        let signer = cli.signer()?;
        // The snapshot is the only copy once this process exits.
        let registry = BallotRegistry::open_with(dir, Durability::Strict)?;
        let mut out = std::io::stdout().lock();
        let channel = LocalChannel::new(Arc::new(registry));
        commands::run(channel, signer, action, &mut out).await
    } else {
        let signer = cli.signer()?;
        let mut out = std::io::stdout().lock();
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = NodeClient::with_timeout(&config.node_url, timeout)?;
        commands::run(client, signer, action, &mut out).await
    }
}

async fn serve(config: CliConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting ballot node on {} (state: {})",
        config.listen_addr,
        config
            .state_dir
            .as_deref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "in memory".into()),
    );
    let server = RpcServer::new(RpcConfig {
        listen_addr: config.listen_addr,
        state_dir: config.state_dir,
    })
    .context("failed to open ballot registry")?;
    server.start(shutdown_signal()).await?;
    tracing::info!("ballot node exited cleanly");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for SIGINT: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delegate_requires_both_arguments() {
        let err = Cli::try_parse_from(["ballot", "delegate", "0x0101010101010101010101010101010101010101"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn malformed_identity_rejected_at_parse_time() {
        let err = Cli::try_parse_from([
            "ballot",
            "delegate",
            "0x0101010101010101010101010101010101010101",
            "not-an-address",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn missing_key_reported_before_submission() {
        let cli = Cli::try_parse_from([
            "ballot",
            "delegate",
            "0x0101010101010101010101010101010101010101",
            "0x0202020202020202020202020202020202020202",
        ])
        .unwrap();
        // BALLOT_PRIVATE_KEY may be set in the environment running the tests.
        let cli = Cli { private_key: None, ..cli };
        let err = cli.signer().unwrap_err();
        assert_eq!(err.to_string(), "Missing environment: BALLOT_PRIVATE_KEY");
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballot.toml");
        std::fs::write(&path, "node_url = \"http://file:1\"\nrequest_timeout_secs = 5\n").unwrap();
        let cli = Cli::try_parse_from([
            "ballot",
            "--config",
            path.to_str().unwrap(),
            "--node-url",
            "http://flag:2",
            "serve",
            "--listen-addr",
            "0.0.0.0:9000",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.node_url, "http://flag:2");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.listen_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn local_without_state_dir_is_rejected() {
        let cli = Cli::try_parse_from([
            "ballot",
            "--local",
            "vote",
            "0x0101010101010101010101010101010101010101",
            "0",
        ])
        .unwrap();
        // BALLOT_STATE_DIR may be set in the environment running the tests.
        let cli = Cli { state_dir: None, config: None, ..cli };
        let config = cli.resolve_config().unwrap();
        let err = local_state_dir(&config).unwrap_err();
        assert_eq!(err.to_string(), "--local requires --state-dir");
    }

    #[test]
    fn local_uses_configured_state_dir() {
        let cli = Cli::try_parse_from([
            "ballot",
            "--local",
            "--state-dir",
            "/tmp/ballots",
            "results",
            "0x0101010101010101010101010101010101010101",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(local_state_dir(&config).unwrap(), Path::new("/tmp/ballots"));
    }

    #[test]
    fn config_command_prints_resolved_settings() {
        let cli = Cli::try_parse_from(["ballot", "--node-url", "http://flag:2", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config));
        let cli = Cli { config: None, ..cli };
        let printed = cli.resolve_config().unwrap().to_toml_string().unwrap();
        assert!(printed.contains("node_url = \"http://flag:2\""));
    }
}
