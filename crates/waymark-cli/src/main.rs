//! WAYMARK CLI
//!
//! Peer bootstrapping from the channel graph and BOLT-0010 DNS seeds

mod sources;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use waymark_bootstrap::dns::{decode_node_host, encode_node_label};
use waymark_bootstrap::{BootstrapConfig, ExclusionSet, multi_source_bootstrap_with};

/// WAYMARK - find an initial set of peers to connect to
#[derive(Parser)]
#[command(name = "waymark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path [default: <config dir>/waymark/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one bootstrap pass and print the peers found
    Sample {
        /// Number of peer addresses to gather [default: target_peers from config]
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Public key (hex) of a peer to leave out; may be repeated
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Print addresses as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode or decode DNS seed node labels
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum LabelAction {
    /// Encode a public key (hex) as a node label
    Encode {
        /// Compressed public key, hex
        #[arg(required = true)]
        public_key: String,
    },

    /// Decode the public key carried by a node hostname
    Decode {
        /// Node hostname or bare label
        #[arg(required = true)]
        host: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = if config_path.exists() {
        BootstrapConfig::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        BootstrapConfig::default()
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Sample {
            count,
            exclude,
            json,
        } => {
            sample(&config, count, &exclude, json)?;
        }
        Commands::Label { action } => match action {
            LabelAction::Encode { public_key } => {
                let public_key = sources::parse_public_key(&public_key)?;
                println!("{}", encode_node_label(&public_key)?);
            }
            LabelAction::Decode { host } => {
                let public_key = decode_node_host(&host)?;
                println!("{}", hex::encode(public_key.serialize()));
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => init_config(&config_path, force)?,
            ConfigAction::Show => print!("{}", toml::to_string_pretty(&config)?),
        },
    }

    Ok(())
}

/// Default config path
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("waymark/config.toml")
}

/// Run one bootstrap pass over the configured sources
fn sample(
    config: &BootstrapConfig,
    count: Option<u32>,
    exclude: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let count = count.unwrap_or(config.target_peers);
    let exclude = exclude
        .iter()
        .map(|key| sources::parse_node_id(key))
        .collect::<anyhow::Result<ExclusionSet>>()?;

    let mut sources = sources::build_sources(config)?;
    if sources.is_empty() {
        anyhow::bail!("No bootstrap sources configured (set graph.snapshot or dns.seeds)");
    }

    let addrs = multi_source_bootstrap_with(&exclude, count, &mut sources, config.cross_source);

    if json {
        println!("{}", serde_json::to_string_pretty(&addrs)?);
    } else {
        for addr in &addrs {
            println!("{addr}");
        }
    }

    if addrs.len() < count as usize {
        tracing::warn!("Only found {} of {} requested peers", addrs.len(), count);
    }

    Ok(())
}

/// Write the default configuration to `path`
fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    BootstrapConfig::generated().save(path)?;
    println!("Configuration written to: {}", path.display());

    Ok(())
}
