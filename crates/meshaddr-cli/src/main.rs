//! meshaddr CLI
//!
//! Derive mesh network addresses from public keys.

mod config;

use clap::{Parser, Subcommand, ValueEnum};
use meshaddr::{
    AddressCodec, ContactsQuery, DerivedAddress, MemoryDirectory, NetworkPrefix, PublicKey,
    RunLengthPolicy, resolve_contacts,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

use config::Config;

/// meshaddr - public key to mesh address derivation
#[derive(Parser)]
#[command(name = "meshaddr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network prefix (hex), overrides the configuration file
    #[arg(long)]
    prefix: Option<String>,

    /// Run-length policy, overrides the configuration file
    #[arg(long)]
    policy: Option<RunLengthPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the address of one or more hex public keys
    Derive {
        /// Public keys (64 hex characters each)
        #[arg(required = true)]
        keys: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the network prefix in use
    Prefix,

    /// Generate a new Ed25519 identity and show its address
    Keygen {
        /// Output file for the secret key (hex)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a contacts query against a directory snapshot
    Contacts {
        /// Directory snapshot (JSON)
        #[arg(short, long)]
        directory: PathBuf,

        /// Public key, name fragment or email fragment
        #[arg(short, long, default_value = "")]
        query: String,

        /// Peer keys to search
        #[arg(short, long = "peer")]
        peers: Vec<String>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to the standard config path)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `<key> <address>` per line
    Text,
    /// JSON array
    Json,
}

/// One line of `derive` output
#[derive(Debug, Serialize)]
struct Derivation {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(prefix) = &cli.prefix {
        config.addressing.prefix.clone_from(prefix);
    }
    if let Some(policy) = cli.policy {
        config.addressing.run_length_policy = policy;
    }

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_env_filter(level.as_str())
        .with_writer(std::io::stderr)
        .init();

    // Validate configuration
    config.validate()?;
    let codec = config.codec()?;
    tracing::debug!(
        "Using prefix {} with {} run-length policy",
        codec.prefix(),
        codec.policy()
    );

    match cli.command {
        Commands::Derive { keys, format } => derive_keys(&codec, &keys, format),
        Commands::Prefix => show_prefix(&codec),
        Commands::Keygen { output } => generate_keypair(&codec, output),
        Commands::Contacts {
            directory,
            query,
            peers,
        } => resolve(&codec, directory, query, peers),
        Commands::InitConfig { path, force } => init_config(&config, path, force),
    }
}

/// Derive every key, reporting invalid keys without stopping
fn derive_all(codec: &AddressCodec, keys: &[String]) -> Vec<Derivation> {
    keys.iter()
        .map(|key| match codec.derive_hex(key) {
            Ok(addr) => Derivation {
                key: key.clone(),
                address: Some(addr.to_string()),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Cannot derive address for {:?}: {}", key, e);
                Derivation {
                    key: key.clone(),
                    address: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

/// Derive addresses for the given keys
fn derive_keys(codec: &AddressCodec, keys: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let results = derive_all(codec, keys);

    match format {
        OutputFormat::Text => {
            for result in &results {
                match (&result.address, &result.error) {
                    (Some(address), _) => println!("{} {}", result.key, address),
                    (None, Some(error)) => println!("{} error: {}", result.key, error),
                    (None, None) => {}
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} keys could not be derived", failed, results.len());
    }

    Ok(())
}

/// Show the network prefix
fn show_prefix(codec: &AddressCodec) -> anyhow::Result<()> {
    let prefix: &NetworkPrefix = codec.prefix();

    let mut base = [0u8; meshaddr::ADDRESS_SIZE];
    base[..prefix.len()].copy_from_slice(prefix.as_bytes());

    println!("Prefix: {}", prefix);
    println!("Length: {} bits", prefix.bit_len());
    println!("Remainder: {} bytes", prefix.remainder_len());
    println!("Policy: {}", codec.policy());
    println!(
        "Node range: {}/{}",
        DerivedAddress::from_bytes(base),
        prefix.bit_len() + 1
    );

    Ok(())
}

/// Generate a new identity keypair
fn generate_keypair(codec: &AddressCodec, output: Option<PathBuf>) -> anyhow::Result<()> {
    use ed25519_dalek::SigningKey;

    println!("Generating new Ed25519 identity keypair...");

    let mut rng = rand_core::OsRng;
    let signing_key = SigningKey::generate(&mut rng);
    let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes());

    println!("Public key: {}", public_key);
    match codec.derive(&public_key) {
        Ok(addr) => println!("Address: {}", addr),
        Err(e) => println!("Address: unavailable ({})", e),
    }

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        write_secret_key(&output_path, &hex::encode(signing_key.to_bytes()))?;

        println!("Secret key saved to: {}", output_path.display());
        println!("\nKeep this file secure! It contains your secret key.");
    } else {
        println!("\nSecret key not saved (use --output to save)");
    }

    Ok(())
}

/// Write a secret key file readable only by the owner
#[cfg(unix)]
fn write_secret_key(path: &Path, contents: &str) -> anyhow::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

#[cfg(not(unix))]
fn write_secret_key(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents)?;
    Ok(())
}

/// Resolve a contacts query against a directory snapshot
fn resolve(
    codec: &AddressCodec,
    directory: PathBuf,
    query: String,
    peers: Vec<String>,
) -> anyhow::Result<()> {
    let snapshot = std::fs::read_to_string(&directory)?;
    let directory = MemoryDirectory::from_json(&snapshot)?;
    tracing::debug!(
        "Loaded directory snapshot with {} nodes",
        directory.nodes.len()
    );

    let query = ContactsQuery { query, peers };
    let response = resolve_contacts(&directory, codec, &query)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

/// Write the effective configuration to disk
fn init_config(config: &Config, path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(Config::default_path);
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    config.save(&path)?;
    println!("Configuration written to: {}", path.display());

    Ok(())
}
