// # hostingde-hook - certbot DNS-01 hook
//
// Thin integration layer between certbot's manual mode and the hosting.de
// DNS API. All zone resolution and record logic lives in hostingde-api.
//
// The hook is responsible for:
// 1. Reading configuration from the command line and environment
// 2. Initializing logging and the runtime
// 3. Adding or removing the challenge TXT record
//
// ## Configuration
//
// ### Challenge (set by certbot)
// - `CERTBOT_DOMAIN`: Domain being validated
// - `CERTBOT_VALIDATION`: Validation token (auth only)
//
// ### Credentials
// - `HOSTINGDE_API_KEY`: API key
// - `HOSTINGDE_CREDENTIALS`: Path to an INI file with `dns_hostingde_apikey = <key>`
//
// ### API
// - `HOSTINGDE_BASE_URL`: API base URL (default: https://secure.hosting.de)
// - `HOSTINGDE_MAX_RETRIES`: Retries for locked zones (default: 3)
// - `HOSTINGDE_RETRY_DELAY_SECS`: Delay between retries (default: 2)
//
// ### Challenge record
// - `HOSTINGDE_TTL`: TTL of the TXT record (default: 60)
// - `HOSTINGDE_PROPAGATION_SECS`: Wait after adding the record (default: 60)
//
// ### Logging
// - `HOSTINGDE_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// certbot certonly --manual --preferred-challenges dns \
//   --manual-auth-hook "hostingde-hook auth" \
//   --manual-cleanup-hook "hostingde-hook cleanup" \
//   -d example.org -d '*.example.org'
// ```

mod challenge;
mod credentials;

use anyhow::{Context, Result};
use challenge::{CHALLENGE_RECORD_TYPE, challenge_content, challenge_record_name, describe_failure};
use clap::{Parser, Subcommand};
use hostingde_api::{DnsManager, UpdateOutcome};
use hostingde_core::ClientConfig;
use hostingde_core::config::DEFAULT_BASE_URL;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Record added or removed
/// - 1: Configuration or startup error
/// - 2: Runtime error (API failure)
#[derive(Debug, Clone, Copy)]
enum HookExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// certbot manual hook for hosting.de DNS
#[derive(Parser, Debug)]
#[command(name = "hostingde-hook", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: HookCommand,

    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN", global = true)]
    domain: Option<String>,

    /// Validation token
    #[arg(long, env = "CERTBOT_VALIDATION", global = true)]
    validation: Option<String>,

    /// hosting.de API key
    #[arg(long, env = "HOSTINGDE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Path to a credentials INI file
    #[arg(long, env = "HOSTINGDE_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    /// API base URL
    #[arg(long, env = "HOSTINGDE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Retries when a zone is locked
    #[arg(long, env = "HOSTINGDE_MAX_RETRIES", default_value_t = 3, global = true)]
    max_retries: usize,

    /// Seconds between retries
    #[arg(long, env = "HOSTINGDE_RETRY_DELAY_SECS", default_value_t = 2, global = true)]
    retry_delay_secs: u64,

    /// TTL of the challenge record
    #[arg(long, env = "HOSTINGDE_TTL", default_value_t = 60, global = true)]
    ttl: u32,

    /// Seconds to wait for the record to propagate
    #[arg(long, env = "HOSTINGDE_PROPAGATION_SECS", default_value_t = 60, global = true)]
    propagation_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HOSTINGDE_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum HookCommand {
    /// Add the challenge TXT record
    Auth,
    /// Remove the challenge TXT record
    Cleanup,
}

/// Validated hook settings
struct HookConfig {
    command: HookCommand,
    record_name: String,
    content: Option<String>,
    client: ClientConfig,
    ttl: u32,
    propagation: Duration,
}

impl Cli {
    fn into_config(self) -> Result<HookConfig> {
        let domain = self
            .domain
            .filter(|d| !d.trim().is_empty())
            .context("CERTBOT_DOMAIN is required. Run this hook from certbot or pass --domain")?;

        let content = self
            .validation
            .filter(|v| !v.is_empty())
            .map(|v| challenge_content(&v));
        if content.is_none() && self.command == HookCommand::Auth {
            anyhow::bail!("CERTBOT_VALIDATION is required for auth");
        }

        let api_key = match (self.api_key, self.credentials) {
            (Some(key), _) if !key.trim().is_empty() => key,
            (_, Some(path)) => credentials::read_api_key(&path)?,
            _ => anyhow::bail!(
                "An API key is required. Set HOSTINGDE_API_KEY or point HOSTINGDE_CREDENTIALS \
                at a file containing '{} = <key>'",
                credentials::API_KEY_ENTRY
            ),
        };

        let client = ClientConfig::new(api_key)
            .with_base_url(self.base_url)
            .with_retries(self.max_retries, self.retry_delay_secs);
        client.validate()?;

        Ok(HookConfig {
            command: self.command,
            record_name: challenge_record_name(&domain),
            content,
            client,
            ttl: self.ttl,
            propagation: Duration::from_secs(self.propagation_secs),
        })
    }
}

fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

async fn run(config: &HookConfig, manager: &DnsManager) -> hostingde_core::Result<UpdateOutcome> {
    match config.command {
        HookCommand::Auth => {
            let content = config.content.as_deref().unwrap_or_default();
            let outcome = manager
                .add_record(
                    &config.record_name,
                    CHALLENGE_RECORD_TYPE,
                    content,
                    Some(config.ttl),
                )
                .await?;

            if !config.propagation.is_zero() {
                info!(
                    "Waiting {}s for {} to propagate",
                    config.propagation.as_secs(),
                    config.record_name
                );
                tokio::time::sleep(config.propagation).await;
            }
            Ok(outcome)
        }
        HookCommand::Cleanup => {
            manager
                .delete_record(
                    &config.record_name,
                    CHALLENGE_RECORD_TYPE,
                    config.content.as_deref(),
                )
                .await
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                HookExitCode::ConfigError.into()
            } else {
                HookExitCode::Success.into()
            };
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_log_level(&cli.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    let manager = match DnsManager::new(&config.client) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to create hosting.de client: {}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::RuntimeError.into();
        }
    };

    info!(
        "Running {:?} for {} ({})",
        config.command, config.record_name, CHALLENGE_RECORD_TYPE
    );

    match rt.block_on(run(&config, &manager)) {
        Ok(UpdateOutcome::Updated { added, deleted, .. }) => {
            info!(
                "Updated {}: {} added, {} deleted",
                config.record_name, added, deleted
            );
            HookExitCode::Success.into()
        }
        Ok(UpdateOutcome::Unchanged { .. }) => {
            info!("{} already in the requested state", config.record_name);
            HookExitCode::Success.into()
        }
        Err(e) => {
            error!("{}", describe_failure(&e));
            HookExitCode::RuntimeError.into()
        }
    }
}
