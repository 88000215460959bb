// # dyndnsd - DynDNS Daemon
//
// Thin integration layer: turns CLI flags and environment variables into a
// `DynDnsConfig`, builds the record provider through the registry, and serves
// `/nic/update` until SIGTERM/SIGINT. All protocol logic lives in
// `dyndns-core`.
//
// ## Configuration
//
// Every `serve` flag has an environment fallback:
//
// - `DYNDNS_LISTEN`: Listen address (`0.0.0.0:8080`; `:8080` is accepted)
// - `DYNDNS_PROVIDER`: Record provider (`none`, `route53`)
// - `DYNDNS_ZONE_ID`: Route53 hosted zone ID (required for `route53`)
// - `DYNDNS_AWS_REGION`: AWS region override
// - `DYNDNS_AWS_ENDPOINT_URL`: AWS endpoint override
// - `DYNDNS_USERNAME` / `DYNDNS_PASSWORD`: Accepted Basic-Auth pair
// - `DYNDNS_USER_AGENT_TOKEN`: Required User-Agent substring
// - `DYNDNS_UPDATE_TIMEOUT_SECS`: Provider call timeout, 0 disables
// - `DYNDNS_LOG_LEVEL` / `DYNDNS_LOG_FORMAT`: Tracing filter and output format
//
// `RUST_LOG`, when set, takes precedence over `DYNDNS_LOG_LEVEL`.
//
// ## Example
//
// ```bash
// export DYNDNS_USERNAME=router
// export DYNDNS_PASSWORD=secret
// dyndnsd serve --provider route53 --zone-id Z1234567890
// ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dyndns_core::{
    CredentialsConfig, DynDnsConfig, DynDnsResponder, ProviderConfig, ProviderRegistry,
    ResponderConfig, ServerConfig, StaticCredentials,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const GIT_COMMIT: &str = match option_env!("DYNDNSD_GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

const BUILD_DATE: &str = match option_env!("DYNDNSD_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DyndnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(
    name = "dyndnsd",
    version,
    about = "DynDNS-compatible update endpoint backed by AWS Route53"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the DynDNS update server
    Serve(ServeArgs),
    /// Print version, commit and build date
    Version,
}

/// Flags for `dyndnsd serve`
///
/// Not `Debug`: carries the Basic-Auth password.
#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "DYNDNS_LISTEN", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Record provider to apply updates with
    #[arg(short, long, env = "DYNDNS_PROVIDER", value_enum, default_value_t = ProviderKind::None)]
    provider: ProviderKind,

    /// Route53 hosted zone ID (required for the route53 provider)
    #[arg(long, env = "DYNDNS_ZONE_ID")]
    zone_id: Option<String>,

    /// AWS region (Route53 is global; defaults to us-east-1)
    #[arg(long, env = "DYNDNS_AWS_REGION")]
    aws_region: Option<String>,

    /// AWS endpoint override, e.g. a LocalStack URL
    #[arg(long, env = "DYNDNS_AWS_ENDPOINT_URL")]
    aws_endpoint_url: Option<String>,

    /// Basic-Auth username accepted from clients
    #[arg(long, env = "DYNDNS_USERNAME")]
    username: String,

    /// Basic-Auth password accepted from clients
    #[arg(long, env = "DYNDNS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Substring the client User-Agent must contain
    #[arg(long, env = "DYNDNS_USER_AGENT_TOKEN", default_value = "dyndnsr53-client")]
    user_agent_token: String,

    /// Provider call timeout in seconds (0 disables)
    #[arg(long, env = "DYNDNS_UPDATE_TIMEOUT_SECS", default_value_t = 30)]
    update_timeout_secs: u64,

    /// Log level or tracing filter directive
    #[arg(long, env = "DYNDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, env = "DYNDNS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    /// Accept updates without applying them
    None,
    /// AWS Route53 hosted zone
    Route53,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl ServeArgs {
    /// Build the runtime configuration from the parsed flags
    fn to_config(&self) -> DynDnsConfig {
        let provider = match self.provider {
            ProviderKind::None => ProviderConfig::None,
            ProviderKind::Route53 => ProviderConfig::Route53 {
                zone_id: self.zone_id.clone().unwrap_or_default(),
                region: self.aws_region.clone(),
                endpoint_url: self.aws_endpoint_url.clone(),
            },
        };

        DynDnsConfig {
            server: ServerConfig {
                listen: listen_address(&self.listen),
            },
            responder: ResponderConfig {
                user_agent_token: self.user_agent_token.clone(),
                update_timeout_secs: self.update_timeout_secs,
            },
            credentials: CredentialsConfig::new(self.username.clone(), self.password.clone()),
            provider,
        }
    }
}

/// Expand the `:port` shorthand to all interfaces
fn listen_address(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("0.0.0.0{listen}")
    } else {
        listen.to_string()
    }
}

fn version_text() -> String {
    format!("dyndnsd version {VERSION}\nCommit: {GIT_COMMIT}\nBuilt: {BUILD_DATE}")
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("Invalid log level '{}'", log_level))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                DyndnsExitCode::ConfigError.into()
            } else {
                DyndnsExitCode::CleanShutdown.into()
            };
        }
    };

    match cli.command {
        Command::Version => {
            println!("{}", version_text());
            DyndnsExitCode::CleanShutdown.into()
        }
        Command::Serve(args) => run_serve(args).into(),
    }
}

fn run_serve(args: ServeArgs) -> DyndnsExitCode {
    let config = args.to_config();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DyndnsExitCode::ConfigError;
    }

    if let Err(e) = init_tracing(&args.log_level, args.log_format) {
        eprintln!("{:#}", e);
        return DyndnsExitCode::ConfigError;
    }

    info!(version = VERSION, commit = GIT_COMMIT, "Starting dyndnsd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::RuntimeError;
        }
    };

    rt.block_on(async {
        let (listener, responder, signals) = match startup(&config).await {
            Ok(started) => started,
            Err(e) => {
                error!("Startup failed: {:#}", e);
                return DyndnsExitCode::ConfigError;
            }
        };

        let shutdown = async move {
            let signal = signals.recv().await;
            info!("Received shutdown signal: {}", signal);
        };

        match dyndns_http::serve(listener, dyndns_http::router(responder), shutdown).await {
            Ok(()) => {
                info!("Shut down cleanly");
                DyndnsExitCode::CleanShutdown
            }
            Err(e) => {
                error!("Server error: {}", e);
                DyndnsExitCode::RuntimeError
            }
        }
    })
}

/// Everything that must succeed before the first request is accepted
async fn startup(
    config: &DynDnsConfig,
) -> Result<(TcpListener, Arc<DynDnsResponder>, ShutdownSignals)> {
    let registry = ProviderRegistry::with_builtins();
    dyndns_provider_route53::register(&registry);

    let provider = registry
        .create_provider(&config.provider)
        .await
        .with_context(|| format!("Failed to create {} provider", config.provider.type_name()))?;

    if provider.is_noop() {
        warn!("No provider configured - updates are accepted but not applied");
    } else {
        info!(provider = provider.provider_name(), "Record provider ready");
    }

    let credentials = Arc::new(StaticCredentials::from(&config.credentials));
    let responder = Arc::new(DynDnsResponder::from_config(
        &config.responder,
        credentials,
        provider,
    ));

    let signals = ShutdownSignals::install()?;

    let listener = TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;

    Ok((listener, responder, signals))
}

/// Installed SIGTERM/SIGINT handlers
#[cfg(unix)]
struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?,
            sigint: signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?,
        })
    }

    /// Wait for the first signal and return its name
    async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// CTRL-C only on non-Unix platforms
#[cfg(not(unix))]
struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to wait for CTRL-C: {}", e);
        }
        "SIGINT"
    }
}
