//! # dns-feed
//!
//! DNS forwarder that streams every resolution, and anything viewers type,
//! to every browser connected to its web page.

mod bootstrap;
mod server;

use clap::Parser;
use dns_feed_domain::CliOverrides;
use mimalloc::MiMalloc;
use tracing::info;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "dns-feed")]
#[command(version)]
#[command(about = "DNS forwarder with a live WebSocket feed of every resolution")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// DNS listener port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address for both listeners
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (ip:port)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,

    /// Expose the /debug routes
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        dns_port: cli.dns_port,
        web_port: cli.web_port,
        bind_address: cli.bind,
        upstream: cli.upstream,
        log_level: cli.log_level,
        debug: cli.debug,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config.logging);

    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        dns_port = config.server.dns_port,
        web_port = config.server.web_port,
        bind = %config.server.bind_address,
        upstream = %config.dns.upstream,
        "Configuration loaded"
    );

    let signals = bootstrap::ShutdownSignals::install()?;
    server::run(config, signals).await
}
