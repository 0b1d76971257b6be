//! CLI entry point for the orbit-scan engine.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use orbit_scan::config::EngineConfig;
use orbit_scan::engine::ScanEngine;
use orbit_scan::netinfo;

#[derive(Parser)]
#[command(name = "orbit-scan")]
#[command(about = "Point-in-time exposure scanner with drift detection")]
struct Cli {
    /// Target to scan: IPv4 address, CIDR block, or "localhost".
    #[arg(short, long)]
    target: Option<String>,

    /// Use the scanner's stealth timing profile.
    #[arg(short, long)]
    stealth: bool,

    /// List local IPv4 interfaces and the default gateway, then exit.
    #[arg(long)]
    interfaces: bool,

    /// Config file prefix (default: orbit).
    #[arg(short, long, default_value = "orbit")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    if cli.interfaces {
        let interfaces = netinfo::list_interfaces();
        let gateway = netinfo::default_gateway().await;
        let report = serde_json::json!({
            "interfaces": interfaces,
            "gateway": gateway,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let target = cli
        .target
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--target is required unless --interfaces is given"))?;

    let config = EngineConfig::load(&cli.config)?;
    let engine = ScanEngine::from_config(&config);

    let outcome = engine.run_scan(target, cli.stealth).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
