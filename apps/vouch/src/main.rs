//! vouch - verified-publisher lookup for Flatpak and Snap packages
//!
//! Loads the verification resolver once, warms the per-snap cache for the
//! queried identifiers, and renders badge verdicts.

mod cli;

use crate::cli::{Cli, Commands};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use console::style;
use std::process;
use tracing::{error, info};
use vouch_config::Config;
use vouch_errors::{Error, UserFacingError};
use vouch_net::{NetClient, NetConfig};
use vouch_types::PackageSource;
use vouch_verify::VerificationResolver;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("application error: {}", e);
        eprintln!("Error: {}", e.user_message());
        if let Some(hint) = e.user_hint() {
            eprintln!("Hint: {hint}");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    info!("starting vouch v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(cli.global.config.as_deref()).await?;
    let net = NetClient::new(&NetConfig {
        user_agent: config.network.user_agent.clone(),
        connect_timeout: std::time::Duration::from_secs(config.network.connect_timeout_secs),
        ..NetConfig::default()
    })?;
    let resolver = VerificationResolver::new(net, config);

    let status = resolver.load().await;
    if status.has_error {
        eprintln!(
            "{}",
            style("warning: a verification source was unreachable; results may be incomplete")
                .yellow()
        );
    }

    match cli.command {
        Commands::Check { source, packages } => {
            if source == PackageSource::Snap {
                resolver.prefetch_snap_verifications(&packages).await;
            }
            render_check(&resolver, source, &packages);
        }
        Commands::Verified => {
            for app_id in resolver.verified_flatpak_ids() {
                println!("{app_id}");
            }
        }
    }

    Ok(())
}

fn render_check(resolver: &VerificationResolver, source: PackageSource, packages: &[String]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Package", "Verified", "Source"]);

    for package in packages {
        let verified = resolver.is_verified(source, package);
        let badge = if verified {
            style("yes").green().to_string()
        } else {
            style("no").dim().to_string()
        };
        let attribution = resolver
            .verification_source(source, package)
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        table.add_row([Cell::new(package), Cell::new(badge), Cell::new(attribution)]);
    }

    println!("{table}");
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
