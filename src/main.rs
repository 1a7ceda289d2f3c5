use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cro_estimator::{api, config::Config, cost, export, render, store::Worksheet};

#[derive(Parser)]
#[command(name = "cro-estimator")]
#[command(about = "Cost estimation worksheet for CRO project proposals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the worksheet HTTP server
    Serve {
        /// Address to bind (overrides CRO_ESTIMATOR_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP API (overrides CRO_ESTIMATOR_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the band rate card
    Rates,
    /// Print the default worksheet with costs and its activity roll-up
    Seed {
        /// Also write the CSV export to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for print commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "cro_estimator=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Print commands keep stdout for their output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting cost estimator server on {}", addr);

    let app = api::create_router_with_config(&config);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Cost estimator listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_seed(config: &Config, csv: Option<PathBuf>) -> anyhow::Result<()> {
    let worksheet = Worksheet::seeded(&config.rates);
    let report = cost::report(worksheet.snapshot(), &config.rates);

    println!("Cost Breakdown by Sub-Activity\n");
    print!("{}", render::render_worksheet(&report.rows));
    println!("\nCost Breakdown by Activity\n");
    print!("{}", render::render_summary(&report.summary));
    println!(
        "\nTotal Project Cost: {}",
        render::format_currency(report.grand_total)
    );

    if let Some(path) = csv {
        let bytes = export::to_csv_bytes(&report.rows)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {} rows to {}", report.rows.len(), path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Rates | Commands::Seed { .. }));
    init_tracing(use_stderr);

    let config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(config, host, port).await?,
        Some(Commands::Rates) => {
            println!("Band Level Costs\n");
            print!("{}", render::render_rates(&config.rates));
        }
        Some(Commands::Seed { csv }) => print_seed(&config, csv)?,
        // Default: start server
        None => serve(config, None, None).await?,
    }

    Ok(())
}
