// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ccos_core::{
    api::{self, parse_pinned_date, AppState},
    attendance_import::load_attendance_csv,
    config::Config,
    national_id, organize, PresenceAggregator, Visibility,
};

#[derive(Parser, Debug)]
#[command(name = "ccos-core", about = "CCOS monitoring desk tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Organize an OCR or pasted list into person records (JSON on stdout)
    Organize {
        /// Text file to read; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Daily presence from an attendance CSV export
    Presence {
        #[arg(long)]
        csv: PathBuf,
        /// Report this date (YYYY-MM-DD) instead of the latest one
        #[arg(long)]
        date: Option<String>,
        /// Restrict to these warehouses, as a manager would be
        #[arg(long = "allow")]
        allowed: Vec<String>,
    },
    /// Check a CPF
    ValidateId { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Loading configuration failed")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve(config).await,
        Command::Organize { input } => {
            let text = match input {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("Reading stdin")?;
                    buf
                }
            };
            let records = organize(&text);
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Command::Presence { csv, date, allowed } => {
            let events = load_attendance_csv(&csv)?;
            let as_of = date.as_deref().map(parse_pinned_date).transpose()?;
            let visibility = if allowed.is_empty() {
                Visibility::Unrestricted
            } else {
                Visibility::Restricted(allowed)
            };

            let aggregator = PresenceAggregator::new(config.partner_companies());
            let summary = aggregator.aggregate(&events, &visibility, as_of);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::ValidateId { id } => {
            let valid = national_id::is_valid(&id);
            let shown = national_id::format(&id).unwrap_or(id);
            println!("{} {}", shown, if valid { "valid" } else { "INVALID" });
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_address();
    let app = api::router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Binding {}", addr))?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
