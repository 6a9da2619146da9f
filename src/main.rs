use anyhow::{Context, Result};
use chatwatch::{api, app, config, views};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Review AI conversation logs and risky prompts from the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Location to open, e.g. `/conversations?page=2&limit=10`
    #[arg(default_value = "/")]
    location: String,

    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Backend base URL; overrides the config file and CHATWATCH_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Render the location once and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = config::Config::load(&args.config, args.api_url)?;
    info!("Using backend at {}", config.api_url);

    let api = api::ApiClient::new(&config).context("Failed to create API client")?;
    let mut app = app::App::new(api, config, std::io::stdout());

    if args.once {
        app.navigate(views::Navigation::replace(args.location)).await?;
        if matches!(app.screen(), views::Screen::Failed(_)) {
            anyhow::bail!("Failed to load {}", app.location());
        }
        return Ok(());
    }

    app.run(&args.location).await
}
