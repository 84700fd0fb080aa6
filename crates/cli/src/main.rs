use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::advisor::PortfolioAdvisor;
use folio_core::llm::gemini::GeminiClient;

mod features;

#[derive(Debug, Parser)]
#[command(name = "folio_cli", about = "Run the portfolio advisor once from the command line")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest portfolio weights for the stocks in a JSON file.
    Predict {
        /// Either a JSON array of features or an object with a `features` array.
        #[arg(long)]
        features: PathBuf,
    },
    /// Send a free-text message and print the reply.
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = folio_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let llm = GeminiClient::from_settings(&settings)?;
    let advisor = PortfolioAdvisor::new(Arc::new(llm));

    let result = run(&advisor, args.command).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = format!("{err:#}"), "folio_cli run failed");
    }
    result
}

async fn run(advisor: &PortfolioAdvisor, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Predict { features } => {
            let stocks = features::load(&features)?;
            tracing::info!(path = %features.display(), stocks = stocks.len(), "loaded features");

            let prediction = advisor.predict(&stocks).await?;
            let out = serde_json::to_string_pretty(&prediction)
                .context("failed to serialize prediction")?;
            println!("{out}");
        }
        Command::Chat { message } => {
            let reply = advisor.chat(&message.join(" ")).await?;
            println!("{reply}");
        }
    }
    Ok(())
}

fn init_sentry(settings: &folio_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
