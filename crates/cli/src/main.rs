use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crypto_calc_core::errors::CoreError;
use crypto_calc_core::models::profit::ProfitForm;
use crypto_calc_core::models::settings::{FetchPolicy, Settings, DEFAULT_BASE_URL};
use crypto_calc_core::CryptoCalculator;

mod render;

#[derive(Parser, Debug)]
#[command(name = "crypto-calc", version, about = "Crypto profit calculator and historical replay")]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ApiArgs {
    /// Price service API root
    #[arg(long, global = true, env = "COINGECKO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Optional API key, sent as x-cg-demo-api-key
    #[arg(long, global = true, env = "COINGECKO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true, env = "COINGECKO_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the asset catalog
    Assets {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "25")]
        limit: usize,
    },
    /// Show the current quote of one asset
    Quote { asset: String },
    /// Compute profit/loss at a target price
    Profit {
        #[arg(long)]
        asset: String,
        /// USD investment (quantity is derived from the current price)
        #[arg(long, conflicts_with = "quantity", required_unless_present = "quantity")]
        amount: Option<f64>,
        /// Coin quantity (investment is derived from the current price)
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        target: f64,
    },
    /// Replay an investment over every January 1 since 2009
    History {
        #[arg(long, default_value = "1000")]
        investment: f64,
        /// Retry failed years with exponential backoff instead of skipping
        #[arg(long)]
        backoff: bool,
    },
}

impl ApiArgs {
    fn settings(&self) -> Settings {
        Settings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
            ..Settings::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crypto_calc_core=debug".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut settings = cli.api.settings();
    tracing::info!("Using price service at {}", settings.base_url);

    match cli.command {
        Commands::Assets { search, limit } => {
            let calculator = CryptoCalculator::new(settings);
            calculator.load_catalog().await.context("loading asset catalog")?;
            let assets = calculator.search_assets(search.as_deref().unwrap_or(""), Some(limit));
            render::print_assets(&assets);
        }
        Commands::Quote { asset } => {
            let calculator = CryptoCalculator::new(settings);
            calculator.load_catalog().await.context("loading asset catalog")?;
            let quote = calculator.select_asset(&asset).await?;
            render::print_quote(&quote);
        }
        Commands::Profit {
            asset,
            amount,
            quantity,
            target,
        } => {
            let calculator = CryptoCalculator::new(settings);
            calculator.load_catalog().await.context("loading asset catalog")?;
            let quote = calculator.select_asset(&asset).await?;
            render::print_quote(&quote);

            let form = match (amount, quantity) {
                (Some(amount), _) => ProfitForm::amount(&asset, amount, target),
                (None, Some(quantity)) => ProfitForm::quantity(&asset, quantity, target),
                (None, None) => bail!("either --amount or --quantity is required"),
            };
            match calculator.calculate_profit(&form) {
                Ok(summary) => render::print_profit(&quote, &summary),
                Err(CoreError::InvalidForm(errors)) => {
                    for e in &errors {
                        eprintln!("  {e}");
                    }
                    bail!("invalid input");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::History {
            investment,
            backoff,
        } => {
            if backoff {
                settings.fetch_policy = FetchPolicy::backoff();
            }
            let calculator = CryptoCalculator::new(settings);
            let result = calculator.run_history(investment).await;
            if let Some(report) = calculator.history() {
                render::print_history(&report);
            }
            if let Err(e) = result {
                bail!("{}", calculator.history_error().unwrap_or_else(|| e.to_string()));
            }
        }
    }

    Ok(())
}
