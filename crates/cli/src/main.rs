//! Street Kitchen CLI - browse a vendor's menu and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Print the menu
//! sk-cli menu
//!
//! # Print the menu as the HTML fragment the ordering page uses
//! sk-cli menu --html
//!
//! # Place an order (asks for confirmation unless --yes)
//! sk-cli order --item 12=2 --item 3=1 --name Kumar --phone 9876543210 \
//!     --address "123, Some Road, Chennai" --pincode 600001 --preferences "No onion"
//!
//! # Keep the menu on screen, refreshing on the configured interval
//! sk-cli watch
//! ```
//!
//! Configuration comes from the environment (see
//! `street_kitchen_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use street_kitchen_storefront::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod terminal;

use commands::order::OrderArgs;

#[derive(Parser)]
#[command(name = "sk-cli")]
#[command(author, version, about = "Street Kitchen ordering from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the vendor's menu
    Menu {
        /// Print the item list HTML fragment instead of text
        #[arg(long)]
        html: bool,
    },
    /// Build a cart and place an order
    Order(OrderArgs),
    /// Show the menu and keep it refreshed until Ctrl+C
    Watch,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "street_kitchen_storefront=info,sk_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Menu { html } => commands::menu::run(config, html).await,
        Commands::Order(args) => commands::order::run(config, args).await,
        Commands::Watch => commands::watch::run(config).await,
    }
}
