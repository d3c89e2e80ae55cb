//! Cartlane CLI - command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cartlane products
//! cartlane search iphone
//! cartlane search --interactive
//!
//! # Account
//! cartlane register -u criodo
//! cartlane login -u criodo
//! cartlane logout
//!
//! # Cart
//! cartlane cart show
//! cartlane cart add v4sLtEcMpzabRyfx
//! cartlane cart inc v4sLtEcMpzabRyfx
//! cartlane cart set v4sLtEcMpzabRyfx 3
//! ```
//!
//! Configuration comes from `CARTLANE_*` environment variables (or `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use cartlane_storefront::config::{LogFormat, StorefrontConfig};
use cartlane_storefront::state::AppState;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "cartlane")]
#[command(author, version, about = "Cartlane command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// Search products by name or category
    Search {
        /// Search text; empty lists the whole catalog
        text: Option<String>,

        /// Read search text line by line from stdin, debounced
        #[arg(short, long)]
        interactive: bool,
    },
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Password; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        /// Password; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,

        /// Password confirmation; defaults to a second stdin line
        #[arg(short, long)]
        confirm: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add one unit of a product that is not in the cart yet
    Add { product_id: String },
    /// Set the quantity of a product (0 removes it)
    Set { product_id: String, qty: u32 },
    /// Increase the quantity of a product by one
    Inc { product_id: String },
    /// Decrease the quantity of a product by one
    Dec { product_id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartlane_storefront=info,cartlane=info".into());

    let fmt_layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            render::failure(&CommandError::from(e));
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let result = match AppState::new(config) {
        Ok(state) => run(&state, cli).await,
        Err(e) => Err(CommandError::from(e)),
    };

    if let Err(e) = result {
        render::failure(&e);
        std::process::exit(1);
    }
}

async fn run(state: &AppState, cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Products => commands::catalog::products(state).await,
        Commands::Search { text, interactive } => {
            if interactive {
                commands::catalog::search_interactive(state).await
            } else {
                commands::catalog::search(state, text.as_deref().unwrap_or_default()).await
            }
        }
        Commands::Login { username, password } => {
            commands::account::login(state, &username, password).await
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => commands::account::register(state, &username, password, confirm).await,
        Commands::Logout => commands::account::logout(state),
        Commands::Whoami => commands::account::whoami(state),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await,
            CartAction::Add { product_id } => commands::cart::add(state, &product_id.into()).await,
            CartAction::Set { product_id, qty } => {
                commands::cart::set(state, &product_id.into(), qty).await
            }
            CartAction::Inc { product_id } => {
                commands::cart::increment(state, &product_id.into()).await
            }
            CartAction::Dec { product_id } => {
                commands::cart::decrement(state, &product_id.into()).await
            }
        },
    }
}
