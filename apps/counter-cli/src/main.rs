//! # Counter CLI
//!
//! Headless driver for the sale form.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (`--config` or the platform config dir)
//! 3. Build the HTTP backend
//! 4. Initialize the form (reference data + first row)
//! 5. Enter the cart file
//! 6. Submit and wait for stock updates
//!
//! ## Usage
//! ```text
//! counter-cli [--config <counter.toml>] <cart.json>
//! ```
//!
//! Exit status is non-zero when the sale is blocked or not recorded.

mod cart;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use counter_client::HttpBackend;
use counter_form::{
    Collaborators, FormConfig, Navigator, Notifier, SaleFormController, SubmitOutcome,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cart::CartFile;

/// Prints navigation and alerts instead of showing them.
struct ConsoleUi;

impl Navigator for ConsoleUi {
    fn go_to(&self, route: &str, params: &[(String, String)]) {
        println!("navigate: /{}", route);
        for (name, value) in params {
            println!("  {} = {}", name, value);
        }
    }
}

impl Notifier for ConsoleUi {
    fn alert(&self, message: &str) {
        eprintln!("ALERT: {}", message);
    }
}

struct Args {
    config: Option<PathBuf>,
    cart: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = None;
    let mut cart = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            _ if cart.is_none() => cart = Some(PathBuf::from(arg)),
            other => bail!("unexpected argument: {}", other),
        }
    }

    let cart = cart.context("usage: counter-cli [--config <counter.toml>] <cart.json>")?;
    Ok(Args { config, cart })
}

/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=counter_form=trace` - Show trace for the form only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> anyhow::Result<bool> {
    let args = parse_args()?;
    let config = FormConfig::load(args.config).context("loading configuration")?;
    info!(
        backend = %config.backend.base_url,
        branch = %config.branch.name,
        "Configuration loaded"
    );

    let cart = CartFile::read(&args.cart)?;
    let backend = HttpBackend::new(&config.backend)?;
    let ui = Arc::new(ConsoleUi);
    let mut controller =
        SaleFormController::init(config, Collaborators::http(backend, ui.clone(), ui)).await;

    cart.fill(&controller).await?;

    for finding in controller.validation_errors() {
        warn!(%finding, "Form field is not valid");
    }

    let submitted = match controller.create_sale().await? {
        SubmitOutcome::Submitted {
            sale,
            stock_updates,
        } => {
            println!(
                "sale recorded: {} item(s), total {}",
                sale.items.len(),
                sale.total_price
            );
            stock_updates.join_all().await;
            true
        }
        SubmitOutcome::Blocked { expired } => {
            println!("sale blocked: {} expired product(s)", expired.len());
            false
        }
        SubmitOutcome::NotRecorded { .. } => {
            println!("sale was not recorded, see log");
            false
        }
    };

    controller.destroy();
    Ok(submitted)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
