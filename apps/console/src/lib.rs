//! # Warteg Console Library
//!
//! Console front-end for the warteg restaurant API.
//!
//! ## Module Organization
//! ```text
//! warteg_console/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap command tree
//! ├── screens/
//! │   ├── crud.rs     ◄─── Generic list/create/edit/delete controller
//! │   ├── purchase.rs ◄─── Purchase draft + line-by-line save
//! │   ├── pos.rs      ◄─── Category/search/grid bound to the cart
//! │   └── dashboard.rs◄─── Trend summaries and popular products
//! ├── commands/       ◄─── One module per command group
//! ├── render.rs       ◄─── Plain-text tables
//! ├── notify.rs       ◄─── Non-blocking success/failure messages
//! └── error.rs        ◄─── AppError for screens and commands
//! ```
//!
//! ## Output Streams
//! ```text
//! stdout ◄── tables, ids, prompts
//! stderr ◄── notifications, tracing logs
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod notify;
pub mod render;
pub mod screens;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use warteg_api::{ApiConfig, Gateway};

use cli::Cli;
use commands::Context;
use error::{AppError, AppResult};
use notify::ConsoleNotifier;

/// Runs the `warteg` binary.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Parse Command Line ───────────────────────────────────────────────► │
/// │     • --config, --base-url, --verbose, subcommand                       │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: warn,warteg=info; RUST_LOG overrides                     │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → warteg.toml → WARTEG_API_* env → --base-url            │
/// │                                                                         │
/// │  4. Build Gateway & Dispatch ─────────────────────────────────────────► │
/// │     • HttpTransport + QueryCache                                        │
/// │     • stdin feeds prompts and the POS session                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, notified = e.notified, "Command failed");
            if let Some(line) = failure_line(&e) {
                eprintln!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

/// What to print for a failed command; `None` if a notification already said it.
fn failure_line(err: &AppError) -> Option<String> {
    (!err.notified).then(|| err.to_string())
}

async fn execute(cli: Cli) -> AppResult<()> {
    let mut config = ApiConfig::load(cli.config)?;
    if let Some(url) = cli.base_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Configuration loaded");

    let gateway = Gateway::from_config(&config)?;
    let ctx = Context::new(gateway, Arc::new(ConsoleNotifier));

    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout().lock();
    commands::dispatch(&ctx, cli.command, &mut input, &mut out).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: `warn,warteg=info`
/// - `--verbose`: `info,warteg=debug`
/// - `RUST_LOG` wins over both
fn init_tracing(verbose: bool) {
    let default = if verbose { "info,warteg=debug" } else { "warn,warteg=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore a second init (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::testing::context;
    use serde_json::json;

    #[tokio::test]
    async fn test_notified_failure_is_not_printed_again() {
        let (mock, notifier, ctx) = context();
        mock.push_json(500, json!({"message": "db down"}));

        let command = cli::Command::Penjualan(cli::PenjualanCommand::List);
        let err = commands::dispatch(&ctx, command, &mut &b""[..], &mut Vec::new())
            .await
            .unwrap_err();

        assert_eq!(notifier.all().len(), 1);
        assert_eq!(failure_line(&err), None);
    }

    #[test]
    fn test_unnotified_failure_is_printed() {
        let err = AppError::validation("--start-date must not be after --end-date");
        assert_eq!(
            failure_line(&err).as_deref(),
            Some("[ValidationError] --start-date must not be after --end-date")
        );
    }
}
