use clap::Parser;

mod activity;
mod cli;
mod config;
mod error;
mod menu;
mod prompt;
mod rpc;
mod runner;
mod transaction;
mod types;
mod wallet;

use cli::{Action, CliArgs};
use config::WalletConfig;
use error::AppError;
use menu::{ActivityLogs, run_action};
use prompt::StdinPrompt;
use rpc::WalletRpc;
use runner::ProcessRunner;

fn main() -> Result<(), AppError> {
    // A missing .env is fine; the environment and defaults still apply.
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    match dotenv {
        Ok(path) => log::debug!("loaded {}", path.display()),
        Err(e) => log::debug!("no .env loaded: {}", e),
    }

    let args = CliArgs::parse();
    log::debug!("arguments: {:?}", args);

    let config = WalletConfig::from_args(&args)?;
    log::info!(
        "using {} (min_conf={}, max_utxos={}, threshold={}, address_index={})",
        config.cli_bin,
        config.min_conf,
        config.max_utxos,
        config.threshold_coins,
        config.wallet_address_index
    );

    let rpc = WalletRpc::new(ProcessRunner::new(config.cli_bin.clone()));
    let logs = ActivityLogs::from_config(&config);
    let mut prompt = StdinPrompt;

    run_action(args.command.unwrap_or(Action::Menu), &rpc, &config, &mut prompt, &logs)
}
