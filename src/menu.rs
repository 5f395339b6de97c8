use crate::activity::ActivityLog;
use crate::cli::Action;
use crate::config::WalletConfig;
use crate::error::AppError;
use crate::prompt::Prompt;
use crate::rpc::WalletRpc;
use crate::runner::CommandRunner;
use crate::transaction::{auto_generate_spends, consolidate_utxos};
use crate::wallet::{TICKER, display_utxos, list_utxos, show_balance};

/// Where each state-changing action family records its history.
pub struct ActivityLogs {
    pub consolidation: ActivityLog,
    pub split: ActivityLog,
}

impl ActivityLogs {
    pub fn from_config(config: &WalletConfig) -> Self {
        ActivityLogs {
            consolidation: ActivityLog::new(&config.consolidation_log),
            split: ActivityLog::new(&config.split_log),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Run(Action),
    Exit,
}

pub fn parse_selection(input: &str) -> Option<Selection> {
    match input.trim() {
        "1" => Some(Selection::Run(Action::Balance)),
        "2" => Some(Selection::Run(Action::Utxos)),
        "3" => Some(Selection::Run(Action::Consolidate)),
        "4" => Some(Selection::Run(Action::AutoSpend)),
        "5" => Some(Selection::Exit),
        _ => None,
    }
}

fn print_menu(config: &WalletConfig) {
    println!("\n===== Telestai Wallet Manager =====");
    println!("1. Check Balance");
    println!("2. List UTXOs");
    println!(
        "3. Consolidate UTXOs (max {}, <{} {})",
        config.max_utxos, config.threshold_coins, TICKER
    );
    println!("4. Auto Generate Spents (for testing with predefine amount 0.01 {})", TICKER);
    println!("5. Exit");
}

/// Runs one action to completion. Handler failures are reported by the
/// handlers themselves; only operator I/O errors come back from here.
pub fn run_action<R: CommandRunner, P: Prompt>(
    action: Action,
    rpc: &WalletRpc<R>,
    config: &WalletConfig,
    prompt: &mut P,
    logs: &ActivityLogs,
) -> Result<(), AppError> {
    match action {
        Action::Menu => return run_menu(rpc, config, prompt, logs),
        Action::Balance => {
            show_balance(rpc);
        }
        Action::Utxos => {
            let utxos = list_utxos(rpc);
            if !utxos.is_empty() {
                display_utxos(&utxos);
            }
        }
        Action::Consolidate => {
            let outcome = consolidate_utxos(rpc, config, prompt, &logs.consolidation);
            log::debug!("consolidation finished: {:?}", outcome);
        }
        Action::AutoSpend => {
            let outcome = auto_generate_spends(rpc, config, prompt, &logs.split);
            log::debug!("auto spend finished: {:?}", outcome);
        }
    }
    Ok(())
}

/// Loops until the operator picks Exit or stdin closes.
pub fn run_menu<R: CommandRunner, P: Prompt>(
    rpc: &WalletRpc<R>,
    config: &WalletConfig,
    prompt: &mut P,
    logs: &ActivityLogs,
) -> Result<(), AppError> {
    loop {
        print_menu(config);
        let Some(input) = prompt.ask("Select an option: ")? else {
            println!("\nExiting...");
            return Ok(());
        };

        match parse_selection(&input) {
            Some(Selection::Exit) => {
                println!("Exiting...");
                return Ok(());
            }
            Some(Selection::Run(action)) => run_action(action, rpc, config, prompt, logs)?,
            None => println!("Invalid option. Please try again."),
        }
    }
}
