use bitcoin::Amount;
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::error::AppError;

/// Settings resolved once at startup and shared read-only by every handler.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub cli_bin: String,
    pub min_conf: u32,
    pub max_utxos: usize,
    /// Whole-coin threshold as given, kept for display.
    pub threshold_coins: u64,
    pub consolidation_threshold: Amount,
    pub wallet_address_index: usize,
    pub consolidation_log: PathBuf,
    pub split_log: PathBuf,
}

impl WalletConfig {
    pub fn from_args(args: &CliArgs) -> Result<Self, AppError> {
        let consolidation_threshold = Amount::ONE_BTC
            .checked_mul(args.consolidation_threshold)
            .ok_or_else(|| {
                AppError::AmountOutOfRange(format!(
                    "consolidation threshold {} is too large",
                    args.consolidation_threshold
                ))
            })?;

        Ok(WalletConfig {
            cli_bin: args.cli_bin.clone(),
            min_conf: args.min_conf,
            max_utxos: args.max_utxos as usize,
            threshold_coins: args.consolidation_threshold,
            consolidation_threshold,
            wallet_address_index: args.wallet_address_index,
            consolidation_log: args.consolidation_log.clone(),
            split_log: args.split_log.clone(),
        })
    }
}

#[cfg(test)]
impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            cli_bin: crate::cli::DEFAULT_CLI_BIN.to_string(),
            min_conf: 1,
            max_utxos: 500,
            threshold_coins: 118,
            consolidation_threshold: Amount::from_sat(118 * 100_000_000),
            wallet_address_index: 0,
            consolidation_log: PathBuf::from("consolidation.log"),
            split_log: PathBuf::from("split.log"),
        }
    }
}
