use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CLI_BIN: &str = "telestai-cli";

#[derive(Parser, Debug)]
#[command(author, version, about = "Console front end for a Telestai wallet daemon", long_about = None)]
pub struct CliArgs {
    /// Wallet RPC client executable
    #[arg(long, env = "TELESTAI_CLI", default_value = DEFAULT_CLI_BIN)]
    pub cli_bin: String,

    /// Minimum confirmations before an output is considered for consolidation
    #[arg(long, env = "MIN_CONF", default_value_t = 1)]
    pub min_conf: u32,

    /// Maximum number of UTXOs merged by one consolidation
    #[arg(long, env = "MAX_UTXOS", default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_utxos: u32,

    /// Only UTXOs below this amount (whole coins) are consolidated
    #[arg(long, env = "CONSOLIDATION_THRESHOLD", default_value_t = 118)]
    pub consolidation_threshold: u64,

    /// Zero-based index into `listreceivedbyaddress 0 false`
    #[arg(long, env = "WALLET_ADDRESS_INDEX", default_value_t = 0)]
    pub wallet_address_index: usize,

    #[arg(long, default_value = "consolidation.log")]
    pub consolidation_log: PathBuf,

    #[arg(long, default_value = "split.log")]
    pub split_log: PathBuf,

    #[command(subcommand)]
    pub command: Option<Action>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Interactive menu (default)
    Menu,
    /// Print the wallet balance
    Balance,
    /// List unspent outputs
    Utxos,
    /// Merge small UTXOs into one output
    Consolidate,
    /// Send 0.01 to the wallet address from every larger UTXO
    AutoSpend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = CliArgs::try_parse_from([
            "telestai-wallet-manager",
            "--cli-bin",
            "telestai-cli",
            "--min-conf",
            "1",
            "--max-utxos",
            "500",
            "--consolidation-threshold",
            "118",
            "--wallet-address-index",
            "0",
        ])
        .unwrap();
        assert_eq!(args.cli_bin, DEFAULT_CLI_BIN);
        assert_eq!(args.consolidation_log, PathBuf::from("consolidation.log"));
        assert_eq!(args.split_log, PathBuf::from("split.log"));
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_subcommand_and_overrides() {
        let args = CliArgs::try_parse_from([
            "telestai-wallet-manager",
            "--max-utxos",
            "20",
            "--wallet-address-index",
            "3",
            "auto-spend",
        ])
        .unwrap();
        assert_eq!(args.max_utxos, 20);
        assert_eq!(args.wallet_address_index, 3);
        assert_eq!(args.command, Some(Action::AutoSpend));
    }

    #[test]
    fn rejects_zero_max_utxos() {
        let result = CliArgs::try_parse_from(["telestai-wallet-manager", "--max-utxos", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_min_conf() {
        let result = CliArgs::try_parse_from(["telestai-wallet-manager", "--min-conf", "-1"]);
        assert!(result.is_err());
    }
}
