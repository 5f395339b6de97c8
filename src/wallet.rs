use crate::config::WalletConfig;
use crate::error::AppError;
use crate::rpc::WalletRpc;
use crate::runner::CommandRunner;
use crate::types::{Utxo, coins};

pub const TICKER: &str = "TLS";

pub fn show_balance<R: CommandRunner>(rpc: &WalletRpc<R>) -> Option<String> {
    match rpc.get_balance() {
        Ok(balance) => {
            println!("💰 Balance: {} {}", balance, TICKER);
            Some(balance)
        }
        Err(e) => {
            log::debug!("getbalance failed: {}", e);
            println!("❌ Failed to fetch balance.");
            None
        }
    }
}

/// Every UTXO the wallet knows about. Failures and empty wallets both come
/// back as an empty list after telling the operator.
pub fn list_utxos<R: CommandRunner>(rpc: &WalletRpc<R>) -> Vec<Utxo> {
    match rpc.list_unspent(None) {
        Ok(utxos) if utxos.is_empty() => {
            println!("❌ No UTXOs available.");
            Vec::new()
        }
        Ok(utxos) => utxos,
        Err(AppError::JsonParse { source, .. }) => {
            println!("❌ Could not read UTXO list: {}", source);
            Vec::new()
        }
        Err(e) => {
            log::debug!("listunspent failed: {}", e);
            println!("❌ No available UTXOs.");
            Vec::new()
        }
    }
}

pub fn display_utxos(utxos: &[Utxo]) {
    println!("🔍 UTXOs:");
    for (index, utxo) in utxos.iter().enumerate() {
        println!(
            "{}. TXID: {}, VOUT: {}, Address: {}, Amount: {} {}, Confirmations: {}",
            index + 1,
            utxo.txid,
            utxo.vout,
            utxo.address,
            coins(utxo.amount),
            TICKER,
            utxo.confirmations
        );
    }
}

/// Picks the configured entry of `listreceivedbyaddress 0 false`. The list is
/// fetched on every call.
pub fn resolve_wallet_address<R: CommandRunner>(
    rpc: &WalletRpc<R>,
    config: &WalletConfig,
) -> Option<String> {
    let addresses = match rpc.list_received_by_address() {
        Ok(addresses) => addresses,
        Err(e) => {
            println!("❌ Could not list wallet addresses: {}", e);
            return None;
        }
    };

    let index = config.wallet_address_index;
    match addresses.get(index) {
        Some(entry) => {
            log::debug!("wallet address #{} is {}", index, entry.address);
            Some(entry.address.clone())
        }
        None => {
            println!("❌ Wallet Address Index {} does not exist.", index);
            if addresses.is_empty() {
                println!("The wallet has not reported any addresses yet.");
            } else {
                println!("Valid indexes are 0 to {}.", addresses.len() - 1);
            }
            println!(
                "Please run '{} listreceivedbyaddress 0 false' to see available addresses.",
                config.cli_bin
            );
            println!("The index is 0 based, so the first address is 0, the second is 1, etc.");
            println!("After getting the index, you can change WALLET_ADDRESS_INDEX in the .env file.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::mock::MockRunner;

    const TWO_ADDRESSES: &str =
        r#"[{"address":"TAddrZero","amount":0,"confirmations":0},{"address":"TAddrOne","amount":1.5,"confirmations":3}]"#;

    #[test]
    fn resolves_configured_index() {
        let rpc = WalletRpc::new(MockRunner::new().reply("listreceivedbyaddress", TWO_ADDRESSES));
        let config = WalletConfig { wallet_address_index: 1, ..WalletConfig::default() };
        assert_eq!(resolve_wallet_address(&rpc, &config).as_deref(), Some("TAddrOne"));
        assert_eq!(
            rpc.runner().calls()[0],
            vec!["listreceivedbyaddress", "0", "false"]
        );
    }

    #[test]
    fn out_of_range_index_is_absent() {
        let rpc = WalletRpc::new(MockRunner::new().reply("listreceivedbyaddress", TWO_ADDRESSES));
        let config = WalletConfig { wallet_address_index: 3, ..WalletConfig::default() };
        assert_eq!(resolve_wallet_address(&rpc, &config), None);
    }

    #[test]
    fn address_is_fetched_fresh_each_time() {
        let rpc = WalletRpc::new(
            MockRunner::new()
                .reply("listreceivedbyaddress", TWO_ADDRESSES)
                .reply("listreceivedbyaddress", r#"[{"address":"TAddrNew"}]"#),
        );
        let config = WalletConfig::default();
        assert_eq!(resolve_wallet_address(&rpc, &config).as_deref(), Some("TAddrZero"));
        assert_eq!(resolve_wallet_address(&rpc, &config).as_deref(), Some("TAddrNew"));
        assert_eq!(rpc.runner().count("listreceivedbyaddress"), 2);
    }

    #[test]
    fn daemon_failure_gives_no_address() {
        let rpc = WalletRpc::new(MockRunner::new().fail("listreceivedbyaddress", "wallet locked"));
        assert_eq!(resolve_wallet_address(&rpc, &WalletConfig::default()), None);
    }

    #[test]
    fn list_utxos_handles_empty_and_broken_replies() {
        let rpc = WalletRpc::new(
            MockRunner::new()
                .reply("listunspent", "[]")
                .reply("listunspent", "{oops")
                .fail("listunspent", "daemon down"),
        );
        assert!(list_utxos(&rpc).is_empty());
        assert!(list_utxos(&rpc).is_empty());
        assert!(list_utxos(&rpc).is_empty());
        assert_eq!(rpc.runner().calls()[0], vec!["listunspent"]);
    }

    #[test]
    fn list_utxos_returns_entries() {
        let rpc = WalletRpc::new(MockRunner::new().reply(
            "listunspent",
            r#"[{"txid":"aa","vout":0,"address":"T1","amount":3.0,"confirmations":1}]"#,
        ));
        let utxos = list_utxos(&rpc);
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].txid, "aa");
    }

    #[test]
    fn balance_is_passed_through() {
        let rpc = WalletRpc::new(MockRunner::new().reply("getbalance", "1234.5\n"));
        assert_eq!(show_balance(&rpc).as_deref(), Some("1234.5"));

        let rpc = WalletRpc::new(MockRunner::new().fail("getbalance", "no wallet"));
        assert_eq!(show_balance(&rpc), None);
    }
}
