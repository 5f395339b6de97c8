use bitcoin::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of `listunspent`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub address: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    #[serde(default)]
    pub confirmations: u64,
}

impl Utxo {
    pub fn input_ref(&self) -> TxInputRef {
        TxInputRef {
            txid: self.txid.clone(),
            vout: self.vout,
        }
    }
}

/// One entry of `listreceivedbyaddress`. Only the address is used.
#[derive(Deserialize, Debug, Clone)]
pub struct ReceivedAddress {
    pub address: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TxInputRef {
    pub txid: String,
    pub vout: u32,
}

/// Coin amount written as a plain JSON number, the way the daemon expects it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CoinValue(#[serde(with = "bitcoin::amount::serde::as_btc")] pub Amount);

/// `createrawtransaction` outputs: destination address -> amount.
pub type TxOutputs = BTreeMap<String, CoinValue>;

pub fn single_output(address: &str, amount: Amount) -> TxOutputs {
    let mut outputs = TxOutputs::new();
    outputs.insert(address.to_string(), CoinValue(amount));
    outputs
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FundOptions {
    pub change_address: String,
    pub change_position: u32,
    pub subtract_fee_from_outputs: Vec<u32>,
}

impl FundOptions {
    /// Change goes back to `address` at position 1. When `fee_from_first_output`
    /// is set the daemon takes the fee out of output 0 instead of adding inputs.
    pub fn change_to(address: &str, fee_from_first_output: bool) -> Self {
        FundOptions {
            change_address: address.to_string(),
            change_position: 1,
            subtract_fee_from_outputs: if fee_from_first_output { vec![0] } else { Vec::new() },
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct FundedTransaction {
    pub hex: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub fee: Amount,
    #[serde(default)]
    pub changepos: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SignedTransaction {
    pub hex: String,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

/// Formats an amount the way every summary prints it: 8 decimals, no unit.
pub fn coins(amount: Amount) -> String {
    format!("{:.8}", amount.to_btc())
}

pub fn signed_coins(sats: i64) -> String {
    format!("{:.8}", sats as f64 / 100_000_000.0)
}
