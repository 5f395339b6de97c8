use bitcoin::Amount;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::runner::CommandRunner;
use crate::types::{
    FundOptions, FundedTransaction, ReceivedAddress, SignedTransaction, TxInputRef, TxOutputs, Utxo,
};

/// Typed wrapper over the daemon's command surface. Each method builds the
/// argument list for one RPC and decodes its reply.
pub struct WalletRpc<R> {
    runner: R,
}

impl<R: CommandRunner> WalletRpc<R> {
    pub fn new(runner: R) -> Self {
        WalletRpc { runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn call(&self, args: Vec<String>) -> Result<String, AppError> {
        self.runner.run(&args)
    }

    /// Raw balance text as printed by the daemon.
    pub fn get_balance(&self) -> Result<String, AppError> {
        self.call(vec!["getbalance".into()])
    }

    /// An empty reply is treated as an empty list.
    pub fn list_unspent(&self, min_conf: Option<u32>) -> Result<Vec<Utxo>, AppError> {
        let mut args = vec!["listunspent".to_string()];
        if let Some(min_conf) = min_conf {
            args.push(min_conf.to_string());
        }
        let out = self.call(args)?;
        if out.is_empty() {
            return Ok(Vec::new());
        }
        decode("listunspent", &out)
    }

    pub fn list_received_by_address(&self) -> Result<Vec<ReceivedAddress>, AppError> {
        let out = self.call(vec![
            "listreceivedbyaddress".into(),
            "0".into(),
            "false".into(),
        ])?;
        if out.is_empty() {
            return Ok(Vec::new());
        }
        decode("listreceivedbyaddress", &out)
    }

    pub fn create_raw_transaction(
        &self,
        inputs: &[TxInputRef],
        outputs: &TxOutputs,
    ) -> Result<String, AppError> {
        let out = self.call(vec![
            "createrawtransaction".into(),
            encode("createrawtransaction", inputs)?,
            encode("createrawtransaction", outputs)?,
        ])?;
        require_hex("createrawtransaction", out)
    }

    pub fn fund_raw_transaction(
        &self,
        raw_hex: &str,
        options: &FundOptions,
    ) -> Result<FundedTransaction, AppError> {
        let out = self.call(vec![
            "fundrawtransaction".into(),
            raw_hex.to_string(),
            encode("fundrawtransaction", options)?,
        ])?;
        let funded: FundedTransaction = decode("fundrawtransaction", &out)?;
        check_hex("fundrawtransaction", &funded.hex)?;
        log::debug!("funded transaction fee {} (change at {})", funded.fee, funded.changepos);
        Ok(funded)
    }

    pub fn sign_raw_transaction(&self, raw_hex: &str) -> Result<SignedTransaction, AppError> {
        let out = self.call(vec!["signrawtransaction".into(), raw_hex.to_string()])?;
        let signed: SignedTransaction = decode("signrawtransaction", &out)?;
        check_hex("signrawtransaction", &signed.hex)?;
        Ok(signed)
    }

    /// Returns the broadcast transaction id.
    pub fn send_raw_transaction(&self, signed_hex: &str) -> Result<String, AppError> {
        let txid = self.call(vec!["sendrawtransaction".into(), signed_hex.to_string()])?;
        if txid.is_empty() {
            return Err(AppError::EmptyResponse("sendrawtransaction"));
        }
        if let Err(e) = txid.parse::<bitcoin::Txid>() {
            log::warn!("sendrawtransaction returned an unusual txid {:?}: {}", txid, e);
        }
        Ok(txid)
    }
}

fn encode<T: Serialize + ?Sized>(command: &'static str, value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|source| AppError::JsonEncode { command, source })
}

fn decode<T: DeserializeOwned>(command: &'static str, out: &str) -> Result<T, AppError> {
    if out.is_empty() {
        return Err(AppError::EmptyResponse(command));
    }
    serde_json::from_str(out).map_err(|source| {
        log::error!("{} reply is not valid JSON: {}", command, source);
        AppError::JsonParse { command, source }
    })
}

fn check_hex(command: &'static str, raw: &str) -> Result<(), AppError> {
    if raw.is_empty() {
        return Err(AppError::EmptyResponse(command));
    }
    hex::decode(raw).map_err(|source| AppError::InvalidHex { command, source })?;
    Ok(())
}

fn require_hex(command: &'static str, raw: String) -> Result<String, AppError> {
    check_hex(command, &raw)?;
    Ok(raw)
}

/// Sums UTXO amounts, failing instead of wrapping on overflow.
pub fn total_amount(utxos: &[Utxo]) -> Result<Amount, AppError> {
    utxos.iter().try_fold(Amount::ZERO, |acc, u| {
        acc.checked_add(u.amount)
            .ok_or_else(|| AppError::AmountOutOfRange(format!("sum of {} UTXOs", utxos.len())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::mock::MockRunner;
    use crate::types::single_output;

    #[test]
    fn list_unspent_passes_min_conf() {
        let rpc = WalletRpc::new(MockRunner::new().reply("listunspent", "[]"));
        let utxos = rpc.list_unspent(Some(6)).unwrap();
        assert!(utxos.is_empty());
        assert_eq!(rpc.runner().calls(), vec![vec!["listunspent".to_string(), "6".to_string()]]);
    }

    #[test]
    fn list_unspent_empty_reply_is_empty_list() {
        let rpc = WalletRpc::new(MockRunner::new().reply("listunspent", ""));
        assert!(rpc.list_unspent(None).unwrap().is_empty());
    }

    #[test]
    fn list_unspent_rejects_garbage() {
        let rpc = WalletRpc::new(MockRunner::new().reply("listunspent", "error: not json"));
        assert!(matches!(
            rpc.list_unspent(None),
            Err(AppError::JsonParse { command: "listunspent", .. })
        ));
    }

    #[test]
    fn create_raw_transaction_sends_compact_json() {
        let rpc = WalletRpc::new(MockRunner::new().reply("createrawtransaction", "0200ab"));
        let inputs = vec![TxInputRef { txid: "aa".into(), vout: 0 }];
        let outputs = single_output("TXdest", Amount::from_sat(13_000_000_000));
        let hex = rpc.create_raw_transaction(&inputs, &outputs).unwrap();
        assert_eq!(hex, "0200ab");
        assert_eq!(
            rpc.runner().calls()[0],
            vec![
                "createrawtransaction".to_string(),
                r#"[{"txid":"aa","vout":0}]"#.to_string(),
                r#"{"TXdest":130.0}"#.to_string(),
            ]
        );
    }

    #[test]
    fn create_raw_transaction_rejects_non_hex() {
        let rpc = WalletRpc::new(MockRunner::new().reply("createrawtransaction", "zz-not-hex"));
        let result = rpc.create_raw_transaction(&[], &TxOutputs::new());
        assert!(matches!(result, Err(AppError::InvalidHex { .. })));
    }

    #[test]
    fn fund_raw_transaction_decodes_fee() {
        let rpc = WalletRpc::new(
            MockRunner::new().reply("fundrawtransaction", r#"{"hex":"0201","fee":0.0000226,"changepos":1}"#),
        );
        let funded = rpc
            .fund_raw_transaction("0200", &FundOptions::change_to("TXdest", true))
            .unwrap();
        assert_eq!(funded.fee, Amount::from_sat(2_260));
        assert_eq!(funded.hex, "0201");
        let call = &rpc.runner().calls()[0];
        assert_eq!(call[1], "0200");
        assert_eq!(
            call[2],
            r#"{"changeAddress":"TXdest","changePosition":1,"subtractFeeFromOutputs":[0]}"#
        );
    }

    #[test]
    fn send_raw_transaction_requires_a_txid() {
        let rpc = WalletRpc::new(MockRunner::new().reply("sendrawtransaction", ""));
        assert!(matches!(
            rpc.send_raw_transaction("0201"),
            Err(AppError::EmptyResponse("sendrawtransaction"))
        ));
    }

    #[test]
    fn total_amount_sums_exactly() {
        let utxos: Vec<Utxo> = serde_json::from_str(
            r#"[{"txid":"a","vout":0,"amount":0.1},{"txid":"b","vout":0,"amount":0.2}]"#,
        )
        .unwrap();
        assert_eq!(total_amount(&utxos).unwrap(), Amount::from_sat(30_000_000));
    }
}
