use bitcoin::Amount;

use crate::activity::ActivityLog;
use crate::config::WalletConfig;
use crate::error::AppError;
use crate::prompt::Prompt;
use crate::rpc::{WalletRpc, total_amount};
use crate::runner::CommandRunner;
use crate::types::{FundOptions, Utxo, coins, signed_coins, single_output};
use crate::wallet::{TICKER, display_utxos, list_utxos, resolve_wallet_address};

/// Amount sent by each generated test transaction (0.01 coin).
pub const TEST_SPEND_AMOUNT: Amount = Amount::from_sat(1_000_000);

#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidationSummary {
    pub utxo_count: usize,
    pub total: Amount,
    pub fee: Amount,
    pub amount_to_send: Amount,
}

impl ConsolidationSummary {
    fn print(&self) {
        println!("\nConsolidation Summary:");
        println!("Total UTXOs: {}", self.utxo_count);
        println!("Total Amount: {} {}", coins(self.total), TICKER);
        println!("Transaction Fee: {} {}", coins(self.fee), TICKER);
        println!("Amount to be sent: {} {}", coins(self.amount_to_send), TICKER);
    }

    fn log_line(&self) -> String {
        format!(
            "Consolidation Summary: Total UTXOs: {}, Total Amount: {} {t}, Transaction Fee: {} {t}, Amount to be sent: {} {t}",
            self.utxo_count,
            coins(self.total),
            coins(self.fee),
            coins(self.amount_to_send),
            t = TICKER
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsolidationOutcome {
    NoUtxos,
    TooFewUtxos(usize),
    NothingBelowThreshold,
    NoDestination,
    Cancelled(ConsolidationSummary),
    Broadcast { summary: ConsolidationSummary, txid: String },
    Failed(String),
}

/// Merges the UTXOs below the configured threshold (at most `max_utxos` of
/// them, in daemon order) into one output paying the wallet address.
pub fn consolidate_utxos<R: CommandRunner, P: Prompt>(
    rpc: &WalletRpc<R>,
    config: &WalletConfig,
    prompt: &mut P,
    activity: &ActivityLog,
) -> ConsolidationOutcome {
    let utxos = match rpc.list_unspent(Some(config.min_conf)) {
        Ok(utxos) if !utxos.is_empty() => utxos,
        Ok(_) => {
            println!("No UTXOs available for consolidation.");
            return ConsolidationOutcome::NoUtxos;
        }
        Err(e) => {
            println!("No UTXOs available for consolidation: {}", e);
            return ConsolidationOutcome::NoUtxos;
        }
    };

    if utxos.len() <= 1 {
        println!("Cannot consolidate because there is only one UTXO available.");
        return ConsolidationOutcome::TooFewUtxos(utxos.len());
    }

    let selected = select_for_consolidation(&utxos, config.consolidation_threshold, config.max_utxos);
    if selected.is_empty() {
        println!("No UTXOs below the threshold for consolidation.");
        return ConsolidationOutcome::NothingBelowThreshold;
    }
    log::info!(
        "selected {} of {} UTXOs below {} {}",
        selected.len(),
        utxos.len(),
        config.threshold_coins,
        TICKER
    );

    let Some(destination) = resolve_wallet_address(rpc, config) else {
        println!("Failed to get a destination address.");
        return ConsolidationOutcome::NoDestination;
    };

    match build_consolidation(rpc, &selected, &destination, prompt, activity) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("❌ Failed to consolidate UTXOs: {}", e);
            activity.error(&format!("Failed to consolidate UTXOs: {}", e));
            ConsolidationOutcome::Failed(e.to_string())
        }
    }
}

/// UTXOs strictly below `threshold`, truncated to `max` entries.
pub fn select_for_consolidation(utxos: &[Utxo], threshold: Amount, max: usize) -> Vec<Utxo> {
    utxos
        .iter()
        .filter(|u| u.amount < threshold)
        .take(max)
        .cloned()
        .collect()
}

fn build_consolidation<R: CommandRunner, P: Prompt>(
    rpc: &WalletRpc<R>,
    selected: &[Utxo],
    destination: &str,
    prompt: &mut P,
    activity: &ActivityLog,
) -> Result<ConsolidationOutcome, AppError> {
    let total = total_amount(selected)?;
    let inputs: Vec<_> = selected.iter().map(Utxo::input_ref).collect();

    let raw_tx = rpc.create_raw_transaction(&inputs, &single_output(destination, total))?;
    let funded = rpc.fund_raw_transaction(&raw_tx, &FundOptions::change_to(destination, true))?;
    let amount_to_send = total.checked_sub(funded.fee).ok_or_else(|| {
        AppError::AmountOutOfRange(format!("fee {} exceeds total {}", coins(funded.fee), coins(total)))
    })?;

    let summary = ConsolidationSummary {
        utxo_count: selected.len(),
        total,
        fee: funded.fee,
        amount_to_send,
    };
    summary.print();

    if !prompt.confirm("Do you want to proceed? (yes/no): ")? {
        println!("Consolidation cancelled.");
        return Ok(ConsolidationOutcome::Cancelled(summary));
    }

    let txid = sign_and_send(rpc, &funded.hex)?;
    println!("Consolidation completed, TXID: {}", txid);
    activity.info(&summary.log_line());
    activity.info(&format!("Consolidation completed, TXID: {}", txid));

    Ok(ConsolidationOutcome::Broadcast { summary, txid })
}

fn sign_and_send<R: CommandRunner>(rpc: &WalletRpc<R>, funded_hex: &str) -> Result<String, AppError> {
    let signed = rpc.sign_raw_transaction(funded_hex)?;
    if !signed.complete {
        let detail = if signed.errors.is_empty() {
            "daemon reported an incomplete signature".to_string()
        } else {
            signed
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        };
        return Err(AppError::IncompleteSignature(detail));
    }
    rpc.send_raw_transaction(&signed.hex)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpendOutcome {
    Sent(String),
    Cancelled,
    NegativeChange,
    Failed(String),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AutoSpendReport {
    /// `txid:vout` of each attempted UTXO with what happened to it.
    pub attempts: Vec<(String, SpendOutcome)>,
    pub skipped: usize,
}

impl AutoSpendReport {
    pub fn sent(&self) -> usize {
        self.attempts
            .iter()
            .filter(|(_, o)| matches!(o, SpendOutcome::Sent(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AutoSpendOutcome {
    NoUtxos,
    NoChangeAddress,
    Ran(AutoSpendReport),
}

/// Sends 0.01 back to the wallet address from every UTXO larger than that,
/// asking before each broadcast. A failure on one UTXO does not stop the rest.
pub fn auto_generate_spends<R: CommandRunner, P: Prompt>(
    rpc: &WalletRpc<R>,
    config: &WalletConfig,
    prompt: &mut P,
    activity: &ActivityLog,
) -> AutoSpendOutcome {
    let utxos = list_utxos(rpc);
    if utxos.is_empty() {
        println!("❌ No UTXOs available.");
        return AutoSpendOutcome::NoUtxos;
    }
    display_utxos(&utxos);

    let Some(change_address) = resolve_wallet_address(rpc, config) else {
        println!("❌ Failed to get a change address.");
        return AutoSpendOutcome::NoChangeAddress;
    };

    let mut report = AutoSpendReport::default();
    for utxo in &utxos {
        if utxo.amount <= TEST_SPEND_AMOUNT {
            report.skipped += 1;
            continue;
        }

        let outcome = match send_test_spend(rpc, utxo, &change_address, prompt, activity) {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("❌ Failed to create raw transaction: {}", e);
                activity.error(&format!("Failed to create raw transaction: {}", e));
                SpendOutcome::Failed(e.to_string())
            }
        };
        report.attempts.push((format!("{}:{}", utxo.txid, utxo.vout), outcome));
    }

    log::info!(
        "test spends: {} attempted, {} sent, {} skipped",
        report.attempts.len(),
        report.sent(),
        report.skipped
    );
    AutoSpendOutcome::Ran(report)
}

fn send_test_spend<R: CommandRunner, P: Prompt>(
    rpc: &WalletRpc<R>,
    utxo: &Utxo,
    change_address: &str,
    prompt: &mut P,
    activity: &ActivityLog,
) -> Result<SpendOutcome, AppError> {
    let raw_tx = rpc.create_raw_transaction(
        &[utxo.input_ref()],
        &single_output(change_address, TEST_SPEND_AMOUNT),
    )?;
    let funded = rpc.fund_raw_transaction(&raw_tx, &FundOptions::change_to(change_address, false))?;

    let change = change_sats(utxo.amount, funded.fee)?;
    let details = format!(
        "Amount to Send: {} {t}, Destination Address: {}, Transaction Fee: {} {t}, Change Amount: {} {t}",
        coins(TEST_SPEND_AMOUNT),
        change_address,
        coins(funded.fee),
        signed_coins(change),
        t = TICKER
    );

    println!("\nTransaction Details:");
    println!("Amount to Send: {} {}", coins(TEST_SPEND_AMOUNT), TICKER);
    println!("Destination Address: {}", change_address);
    println!("Transaction Fee: {} {}", coins(funded.fee), TICKER);
    println!("Change Amount: {} {}", signed_coins(change), TICKER);

    if change < 0 {
        println!("⚠️  Fee exceeds what this UTXO can cover after the 0.01 {} output; skipping.", TICKER);
        activity.warn(&format!("Skipped {}:{} with negative change. {}", utxo.txid, utxo.vout, details));
        return Ok(SpendOutcome::NegativeChange);
    }

    if !prompt.confirm("Do you want to proceed with this transaction? (yes/no): ")? {
        println!("Transaction cancelled.");
        return Ok(SpendOutcome::Cancelled);
    }

    let txid = sign_and_send(rpc, &funded.hex)?;
    println!("✅ Transaction sent! TXID: {}", txid);
    activity.info(&format!("Transaction Details: {}", details));
    activity.info(&format!("Transaction sent! TXID: {}", txid));

    Ok(SpendOutcome::Sent(txid))
}

/// Input minus the test amount minus the fee, in satoshis. May be negative.
fn change_sats(input: Amount, fee: Amount) -> Result<i64, AppError> {
    let to_i64 = |a: Amount| {
        i64::try_from(a.to_sat()).map_err(|_| AppError::AmountOutOfRange(format!("{} sats", a.to_sat())))
    };
    Ok(to_i64(input)? - to_i64(TEST_SPEND_AMOUNT)? - to_i64(fee)?)
}
