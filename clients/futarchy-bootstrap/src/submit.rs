//! Concurrent submission and confirmation tracking
//!
//! Each transaction moves through
//! `Built -> Signed -> Submitted -> Confirmed | Failed`. All sends are issued
//! at once; one rejection never cancels the others. The report is only built
//! after every transaction reaches a terminal state.

use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use solana_sdk::instruction::InstructionError;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};
use solana_system_interface::program::ID as system_program;
use tokio::time::{sleep, Instant};

use crate::batch::BootstrapStep;
use crate::rpc::{RpcConnection, SendError, SendOptions};

// SystemError::AccountAlreadyInUse
const SYSTEM_ACCOUNT_ALREADY_IN_USE: u32 = 0;
// SystemError::ResultWithNegativeLamports
const SYSTEM_NEGATIVE_LAMPORTS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InsufficientFunds,
    BlockhashExpired,
    AccountInUse,
    /// An instruction was rejected by its program
    ProgramError { instruction: u8, code: Option<u32>, detail: String },
    ProgramMissing,
    Timeout,
    Rpc(String),
    Other(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InsufficientFunds => f.write_str("insufficient funds"),
            FailureKind::BlockhashExpired => f.write_str("blockhash expired"),
            FailureKind::AccountInUse => f.write_str("account already in use"),
            FailureKind::ProgramError { instruction, code: Some(code), .. } => {
                write!(f, "instruction {instruction} failed with custom error {code}")
            }
            FailureKind::ProgramError { instruction, detail, .. } => {
                write!(f, "instruction {instruction} failed: {detail}")
            }
            FailureKind::ProgramMissing => f.write_str("program not deployed"),
            FailureKind::Timeout => f.write_str("not confirmed before timeout"),
            FailureKind::Rpc(msg) => write!(f, "rpc: {msg}"),
            FailureKind::Other(msg) => f.write_str(msg),
        }
    }
}

/// Map a cluster error onto a failure kind, using the transaction to tell
/// system-program errors apart from custom program errors.
pub fn classify(err: &TransactionError, transaction: &Transaction) -> FailureKind {
    match err {
        TransactionError::InsufficientFundsForFee
        | TransactionError::InsufficientFundsForRent { .. } => FailureKind::InsufficientFunds,
        TransactionError::BlockhashNotFound => FailureKind::BlockhashExpired,
        TransactionError::AccountInUse => FailureKind::AccountInUse,
        TransactionError::ProgramAccountNotFound | TransactionError::InvalidProgramForExecution => {
            FailureKind::ProgramMissing
        }
        TransactionError::InstructionError(index, ix_err) => {
            classify_instruction_error(*index, ix_err, transaction)
        }
        other => FailureKind::Other(other.to_string()),
    }
}

fn classify_instruction_error(
    index: u8,
    err: &InstructionError,
    transaction: &Transaction,
) -> FailureKind {
    let on_system_program = transaction
        .message
        .instructions
        .get(index as usize)
        .and_then(|ix| transaction.message.account_keys.get(ix.program_id_index as usize))
        .is_some_and(|program| *program == system_program);

    match err {
        InstructionError::AccountAlreadyInitialized => FailureKind::AccountInUse,
        InstructionError::InsufficientFunds => FailureKind::InsufficientFunds,
        InstructionError::Custom(SYSTEM_ACCOUNT_ALREADY_IN_USE) if on_system_program => {
            FailureKind::AccountInUse
        }
        InstructionError::Custom(SYSTEM_NEGATIVE_LAMPORTS) if on_system_program => {
            FailureKind::InsufficientFunds
        }
        InstructionError::UnsupportedProgramId => FailureKind::ProgramMissing,
        InstructionError::Custom(code) => FailureKind::ProgramError {
            instruction: index,
            code: Some(*code),
            detail: err.to_string(),
        },
        other => FailureKind::ProgramError {
            instruction: index,
            code: None,
            detail: other.to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Built,
    Signed,
    Submitted,
    Confirmed,
    Failed(FailureKind),
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Confirmed | TxStatus::Failed(_))
    }

    fn can_advance_to(&self, next: &TxStatus) -> bool {
        matches!(
            (self, next),
            (TxStatus::Built, TxStatus::Signed)
                | (TxStatus::Built, TxStatus::Failed(_))
                | (TxStatus::Signed, TxStatus::Submitted)
                | (TxStatus::Signed, TxStatus::Failed(_))
                | (TxStatus::Submitted, TxStatus::Confirmed)
                | (TxStatus::Submitted, TxStatus::Failed(_))
        )
    }
}

#[derive(Debug, Clone)]
pub struct TrackedTransaction {
    pub step: BootstrapStep,
    /// Fee payer signature, which is also the transaction id
    pub signature: Signature,
    pub status: TxStatus,
}

impl TrackedTransaction {
    pub fn new(step: BootstrapStep, transaction: &Transaction) -> Self {
        let signature = transaction.signatures.first().copied().unwrap_or_default();
        let status = if transaction.is_signed() {
            TxStatus::Signed
        } else {
            TxStatus::Built
        };
        Self {
            step,
            signature,
            status,
        }
    }

    /// Move to `next` if the lifecycle allows it
    pub fn advance(&mut self, next: TxStatus) -> bool {
        if !self.status.can_advance_to(&next) {
            tracing::debug!(step = %self.step, from = ?self.status, to = ?next, "ignored status change");
            return false;
        }
        self.status = next;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Complete,
    Partial {
        confirmed: Vec<BootstrapStep>,
        failed: Vec<(BootstrapStep, FailureKind)>,
    },
    Failed,
}

/// Terminal state of every transaction in one batch
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    transactions: Vec<TrackedTransaction>,
}

impl BootstrapReport {
    pub fn transactions(&self) -> &[TrackedTransaction] {
        &self.transactions
    }

    pub fn confirmed_steps(&self) -> Vec<BootstrapStep> {
        self.transactions
            .iter()
            .filter(|t| t.status == TxStatus::Confirmed)
            .map(|t| t.step)
            .collect()
    }

    pub fn failures(&self) -> Vec<(BootstrapStep, FailureKind)> {
        self.transactions
            .iter()
            .filter_map(|t| match &t.status {
                TxStatus::Failed(kind) => Some((t.step, kind.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn any_confirmed(&self) -> bool {
        self.transactions.iter().any(|t| t.status == TxStatus::Confirmed)
    }

    pub fn outcome(&self) -> BootstrapOutcome {
        let confirmed = self.confirmed_steps();
        let failed = self.failures();
        if failed.is_empty() {
            BootstrapOutcome::Complete
        } else if confirmed.is_empty() {
            BootstrapOutcome::Failed
        } else {
            BootstrapOutcome::Partial { confirmed, failed }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConfirmPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Send every signed transaction concurrently, then poll until each one is
/// confirmed, rejected or out of time.
pub async fn submit_batch<C>(
    connection: &C,
    batch: Vec<(BootstrapStep, Transaction)>,
    options: SendOptions,
    policy: ConfirmPolicy,
) -> BootstrapReport
where
    C: RpcConnection + ?Sized,
{
    let mut tracked: Vec<TrackedTransaction> = batch
        .iter()
        .map(|(step, tx)| TrackedTransaction::new(*step, tx))
        .collect();

    let sends = batch
        .iter()
        .map(|(_, tx)| connection.send_transaction(tx, options));
    let results = join_all(sends).await;

    for ((entry, (_, tx)), result) in tracked.iter_mut().zip(&batch).zip(results) {
        match result {
            Ok(signature) => {
                tracing::info!(step = %entry.step, %signature, "submitted");
                entry.signature = signature;
                entry.advance(TxStatus::Submitted);
            }
            Err(err) => {
                let kind = match err {
                    SendError::Transaction(tx_err) => classify(&tx_err, tx),
                    SendError::Rpc(msg) => FailureKind::Rpc(msg),
                };
                tracing::warn!(step = %entry.step, failure = %kind, "send rejected");
                entry.advance(TxStatus::Failed(kind));
            }
        }
    }

    await_confirmations(connection, &mut tracked, &batch, policy).await;
    BootstrapReport {
        transactions: tracked,
    }
}

async fn await_confirmations<C>(
    connection: &C,
    tracked: &mut [TrackedTransaction],
    batch: &[(BootstrapStep, Transaction)],
    policy: ConfirmPolicy,
) where
    C: RpcConnection + ?Sized,
{
    let deadline = Instant::now() + policy.timeout;

    loop {
        let pending: Vec<usize> = tracked
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == TxStatus::Submitted)
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            return;
        }

        let polls = pending
            .iter()
            .map(|&i| connection.get_signature_status(&tracked[i].signature));
        let statuses = join_all(polls).await;

        for (&i, status) in pending.iter().zip(statuses) {
            let entry = &mut tracked[i];
            match status {
                Ok(Some(Ok(()))) => {
                    tracing::info!(step = %entry.step, signature = %entry.signature, "confirmed");
                    entry.advance(TxStatus::Confirmed);
                }
                Ok(Some(Err(tx_err))) => {
                    let kind = classify(&tx_err, &batch[i].1);
                    tracing::warn!(step = %entry.step, failure = %kind, "transaction failed");
                    entry.advance(TxStatus::Failed(kind));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(step = %entry.step, error = %err, "status poll failed");
                }
            }
        }

        if tracked.iter().all(|t| t.status.is_terminal()) {
            return;
        }
        if Instant::now() >= deadline {
            for entry in tracked.iter_mut().filter(|t| t.status == TxStatus::Submitted) {
                tracing::warn!(step = %entry.step, signature = %entry.signature, "confirmation timed out");
                entry.advance(TxStatus::Failed(FailureKind::Timeout));
            }
            return;
        }
        sleep(policy.poll_interval).await;
    }
}
