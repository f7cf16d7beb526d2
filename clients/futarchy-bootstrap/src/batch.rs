//! Transaction batching and co-signing
//!
//! Every transaction in a batch gets the same fee payer and the same
//! blockhash before anything is signed. Fresh keypairs then partially sign
//! their own transaction, and only after that is the batch handed to the
//! wallet for the fee payer signature.

use std::fmt;

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;

use crate::error::{BootstrapError, Result};

/// Which part of the bootstrap a transaction carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStep {
    InitializeDao,
    BaseVaults,
    QuoteVaults,
    PassMarket,
    FailMarket,
    TwapMarkets,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BootstrapStep::InitializeDao => "initialize-dao",
            BootstrapStep::BaseVaults => "base-vaults",
            BootstrapStep::QuoteVaults => "quote-vaults",
            BootstrapStep::PassMarket => "pass-market",
            BootstrapStep::FailMarket => "fail-market",
            BootstrapStep::TwapMarkets => "twap-markets",
        };
        f.write_str(label)
    }
}

/// Instructions for one transaction plus the fresh keypairs it references
#[derive(Debug)]
pub struct TransactionPlan {
    pub step: BootstrapStep,
    pub instructions: Vec<Instruction>,
    pub co_signers: Vec<Keypair>,
}

impl TransactionPlan {
    pub fn new(step: BootstrapStep, instructions: Vec<Instruction>) -> Self {
        Self {
            step,
            instructions,
            co_signers: Vec::new(),
        }
    }

    pub fn with_co_signers(mut self, co_signers: Vec<Keypair>) -> Self {
        self.co_signers = co_signers;
        self
    }
}

/// A transaction with payer, blockhash and co-signatures in place
#[derive(Debug, Clone)]
pub struct PreparedTransaction {
    pub step: BootstrapStep,
    pub transaction: Transaction,
}

pub fn assemble_batch(
    plans: Vec<TransactionPlan>,
    fee_payer: &Pubkey,
    blockhash: Hash,
) -> Result<Vec<PreparedTransaction>> {
    let mut batch = Vec::with_capacity(plans.len());

    for (index, plan) in plans.into_iter().enumerate() {
        let mut transaction = Transaction::new_with_payer(&plan.instructions, Some(fee_payer));
        // blockhash is part of the signed message
        transaction.message.recent_blockhash = blockhash;

        if !plan.co_signers.is_empty() {
            let signers: Vec<&Keypair> = plan.co_signers.iter().collect();
            transaction.try_partial_sign(&signers, blockhash)?;
        }
        verify_co_signed(index, &transaction, fee_payer)?;

        tracing::debug!(
            step = %plan.step,
            instructions = plan.instructions.len(),
            co_signers = plan.co_signers.len(),
            "assembled transaction"
        );
        batch.push(PreparedTransaction {
            step: plan.step,
            transaction,
        });
    }

    Ok(batch)
}

/// Every required signer other than the fee payer must already have signed
pub fn verify_co_signed(index: usize, transaction: &Transaction, fee_payer: &Pubkey) -> Result<()> {
    let required = transaction.message.header.num_required_signatures as usize;
    let signers = transaction.message.account_keys.iter().take(required);

    for (position, signer) in signers.enumerate() {
        if signer == fee_payer {
            continue;
        }
        let signed = transaction
            .signatures
            .get(position)
            .is_some_and(|sig| *sig != Signature::default());
        if !signed {
            return Err(BootstrapError::MissingCoSigner {
                index,
                signer: *signer,
            });
        }
    }
    Ok(())
}

/// The wallet must hand back one fully signed transaction per input, and
/// every signature must verify against its own message
pub fn verify_wallet_response(expected: usize, signed: &[Transaction]) -> Result<()> {
    if signed.len() != expected {
        return Err(BootstrapError::WalletCountMismatch {
            expected,
            returned: signed.len(),
        });
    }
    for (index, transaction) in signed.iter().enumerate() {
        if !transaction.is_signed() {
            return Err(BootstrapError::UnsignedTransaction { index });
        }
        if transaction.verify().is_err() {
            return Err(BootstrapError::InvalidSignature { index });
        }
    }
    Ok(())
}
