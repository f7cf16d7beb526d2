//! Conditional vault roles and nonce encoding
//!
//! Each proposal needs four vaults. A vault is keyed by
//! `(treasury, mint, nonce)`; the two high bits of the nonce encode the role
//! and the remaining 62 bits carry the proposal sequence number:
//!
//! | role       | quote bit (63) | fail bit (62) |
//! |------------|----------------|---------------|
//! | base-pass  | 0              | 0             |
//! | quote-pass | 1              | 0             |
//! | base-fail  | 0              | 1             |
//! | quote-fail | 1              | 1             |

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

use crate::constants::*;
use crate::error::{BootstrapError, Result};
use crate::instructions::conditional_vault::build_initialize_conditional_vault_ix;
use crate::pda::derive_conditional_vault_pda;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultRole {
    BasePass,
    QuotePass,
    BaseFail,
    QuoteFail,
}

impl VaultRole {
    pub const ALL: [VaultRole; 4] = [
        VaultRole::BasePass,
        VaultRole::QuotePass,
        VaultRole::BaseFail,
        VaultRole::QuoteFail,
    ];

    pub fn is_quote(&self) -> bool {
        matches!(self, VaultRole::QuotePass | VaultRole::QuoteFail)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, VaultRole::BaseFail | VaultRole::QuoteFail)
    }

    pub fn flags(&self) -> u64 {
        let mut flags = 0;
        if self.is_quote() {
            flags |= VAULT_NONCE_QUOTE_FLAG;
        }
        if self.is_fail() {
            flags |= VAULT_NONCE_FAIL_FLAG;
        }
        flags
    }

    /// Combine the role flags with a proposal sequence number.
    ///
    /// Sequence numbers that reach bit 62 would alias another role and are
    /// rejected.
    pub fn nonce(&self, sequence: u64) -> Result<u64> {
        if sequence & !VAULT_NONCE_SEQUENCE_MASK != 0 {
            return Err(BootstrapError::SequenceOverflow(sequence));
        }
        Ok(self.flags() | sequence)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VaultRole::BasePass => "base-pass",
            VaultRole::QuotePass => "quote-pass",
            VaultRole::BaseFail => "base-fail",
            VaultRole::QuoteFail => "quote-fail",
        }
    }
}

/// A vault to be created for one role
#[derive(Debug, Clone)]
pub struct VaultPlan {
    pub role: VaultRole,
    pub nonce: u64,
    pub underlying_mint: Pubkey,
    pub address: Pubkey,
    pub instruction: Instruction,
}

/// Plans for all four vaults of one proposal sequence number
#[derive(Debug, Clone)]
pub struct VaultSet {
    pub base_pass: VaultPlan,
    pub quote_pass: VaultPlan,
    pub base_fail: VaultPlan,
    pub quote_fail: VaultPlan,
}

impl VaultSet {
    pub fn build(
        payer: &Pubkey,
        treasury: &Pubkey,
        base_mint: &Pubkey,
        quote_mint: &Pubkey,
        sequence: u64,
        vault_program: &Pubkey,
    ) -> Result<Self> {
        let plan = |role: VaultRole| -> Result<VaultPlan> {
            let mint = if role.is_quote() { quote_mint } else { base_mint };
            let nonce = role.nonce(sequence)?;
            let (address, _) = derive_conditional_vault_pda(treasury, mint, nonce, vault_program)?;
            let instruction = build_initialize_conditional_vault_ix(
                payer,
                treasury,
                mint,
                nonce,
                vault_program,
            )?;
            tracing::debug!(role = role.label(), nonce, vault = %address, "planned vault");
            Ok(VaultPlan {
                role,
                nonce,
                underlying_mint: *mint,
                address,
                instruction,
            })
        };

        Ok(Self {
            base_pass: plan(VaultRole::BasePass)?,
            quote_pass: plan(VaultRole::QuotePass)?,
            base_fail: plan(VaultRole::BaseFail)?,
            quote_fail: plan(VaultRole::QuoteFail)?,
        })
    }

    /// base-pass + base-fail
    pub fn base_pair(&self) -> Vec<Instruction> {
        vec![
            self.base_pass.instruction.clone(),
            self.base_fail.instruction.clone(),
        ]
    }

    /// quote-pass + quote-fail
    pub fn quote_pair(&self) -> Vec<Instruction> {
        vec![
            self.quote_pass.instruction.clone(),
            self.quote_fail.instruction.clone(),
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &VaultPlan> {
        [&self.base_pass, &self.quote_pass, &self.base_fail, &self.quote_fail].into_iter()
    }
}
