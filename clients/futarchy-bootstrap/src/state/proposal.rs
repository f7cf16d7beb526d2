use std::fmt;

use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;

use super::strip_discriminator;
use crate::error::{BootstrapError, Result};

#[derive(BorshDeserialize, Clone, Debug, Copy, PartialEq, Eq)]
pub enum ProposalState {
    Pending,
    Passed,
    Failed,
    Executed,
}

impl ProposalState {
    pub fn is_passed(&self) -> bool {
        matches!(self, ProposalState::Passed | ProposalState::Executed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProposalState::Failed)
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProposalState::Pending => "Pending",
            ProposalState::Passed => "Passed",
            ProposalState::Failed => "Failed",
            ProposalState::Executed => "Executed",
        };
        f.write_str(label)
    }
}

#[derive(BorshDeserialize)]
struct AccountMetaLayout {
    pubkey: [u8; 32],
    is_signer: bool,
    is_writable: bool,
}

#[derive(BorshDeserialize)]
struct ProposalLayout {
    number: u32,
    proposer: [u8; 32],
    description_url: String,
    slot_enqueued: u64,
    state: ProposalState,
    instruction_program_id: [u8; 32],
    instruction_accounts: Vec<AccountMetaLayout>,
    instruction_data: Vec<u8>,
    twap_pass_market: [u8; 32],
    twap_fail_market: [u8; 32],
    base_pass_vault: [u8; 32],
    quote_pass_vault: [u8; 32],
    base_fail_vault: [u8; 32],
    quote_fail_vault: [u8; 32],
}

/// Instruction a proposal executes once it passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<(Pubkey, bool, bool)>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalAccount {
    pub number: u32,
    pub proposer: Pubkey,
    pub description_url: String,
    pub slot_enqueued: u64,
    pub state: ProposalState,
    pub instruction: ProposalInstruction,
    pub twap_pass_market: Pubkey,
    pub twap_fail_market: Pubkey,
    pub base_pass_vault: Pubkey,
    pub quote_pass_vault: Pubkey,
    pub base_fail_vault: Pubkey,
    pub quote_fail_vault: Pubkey,
}

impl ProposalAccount {
    pub const ACCOUNT_NAME: &'static str = "Proposal";

    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self> {
        let mut body = strip_discriminator(address, Self::ACCOUNT_NAME, data)?;
        let raw =
            ProposalLayout::deserialize(&mut body).map_err(|e| BootstrapError::AccountDecode {
                address: *address,
                reason: e.to_string(),
            })?;

        Ok(Self {
            number: raw.number,
            proposer: Pubkey::new_from_array(raw.proposer),
            description_url: raw.description_url,
            slot_enqueued: raw.slot_enqueued,
            state: raw.state,
            instruction: ProposalInstruction {
                program_id: Pubkey::new_from_array(raw.instruction_program_id),
                accounts: raw
                    .instruction_accounts
                    .into_iter()
                    .map(|m| (Pubkey::new_from_array(m.pubkey), m.is_signer, m.is_writable))
                    .collect(),
                data: raw.instruction_data,
            },
            twap_pass_market: Pubkey::new_from_array(raw.twap_pass_market),
            twap_fail_market: Pubkey::new_from_array(raw.twap_fail_market),
            base_pass_vault: Pubkey::new_from_array(raw.base_pass_vault),
            quote_pass_vault: Pubkey::new_from_array(raw.quote_pass_vault),
            base_fail_vault: Pubkey::new_from_array(raw.base_fail_vault),
            quote_fail_vault: Pubkey::new_from_array(raw.quote_fail_vault),
        })
    }

    pub fn status_label(&self) -> String {
        self.state.to_string()
    }
}
