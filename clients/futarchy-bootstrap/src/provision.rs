// Fixed-size program-owned account provisioning
//
// Order book side buffers and event queues are plain keypair accounts, so
// each one brings a fresh keypair that must co-sign the transaction holding
// its create_account instruction.

use std::collections::HashMap;

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_system_interface::instruction::create_account;

use crate::error::Result;
use crate::rpc::RpcConnection;

/// A new account and the keypair that must sign for it
#[derive(Debug)]
pub struct ProvisionedAccount {
    pub keypair: Keypair,
    pub space: usize,
    pub lamports: u64,
    pub instruction: Instruction,
}

impl ProvisionedAccount {
    pub fn new(payer: &Pubkey, space: usize, lamports: u64, owner: &Pubkey) -> Self {
        let keypair = Keypair::new();
        let instruction = create_account(payer, &keypair.pubkey(), lamports, space as u64, owner);
        Self {
            keypair,
            space,
            lamports,
            instruction,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

/// Rent-exempt minimums, fetched once per size for the lifetime of a run
#[derive(Debug, Default)]
pub struct RentSchedule {
    minimums: HashMap<usize, u64>,
}

impl RentSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn minimum_balance<C>(&mut self, connection: &C, space: usize) -> Result<u64>
    where
        C: RpcConnection + ?Sized,
    {
        if let Some(lamports) = self.minimums.get(&space) {
            return Ok(*lamports);
        }
        let lamports = connection
            .get_minimum_balance_for_rent_exemption(space)
            .await?;
        self.minimums.insert(space, lamports);
        Ok(lamports)
    }

    /// Fetch the rent minimum for `space` and build the account
    pub async fn provision<C>(
        &mut self,
        connection: &C,
        payer: &Pubkey,
        space: usize,
        owner: &Pubkey,
    ) -> Result<ProvisionedAccount>
    where
        C: RpcConnection + ?Sized,
    {
        let lamports = self.minimum_balance(connection, space).await?;
        let account = ProvisionedAccount::new(payer, space, lamports, owner);
        tracing::debug!(account = %account.pubkey(), space, lamports, "provisioned account");
        Ok(account)
    }
}
