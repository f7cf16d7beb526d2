//! Network connection seam
//!
//! The orchestrator only needs five calls from a cluster. `RpcConnection`
//! names them; the non-blocking `RpcClient` is the production implementation.

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};

use crate::config::ClientConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self { skip_preflight: true }
    }
}

/// Why a send was refused before a signature was returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The cluster (or preflight) rejected the transaction itself
    Transaction(TransactionError),
    /// Transport or node failure
    Rpc(String),
}

#[async_trait(?Send)]
pub trait RpcConnection {
    async fn get_latest_blockhash(&self) -> Result<Hash>;

    async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        options: SendOptions,
    ) -> std::result::Result<Signature, SendError>;

    /// `None` while the cluster has not processed the signature yet
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<std::result::Result<(), TransactionError>>>;

    /// `None` if no account exists at `address`
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;
}

/// Build a non-blocking RPC client from configuration
pub fn connect(config: &ClientConfig) -> Result<RpcClient> {
    let commitment = config.commitment_config()?;
    Ok(RpcClient::new_with_commitment(config.rpc_url.clone(), commitment))
}

#[async_trait(?Send)]
impl RpcConnection for RpcClient {
    async fn get_latest_blockhash(&self) -> Result<Hash> {
        Ok(RpcClient::get_latest_blockhash(self).await?)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64> {
        Ok(RpcClient::get_minimum_balance_for_rent_exemption(self, space).await?)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        options: SendOptions,
    ) -> std::result::Result<Signature, SendError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            ..RpcSendTransactionConfig::default()
        };
        self.send_transaction_with_config(transaction, config)
            .await
            .map_err(classify_client_error)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<std::result::Result<(), TransactionError>>> {
        Ok(RpcClient::get_signature_status(self, signature).await?)
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }
}

fn classify_client_error(err: ClientError) -> SendError {
    match err.get_transaction_error() {
        Some(tx_err) => SendError::Transaction(tx_err),
        None => SendError::Rpc(err.to_string()),
    }
}
