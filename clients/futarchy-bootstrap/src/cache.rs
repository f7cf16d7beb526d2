//! Read-through cache of decoded Dao accounts
//!
//! Entries are keyed by Dao address and stay until explicitly invalidated.
//! A missing account or a failed fetch leaves the cache untouched.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::rpc::RpcConnection;
use crate::state::DaoAccount;

#[derive(Debug, Default)]
pub struct DaoCache {
    entries: RwLock<HashMap<Pubkey, DaoAccount>>,
}

impl DaoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, address: &Pubkey) -> Option<DaoAccount> {
        self.entries.read().await.get(address).cloned()
    }

    /// Return the cached Dao, fetching and decoding it on a miss.
    ///
    /// `Ok(None)` means the account does not exist yet.
    pub async fn get_or_fetch<C>(&self, connection: &C, address: &Pubkey) -> Result<Option<DaoAccount>>
    where
        C: RpcConnection + ?Sized,
    {
        if let Some(hit) = self.get(address).await {
            return Ok(Some(hit));
        }

        let Some(data) = connection.get_account_data(address).await? else {
            tracing::debug!(dao = %address, "dao account not found");
            return Ok(None);
        };
        let dao = DaoAccount::decode(address, &data)?;
        self.entries.write().await.insert(*address, dao.clone());
        tracing::debug!(dao = %address, proposal_count = dao.proposal_count, "cached dao");
        Ok(Some(dao))
    }

    /// Drop the entry for `address`; returns whether one was present
    pub async fn invalidate(&self, address: &Pubkey) -> bool {
        self.entries.write().await.remove(address).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
