//! Wallet/session seam

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;

use crate::error::{BootstrapError, Result};

#[async_trait(?Send)]
pub trait WalletAdapter {
    /// Identity of the connected wallet, `None` while disconnected
    fn public_key(&self) -> Option<Pubkey>;

    async fn connect(&self) -> Result<Pubkey>;

    async fn disconnect(&self) -> Result<()>;

    /// Whether the wallet can approve a batch in one prompt
    fn supports_sign_all(&self) -> bool {
        true
    }

    /// Add the wallet signature to every transaction, keeping signatures
    /// already present.
    async fn sign_all_transactions(&self, transactions: Vec<Transaction>)
        -> Result<Vec<Transaction>>;
}

/// Wallet backed by a local keypair
pub struct KeypairWallet {
    keypair: Keypair,
    connected: AtomicBool,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair,
            connected: AtomicBool::new(false),
        }
    }

    /// A wallet that starts out connected
    pub fn connected(keypair: Keypair) -> Self {
        Self {
            keypair,
            connected: AtomicBool::new(true),
        }
    }
}

#[async_trait(?Send)]
impl WalletAdapter for KeypairWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.connected
            .load(Ordering::Acquire)
            .then(|| self.keypair.pubkey())
    }

    async fn connect(&self) -> Result<Pubkey> {
        self.connected.store(true, Ordering::Release);
        Ok(self.keypair.pubkey())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }

    async fn sign_all_transactions(
        &self,
        mut transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(BootstrapError::Wallet("wallet is not connected".to_string()));
        }
        for tx in transactions.iter_mut() {
            let blockhash = tx.message.recent_blockhash;
            tx.try_partial_sign(&[&self.keypair], blockhash)?;
        }
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::instruction::{AccountMeta, Instruction};

    #[tokio::test]
    async fn connect_and_disconnect_toggle_identity() {
        let wallet = KeypairWallet::new(Keypair::new());
        assert!(wallet.public_key().is_none());

        let key = wallet.connect().await.unwrap();
        assert_eq!(wallet.public_key(), Some(key));

        wallet.disconnect().await.unwrap();
        assert!(wallet.public_key().is_none());
    }

    #[tokio::test]
    async fn signing_keeps_existing_co_signatures() {
        let owner = Keypair::new();
        let co_signer = Keypair::new();
        let ix = Instruction {
            program_id: Keypair::new().pubkey(),
            accounts: vec![AccountMeta::new(co_signer.pubkey(), true)],
            data: vec![],
        };
        let mut tx = Transaction::new_with_payer(&[ix], Some(&owner.pubkey()));
        let blockhash = Hash::new_from_array([7u8; 32]);
        tx.message.recent_blockhash = blockhash;
        tx.try_partial_sign(&[&co_signer], blockhash).unwrap();
        assert!(!tx.is_signed());

        let wallet = KeypairWallet::connected(owner);
        let signed = wallet.sign_all_transactions(vec![tx]).await.unwrap();
        assert!(signed[0].is_signed());
        assert!(signed[0].verify().is_ok());
    }

    #[tokio::test]
    async fn disconnected_wallet_refuses_to_sign() {
        let wallet = KeypairWallet::new(Keypair::new());
        let err = wallet.sign_all_transactions(vec![]).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Wallet(_)));
    }
}
