//! Client-side bootstrap for futarchy governance
//!
//! Builds and submits, in one wallet approval, everything a new proposal
//! round needs on chain: the Dao (if absent), four conditional vaults, pass
//! and fail order book markets and their TWAP wrappers.

pub mod batch;
pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod instructions;
pub mod market;
pub mod pda;
pub mod provision;
pub mod rpc;
pub mod state;
pub mod submit;
pub mod vault;
pub mod wallet;

pub use batch::{BootstrapStep, PreparedTransaction, TransactionPlan};
pub use bootstrap::{BootstrapAddresses, BootstrapResult, DaoBootstrapper, SkipReason};
pub use cache::DaoCache;
pub use config::{ClientConfig, ProgramIds};
pub use error::{BootstrapError, Result};
pub use rpc::{RpcConnection, SendError, SendOptions};
pub use submit::{BootstrapOutcome, BootstrapReport, FailureKind, TxStatus};
pub use wallet::{KeypairWallet, WalletAdapter};
