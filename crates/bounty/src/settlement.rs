//! The settlement boundary: the external value-transfer primitive.
//!
//! Claims move real value through a collaborator system (a token
//! transfer, a payment rail). The protocol only requires that the
//! transfer be invoked after all claim checks pass and before the
//! bookkeeping is persisted.

use async_trait::async_trait;
use thiserror::Error;

use bounty_core::{AccountId, RecordAddress};

/// Settlement failures, opaque to the ledger.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    #[error("settlement backend unavailable: {0}")]
    Unavailable(String),
}

/// The external value-transfer primitive.
#[async_trait]
pub trait Settlement: Send + Sync {
    /// Move `amount` from the treasury's holding account to the
    /// recipient's.
    async fn transfer(
        &self,
        from: RecordAddress,
        to: AccountId,
        amount: u64,
    ) -> Result<(), SettlementError>;
}

#[async_trait]
impl<T: Settlement + ?Sized> Settlement for std::sync::Arc<T> {
    async fn transfer(
        &self,
        from: RecordAddress,
        to: AccountId,
        amount: u64,
    ) -> Result<(), SettlementError> {
        (**self).transfer(from, to, amount).await
    }
}

/// A settlement backend that accepts every transfer without moving
/// anything. For bookkeeping-only deployments and examples.
pub struct NoopSettlement;

#[async_trait]
impl Settlement for NoopSettlement {
    async fn transfer(
        &self,
        _from: RecordAddress,
        _to: AccountId,
        _amount: u64,
    ) -> Result<(), SettlementError> {
        Ok(())
    }
}
