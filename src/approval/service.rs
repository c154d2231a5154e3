//! Approval service

use crate::error::Result;
use crate::fetch::{CustomFetch, Transport};
use crate::types::{
    SetTransactionApprovalParams, PAGINATED_TRANSACTIONS, SET_TRANSACTION_APPROVAL,
    TRANSACTIONS_BY_EMPLOYEE,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Cached endpoints whose results go stale once an approval changes
pub const INVALIDATED_ENDPOINTS: [&str; 2] = [PAGINATED_TRANSACTIONS, TRANSACTIONS_BY_EMPLOYEE];

/// Sends approval decisions through the shared fetcher
#[derive(Debug)]
pub struct ApprovalService<Tr> {
    fetcher: Arc<CustomFetch<Tr>>,
}

impl<Tr> Clone for ApprovalService<Tr> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<Tr: Transport> ApprovalService<Tr> {
    /// Create a service sharing `fetcher` with the listings it invalidates
    pub fn new(fetcher: Arc<CustomFetch<Tr>>) -> Self {
        Self { fetcher }
    }

    /// Approve or un-approve a transaction
    ///
    /// The request always bypasses the cache. On success every cached
    /// transaction listing is dropped; on failure the cache is left alone.
    pub async fn set_transaction_approval(
        &self,
        transaction_id: impl Into<String>,
        new_value: bool,
    ) -> Result<()> {
        let params = SetTransactionApprovalParams {
            transaction_id: transaction_id.into(),
            value: new_value,
        };

        let _: Option<Value> = self
            .fetcher
            .fetch_without_cache(SET_TRANSACTION_APPROVAL, &params)
            .await?;

        self.fetcher.clear_cache_by_endpoint(&INVALIDATED_ENDPOINTS);
        info!(
            "Transaction {} approval set to {}",
            params.transaction_id, params.value
        );
        Ok(())
    }
}
