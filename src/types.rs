//! Common types used throughout txn-approvals
//!
//! Wire types for the transactions API. Field names are camelCase on the
//! wire to match what the API serves.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoints
// ============================================================================

/// Endpoint serving pages of transactions
pub const PAGINATED_TRANSACTIONS: &str = "paginatedTransactions";

/// Endpoint serving the transactions of a single employee
pub const TRANSACTIONS_BY_EMPLOYEE: &str = "transactionsByEmployee";

/// Endpoint that records an approval decision
pub const SET_TRANSACTION_APPROVAL: &str = "setTransactionApproval";

// ============================================================================
// Records
// ============================================================================

/// An employee owning transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    /// First and last name joined by a space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A single financial transaction awaiting (or holding) an approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub employee: Employee,
    pub merchant: String,
    pub date: String,
    #[serde(default)]
    pub approved: bool,
}

// ============================================================================
// Pagination wire types
// ============================================================================

/// Page token. `None` on the wire is `null`.
pub type PageToken = Option<u32>;

/// Request parameters for a paginated endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedRequestParams {
    pub page: PageToken,
}

impl PaginatedRequestParams {
    /// Params for a given page token
    pub fn new(page: PageToken) -> Self {
        Self { page }
    }

    /// Params for the first page
    pub fn first() -> Self {
        Self { page: Some(0) }
    }
}

/// One page of results plus the token of the page after it
///
/// `next_page == None` means no further pages exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: T,
    pub next_page: PageToken,
}

impl<T> PaginatedResponse<T> {
    /// Create a page
    pub fn new(data: T, next_page: PageToken) -> Self {
        Self { data, next_page }
    }

    /// Whether another page can be requested after this one
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

// ============================================================================
// Approval wire types
// ============================================================================

/// Request parameters for `setTransactionApproval`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTransactionApprovalParams {
    pub transaction_id: String,
    pub value: bool,
}
