//! Transaction approvals
//!
//! Records approval decisions and keeps cached listings consistent with
//! them.

mod service;

pub use service::{ApprovalService, INVALIDATED_ENDPOINTS};
