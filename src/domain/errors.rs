use thiserror::Error;
use uuid::Uuid;

use super::lifecycle::{ActorRole, OrderStatus};

#[derive(Debug, Error)]
pub enum DomainError {
    /// Caller error; rejected before any gateway call.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order not found")]
    NotFound,

    /// Requested move is not in the legal (from, actor, to) table.
    #[error("Illegal transition from {from} to {to} by {actor}")]
    IllegalTransition {
        from: OrderStatus,
        to: OrderStatus,
        actor: ActorRole,
    },

    #[error("Requester is not allowed to modify this order")]
    Unauthorized,

    /// The persisted status no longer matches what the caller acted on.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A remote read or write failed. Safe to retry only for idempotent calls.
    #[error("Gateway failure: {0}")]
    Gateway(String),

    /// Compensation after a partial write failed; the order header is orphaned
    /// and needs manual reconciliation.
    #[error("Consistency failure: order {order_id} has no lines and could not be removed ({cause})")]
    Consistency { order_id: Uuid, cause: String },
}

impl DomainError {
    /// Whether the same call may be repeated as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Gateway(_))
    }
}
