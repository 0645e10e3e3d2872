//! Order status lifecycle.
//!
//! Forward progress runs `Preparing → Out for Delivery → Delivered → Completed`.
//! `Cancelled` is an absorbing state reachable only while the order is still
//! being prepared. Every legal move is listed in [`LEGAL_TRANSITIONS`]; there
//! is no implicit fallthrough.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Preparing,
    OutForDelivery,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const INITIAL: OrderStatus = OrderStatus::Preparing;

    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Position in the forward-progress order. `Cancelled` sits outside it.
    pub fn progress_index(self) -> Option<usize> {
        match self {
            OrderStatus::Preparing => Some(0),
            OrderStatus::OutForDelivery => Some(1),
            OrderStatus::Delivered => Some(2),
            OrderStatus::Completed => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    /// The next status in forward progress, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The order has left the origin.
    pub fn is_shipped(self) -> bool {
        self.progress_index()
            .is_some_and(|i| i >= Self::index_of(OrderStatus::OutForDelivery))
    }

    /// The order has reached the buyer, confirmed or not.
    pub fn is_completed(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Completed)
    }

    pub fn is_cancellable(self) -> bool {
        self.progress_index()
            .is_some_and(|i| i <= Self::index_of(OrderStatus::Preparing))
    }

    pub fn is_awaiting_receipt_confirmation(self) -> bool {
        self == OrderStatus::Delivered
    }

    /// Tracking bar fill, 0..=100, measured against `Delivered`.
    pub fn progress_percent(self) -> u8 {
        let max = Self::index_of(OrderStatus::Delivered);
        match self.progress_index() {
            Some(i) => ((i.min(max) * 100) / max) as u8,
            None => 0,
        }
    }

    fn index_of(status: OrderStatus) -> usize {
        status.progress_index().unwrap_or(usize::MAX)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown order status '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Buyer,
    /// Seller or rider acting on the order from the fulfilment side.
    Operator,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Buyer => f.write_str("buyer"),
            ActorRole::Operator => f.write_str("operator"),
        }
    }
}

impl FromStr for ActorRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(ActorRole::Buyer),
            "operator" => Ok(ActorRole::Operator),
            other => Err(DomainError::Validation(format!("unknown actor role '{other}'"))),
        }
    }
}

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Buyer(Uuid),
    Operator(Uuid),
}

impl Actor {
    pub fn new(role: ActorRole, id: Uuid) -> Self {
        match role {
            ActorRole::Buyer => Actor::Buyer(id),
            ActorRole::Operator => Actor::Operator(id),
        }
    }

    pub fn role(&self) -> ActorRole {
        match self {
            Actor::Buyer(_) => ActorRole::Buyer,
            Actor::Operator(_) => ActorRole::Operator,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Actor::Buyer(id) | Actor::Operator(id) => *id,
        }
    }
}

pub const LEGAL_TRANSITIONS: [(OrderStatus, ActorRole, OrderStatus); 4] = [
    (OrderStatus::Preparing, ActorRole::Buyer, OrderStatus::Cancelled),
    (OrderStatus::Delivered, ActorRole::Buyer, OrderStatus::Completed),
    (OrderStatus::Preparing, ActorRole::Operator, OrderStatus::OutForDelivery),
    (OrderStatus::OutForDelivery, ActorRole::Operator, OrderStatus::Delivered),
];

/// Rejects any (from, actor, to) triple that is not in [`LEGAL_TRANSITIONS`].
pub fn check_transition(
    from: OrderStatus,
    actor: ActorRole,
    to: OrderStatus,
) -> Result<(), DomainError> {
    if LEGAL_TRANSITIONS.contains(&(from, actor, to)) {
        Ok(())
    } else {
        Err(DomainError::IllegalTransition { from, to, actor })
    }
}

/// Statuses the given actor may move an order to from `from`.
pub fn available_transitions(from: OrderStatus, actor: ActorRole) -> Vec<OrderStatus> {
    LEGAL_TRANSITIONS
        .iter()
        .filter(|(f, a, _)| *f == from && *a == actor)
        .map(|(_, _, to)| *to)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buyer_can_cancel_while_preparing() {
        assert!(check_transition(OrderStatus::Preparing, ActorRole::Buyer, OrderStatus::Cancelled).is_ok());
    }

    #[test]
    fn buyer_cannot_cancel_once_out_for_delivery() {
        let err = check_transition(OrderStatus::OutForDelivery, ActorRole::Buyer, OrderStatus::Cancelled)
            .unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { .. }));
    }

    #[test]
    fn buyer_confirms_receipt_only_from_delivered() {
        assert!(check_transition(OrderStatus::Delivered, ActorRole::Buyer, OrderStatus::Completed).is_ok());
        assert!(check_transition(OrderStatus::Preparing, ActorRole::Buyer, OrderStatus::Completed).is_err());
        assert!(check_transition(OrderStatus::OutForDelivery, ActorRole::Buyer, OrderStatus::Completed).is_err());
    }

    #[test]
    fn buyer_cannot_cancel_after_delivery() {
        assert!(check_transition(OrderStatus::Delivered, ActorRole::Buyer, OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn buyer_cannot_advance_fulfilment() {
        assert!(check_transition(OrderStatus::Preparing, ActorRole::Buyer, OrderStatus::OutForDelivery).is_err());
        assert!(check_transition(OrderStatus::OutForDelivery, ActorRole::Buyer, OrderStatus::Delivered).is_err());
    }

    #[test]
    fn operator_advances_one_step_at_a_time() {
        assert!(check_transition(OrderStatus::Preparing, ActorRole::Operator, OrderStatus::OutForDelivery).is_ok());
        assert!(check_transition(OrderStatus::OutForDelivery, ActorRole::Operator, OrderStatus::Delivered).is_ok());
        assert!(check_transition(OrderStatus::Preparing, ActorRole::Operator, OrderStatus::Delivered).is_err());
        assert!(check_transition(OrderStatus::Delivered, ActorRole::Operator, OrderStatus::Completed).is_err());
        assert!(check_transition(OrderStatus::Preparing, ActorRole::Operator, OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn nothing_leaves_a_terminal_state() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in OrderStatus::ALL {
                for actor in [ActorRole::Buyer, ActorRole::Operator] {
                    assert!(check_transition(from, actor, to).is_err());
                }
            }
        }
    }

    #[test]
    fn legal_forward_moves_follow_next() {
        for (from, _, to) in LEGAL_TRANSITIONS {
            if to != OrderStatus::Cancelled {
                assert_eq!(from.next(), Some(to));
            }
        }
    }

    #[test]
    fn classification_predicates() {
        assert!(!OrderStatus::Preparing.is_shipped());
        assert!(OrderStatus::OutForDelivery.is_shipped());
        assert!(OrderStatus::Delivered.is_shipped());
        assert!(OrderStatus::Completed.is_shipped());
        assert!(!OrderStatus::Cancelled.is_shipped());

        assert!(OrderStatus::Delivered.is_completed());
        assert!(OrderStatus::Completed.is_completed());
        assert!(!OrderStatus::OutForDelivery.is_completed());

        assert!(OrderStatus::Preparing.is_cancellable());
        assert!(!OrderStatus::OutForDelivery.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());

        assert!(OrderStatus::Delivered.is_awaiting_receipt_confirmation());
        assert!(!OrderStatus::Completed.is_awaiting_receipt_confirmation());
    }

    #[test]
    fn progress_percent_is_measured_against_delivered() {
        assert_eq!(OrderStatus::Preparing.progress_percent(), 0);
        assert_eq!(OrderStatus::OutForDelivery.progress_percent(), 50);
        assert_eq!(OrderStatus::Delivered.progress_percent(), 100);
        assert_eq!(OrderStatus::Completed.progress_percent(), 100);
        assert_eq!(OrderStatus::Cancelled.progress_percent(), 0);
    }

    #[test]
    fn status_labels_parse_back() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn available_transitions_per_actor() {
        assert_eq!(
            available_transitions(OrderStatus::Preparing, ActorRole::Buyer),
            vec![OrderStatus::Cancelled]
        );
        assert_eq!(
            available_transitions(OrderStatus::Preparing, ActorRole::Operator),
            vec![OrderStatus::OutForDelivery]
        );
        assert!(available_transitions(OrderStatus::OutForDelivery, ActorRole::Buyer).is_empty());
    }
}
