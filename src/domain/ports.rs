use std::sync::Arc;

use uuid::Uuid;

use super::errors::DomainError;
use super::lifecycle::OrderStatus;
use super::order::{DeliveryZone, NewOrder, Order, OrderLine};

/// Remote store for orders and delivery zones.
pub trait OrderGateway: Send + Sync + 'static {
    fn create_order(&self, header: &NewOrder) -> Result<Uuid, DomainError>;

    fn create_order_lines(&self, order_id: Uuid, lines: &[OrderLine]) -> Result<(), DomainError>;

    fn delete_order(&self, order_id: Uuid) -> Result<(), DomainError>;

    /// Writes header and lines in one transaction. `None` when the store
    /// cannot do that, in which case callers fall back to the two-step write.
    fn create_order_with_lines(
        &self,
        _header: &NewOrder,
        _lines: &[OrderLine],
    ) -> Option<Result<Uuid, DomainError>> {
        None
    }

    /// Moves `order_id` from `expected` to `status` if `buyer_id` owns it and
    /// it is still in `expected`.
    fn update_order_status(
        &self,
        order_id: Uuid,
        buyer_id: Uuid,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<(), DomainError>;

    fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError>;

    fn list_active_zones(&self) -> Result<Vec<DeliveryZone>, DomainError>;

    /// Newest first, lines included.
    fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError>;
}

impl<G: OrderGateway + ?Sized> OrderGateway for Arc<G> {
    fn create_order(&self, header: &NewOrder) -> Result<Uuid, DomainError> {
        (**self).create_order(header)
    }

    fn create_order_lines(&self, order_id: Uuid, lines: &[OrderLine]) -> Result<(), DomainError> {
        (**self).create_order_lines(order_id, lines)
    }

    fn delete_order(&self, order_id: Uuid) -> Result<(), DomainError> {
        (**self).delete_order(order_id)
    }

    fn create_order_with_lines(
        &self,
        header: &NewOrder,
        lines: &[OrderLine],
    ) -> Option<Result<Uuid, DomainError>> {
        (**self).create_order_with_lines(header, lines)
    }

    fn update_order_status(
        &self,
        order_id: Uuid,
        buyer_id: Uuid,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<(), DomainError> {
        (**self).update_order_status(order_id, buyer_id, expected, status)
    }

    fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        (**self).find_order(order_id)
    }

    fn list_active_zones(&self) -> Result<Vec<DeliveryZone>, DomainError> {
        (**self).list_active_zones()
    }

    fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        (**self).list_orders_for_buyer(buyer_id)
    }
}
