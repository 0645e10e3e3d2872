use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::lifecycle::{check_transition, Actor, OrderStatus};
use crate::domain::order::{Address, DeliveryZone, NewOrder, Order, OrderLine};
use crate::domain::ports::OrderGateway;

pub struct OrderService<G> {
    gateway: G,
}

impl<G: OrderGateway> OrderService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn active_zones(&self) -> Result<Vec<DeliveryZone>, DomainError> {
        self.gateway.list_active_zones()
    }

    /// Turns a cart into a persisted order in its initial status.
    ///
    /// Header and lines go through a single transaction when the gateway
    /// offers one. Otherwise the header is written first and deleted again
    /// if the lines cannot be written, so no order is left without lines.
    /// The cart is not touched; clearing it is the caller's job.
    pub fn place_order(
        &self,
        cart: &Cart,
        address: &Address,
        buyer_id: Uuid,
    ) -> Result<Order, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::Validation("cart is empty".to_string()));
        }
        if buyer_id.is_nil() {
            return Err(DomainError::Validation("buyer is required".to_string()));
        }
        address.validate_fields()?;
        address.validate_zone(&self.gateway.list_active_zones()?)?;

        let header = NewOrder::from_checkout(cart, address, buyer_id);
        let lines: Vec<OrderLine> = cart.lines().iter().map(OrderLine::from).collect();

        let order_id = match self.gateway.create_order_with_lines(&header, &lines) {
            Some(result) => result?,
            None => self.write_in_two_steps(&header, &lines)?,
        };

        log::info!(
            "Placed order {} for buyer {} ({} lines, total {})",
            order_id,
            buyer_id,
            lines.len(),
            header.total
        );

        // Stored from here on; a failed read-back is not a placement failure.
        match self.gateway.find_order(order_id) {
            Ok(Some(order)) => Ok(order),
            Ok(None) => {
                log::warn!("Order {order_id} not visible right after placement");
                Ok(header.into_order(order_id, lines))
            }
            Err(e) => {
                log::warn!("Reading back order {order_id} failed, using the written copy: {e}");
                Ok(header.into_order(order_id, lines))
            }
        }
    }

    fn write_in_two_steps(
        &self,
        header: &NewOrder,
        lines: &[OrderLine],
    ) -> Result<Uuid, DomainError> {
        let order_id = self.gateway.create_order(header)?;

        if let Err(line_err) = self.gateway.create_order_lines(order_id, lines) {
            log::warn!("Writing lines for order {order_id} failed, rolling back: {line_err}");
            return match self.gateway.delete_order(order_id) {
                Ok(()) => Err(DomainError::Gateway(format!(
                    "order lines rejected, order {order_id} rolled back: {line_err}"
                ))),
                Err(delete_err) => {
                    log::error!(
                        "Order {order_id} is orphaned without lines; rollback failed: {delete_err}"
                    );
                    Err(DomainError::Consistency {
                        order_id,
                        cause: format!("lines: {line_err}; rollback: {delete_err}"),
                    })
                }
            };
        }

        Ok(order_id)
    }

    /// Applies a status change on behalf of `actor` and returns the order as
    /// stored afterwards.
    ///
    /// The operator role is self-declared at this boundary: any identity
    /// other than the order's buyer may claim it. Authenticating operators
    /// is left to whatever sits in front of this service.
    pub fn transition(
        &self,
        order_id: Uuid,
        actor: Actor,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        let order = self.order(order_id)?;
        check_transition(order.status, actor.role(), target)?;

        // Buyers act on their own orders and the store checks ownership.
        // Operators act on the owner's behalf but may not be the owner.
        let owner_id = match actor {
            Actor::Buyer(id) => id,
            Actor::Operator(id) if id == order.buyer_id => {
                log::warn!("Buyer {id} attempted an operator transition on order {order_id}");
                return Err(DomainError::Unauthorized);
            }
            Actor::Operator(_) => order.buyer_id,
        };

        self.gateway
            .update_order_status(order_id, owner_id, order.status, target)
            .inspect_err(|e| {
                log::warn!(
                    "Status change {} -> {} on order {} rejected: {}",
                    order.status,
                    target,
                    order_id,
                    e
                )
            })?;

        log::info!(
            "Order {} moved {} -> {} by {}",
            order_id,
            order.status,
            target,
            actor.role()
        );

        self.order(order_id)
    }

    pub fn order(&self, order_id: Uuid) -> Result<Order, DomainError> {
        self.gateway.find_order(order_id)?.ok_or(DomainError::NotFound)
    }

    pub fn orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.gateway.list_orders_for_buyer(buyer_id)
    }
}
