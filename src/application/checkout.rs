use uuid::Uuid;

use super::order_service::OrderService;
use crate::domain::cart::{Cart, CatalogItem};
use crate::domain::errors::DomainError;
use crate::domain::order::{Address, Order};
use crate::domain::ports::OrderGateway;

/// A buyer's session. Owns the cart for as long as the session lives.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    buyer_id: Uuid,
    cart: Cart,
}

impl CheckoutSession {
    pub fn new(buyer_id: Uuid) -> Self {
        Self {
            buyer_id,
            cart: Cart::new(),
        }
    }

    pub fn buyer_id(&self) -> Uuid {
        self.buyer_id
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Places the standing cart. The cart is emptied only once the order is
    /// stored; on failure it is left as it was so the buyer can retry.
    pub fn place_order<G: OrderGateway>(
        &mut self,
        service: &OrderService<G>,
        address: &Address,
    ) -> Result<Order, DomainError> {
        let order = service.place_order(&self.cart, address, self.buyer_id)?;
        self.cart.clear();
        Ok(order)
    }

    /// "Buy now": the cart is replaced by a single line of `item`.
    pub fn buy_now(&mut self, item: &CatalogItem, quantity: i32) {
        self.cart.replace(item, quantity);
    }
}
