use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::lifecycle::OrderStatus;
use crate::domain::order::{DeliveryZone, NewOrder, Order, OrderLine};
use crate::domain::ports::OrderGateway;
use crate::domain::tracking::ZoneDirectory;

#[derive(Default)]
struct Store {
    orders: Vec<Order>,
    zones: Vec<DeliveryZone>,
}

/// Process-local gateway for development runs and tests. Holds no
/// transactions, so placement takes the two-step path.
#[derive(Default)]
pub struct InMemoryOrderGateway {
    store: Mutex<Store>,
}

impl InMemoryOrderGateway {
    pub fn new(zones: Vec<DeliveryZone>) -> Self {
        Self {
            store: Mutex::new(Store {
                orders: Vec::new(),
                zones,
            }),
        }
    }

    /// Every zone of the Iligan directory, all active.
    pub fn with_iligan_zones() -> Self {
        let zones = ZoneDirectory::iligan()
            .zone_names()
            .map(|name| DeliveryZone {
                name: name.to_string(),
                is_active: true,
            })
            .collect();
        Self::new(zones)
    }

    pub fn set_zone_active(&self, name: &str, is_active: bool) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        match store.zones.iter_mut().find(|z| z.name == name) {
            Some(zone) => zone.is_active = is_active,
            None => store.zones.push(DeliveryZone {
                name: name.to_string(),
                is_active,
            }),
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, DomainError> {
        self.store
            .lock()
            .map_err(|_| DomainError::Gateway("in-memory store poisoned".to_string()))
    }
}

impl OrderGateway for InMemoryOrderGateway {
    fn create_order(&self, header: &NewOrder) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.lock()?.orders.push(Order {
            id,
            buyer_id: header.buyer_id,
            created_at: Utc::now(),
            status: header.status,
            total: header.total.clone(),
            shipping_address: header.shipping_address.clone(),
            delivery_zone: Some(header.delivery_zone.clone()),
            contact_name: header.contact_name.clone(),
            contact_phone: header.contact_phone.clone(),
            payment_method: header.payment_method,
            lines: Vec::new(),
        });
        Ok(id)
    }

    fn create_order_lines(&self, order_id: Uuid, lines: &[OrderLine]) -> Result<(), DomainError> {
        if let Some(line) = lines.iter().find(|l| l.quantity < 1) {
            return Err(DomainError::Gateway(format!(
                "line '{}' has quantity {}",
                line.name, line.quantity
            )));
        }
        let mut store = self.lock()?;
        let order = store
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(DomainError::NotFound)?;
        order.lines.extend_from_slice(lines);
        Ok(())
    }

    fn delete_order(&self, order_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        let before = store.orders.len();
        store.orders.retain(|o| o.id != order_id);
        if store.orders.len() == before {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn update_order_status(
        &self,
        order_id: Uuid,
        buyer_id: Uuid,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        let order = store
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(DomainError::NotFound)?;
        if order.buyer_id != buyer_id {
            return Err(DomainError::Unauthorized);
        }
        if order.status != expected {
            return Err(DomainError::Conflict(format!(
                "order {order_id} is {}, expected {expected}",
                order.status
            )));
        }
        order.status = status;
        Ok(())
    }

    fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.lock()?.orders.iter().find(|o| o.id == order_id).cloned())
    }

    fn list_active_zones(&self) -> Result<Vec<DeliveryZone>, DomainError> {
        let mut zones: Vec<DeliveryZone> = self
            .lock()?
            .zones
            .iter()
            .filter(|z| z.is_active)
            .cloned()
            .collect();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(zones)
    }

    fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        // Insertion order is placement order, so reversing gives newest first.
        Ok(self
            .lock()?
            .orders
            .iter()
            .rev()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::order::PaymentMethod;

    fn header(buyer_id: Uuid) -> NewOrder {
        NewOrder {
            buyer_id,
            status: OrderStatus::Preparing,
            total: BigDecimal::from(40),
            shipping_address: "Iligan City, Brgy. Saray • Lot 9".to_string(),
            delivery_zone: "Saray".to_string(),
            contact_name: "Ben".to_string(),
            contact_phone: "0920".to_string(),
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn zero_quantity_line_is_refused() {
        let gateway = InMemoryOrderGateway::default();
        let id = gateway.create_order(&header(Uuid::new_v4())).unwrap();
        let line = OrderLine {
            item_id: Uuid::new_v4(),
            name: "Puto".to_string(),
            unit_price: BigDecimal::from(5),
            quantity: 0,
        };

        assert!(matches!(
            gateway.create_order_lines(id, &[line]),
            Err(DomainError::Gateway(_))
        ));
        assert!(gateway.find_order(id).unwrap().unwrap().lines.is_empty());
    }

    #[test]
    fn inactive_zones_are_hidden() {
        let gateway = InMemoryOrderGateway::with_iligan_zones();
        gateway.set_zone_active("Saray", false).unwrap();

        let zones = gateway.list_active_zones().unwrap();

        assert_eq!(zones.len(), 43);
        assert!(zones.iter().all(|z| z.name != "Saray"));
        assert!(zones.windows(2).all(|w| w[0].name <= w[1].name));
    }

    #[test]
    fn status_update_is_compare_and_set() {
        let gateway = InMemoryOrderGateway::default();
        let buyer = Uuid::new_v4();
        let id = gateway.create_order(&header(buyer)).unwrap();

        let stale = gateway.update_order_status(id, buyer, OrderStatus::Delivered, OrderStatus::Completed);
        assert!(matches!(stale, Err(DomainError::Conflict(_))));

        gateway
            .update_order_status(id, buyer, OrderStatus::Preparing, OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(gateway.find_order(id).unwrap().unwrap().status, OrderStatus::Cancelled);
    }

    #[test]
    fn orders_are_listed_newest_first_per_buyer() {
        let gateway = InMemoryOrderGateway::default();
        let buyer = Uuid::new_v4();
        let first = gateway.create_order(&header(buyer)).unwrap();
        gateway.create_order(&header(Uuid::new_v4())).unwrap();
        let second = gateway.create_order(&header(buyer)).unwrap();

        let ids: Vec<Uuid> = gateway
            .list_orders_for_buyer(buyer)
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();

        assert_eq!(ids, vec![second, first]);
    }
}
