use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{DeliveryZone, NewOrder, Order, OrderLine};
use crate::schema::{delivery_zones, order_lines, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub status: String,
    pub total: BigDecimal,
    pub shipping_address: String,
    pub delivery_zone: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_order(self, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            buyer_id: self.buyer_id,
            created_at: self.created_at,
            status: self.status.parse().map_err(corrupt_row(self.id))?,
            total: self.total,
            shipping_address: self.shipping_address,
            delivery_zone: self.delivery_zone,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            payment_method: self.payment_method.parse().map_err(corrupt_row(self.id))?,
            lines: lines.into_iter().map(OrderLine::from).collect(),
        })
    }
}

fn corrupt_row(order_id: Uuid) -> impl Fn(DomainError) -> DomainError {
    move |e| DomainError::Gateway(format!("order {order_id} holds unreadable data: {e}"))
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub status: String,
    pub total: BigDecimal,
    pub shipping_address: String,
    pub delivery_zone: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: String,
}

impl NewOrderRow {
    pub fn new(id: Uuid, header: &NewOrder) -> Self {
        Self {
            id,
            buyer_id: header.buyer_id,
            status: header.status.as_str().to_string(),
            total: header.total.clone(),
            shipping_address: header.shipping_address.clone(),
            delivery_zone: Some(header.delivery_zone.clone()),
            contact_name: header.contact_name.clone(),
            contact_phone: header.contact_phone.clone(),
            payment_method: header.payment_method.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub item_id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            item_id: row.item_id,
            name: row.name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub item_id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

impl NewOrderLineRow {
    pub fn for_order(order_id: Uuid, lines: &[OrderLine]) -> Vec<Self> {
        lines
            .iter()
            .zip(0..)
            .map(|(line, position)| Self {
                id: Uuid::new_v4(),
                order_id,
                position,
                item_id: line.item_id,
                name: line.name.clone(),
                unit_price: line.unit_price.clone(),
                quantity: line.quantity,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = delivery_zones)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryZoneRow {
    pub name: String,
    pub is_active: bool,
}

impl From<DeliveryZoneRow> for DeliveryZone {
    fn from(row: DeliveryZoneRow) -> Self {
        Self {
            name: row.name,
            is_active: row.is_active,
        }
    }
}
