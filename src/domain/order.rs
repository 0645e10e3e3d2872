use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::{Cart, CartLine};
use super::errors::DomainError;
use super::lifecycle::OrderStatus;

/// City prefix of every composed shipping address.
pub const SERVICE_CITY: &str = "Iligan City";

/// Marker placed before the zone name in a composed address.
pub const ZONE_MARKER: &str = "Brgy. ";

/// Decimal places kept for money; matches the `NUMERIC(12, 2)` columns.
pub const MONEY_SCALE: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    EWallet,
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "COD",
            PaymentMethod::EWallet => "E-Wallet",
            PaymentMethod::Card => "CreditCard",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" => Ok(PaymentMethod::CashOnDelivery),
            "E-Wallet" => Ok(PaymentMethod::EWallet),
            "CreditCard" => Ok(PaymentMethod::Card),
            other => Err(DomainError::Validation(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryZone {
    pub name: String,
    pub is_active: bool,
}

/// Delivery and payment details collected at checkout.
#[derive(Debug, Clone)]
pub struct Address {
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
    pub zone: String,
    pub payment: PaymentMethod,
}

impl Address {
    /// Checks the textual fields. Needs no I/O.
    pub fn validate_fields(&self) -> Result<(), DomainError> {
        let missing: Vec<&str> = [
            ("recipient name", &self.recipient_name),
            ("phone", &self.phone),
            ("address detail", &self.detail),
            ("zone", &self.zone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Checks the zone against the currently active zones.
    pub fn validate_zone(&self, active_zones: &[DeliveryZone]) -> Result<(), DomainError> {
        let zone = self.zone.trim();
        if active_zones
            .iter()
            .any(|z| z.is_active && z.name == zone)
        {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "'{}' is not an active delivery zone",
                self.zone
            )))
        }
    }

    /// `Iligan City, Brgy. {zone} • {detail}`
    pub fn shipping_address(&self) -> String {
        format!(
            "{SERVICE_CITY}, {ZONE_MARKER}{} • {}",
            self.zone.trim(),
            self.detail.trim()
        )
    }
}

/// Frozen copy of a cart line at placement time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

impl OrderLine {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id,
            name: line.name.clone(),
            unit_price: line.unit_price.clone(),
            quantity: line.quantity,
        }
    }
}

/// Order header as written on placement, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: Uuid,
    pub status: OrderStatus,
    pub total: BigDecimal,
    pub shipping_address: String,
    pub delivery_zone: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    pub fn from_checkout(cart: &Cart, address: &Address, buyer_id: Uuid) -> Self {
        Self {
            buyer_id,
            status: OrderStatus::INITIAL,
            total: cart.subtotal(),
            shipping_address: address.shipping_address(),
            delivery_zone: address.zone.trim().to_string(),
            contact_name: address.recipient_name.trim().to_string(),
            contact_phone: address.phone.trim().to_string(),
            payment_method: address.payment,
        }
    }

    /// The order as written, for when the store cannot be read back.
    /// `created_at` is local time, not the store's.
    pub fn into_order(self, id: Uuid, lines: Vec<OrderLine>) -> Order {
        Order {
            id,
            buyer_id: self.buyer_id,
            created_at: Utc::now(),
            status: self.status,
            total: self.total,
            shipping_address: self.shipping_address,
            delivery_zone: Some(self.delivery_zone),
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            payment_method: self.payment_method,
            lines,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    /// Snapshot taken at placement; never recomputed from `lines`.
    pub total: BigDecimal,
    pub shipping_address: String,
    /// Absent on orders written before the zone was stored on its own.
    pub delivery_zone: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<OrderLine>,
}
