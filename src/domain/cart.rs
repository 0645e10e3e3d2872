//! Cart aggregation.
//!
//! A cart holds at most one line per catalog item. Repeated additions merge
//! into the existing line. None of the operations fail; out-of-range input is
//! ignored.

use bigdecimal::BigDecimal;
use uuid::Uuid;

/// Catalog entry as read from the external catalog store.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    /// Advisory only; never checked when adding to the cart.
    pub stock: i32,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub image_url: Option<String>,
}

/// A cart entry with the item's display fields captured when it was first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item_id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub image_url: Option<String>,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub quantity: i32,
}

impl CartLine {
    fn snapshot(item: &CatalogItem, quantity: i32) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            unit_price: item.unit_price.clone(),
            image_url: item.image_url.clone(),
            owner_id: item.owner_id,
            owner_name: item.owner_name.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// Lines from one seller, for display.
#[derive(Debug)]
pub struct OwnerGroup<'a> {
    pub owner_id: Uuid,
    pub owner_name: &'a str,
    pub lines: Vec<&'a CartLine>,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, item_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    /// Adds `quantity` of `item`, merging into an existing line.
    pub fn add(&mut self, item: &CatalogItem, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::snapshot(item, quantity)),
        }
    }

    /// Shifts a line's quantity by `delta`, dropping the line at zero or below.
    pub fn set_quantity(&mut self, item_id: Uuid, delta: i32) {
        let Some(index) = self.lines.iter().position(|l| l.item_id == item_id) else {
            return;
        };
        let quantity = self.lines[index].quantity.saturating_add(delta);
        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity;
        }
    }

    /// "Buy now": the cart becomes exactly one line of `item`.
    pub fn replace(&mut self, item: &CatalogItem, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        self.lines.clear();
        self.lines.push(CartLine::snapshot(item, quantity));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn subtotal(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| acc + l.line_total())
    }

    /// Partitions lines by seller, in the order each seller first appears.
    pub fn grouped_by_owner(&self) -> Vec<OwnerGroup<'_>> {
        let mut groups: Vec<OwnerGroup<'_>> = Vec::new();
        for line in &self.lines {
            match groups.iter_mut().find(|g| g.owner_id == line.owner_id) {
                Some(group) => group.lines.push(line),
                None => groups.push(OwnerGroup {
                    owner_id: line.owner_id,
                    owner_name: &line.owner_name,
                    lines: vec![line],
                }),
            }
        }
        groups
    }
}
