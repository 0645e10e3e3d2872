use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{create_pool, DbPool};
use crate::domain::errors::DomainError;
use crate::domain::lifecycle::OrderStatus;
use crate::domain::order::{DeliveryZone, NewOrder, Order, OrderLine};
use crate::domain::ports::OrderGateway;
use crate::schema::{delivery_zones, order_lines, orders};

use super::models::{DeliveryZoneRow, NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Gateway(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Gateway(e.to_string())
    }
}

// ── Gateway ───────────────────────────────────────────────────────────────────

pub struct DieselOrderGateway {
    pool: DbPool,
}

impl DieselOrderGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and brings the schema up to date.
    pub fn connect(database_url: &str) -> Result<Self, DomainError> {
        let pool = create_pool(database_url)?;
        crate::run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn insert_header(conn: &mut PgConnection, header: &NewOrder) -> Result<Uuid, DomainError> {
        let order_id = Uuid::new_v4();
        diesel::insert_into(orders::table)
            .values(&NewOrderRow::new(order_id, header))
            .execute(conn)?;
        Ok(order_id)
    }

    fn insert_lines(
        conn: &mut PgConnection,
        order_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<(), DomainError> {
        diesel::insert_into(order_lines::table)
            .values(&NewOrderLineRow::for_order(order_id, lines))
            .execute(conn)?;
        Ok(())
    }
}

impl OrderGateway for DieselOrderGateway {
    fn create_order(&self, header: &NewOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        Self::insert_header(&mut conn, header)
    }

    fn create_order_lines(&self, order_id: Uuid, lines: &[OrderLine]) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        Self::insert_lines(&mut conn, order_id, lines)
    }

    fn delete_order(&self, order_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        // order_lines cascade
        let deleted = diesel::delete(orders::table.filter(orders::id.eq(order_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn create_order_with_lines(
        &self,
        header: &NewOrder,
        lines: &[OrderLine],
    ) -> Option<Result<Uuid, DomainError>> {
        let result = self.pool.get().map_err(DomainError::from).and_then(|mut conn| {
            conn.transaction::<_, DomainError, _>(|conn| {
                // 1. Insert the header
                let order_id = Self::insert_header(conn, header)?;
                // 2. Insert its lines; any failure rolls back both
                Self::insert_lines(conn, order_id, lines)?;
                Ok(order_id)
            })
        });
        Some(result)
    }

    fn update_order_status(
        &self,
        order_id: Uuid,
        buyer_id: Uuid,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(
                orders::table
                    .filter(orders::id.eq(order_id))
                    .filter(orders::buyer_id.eq(buyer_id))
                    .filter(orders::status.eq(expected.as_str())),
            )
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

            if updated == 1 {
                return Ok(());
            }

            // Nothing matched; work out which guard refused the write.
            let current: Option<(Uuid, String)> = orders::table
                .filter(orders::id.eq(order_id))
                .select((orders::buyer_id, orders::status))
                .first(conn)
                .optional()?;

            match current {
                None => Err(DomainError::NotFound),
                Some((owner, _)) if owner != buyer_id => Err(DomainError::Unauthorized),
                Some((_, actual)) => Err(DomainError::Conflict(format!(
                    "order {order_id} is {actual}, expected {expected}"
                ))),
            }
        })
    }

    fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .order(order_lines::position.asc())
            .load(&mut conn)?;

        order.into_order(lines).map(Some)
    }

    fn list_active_zones(&self) -> Result<Vec<DeliveryZone>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = delivery_zones::table
            .filter(delivery_zones::is_active.eq(true))
            .select(DeliveryZoneRow::as_select())
            .order(delivery_zones::name.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(DeliveryZone::from).collect())
    }

    fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = orders::table
                .filter(orders::buyer_id.eq(buyer_id))
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .load(conn)?;

            let lines = OrderLineRow::belonging_to(&rows)
                .select(OrderLineRow::as_select())
                .order(order_lines::position.asc())
                .load(conn)?;

            lines
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(lines, order)| order.into_order(lines))
                .collect()
        })
    }
}
