use std::str::FromStr;
use std::time::Duration;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::domain::cart::{Cart, CatalogItem};
use crate::domain::lifecycle::{Actor, ActorRole, OrderStatus};
use crate::domain::order::{Address, Order, PaymentMethod, MONEY_SCALE};
use crate::domain::tracking::{current_position, is_in_transit, progress};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLineRequest {
    pub item_id: Uuid,
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "49.50"
    pub unit_price: String,
    pub quantity: i32,
    pub owner_id: Uuid,
    pub owner_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressRequest {
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
    pub zone: String,
    /// One of `COD`, `E-Wallet`, `CreditCard`. Defaults to `COD`.
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub buyer_id: Uuid,
    pub lines: Vec<CartLineRequest>,
    pub address: AddressRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub item_id: Uuid,
    pub name: String,
    pub unit_price: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub status: String,
    pub created_at: String,
    pub total: String,
    pub shipping_address: String,
    pub delivery_zone: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: String,
    pub is_cancellable: bool,
    pub awaiting_receipt_confirmation: bool,
    pub progress_percent: u8,
    pub lines: Vec<OrderLineResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            buyer_id: order.buyer_id,
            status: order.status.to_string(),
            created_at: order.created_at.to_rfc3339(),
            total: order.total.to_string(),
            shipping_address: order.shipping_address,
            delivery_zone: order.delivery_zone,
            contact_name: order.contact_name,
            contact_phone: order.contact_phone,
            payment_method: order.payment_method.to_string(),
            is_cancellable: order.status.is_cancellable(),
            awaiting_receipt_confirmation: order.status.is_awaiting_receipt_confirmation(),
            progress_percent: order.status.progress_percent(),
            lines: order
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    item_id: l.item_id,
                    name: l.name,
                    unit_price: l.unit_price.to_string(),
                    quantity: l.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ZoneResponse {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// `buyer` or `operator`
    pub actor: String,
    pub actor_id: Uuid,
    /// Target status label, e.g. "Completed"
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BuyerQuery {
    /// Buyer whose orders to list
    pub buyer_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PositionQuery {
    /// Milliseconds since the order entered its current status.
    #[serde(default)]
    pub elapsed_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PositionResponse {
    pub order_id: Uuid,
    pub status: String,
    pub lat: f64,
    pub lng: f64,
    /// Animation progress, 0.0 to 1.0
    pub progress: f64,
    pub in_transit: bool,
}

// ── Request parsing ──────────────────────────────────────────────────────────

fn build_cart(lines: &[CartLineRequest]) -> Result<Cart, AppError> {
    let mut cart = Cart::new();
    for line in lines {
        let unit_price = BigDecimal::from_str(&line.unit_price).map_err(|e| {
            AppError::BadRequest(format!("Invalid unit_price '{}': {}", line.unit_price, e))
        })?;
        if unit_price < BigDecimal::from(0) {
            return Err(AppError::BadRequest(format!(
                "unit_price for '{}' must not be negative",
                line.name
            )));
        }
        let (_, scale) = unit_price.normalized().as_bigint_and_exponent();
        if scale > MONEY_SCALE {
            return Err(AppError::BadRequest(format!(
                "unit_price for '{}' has more than {} decimal places",
                line.name, MONEY_SCALE
            )));
        }
        let item = CatalogItem {
            id: line.item_id,
            name: line.name.clone(),
            unit_price,
            stock: 0,
            owner_id: line.owner_id,
            owner_name: line.owner_name.clone(),
            image_url: line.image_url.clone(),
        };
        cart.add(&item, line.quantity);
    }
    Ok(cart)
}

fn build_address(req: &AddressRequest) -> Result<Address, AppError> {
    let payment = match req.payment_method.as_deref() {
        Some(tag) => PaymentMethod::from_str(tag)?,
        None => PaymentMethod::default(),
    };
    Ok(Address {
        recipient_name: req.recipient_name.clone(),
        phone: req.phone.clone(),
        detail: req.detail.clone(),
        zone: req.zone.clone(),
        payment,
    })
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /zones
///
/// Delivery zones currently accepting orders, sorted by name.
#[utoipa::path(
    get,
    path = "/zones",
    responses(
        (status = 200, description = "Active delivery zones", body = [ZoneResponse]),
        (status = 502, description = "Order store unavailable"),
    ),
    tag = "zones"
)]
pub async fn list_zones(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let zones = web::block(move || state.orders.active_zones())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ZoneResponse> = zones
        .into_iter()
        .map(|z| ZoneResponse { name: z.name })
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /orders
///
/// Places an order from the submitted cart lines. Lines for the same item are
/// merged before the order is written. The order starts out `Preparing`.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty cart or incomplete address"),
        (status = 502, description = "Order store unavailable; nothing was kept"),
        (status = 500, description = "Order left without lines; needs reconciliation"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let cart = build_cart(&body.lines)?;
    let address = build_address(&body.address)?;
    let buyer_id = body.buyer_id;

    let order = web::block(move || state.orders.place_order(&cart, &address, buyer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders?buyer_id={id}
///
/// The buyer's orders with their lines, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(BuyerQuery),
    responses(
        (status = 200, description = "Orders of the buyer", body = [OrderResponse]),
        (status = 502, description = "Order store unavailable"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<BuyerQuery>,
) -> Result<HttpResponse, AppError> {
    let buyer_id = query.into_inner().buyer_id;

    let orders = web::block(move || state.orders.orders_for_buyer(buyer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || state.orders.order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/status
///
/// Buyers may cancel while the order is `Preparing` and confirm receipt once
/// it is `Delivered`. Operators advance `Preparing` to `Out for Delivery` and
/// then to `Delivered`. The response carries the status as stored.
#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Unknown actor or status"),
        (status = 403, description = "Requester may not change this order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status"),
    ),
    tag = "orders"
)]
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let actor = Actor::new(ActorRole::from_str(&body.actor)?, body.actor_id);
    let target = OrderStatus::from_str(&body.status)?;

    let order = web::block(move || state.orders.transition(order_id, actor, target))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders/{id}/position?elapsed_ms={ms}
///
/// Simulated rider position. Not a live location: the marker moves in a
/// straight line from the kitchen to the delivery zone while the order is
/// out for delivery.
#[utoipa::path(
    get,
    path = "/orders/{id}/position",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        PositionQuery,
    ),
    responses(
        (status = 200, description = "Simulated position", body = PositionResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "tracking"
)]
pub async fn order_position(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PositionQuery>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let elapsed = Duration::from_millis(query.into_inner().elapsed_ms);

    let lookup = state.clone();
    let order = web::block(move || lookup.orders.order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let tracking = state.tracking;
    let destination = state.zones.destination_for(&order);
    let position = current_position(
        order.status,
        tracking.origin,
        destination,
        elapsed,
        tracking.duration,
    );
    let in_transit = is_in_transit(order.status);
    let fraction = match (order.status.is_completed(), in_transit) {
        (true, _) => 1.0,
        (false, true) => progress(elapsed, tracking.duration),
        (false, false) => 0.0,
    };

    Ok(HttpResponse::Ok().json(PositionResponse {
        order_id,
        status: order.status.to_string(),
        lat: position.lat,
        lng: position.lng,
        progress: fraction,
        in_transit,
    }))
}

// ── OpenAPI ──────────────────────────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(list_zones, place_order, list_orders, get_order, update_status, order_position),
    components(schemas(
        CartLineRequest,
        AddressRequest,
        PlaceOrderRequest,
        OrderLineResponse,
        OrderResponse,
        ZoneResponse,
        StatusUpdateRequest,
        PositionResponse,
    ))
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
