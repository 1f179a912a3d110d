use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::{required, run_blocking, AppState};
use crate::application::order_service::OrderService;
use crate::domain::customer::CustomerDetails;
use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderPatch, PartnerSelection, PaymentMethod};
use crate::errors::AppError;

// ── Request DTOs ─────────────────────────────────────────────────────────────

/// Order intake form. The partner is either a registered one
/// (`deliveryPartnerId`) or described inline by name and charges.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_city: Option<String>,
    pub items: Option<Vec<NewOrderItem>>,
    pub delivery_partner_id: Option<String>,
    pub delivery_partner_name: Option<String>,
    pub delivery_partner_charges: Option<f64>,
    pub service_fee: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, AppError> {
        let missing = || AppError::BadRequest("Missing required fields".to_string());

        let partner = match (
            required(self.delivery_partner_id),
            required(self.delivery_partner_name),
            self.delivery_partner_charges,
        ) {
            (Some(id), _, _) => PartnerSelection::Existing(id),
            (None, Some(name), Some(charges)) => PartnerSelection::AdHoc { name, charges },
            _ => return Err(missing()),
        };

        Ok(NewOrder {
            customer: CustomerDetails {
                name: required(self.customer_name).ok_or_else(missing)?,
                phone: required(self.customer_phone).ok_or_else(missing)?,
                address: required(self.customer_address).ok_or_else(missing)?,
                city: required(self.customer_city).ok_or_else(missing)?,
            },
            items: self.items.ok_or_else(missing)?,
            delivery_partner: partner,
            service_fee: self.service_fee.ok_or_else(missing)?,
            payment_method: self.payment_method.ok_or_else(missing)?,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Customer and delivery partner are re-read from their own collections when
/// they still exist.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = [Order]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let service = OrderService::new(state.store.clone());
    let orders = run_blocking(move || service.list()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order number, e.g. ORD-QBX-20240115-01")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = OrderService::new(state.store.clone());
    let order = run_blocking(move || service.get_by_id(&id)).await?;
    order
        .map(|o| HttpResponse::Ok().json(o))
        .ok_or(AppError::NotFound("Order"))
}

/// POST /orders
///
/// Finds the customer by phone number (registering a new one if needed),
/// numbers the order for the day and fixes its total.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let new_order = body.into_inner().into_new_order()?;
    let service = OrderService::new(state.store.clone());
    let order = run_blocking(move || service.create(new_order)).await?;
    Ok(HttpResponse::Created().json(order))
}

/// PUT /orders/{id}
///
/// Shallow merge. The total stays as it was unless `recalculateTotal` is set.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order number")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<OrderPatch>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    let service = OrderService::new(state.store.clone());
    let order = run_blocking(move || service.update(&id, patch)).await?;
    order
        .map(|o| HttpResponse::Ok().json(o))
        .ok_or(AppError::NotFound("Order"))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order number")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = OrderService::new(state.store.clone());
    if run_blocking(move || service.delete(&id)).await? {
        Ok(HttpResponse::Ok().json(json!({ "success": true })))
    } else {
        Err(AppError::NotFound("Order"))
    }
}
