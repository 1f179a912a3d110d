use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{required, run_blocking, AppState};
use crate::application::payment_service::PaymentService;
use crate::domain::order::PaymentMethod;
use crate::domain::payment::{NewPayment, Payment};
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: Option<String>,
    pub amount: Option<f64>,
    pub method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    /// Defaults to now.
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsParams {
    pub order_id: Option<String>,
}

/// GET /payments
#[utoipa::path(
    get,
    path = "/payments",
    params(("orderId" = Option<String>, Query, description = "Only payments for this order")),
    responses(
        (status = 200, description = "Payments", body = [Payment]),
    ),
    tag = "payments"
)]
pub async fn list_payments(
    state: web::Data<AppState>,
    query: web::Query<ListPaymentsParams>,
) -> Result<HttpResponse, AppError> {
    let order_id = query.into_inner().order_id;
    let service = PaymentService::new(state.store.clone());
    let payments = run_blocking(move || match order_id {
        Some(order_id) => service.list_by_order(&order_id),
        None => service.list(),
    })
    .await?;
    Ok(HttpResponse::Ok().json(payments))
}

/// GET /payments/{id}
#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment found", body = Payment),
        (status = 404, description = "Payment not found"),
    ),
    tag = "payments"
)]
pub async fn get_payment(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = PaymentService::new(state.store.clone());
    let payment = run_blocking(move || service.get_by_id(&id)).await?;
    payment
        .map(|p| HttpResponse::Ok().json(p))
        .ok_or(AppError::NotFound("Payment"))
}

/// POST /payments
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Missing required fields"),
    ),
    tag = "payments"
)]
pub async fn create_payment(
    state: web::Data<AppState>,
    body: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let (Some(order_id), Some(amount), Some(method)) =
        (required(body.order_id), body.amount, body.method)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let payment = NewPayment {
        order_id,
        amount,
        method,
        transaction_id: required(body.transaction_id),
        paid_at: body.paid_at,
    };
    let service = PaymentService::new(state.store.clone());
    let payment = run_blocking(move || service.create(payment)).await?;
    Ok(HttpResponse::Created().json(payment))
}
