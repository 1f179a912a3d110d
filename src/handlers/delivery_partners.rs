use actix_web::{web, HttpResponse};

use super::{run_blocking, AppState};
use crate::application::delivery_partner_service::DeliveryPartnerService;
use crate::domain::order::DeliveryPartner;
use crate::errors::AppError;

/// GET /delivery-partners
#[utoipa::path(
    get,
    path = "/delivery-partners",
    responses(
        (status = 200, description = "Registered delivery partners", body = [DeliveryPartner]),
    ),
    tag = "delivery-partners"
)]
pub async fn list_delivery_partners(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let service = DeliveryPartnerService::new(state.store.clone());
    let partners = run_blocking(move || service.list()).await?;
    Ok(HttpResponse::Ok().json(partners))
}

/// GET /delivery-partners/{id}
#[utoipa::path(
    get,
    path = "/delivery-partners/{id}",
    params(("id" = String, Path, description = "Delivery partner id")),
    responses(
        (status = 200, description = "Delivery partner found", body = DeliveryPartner),
        (status = 404, description = "Delivery partner not found"),
    ),
    tag = "delivery-partners"
)]
pub async fn get_delivery_partner(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = DeliveryPartnerService::new(state.store.clone());
    let partner = run_blocking(move || service.get_by_id(&id)).await?;
    partner
        .map(|p| HttpResponse::Ok().json(p))
        .ok_or(AppError::NotFound("Delivery partner"))
}
