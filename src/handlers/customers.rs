use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{required, run_blocking, AppState};
use crate::application::customer_service::CustomerService;
use crate::domain::customer::{Customer, CustomerDetails, CustomerPatch};
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl CreateCustomerRequest {
    fn into_details(self) -> Result<CustomerDetails, AppError> {
        match (
            required(self.name),
            required(self.phone),
            required(self.address),
            required(self.city),
        ) {
            (Some(name), Some(phone), Some(address), Some(city)) => Ok(CustomerDetails {
                name,
                phone,
                address,
                city,
            }),
            _ => Err(AppError::BadRequest("Missing required fields".to_string())),
        }
    }
}

/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers", body = [Customer]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let service = CustomerService::new(state.store.clone());
    let customers = run_blocking(move || service.list()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// GET /customers/{id}
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = CustomerService::new(state.store.clone());
    let customer = run_blocking(move || service.get_by_id(&id)).await?;
    customer
        .map(|c| HttpResponse::Ok().json(c))
        .ok_or(AppError::NotFound("Customer"))
}

/// POST /customers
///
/// Phone numbers are not checked for uniqueness.
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Missing required fields"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    state: web::Data<AppState>,
    body: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let details = body.into_inner().into_details()?;
    let service = CustomerService::new(state.store.clone());
    let customer = run_blocking(move || service.create(details)).await?;
    Ok(HttpResponse::Created().json(customer))
}

/// PUT /customers/{id}
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    request_body = CustomerPatch,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CustomerPatch>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    let service = CustomerService::new(state.store.clone());
    let customer = run_blocking(move || service.update(&id, patch)).await?;
    customer
        .map(|c| HttpResponse::Ok().json(c))
        .ok_or(AppError::NotFound("Customer"))
}
