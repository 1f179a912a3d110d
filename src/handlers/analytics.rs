use actix_web::{web, HttpResponse};

use super::{run_blocking, AppState};
use crate::application::analytics_service::AnalyticsService;
use crate::domain::analytics::AnalyticsReport;
use crate::errors::AppError;

/// GET /analytics
///
/// Recomputed from the full history on every call.
#[utoipa::path(
    get,
    path = "/analytics",
    responses(
        (status = 200, description = "Dashboard figures", body = AnalyticsReport),
        (status = 500, description = "Internal server error"),
    ),
    tag = "analytics"
)]
pub async fn get_analytics(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let service = AnalyticsService::new(state.store.clone());
    let report = run_blocking(move || service.report()).await?;
    Ok(HttpResponse::Ok().json(report))
}
