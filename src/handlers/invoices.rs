use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::{required, run_blocking, AppState};
use crate::application::invoice_service::InvoiceService;
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::ports::{InvoiceNotice, MessagingCredentials};
use crate::errors::AppError;
use crate::infrastructure::pdf;
use crate::infrastructure::printing::{PrintOutcome, PrinterConfig};

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}

/// Per-request WhatsApp credentials. Either field falls back to the
/// configured default when omitted.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceRequest {
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

async fn load_invoice(state: &AppState, id: String) -> Result<Invoice, AppError> {
    let service = InvoiceService::new(state.store.clone());
    run_blocking(move || service.get_by_id(&id))
        .await?
        .ok_or(AppError::NotFound("Invoice"))
}

async fn render(invoice: &Invoice) -> Result<Vec<u8>, AppError> {
    let order = invoice.order.clone();
    let number = invoice.invoice_number.clone();
    let issued = invoice.issued_date;
    run_blocking(move || pdf::render_invoice(&order, &number, issued)).await
}

fn credentials(state: &AppState, request: SendInvoiceRequest) -> Result<MessagingCredentials, AppError> {
    let defaults = &state.config.whatsapp;
    let access_token = required(request.access_token).or_else(|| defaults.access_token.clone());
    let sender_id = required(request.phone_number_id).or_else(|| defaults.phone_number_id.clone());
    match (access_token, sender_id) {
        (Some(access_token), Some(sender_id)) => Ok(MessagingCredentials {
            access_token,
            sender_id,
        }),
        _ => Err(AppError::BadRequest(
            "WhatsApp access token and phone number id are required".to_string(),
        )),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /invoices
#[utoipa::path(
    get,
    path = "/invoices",
    responses(
        (status = 200, description = "All invoices", body = [Invoice]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn list_invoices(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let service = InvoiceService::new(state.store.clone());
    let invoices = run_blocking(move || service.list()).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

/// GET /invoices/{id}
#[utoipa::path(
    get,
    path = "/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice found", body = Invoice),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = load_invoice(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// POST /invoices
///
/// Issues an invoice for an existing order, due seven days after issue.
#[utoipa::path(
    post,
    path = "/invoices",
    request_body = GenerateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice generated", body = Invoice),
        (status = 400, description = "Missing orderId"),
        (status = 404, description = "Order not found"),
    ),
    tag = "invoices"
)]
pub async fn generate_invoice(
    state: web::Data<AppState>,
    body: web::Json<GenerateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = required(body.into_inner().order_id)
        .ok_or_else(|| AppError::BadRequest("Missing orderId".to_string()))?;
    let service = InvoiceService::new(state.store.clone());
    let invoice = run_blocking(move || service.generate(&order_id)).await?;
    invoice
        .map(|i| HttpResponse::Created().json(i))
        .ok_or(AppError::NotFound("Order"))
}

/// PUT /invoices/{id}/status
#[utoipa::path(
    put,
    path = "/invoices/{id}/status",
    params(("id" = String, Path, description = "Invoice id")),
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Invoice),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
)]
pub async fn update_invoice_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateInvoiceStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    let service = InvoiceService::new(state.store.clone());
    let invoice = run_blocking(move || service.update_status(&id, status)).await?;
    invoice
        .map(|i| HttpResponse::Ok().json(i))
        .ok_or(AppError::NotFound("Invoice"))
}

/// DELETE /invoices/{id}
#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
)]
pub async fn delete_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = InvoiceService::new(state.store.clone());
    if run_blocking(move || service.delete(&id)).await? {
        Ok(HttpResponse::Ok().json(json!({ "success": true })))
    } else {
        Err(AppError::NotFound("Invoice"))
    }
}

/// GET /invoices/{id}/download
///
/// Renders the invoice as a PDF attachment named after the invoice number.
#[utoipa::path(
    get,
    path = "/invoices/{id}/download",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice PDF", content_type = "application/pdf"),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
)]
pub async fn download_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = load_invoice(&state, path.into_inner()).await?;
    let bytes = render(&invoice).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!(
                "{}.pdf",
                invoice.invoice_number
            ))],
        })
        .body(bytes))
}

/// POST /invoices/{id}/send
///
/// Sends the download link to the customer over WhatsApp and marks the
/// invoice as sent.
#[utoipa::path(
    post,
    path = "/invoices/{id}/send",
    params(("id" = String, Path, description = "Invoice id")),
    request_body = SendInvoiceRequest,
    responses(
        (status = 200, description = "Notice delivered", body = Invoice),
        (status = 400, description = "No WhatsApp credentials available"),
        (status = 404, description = "Invoice not found"),
        (status = 502, description = "Messaging API rejected the message"),
    ),
    tag = "invoices"
)]
pub async fn send_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<SendInvoiceRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    let credentials = credentials(&state, request)?;
    let invoice = load_invoice(&state, path.into_inner()).await?;

    let notice = InvoiceNotice {
        phone_number: invoice.order.customer.phone.clone(),
        pdf_url: state.config.public_url(&invoice.pdf_url),
        customer_name: invoice.order.customer.name.clone(),
        total_amount: invoice.order.total_amount,
    };
    state
        .sender
        .send_invoice_notice(&notice, &credentials)
        .await?;

    let service = InvoiceService::new(state.store.clone());
    let id = invoice.id;
    let sent = run_blocking(move || service.mark_sent(&id)).await?;
    sent.map(|i| HttpResponse::Ok().json(i))
        .ok_or(AppError::NotFound("Invoice"))
}

/// POST /invoices/{id}/print
///
/// USB and network printers receive the PDF through the local print agent.
/// Browser and Bluetooth printers get the document URL back to print from
/// the client.
#[utoipa::path(
    post,
    path = "/invoices/{id}/print",
    params(("id" = String, Path, description = "Invoice id")),
    request_body = PrinterConfig,
    responses(
        (status = 200, description = "Print routed", body = PrintOutcome),
        (status = 404, description = "Invoice not found"),
        (status = 502, description = "Print agent failed"),
    ),
    tag = "invoices"
)]
pub async fn print_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PrinterConfig>,
) -> Result<HttpResponse, AppError> {
    let printer = body.into_inner();
    let invoice = load_invoice(&state, path.into_inner()).await?;
    let bytes = render(&invoice).await?;

    let outcome = state
        .printer
        .dispatch(&bytes, &printer, &state.config.public_url(&invoice.pdf_url))
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}
