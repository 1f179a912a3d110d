use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::{required, AppState};
use crate::domain::ids;
use crate::domain::ports::{InvoiceNotice, MessagingCredentials};
use crate::errors::AppError;
use crate::infrastructure::printing::{PrintJobRequest, PrintJobResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppRequest {
    pub phone_number: Option<String>,
    pub pdf_url: Option<String>,
    pub customer_name: Option<String>,
    pub total_amount: Option<f64>,
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
}

impl WhatsAppRequest {
    fn into_parts(self) -> Result<(InvoiceNotice, MessagingCredentials), AppError> {
        match (
            required(self.phone_number),
            required(self.pdf_url),
            required(self.customer_name),
            self.total_amount,
            required(self.access_token),
            required(self.phone_number_id),
        ) {
            (
                Some(phone_number),
                Some(pdf_url),
                Some(customer_name),
                Some(total_amount),
                Some(access_token),
                Some(sender_id),
            ) => Ok((
                InvoiceNotice {
                    phone_number,
                    pdf_url,
                    customer_name,
                    total_amount,
                },
                MessagingCredentials {
                    access_token,
                    sender_id,
                },
            )),
            _ => Err(AppError::BadRequest("Missing required parameters".to_string())),
        }
    }
}

/// POST /whatsapp
///
/// Sends an invoice notice for an arbitrary document URL with caller-supplied
/// credentials.
#[utoipa::path(
    post,
    path = "/whatsapp",
    request_body = WhatsAppRequest,
    responses(
        (status = 200, description = "Message accepted by WhatsApp"),
        (status = 400, description = "Missing required parameters"),
        (status = 502, description = "Messaging API rejected the message"),
    ),
    tag = "delivery"
)]
pub async fn send_whatsapp(
    state: web::Data<AppState>,
    body: web::Json<WhatsAppRequest>,
) -> Result<HttpResponse, AppError> {
    let (notice, credentials) = body.into_inner().into_parts()?;
    state
        .sender
        .send_invoice_notice(&notice, &credentials)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Invoice sent successfully via WhatsApp",
    })))
}

/// POST /print
///
/// Print-agent compatible receiver. Validates the job and acknowledges it
/// with a job id.
#[utoipa::path(
    post,
    path = "/print",
    request_body = PrintJobRequest,
    responses(
        (status = 200, description = "Print job accepted", body = PrintJobResponse),
        (status = 400, description = "Missing printerId or pdfData"),
    ),
    tag = "delivery"
)]
pub async fn receive_print_job(body: web::Json<PrintJobRequest>) -> Result<HttpResponse, AppError> {
    let job = body.into_inner();
    if job.printer_id.trim().is_empty() || job.pdf_data.trim().is_empty() {
        return Err(AppError::BadRequest("Missing printerId or pdfData".to_string()));
    }
    let pdf = job.decode_pdf()?;

    let job_id = ids::next_id(ids::PRINT_JOB);
    log::info!(
        "Print job {job_id} received for printer {} ({} bytes)",
        job.printer_id,
        pdf.len()
    );
    Ok(HttpResponse::Ok().json(PrintJobResponse {
        success: true,
        message: "Print job sent to printer successfully".to_string(),
        job_id: Some(job_id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> WhatsAppRequest {
        WhatsAppRequest {
            phone_number: Some("919800000000".to_string()),
            pdf_url: Some("https://billing.example.test/invoices/inv_1/download".to_string()),
            customer_name: Some("Asha".to_string()),
            total_amount: Some(680.0),
            access_token: Some("token".to_string()),
            phone_number_id: Some("55".to_string()),
        }
    }

    #[test]
    fn complete_request_splits_into_notice_and_credentials() {
        let (notice, credentials) = request().into_parts().unwrap();
        assert_eq!(notice.customer_name, "Asha");
        assert_eq!(notice.total_amount, 680.0);
        assert_eq!(credentials.sender_id, "55");
    }

    #[test]
    fn missing_token_is_rejected() {
        let request = WhatsAppRequest {
            access_token: None,
            ..request()
        };
        assert!(matches!(request.into_parts(), Err(AppError::BadRequest(_))));
    }
}
