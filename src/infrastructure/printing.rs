use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

pub const DEFAULT_AGENT_URL: &str = "http://localhost:4321";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrinterType {
    Bluetooth,
    Usb,
    Network,
    Browser,
    /// Any type this service does not recognise; printed from the browser.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PrintMethod {
    Browser,
    Bluetooth,
    LocalAgent,
}

impl PrintMethod {
    pub fn for_printer(printer_type: PrinterType) -> Self {
        match printer_type {
            PrinterType::Bluetooth => PrintMethod::Bluetooth,
            PrinterType::Usb | PrinterType::Network => PrintMethod::LocalAgent,
            PrinterType::Browser | PrinterType::Other => PrintMethod::Browser,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrinterConfig {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub printer_type: PrinterType,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintOutcome {
    pub method: PrintMethod,
    /// Set when the local agent accepted the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Set when the client device has to print the document itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

/// Wire shape shared by the local print agent and our own `/print` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintJobRequest {
    pub printer_id: String,
    /// Base64 encoded PDF.
    pub pdf_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintJobResponse {
    pub success: bool,
    pub message: String,
    pub job_id: Option<String>,
}

impl PrintJobRequest {
    pub fn new(printer_id: &str, pdf: &[u8]) -> Self {
        Self {
            printer_id: printer_id.to_string(),
            pdf_data: STANDARD.encode(pdf),
        }
    }

    pub fn decode_pdf(&self) -> Result<Vec<u8>, DomainError> {
        STANDARD
            .decode(self.pdf_data.as_bytes())
            .map_err(|e| DomainError::InvalidInput(format!("pdfData is not valid base64: {e}")))
    }
}

/// Routes a rendered invoice to the right printing mechanism.
///
/// USB and network printers go through the local print agent over HTTP.
/// Browser and Bluetooth printing happen on the client device, so the
/// outcome hands back the document URL for the client to print.
#[derive(Debug, Clone)]
pub struct PrintDispatcher {
    http: reqwest::Client,
    agent_url: String,
}

impl PrintDispatcher {
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            agent_url: agent_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn dispatch(
        &self,
        pdf: &[u8],
        printer: &PrinterConfig,
        document_url: &str,
    ) -> Result<PrintOutcome, DomainError> {
        let method = PrintMethod::for_printer(printer.printer_type);
        match method {
            PrintMethod::LocalAgent => {
                let job_id = self.send_to_agent(pdf, &printer.id).await?;
                Ok(PrintOutcome {
                    method,
                    job_id,
                    document_url: None,
                })
            }
            PrintMethod::Browser | PrintMethod::Bluetooth => Ok(PrintOutcome {
                method,
                job_id: None,
                document_url: Some(document_url.to_string()),
            }),
        }
    }

    async fn send_to_agent(&self, pdf: &[u8], printer_id: &str) -> Result<Option<String>, DomainError> {
        let response = self
            .http
            .post(format!("{}/print", self.agent_url))
            .json(&PrintJobRequest::new(printer_id, pdf))
            .send()
            .await
            .map_err(|e| DomainError::Delivery(format!("print agent unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Print agent returned {status} for printer {printer_id}");
            return Err(DomainError::Delivery(format!(
                "print agent returned {status}"
            )));
        }

        let body: PrintJobResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Delivery(format!("bad print agent response: {e}")))?;
        log::info!("Print job sent to local agent for printer {printer_id}");
        Ok(body.job_id)
    }
}
