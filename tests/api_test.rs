//! HTTP tests: drive the full route table against a data file in a temp dir.

use std::sync::{Arc, Mutex};

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use async_trait::async_trait;
use billing_service::domain::errors::DomainError;
use billing_service::domain::ports::{InvoiceNotice, MessageSender, MessagingCredentials};
use billing_service::{configure, AppConfig, AppState};
use chrono::{DateTime, Duration, Local, Utc};
use serde_json::{json, Value};

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(InvoiceNotice, MessagingCredentials)>>,
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_invoice_notice(
        &self,
        notice: &InvoiceNotice,
        credentials: &MessagingCredentials,
    ) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((notice.clone(), credentials.clone()));
        Ok(())
    }
}

fn state(dir: &tempfile::TempDir, sender: Arc<RecordingSender>) -> AppState {
    let data_file = dir.path().join("database.json");
    let config = AppConfig::from_lookup(|key| match key {
        "DATA_FILE" => Some(data_file.display().to_string()),
        "PUBLIC_BASE_URL" => Some("https://billing.example.test".to_string()),
        "WHATSAPP_ACCESS_TOKEN" => Some("default-token".to_string()),
        "WHATSAPP_PHONE_NUMBER_ID" => Some("1001".to_string()),
        _ => None,
    })
    .unwrap();
    AppState::new(config).with_sender(sender)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure),
        )
        .await
    };
}

fn today() -> String {
    Local::now().format("%Y%m%d").to_string()
}

fn order_body(phone: &str) -> Value {
    json!({
        "customerName": "Sana",
        "customerPhone": phone,
        "customerAddress": "12 MG Road",
        "customerCity": "Bengaluru",
        "items": [
            { "name": "Notebook", "quantity": 2, "price": 50.0 },
            { "name": "Backpack", "quantity": 1, "price": 300.0 }
        ],
        "deliveryPartnerId": "dp1",
        "serviceFee": 200.0,
        "paymentMethod": "UPI"
    })
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[actix_web::test]
async fn order_invoice_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body("9876500001"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["totalAmount"], json!(680.0));
    assert_eq!(order["id"], json!(format!("ORD-QBX-{}-01", today())));
    assert_eq!(order["status"], json!("received"));
    let order_id = order["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(json!({ "orderId": order_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["invoiceNumber"], json!(format!("INV-QBX-{}", today())));
    assert_eq!(
        timestamp(&invoice["dueDate"]) - timestamp(&invoice["issuedDate"]),
        Duration::days(7)
    );
    assert_eq!(invoice["isSent"], json!(false));
    let invoice_id = invoice["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/invoices/{invoice_id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/invoices").to_request();
    let invoices: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(invoices, json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/invoices/{invoice_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Invoice not found"));
}

#[actix_web::test]
async fn order_with_missing_fields_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let mut body = order_body("9876500002");
    body.as_object_mut().unwrap().remove("customerCity");
    let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Missing required fields"));

    let req = test::TestRequest::get().uri("/orders").to_request();
    let orders: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(orders, json!([]));
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::post()
        .uri("/customers")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_unknown_ids_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    for uri in ["/orders/ORD-QBX-19990101-01", "/invoices/inv_0"] {
        let req = test::TestRequest::delete().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn seeded_partners_and_empty_analytics() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::get().uri("/delivery-partners").to_request();
    let partners: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(partners.as_array().unwrap().len(), 3);
    assert_eq!(partners[0]["name"], json!("Express Delivery"));
    assert_eq!(partners[2]["charges"], json!(120.0));

    let req = test::TestRequest::get().uri("/analytics").to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        report["paymentBreakdown"],
        json!({ "UPI": 0, "Cash": 0, "Online": 0 })
    );
    assert_eq!(report["pendingInvoices"], json!(0));
}

#[actix_web::test]
async fn customers_can_be_created_and_patched() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::post()
        .uri("/customers")
        .set_json(json!({
            "name": "Ishaan",
            "phone": "9000000000",
            "address": "8 Beach Road",
            "city": "Chennai"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let customer: Value = test::read_body_json(resp).await;
    let id = customer["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("cust_"));

    let req = test::TestRequest::put()
        .uri(&format!("/customers/{id}"))
        .set_json(json!({ "city": "Puducherry" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["city"], json!("Puducherry"));
    assert_eq!(updated["name"], json!("Ishaan"));
}

#[actix_web::test]
async fn payments_are_filtered_by_order() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    for (order_id, method) in [("ORD-A", "Cash"), ("ORD-B", "UPI"), ("ORD-A", "Online")] {
        let req = test::TestRequest::post()
            .uri("/payments")
            .set_json(json!({ "orderId": order_id, "amount": 100.0, "method": method }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/payments?orderId=ORD-A").to_request();
    let payments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(payments.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/analytics").to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        report["paymentBreakdown"],
        json!({ "UPI": 33, "Cash": 33, "Online": 33 })
    );
}

#[actix_web::test]
async fn invoice_download_and_send() {
    let dir = tempfile::tempdir().unwrap();
    let sender = Arc::new(RecordingSender::default());
    let app = app!(state(&dir, sender.clone()));

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body("9876500003"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(json!({ "orderId": order["id"] }))
        .to_request();
    let invoice: Value = test::call_and_read_body_json(&app, req).await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/invoices/{invoice_id}/download"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("INV-QBX-{}.pdf", today())));
    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"%PDF"));

    let req = test::TestRequest::post()
        .uri(&format!("/invoices/{invoice_id}/send"))
        .to_request();
    let sent: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sent["isSent"], json!(true));
    assert!(sent["sentAt"].is_string());

    let recorded = sender.sent.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    let (notice, credentials) = &recorded[0];
    assert_eq!(notice.phone_number, "9876500003");
    assert_eq!(
        notice.pdf_url,
        format!("https://billing.example.test/invoices/{invoice_id}/download")
    );
    assert_eq!(notice.total_amount, 680.0);
    assert_eq!(credentials.access_token, "default-token");
}

#[actix_web::test]
async fn print_receiver_acknowledges_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({ "printerId": "counter", "pdfData": "JVBERi0xLjU=" }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["success"], json!(true));
    assert!(resp["jobId"].as_str().unwrap().starts_with("job_"));

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({ "printerId": "", "pdfData": "JVBERi0xLjU=" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unrecognised_printer_type_prints_from_the_browser() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body("9876500004"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(json!({ "orderId": order["id"] }))
        .to_request();
    let invoice: Value = test::call_and_read_body_json(&app, req).await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/invoices/{invoice_id}/print"))
        .set_json(json!({ "id": "p1", "type": "thermal" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(resp).await;
    assert_eq!(outcome["method"], json!("browser"));
    assert_eq!(
        outcome["documentUrl"],
        json!(format!("https://billing.example.test/invoices/{invoice_id}/download"))
    );
}

#[actix_web::test]
async fn emptying_an_order_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(state(&dir, Arc::default()));

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body("9876500005"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let order_id = order["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{order_id}"))
        .set_json(json!({ "items": [], "recalculateTotal": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}"))
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["totalAmount"], json!(680.0));
    assert_eq!(stored["items"].as_array().unwrap().len(), 2);
}
