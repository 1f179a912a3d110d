pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use handlers::AppState;

use errors::AppError;
use handlers::{analytics, customers, delivery, delivery_partners, invoices, orders, payments};

#[derive(OpenApi)]
#[openapi(
    paths(
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        delivery_partners::list_delivery_partners,
        delivery_partners::get_delivery_partner,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::generate_invoice,
        invoices::update_invoice_status,
        invoices::delete_invoice,
        invoices::download_invoice,
        invoices::send_invoice,
        invoices::print_invoice,
        payments::list_payments,
        payments::get_payment,
        payments::create_payment,
        analytics::get_analytics,
        delivery::send_whatsapp,
        delivery::receive_print_job,
    ),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "delivery-partners", description = "Delivery partners and their charges"),
        (name = "orders", description = "Order intake and lifecycle"),
        (name = "invoices", description = "Invoice issue, PDF, delivery and printing"),
        (name = "payments", description = "Recorded payments"),
        (name = "analytics", description = "Dashboard figures"),
        (name = "delivery", description = "Messaging and print endpoints"),
    )
)]
pub struct ApiDoc;

/// Registers every route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/customers")
            .route("", web::get().to(customers::list_customers))
            .route("", web::post().to(customers::create_customer))
            .route("/{id}", web::get().to(customers::get_customer))
            .route("/{id}", web::put().to(customers::update_customer)),
    )
    .service(
        web::scope("/delivery-partners")
            .route("", web::get().to(delivery_partners::list_delivery_partners))
            .route("/{id}", web::get().to(delivery_partners::get_delivery_partner)),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(orders::list_orders))
            .route("", web::post().to(orders::create_order))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::put().to(orders::update_order))
            .route("/{id}", web::delete().to(orders::delete_order)),
    )
    .service(
        web::scope("/invoices")
            .route("", web::get().to(invoices::list_invoices))
            .route("", web::post().to(invoices::generate_invoice))
            .route("/{id}", web::get().to(invoices::get_invoice))
            .route("/{id}", web::delete().to(invoices::delete_invoice))
            .route("/{id}/status", web::put().to(invoices::update_invoice_status))
            .route("/{id}/download", web::get().to(invoices::download_invoice))
            .route("/{id}/send", web::post().to(invoices::send_invoice))
            .route("/{id}/print", web::post().to(invoices::print_invoice)),
    )
    .service(
        web::scope("/payments")
            .route("", web::get().to(payments::list_payments))
            .route("", web::post().to(payments::create_payment))
            .route("/{id}", web::get().to(payments::get_payment)),
    )
    .route("/analytics", web::get().to(analytics::get_analytics))
    .route("/whatsapp", web::post().to(delivery::send_whatsapp))
    .route("/print", web::post().to(delivery::receive_print_job));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
