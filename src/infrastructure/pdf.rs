//! Invoice PDF rendering.
//!
//! Produces plain A4 pages set in Helvetica: a header with the invoice number
//! and dates, customer and delivery partner blocks, the itemised table and the
//! totals. Rows that do not fit on one page continue on the next.

use chrono::{DateTime, Local, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::domain::errors::DomainError;
use crate::domain::invoice::Invoice;
use crate::domain::order::Order;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const LINE_HEIGHT: i64 = 16;
const ROWS_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize;

const COL_ITEM: i64 = MARGIN;
const COL_QTY: i64 = 320;
const COL_PRICE: i64 = 390;
const COL_AMOUNT: i64 = 480;

impl From<lopdf::Error> for DomainError {
    fn from(e: lopdf::Error) -> Self {
        DomainError::Render(e.to_string())
    }
}

/// One printed line: text runs placed at fixed x offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub size: i64,
    pub cells: Vec<(i64, String)>,
}

impl Row {
    fn text(size: i64, text: impl Into<String>) -> Self {
        Self {
            size,
            cells: vec![(MARGIN, text.into())],
        }
    }

    fn blank() -> Self {
        Self {
            size: 10,
            cells: vec![],
        }
    }

    fn columns(size: i64, item: &str, qty: &str, price: &str, amount: &str) -> Self {
        Self {
            size,
            cells: vec![
                (COL_ITEM, item.to_string()),
                (COL_QTY, qty.to_string()),
                (COL_PRICE, price.to_string()),
                (COL_AMOUNT, amount.to_string()),
            ],
        }
    }
}

fn money(amount: f64) -> String {
    format!("Rs. {amount:.2}")
}

fn day(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

/// Helvetica with the standard encoding only covers ASCII reliably.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// All rows of the invoice, in print order.
pub fn layout(order: &Order, invoice_number: &str, issued: DateTime<Utc>) -> Vec<Row> {
    let mut rows = vec![
        Row::text(18, "INVOICE"),
        Row::text(11, format!("Invoice No: {invoice_number}")),
        Row::text(11, format!("Order ID: {}", order.id)),
        Row::text(11, format!("Issued: {}", day(issued))),
        Row::text(11, format!("Due: {}", day(Invoice::due_date_for(issued)))),
        Row::text(11, format!("Payment: {}", order.payment_method.as_str())),
        Row::blank(),
        Row::text(12, "Bill To"),
        Row::text(10, order.customer.name.as_str()),
        Row::text(10, order.customer.address.as_str()),
        Row::text(10, order.customer.city.as_str()),
        Row::text(10, format!("Phone: {}", order.customer.phone)),
        Row::blank(),
        Row::text(12, "Delivery Partner"),
        Row::text(
            10,
            format!(
                "{} ({})",
                order.delivery_partner.name,
                money(order.delivery_partner.charges)
            ),
        ),
        Row::blank(),
        Row::columns(11, "Item", "Qty", "Price", "Amount"),
    ];

    for item in &order.items {
        rows.push(Row::columns(
            10,
            &item.name,
            &item.quantity.to_string(),
            &money(item.price),
            &money(item.line_total()),
        ));
    }

    let subtotal = Order::items_subtotal(&order.items);
    let total = Order::compute_total(
        &order.items,
        order.delivery_partner.charges,
        order.service_fee,
    );
    rows.push(Row::blank());
    for (label, amount) in [
        ("Subtotal", subtotal),
        ("Delivery", order.delivery_partner.charges),
        ("Service Fee", order.service_fee),
    ] {
        rows.push(Row::columns(10, "", "", label, &money(amount)));
    }
    rows.push(Row::columns(12, "", "", "Total", &money(total)));
    rows.push(Row::blank());
    // GST is not charged yet.
    rows.push(Row::text(10, "GST & intermediary registration in process."));
    rows
}

pub fn paginate(rows: Vec<Row>) -> Vec<Vec<Row>> {
    let mut pages: Vec<Vec<Row>> = rows
        .chunks(ROWS_PER_PAGE)
        .map(|chunk| chunk.to_vec())
        .collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

fn page_content(rows: &[Row]) -> Content {
    let mut operations = Vec::new();
    for (n, row) in rows.iter().enumerate() {
        let y = PAGE_HEIGHT - MARGIN - LINE_HEIGHT * (n as i64 + 1);
        for (x, text) in &row.cells {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec!["F1".into(), Object::Integer(row.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(*x), Object::Integer(y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(printable(text))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
    }
    Content { operations }
}

/// Renders the invoice for `order` and returns the PDF bytes.
pub fn render_invoice(
    order: &Order,
    invoice_number: &str,
    issued: DateTime<Utc>,
) -> Result<Vec<u8>, DomainError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for rows in paginate(layout(order, invoice_number, issued)) {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(&rows).encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
