//! Human-facing order and invoice numbers that restart every calendar day.
//!
//! Both count the records stamped on the caller's local day. Order numbers
//! are `ORD-QBX-{YYYYMMDD}-{NN}`; invoice numbers are `INV-QBX-{YYYYMMDD}` for
//! the first invoice of the day and `INV-QBX-{YYYYMMDD}{N}` after that.

use chrono::{DateTime, Local, NaiveDate, Utc};

use super::invoice::Invoice;
use super::order::Order;

const ORDER_PREFIX: &str = "ORD-QBX";
const INVOICE_PREFIX: &str = "INV-QBX";

fn date_stamp(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

fn on_local_day(ts: &DateTime<Utc>, day: NaiveDate) -> bool {
    ts.with_timezone(&Local).date_naive() == day
}

fn order_number(day: NaiveDate, sequence: usize) -> String {
    format!("{ORDER_PREFIX}-{}-{sequence:02}", date_stamp(day))
}

fn invoice_number(day: NaiveDate, sequence: usize) -> String {
    if sequence <= 1 {
        format!("{INVOICE_PREFIX}-{}", date_stamp(day))
    } else {
        format!("{INVOICE_PREFIX}-{}{sequence}", date_stamp(day))
    }
}

/// Count of today's orders plus one. Skips forward past numbers that are
/// already in use, which happens after a same-day order was deleted.
pub fn next_order_number(orders: &[Order], now: DateTime<Local>) -> String {
    let today = now.date_naive();
    let todays = orders
        .iter()
        .filter(|o| on_local_day(&o.created_at, today))
        .count();
    let mut sequence = todays + 1;
    while orders.iter().any(|o| o.id == order_number(today, sequence)) {
        sequence += 1;
    }
    order_number(today, sequence)
}

pub fn next_invoice_number(invoices: &[Invoice], now: DateTime<Local>) -> String {
    let today = now.date_naive();
    let todays = invoices
        .iter()
        .filter(|i| on_local_day(&i.issued_date, today))
        .count();
    let mut sequence = todays + 1;
    while invoices
        .iter()
        .any(|i| i.invoice_number == invoice_number(today, sequence))
    {
        sequence += 1;
    }
    invoice_number(today, sequence)
}
