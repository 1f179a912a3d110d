//! Dashboard rollups, recomputed from the full document on every call.

use chrono::{DateTime, Duration, Local, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::customer::Customer;
use super::document::Document;
use super::order::PaymentMethod;

const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RevenueSummary {
    pub today: f64,
    pub week: f64,
    pub month: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CityOrders {
    pub city: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub customer: Customer,
    pub order_count: usize,
    pub total_spent: f64,
}

/// Whole-number percentages of all recorded payments per method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaymentBreakdown {
    #[serde(rename = "UPI")]
    pub upi: u32,
    #[serde(rename = "Cash")]
    pub cash: u32,
    #[serde(rename = "Online")]
    pub online: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub revenue: RevenueSummary,
    /// All-time, unlike the revenue windows.
    pub service_fee_collection: f64,
    pub city_wise_orders: Vec<CityOrders>,
    pub top_customers: Vec<TopCustomer>,
    /// Invoices whose `isSent` flag is false.
    pub pending_invoices: usize,
    pub payment_breakdown: PaymentBreakdown,
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let start = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&start)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&start))
        .with_timezone(&Utc)
}

fn revenue_since(doc: &Document, start: DateTime<Utc>) -> f64 {
    doc.orders
        .iter()
        .filter(|o| o.created_at >= start)
        .map(|o| o.total_amount)
        .sum()
}

fn revenue(doc: &Document, now: DateTime<Local>) -> RevenueSummary {
    let today = now.date_naive();
    let week_start = (now - Duration::days(7)).date_naive();
    // Month-end days clamp: 31 March looks back to 29 February in a leap year.
    let month_start = today.checked_sub_months(Months::new(1)).unwrap_or(today);

    RevenueSummary {
        today: revenue_since(doc, local_midnight(today)),
        week: revenue_since(doc, local_midnight(week_start)),
        month: revenue_since(doc, local_midnight(month_start)),
    }
}

fn city_wise_orders(doc: &Document) -> Vec<CityOrders> {
    let mut cities: Vec<CityOrders> = Vec::new();
    for order in &doc.orders {
        let Some(customer) = doc.customer(&order.customer_id) else {
            continue;
        };
        match cities.iter_mut().find(|c| c.city == customer.city) {
            Some(entry) => entry.count += 1,
            None => cities.push(CityOrders {
                city: customer.city.clone(),
                count: 1,
            }),
        }
    }
    // Stable: ties keep first-seen order.
    cities.sort_by(|a, b| b.count.cmp(&a.count));
    cities.truncate(TOP_N);
    cities
}

fn top_customers(doc: &Document) -> Vec<TopCustomer> {
    let mut totals: Vec<(&str, usize, f64)> = Vec::new();
    for order in &doc.orders {
        match totals.iter_mut().find(|(id, _, _)| *id == order.customer_id) {
            Some((_, count, spent)) => {
                *count += 1;
                *spent += order.total_amount;
            }
            None => totals.push((order.customer_id.as_str(), 1, order.total_amount)),
        }
    }

    let mut top: Vec<TopCustomer> = totals
        .into_iter()
        .filter_map(|(id, order_count, total_spent)| {
            doc.customer(id).map(|customer| TopCustomer {
                customer: customer.clone(),
                order_count,
                total_spent,
            })
        })
        .collect();
    top.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    top.truncate(TOP_N);
    top
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn payment_breakdown(doc: &Document) -> PaymentBreakdown {
    let count = |method: PaymentMethod| doc.payments.iter().filter(|p| p.method == method).count();
    let total = doc.payments.len();
    PaymentBreakdown {
        upi: percentage(count(PaymentMethod::Upi), total),
        cash: percentage(count(PaymentMethod::Cash), total),
        online: percentage(count(PaymentMethod::Online), total),
    }
}

pub fn summarize(doc: &Document, now: DateTime<Local>) -> AnalyticsReport {
    AnalyticsReport {
        revenue: revenue(doc, now),
        service_fee_collection: doc.orders.iter().map(|o| o.service_fee).sum(),
        city_wise_orders: city_wise_orders(doc),
        top_customers: top_customers(doc),
        pending_invoices: doc.invoices.iter().filter(|i| !i.is_sent).count(),
        payment_breakdown: payment_breakdown(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::{Invoice, InvoiceStatus};
    use crate::domain::order::{DeliveryPartner, Order, OrderStatus};
    use crate::domain::payment::Payment;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 20, 15, 30, 0).unwrap()
    }

    fn customer(id: &str, city: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            phone: format!("phone-{id}"),
            address: "Somewhere".to_string(),
            city: city.to_string(),
            created_at: Utc::now(),
        }
    }

    fn order(id: &str, customer_id: &str, total: f64, fee: f64, at: DateTime<Local>) -> Order {
        let at = at.with_timezone(&Utc);
        Order {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            customer: customer(customer_id, "Snapshot City"),
            items: vec![],
            delivery_partner_id: "dp1".to_string(),
            delivery_partner: DeliveryPartner {
                id: "dp1".to_string(),
                name: "Express Delivery".to_string(),
                charges: 80.0,
            },
            service_fee: fee,
            gst: 0.0,
            total_amount: total,
            status: OrderStatus::Received,
            payment_method: PaymentMethod::Cash,
            created_at: at,
            updated_at: at,
        }
    }

    fn payment(method: PaymentMethod) -> Payment {
        Payment {
            id: "pay".to_string(),
            order_id: "o".to_string(),
            amount: 10.0,
            method,
            transaction_id: None,
            paid_at: Utc::now(),
        }
    }

    #[test]
    fn empty_document_reports_zeros() {
        let report = summarize(&Document::seeded(), now());
        assert_eq!(
            report.revenue,
            RevenueSummary {
                today: 0.0,
                week: 0.0,
                month: 0.0
            }
        );
        assert_eq!(report.service_fee_collection, 0.0);
        assert!(report.city_wise_orders.is_empty());
        assert!(report.top_customers.is_empty());
        assert_eq!(report.pending_invoices, 0);
        assert_eq!(report.payment_breakdown, PaymentBreakdown::default());
    }

    #[test]
    fn revenue_windows_nest_and_fee_is_all_time() {
        let now = now();
        let mut doc = Document::seeded();
        doc.customers.push(customer("c1", "Pune"));
        doc.orders = vec![
            order("a", "c1", 100.0, 10.0, now - Duration::hours(1)),
            order("b", "c1", 200.0, 20.0, now - Duration::days(3)),
            order("c", "c1", 400.0, 40.0, now - Duration::days(20)),
            order("d", "c1", 800.0, 80.0, now - Duration::days(90)),
        ];

        let report = summarize(&doc, now);
        assert_eq!(report.revenue.today, 100.0);
        assert_eq!(report.revenue.week, 300.0);
        assert_eq!(report.revenue.month, 700.0);
        assert_eq!(report.service_fee_collection, 150.0);
    }

    #[test]
    fn windows_start_at_local_midnight() {
        let now = now();
        let mut doc = Document::seeded();
        let earlier_today = Local.with_ymd_and_hms(2024, 3, 20, 0, 5, 0).unwrap();
        let late_yesterday = Local.with_ymd_and_hms(2024, 3, 19, 23, 55, 0).unwrap();
        let week_edge = Local.with_ymd_and_hms(2024, 3, 13, 0, 1, 0).unwrap();
        doc.orders = vec![
            order("a", "c1", 1.0, 0.0, earlier_today),
            order("b", "c1", 2.0, 0.0, late_yesterday),
            order("c", "c1", 4.0, 0.0, week_edge),
        ];

        let report = summarize(&doc, now);
        assert_eq!(report.revenue.today, 1.0);
        assert_eq!(report.revenue.week, 7.0);
    }

    #[test]
    fn city_counts_skip_unknown_customers_and_keep_top_five() {
        let now = now();
        let mut doc = Document::seeded();
        let cities = ["Pune", "Mumbai", "Delhi", "Goa", "Agra", "Kochi"];
        for (i, city) in cities.iter().enumerate() {
            doc.customers.push(customer(&format!("c{i}"), city));
        }
        // Pune x3, Mumbai x2, the rest once each.
        for (n, cust) in ["c0", "c0", "c0", "c1", "c1", "c2", "c3", "c4", "c5", "ghost"]
            .iter()
            .enumerate()
        {
            doc.orders
                .push(order(&format!("o{n}"), cust, 10.0, 0.0, now));
        }

        let report = summarize(&doc, now);
        let got: Vec<(&str, usize)> = report
            .city_wise_orders
            .iter()
            .map(|c| (c.city.as_str(), c.count))
            .collect();
        assert_eq!(
            got,
            vec![("Pune", 3), ("Mumbai", 2), ("Delhi", 1), ("Goa", 1), ("Agra", 1)]
        );
    }

    #[test]
    fn top_customers_rank_by_spend() {
        let now = now();
        let mut doc = Document::seeded();
        doc.customers.push(customer("small", "Pune"));
        doc.customers.push(customer("big", "Pune"));
        doc.orders = vec![
            order("1", "small", 50.0, 0.0, now),
            order("2", "small", 60.0, 0.0, now),
            order("3", "big", 500.0, 0.0, now),
            order("4", "gone", 9999.0, 0.0, now),
        ];

        let report = summarize(&doc, now);
        assert_eq!(report.top_customers.len(), 2);
        assert_eq!(report.top_customers[0].customer.id, "big");
        assert_eq!(report.top_customers[0].order_count, 1);
        assert_eq!(report.top_customers[1].customer.id, "small");
        assert_eq!(report.top_customers[1].order_count, 2);
        assert_eq!(report.top_customers[1].total_spent, 110.0);
    }

    #[test]
    fn pending_invoices_count_unsent() {
        let now = now();
        let mut doc = Document::seeded();
        let o = order("1", "c", 1.0, 0.0, now);
        let at = now.with_timezone(&Utc);
        let invoice = |sent: bool| Invoice {
            id: "inv".to_string(),
            order_id: o.id.clone(),
            order: o.clone(),
            invoice_number: "INV".to_string(),
            issued_date: at,
            due_date: Invoice::due_date_for(at),
            pdf_url: String::new(),
            is_sent: sent,
            sent_at: None,
            status: InvoiceStatus::Completed,
            created_at: at,
        };
        doc.invoices = vec![invoice(false), invoice(true), invoice(false)];

        assert_eq!(summarize(&doc, now).pending_invoices, 2);
    }

    #[test]
    fn payment_breakdown_rounds_percentages() {
        let mut doc = Document::seeded();
        doc.payments = vec![
            payment(PaymentMethod::Upi),
            payment(PaymentMethod::Upi),
            payment(PaymentMethod::Cash),
        ];

        let breakdown = summarize(&doc, now()).payment_breakdown;
        assert_eq!(
            breakdown,
            PaymentBreakdown {
                upi: 67,
                cash: 33,
                online: 0
            }
        );
    }

    #[test]
    fn breakdown_serializes_with_method_names() {
        let json = serde_json::to_value(PaymentBreakdown::default()).unwrap();
        assert_eq!(json, serde_json::json!({"UPI": 0, "Cash": 0, "Online": 0}));
    }
}
