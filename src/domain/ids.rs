//! Record ids of the form `{prefix}_{unix_millis}`.
//!
//! The millisecond stamp never repeats within a process: when two ids are
//! requested in the same millisecond the later one is pushed to the next
//! free millisecond.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

pub const CUSTOMER: &str = "cust";
pub const DELIVERY_PARTNER: &str = "dp";
pub const INVOICE: &str = "inv";
pub const ORDER_ITEM: &str = "item";
pub const PAYMENT: &str = "pay";
pub const PRINT_JOB: &str = "job";

pub fn next_id(prefix: &str) -> String {
    format!("{prefix}_{}", next_stamp(Utc::now().timestamp_millis()))
}

fn next_stamp(now_millis: i64) -> i64 {
    let previous = LAST_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now_millis.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now_millis.max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_prefix_and_millis() {
        let id = next_id(CUSTOMER);
        let (prefix, stamp) = id.split_once('_').unwrap();
        assert_eq!(prefix, "cust");
        assert!(stamp.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn stamps_strictly_increase_within_one_millisecond() {
        let now = Utc::now().timestamp_millis() + 10_000;
        let a = next_stamp(now);
        let b = next_stamp(now);
        let c = next_stamp(now);
        assert!(a < b && b < c);
    }

    #[test]
    fn back_to_back_ids_differ() {
        let ids: Vec<String> = (0..50).map(|_| next_id(PAYMENT)).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }
}
