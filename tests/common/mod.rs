#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const ORDER_ID: &str = "7f8cd6d6-7ac4-4a41-a2a7-9b3f62041f1e";

/// Ticket code the backend derives from `ORDER_ID`.
pub const ORDER_TICKET: &str = "7F8CD6";

pub fn create_order_line(id: &str) -> String {
    format!(
        r#"{{"event":"create_order","id":"{id}","attendance_token":"totem-1","items":[{{"product_id":"X-BURGER","quantity":2,"unit_price":"10.00"}}],"subtotal":"20.00","total":"20.00"}}"#
    )
}

pub fn notification_line(id: &str, kind: &str, status: &str) -> String {
    format!(
        r#"{{"event":"payment_notification","order_id":"{id}","type":"{kind}","signature":"sig","status":"{status}"}}"#
    )
}

pub fn staff_line(event: &str, id: &str) -> String {
    format!(r#"{{"event":"{event}","order_id":"{id}"}}"#)
}

pub fn write_events(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}
