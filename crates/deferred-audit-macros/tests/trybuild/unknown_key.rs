//! This should fail: unknown #[audit] key

#![allow(dead_code)]

#[derive(deferred_audit::Audit)]
#[audit(strict)]
struct Order {
    id: u64,
}

fn main() {}
