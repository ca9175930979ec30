//! This should fail: display name must not be empty

#![allow(dead_code)]

#[derive(deferred_audit::Audit)]
#[audit(name = "")]
struct Order {
    id: u64,
}

fn main() {}
