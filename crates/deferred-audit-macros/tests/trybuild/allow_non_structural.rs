//! This should fail: exemptions only apply to structural participation

#![allow(dead_code)]

#[derive(deferred_audit::Audit)]
#[audit(deep, allow(cache))]
struct Store {
    cache: deferred_audit::Thunk<u8>,
}

fn main() {}
