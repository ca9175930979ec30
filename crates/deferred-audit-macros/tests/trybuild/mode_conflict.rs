//! This should fail: a type has exactly one participation mode

#![allow(dead_code)]

#[derive(deferred_audit::Audit)]
#[audit(shallow, deep)]
struct Handle {
    inner: deferred_audit::Thunk<u8>,
}

fn main() {}
