//! This should fail: allow(..) names a field the struct does not have

#![allow(dead_code)]

#[derive(deferred_audit::Audit)]
#[audit(allow(cahce))]
struct Session {
    user: String,
    cache: deferred_audit::Thunk<Vec<u8>>,
}

fn main() {}
