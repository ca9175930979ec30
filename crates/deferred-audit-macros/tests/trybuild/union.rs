//! This should fail: the active field of a union is unknown

#![allow(dead_code)]

#[derive(deferred_audit::Audit)]
union Bits {
    word: u32,
    bytes: [u8; 4],
}

fn main() {}
