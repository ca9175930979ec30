//! Compile-failure tests for #[derive(Audit)]
//!
//! Each fixture under tests/trybuild/ must fail to build with the message in
//! its .stderr file.

#[test]
fn derive_rejects_invalid_input() {
    let cases = trybuild::TestCases::new();
    cases.compile_fail("tests/trybuild/*.rs");
}
