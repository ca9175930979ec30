//! deferred-audit: detect deferred computation retained inside evaluated values
//!
//! A value graph that is supposed to be fully evaluated can still hold on to
//! pending computations (a space leak). This crate inspects a value's current
//! representation and reports the first unexpected deferred cell, together with
//! the trail of type names leading to it.
//!
//! Rust evaluates eagerly, so deferral is explicit: [`Thunk`] holds either a
//! materialized value or a producer that has not run yet. Third-party lazy
//! cells (`once_cell::sync::Lazy`, `once_cell::unsync::Lazy`) are classified the
//! same way. A graph with no deferred-cell types in it is always clean.
//!
//! # Architecture
//!
//! ```text
//! check(value) ──► dispatch ──► Cell::classify ──► Deferred ──► Violation
//!                     │
//!                     └── Realized ──► Audit::audit (participation mode)
//!                                        │
//!              ┌──────────────┬──────────┼──────────────┬──────────────┐
//!              ▼              ▼          ▼              ▼              ▼
//!         structural      elements    shallow         deep          exempt
//!       (Shape + policy) (containers) (outer only) (Cell closure)  (never)
//! ```
//!
//! # Example
//!
//! ```
//! use deferred_audit::{check, Audit, Thunk};
//!
//! #[derive(Audit)]
//! #[audit(allow(cache))]
//! struct Session {
//!     user: String,
//!     retries: u32,
//!     cache: Thunk<Vec<u8>>,
//! }
//!
//! let session = Session {
//!     user: "ops".to_string(),
//!     retries: 3,
//!     cache: Thunk::new(|| vec![0; 1024]),
//! };
//! assert!(check(&session).unwrap().is_none());
//! ```
//!
//! # Build-time exemption validation
//!
//! Naming a field that does not exist is a compile error:
//!
//! ```compile_fail
//! use deferred_audit::{Audit, Thunk};
//!
//! #[derive(Audit)]
//! #[audit(allow(cahce))]
//! struct Session {
//!     user: String,
//!     cache: Thunk<Vec<u8>>,
//! }
//! ```
//!
//! The same holds for hand-written [`Shaped`] impls that build their exemption
//! set with [`Exemptions::fields`] and are listed in [`validate_exemptions!`],
//! even when no code ever checks the type:
//!
//! ```compile_fail
//! use deferred_audit::{dispatch, Audit, Cell, CheckResult, Exemptions, Field, Shape, Shaped, Thunk, Trail};
//! use std::borrow::Cow;
//!
//! struct Pair { left: u32, right: Thunk<u32> }
//!
//! impl Cell for Pair {
//!     fn children(&self) -> Vec<&dyn Cell> { vec![&self.left as &dyn Cell, &self.right] }
//! }
//! impl Audit for Pair {
//!     fn type_name() -> Cow<'static, str> { Cow::Borrowed("Pair") }
//!     fn audit(&self, trail: &Trail<'_>) -> CheckResult { dispatch::structural(self, trail) }
//! }
//! impl Shaped for Pair {
//!     const FIELDS: &'static [&'static str] = &["left", "right"];
//!     const EXEMPTIONS: Exemptions = Exemptions::fields(Self::FIELDS, &["rigth"]);
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Product(vec![Field::new("left", &self.left), Field::exempt("right")])
//!     }
//! }
//!
//! deferred_audit::validate_exemptions!(Pair);
//!
//! fn main() {}
//! ```
//!
//! With the field name spelled correctly, the same impl builds:
//!
//! ```
//! use deferred_audit::{dispatch, Audit, Cell, CheckResult, Exemptions, Field, Shape, Shaped, Thunk, Trail};
//! use std::borrow::Cow;
//!
//! struct Pair { left: u32, right: Thunk<u32> }
//!
//! impl Cell for Pair {
//!     fn children(&self) -> Vec<&dyn Cell> { vec![&self.left as &dyn Cell, &self.right] }
//! }
//! impl Audit for Pair {
//!     fn type_name() -> Cow<'static, str> { Cow::Borrowed("Pair") }
//!     fn audit(&self, trail: &Trail<'_>) -> CheckResult { dispatch::structural(self, trail) }
//! }
//! impl Shaped for Pair {
//!     const FIELDS: &'static [&'static str] = &["left", "right"];
//!     const EXEMPTIONS: Exemptions = Exemptions::fields(Self::FIELDS, &["right"]);
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Product(vec![Field::new("left", &self.left), Field::exempt("right")])
//!     }
//! }
//!
//! deferred_audit::validate_exemptions!(Pair);
//!
//! fn main() {
//!     let pair = Pair { left: 1, right: Thunk::new(|| 2) };
//!     assert!(deferred_audit::check(&pair).unwrap().is_none());
//! }
//! ```

// Lets `#[derive(Audit)]` expansions resolve `::deferred_audit` inside this crate.
extern crate self as deferred_audit;

mod adapters;
mod audit;
pub mod cell;
mod checker;
pub mod config;
pub mod deep;
pub mod dispatch;
mod error;
pub mod policy;
pub mod shape;
pub mod trail;
mod violation;
mod wrappers;

pub use audit::{Audit, DisplayName};
pub use cell::{Cell, Classification, Thunk};
pub use checker::{check, is_fully_realized, Checker};
pub use config::CheckOptions;
pub use dispatch::CheckResult;
pub use error::{ClassifyError, ConfigError, EmptyTrailError};
pub use policy::Exemptions;
pub use shape::{Alternative, Field, Shape, Shaped};
pub use trail::Trail;
pub use violation::Violation;
pub use wrappers::{Deep, Exempt, Shallow};

/// Derive structural participation (or another mode via `#[audit(...)]`).
///
/// See the crate documentation for the accepted attributes.
pub use deferred_audit_macros::Audit;

/// Display name for a type, with module paths stripped from every segment.
///
/// `alloc::vec::Vec<my_app::Payload>` becomes `Vec<Payload>`.
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(c);
            segment_start = out.len();
        }
    }

    out
}
