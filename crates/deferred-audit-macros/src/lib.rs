//! Procedural macros for deferred-audit
//!
//! This crate provides one macro:
//! - `#[derive(Audit)]` - Generate `Cell`, `Audit` and (for structural
//!   participation) `Shaped` impls from a type's declared fields

use proc_macro::TokenStream;

mod attrs;
mod audit;

/// Derive deferred-cell participation for a struct or enum.
///
/// Generates `Cell` and `Audit`, and in the default structural mode also
/// `Shaped`, describing the type's fields (or the active variant's fields) in
/// declaration order.
///
/// **Important:** exemptions are checked against the real field names while
/// the macro expands; naming a field that does not exist is a compile error.
///
/// # Attributes
///
/// - `#[audit(allow(field, 0, ...))]` - Fields that may remain deferred
///   (positional fields by index). For enums, each name must exist in at least
///   one variant. Exempt fields still implement `Cell` and are reached by deep
///   inspection; wrap opaque values in `Exempt<T>`.
/// - `#[audit(name = "...")]` - Display name in trails (default: the type name)
/// - `#[audit(shallow)]` - Only the outer cell is checked
/// - `#[audit(deep)]` - Every reachable cell must be realized; fields must
///   implement `Cell`
/// - `#[audit(exempt)]` - Never inspected
///
/// # Example
///
/// ```ignore
/// #[derive(Audit)]
/// #[audit(allow(history))]
/// pub struct Ledger {
///     id: u64,
///     balance: Thunk<i64>,
///     history: Thunk<Vec<Entry>>,
/// }
/// ```
#[proc_macro_derive(Audit, attributes(audit))]
pub fn derive_audit(input: TokenStream) -> TokenStream {
    audit::derive_audit_impl(input)
}
