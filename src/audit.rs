//! The participation trait.

use std::borrow::Cow;

use crate::cell::Cell;
use crate::dispatch::CheckResult;
use crate::trail::Trail;

/// A type that takes part in deferred-cell checking.
///
/// The dispatcher classifies the outer cell first (via [`Cell::classify`]);
/// `audit` runs only for a realized cell and decides how far to look inside.
/// Usually derived with `#[derive(Audit)]`; hand-written impls pick one of
/// [`dispatch::structural`](crate::dispatch::structural),
/// [`dispatch::elements`](crate::dispatch::elements),
/// [`dispatch::entries`](crate::dispatch::entries),
/// [`deep::audit_deep`](crate::deep::audit_deep), or `Ok(None)`.
pub trait Audit: Cell + DisplayName {
    /// Name recorded in the context trail.
    fn type_name() -> Cow<'static, str>
    where
        Self: Sized;

    /// Inspect a realized value.
    fn audit(&self, trail: &Trail<'_>) -> CheckResult;
}

/// Object-safe access to [`Audit::type_name`].
///
/// Implemented for every sized [`Audit`] type; never implement it by hand.
pub trait DisplayName {
    fn display_name(&self) -> Cow<'static, str>;
}

impl<T: Audit> DisplayName for T {
    fn display_name(&self) -> Cow<'static, str> {
        T::type_name()
    }
}
