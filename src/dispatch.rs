//! Traversal dispatcher.
//!
//! [`dispatch`] classifies a value's outer cell and, when it is realized, hands
//! over to the value's participation mode. [`structural`] is the generic walk
//! over a [`Shape`]; [`elements`] and [`entries`] cover containers whose
//! logical contents are not fields.
//!
//! Every walk is ordered and stops at the first violation.

use std::borrow::Cow;

use tracing::trace;

use crate::audit::Audit;
use crate::cell::Classification;
use crate::error::ClassifyError;
use crate::shape::{Field, Shape, Shaped};
use crate::trail::Trail;
use crate::violation::Violation;

/// Outcome of checking one value: clean, a violation, or a cell that could
/// not be classified.
pub type CheckResult = Result<Option<Violation>, ClassifyError>;

/// Check `value` in the context of `trail`.
pub fn dispatch(value: &dyn Audit, trail: &Trail<'_>) -> CheckResult {
    match value.classify()? {
        Classification::Deferred => Ok(Some(trail.violation(value.display_name()))),
        Classification::Realized => value.audit(trail),
    }
}

/// Generic structural walk for a [`Shaped`] type.
///
/// # Panics
///
/// Panics when the shape contradicts the type's declarations: an alternative
/// not listed in `ALTERNATIVES`, or a checked field without a value. Both are
/// bugs in the type's `Shaped` impl.
pub fn structural<T: Shaped>(value: &T, trail: &Trail<'_>) -> CheckResult {
    if T::EXEMPTIONS.is_everything() {
        return Ok(None);
    }

    let trail = trail.enter(T::type_name());
    trace!(frame = ?trail.head(), "entering value");

    match value.shape() {
        Shape::Leaf => Ok(None),
        Shape::Product(fields) => fields_of::<T>(&fields, &trail),
        Shape::Sum(alternative) => {
            assert!(
                T::ALTERNATIVES.contains(&alternative.name),
                "{} reported alternative `{}`, which it does not declare",
                T::type_name(),
                alternative.name,
            );
            fields_of::<T>(&alternative.fields, &trail)
        }
    }
}

fn fields_of<T: Shaped>(fields: &[Field<'_>], trail: &Trail<'_>) -> CheckResult {
    for field in fields {
        debug_assert!(
            T::FIELDS.contains(&field.name()),
            "{} reported undeclared field `{}`",
            T::type_name(),
            field.name(),
        );
        if T::EXEMPTIONS.is_exempt(field.name()) {
            continue;
        }
        let value = match field.value() {
            Some(value) => value,
            None => panic!(
                "field `{}` of {} is not exempt but has no inspectable value",
                field.name(),
                T::type_name(),
            ),
        };
        if let Some(violation) = dispatch(value, trail)? {
            return Ok(Some(violation));
        }
    }
    Ok(None)
}

/// Check the logical elements of a container named `name`, in order.
pub fn elements<'a, I>(name: impl Into<Cow<'static, str>>, items: I, trail: &Trail<'_>) -> CheckResult
where
    I: IntoIterator<Item = &'a dyn Audit>,
{
    let trail = trail.enter(name);
    for item in items {
        if let Some(violation) = dispatch(item, &trail)? {
            return Ok(Some(violation));
        }
    }
    Ok(None)
}

/// Check key/value pairs of a map named `name`; each key before its value.
pub fn entries<'a, I>(name: impl Into<Cow<'static, str>>, pairs: I, trail: &Trail<'_>) -> CheckResult
where
    I: IntoIterator<Item = (&'a dyn Audit, &'a dyn Audit)>,
{
    let trail = trail.enter(name);
    for (key, value) in pairs {
        if let Some(violation) = dispatch(key, &trail)? {
            return Ok(Some(violation));
        }
        if let Some(violation) = dispatch(value, &trail)? {
            return Ok(Some(violation));
        }
    }
    Ok(None)
}

/// First violation among lazily evaluated checks; later checks never run.
pub fn first_violation<I, F>(checks: I) -> CheckResult
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> CheckResult,
{
    for check in checks {
        if let Some(violation) = check()? {
            return Ok(Some(violation));
        }
    }
    Ok(None)
}
