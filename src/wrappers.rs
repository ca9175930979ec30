//! Wrappers choosing a participation mode for values that cannot derive one.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::audit::Audit;
use crate::cell::{Cell, Classification, Thunk};
use crate::deep;
use crate::dispatch::CheckResult;
use crate::error::ClassifyError;
use crate::trail::Trail;

/// Never inspected: the value may hold deferred cells anywhere.
///
/// The fallback for closures, handles, and other values whose contents
/// cannot be meaningfully inspected. Deep inspection does not look inside
/// either.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Exempt<T>(pub T);

impl<T> Cell for Exempt<T> {
    fn children(&self) -> Vec<&dyn Cell> {
        Vec::new()
    }
}

impl<T> Audit for Exempt<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(crate::short_type_name::<T>())
    }

    fn audit(&self, _trail: &Trail<'_>) -> CheckResult {
        Ok(None)
    }
}

/// Only the outer cell is checked; a realized value is not looked into.
///
/// Works for any `T`, including types with no [`Audit`] impl.
pub struct Shallow<T>(pub Thunk<T>);

impl<T> Shallow<T> {
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self(Thunk::new(producer))
    }

    pub fn ready(value: T) -> Self {
        Self(Thunk::ready(value))
    }
}

impl<T> Cell for Shallow<T> {
    fn classify(&self) -> Result<Classification, ClassifyError> {
        self.0.state().ok_or_else(|| ClassifyError::Poisoned {
            type_name: Cow::Owned(crate::short_type_name::<T>()),
        })
    }

    fn children(&self) -> Vec<&dyn Cell> {
        Vec::new()
    }
}

impl<T> Audit for Shallow<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(crate::short_type_name::<T>())
    }

    fn audit(&self, _trail: &Trail<'_>) -> CheckResult {
        Ok(None)
    }
}

impl<T> Deref for Shallow<T> {
    type Target = Thunk<T>;

    fn deref(&self) -> &Thunk<T> {
        &self.0
    }
}

/// Checked with the deep strategy: every reachable cell must be realized.
///
/// A violation names `T` the way the rest of the trail does (`Vec`, a derived
/// type's name); nothing below it.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Deep<T>(pub T);

impl<T: Cell> Cell for Deep<T> {
    fn classify(&self) -> Result<Classification, ClassifyError> {
        self.0.classify()
    }

    fn children(&self) -> Vec<&dyn Cell> {
        vec![&self.0 as &dyn Cell]
    }
}

impl<T: Audit> Audit for Deep<T> {
    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        deep::audit_deep(self, trail)
    }
}

macro_rules! transparent_wrapper {
    ($($wrapper:ident),*) => {$(
        impl<T> Deref for $wrapper<T> {
            type Target = T;

            fn deref(&self) -> &T {
                &self.0
            }
        }

        impl<T> DerefMut for $wrapper<T> {
            fn deref_mut(&mut self) -> &mut T {
                &mut self.0
            }
        }

        impl<T: fmt::Debug> fmt::Debug for $wrapper<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($wrapper)).field(&self.0).finish()
            }
        }
    )*};
}

transparent_wrapper!(Exempt, Deep);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::check;

    #[test]
    fn exempt_accepts_anything() {
        let callback = Exempt(Box::new(|x: u32| x + 1) as Box<dyn Fn(u32) -> u32>);
        assert_eq!(check(&callback).unwrap(), None);
        assert_eq!((callback.0)(1), 2);

        let hidden = Exempt(Thunk::new(|| 1u8));
        assert_eq!(check(&hidden).unwrap(), None);
    }

    #[test]
    fn shallow_checks_outer_cell_only() {
        struct Opaque;

        let pending = Shallow::new(|| Opaque);
        let violation = check(&pending).unwrap().unwrap();
        assert_eq!(violation.innermost(), "Opaque");

        pending.force();
        assert_eq!(check(&pending).unwrap(), None);

        let inner_pending = Shallow::ready(vec![Thunk::new(|| 1u8)]);
        assert_eq!(check(&inner_pending).unwrap(), None);
    }

    #[test]
    fn deep_names_only_the_wrapped_type() {
        let value = Deep(vec![vec![Thunk::ready(1u8)], vec![Thunk::new(|| 2)]]);
        let violation = check(&value).unwrap().unwrap();
        assert_eq!(violation.trail(), ["Vec"]);

        let value = Some(Deep(Thunk::ready(vec![Thunk::new(|| 3u8)])));
        assert_eq!(check(&value).unwrap().unwrap().trail(), ["Vec", "Option"]);

        let value = Deep(vec![Thunk::ready(1u8)]);
        assert_eq!(check(&value).unwrap(), None);
    }
}
