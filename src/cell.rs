//! Cell classification.
//!
//! A cell is either [`Classification::Realized`] (it holds a concrete value, or
//! forwards transparently to one) or [`Classification::Deferred`] (it still
//! denotes a computation that has not run). Classification is shallow: it says
//! nothing about the cell's children.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::audit::Audit;
use crate::dispatch::{self, CheckResult};
use crate::error::ClassifyError;
use crate::trail::Trail;

/// Realization state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Holds a concrete value (or a transparent reference to one).
    Realized,
    /// Still a pending computation.
    Deferred,
}

impl Classification {
    pub fn is_realized(&self) -> bool {
        matches!(self, Classification::Realized)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Classification::Deferred)
    }
}

/// One inspectable memory cell.
///
/// Ordinary Rust values are realized by construction, so `classify` defaults
/// to [`Classification::Realized`]. Deferred-cell types override it and must
/// return an error for any state they cannot interpret.
pub trait Cell {
    /// Classify this cell without forcing it.
    fn classify(&self) -> Result<Classification, ClassifyError> {
        Ok(Classification::Realized)
    }

    /// Cells reachable directly from this one.
    fn children(&self) -> Vec<&dyn Cell>;

    /// Address identity of a shared heap cell (`Rc`, `Arc`).
    ///
    /// The deep strategy visits a cell with an identity at most once.
    fn shared_identity(&self) -> Option<usize> {
        None
    }
}

type Producer<T> = Box<dyn FnOnce() -> T + Send>;

/// An explicit deferred cell.
///
/// Holds either a materialized value or a producer that has not run yet.
/// [`Thunk::force`] runs the producer at most once, even under concurrent
/// forcing; later calls return the stored value.
pub struct Thunk<T> {
    value: OnceCell<T>,
    producer: Mutex<Option<Producer<T>>>,
    poisoned: AtomicBool,
}

impl<T> Thunk<T> {
    /// A cell whose value is produced on first [`force`](Thunk::force).
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            value: OnceCell::new(),
            producer: Mutex::new(Some(Box::new(producer))),
            poisoned: AtomicBool::new(false),
        }
    }

    /// A cell that is already realized.
    pub fn ready(value: T) -> Self {
        Self {
            value: OnceCell::with_value(value),
            producer: Mutex::new(None),
            poisoned: AtomicBool::new(false),
        }
    }

    /// Realize the cell and return its value.
    ///
    /// # Panics
    ///
    /// Panics if the producer panicked during an earlier force.
    pub fn force(&self) -> &T {
        self.value.get_or_init(|| {
            let producer = self
                .producer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            match producer {
                Some(producer) => {
                    let guard = PoisonOnUnwind(&self.poisoned);
                    let value = producer();
                    std::mem::forget(guard);
                    value
                }
                None => panic!("Thunk instance has previously been poisoned"),
            }
        })
    }

    /// The value, if the cell has been realized.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }

    /// Consume the cell, forcing it if necessary.
    pub fn into_inner(self) -> T {
        self.force();
        match self.value.into_inner() {
            Some(value) => value,
            None => unreachable!("force leaves the cell initialized"),
        }
    }

    /// Shallow state of the cell.
    ///
    /// A producer that is running on another thread still counts as deferred.
    pub(crate) fn state(&self) -> Option<Classification> {
        if self.value.get().is_some() {
            Some(Classification::Realized)
        } else if self.poisoned.load(Ordering::Acquire) {
            None
        } else {
            Some(Classification::Deferred)
        }
    }
}

struct PoisonOnUnwind<'a>(&'a AtomicBool);

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

impl<T> From<T> for Thunk<T> {
    fn from(value: T) -> Self {
        Self::ready(value)
    }
}

impl<T: Default> Default for Thunk<T> {
    fn default() -> Self {
        Self::ready(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.get(), self.state()) {
            (Some(value), _) => f.debug_tuple("Thunk").field(value).finish(),
            (None, Some(_)) => f.write_str("Thunk(<deferred>)"),
            (None, None) => f.write_str("Thunk(<poisoned>)"),
        }
    }
}

impl<T: Cell> Cell for Thunk<T> {
    fn classify(&self) -> Result<Classification, ClassifyError> {
        self.state().ok_or_else(|| ClassifyError::Poisoned {
            type_name: Cow::Owned(crate::short_type_name::<T>()),
        })
    }

    fn children(&self) -> Vec<&dyn Cell> {
        match self.get() {
            Some(value) => vec![value as &dyn Cell],
            None => Vec::new(),
        }
    }
}

// Transparent: the trail names the value's type, never the cell wrapper.
impl<T: Audit> Audit for Thunk<T> {
    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        match self.get() {
            Some(value) => dispatch::dispatch(value, trail),
            None => Ok(Some(trail.violation(T::type_name()))),
        }
    }
}

impl<T: Cell, F: FnOnce() -> T> Cell for once_cell::sync::Lazy<T, F> {
    fn classify(&self) -> Result<Classification, ClassifyError> {
        Ok(match once_cell::sync::Lazy::get(self) {
            Some(_) => Classification::Realized,
            None => Classification::Deferred,
        })
    }

    fn children(&self) -> Vec<&dyn Cell> {
        once_cell::sync::Lazy::get(self)
            .map(|value| vec![value as &dyn Cell])
            .unwrap_or_default()
    }
}

impl<T: Audit, F: FnOnce() -> T> Audit for once_cell::sync::Lazy<T, F> {
    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        match once_cell::sync::Lazy::get(self) {
            Some(value) => dispatch::dispatch(value, trail),
            None => Ok(Some(trail.violation(T::type_name()))),
        }
    }
}

impl<T: Cell, F: FnOnce() -> T> Cell for once_cell::unsync::Lazy<T, F> {
    fn classify(&self) -> Result<Classification, ClassifyError> {
        Ok(match once_cell::unsync::Lazy::get(self) {
            Some(_) => Classification::Realized,
            None => Classification::Deferred,
        })
    }

    fn children(&self) -> Vec<&dyn Cell> {
        once_cell::unsync::Lazy::get(self)
            .map(|value| vec![value as &dyn Cell])
            .unwrap_or_default()
    }
}

impl<T: Audit, F: FnOnce() -> T> Audit for once_cell::unsync::Lazy<T, F> {
    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        match once_cell::unsync::Lazy::get(self) {
            Some(value) => dispatch::dispatch(value, trail),
            None => Ok(Some(trail.violation(T::type_name()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn new_thunk_is_deferred() {
        let thunk = Thunk::new(|| 7u32);
        assert_eq!(thunk.classify(), Ok(Classification::Deferred));
        assert!(thunk.get().is_none());
        assert!(thunk.children().is_empty());
    }

    #[test]
    fn ready_thunk_is_realized() {
        let thunk = Thunk::ready(7u32);
        assert_eq!(thunk.classify(), Ok(Classification::Realized));
        assert_eq!(thunk.get(), Some(&7));
        assert_eq!(thunk.children().len(), 1);
    }

    #[test]
    fn classification_does_not_force() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let thunk = Thunk::new(move || counter.fetch_add(1, Ordering::SeqCst));

        for _ in 0..3 {
            assert_eq!(thunk.classify(), Ok(Classification::Deferred));
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn force_runs_producer_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let thunk = Thunk::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "done"
        });

        assert_eq!(*thunk.force(), "done");
        assert_eq!(*thunk.force(), "done");
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(thunk.classify(), Ok(Classification::Realized));
    }

    #[test]
    fn concurrent_force_runs_producer_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let thunk = Thunk::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            42u64
        });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| assert_eq!(*thunk.force(), 42));
            }
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_producer_poisons_cell() {
        let thunk: Thunk<u32> = Thunk::new(|| panic!("producer failed"));
        let outcome = catch_unwind(AssertUnwindSafe(|| *thunk.force()));
        assert!(outcome.is_err());

        let err = thunk.classify().unwrap_err();
        assert!(matches!(err, ClassifyError::Poisoned { .. }));
        assert!(err.to_string().contains("u32"));
    }

    #[test]
    fn into_inner_forces() {
        let thunk = Thunk::new(|| String::from("payload"));
        assert_eq!(thunk.into_inner(), "payload");
    }

    #[test]
    fn debug_does_not_force() {
        let thunk = Thunk::new(|| 1u8);
        assert_eq!(format!("{thunk:?}"), "Thunk(<deferred>)");
        thunk.force();
        assert_eq!(format!("{thunk:?}"), "Thunk(1)");
    }

    #[test]
    fn once_cell_lazy_is_classified() {
        let lazy: once_cell::sync::Lazy<u32> = once_cell::sync::Lazy::new(|| 5);
        assert_eq!(lazy.classify(), Ok(Classification::Deferred));
        once_cell::sync::Lazy::force(&lazy);
        assert_eq!(lazy.classify(), Ok(Classification::Realized));

        let local: once_cell::unsync::Lazy<u32> = once_cell::unsync::Lazy::new(|| 5);
        assert_eq!(local.classify(), Ok(Classification::Deferred));
        once_cell::unsync::Lazy::force(&local);
        assert_eq!(local.classify(), Ok(Classification::Realized));
    }
}
