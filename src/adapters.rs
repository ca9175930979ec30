//! Participation for std types.
//!
//! - leaves: numbers, text, markers
//! - `Option`, `Result`, tuples: hand-written shapes
//! - sequences and sets: elements
//! - maps: entries, key before value
//! - `Box`, `Rc`, `Arc`: transparent forwarding

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crate::audit::Audit;
use crate::cell::{Cell, Classification};
use crate::dispatch::{self, CheckResult};
use crate::error::ClassifyError;
use crate::shape::{Alternative, Field, Shape, Shaped};
use crate::trail::Trail;

macro_rules! leaf {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Cell for $ty {
            fn children(&self) -> Vec<&dyn Cell> {
                Vec::new()
            }
        }

        impl Audit for $ty {
            fn type_name() -> Cow<'static, str> {
                Cow::Borrowed($name)
            }

            fn audit(&self, trail: &Trail<'_>) -> CheckResult {
                dispatch::structural(self, trail)
            }
        }

        impl Shaped for $ty {
            const FIELDS: &'static [&'static str] = &[];

            fn shape(&self) -> Shape<'_> {
                Shape::Leaf
            }
        }
    )*};
}

leaf! {
    u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", u128 => "u128", usize => "usize",
    i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", i128 => "i128", isize => "isize",
    f32 => "f32", f64 => "f64",
    bool => "bool", char => "char", () => "()",
    String => "String", &'static str => "str",
    Duration => "Duration",
}

impl<T: ?Sized> Cell for PhantomData<T> {
    fn children(&self) -> Vec<&dyn Cell> {
        Vec::new()
    }
}

impl<T: ?Sized> Audit for PhantomData<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("PhantomData")
    }

    fn audit(&self, _trail: &Trail<'_>) -> CheckResult {
        Ok(None)
    }
}

// Forwarding references classify as their target and take its name.
macro_rules! transparent {
    ($($ptr:ident),*) => {$(
        impl<T: Cell> Cell for $ptr<T> {
            fn classify(&self) -> Result<Classification, ClassifyError> {
                (**self).classify()
            }

            fn children(&self) -> Vec<&dyn Cell> {
                (**self).children()
            }

            fn shared_identity(&self) -> Option<usize> {
                transparent!(@identity $ptr, self)
            }
        }

        impl<T: Audit> Audit for $ptr<T> {
            fn type_name() -> Cow<'static, str> {
                T::type_name()
            }

            fn audit(&self, trail: &Trail<'_>) -> CheckResult {
                (**self).audit(trail)
            }
        }
    )*};
    (@identity Box, $this:ident) => { None };
    (@identity $ptr:ident, $this:ident) => { Some($ptr::as_ptr($this) as *const () as usize) };
}

transparent!(Box, Rc, Arc);

impl<T: Audit> Cell for Option<T> {
    fn children(&self) -> Vec<&dyn Cell> {
        match self {
            Some(value) => vec![value as &dyn Cell],
            None => Vec::new(),
        }
    }
}

impl<T: Audit> Audit for Option<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("Option")
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        dispatch::structural(self, trail)
    }
}

impl<T: Audit> Shaped for Option<T> {
    const FIELDS: &'static [&'static str] = &["0"];
    const ALTERNATIVES: &'static [&'static str] = &["None", "Some"];

    fn shape(&self) -> Shape<'_> {
        match self {
            None => Shape::Sum(Alternative::new("None", Vec::new())),
            Some(value) => Shape::Sum(Alternative::new("Some", vec![Field::new("0", value)])),
        }
    }
}

impl<T: Audit, E: Audit> Cell for Result<T, E> {
    fn children(&self) -> Vec<&dyn Cell> {
        match self {
            Ok(value) => vec![value as &dyn Cell],
            Err(err) => vec![err as &dyn Cell],
        }
    }
}

impl<T: Audit, E: Audit> Audit for Result<T, E> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("Result")
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        dispatch::structural(self, trail)
    }
}

impl<T: Audit, E: Audit> Shaped for Result<T, E> {
    const FIELDS: &'static [&'static str] = &["0"];
    const ALTERNATIVES: &'static [&'static str] = &["Ok", "Err"];

    fn shape(&self) -> Shape<'_> {
        match self {
            Ok(value) => Shape::Sum(Alternative::new("Ok", vec![Field::new("0", value)])),
            Err(err) => Shape::Sum(Alternative::new("Err", vec![Field::new("0", err)])),
        }
    }
}

macro_rules! tuple {
    ($name:literal; $($param:ident . $idx:tt),+) => {
        impl<$($param: Audit),+> Cell for ($($param,)+) {
            fn children(&self) -> Vec<&dyn Cell> {
                vec![$(&self.$idx as &dyn Cell),+]
            }
        }

        impl<$($param: Audit),+> Audit for ($($param,)+) {
            fn type_name() -> Cow<'static, str> {
                Cow::Borrowed($name)
            }

            fn audit(&self, trail: &Trail<'_>) -> CheckResult {
                dispatch::structural(self, trail)
            }
        }

        impl<$($param: Audit),+> Shaped for ($($param,)+) {
            const FIELDS: &'static [&'static str] = &[$(stringify!($idx)),+];

            fn shape(&self) -> Shape<'_> {
                Shape::Product(vec![$(Field::new(stringify!($idx), &self.$idx)),+])
            }
        }
    };
}

tuple!("(_,)"; A.0);
tuple!("(,)"; A.0, B.1);
tuple!("(,,)"; A.0, B.1, C.2);
tuple!("(,,,)"; A.0, B.1, C.2, D.3);

macro_rules! sequence {
    ($($coll:ident => $name:literal),*) => {$(
        impl<T: Audit> Cell for $coll<T> {
            fn children(&self) -> Vec<&dyn Cell> {
                self.iter().map(|item| item as &dyn Cell).collect()
            }
        }

        impl<T: Audit> Audit for $coll<T> {
            fn type_name() -> Cow<'static, str> {
                Cow::Borrowed($name)
            }

            fn audit(&self, trail: &Trail<'_>) -> CheckResult {
                dispatch::elements($name, self.iter().map(|item| item as &dyn Audit), trail)
            }
        }
    )*};
}

sequence!(Vec => "Vec", VecDeque => "VecDeque", BTreeSet => "BTreeSet");

impl<T: Audit, const N: usize> Cell for [T; N] {
    fn children(&self) -> Vec<&dyn Cell> {
        self.iter().map(|item| item as &dyn Cell).collect()
    }
}

impl<T: Audit, const N: usize> Audit for [T; N] {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("Array")
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        dispatch::elements("Array", self.iter().map(|item| item as &dyn Audit), trail)
    }
}

impl<T: Audit, S: BuildHasher> Cell for HashSet<T, S> {
    fn children(&self) -> Vec<&dyn Cell> {
        self.iter().map(|item| item as &dyn Cell).collect()
    }
}

impl<T: Audit, S: BuildHasher> Audit for HashSet<T, S> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("HashSet")
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        dispatch::elements("HashSet", self.iter().map(|item| item as &dyn Audit), trail)
    }
}

impl<K: Audit, V: Audit> Cell for BTreeMap<K, V> {
    fn children(&self) -> Vec<&dyn Cell> {
        self.iter()
            .flat_map(|(k, v)| [k as &dyn Cell, v as &dyn Cell])
            .collect()
    }
}

impl<K: Audit, V: Audit> Audit for BTreeMap<K, V> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("BTreeMap")
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        dispatch::entries(
            "BTreeMap",
            self.iter().map(|(k, v)| (k as &dyn Audit, v as &dyn Audit)),
            trail,
        )
    }
}

impl<K: Audit, V: Audit, S: BuildHasher> Cell for HashMap<K, V, S> {
    fn children(&self) -> Vec<&dyn Cell> {
        self.iter()
            .flat_map(|(k, v)| [k as &dyn Cell, v as &dyn Cell])
            .collect()
    }
}

impl<K: Audit, V: Audit, S: BuildHasher> Audit for HashMap<K, V, S> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("HashMap")
    }

    fn audit(&self, trail: &Trail<'_>) -> CheckResult {
        dispatch::entries(
            "HashMap",
            self.iter().map(|(k, v)| (k as &dyn Audit, v as &dyn Audit)),
            trail,
        )
    }
}
