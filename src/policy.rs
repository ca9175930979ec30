//! Per-type exemption policy.
//!
//! An exemption set names the fields of one type that may stay deferred. It is
//! validated against the type's real fields when the crate is built:
//! `#[derive(Audit)]` rejects an unknown name with a compile error, and
//! [`Exemptions::fields`] fails const evaluation for hand-written impls.
//!
//! An associated const is only evaluated once something uses it, so a
//! hand-written impl should also be listed in [`validate_exemptions!`],
//! which evaluates it in a free `const` item whether or not the type is
//! ever checked.

/// Which fields of a type may remain deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exemptions {
    /// Every field is checked.
    #[default]
    Nothing,
    /// The listed fields are skipped.
    Fields(&'static [&'static str]),
    /// The check is disabled for the whole value.
    Everything,
}

impl Exemptions {
    /// Exemption set for `exempt`, validated against `real`.
    ///
    /// # Panics
    ///
    /// Panics if a name in `exempt` is not in `real`. Used in a `const`
    /// item this fails the build instead.
    pub const fn fields(real: &'static [&'static str], exempt: &'static [&'static str]) -> Self {
        let mut i = 0;
        while i < exempt.len() {
            if !contains(real, exempt[i]) {
                panic!("exemption names a field that does not exist on this type");
            }
            i += 1;
        }
        Exemptions::Fields(exempt)
    }

    /// Whether `field` may remain deferred.
    pub fn is_exempt(&self, field: &str) -> bool {
        match self {
            Exemptions::Nothing => false,
            Exemptions::Fields(names) => names.contains(&field),
            Exemptions::Everything => true,
        }
    }

    pub fn is_everything(&self) -> bool {
        matches!(self, Exemptions::Everything)
    }
}

/// Evaluate the exemption sets of hand-written [`Shaped`](crate::Shaped)
/// impls at build time.
///
/// `cargo check` reports an unknown exempt field for every listed type, even
/// one that no code path ever checks. Generic types are listed with concrete
/// parameters.
///
/// ```
/// # use deferred_audit::{Exemptions, Shaped};
/// # struct Pair;
/// # impl deferred_audit::Cell for Pair {
/// #     fn children(&self) -> Vec<&dyn deferred_audit::Cell> { Vec::new() }
/// # }
/// # impl deferred_audit::Audit for Pair {
/// #     fn type_name() -> std::borrow::Cow<'static, str> { "Pair".into() }
/// #     fn audit(&self, _: &deferred_audit::Trail<'_>) -> deferred_audit::CheckResult { Ok(None) }
/// # }
/// impl Shaped for Pair {
///     const FIELDS: &'static [&'static str] = &["left", "right"];
///     const EXEMPTIONS: Exemptions = Exemptions::fields(Self::FIELDS, &["right"]);
///     fn shape(&self) -> deferred_audit::Shape<'_> {
///         deferred_audit::Shape::Leaf
///     }
/// }
///
/// deferred_audit::validate_exemptions!(Pair);
/// ```
#[macro_export]
macro_rules! validate_exemptions {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: $crate::Exemptions = <$ty as $crate::Shaped>::EXEMPTIONS;
        )+
    };
}

const fn contains(haystack: &[&str], needle: &str) -> bool {
    let mut i = 0;
    while i < haystack.len() {
        if str_eq(haystack[i], needle) {
            return true;
        }
        i += 1;
    }
    false
}

const fn str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["id", "balance", "history"];
    const LEDGER: Exemptions = Exemptions::fields(FIELDS, &["history"]);

    #[test]
    fn listed_fields_are_exempt() {
        assert!(LEDGER.is_exempt("history"));
        assert!(!LEDGER.is_exempt("balance"));
        assert!(!LEDGER.is_exempt("hist"));
    }

    #[test]
    fn nothing_and_everything() {
        assert!(!Exemptions::Nothing.is_exempt("id"));
        assert!(Exemptions::Everything.is_exempt("id"));
        assert!(Exemptions::Everything.is_everything());
        assert_eq!(Exemptions::default(), Exemptions::Nothing);
    }

    #[test]
    fn positional_names() {
        let set = Exemptions::fields(&["0", "1"], &["1"]);
        assert!(set.is_exempt("1"));
        assert!(!set.is_exempt("0"));
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn unknown_field_panics_at_runtime_construction() {
        let names: &'static [&'static str] = &["balence"];
        let _ = Exemptions::fields(FIELDS, names);
    }

    #[test]
    fn str_eq_compares_bytes() {
        assert!(str_eq("balance", "balance"));
        assert!(!str_eq("balance", "balances"));
        assert!(!str_eq("abc", "abd"));
    }
}
