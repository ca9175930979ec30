//! Structural shapes.
//!
//! A type describes itself to the dispatcher as data: a leaf, a product of
//! fields, or the active alternative of a sum. The dispatcher is written once
//! against this description.

use std::fmt;

use crate::audit::Audit;
use crate::policy::Exemptions;

/// Product/sum description of one realized value.
pub enum Shape<'a> {
    /// No sub-cells left to inspect once the outer cell is realized.
    Leaf,
    /// Fields in declaration order.
    Product(Vec<Field<'a>>),
    /// The active constructor of a sum type.
    Sum(Alternative<'a>),
}

/// One field of a product or alternative.
pub struct Field<'a> {
    name: &'static str,
    value: Option<&'a dyn Audit>,
}

impl<'a> Field<'a> {
    /// An inspectable field. Positional fields are named `"0"`, `"1"`, ….
    pub fn new(name: &'static str, value: &'a dyn Audit) -> Self {
        Self {
            name,
            value: Some(value),
        }
    }

    /// A field the type's policy exempts; its type need not implement
    /// [`Audit`].
    pub fn exempt(name: &'static str) -> Self {
        Self { name, value: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> Option<&'a dyn Audit> {
        self.value
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("value", &self.value.map(|v| v.display_name()))
            .finish()
    }
}

/// The selected constructor of a sum and its own fields.
#[derive(Debug)]
pub struct Alternative<'a> {
    pub name: &'static str,
    pub fields: Vec<Field<'a>>,
}

impl<'a> Alternative<'a> {
    pub fn new(name: &'static str, fields: Vec<Field<'a>>) -> Self {
        Self { name, fields }
    }
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Leaf => f.write_str("Leaf"),
            Shape::Product(fields) => f.debug_tuple("Product").field(fields).finish(),
            Shape::Sum(alternative) => f.debug_tuple("Sum").field(alternative).finish(),
        }
    }
}

/// Structural participation: the type exposes its shape and exemption set.
///
/// Pair with [`dispatch::structural`](crate::dispatch::structural) in
/// [`Audit::audit`].
pub trait Shaped: Audit + Sized {
    /// Every real field name, across all alternatives for sums.
    const FIELDS: &'static [&'static str];

    /// Constructor names; empty for products and leaves.
    const ALTERNATIVES: &'static [&'static str] = &[];

    /// Fields that may remain deferred.
    const EXEMPTIONS: Exemptions = Exemptions::Nothing;

    fn shape(&self) -> Shape<'_>;
}
