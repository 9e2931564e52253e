//! Tagged signed offsets between discrete elements.

use core::ops::{Add, Mul, Neg, Sub};

use crate::list::{display_names, short_name, DimList};

/// A signed offset in the index grid of one or more discrete dimensions.
///
/// Same tagging rules as [`crate::DiscreteElement`]: operations require the
/// exact same tag list.
pub struct DiscreteVector<L: DimList> {
    vals: L::Arr<i64>,
}

impl<L: DimList> DiscreteVector<L> {
    /// Builds a vector from one signed component per tag, in declaration order.
    pub fn new(vals: L::Arr<i64>) -> Self {
        Self { vals }
    }

    /// A vector with the same component on every tag.
    pub fn splat(v: i64) -> Self {
        Self::new(L::arr_from_fn(|_| v))
    }

    /// The component carried for dimension `D`. Panics when `D` is not in the list.
    pub fn get<D: 'static>(&self) -> i64 {
        self.vals.as_ref()[L::require::<D>()]
    }

    /// All components, in declaration order.
    pub fn values(&self) -> &[i64] {
        self.vals.as_ref()
    }

    /// Projects (and possibly reorders) onto a sub-list of dimensions.
    pub fn select<Sub: DimList>(&self) -> DiscreteVector<Sub> {
        let ids = Sub::type_ids();
        let names = Sub::names();
        DiscreteVector::new(Sub::arr_from_fn(|i| {
            let k = L::index_of(ids.as_ref()[i]).unwrap_or_else(|| {
                panic!(
                    "cannot select {}: not a dimension of ({})",
                    short_name(names.as_ref()[i]),
                    display_names::<L>(),
                )
            });
            self.vals.as_ref()[k]
        }))
    }
}

impl<L: DimList> Clone for DiscreteVector<L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L: DimList> Copy for DiscreteVector<L> {}

impl<L: DimList> PartialEq for DiscreteVector<L> {
    fn eq(&self, other: &Self) -> bool {
        self.vals == other.vals
    }
}
impl<L: DimList> Eq for DiscreteVector<L> {}

impl<L: DimList> core::fmt::Debug for DiscreteVector<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names = L::names();
        let mut dbg = f.debug_struct("DiscreteVector");
        for (n, v) in names.as_ref().iter().zip(self.vals.as_ref()) {
            dbg.field(short_name(n), v);
        }
        dbg.finish()
    }
}

impl<L: DimList> Add for DiscreteVector<L> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(L::arr_from_fn(|i| {
            self.vals.as_ref()[i] + rhs.vals.as_ref()[i]
        }))
    }
}

impl<L: DimList> Sub for DiscreteVector<L> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(L::arr_from_fn(|i| {
            self.vals.as_ref()[i] - rhs.vals.as_ref()[i]
        }))
    }
}

impl<L: DimList> Neg for DiscreteVector<L> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(L::arr_from_fn(|i| -self.vals.as_ref()[i]))
    }
}

impl<L: DimList> Mul<i64> for DiscreteVector<L> {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self::new(L::arr_from_fn(|i| self.vals.as_ref()[i] * rhs))
    }
}
