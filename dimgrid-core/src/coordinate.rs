//! Tagged points on continuous dimensions.

use core::ops::{Add, Mul, Neg, Sub};

use crate::list::{display_names, DimList};

/// A real-valued point labelled by a list of continuous dimensions.
///
/// Arithmetic is only defined between coordinates over the same list, so
/// positions on different axes cannot be combined by accident.
pub struct Coordinate<L: DimList> {
    vals: L::Arr<f64>,
}

impl<L: DimList> Coordinate<L> {
    /// Builds a coordinate from one value per tag, in declaration order.
    pub fn new(vals: L::Arr<f64>) -> Self {
        Self { vals }
    }

    /// The value carried for dimension `C`. Panics when `C` is not in the list.
    pub fn get<C: 'static>(&self) -> f64 {
        self.vals.as_ref()[L::require::<C>()]
    }

    /// All values, in declaration order.
    pub fn values(&self) -> &[f64] {
        self.vals.as_ref()
    }

    /// Projects (and possibly reorders) onto a sub-list of dimensions.
    pub fn select<Sub: DimList>(&self) -> Coordinate<Sub> {
        let ids = Sub::type_ids();
        let names = Sub::names();
        Coordinate::new(Sub::arr_from_fn(|i| {
            let k = L::index_of(ids.as_ref()[i]).unwrap_or_else(|| {
                panic!(
                    "cannot select {}: not a dimension of ({})",
                    crate::list::short_name(names.as_ref()[i]),
                    display_names::<L>(),
                )
            });
            self.vals.as_ref()[k]
        }))
    }
}

impl<C: 'static> Coordinate<(C,)> {
    /// The single value of a one-dimensional coordinate.
    pub fn value(&self) -> f64 {
        self.vals[0]
    }
}

impl<L: DimList> Clone for Coordinate<L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L: DimList> Copy for Coordinate<L> {}

impl<L: DimList> PartialEq for Coordinate<L> {
    fn eq(&self, other: &Self) -> bool {
        self.vals == other.vals
    }
}

impl<C: 'static> PartialOrd for Coordinate<(C,)> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl<L: DimList> core::fmt::Debug for Coordinate<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names = L::names();
        let mut dbg = f.debug_struct("Coordinate");
        for (n, v) in names.as_ref().iter().zip(self.vals.as_ref()) {
            dbg.field(crate::list::short_name(n), v);
        }
        dbg.finish()
    }
}

impl<L: DimList> Add for Coordinate<L> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(L::arr_from_fn(|i| {
            self.vals.as_ref()[i] + rhs.vals.as_ref()[i]
        }))
    }
}

impl<L: DimList> Sub for Coordinate<L> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(L::arr_from_fn(|i| {
            self.vals.as_ref()[i] - rhs.vals.as_ref()[i]
        }))
    }
}

impl<L: DimList> Mul<f64> for Coordinate<L> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(L::arr_from_fn(|i| self.vals.as_ref()[i] * rhs))
    }
}

impl<L: DimList> Neg for Coordinate<L> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(L::arr_from_fn(|i| -self.vals.as_ref()[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct X;
    struct Y;

    #[test]
    fn arithmetic_test() {
        let a = Coordinate::<(X, Y)>::new([1.0, 2.0]);
        let b = Coordinate::<(X, Y)>::new([0.5, -1.0]);
        assert_eq!((a + b).values(), &[1.5, 1.0]);
        assert_eq!((a - b).values(), &[0.5, 3.0]);
        assert_eq!((a * 2.0).values(), &[2.0, 4.0]);
        assert_eq!((-b).values(), &[-0.5, 1.0]);
    }

    #[test]
    fn select_reorders_test() {
        let a = Coordinate::<(X, Y)>::new([1.0, 2.0]);
        let r = a.select::<(Y, X)>();
        assert_eq!(r.values(), &[2.0, 1.0]);
        assert_eq!(r.get::<X>(), 1.0);
        assert_eq!(a.select::<(Y,)>().value(), 2.0);
    }

    #[test]
    #[should_panic(expected = "cannot select")]
    fn select_missing_test() {
        struct Z;
        let a = Coordinate::<(X,)>::new([1.0]);
        let _ = a.select::<(Z,)>();
    }
}
