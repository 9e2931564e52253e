//! Tagged indices into discrete dimensions.

use core::any::TypeId;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Sub};

use crate::list::{display_names, short_name, DimList};
use crate::vector::DiscreteVector;

/// A point in the index grid of one or more discrete dimensions.
///
/// Each tag carries a non-negative index (`uid`). Adding or subtracting a
/// [`DiscreteVector`] requires the exact same tag list, so offsets along the
/// wrong axis are compile errors. An offset that would make an index
/// negative is a programming error and panics.
pub struct DiscreteElement<L: DimList> {
    uids: L::Arr<u64>,
}

impl<L: DimList> DiscreteElement<L> {
    /// Builds an element from one uid per tag, in declaration order.
    pub fn new(uids: L::Arr<u64>) -> Self {
        Self { uids }
    }

    /// The uid carried for dimension `D`. Panics when `D` is not in the list.
    pub fn uid<D: 'static>(&self) -> u64 {
        self.uids.as_ref()[L::require::<D>()]
    }

    /// All uids, in declaration order.
    pub fn uids(&self) -> &[u64] {
        self.uids.as_ref()
    }

    /// Projects (and possibly reorders) onto a sub-list of dimensions.
    pub fn select<Sub: DimList>(&self) -> DiscreteElement<Sub> {
        let ids = Sub::type_ids();
        let names = Sub::names();
        DiscreteElement::new(Sub::arr_from_fn(|i| {
            let k = L::index_of(ids.as_ref()[i]).unwrap_or_else(|| {
                panic!(
                    "cannot select {}: not a dimension of ({})",
                    short_name(names.as_ref()[i]),
                    display_names::<L>(),
                )
            });
            self.uids.as_ref()[k]
        }))
    }

    /// Assembles an element from lower-rank parts covering each tag exactly
    /// once, in any order.
    ///
    /// ```
    /// # use dimgrid_core::DiscreteElement;
    /// struct X; struct Y;
    /// let ix = DiscreteElement::<(X,)>::new([3]);
    /// let iy = DiscreteElement::<(Y,)>::new([4]);
    /// let ixy = DiscreteElement::<(X, Y)>::compose((iy, ix));
    /// assert_eq!(ixy.uids(), &[3, 4]);
    /// ```
    pub fn compose(parts: impl ElementParts) -> Self {
        let mut entries: Vec<(TypeId, &'static str, u64)> = Vec::new();
        parts.collect(&mut entries);
        if entries.len() != L::RANK {
            panic!(
                "element parts carry {} dimensions, expected the {} of ({})",
                entries.len(),
                L::RANK,
                display_names::<L>(),
            );
        }
        let ids = L::type_ids();
        let names = L::names();
        Self::new(L::arr_from_fn(|i| {
            entries
                .iter()
                .find(|(id, _, _)| *id == ids.as_ref()[i])
                .unwrap_or_else(|| {
                    panic!(
                        "element parts are missing dimension {}",
                        short_name(names.as_ref()[i])
                    )
                })
                .2
        }))
    }
}

/// Sources of per-tag uids for [`DiscreteElement::compose`]: an element, or
/// a tuple of elements.
pub trait ElementParts {
    fn collect(&self, out: &mut Vec<(TypeId, &'static str, u64)>);
}

impl<L: DimList> ElementParts for DiscreteElement<L> {
    fn collect(&self, out: &mut Vec<(TypeId, &'static str, u64)>) {
        let ids = L::type_ids();
        let names = L::names();
        for i in 0..L::RANK {
            out.push((ids.as_ref()[i], names.as_ref()[i], self.uids.as_ref()[i]));
        }
    }
}

macro_rules! impl_element_parts {
    ( $( $p:ident @ $i:tt ),+ ) => {
        impl<$($p: ElementParts),+> ElementParts for ($($p,)+) {
            fn collect(&self, out: &mut Vec<(TypeId, &'static str, u64)>) {
                $( self.$i.collect(out); )+
            }
        }
    };
}
impl_element_parts!(P0 @ 0);
impl_element_parts!(P0 @ 0, P1 @ 1);
impl_element_parts!(P0 @ 0, P1 @ 1, P2 @ 2);
impl_element_parts!(P0 @ 0, P1 @ 1, P2 @ 2, P3 @ 3);

impl<L: DimList> Clone for DiscreteElement<L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L: DimList> Copy for DiscreteElement<L> {}

impl<L: DimList> PartialEq for DiscreteElement<L> {
    fn eq(&self, other: &Self) -> bool {
        self.uids == other.uids
    }
}
impl<L: DimList> Eq for DiscreteElement<L> {}

impl<L: DimList> Hash for DiscreteElement<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uids.as_ref().hash(state);
    }
}

impl<D: 'static> PartialOrd for DiscreteElement<(D,)> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<D: 'static> Ord for DiscreteElement<(D,)> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.uids[0].cmp(&other.uids[0])
    }
}

impl<L: DimList> core::fmt::Debug for DiscreteElement<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names = L::names();
        let mut dbg = f.debug_struct("DiscreteElement");
        for (n, v) in names.as_ref().iter().zip(self.uids.as_ref()) {
            dbg.field(short_name(n), v);
        }
        dbg.finish()
    }
}

impl<L: DimList> Add<DiscreteVector<L>> for DiscreteElement<L> {
    type Output = Self;
    fn add(self, rhs: DiscreteVector<L>) -> Self {
        Self::new(L::arr_from_fn(|i| {
            let moved = self.uids.as_ref()[i] as i64 + rhs.values()[i];
            if moved < 0 {
                panic!(
                    "offset {} on {} moves index {} below zero",
                    rhs.values()[i],
                    short_name(L::names().as_ref()[i]),
                    self.uids.as_ref()[i],
                );
            }
            moved as u64
        }))
    }
}

impl<L: DimList> Sub<DiscreteVector<L>> for DiscreteElement<L> {
    type Output = Self;
    fn sub(self, rhs: DiscreteVector<L>) -> Self {
        self + -rhs
    }
}

impl<L: DimList> Sub for DiscreteElement<L> {
    type Output = DiscreteVector<L>;
    fn sub(self, rhs: Self) -> DiscreteVector<L> {
        DiscreteVector::new(L::arr_from_fn(|i| {
            self.uids.as_ref()[i] as i64 - rhs.uids.as_ref()[i] as i64
        }))
    }
}
