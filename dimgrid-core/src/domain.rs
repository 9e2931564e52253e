//! Tagged index hyper-rectangles.
//!
//! A domain is the set `{ front + v : 0 <= v < extents }` over its tag
//! list. Iteration always runs in declaration order, first tag slowest,
//! which matches the default chunk layout so contiguous iteration touches
//! contiguous memory.

use core::any::TypeId;

use itertools::izip;

use crate::element::DiscreteElement;
use crate::list::{display_names, short_name, DimList};
use crate::vector::DiscreteVector;

/// The support of a chunk: a finite tagged index set with a fixed
/// iteration order and an element <-> storage-position mapping.
///
/// Implemented by [`DiscreteDomain`] (contiguous) and
/// [`StridedDiscreteDomain`] (one cell every `stride` indices per tag).
pub trait Domain: Clone {
    /// The tag list the domain's elements carry.
    type Dims: DimList;

    /// Number of elements in the set.
    fn size(&self) -> usize;

    /// Per-tag cell counts, in declaration order.
    fn shape(&self) -> <Self::Dims as DimList>::Arr<usize>;

    /// Whether the element belongs to the set.
    fn contains(&self, e: &DiscreteElement<Self::Dims>) -> bool;

    /// Per-tag storage position of an element. Panics when the element is
    /// not part of the set.
    fn position(&self, e: &DiscreteElement<Self::Dims>) -> <Self::Dims as DimList>::Arr<usize>;

    /// The element stored at the given per-tag position.
    fn element_at(&self, pos: &[usize]) -> DiscreteElement<Self::Dims>;

    /// The element at a row-major linear position, following the iteration
    /// order.
    fn linear_element(&self, k: usize) -> DiscreteElement<Self::Dims> {
        let shape = self.shape();
        let mut pos = <Self::Dims as DimList>::arr_from_fn(|_| 0usize);
        let mut rem = k;
        for (p, n) in pos.as_mut().iter_mut().zip(shape.as_ref()).rev() {
            *p = rem % n;
            rem /= n;
        }
        assert_eq!(rem, 0, "linear position {k} is out of the domain");
        self.element_at(pos.as_ref())
    }

    /// Iterates the set in declaration order (first tag slowest).
    fn iter(&self) -> DomainIter<Self>
    where
        Self: Sized,
    {
        DomainIter {
            size: self.size(),
            domain: self.clone(),
            next: 0,
        }
    }
}

/// A contiguous tagged index hyper-rectangle `(front, extents)`.
pub struct DiscreteDomain<L: DimList> {
    front: DiscreteElement<L>,
    extents: DiscreteVector<L>,
}

impl<L: DimList> DiscreteDomain<L> {
    /// Builds the rectangle `{ front + v : 0 <= v < extents }`.
    /// Panics on a negative extent.
    pub fn new(front: DiscreteElement<L>, extents: DiscreteVector<L>) -> Self {
        for (n, e) in L::names().as_ref().iter().zip(extents.values()) {
            assert!(
                *e >= 0,
                "negative extent {} on dimension {}",
                e,
                short_name(n)
            );
        }
        Self { front, extents }
    }

    /// First element of the rectangle.
    pub fn front(&self) -> DiscreteElement<L> {
        self.front
    }

    /// Per-tag extents.
    pub fn extents(&self) -> DiscreteVector<L> {
        self.extents
    }

    /// Extent along dimension `D`.
    pub fn extent<D: 'static>(&self) -> u64 {
        self.extents.get::<D>() as u64
    }

    /// Last element of the rectangle. Panics when the domain is empty.
    pub fn back(&self) -> DiscreteElement<L> {
        assert!(!self.is_empty(), "an empty domain has no back element");
        self.front + self.extents - DiscreteVector::splat(1)
    }

    /// Whether any extent is zero.
    pub fn is_empty(&self) -> bool {
        self.extents.values().iter().any(|e| *e == 0)
    }

    /// Keeps the first `n` indices along each dimension.
    pub fn take_first(&self, n: DiscreteVector<L>) -> Self {
        self.check_shrink(&n);
        Self::new(self.front, n)
    }

    /// Keeps the last `n` indices along each dimension.
    pub fn take_last(&self, n: DiscreteVector<L>) -> Self {
        self.check_shrink(&n);
        Self::new(self.front + (self.extents - n), n)
    }

    /// Drops the first `n` indices along each dimension.
    pub fn remove_first(&self, n: DiscreteVector<L>) -> Self {
        self.check_shrink(&n);
        Self::new(self.front + n, self.extents - n)
    }

    /// Drops the last `n` indices along each dimension.
    pub fn remove_last(&self, n: DiscreteVector<L>) -> Self {
        self.check_shrink(&n);
        Self::new(self.front, self.extents - n)
    }

    /// Drops `n_front` leading and `n_back` trailing indices per dimension.
    pub fn remove(&self, n_front: DiscreteVector<L>, n_back: DiscreteVector<L>) -> Self {
        self.remove_first(n_front).remove_last(n_back)
    }

    fn check_shrink(&self, n: &DiscreteVector<L>) {
        for (name, have, want) in izip!(
            L::names().as_ref(),
            self.extents.values(),
            n.values()
        ) {
            assert!(
                (0..=*have).contains(want),
                "cannot take or remove {} of {} indices on dimension {}",
                want,
                have,
                short_name(name)
            );
        }
    }

    /// Projects (and possibly reorders) onto a sub-list of dimensions; the
    /// result denotes the same index set along the kept tags.
    pub fn select<Sub: DimList>(&self) -> DiscreteDomain<Sub> {
        DiscreteDomain::new(self.front.select::<Sub>(), self.extents.select::<Sub>())
    }

    /// Assembles a domain from lower-rank domains over disjoint tag sets
    /// covering each tag exactly once, in any order.
    pub fn cartesian(parts: impl DomainParts) -> Self {
        let mut entries: Vec<(TypeId, &'static str, u64, i64)> = Vec::new();
        parts.collect(&mut entries);
        if entries.len() != L::RANK {
            panic!(
                "domain parts carry {} dimensions, expected the {} of ({})",
                entries.len(),
                L::RANK,
                display_names::<L>(),
            );
        }
        let ids = L::type_ids();
        let names = L::names();
        let pick = |i: usize| {
            *entries
                .iter()
                .find(|(id, _, _, _)| *id == ids.as_ref()[i])
                .unwrap_or_else(|| {
                    panic!(
                        "domain parts are missing dimension {}",
                        short_name(names.as_ref()[i])
                    )
                })
        };
        let front = DiscreteElement::new(L::arr_from_fn(|i| pick(i).2));
        let extents = DiscreteVector::new(L::arr_from_fn(|i| pick(i).3));
        Self::new(front, extents)
    }

    /// Refines the domain to one element every `strides` indices.
    pub fn strided(&self, strides: DiscreteVector<L>) -> StridedDiscreteDomain<L> {
        StridedDiscreteDomain::new(self.front, self.extents, strides)
    }
}

impl<L: DimList> Domain for DiscreteDomain<L> {
    type Dims = L;

    fn size(&self) -> usize {
        self.extents.values().iter().product::<i64>() as usize
    }

    fn shape(&self) -> L::Arr<usize> {
        L::arr_from_fn(|i| self.extents.values()[i] as usize)
    }

    fn contains(&self, e: &DiscreteElement<L>) -> bool {
        izip!(e.uids(), self.front.uids(), self.extents.values())
            .all(|(uid, front, extent)| *uid >= *front && *uid < front + *extent as u64)
    }

    fn position(&self, e: &DiscreteElement<L>) -> L::Arr<usize> {
        L::arr_from_fn(|i| {
            let uid = e.uids()[i];
            let front = self.front.uids()[i];
            let extent = self.extents.values()[i] as u64;
            if uid < front || uid >= front + extent {
                panic!(
                    "index {} on dimension {} is outside [{}, {})",
                    uid,
                    short_name(L::names().as_ref()[i]),
                    front,
                    front + extent,
                );
            }
            (uid - front) as usize
        })
    }

    fn element_at(&self, pos: &[usize]) -> DiscreteElement<L> {
        DiscreteElement::new(L::arr_from_fn(|i| self.front.uids()[i] + pos[i] as u64))
    }
}

impl<L: DimList> Clone for DiscreteDomain<L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L: DimList> Copy for DiscreteDomain<L> {}

impl<L: DimList> PartialEq for DiscreteDomain<L> {
    fn eq(&self, other: &Self) -> bool {
        self.front == other.front && self.extents == other.extents
    }
}
impl<L: DimList> Eq for DiscreteDomain<L> {}

impl<L: DimList> core::fmt::Debug for DiscreteDomain<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DiscreteDomain(")?;
        let names = L::names();
        for (i, (n, (front, extent))) in names
            .as_ref()
            .iter()
            .zip(self.front.uids().iter().zip(self.extents.values()))
            .enumerate()
        {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{}=[{}, {})",
                short_name(n),
                front,
                *front + *extent as u64
            )?;
        }
        write!(f, ")")
    }
}

/// Sources of per-tag ranges for [`DiscreteDomain::cartesian`].
pub trait DomainParts {
    fn collect(&self, out: &mut Vec<(TypeId, &'static str, u64, i64)>);
}

impl<L: DimList> DomainParts for DiscreteDomain<L> {
    fn collect(&self, out: &mut Vec<(TypeId, &'static str, u64, i64)>) {
        let ids = L::type_ids();
        let names = L::names();
        for i in 0..L::RANK {
            out.push((
                ids.as_ref()[i],
                names.as_ref()[i],
                self.front.uids()[i],
                self.extents.values()[i],
            ));
        }
    }
}

macro_rules! impl_domain_parts {
    ( $( $p:ident @ $i:tt ),+ ) => {
        impl<$($p: DomainParts),+> DomainParts for ($($p,)+) {
            fn collect(&self, out: &mut Vec<(TypeId, &'static str, u64, i64)>) {
                $( self.$i.collect(out); )+
            }
        }
    };
}
impl_domain_parts!(P0 @ 0);
impl_domain_parts!(P0 @ 0, P1 @ 1);
impl_domain_parts!(P0 @ 0, P1 @ 1, P2 @ 2);
impl_domain_parts!(P0 @ 0, P1 @ 1, P2 @ 2, P3 @ 3);

/// A hyper-rectangle visiting one element every `strides` indices per
/// dimension: `front + k * stride` for `0 <= k < ceil(extent / stride)`.
pub struct StridedDiscreteDomain<L: DimList> {
    front: DiscreteElement<L>,
    extents: DiscreteVector<L>,
    strides: DiscreteVector<L>,
}

impl<L: DimList> StridedDiscreteDomain<L> {
    /// Panics on a negative extent or a non-positive stride.
    pub fn new(
        front: DiscreteElement<L>,
        extents: DiscreteVector<L>,
        strides: DiscreteVector<L>,
    ) -> Self {
        for (name, extent, stride) in
            izip!(L::names().as_ref(), extents.values(), strides.values())
        {
            assert!(
                *extent >= 0,
                "negative extent {} on dimension {}",
                extent,
                short_name(name)
            );
            assert!(
                *stride > 0,
                "non-positive stride {} on dimension {}",
                stride,
                short_name(name)
            );
        }
        Self {
            front,
            extents,
            strides,
        }
    }

    pub fn front(&self) -> DiscreteElement<L> {
        self.front
    }

    pub fn extents(&self) -> DiscreteVector<L> {
        self.extents
    }

    pub fn strides(&self) -> DiscreteVector<L> {
        self.strides
    }
}

impl<L: DimList> Domain for StridedDiscreteDomain<L> {
    type Dims = L;

    fn size(&self) -> usize {
        self.shape().as_ref().iter().product()
    }

    fn shape(&self) -> L::Arr<usize> {
        L::arr_from_fn(|i| {
            let extent = self.extents.values()[i];
            let stride = self.strides.values()[i];
            ((extent + stride - 1) / stride) as usize
        })
    }

    fn contains(&self, e: &DiscreteElement<L>) -> bool {
        izip!(
            e.uids(),
            self.front.uids(),
            self.extents.values(),
            self.strides.values()
        )
        .all(|(uid, front, extent, stride)| {
            *uid >= *front
                && *uid < front + *extent as u64
                && (uid - front) % *stride as u64 == 0
        })
    }

    fn position(&self, e: &DiscreteElement<L>) -> L::Arr<usize> {
        L::arr_from_fn(|i| {
            let uid = e.uids()[i];
            let front = self.front.uids()[i];
            let extent = self.extents.values()[i] as u64;
            let stride = self.strides.values()[i] as u64;
            if uid < front || uid >= front + extent {
                panic!(
                    "index {} on dimension {} is outside [{}, {})",
                    uid,
                    short_name(L::names().as_ref()[i]),
                    front,
                    front + extent,
                );
            }
            if (uid - front) % stride != 0 {
                panic!(
                    "index {} on dimension {} is not aligned to stride {}",
                    uid,
                    short_name(L::names().as_ref()[i]),
                    stride,
                );
            }
            ((uid - front) / stride) as usize
        })
    }

    fn element_at(&self, pos: &[usize]) -> DiscreteElement<L> {
        DiscreteElement::new(L::arr_from_fn(|i| {
            self.front.uids()[i] + pos[i] as u64 * self.strides.values()[i] as u64
        }))
    }
}

impl<L: DimList> Clone for StridedDiscreteDomain<L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L: DimList> Copy for StridedDiscreteDomain<L> {}

impl<L: DimList> PartialEq for StridedDiscreteDomain<L> {
    fn eq(&self, other: &Self) -> bool {
        self.front == other.front
            && self.extents == other.extents
            && self.strides == other.strides
    }
}
impl<L: DimList> Eq for StridedDiscreteDomain<L> {}

impl<L: DimList> core::fmt::Debug for StridedDiscreteDomain<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "StridedDiscreteDomain(front={:?}, extents={:?}, strides={:?})",
            self.front, self.extents, self.strides
        )
    }
}

/// Iterator over a domain in declaration order.
pub struct DomainIter<D: Domain> {
    domain: D,
    next: usize,
    size: usize,
}

impl<D: Domain> Iterator for DomainIter<D> {
    type Item = DiscreteElement<D::Dims>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.size {
            return None;
        }
        let e = self.domain.linear_element(self.next);
        self.next += 1;
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.size - self.next;
        (left, Some(left))
    }
}

impl<D: Domain> ExactSizeIterator for DomainIter<D> {}

impl<L: DimList> IntoIterator for DiscreteDomain<L> {
    type Item = DiscreteElement<L>;
    type IntoIter = DomainIter<Self>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: DimList> IntoIterator for &DiscreteDomain<L> {
    type Item = DiscreteElement<L>;
    type IntoIter = DomainIter<DiscreteDomain<L>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: DimList> IntoIterator for StridedDiscreteDomain<L> {
    type Item = DiscreteElement<L>;
    type IntoIter = DomainIter<Self>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: DimList> IntoIterator for &StridedDiscreteDomain<L> {
    type Item = DiscreteElement<L>;
    type IntoIter = DomainIter<StridedDiscreteDomain<L>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
