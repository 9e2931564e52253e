//! Ordered lists of dimension tags.
//!
//! A list is a tuple of tag types, up to rank 4. The list decides the
//! declaration order of every tagged value: iteration runs with the first
//! tag slowest and the last tag fastest, matching the default chunk layout.
//!
//! Tag identity inside a list is resolved through [`TypeId`]; asking for a
//! tag the list does not carry is a programming error and panics with the
//! offending tag names. Values over *different* list types still refuse to
//! mix at compile time.

use core::any::TypeId;

/// Anything storable in a per-dimension array.
pub trait Slot: Copy + core::fmt::Debug + PartialEq + 'static {}
impl<T: Copy + core::fmt::Debug + PartialEq + 'static> Slot for T {}

/// An ordered tuple of dimension tags.
pub trait DimList: 'static {
    /// Number of tags in the list.
    const RANK: usize;

    /// Fixed-size per-tag storage, `[T; RANK]`.
    type Arr<T: Slot>: Copy
        + core::fmt::Debug
        + PartialEq
        + AsRef<[T]>
        + AsMut<[T]>
        + IntoIterator<Item = T>;

    /// Builds a per-tag array from a position-indexed function.
    fn arr_from_fn<T: Slot>(f: impl FnMut(usize) -> T) -> Self::Arr<T>;

    /// The `TypeId` of each tag, in declaration order.
    fn type_ids() -> Self::Arr<TypeId>;

    /// The type name of each tag, in declaration order.
    fn names() -> Self::Arr<&'static str>;

    /// Position of the tag with the given id, if present.
    fn index_of(id: TypeId) -> Option<usize> {
        Self::type_ids().as_ref().iter().position(|t| *t == id)
    }

    /// Position of tag `D`. Panics when `D` is not part of the list.
    fn require<D: 'static>() -> usize {
        match Self::index_of(TypeId::of::<D>()) {
            Some(i) => i,
            None => panic!(
                "dimension {} is not part of ({})",
                short_name(core::any::type_name::<D>()),
                display_names::<Self>(),
            ),
        }
    }
}

/// A [`DimList`] whose tags are all discrete dimensions.
pub trait DiscreteDimList: DimList {
    /// The matching list of continuous dimensions, in the same order.
    type Continuous: DimList;

    /// Looks up the coordinate of each uid through the discrete-space
    /// registry, one registry entry per member tag.
    fn coordinates(uids: &[u64]) -> <Self::Continuous as DimList>::Arr<f64>;
}

/// Last path segment of a type name, for diagnostics.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Comma-separated short tag names of a list, for diagnostics.
pub(crate) fn display_names<L: DimList + ?Sized>() -> String {
    L::names()
        .as_ref()
        .iter()
        .map(|n| short_name(n))
        .collect::<Vec<_>>()
        .join(", ")
}

macro_rules! impl_dim_list {
    ( $rank:literal $(, $d:ident @ $i:tt )* ) => {
        impl<$($d: 'static),*> DimList for ($($d,)*) {
            const RANK: usize = $rank;
            type Arr<T: Slot> = [T; $rank];

            fn arr_from_fn<T: Slot>(f: impl FnMut(usize) -> T) -> Self::Arr<T> {
                core::array::from_fn(f)
            }

            fn type_ids() -> Self::Arr<TypeId> {
                [$(TypeId::of::<$d>()),*]
            }

            fn names() -> Self::Arr<&'static str> {
                [$(core::any::type_name::<$d>()),*]
            }
        }

        impl<$($d: crate::tag::DDim),*> DiscreteDimList for ($($d,)*) {
            type Continuous = ($($d::Continuous,)*);

            fn coordinates(uids: &[u64]) -> [f64; $rank] {
                assert_eq!(uids.len(), $rank);
                [$(crate::space::coordinate_of::<$d>(uids[$i])),*]
            }
        }
    };
}

impl_dim_list!(0);
impl_dim_list!(1, D0 @ 0);
impl_dim_list!(2, D0 @ 0, D1 @ 1);
impl_dim_list!(3, D0 @ 0, D1 @ 1, D2 @ 2);
impl_dim_list!(4, D0 @ 0, D1 @ 1, D2 @ 2, D3 @ 3);

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;
    struct C;

    #[test]
    fn rank_and_order_test() {
        assert_eq!(<() as DimList>::RANK, 0);
        assert_eq!(<(A,) as DimList>::RANK, 1);
        assert_eq!(<(A, B, C) as DimList>::RANK, 3);
        assert_eq!(<(A, B) as DimList>::index_of(TypeId::of::<B>()), Some(1));
        assert_eq!(<(A, B) as DimList>::index_of(TypeId::of::<C>()), None);
        assert_eq!(<(B, A) as DimList>::require::<B>(), 0);
    }

    #[test]
    #[should_panic(expected = "is not part of")]
    fn missing_tag_test() {
        <(A, B) as DimList>::require::<C>();
    }

    #[test]
    fn names_are_short_test() {
        assert_eq!(short_name(core::any::type_name::<A>()), "A");
    }
}
