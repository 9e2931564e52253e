//! Non-owning views of chunks.
//!
//! Spans borrow their chunk, so the borrow checker rules out use after the
//! chunk is gone. Slicing by a fixed element drops the fixed tags; slicing
//! by a subdomain keeps every tag. Either way the resulting layout may be
//! strided; tag-based access is unaffected.

use core::any::TypeId;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use ndarray::{ArrayViewD, ArrayViewMutD, Axis, Dimension, IxDyn, Slice};
use rayon::iter::ParallelBridge;
use rayon::prelude::ParallelIterator;

use dimgrid_core::list::DimList;
use dimgrid_core::{DiscreteDomain, DiscreteElement, DiscreteVector, Domain, StridedDiscreteDomain};

use crate::chunk::{storage_index, Chunk};
use crate::memory::{HostSpace, MemorySpace};

/// A read-only view of (part of) a chunk.
pub struct ChunkSpan<'a, T, S: Domain, M: MemorySpace = HostSpace> {
    pub(crate) data: ArrayViewD<'a, T>,
    pub(crate) support: S,
    pub(crate) _space: PhantomData<M>,
}

/// A writable view of (part of) a chunk.
pub struct ChunkSpanMut<'a, T, S: Domain, M: MemorySpace = HostSpace> {
    pub(crate) data: ArrayViewMutD<'a, T>,
    pub(crate) support: S,
    pub(crate) _space: PhantomData<M>,
}

impl<'a, T, S: Domain, M: MemorySpace> ChunkSpan<'a, T, S, M> {
    /// The domain the view covers.
    pub fn domain(&self) -> &S {
        &self.support
    }

    /// See [`Chunk::at`]: tag-labelled access, extra tags projected away.
    pub fn at<L2: DimList>(&self, e: DiscreteElement<L2>) -> &T {
        let pos = storage_index(&self.support, &e);
        &self.data[IxDyn(pos.as_ref())]
    }
}

impl<'a, T, S: Domain, M: MemorySpace> ChunkSpanMut<'a, T, S, M> {
    pub fn domain(&self) -> &S {
        &self.support
    }

    pub fn at<L2: DimList>(&self, e: DiscreteElement<L2>) -> &T {
        let pos = storage_index(&self.support, &e);
        &self.data[IxDyn(pos.as_ref())]
    }

    pub fn at_mut<L2: DimList>(&mut self, e: DiscreteElement<L2>) -> &mut T {
        let pos = storage_index(&self.support, &e);
        &mut self.data[IxDyn(pos.as_ref())]
    }

    /// Stores `value` everywhere.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    /// Invokes `f` with every element and its cell, in iteration order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(DiscreteElement<S::Dims>, &mut T),
    {
        let support = self.support.clone();
        for (idx, v) in self.data.indexed_iter_mut() {
            f(support.element_at(idx.slice()), v);
        }
    }

    /// Invokes `f` with every element and its cell on the rayon pool, in no
    /// particular order. Cells are distinct, so concurrent writes are safe.
    pub fn par_for_each<F>(&mut self, f: F)
    where
        T: Send,
        S: Sync,
        F: Fn(DiscreteElement<S::Dims>, &mut T) + Send + Sync,
    {
        let support = self.support.clone();
        self.data
            .indexed_iter_mut()
            .par_bridge()
            .for_each(|(idx, v)| f(support.element_at(idx.slice()), v));
    }
}

impl<'a, T, S: Domain, M: MemorySpace> Clone for ChunkSpan<'a, T, S, M> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            support: self.support.clone(),
            _space: PhantomData,
        }
    }
}

impl<'a, T, S: Domain, M: MemorySpace, L2: DimList> Index<DiscreteElement<L2>>
    for ChunkSpan<'a, T, S, M>
{
    type Output = T;
    fn index(&self, e: DiscreteElement<L2>) -> &T {
        self.at(e)
    }
}

impl<'a, T, S: Domain, M: MemorySpace, L2: DimList> Index<DiscreteElement<L2>>
    for ChunkSpanMut<'a, T, S, M>
{
    type Output = T;
    fn index(&self, e: DiscreteElement<L2>) -> &T {
        self.at(e)
    }
}

impl<'a, T, S: Domain, M: MemorySpace, L2: DimList> IndexMut<DiscreteElement<L2>>
    for ChunkSpanMut<'a, T, S, M>
{
    fn index_mut(&mut self, e: DiscreteElement<L2>) -> &mut T {
        self.at_mut(e)
    }
}

fn short(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

struct CollapsePlan<Rest: DimList> {
    /// (axis, storage position), descending axis order
    drops: Vec<(usize, usize)>,
    perm: Vec<usize>,
    support: DiscreteDomain<Rest>,
}

fn collapse_plan<L: DimList, Fixed: DimList, Rest: DimList>(
    dom: &DiscreteDomain<L>,
    at: &DiscreteElement<Fixed>,
) -> CollapsePlan<Rest> {
    assert_eq!(
        Fixed::RANK + Rest::RANK,
        L::RANK,
        "slice fixes {} and keeps {} dimensions, but the chunk has {}",
        Fixed::RANK,
        Rest::RANK,
        L::RANK,
    );
    let fixed_ids = Fixed::type_ids();
    let fixed_names = Fixed::names();
    let mut drops = Vec::with_capacity(Fixed::RANK);
    for i in 0..Fixed::RANK {
        let k = L::index_of(fixed_ids.as_ref()[i]).unwrap_or_else(|| {
            panic!(
                "slice dimension {} is not a dimension of the chunk",
                short(fixed_names.as_ref()[i])
            )
        });
        let uid = at.uids()[i];
        let front = dom.front().uids()[k];
        let extent = dom.extents().values()[k] as u64;
        assert!(
            uid >= front && uid < front + extent,
            "slice index {} on dimension {} is outside [{}, {})",
            uid,
            short(fixed_names.as_ref()[i]),
            front,
            front + extent,
        );
        drops.push((k, (uid - front) as usize));
    }
    drops.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    for w in drops.windows(2) {
        assert!(w[0].0 != w[1].0, "a slice dimension is fixed twice");
    }
    let l_ids = L::type_ids();
    let remaining: Vec<TypeId> = (0..L::RANK)
        .filter(|k| !drops.iter().any(|(a, _)| a == k))
        .map(|k| l_ids.as_ref()[k])
        .collect();
    let rest_ids = Rest::type_ids();
    let rest_names = Rest::names();
    let perm: Vec<usize> = (0..Rest::RANK)
        .map(|i| {
            remaining
                .iter()
                .position(|id| *id == rest_ids.as_ref()[i])
                .unwrap_or_else(|| {
                    panic!(
                        "kept dimension {} is not left over by the slice",
                        short(rest_names.as_ref()[i])
                    )
                })
        })
        .collect();
    let mut sorted = perm.clone();
    sorted.sort_unstable();
    assert!(
        sorted.iter().copied().eq(0..Rest::RANK),
        "kept dimensions must name each remaining dimension exactly once"
    );
    CollapsePlan {
        drops,
        perm,
        support: DiscreteDomain::new(dom.front().select::<Rest>(), dom.extents().select::<Rest>()),
    }
}

struct WindowPlan<L: DimList> {
    slices: Vec<(usize, Slice)>,
    support: DiscreteDomain<L>,
}

fn window_plan<L: DimList, L2: DimList>(
    dom: &DiscreteDomain<L>,
    sub: &DiscreteDomain<L2>,
) -> WindowPlan<L> {
    let mut fronts: Vec<u64> = dom.front().uids().to_vec();
    let mut extents: Vec<i64> = dom.extents().values().to_vec();
    let slices = window_axes::<L, L2>(
        dom,
        sub.front().uids(),
        sub.extents().values(),
        None,
        &mut fronts,
        &mut extents,
        &mut [],
    );
    WindowPlan {
        slices,
        support: DiscreteDomain::new(
            DiscreteElement::new(L::arr_from_fn(|k| fronts[k])),
            DiscreteVector::new(L::arr_from_fn(|k| extents[k])),
        ),
    }
}

struct StridedWindowPlan<L: DimList> {
    slices: Vec<(usize, Slice)>,
    support: StridedDiscreteDomain<L>,
}

fn strided_window_plan<L: DimList, L2: DimList>(
    dom: &DiscreteDomain<L>,
    sub: &StridedDiscreteDomain<L2>,
) -> StridedWindowPlan<L> {
    let mut fronts: Vec<u64> = dom.front().uids().to_vec();
    let mut extents: Vec<i64> = dom.extents().values().to_vec();
    let mut strides: Vec<i64> = vec![1; L::RANK];
    let slices = window_axes::<L, L2>(
        dom,
        sub.front().uids(),
        sub.extents().values(),
        Some(sub.strides().values()),
        &mut fronts,
        &mut extents,
        &mut strides,
    );
    StridedWindowPlan {
        slices,
        support: StridedDiscreteDomain::new(
            DiscreteElement::new(L::arr_from_fn(|k| fronts[k])),
            DiscreteVector::new(L::arr_from_fn(|k| extents[k])),
            DiscreteVector::new(L::arr_from_fn(|k| strides[k])),
        ),
    }
}

fn window_axes<L: DimList, L2: DimList>(
    dom: &DiscreteDomain<L>,
    sub_fronts: &[u64],
    sub_extents: &[i64],
    sub_strides: Option<&[i64]>,
    fronts: &mut [u64],
    extents: &mut [i64],
    strides: &mut [i64],
) -> Vec<(usize, Slice)> {
    let sub_ids = L2::type_ids();
    let sub_names = L2::names();
    let mut slices = Vec::with_capacity(L2::RANK);
    for j in 0..L2::RANK {
        let k = L::index_of(sub_ids.as_ref()[j]).unwrap_or_else(|| {
            panic!(
                "subdomain dimension {} is not a dimension of the chunk",
                short(sub_names.as_ref()[j])
            )
        });
        let own_front = dom.front().uids()[k];
        let own_extent = dom.extents().values()[k] as u64;
        let sf = sub_fronts[j];
        let se = sub_extents[j] as u64;
        assert!(
            sf >= own_front && sf + se <= own_front + own_extent,
            "subdomain [{}, {}) on dimension {} leaves the chunk domain [{}, {})",
            sf,
            sf + se,
            short(sub_names.as_ref()[j]),
            own_front,
            own_front + own_extent,
        );
        let start = (sf - own_front) as isize;
        let step = sub_strides.map_or(1, |s| s[j]);
        slices.push((
            k,
            Slice::new(start, Some(start + se as isize), step as isize),
        ));
        fronts[k] = sf;
        extents[k] = se as i64;
        if let Some(s) = sub_strides {
            strides[k] = s[j];
        }
    }
    slices
}

impl<'a, T, L: DimList, M: MemorySpace> ChunkSpan<'a, T, DiscreteDomain<L>, M> {
    /// Fixes the tags of `at` and drops them; `Rest` names the kept tags
    /// (in the order the resulting span iterates them).
    pub fn slice<Rest: DimList, Fixed: DimList>(
        &self,
        at: DiscreteElement<Fixed>,
    ) -> ChunkSpan<'a, T, DiscreteDomain<Rest>, M> {
        let plan = collapse_plan::<L, Fixed, Rest>(&self.support, &at);
        let mut v = self.data.clone();
        for (axis, pos) in &plan.drops {
            v = v.index_axis_move(Axis(*axis), *pos);
        }
        ChunkSpan {
            data: v.permuted_axes(IxDyn(&plan.perm)),
            support: plan.support,
            _space: PhantomData,
        }
    }

    /// Restricts the view to a subdomain; tags absent from `sub` keep their
    /// full extent.
    pub fn slice_domain<L2: DimList>(
        &self,
        sub: &DiscreteDomain<L2>,
    ) -> ChunkSpan<'a, T, DiscreteDomain<L>, M> {
        let plan = window_plan::<L, L2>(&self.support, sub);
        let mut v = self.data.clone();
        for (axis, s) in &plan.slices {
            v.slice_axis_inplace(Axis(*axis), *s);
        }
        ChunkSpan {
            data: v,
            support: plan.support,
            _space: PhantomData,
        }
    }

    /// Restricts the view to a strided subdomain; the result addresses the
    /// stepped storage directly.
    pub fn slice_strided<L2: DimList>(
        &self,
        sub: &StridedDiscreteDomain<L2>,
    ) -> ChunkSpan<'a, T, StridedDiscreteDomain<L>, M> {
        let plan = strided_window_plan::<L, L2>(&self.support, sub);
        let mut v = self.data.clone();
        for (axis, s) in &plan.slices {
            v.slice_axis_inplace(Axis(*axis), *s);
        }
        ChunkSpan {
            data: v,
            support: plan.support,
            _space: PhantomData,
        }
    }
}

impl<'a, T, L: DimList, M: MemorySpace> ChunkSpanMut<'a, T, DiscreteDomain<L>, M> {
    /// Writable variant of [`ChunkSpan::slice`]; consumes the span so two
    /// writable views never alias.
    pub fn slice_mut<Rest: DimList, Fixed: DimList>(
        self,
        at: DiscreteElement<Fixed>,
    ) -> ChunkSpanMut<'a, T, DiscreteDomain<Rest>, M> {
        let plan = collapse_plan::<L, Fixed, Rest>(&self.support, &at);
        let mut v = self.data;
        for (axis, pos) in &plan.drops {
            v = v.index_axis_move(Axis(*axis), *pos);
        }
        ChunkSpanMut {
            data: v.permuted_axes(IxDyn(&plan.perm)),
            support: plan.support,
            _space: PhantomData,
        }
    }

    /// Writable variant of [`ChunkSpan::slice_domain`].
    pub fn slice_domain_mut<L2: DimList>(
        self,
        sub: &DiscreteDomain<L2>,
    ) -> ChunkSpanMut<'a, T, DiscreteDomain<L>, M> {
        let plan = window_plan::<L, L2>(&self.support, sub);
        let mut v = self.data;
        for (axis, s) in &plan.slices {
            v.slice_axis_inplace(Axis(*axis), *s);
        }
        ChunkSpanMut {
            data: v,
            support: plan.support,
            _space: PhantomData,
        }
    }

    /// Writable variant of [`ChunkSpan::slice_strided`].
    pub fn slice_strided_mut<L2: DimList>(
        self,
        sub: &StridedDiscreteDomain<L2>,
    ) -> ChunkSpanMut<'a, T, StridedDiscreteDomain<L>, M> {
        let plan = strided_window_plan::<L, L2>(&self.support, sub);
        let mut v = self.data;
        for (axis, s) in &plan.slices {
            v.slice_axis_inplace(Axis(*axis), *s);
        }
        ChunkSpanMut {
            data: v,
            support: plan.support,
            _space: PhantomData,
        }
    }
}

/// Anything bound to a domain: chunks and spans.
pub trait WithDomain {
    type Support: Domain;
    fn domain(&self) -> &Self::Support;
}

impl<T, S: Domain, M: MemorySpace> WithDomain for Chunk<T, S, M> {
    type Support = S;
    fn domain(&self) -> &S {
        &self.support
    }
}

impl<'a, T, S: Domain, M: MemorySpace> WithDomain for ChunkSpan<'a, T, S, M> {
    type Support = S;
    fn domain(&self) -> &S {
        &self.support
    }
}

impl<'a, T, S: Domain, M: MemorySpace> WithDomain for ChunkSpanMut<'a, T, S, M> {
    type Support = S;
    fn domain(&self) -> &S {
        &self.support
    }
}

/// The one-dimensional domain of tag `D` covered by a chunk or span.
pub fn get_domain<D, W, L>(w: &W) -> DiscreteDomain<(D,)>
where
    D: 'static,
    L: DimList,
    W: WithDomain<Support = DiscreteDomain<L>>,
{
    w.domain().select::<(D,)>()
}
