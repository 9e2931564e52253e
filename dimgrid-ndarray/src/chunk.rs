//! Owning multi-dimensional storage bound to a discrete domain.

use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use ndarray::{ArrayD, IxDyn};
use num_traits::Zero;

use dimgrid_core::list::DimList;
use dimgrid_core::{DiscreteElement, Domain};

use crate::memory::{AllocError, Allocator, HostAllocator, HostSpace, MemorySpace};
use crate::span::{ChunkSpan, ChunkSpanMut};

/// Per-axis storage position of `e` in `support`, projecting away any extra
/// tags the element carries. Tags decide the projection, not positions.
pub(crate) fn storage_index<S: Domain, L2: DimList>(
    support: &S,
    e: &DiscreteElement<L2>,
) -> <S::Dims as DimList>::Arr<usize> {
    support.position(&e.select::<S::Dims>())
}

/// An owning N-dimensional array over a discrete domain.
///
/// Storage is row-major in the domain's declared tag order, last tag
/// fastest, so domain iteration touches contiguous memory. The memory
/// space is part of the type; the buffer is released on drop.
pub struct Chunk<T, S: Domain, M: MemorySpace = HostSpace> {
    pub(crate) data: ArrayD<T>,
    pub(crate) support: S,
    pub(crate) _space: PhantomData<M>,
}

impl<T, S: Domain, M: MemorySpace> Chunk<T, S, M> {
    /// Allocates a chunk holding `value` everywhere.
    pub fn from_elem<A>(support: S, value: T, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
        A: Allocator<Space = M>,
    {
        let shape: Vec<usize> = support.shape().as_ref().to_vec();
        let buf = alloc.allocate_filled(support.size(), value)?;
        let data = ArrayD::from_shape_vec(IxDyn(&shape), buf)
            .expect("domain shape and buffer length agree");
        Ok(Self {
            data,
            support,
            _space: PhantomData,
        })
    }

    /// Allocates a default-filled chunk.
    pub fn new<A>(support: S, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone + Default,
        A: Allocator<Space = M>,
    {
        Self::from_elem(support, T::default(), alloc)
    }

    /// Allocates a zero-filled chunk.
    pub fn zeros<A>(support: S, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone + Zero,
        A: Allocator<Space = M>,
    {
        Self::from_elem(support, T::zero(), alloc)
    }

    /// The domain the chunk is bound to.
    pub fn domain(&self) -> &S {
        &self.support
    }

    /// A non-owning read view of the whole chunk.
    pub fn view(&self) -> ChunkSpan<'_, T, S, M> {
        ChunkSpan {
            data: self.data.view(),
            support: self.support.clone(),
            _space: PhantomData,
        }
    }

    /// A non-owning write view of the whole chunk.
    pub fn view_mut(&mut self) -> ChunkSpanMut<'_, T, S, M> {
        ChunkSpanMut {
            data: self.data.view_mut(),
            support: self.support.clone(),
            _space: PhantomData,
        }
    }

    /// The element identified by the tag-labelled indices of `e`, whose tag
    /// set may be any superset of the domain's, in any order.
    pub fn at<L2: DimList>(&self, e: DiscreteElement<L2>) -> &T {
        let pos = storage_index(&self.support, &e);
        &self.data[IxDyn(pos.as_ref())]
    }

    /// Mutable variant of [`at`](Chunk::at).
    pub fn at_mut<L2: DimList>(&mut self, e: DiscreteElement<L2>) -> &mut T {
        let pos = storage_index(&self.support, &e);
        &mut self.data[IxDyn(pos.as_ref())]
    }
}

impl<T, S: Domain> Chunk<T, S, HostSpace> {
    /// Builds a host chunk by evaluating `f` on every element, in iteration
    /// order.
    pub fn from_fn<F>(support: S, mut f: F) -> Result<Self, AllocError>
    where
        F: FnMut(DiscreteElement<S::Dims>) -> T,
    {
        let n = support.size();
        let mut buf = Vec::new();
        buf.try_reserve_exact(n)
            .map_err(|_| AllocError::OutOfMemory {
                bytes: n * core::mem::size_of::<T>(),
                space: HostSpace::NAME,
            })?;
        for e in support.iter() {
            buf.push(f(e));
        }
        let shape: Vec<usize> = support.shape().as_ref().to_vec();
        let data =
            ArrayD::from_shape_vec(IxDyn(&shape), buf).expect("domain shape and buffer length agree");
        Ok(Self {
            data,
            support,
            _space: PhantomData,
        })
    }
}

impl<T, S: Domain, M: MemorySpace, L2: DimList> Index<DiscreteElement<L2>> for Chunk<T, S, M> {
    type Output = T;
    fn index(&self, e: DiscreteElement<L2>) -> &T {
        self.at(e)
    }
}

impl<T, S: Domain, M: MemorySpace, L2: DimList> IndexMut<DiscreteElement<L2>> for Chunk<T, S, M> {
    fn index_mut(&mut self, e: DiscreteElement<L2>) -> &mut T {
        self.at_mut(e)
    }
}

/// Convenience alias for the common host chunk.
pub type HostChunk<T, S> = Chunk<T, S, HostSpace>;

/// Allocates a default-filled host chunk over `support`.
pub fn host_chunk<T: Clone + Default, S: Domain>(support: S) -> Result<HostChunk<T, S>, AllocError> {
    Chunk::new(support, HostAllocator)
}
