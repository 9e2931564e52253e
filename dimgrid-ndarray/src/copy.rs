//! Deep copies and host mirrors.

use ndarray::{IxDyn, Zip};

use dimgrid_core::list::DimList;
use dimgrid_core::{DiscreteDomain, Domain};

use crate::chunk::Chunk;
use crate::memory::{AllocError, HostAllocator, HostSpace, MemorySpace};
use crate::span::{ChunkSpan, ChunkSpanMut};

/// Axis permutation taking the source layout to the destination tag order.
/// Panics unless the two domains are congruent: same tag set, same front
/// and extent per tag, any order.
fn congruence_perm<LD: DimList, LS: DimList>(
    dst: &DiscreteDomain<LD>,
    src: &DiscreteDomain<LS>,
) -> Vec<usize> {
    assert_eq!(
        LD::RANK,
        LS::RANK,
        "deep copy between domains of rank {} and {}",
        LD::RANK,
        LS::RANK,
    );
    let dst_ids = LD::type_ids();
    let dst_names = LD::names();
    (0..LD::RANK)
        .map(|i| {
            let j = LS::index_of(dst_ids.as_ref()[i]).unwrap_or_else(|| {
                panic!(
                    "deep copy: source carries no dimension {}",
                    dst_names.as_ref()[i].rsplit("::").next().unwrap()
                )
            });
            assert!(
                dst.front().uids()[i] == src.front().uids()[j]
                    && dst.extents().values()[i] == src.extents().values()[j],
                "deep copy between non-congruent domains on dimension {}: {:?} vs {:?}",
                dst_names.as_ref()[i].rsplit("::").next().unwrap(),
                dst,
                src,
            );
            j
        })
        .collect()
}

fn note_staging<MD: MemorySpace, MS: MemorySpace>() {
    // On a build with a detached device memory the copy below would go
    // through a host mirror of the source; here every space is
    // host-reachable and the copy runs directly.
    if !MD::HOST_ACCESSIBLE || !MS::HOST_ACCESSIBLE {
        tracing::debug!(
            src = MS::NAME,
            dst = MD::NAME,
            "deep copy staged through a host mirror"
        );
    }
}

/// Copies `src` into `dst` value by value, iterating in the destination's
/// order for contiguity. The domains must be congruent.
pub fn deepcopy<T, LD, LS, MD, MS>(
    dst: &mut ChunkSpanMut<'_, T, DiscreteDomain<LD>, MD>,
    src: &ChunkSpan<'_, T, DiscreteDomain<LS>, MS>,
) where
    T: Clone,
    LD: DimList,
    LS: DimList,
    MD: MemorySpace,
    MS: MemorySpace,
{
    let perm = congruence_perm(dst.domain(), src.domain());
    note_staging::<MD, MS>();
    let aligned = src.data.clone().permuted_axes(IxDyn(&perm));
    Zip::from(&mut dst.data)
        .and(&aligned)
        .for_each(|d, s| *d = s.clone());
}

/// As [`deepcopy`], on the rayon pool.
pub fn parallel_deepcopy<T, LD, LS, MD, MS>(
    dst: &mut ChunkSpanMut<'_, T, DiscreteDomain<LD>, MD>,
    src: &ChunkSpan<'_, T, DiscreteDomain<LS>, MS>,
) where
    T: Clone + Send + Sync,
    LD: DimList,
    LS: DimList,
    MD: MemorySpace,
    MS: MemorySpace,
{
    let perm = congruence_perm(dst.domain(), src.domain());
    note_staging::<MD, MS>();
    let aligned = src.data.clone().permuted_axes(IxDyn(&perm));
    Zip::from(&mut dst.data)
        .and(&aligned)
        .par_for_each(|d, s| *d = s.clone());
}

/// A host-accessible chunk over the same domain as `src`, default-filled.
pub fn create_mirror<T, S, M>(
    src: &ChunkSpan<'_, T, S, M>,
) -> Result<Chunk<T, S, HostSpace>, AllocError>
where
    T: Clone + Default,
    S: Domain,
    M: MemorySpace,
{
    Chunk::new(src.domain().clone(), HostAllocator)
}

/// A host-accessible copy of `src` over the same domain.
pub fn create_mirror_and_copy<T, S, M>(
    src: &ChunkSpan<'_, T, S, M>,
) -> Result<Chunk<T, S, HostSpace>, AllocError>
where
    T: Clone + Default,
    S: Domain,
    M: MemorySpace,
{
    let mut mirror = create_mirror(src)?;
    mirror.data.assign(&src.data);
    Ok(mirror)
}
