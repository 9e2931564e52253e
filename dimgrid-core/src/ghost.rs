//! Main domains flanked by ghost cells.
//!
//! Ghost cells sit outside the main domain and carry boundary-condition
//! values. Under periodic conditions the caller copies the mirror slices
//! into the ghost slices: `pre_mirror -> pre_ghost` and
//! `post_mirror -> post_ghost`.

use crate::domain::DiscreteDomain;
use crate::tag::DDim;
use crate::vector::DiscreteVector;

/// A main domain, its ghost-extended cover and the four boundary slices.
pub struct GhostedDomains<D: DDim> {
    /// The main domain extended by the ghost cells on both sides.
    pub ghosted: DiscreteDomain<(D,)>,
    /// The interior.
    pub main: DiscreteDomain<(D,)>,
    /// The leading ghost cells.
    pub pre_ghost: DiscreteDomain<(D,)>,
    /// The trailing ghost cells.
    pub post_ghost: DiscreteDomain<(D,)>,
    /// The last interior indices, source of `pre_ghost` under periodic
    /// conditions.
    pub pre_mirror: DiscreteDomain<(D,)>,
    /// The first interior indices, source of `post_ghost`.
    pub post_mirror: DiscreteDomain<(D,)>,
}

/// Splits a ghost-extended cover around `main`, `gw_pre` cells before and
/// `gw_post` after.
///
/// The sampling bound to `D` must represent the extended indices: uniform
/// and periodic samplings extend algorithmically, a non-uniform sampling
/// needs the ghost coordinates in its table
/// (see [`crate::NonUniformSampling::init_ghosted`]).
pub fn ghosted_domains<D: DDim>(
    main: DiscreteDomain<(D,)>,
    gw_pre: u64,
    gw_post: u64,
) -> GhostedDomains<D> {
    let pre = DiscreteVector::new([gw_pre as i64]);
    let post = DiscreteVector::new([gw_post as i64]);
    let ghosted = DiscreteDomain::new(main.front() - pre, main.extents() + pre + post);
    GhostedDomains {
        ghosted,
        main,
        pre_ghost: ghosted.take_first(pre),
        post_ghost: ghosted.take_last(post),
        pre_mirror: main.take_last(pre),
        post_mirror: main.take_first(post),
    }
}

impl<D: DDim> Clone for GhostedDomains<D> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<D: DDim> Copy for GhostedDomains<D> {}

impl<D: DDim> core::fmt::Debug for GhostedDomains<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GhostedDomains")
            .field("ghosted", &self.ghosted)
            .field("main", &self.main)
            .field("pre_ghost", &self.pre_ghost)
            .field("post_ghost", &self.post_ghost)
            .field("pre_mirror", &self.pre_mirror)
            .field("post_mirror", &self.post_mirror)
            .finish()
    }
}
