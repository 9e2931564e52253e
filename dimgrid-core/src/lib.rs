//! Discrete computation on Cartesian products of sampled continuous axes.
//!
//! A continuous dimension is a named physical axis; a discrete dimension is
//! one sampling of such an axis. Every index, offset, domain and coordinate
//! in this crate is tagged by the dimensions it refers to, so algorithms
//! stay dimension-generic and cannot mix axes up.

/// dimension tags and the per-tag sampling binding
pub mod tag;

/// ordered lists of dimension tags and their per-tag storage
pub mod list;

/// tagged real-valued points on continuous dimensions
pub mod coordinate;

/// tagged indices into discrete dimensions
pub mod element;

/// tagged signed offsets between discrete elements
pub mod vector;

/// tagged index hyper-rectangles and their iteration
pub mod domain;

/// index <-> coordinate mappings: uniform, non-uniform, periodic
pub mod sampling;

/// process-wide tag -> sampling registry and dispatch helpers
pub mod space;

/// main domains flanked by ghost cells and their periodic mirrors
pub mod ghost;

/// execution spaces, domain iteration and reductions
pub mod exec;

pub use coordinate::Coordinate;
pub use domain::{DiscreteDomain, Domain, StridedDiscreteDomain};
pub use element::DiscreteElement;
pub use exec::{
    for_each, parallel_for_each, parallel_transform_reduce, reducer, transform_reduce,
    DefaultExecutionSpace, ExecutionSpace, ParallelHost, Reducer, Serial,
};
pub use ghost::{ghosted_domains, GhostedDomains};
pub use list::{DimList, DiscreteDimList};
pub use sampling::{
    EvenlySpaced, NonUniformSampling, PeriodicSampling, Periodicity, Sampling, SamplingKind,
    UniformSampling,
};
pub use space::{
    coordinate, discrete_space, distance_at_left, distance_at_right, init_discrete_space,
    n_period, origin, rlength, rmax, rmin, step, ScopeGuard,
};
pub use tag::{is_non_uniform, is_periodic, is_uniform, CDim, DDim};
pub use vector::DiscreteVector;

/// Shorthand aliases matching the names used throughout client code.
pub type Coord<L> = Coordinate<L>;
/// See [`DiscreteElement`].
pub type Elem<L> = DiscreteElement<L>;
/// See [`DiscreteVector`].
pub type Vect<L> = DiscreteVector<L>;
/// See [`DiscreteDomain`].
pub type Dom<L> = DiscreteDomain<L>;

/// The real type every continuous coordinate is expressed in.
pub type Real = f64;
