//! Discrete computation on Cartesian products of sampled continuous axes.
//!
//! Facade over the two member crates: the dimension algebra, sampling
//! policies and iteration live in `dimgrid-core`; chunk storage lives in
//! `dimgrid-ndarray`.
//!
//! ```
//! use dimgrid::*;
//!
//! continuous_dims!(X);
//! discrete_dims!(GridX: uniform(X));
//!
//! let _scope = ScopeGuard::acquire();
//! let (sampling, dom) =
//!     UniformSampling::init::<GridX>(Coordinate::new([0.0]), Coordinate::new([1.0]), 11);
//! init_discrete_space::<GridX>(sampling);
//!
//! let temperature = Chunk::from_fn(dom, |ix| coordinate(&ix).value().cos()).unwrap();
//! let total = transform_reduce(&dom, 0.0, reducer::Sum, |ix| temperature[ix]);
//! assert!(total <= dom.size() as f64);
//! ```

pub use dimgrid_core::*;
pub use dimgrid_ndarray::*;

pub use dimgrid_core::{continuous_dims, discrete_dims};
