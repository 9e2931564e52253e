//! Execution spaces and domain iteration.
//!
//! An execution space provides parallel-for and parallel-reduce over an
//! integer range; domain iteration is mapped onto that range through the
//! row-major linearisation every [`Domain`] defines, so parallel and serial
//! traversals visit the same elements.
//!
//! Within one call invocations are unordered and may overlap; kernels must
//! be safe to run concurrently. Between two successive calls on the same
//! execution space the second observes all writes of the first (rayon joins
//! before returning). Kernel panics are fatal.

use core::ops::Add;

use rayon::prelude::*;

use crate::domain::Domain;
use crate::element::DiscreteElement;

/// An abstract provider of parallel-for/parallel-reduce primitives.
pub trait ExecutionSpace: Copy + Send + Sync + 'static {
    const NAME: &'static str;

    /// Invokes `f` once for every index in `0..n`.
    fn for_each_index<F>(self, n: usize, f: F)
    where
        F: Fn(usize) + Send + Sync;

    /// Folds `f(0..n)` with an associative, commutative reducer.
    fn reduce_index<T, R, F>(self, n: usize, identity: T, reducer: R, f: F) -> T
    where
        T: Clone + Send + Sync,
        R: Reducer<T>,
        F: Fn(usize) -> T + Send + Sync;
}

/// Runs everything on the calling thread, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl ExecutionSpace for Serial {
    const NAME: &'static str = "serial";

    fn for_each_index<F>(self, n: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        for k in 0..n {
            f(k);
        }
    }

    fn reduce_index<T, R, F>(self, n: usize, identity: T, reducer: R, f: F) -> T
    where
        T: Clone + Send + Sync,
        R: Reducer<T>,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..n).fold(identity, |acc, k| reducer.combine(acc, f(k)))
    }
}

/// Runs on the rayon thread pool; the pool size is rayon's configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelHost;

impl ExecutionSpace for ParallelHost {
    const NAME: &'static str = "parallel-host";

    fn for_each_index<F>(self, n: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        (0..n).into_par_iter().for_each(f);
    }

    fn reduce_index<T, R, F>(self, n: usize, identity: T, reducer: R, f: F) -> T
    where
        T: Clone + Send + Sync,
        R: Reducer<T>,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..n)
            .into_par_iter()
            .map(f)
            .reduce(|| identity.clone(), |a, b| reducer.combine(a, b))
    }
}

/// The execution space used when none is named.
pub type DefaultExecutionSpace = ParallelHost;

/// An associative, commutative binary operator. The runtime may partition
/// work arbitrarily, so results are deterministic in value only up to
/// floating point reassociation.
pub trait Reducer<T>: Copy + Send + Sync {
    fn combine(&self, a: T, b: T) -> T;
}

/// The provided reducers: sum, max, min.
pub mod reducer {
    use super::*;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Sum;

    impl<T: Add<Output = T> + Send> Reducer<T> for Sum {
        fn combine(&self, a: T, b: T) -> T {
            a + b
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Max;

    impl<T: PartialOrd + Send> Reducer<T> for Max {
        fn combine(&self, a: T, b: T) -> T {
            if b > a {
                b
            } else {
                a
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Min;

    impl<T: PartialOrd + Send> Reducer<T> for Min {
        fn combine(&self, a: T, b: T) -> T {
            if b < a {
                b
            } else {
                a
            }
        }
    }
}

/// Invokes `f` on every element of the domain, in iteration order.
pub fn for_each<D, F>(domain: &D, mut f: F)
where
    D: Domain,
    F: FnMut(DiscreteElement<D::Dims>),
{
    for e in domain.iter() {
        f(e);
    }
}

/// Invokes `f` exactly once per element of the domain on the given
/// execution space, in no particular order.
///
/// Captures must be accessible from that space; writes to the same location
/// from two invocations are a programming error.
pub fn parallel_for_each<E, D, F>(exec: E, domain: &D, f: F)
where
    E: ExecutionSpace,
    D: Domain + Sync,
    F: Fn(DiscreteElement<D::Dims>) + Send + Sync,
{
    exec.for_each_index(domain.size(), |k| f(domain.linear_element(k)));
}

/// Serial fold of `f` over the domain, combined with `reducer`.
pub fn transform_reduce<D, T, R, F>(domain: &D, identity: T, reducer: R, mut f: F) -> T
where
    D: Domain,
    R: Reducer<T>,
    F: FnMut(DiscreteElement<D::Dims>) -> T,
{
    domain
        .iter()
        .fold(identity, |acc, e| reducer.combine(acc, f(e)))
}

/// Parallel fold of `f` over the domain, combined with `reducer`.
pub fn parallel_transform_reduce<E, D, T, R, F>(
    exec: E,
    domain: &D,
    identity: T,
    reducer: R,
    f: F,
) -> T
where
    E: ExecutionSpace,
    D: Domain + Sync,
    T: Clone + Send + Sync,
    R: Reducer<T>,
    F: Fn(DiscreteElement<D::Dims>) -> T + Send + Sync,
{
    exec.reduce_index(domain.size(), identity, reducer, |k| {
        f(domain.linear_element(k))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::domain::DiscreteDomain;
    use crate::vector::DiscreteVector;

    struct X;
    struct Y;

    type DomXY = DiscreteDomain<(X, Y)>;
    type ElemXY = DiscreteElement<(X, Y)>;

    fn dom() -> DomXY {
        DomXY::new(ElemXY::new([0, 0]), DiscreteVector::new([7, 11]))
    }

    #[test]
    fn parallel_visits_each_once_test() {
        let d = dom();
        let hits: Vec<AtomicU64> = (0..d.size()).map(|_| AtomicU64::new(0)).collect();
        parallel_for_each(ParallelHost, &d, |e| {
            let k = e.uid::<X>() * 11 + e.uid::<Y>();
            hits[k as usize].fetch_add(1, Ordering::Relaxed);
        });
        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn reduce_matches_serial_fold_test() {
        let d = dom();
        let f = |e: ElemXY| (e.uid::<X>() * 3 + e.uid::<Y>()) as f64;
        let serial = transform_reduce(&d, 0.0, reducer::Sum, f);
        let parallel = parallel_transform_reduce(ParallelHost, &d, 0.0, reducer::Sum, f);
        let single = parallel_transform_reduce(Serial, &d, 0.0, reducer::Sum, f);
        assert_eq!(serial, parallel);
        assert_eq!(serial, single);
    }

    #[test]
    fn min_max_test() {
        let d = dom();
        let f = |e: ElemXY| e.uid::<X>() as i64 - e.uid::<Y>() as i64;
        assert_eq!(
            parallel_transform_reduce(ParallelHost, &d, i64::MIN, reducer::Max, f),
            6
        );
        assert_eq!(
            parallel_transform_reduce(ParallelHost, &d, i64::MAX, reducer::Min, f),
            -10
        );
    }

    #[test]
    fn serial_for_each_in_order_test() {
        let d = DomXY::new(ElemXY::new([0, 0]), DiscreteVector::new([2, 2]));
        let mut seen = Vec::new();
        for_each(&d, |e| seen.push((e.uid::<X>(), e.uid::<Y>())));
        assert_eq!(seen, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
