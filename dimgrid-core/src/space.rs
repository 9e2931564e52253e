//! The process-wide discrete-space registry.
//!
//! Each discrete dimension tag is initialised with its sampling exactly
//! once; lookups dispatch on the tag. The registry lives for as long as at
//! least one [`ScopeGuard`] is held and is cleared when the last guard
//! drops. Initialisation is meant to happen before any parallel work; the
//! registry does not serialise concurrent `init` calls to the same tag
//! beyond rejecting the second one.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use crate::coordinate::Coordinate;
use crate::domain::DiscreteDomain;
use crate::element::DiscreteElement;
use crate::list::{short_name, DiscreteDimList};
use crate::sampling::{EvenlySpaced, Periodicity, Sampling};
use crate::tag::DDim;

struct Entry {
    name: &'static str,
    sampling: Arc<dyn Any + Send + Sync>,
}

fn registry() -> &'static RwLock<HashMap<TypeId, Entry>> {
    static REGISTRY: OnceLock<RwLock<HashMap<TypeId, Entry>>> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

static LIVE_SCOPES: AtomicUsize = AtomicUsize::new(0);

/// Brackets the lifetime of every discrete space.
///
/// Acquire one before initialising any discrete dimension and keep it alive
/// for as long as samplings are used; nested acquisition is idempotent.
/// Dropping the last guard clears the registry.
pub struct ScopeGuard {
    _priv: (),
}

impl ScopeGuard {
    pub fn acquire() -> Self {
        let before = LIVE_SCOPES.fetch_add(1, Ordering::SeqCst);
        if before == 0 {
            tracing::debug!("discrete-space scope opened");
        }
        Self { _priv: () }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if LIVE_SCOPES.fetch_sub(1, Ordering::SeqCst) == 1 {
            let n = {
                let mut map = write_registry();
                let n = map.len();
                map.clear();
                n
            };
            tracing::debug!(released = n, "discrete-space scope closed");
        }
    }
}

// A poisoned lock only means some unrelated thread panicked mid-access; the
// map itself is always consistent, so recover the guard.
fn read_registry() -> std::sync::RwLockReadGuard<'static, HashMap<TypeId, Entry>> {
    registry()
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_registry() -> std::sync::RwLockWriteGuard<'static, HashMap<TypeId, Entry>> {
    registry()
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Binds `sampling` to the tag `D`, process-wide.
///
/// Panics when called outside a [`ScopeGuard`] scope or when `D` is
/// already initialised.
pub fn init_discrete_space<D: DDim>(sampling: D::Sampling) {
    assert!(
        LIVE_SCOPES.load(Ordering::SeqCst) > 0,
        "discrete space initialised outside of a ScopeGuard scope"
    );
    let name = short_name(std::any::type_name::<D>());
    let inserted = {
        let mut map = write_registry();
        match map.entry(TypeId::of::<D>()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(v) => {
                v.insert(Entry {
                    name,
                    sampling: Arc::new(sampling),
                });
                true
            }
        }
    };
    // panic outside the lock scope
    assert!(inserted, "discrete space for {name} initialised twice");
    tracing::debug!(dimension = name, "discrete space initialised");
}

/// The sampling bound to `D`. Panics when `D` was never initialised.
pub fn discrete_space<D: DDim>() -> Arc<D::Sampling> {
    let map = read_registry();
    let entry = map.get(&TypeId::of::<D>()).unwrap_or_else(|| {
        panic!(
            "no discrete space initialised for {}",
            short_name(std::any::type_name::<D>())
        )
    });
    entry
        .sampling
        .clone()
        .downcast::<D::Sampling>()
        .unwrap_or_else(|_| panic!("sampling type mismatch for {}", entry.name))
}

pub(crate) fn coordinate_of<D: DDim>(uid: u64) -> f64 {
    discrete_space::<D>().coordinate(uid)
}

/// Position of a discrete element on its continuous axes.
pub fn coordinate<L: DiscreteDimList>(e: &DiscreteElement<L>) -> Coordinate<L::Continuous> {
    Coordinate::new(L::coordinates(e.uids()))
}

/// Distance between `e` and its neighbour at `uid - 1`.
pub fn distance_at_left<D: DDim>(e: DiscreteElement<(D,)>) -> Coordinate<(D::Continuous,)> {
    Coordinate::new([discrete_space::<D>().distance_at_left(e.uid::<D>())])
}

/// Distance between `e` and its neighbour at `uid + 1`.
pub fn distance_at_right<D: DDim>(e: DiscreteElement<(D,)>) -> Coordinate<(D::Continuous,)> {
    Coordinate::new([discrete_space::<D>().distance_at_right(e.uid::<D>())])
}

/// Spacing of the evenly spaced sampling bound to `D`.
pub fn step<D: DDim>() -> f64
where
    D::Sampling: EvenlySpaced,
{
    discrete_space::<D>().step()
}

/// Position of index 0 of the evenly spaced sampling bound to `D`.
pub fn origin<D: DDim>() -> Coordinate<(D::Continuous,)>
where
    D::Sampling: EvenlySpaced,
{
    Coordinate::new([discrete_space::<D>().origin()])
}

/// Period, in indices, of the periodic sampling bound to `D`.
pub fn n_period<D: DDim>() -> u64
where
    D::Sampling: Periodicity,
{
    discrete_space::<D>().n_period()
}

/// Coordinate of the first element of a one-dimensional domain.
pub fn rmin<D: DDim>(d: &DiscreteDomain<(D,)>) -> Coordinate<(D::Continuous,)> {
    coordinate(&d.front())
}

/// Coordinate of the last element of a one-dimensional domain.
pub fn rmax<D: DDim>(d: &DiscreteDomain<(D,)>) -> Coordinate<(D::Continuous,)> {
    coordinate(&d.back())
}

/// Length of the segment covered by a one-dimensional domain.
pub fn rlength<D: DDim>(d: &DiscreteDomain<(D,)>) -> Coordinate<(D::Continuous,)> {
    rmax(d) - rmin(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{NonUniformSampling, PeriodicSampling, UniformSampling};

    crate::continuous_dims!(X, Y, T);

    #[test]
    fn dispatch_through_registry_test() {
        crate::discrete_dims! {
            GridX: uniform(X),
            MeshY: non_uniform(Y),
            GridT: periodic(T),
        }

        let _scope = ScopeGuard::acquire();

        let (sx, dom_x) =
            UniformSampling::init::<GridX>(Coordinate::new([0.0]), Coordinate::new([1.0]), 5);
        let (sy, _dom_y) = NonUniformSampling::init::<MeshY>(vec![0.0, 0.1, 0.25, 0.6, 1.0]);
        let (st, _dom_t) = PeriodicSampling::init::<GridT>(
            Coordinate::new([0.0]),
            Coordinate::new([1.0]),
            5,
            8,
        );
        init_discrete_space::<GridX>(sx);
        init_discrete_space::<MeshY>(sy);
        init_discrete_space::<GridT>(st);

        assert_eq!(step::<GridX>(), 0.25);
        assert_eq!(origin::<GridX>().value(), 0.0);
        assert_eq!(n_period::<GridT>(), 8);

        let e = DiscreteElement::<(GridX, MeshY)>::new([2, 3]);
        let c = coordinate(&e);
        assert_eq!(c.get::<X>(), 0.5);
        assert_eq!(c.get::<Y>(), 0.6);

        assert_eq!(distance_at_left(e.select::<(MeshY,)>()).value(), 0.35);
        assert_eq!(distance_at_right(e.select::<(MeshY,)>()).value(), 0.4);

        assert_eq!(rmin(&dom_x).value(), 0.0);
        assert_eq!(rmax(&dom_x).value(), 1.0);
        assert_eq!(rlength(&dom_x).value(), 1.0);
    }

    #[test]
    #[should_panic(expected = "initialised twice")]
    fn double_init_test() {
        crate::discrete_dims!(GridX2: uniform(X));
        let _scope = ScopeGuard::acquire();
        let (s, _) =
            UniformSampling::init::<GridX2>(Coordinate::new([0.0]), Coordinate::new([1.0]), 3);
        init_discrete_space::<GridX2>(s.clone());
        init_discrete_space::<GridX2>(s);
    }

    #[test]
    #[should_panic(expected = "no discrete space initialised")]
    fn missing_init_test() {
        crate::discrete_dims!(GridX3: uniform(X));
        let _scope = ScopeGuard::acquire();
        let _ = discrete_space::<GridX3>();
    }

    #[test]
    fn nested_scopes_are_idempotent_test() {
        crate::discrete_dims!(GridX5: uniform(X));
        let _outer = ScopeGuard::acquire();
        {
            let _inner = ScopeGuard::acquire();
            let (s, _) = UniformSampling::init::<GridX5>(
                Coordinate::new([0.0]),
                Coordinate::new([1.0]),
                3,
            );
            init_discrete_space::<GridX5>(s);
        }
        // inner guard dropped, outer still keeps the registry alive
        assert_eq!(step::<GridX5>(), 0.5);
    }
}
