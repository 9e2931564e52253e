//! End-to-end scenarios driving the whole stack: sampling init, registry,
//! chunks, slicing, ghosts and parallel kernels together.
//!
//! Every scenario declares its own dimension tags, so the process-wide
//! registry never sees the same tag twice even though the harness runs
//! tests concurrently. Each holds the scope guard for its whole body.

use dimgrid::*;

#[test]
fn uniform_mean_test() -> anyhow::Result<()> {
    continuous_dims!(X);
    discrete_dims!(GridX: uniform(X));

    let _scope = ScopeGuard::acquire();
    let (sampling, dom) =
        UniformSampling::init::<GridX>(Coordinate::new([0.0]), Coordinate::new([1.0]), 5);
    init_discrete_space::<GridX>(sampling);

    let values = Chunk::from_fn(dom, |ix| coordinate(&ix).value())?;
    let view = values.view();
    let sum = parallel_transform_reduce(ParallelHost, &dom, 0.0, reducer::Sum, |ix| view[ix]);
    assert!((sum - 2.5).abs() < 1e-12);
    assert!((sum / dom.size() as f64 - 0.5).abs() < 1e-12);
    Ok(())
}

#[test]
fn non_uniform_distances_test() {
    continuous_dims!(X);
    discrete_dims!(MeshX: non_uniform(X));

    let _scope = ScopeGuard::acquire();
    let (sampling, _dom) =
        NonUniformSampling::init::<MeshX>(vec![0.0, 0.1, 0.25, 0.6, 1.0]);
    init_discrete_space::<MeshX>(sampling);

    let ix = DiscreteElement::<(MeshX,)>::new([2]);
    assert_eq!(distance_at_left(ix).value(), 0.15);
    assert_eq!(distance_at_right(ix).value(), 0.35);
}

#[test]
fn reorder_access_test() {
    struct X;
    struct Y;

    let dom = DiscreteDomain::<(X, Y)>::new(
        DiscreteElement::new([0, 0]),
        DiscreteVector::new([3, 4]),
    );
    let c = Chunk::from_fn(dom, |e| e.uid::<X>() as f64 + 0.001 * e.uid::<Y>() as f64).unwrap();

    for e in &dom {
        let ix = e.select::<(X,)>();
        let iy = e.select::<(Y,)>();
        // tag-based indexing is order-independent
        assert_eq!(
            c[DiscreteElement::<(Y, X)>::compose((iy, ix))],
            c[DiscreteElement::<(X, Y)>::compose((ix, iy))]
        );
        assert_eq!(c[e.select::<(Y, X)>()], c[e]);
    }
}

#[test]
fn periodic_ghost_mirror_test() {
    continuous_dims!(X);
    discrete_dims!(GridX: periodic(X));

    let _scope = ScopeGuard::acquire();
    let (sampling, parts) = PeriodicSampling::init_ghosted::<GridX>(
        Coordinate::new([0.0]),
        Coordinate::new([1.0]),
        10,
        10,
        1,
        1,
    );
    init_discrete_space::<GridX>(sampling);

    let mut field = host_chunk::<f64, _>(parts.ghosted).unwrap();
    for ix in &parts.main {
        field[ix] = 10.0 + ix.uid::<GridX>() as f64;
    }
    // periodic boundary: ghost cells take the opposite-side interior values
    for (ghost, mirror) in parts.pre_ghost.iter().zip(parts.pre_mirror.iter()) {
        let v = field[mirror];
        field[ghost] = v;
    }
    for (ghost, mirror) in parts.post_ghost.iter().zip(parts.post_mirror.iter()) {
        let v = field[mirror];
        field[ghost] = v;
    }

    assert_eq!(field[parts.pre_ghost.front()], field[parts.main.back()]);
    assert_eq!(field[parts.post_ghost.front()], field[parts.main.front()]);
    // the ghosted coordinates wrap onto the main segment under the period
    let p = n_period::<GridX>();
    assert_eq!(
        coordinate(&parts.main.front()).value(),
        coordinate(&(parts.main.front() + DiscreteVector::new([p as i64]))).value()
    );
}

#[test]
fn slice_subdomain_test() {
    struct X;
    struct Y;

    let dom = DiscreteDomain::<(X, Y)>::new(
        DiscreteElement::new([100, 0]),
        DiscreteVector::new([101, 101]),
    );
    let parent = Chunk::from_fn(dom, |e| (e.uid::<X>() * 1000 + e.uid::<Y>()) as f64).unwrap();

    let sub_x = DiscreteDomain::<(X,)>::new(DiscreteElement::new([110]), DiscreteVector::new([41]));
    let window = parent.view().slice_domain(&sub_x);

    assert_eq!(window.domain().extent::<X>(), 41);
    assert_eq!(window.domain().extent::<Y>(), 101);
    for e in window.domain().iter() {
        assert_eq!(window[e], parent[e]);
    }
}

#[test]
fn cfl_reduction_test() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    continuous_dims!(X, Y);
    discrete_dims! {
        MeshX: non_uniform(X),
        MeshY: non_uniform(Y),
    }

    // deterministically perturbed tables, as a solver driver would build them
    fn perturbed_points(n: usize, a: f64, b: f64, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let dx = (b - a) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                let x = a + i as f64 * dx;
                if i == 0 || i == n - 1 {
                    x
                } else {
                    x + rng.gen_range(-0.1..0.1) * dx
                }
            })
            .collect()
    }

    let _scope = ScopeGuard::acquire();
    let (sx, dom_x) = NonUniformSampling::init::<MeshX>(perturbed_points(10, -1.0, 1.0, 7));
    let (sy, dom_y) = NonUniformSampling::init::<MeshY>(perturbed_points(100, -1.0, 1.0, 11));
    init_discrete_space::<MeshX>(sx);
    init_discrete_space::<MeshY>(sy);

    let interior = DiscreteDomain::<(MeshX, MeshY)>::cartesian((
        dom_x.remove(DiscreteVector::new([1]), DiscreteVector::new([1])),
        dom_y.remove(DiscreteVector::new([1]), DiscreteVector::new([1])),
    ));

    let invdx2 = |e: DiscreteElement<(MeshX, MeshY)>| {
        let ix = e.select::<(MeshX,)>();
        1.0 / (distance_at_left(ix).value() * distance_at_right(ix).value())
    };

    let par = parallel_transform_reduce(ParallelHost, &interior, f64::MIN, reducer::Max, invdx2);
    let ser = transform_reduce(&interior, f64::MIN, reducer::Max, invdx2);
    let again = parallel_transform_reduce(ParallelHost, &interior, f64::MIN, reducer::Max, invdx2);

    // max is insensitive to partitioning, so runs agree bit for bit
    assert_eq!(par, ser);
    assert_eq!(par, again);
    assert!(par > 0.0);
}
