//! Property checks on the dimension algebra and the sampling policies,
//! over randomised inputs.

use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};

use dimgrid_core::*;

struct X;
struct Y;
struct Z;

type Dom3 = DiscreteDomain<(X, Y, Z)>;
type Elem3 = DiscreteElement<(X, Y, Z)>;
type Vect3 = DiscreteVector<(X, Y, Z)>;

#[test]
fn iteration_visits_each_element_once_test() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let front = Elem3::new([
            rng.gen_range(0..5),
            rng.gen_range(0..5),
            rng.gen_range(0..5),
        ]);
        let extents = Vect3::new([
            rng.gen_range(0..6),
            rng.gen_range(0..6),
            rng.gen_range(0..6),
        ]);
        let dom = Dom3::new(front, extents);

        let mut seen = HashSet::new();
        let mut previous: Option<Elem3> = None;
        for e in &dom {
            assert!(dom.contains(&e));
            assert!(seen.insert(e), "element visited twice: {e:?}");
            if let Some(p) = previous {
                // declaration order: (x, y, z) tuples grow lexicographically
                assert!(
                    (p.uid::<X>(), p.uid::<Y>(), p.uid::<Z>())
                        < (e.uid::<X>(), e.uid::<Y>(), e.uid::<Z>())
                );
            }
            previous = Some(e);
        }
        assert_eq!(seen.len(), dom.size());
    }
}

#[test]
fn selection_is_idempotent_and_bijective_test() {
    let dom = Dom3::new(Elem3::new([1, 2, 3]), Vect3::new([3, 4, 2]));
    for e in &dom {
        let ey = e.select::<(Y,)>();
        assert_eq!(ey, ey.select::<(Y,)>());
    }

    // a reordering permutes the index set without loss
    let reordered = dom.select::<(Z, X, Y)>();
    assert_eq!(reordered.size(), dom.size());
    let straight: HashSet<Elem3> = dom.iter().collect();
    let back: HashSet<Elem3> = reordered.iter().map(|e| e.select::<(X, Y, Z)>()).collect();
    assert_eq!(straight, back);
}

#[test]
fn strided_iteration_matches_membership_test() {
    let dom = DiscreteDomain::<(X, Y)>::new(
        DiscreteElement::new([4, 0]),
        DiscreteVector::new([11, 7]),
    );
    let strided = dom.strided(DiscreteVector::new([3, 2]));
    assert_eq!(strided.size(), 4 * 4);
    let mut n = 0;
    for e in &strided {
        assert!(strided.contains(&e));
        assert!(dom.contains(&e));
        n += 1;
    }
    assert_eq!(n, strided.size());
    for e in &dom {
        let in_strided = (e.uid::<X>() - 4) % 3 == 0 && e.uid::<Y>() % 2 == 0;
        assert_eq!(strided.contains(&e), in_strided);
    }
}

#[test]
fn uniform_round_trip_property_test() {
    continuous_dims!(U);
    discrete_dims!(GridU: uniform(U));

    fn ulp(x: f64) -> f64 {
        f64::from_bits(x.abs().to_bits() + 1) - x.abs()
    }

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let a: f64 = rng.gen_range(-100.0..100.0);
        let b = a + rng.gen_range(1e-3..200.0);
        let n = rng.gen_range(2..300u64);
        let (sampling, dom) =
            UniformSampling::init::<GridU>(Coordinate::new([a]), Coordinate::new([b]), n);
        assert_eq!(dom.size(), n as usize);
        let tol = 4.0 * ulp(b - a);
        for i in 0..n {
            let expected = a + i as f64 * (b - a) / (n - 1) as f64;
            assert!(
                (sampling.coordinate(i) - expected).abs() <= tol,
                "coordinate {i} of [{a}, {b}] with {n} points drifted"
            );
        }
    }
}

#[test]
fn periodic_wrap_property_test() {
    continuous_dims!(U);
    discrete_dims!(GridU: periodic(U));

    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..50 {
        let a: f64 = rng.gen_range(-10.0..10.0);
        let b = a + rng.gen_range(0.1..20.0);
        let n = rng.gen_range(2..50u64);
        let p = rng.gen_range(2..40u64);
        let (sampling, _dom) = PeriodicSampling::init::<GridU>(
            Coordinate::new([a]),
            Coordinate::new([b]),
            n,
            p,
        );
        for i in 0..p {
            for k in 1..5u64 {
                assert_eq!(sampling.coordinate(i + k * p), sampling.coordinate(i));
            }
        }
    }
}

#[test]
fn non_uniform_neighbour_sums_test() {
    continuous_dims!(U);
    discrete_dims!(MeshU: non_uniform(U));

    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..20 {
        let n = rng.gen_range(3..60usize);
        let mut points: Vec<f64> = (0..n).map(|_| rng.gen_range(-50.0..50.0)).collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        points.dedup();
        if points.len() < 3 {
            continue;
        }
        let (sampling, _dom) = NonUniformSampling::init::<MeshU>(points.clone());
        for i in 1..points.len() - 1 {
            let sum = sampling.distance_at_left(i as u64) + sampling.distance_at_right(i as u64);
            let gap = points[i + 1] - points[i - 1];
            // the two-subtraction sum may reassociate one rounding step
            assert!((sum - gap).abs() <= 1e-12 * gap.abs().max(1.0));
        }
    }
}

#[test]
fn registry_backed_kernel_test() -> anyhow::Result<()> {
    continuous_dims!(U, V);
    discrete_dims! {
        GridU: uniform(U),
        GridV: uniform(V),
    }

    let _scope = ScopeGuard::acquire();
    let (su, dom_u) =
        UniformSampling::init::<GridU>(Coordinate::new([0.0]), Coordinate::new([1.0]), 9);
    let (sv, dom_v) =
        UniformSampling::init::<GridV>(Coordinate::new([-1.0]), Coordinate::new([1.0]), 5);
    init_discrete_space::<GridU>(su);
    init_discrete_space::<GridV>(sv);

    let dom = DiscreteDomain::<(GridU, GridV)>::cartesian((dom_u, dom_v));
    let total = parallel_transform_reduce(ParallelHost, &dom, 0.0, reducer::Sum, |e| {
        let c = coordinate(&e);
        c.get::<U>() + c.get::<V>()
    });
    // sum of u over the grid is 0.5 * 9 * 5; v sums to zero by symmetry
    assert!((total - 22.5).abs() < 1e-9);
    Ok(())
}
