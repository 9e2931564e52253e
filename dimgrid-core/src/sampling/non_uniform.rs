//! Sampling of a continuous dimension through an explicit break table.

use core::marker::PhantomData;

use crate::domain::DiscreteDomain;
use crate::element::DiscreteElement;
use crate::ghost::{ghosted_domains, GhostedDomains};
use crate::sampling::{Sampling, SamplingKind};
use crate::tag::{CDim, DDim};
use crate::vector::DiscreteVector;

/// `coordinate(uid) = points[uid]`, with `points` strictly increasing.
///
/// The table is stored verbatim, so the positions it lists are represented
/// exactly.
pub struct NonUniformSampling<C: CDim + Send + Sync> {
    points: Vec<f64>,
    _dim: PhantomData<C>,
}

impl<C: CDim + Send + Sync> NonUniformSampling<C> {
    /// Builds a sampling from a break table.
    /// Panics unless the table holds at least two strictly increasing
    /// finite values.
    pub fn new(points: Vec<f64>) -> Self {
        assert!(
            points.len() >= 2,
            "a break table needs at least two points, got {}",
            points.len()
        );
        for (i, w) in points.windows(2).enumerate() {
            assert!(
                w[0].is_finite() && w[1].is_finite() && w[0] < w[1],
                "break table is not strictly increasing at position {}: {} then {}",
                i,
                w[0],
                w[1]
            );
        }
        Self {
            points,
            _dim: PhantomData,
        }
    }

    /// Builds the sampling and its domain, one index per table entry.
    pub fn init<D>(points: Vec<f64>) -> (Self, DiscreteDomain<(D,)>)
    where
        D: DDim<Continuous = C, Sampling = Self>,
    {
        let sampling = Self::new(points);
        let domain = DiscreteDomain::new(
            DiscreteElement::new([sampling.front()]),
            DiscreteVector::new([sampling.len() as i64]),
        );
        (sampling, domain)
    }

    /// Builds a ghosted sampling from three tables: ghost points before the
    /// main segment, the main segment itself and ghost points after it.
    /// Monotonicity is verified across the two joins.
    pub fn init_ghosted<D>(
        pre: Vec<f64>,
        main: Vec<f64>,
        post: Vec<f64>,
    ) -> (Self, GhostedDomains<D>)
    where
        D: DDim<Continuous = C, Sampling = Self>,
    {
        assert!(
            main.len() >= 2,
            "the main segment needs at least two points, got {}",
            main.len()
        );
        let gw_pre = pre.len() as u64;
        let gw_post = post.len() as u64;
        let n_main = main.len() as i64;
        let mut points = pre;
        points.extend(main);
        points.extend(post);
        let sampling = Self::new(points);
        let main_domain = DiscreteDomain::new(
            DiscreteElement::new([gw_pre]),
            DiscreteVector::new([n_main]),
        );
        (sampling, ghosted_domains(main_domain, gw_pre, gw_post))
    }

    /// Number of points in the table.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A break table is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The table itself.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    fn point(&self, uid: u64) -> f64 {
        *self.points.get(uid as usize).unwrap_or_else(|| {
            panic!(
                "index {} is outside the break table of {} points",
                uid,
                self.points.len()
            )
        })
    }
}

impl<C: CDim + Send + Sync> Sampling for NonUniformSampling<C> {
    type Continuous = C;
    const KIND: SamplingKind = SamplingKind::NonUniform;

    fn coordinate(&self, uid: u64) -> f64 {
        self.point(uid)
    }

    fn distance_at_left(&self, uid: u64) -> f64 {
        assert!(
            uid > 0,
            "left neighbour distance requested at the sampling front"
        );
        self.point(uid) - self.point(uid - 1)
    }

    fn distance_at_right(&self, uid: u64) -> f64 {
        assert!(
            (uid as usize) < self.points.len() - 1,
            "right neighbour distance requested at the sampling back"
        );
        self.point(uid + 1) - self.point(uid)
    }
}

impl<C: CDim + Send + Sync> Clone for NonUniformSampling<C> {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            _dim: PhantomData,
        }
    }
}

impl<C: CDim + Send + Sync> core::fmt::Display for NonUniformSampling<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "NonUniformSampling( [{}, {}], {} points )",
            self.points[0],
            self.points[self.points.len() - 1],
            self.points.len()
        )
    }
}

impl<C: CDim + Send + Sync> core::fmt::Debug for NonUniformSampling<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuous_dims;
    use crate::domain::Domain;

    continuous_dims!(X);
    crate::discrete_dims!(MeshX: non_uniform(X));

    #[test]
    fn table_is_exact_test() {
        let points = vec![0.0, 0.1, 0.25, 0.6, 1.0];
        let (sampling, dom) = NonUniformSampling::init::<MeshX>(points.clone());
        assert_eq!(dom.size(), 5);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(sampling.coordinate(i as u64), *p);
        }
    }

    #[test]
    fn neighbour_distances_test() {
        let (sampling, _) =
            NonUniformSampling::init::<MeshX>(vec![0.0, 0.1, 0.25, 0.6, 1.0]);
        assert_eq!(sampling.distance_at_left(2), 0.15);
        assert_eq!(sampling.distance_at_right(2), 0.35);
        // interior sum equals the two-neighbour gap exactly
        for i in 1..4u64 {
            assert_eq!(
                sampling.distance_at_left(i) + sampling.distance_at_right(i),
                sampling.coordinate(i + 1) - sampling.coordinate(i - 1)
            );
        }
    }

    #[test]
    #[should_panic(expected = "at the sampling front")]
    fn left_edge_distance_test() {
        let (sampling, _) = NonUniformSampling::init::<MeshX>(vec![0.0, 1.0]);
        let _ = sampling.distance_at_left(0);
    }

    #[test]
    #[should_panic(expected = "at the sampling back")]
    fn right_edge_distance_test() {
        let (sampling, _) = NonUniformSampling::init::<MeshX>(vec![0.0, 1.0]);
        let _ = sampling.distance_at_right(1);
    }

    #[test]
    #[should_panic(expected = "not strictly increasing")]
    fn unsorted_table_test() {
        let _ = NonUniformSampling::<X>::new(vec![0.0, 0.2, 0.2, 1.0]);
    }

    #[test]
    fn ghosted_joins_checked_test() {
        let (sampling, parts) = NonUniformSampling::init_ghosted::<MeshX>(
            vec![-0.3, -0.1],
            vec![0.0, 0.5, 1.0],
            vec![1.2],
        );
        assert_eq!(sampling.len(), 6);
        assert_eq!(parts.main.front().uid::<MeshX>(), 2);
        assert_eq!(parts.ghosted.size(), 6);
        assert_eq!(parts.pre_ghost.size(), 2);
        assert_eq!(parts.post_ghost.size(), 1);
        assert_eq!(sampling.coordinate(2), 0.0);
    }

    #[test]
    #[should_panic(expected = "not strictly increasing")]
    fn ghosted_bad_join_test() {
        let _ = NonUniformSampling::init_ghosted::<MeshX>(
            vec![0.1],
            vec![0.0, 0.5, 1.0],
            vec![],
        );
    }
}
