//! Evenly spaced sampling of a continuous dimension.

use crate::coordinate::Coordinate;
use crate::domain::DiscreteDomain;
use crate::element::DiscreteElement;
use crate::ghost::{ghosted_domains, GhostedDomains};
use crate::sampling::{EvenlySpaced, Sampling, SamplingKind};
use crate::tag::{CDim, DDim};
use crate::vector::DiscreteVector;

/// `coordinate(uid) = origin + uid * step`.
///
/// There is no guarantee that the segment bounds passed to [`init`] are
/// exactly represented; expect usual floating point rounding at the
/// endpoints. Clients needing exact endpoints should supply them through a
/// [`crate::NonUniformSampling`] instead.
///
/// [`init`]: UniformSampling::init
pub struct UniformSampling<C: CDim> {
    origin: Coordinate<(C,)>,
    step: f64,
}

impl<C: CDim> UniformSampling<C> {
    /// Builds a sampling from the coordinate of index 0 and the spacing.
    /// Panics unless `step` is finite and positive.
    pub fn new(origin: Coordinate<(C,)>, step: f64) -> Self {
        assert!(
            step.is_finite() && step > 0.0,
            "uniform sampling needs a finite positive step, got {step}"
        );
        Self { origin, step }
    }

    /// Maps `n` evenly spaced points onto the segment `[a, b]`, both bounds
    /// included, and returns the sampling together with its domain.
    /// Panics unless `a < b` and `n >= 2`.
    pub fn init<D>(
        a: Coordinate<(C,)>,
        b: Coordinate<(C,)>,
        n: u64,
    ) -> (Self, DiscreteDomain<(D,)>)
    where
        D: DDim<Continuous = C, Sampling = Self>,
    {
        assert!(a < b, "segment bounds must satisfy a < b");
        assert!(n >= 2, "a segment needs at least two points, got {n}");
        let step = (b.value() - a.value()) / (n - 1) as f64;
        let sampling = Self::new(a, step);
        let domain = DiscreteDomain::new(
            DiscreteElement::new([sampling.front()]),
            DiscreteVector::new([n as i64]),
        );
        (sampling, domain)
    }

    /// As [`init`], with `gw_pre` ghost points before the segment and
    /// `gw_post` after it, all on the same spacing.
    ///
    /// [`init`]: UniformSampling::init
    pub fn init_ghosted<D>(
        a: Coordinate<(C,)>,
        b: Coordinate<(C,)>,
        n: u64,
        gw_pre: u64,
        gw_post: u64,
    ) -> (Self, GhostedDomains<D>)
    where
        D: DDim<Continuous = C, Sampling = Self>,
    {
        assert!(a < b, "segment bounds must satisfy a < b");
        assert!(n >= 2, "a segment needs at least two points, got {n}");
        let step = (b.value() - a.value()) / (n - 1) as f64;
        let origin = Coordinate::new([a.value() - gw_pre as f64 * step]);
        let sampling = Self::new(origin, step);
        let main = DiscreteDomain::new(
            DiscreteElement::new([gw_pre]),
            DiscreteVector::new([n as i64]),
        );
        (sampling, ghosted_domains(main, gw_pre, gw_post))
    }
}

impl<C: CDim> Sampling for UniformSampling<C> {
    type Continuous = C;
    const KIND: SamplingKind = SamplingKind::Uniform;

    fn coordinate(&self, uid: u64) -> f64 {
        self.origin.value() + uid as f64 * self.step
    }

    fn distance_at_left(&self, _uid: u64) -> f64 {
        self.step
    }

    fn distance_at_right(&self, _uid: u64) -> f64 {
        self.step
    }
}

impl<C: CDim> EvenlySpaced for UniformSampling<C> {
    fn origin(&self) -> f64 {
        self.origin.value()
    }

    fn step(&self) -> f64 {
        self.step
    }
}

impl<C: CDim> Clone for UniformSampling<C> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            step: self.step,
        }
    }
}

impl<C: CDim> core::fmt::Display for UniformSampling<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "UniformSampling( origin={}, step={} )",
            self.origin.value(),
            self.step
        )
    }
}

impl<C: CDim> core::fmt::Debug for UniformSampling<C> {
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
    crate::discrete_dims!(GridX: uniform(X));

    fn ulp(x: f64) -> f64 {
        let next = f64::from_bits(x.abs().to_bits() + 1);
        next - x.abs()
    }

    #[test]
    fn coordinate_round_trip_test() {
        for &(a, b, n) in &[(0.0, 1.0, 5u64), (-1.0, 1.0, 10), (2.5, 7.25, 101)] {
            let (sampling, dom) = UniformSampling::init::<GridX>(
                Coordinate::new([a]),
                Coordinate::new([b]),
                n,
            );
            assert_eq!(dom.size(), n as usize);
            let tol = 4.0 * ulp(b - a);
            for i in 0..n {
                let expected = a + i as f64 * (b - a) / (n - 1) as f64;
                assert!((sampling.coordinate(i) - expected).abs() <= tol);
            }
            assert!((sampling.coordinate(0) - a).abs() <= tol);
        }
    }

    #[test]
    fn distances_are_step_test() {
        let (sampling, _) =
            UniformSampling::init::<GridX>(Coordinate::new([0.0]), Coordinate::new([1.0]), 5);
        assert_eq!(sampling.step(), 0.25);
        assert_eq!(sampling.distance_at_left(3), 0.25);
        assert_eq!(sampling.distance_at_right(3), 0.25);
    }

    #[test]
    fn ghosted_shifts_origin_test() {
        let (sampling, parts) = UniformSampling::init_ghosted::<GridX>(
            Coordinate::new([0.0]),
            Coordinate::new([1.0]),
            5,
            2,
            1,
        );
        assert_eq!(parts.ghosted.size(), 8);
        assert_eq!(parts.main.front().uid::<GridX>(), 2);
        // index gw_pre still lands on a
        assert_eq!(sampling.coordinate(2), 0.0);
        assert_eq!(sampling.coordinate(0), -0.5);
    }

    #[test]
    #[should_panic(expected = "at least two points")]
    fn degenerate_segment_test() {
        let _ = UniformSampling::init::<GridX>(Coordinate::new([0.0]), Coordinate::new([1.0]), 1);
    }
}
