//! Evenly spaced sampling with modular wrap-around.

use crate::coordinate::Coordinate;
use crate::domain::DiscreteDomain;
use crate::element::DiscreteElement;
use crate::ghost::{ghosted_domains, GhostedDomains};
use crate::sampling::{EvenlySpaced, Periodicity, Sampling, SamplingKind};
use crate::tag::{CDim, DDim};
use crate::vector::DiscreteVector;

/// Uniform spacing folded onto the principal interval centred on the
/// origin: indices `n_period` apart land on the same coordinate.
pub struct PeriodicSampling<C: CDim> {
    origin: Coordinate<(C,)>,
    step: f64,
    n_period: u64,
}

impl<C: CDim> PeriodicSampling<C> {
    /// Panics unless `step` is finite and positive and `n_period >= 2`.
    pub fn new(origin: Coordinate<(C,)>, step: f64, n_period: u64) -> Self {
        assert!(
            step.is_finite() && step > 0.0,
            "periodic sampling needs a finite positive step, got {step}"
        );
        assert!(
            n_period >= 2,
            "a period needs at least two steps, got {n_period}"
        );
        Self {
            origin,
            step,
            n_period,
        }
    }

    /// Maps `n` evenly spaced points onto `[a, b]` with wrap-around every
    /// `n_period` indices, and returns the sampling with its domain.
    pub fn init<D>(
        a: Coordinate<(C,)>,
        b: Coordinate<(C,)>,
        n: u64,
        n_period: u64,
    ) -> (Self, DiscreteDomain<(D,)>)
    where
        D: DDim<Continuous = C, Sampling = Self>,
    {
        assert!(a < b, "segment bounds must satisfy a < b");
        assert!(n >= 2, "a segment needs at least two points, got {n}");
        let step = (b.value() - a.value()) / (n - 1) as f64;
        let sampling = Self::new(a, step, n_period);
        let domain = DiscreteDomain::new(
            DiscreteElement::new([sampling.front()]),
            DiscreteVector::new([n as i64]),
        );
        (sampling, domain)
    }

    /// As [`init`], with ghost points on both sides of the segment.
    ///
    /// [`init`]: PeriodicSampling::init
    pub fn init_ghosted<D>(
        a: Coordinate<(C,)>,
        b: Coordinate<(C,)>,
        n: u64,
        n_period: u64,
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
        let sampling = Self::new(origin, step, n_period);
        let main = DiscreteDomain::new(
            DiscreteElement::new([gw_pre]),
            DiscreteVector::new([n as i64]),
        );
        (sampling, ghosted_domains(main, gw_pre, gw_post))
    }
}

impl<C: CDim> Sampling for PeriodicSampling<C> {
    type Continuous = C;
    const KIND: SamplingKind = SamplingKind::Periodic;

    fn coordinate(&self, uid: u64) -> f64 {
        let half = self.n_period / 2;
        let wrapped = ((uid + half) % self.n_period) as i64 - half as i64;
        self.origin.value() + wrapped as f64 * self.step
    }

    fn distance_at_left(&self, _uid: u64) -> f64 {
        self.step
    }

    fn distance_at_right(&self, _uid: u64) -> f64 {
        self.step
    }
}

impl<C: CDim> EvenlySpaced for PeriodicSampling<C> {
    fn origin(&self) -> f64 {
        self.origin.value()
    }

    fn step(&self) -> f64 {
        self.step
    }
}

impl<C: CDim> Periodicity for PeriodicSampling<C> {
    fn n_period(&self) -> u64 {
        self.n_period
    }
}

impl<C: CDim> Clone for PeriodicSampling<C> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            step: self.step,
            n_period: self.n_period,
        }
    }
}

impl<C: CDim> core::fmt::Display for PeriodicSampling<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "PeriodicSampling( origin={}, step={}, n_period={} )",
            self.origin.value(),
            self.step,
            self.n_period
        )
    }
}

impl<C: CDim> core::fmt::Debug for PeriodicSampling<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}
