//! Dimension tags.
//!
//! A tag is a zero-sized marker type. Continuous tags name physical axes,
//! discrete tags name one sampling of one continuous axis and statically
//! bind the sampling policy used for it.

use crate::sampling::{Sampling, SamplingKind};

/// Marker for a continuous dimension (a named physical axis).
pub trait CDim: 'static {}

/// Marker for a discrete dimension: one sampling of exactly one [`CDim`].
///
/// Several discrete dimensions may sample the same continuous dimension.
/// The bound on `Sampling` ties the policy variant to the tag at compile
/// time, so dispatch through the tag monomorphises.
pub trait DDim: 'static {
    /// The continuous dimension this tag samples.
    type Continuous: CDim;
    /// The sampling policy bound to this tag.
    type Sampling: Sampling<Continuous = Self::Continuous>;
}

/// Whether `D` is bound to a uniform sampling.
pub const fn is_uniform<D: DDim>() -> bool {
    matches!(D::Sampling::KIND, SamplingKind::Uniform)
}

/// Whether `D` is bound to a non-uniform sampling.
pub const fn is_non_uniform<D: DDim>() -> bool {
    matches!(D::Sampling::KIND, SamplingKind::NonUniform)
}

/// Whether `D` is bound to a periodic sampling.
pub const fn is_periodic<D: DDim>() -> bool {
    matches!(D::Sampling::KIND, SamplingKind::Periodic)
}

/// Declares continuous dimension tags.
///
/// ```
/// dimgrid_core::continuous_dims!(X, Y);
/// ```
#[macro_export]
macro_rules! continuous_dims {
    ( $( $(#[$meta:meta])* $name:ident ),* $(,)? ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name;
            impl $crate::tag::CDim for $name {}
        )*
    };
}

/// Declares discrete dimension tags bound to a sampling policy.
///
/// ```
/// dimgrid_core::continuous_dims!(X, T);
/// dimgrid_core::discrete_dims! {
///     GridX: uniform(X),
///     GridT: periodic(T),
/// }
/// ```
#[macro_export]
macro_rules! discrete_dims {
    () => {};
    ( $(#[$meta:meta])* $name:ident : uniform($c:ty) $(, $($rest:tt)* )? ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;
        impl $crate::tag::DDim for $name {
            type Continuous = $c;
            type Sampling = $crate::sampling::UniformSampling<$c>;
        }
        $( $crate::discrete_dims!($($rest)*); )?
    };
    ( $(#[$meta:meta])* $name:ident : non_uniform($c:ty) $(, $($rest:tt)* )? ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;
        impl $crate::tag::DDim for $name {
            type Continuous = $c;
            type Sampling = $crate::sampling::NonUniformSampling<$c>;
        }
        $( $crate::discrete_dims!($($rest)*); )?
    };
    ( $(#[$meta:meta])* $name:ident : periodic($c:ty) $(, $($rest:tt)* )? ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;
        impl $crate::tag::DDim for $name {
            type Continuous = $c;
            type Sampling = $crate::sampling::PeriodicSampling<$c>;
        }
        $( $crate::discrete_dims!($($rest)*); )?
    };
}
