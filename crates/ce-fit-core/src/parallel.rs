//! Optional rayon parallelism.
//!
//! With the `parallel` feature the macros below hand work to rayon; without
//! it they expand to ordinary iterators. Every caller collects into an
//! ordered `Vec`, so results do not depend on the feature.

/// Iterate an owned range or collection, in parallel when `parallel` is on.
///
/// ```ignore
/// use crate::iter_maybe_parallel;
///
/// let squares: Vec<f64> = iter_maybe_parallel!(0..n)
///     .map(|j| (j as f64).powi(2))
///     .collect();
/// ```
#[macro_export]
macro_rules! iter_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelIterator;

            IntoParallelIterator::into_par_iter($expr)
        }
        #[cfg(not(feature = "parallel"))]
        {
            IntoIterator::into_iter($expr)
        }
    }};
}

/// Iterate a slice by reference, in parallel when `parallel` is on.
#[macro_export]
macro_rules! slice_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            $expr.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $expr.iter()
        }
    }};
}

pub use iter_maybe_parallel;
pub use slice_maybe_parallel;
