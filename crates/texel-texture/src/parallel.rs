use rayon::prelude::*;
use thiserror::Error;

/// Errors of the row scheduler.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The local thread pool could not be created.
    #[error("cannot create the thread pool: {0}")]
    BuildError(String),

    /// A local pool needs at least one thread.
    #[error("invalid thread count {0}: at least one thread is required")]
    InvalidThreadCount(usize),

    /// Rows must hold at least one element.
    #[error("invalid row length {0}: rows must not be empty")]
    InvalidRowStride(usize),
}

/// Controls how the independent rows of an output matrix are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// One task per row on the global Rayon pool.
    #[default]
    Parallel,

    /// Every row in order on the calling thread.
    ///
    /// Small label images rarely amortize the scheduling cost of the pool.
    Serial,

    /// One task per row on a dedicated pool of `n` threads.
    ///
    /// The pool is built and torn down on every call.
    Fixed(usize),
}

/// Fill the rows of `dst` by calling `op(row_index, row)` for every row.
///
/// Rows are disjoint chunks of `row_len` elements, so every task writes only to its own
/// row and the result does not depend on the strategy or on scheduling order. The first
/// error returned by `op` is propagated.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, `num_rows * row_len` elements in row-major order.
/// * `row_len` - The number of elements per row.
/// * `op` - The operation computing one row.
///
/// # Errors
///
/// Returns an error if `row_len` is zero, if the local thread pool cannot be built, or
/// if `op` fails.
pub fn fill_rows_with<T, E, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_len: usize,
    op: F,
) -> Result<(), E>
where
    T: Send,
    E: Send + From<ParallelError>,
    F: Fn(usize, &mut [T]) -> Result<(), E> + Sync + Send,
{
    if row_len == 0 {
        return Err(ParallelError::InvalidRowStride(row_len).into());
    }

    match strategy {
        ExecutionStrategy::Serial => dst
            .chunks_mut(row_len)
            .enumerate()
            .try_for_each(|(i, row)| op(i, row)),
        ExecutionStrategy::Parallel => dst
            .par_chunks_mut(row_len)
            .enumerate()
            .try_for_each(|(i, row)| op(i, row)),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_mut(row_len)
                    .enumerate()
                    .try_for_each(|(i, row)| op(i, row))
            })
        }
    }
}
