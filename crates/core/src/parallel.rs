#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
const PARALLEL_THRESHOLD: usize = 1024;

/// Maps `input` to a new vector, fanning out over rayon for large inputs.
pub fn map_indexed<T, U, F>(input: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(usize, &T) -> U + Sync + Send,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        if input.len() >= PARALLEL_THRESHOLD {
            return input
                .par_iter()
                .enumerate()
                .map(|(idx, value)| f(idx, value))
                .collect();
        }
    }

    input
        .iter()
        .enumerate()
        .map(|(idx, value)| f(idx, value))
        .collect()
}

pub fn try_for_each_indexed<T, E, F>(input: &[T], f: F) -> Result<(), E>
where
    T: Sync,
    E: Send,
    F: Fn(usize, &T) -> Result<(), E> + Sync + Send,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        if input.len() >= PARALLEL_THRESHOLD {
            return input
                .par_iter()
                .enumerate()
                .try_for_each(|(idx, value)| f(idx, value));
        }
    }

    for (idx, value) in input.iter().enumerate() {
        f(idx, value)?;
    }
    Ok(())
}
