//! Row-chunked workers with per-chunk fault isolation.
//!
//! Every kernel in this crate writes its output as disjoint runs of rows.
//! [`for_each_row_chunk`] hands each run to a worker as an exclusive
//! `&mut` slice, so no locking is involved. With the `parallel` feature the
//! chunks are distributed over the rayon pool, otherwise they run in order
//! on the calling thread.
//!
//! A panic inside one chunk is caught, logged and reported as a
//! [`ChunkFault`]. The remaining chunks still run and the call always
//! returns once every chunk has finished.

use crate::error::ImageError;
use log::error;
use std::panic::{self, AssertUnwindSafe};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rows per chunk used by the convolution and transform kernels.
pub const DEFAULT_CHUNK_ROWS: usize = 64;

/// A chunk whose worker panicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkFault {
    pub chunk: usize,
    pub start_row: usize,
    pub message: String,
}

/// Number of workers the current configuration can run at once.
pub fn available_workers() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads().max(1)
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Chunk height that gives every available worker roughly one chunk.
pub fn rows_per_worker(height: usize) -> usize {
    height.div_ceil(available_workers()).max(1)
}

/// Run `work(start_row, rows)` for every run of `chunk_rows` rows of `out`.
///
/// `row_len` is the number of elements per row. `rows` is the exclusive
/// output slice for rows `start_row..start_row + rows.len() / row_len`.
pub fn for_each_row_chunk<T, F>(
    out: &mut [T],
    row_len: usize,
    chunk_rows: usize,
    work: F,
) -> Vec<ChunkFault>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    if out.is_empty() || row_len == 0 {
        return Vec::new();
    }
    let chunk_rows = chunk_rows.max(1);
    let chunk_len = row_len.saturating_mul(chunk_rows);
    let run = |(idx, rows): (usize, &mut [T])| {
        let start_row = idx * chunk_rows;
        run_isolated(|| work(start_row, rows)).err().map(|message| {
            error!("worker for chunk {idx} (row {start_row}) panicked: {message}");
            ChunkFault {
                chunk: idx,
                start_row,
                message,
            }
        })
    };

    #[cfg(feature = "parallel")]
    let faults: Vec<ChunkFault> = out
        .par_chunks_mut(chunk_len)
        .enumerate()
        .filter_map(run)
        .collect();
    #[cfg(not(feature = "parallel"))]
    let faults: Vec<ChunkFault> = out.chunks_mut(chunk_len).enumerate().filter_map(run).collect();

    faults
}

/// [`for_each_row_chunk`] for whole-image kernels: any failed chunk turns
/// the call into [`ImageError::WorkerFault`] tagged with `stage`.
pub fn try_for_each_row_chunk<T, F>(
    stage: &'static str,
    out: &mut [T],
    row_len: usize,
    chunk_rows: usize,
    work: F,
) -> Result<(), ImageError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let faults = for_each_row_chunk(out, row_len, chunk_rows, work);
    if faults.is_empty() {
        Ok(())
    } else {
        Err(ImageError::WorkerFault {
            stage,
            chunks: faults.len(),
        })
    }
}

/// Map `work` over `items`, isolating a panic in one item from the others.
pub fn map_isolated<I, R, F>(items: &[I], work: F) -> Vec<Result<R, String>>
where
    I: Sync,
    R: Send,
    F: Fn(&I) -> R + Sync,
{
    let run = |item: &I| run_isolated(|| work(item));

    #[cfg(feature = "parallel")]
    {
        items.par_iter().map(run).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(run).collect()
    }
}

/// Run `f`, turning a panic into its message.
pub fn run_isolated<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic payload".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_cover_every_row_once() {
        let (w, h) = (3usize, 10usize);
        let mut out = vec![0usize; w * h];
        let faults = for_each_row_chunk(&mut out, w, 4, |start, rows| {
            for (i, row) in rows.chunks_mut(w).enumerate() {
                row.fill(start + i + 1);
            }
        });
        assert!(faults.is_empty());
        for y in 0..h {
            assert!(out[y * w..(y + 1) * w].iter().all(|&v| v == y + 1));
        }
    }

    #[test]
    fn panicking_chunk_does_not_stop_siblings() {
        let mut out = vec![0u8; 8 * 2];
        let faults = for_each_row_chunk(&mut out, 2, 2, |start, rows| {
            if start == 2 {
                panic!("boom at {start}");
            }
            rows.fill(1);
        });
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].chunk, 1);
        assert_eq!(faults[0].start_row, 2);
        assert!(faults[0].message.contains("boom"));
        assert!(out[..4].iter().all(|&v| v == 1));
        assert!(out[8..].iter().all(|&v| v == 1));
    }

    #[test]
    fn failed_chunks_become_worker_fault() {
        let mut out = vec![0u8; 6 * 3];
        let err = try_for_each_row_chunk("demo", &mut out, 3, 1, |start, rows| {
            if start % 2 == 1 {
                panic!("odd row {start}");
            }
            rows.fill(2);
        });
        assert_eq!(
            err,
            Err(ImageError::WorkerFault {
                stage: "demo",
                chunks: 3
            })
        );
        assert_eq!(try_for_each_row_chunk("demo", &mut out, 3, 2, |_, _| {}), Ok(()));
    }

    #[test]
    fn empty_output_runs_nothing() {
        let mut out: Vec<u8> = Vec::new();
        let faults = for_each_row_chunk(&mut out, 4, 64, |_, _| panic!("never called"));
        assert!(faults.is_empty());
    }

    #[test]
    fn map_isolated_keeps_item_order() {
        let items = [1u32, 2, 3, 4];
        let results = map_isolated(&items, |&v| {
            if v == 3 {
                panic!("three");
            }
            v * 10
        });
        assert_eq!(results[0], Ok(10));
        assert_eq!(results[1], Ok(20));
        assert!(results[2].is_err());
        assert_eq!(results[3], Ok(40));
    }
}
