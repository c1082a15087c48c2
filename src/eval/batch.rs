//! Frame-range evaluation for render coordinators.

use anyhow::Context as _;
use rayon::prelude::*;

use crate::composition::timeline::Timeline;
use crate::eval::evaluator::{Evaluator, FrameState};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{TimelineError, TimelineResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// How [`eval_range`] spreads work.
pub struct EvalOpts {
    /// Evaluate chunks on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames per parallel chunk. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for EvalOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// One-time readiness barrier, passed before the first frame is evaluated.
///
/// Implemented by whatever loads external media; the timeline itself never blocks.
pub trait ResourceGate {
    /// Block until every resource is available.
    fn wait_ready(&self) -> anyhow::Result<()>;
}

/// Split `range` into at most `parts` contiguous, non-empty, near-equal chunks, in order.
pub fn partition_frames(range: FrameRange, parts: usize) -> Vec<FrameRange> {
    let len = range.len_frames();
    if len == 0 {
        return Vec::new();
    }
    let parts = (parts.max(1) as u64).min(len);
    let base = len / parts;
    let extra = len % parts;

    let mut out = Vec::with_capacity(parts as usize);
    let mut start = range.start.0;
    for i in 0..parts {
        let n = base + u64::from(i < extra);
        out.push(FrameRange::from_start_len(FrameIndex(start), n));
        start += n;
    }
    out
}

/// Evaluate every frame of `range`, returning states in frame order.
///
/// Parallel and sequential evaluation produce identical output.
#[tracing::instrument(skip(timeline, opts), fields(frames = range.len_frames(), parallel = opts.parallel))]
pub fn eval_range(
    timeline: &Timeline,
    range: FrameRange,
    opts: &EvalOpts,
) -> TimelineResult<Vec<FrameState>> {
    if range.end.0 > timeline.total_frames() {
        return Err(TimelineError::evaluation(format!(
            "range {range} extends past the composition {}",
            timeline.range()
        ))
        .with_frame(FrameIndex(timeline.total_frames().max(range.start.0))));
    }

    if !opts.parallel {
        return eval_chunk(timeline, range);
    }

    let chunk = normalized_chunk_size(opts.chunk_size);
    let chunks = partition_frames(range, range.len_frames().div_ceil(chunk) as usize);
    tracing::debug!(chunks = chunks.len(), chunk, "partitioned frame range");

    let pool = build_thread_pool(opts.threads)?;
    let per_chunk = pool.install(|| {
        chunks
            .par_iter()
            .map(|&c| eval_chunk(timeline, c))
            .collect::<TimelineResult<Vec<_>>>()
    })?;
    Ok(per_chunk.into_iter().flatten().collect())
}

/// [`eval_range`] after passing `gate`'s readiness barrier once.
pub fn eval_range_gated(
    timeline: &Timeline,
    range: FrameRange,
    opts: &EvalOpts,
    gate: &dyn ResourceGate,
) -> TimelineResult<Vec<FrameState>> {
    gate.wait_ready()
        .context("resources did not become ready")?;
    eval_range(timeline, range, opts)
}

fn eval_chunk(timeline: &Timeline, range: FrameRange) -> TimelineResult<Vec<FrameState>> {
    (range.start.0..range.end.0)
        .map(|f| Evaluator::eval_frame(timeline, FrameIndex(f)))
        .collect()
}

fn build_thread_pool(threads: Option<usize>) -> TimelineResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TimelineError::config("eval threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TimelineError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/batch.rs"]
mod tests;
