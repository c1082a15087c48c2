//! Ordering strategies that decide when each item of a group starts animating.

use std::str::FromStr;

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::foundation::math::{hash64, reduce_u64};

/// Version of the seeded shuffle behind [`StaggerStrategy::Random`].
///
/// Orders produced for a given `(count, seed)` never change within a version.
pub const RANDOM_ORDER_VERSION: u32 = 1;

/// How items are sequenced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaggerStrategy {
    /// First item first.
    #[default]
    Forward,
    /// Last item first.
    Reverse,
    /// Middle item (or middle pair, lower index first) first, expanding outward.
    CenterOut,
    /// Alternate between the two ends, meeting in the middle.
    EdgesIn,
    /// Seeded Fisher-Yates shuffle.
    Random,
}

impl FromStr for StaggerStrategy {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "reverse" => Ok(Self::Reverse),
            "center-out" | "center_out" | "centerout" => Ok(Self::CenterOut),
            "edges-in" | "edges_in" | "edgesin" => Ok(Self::EdgesIn),
            "random" => Ok(Self::Random),
            other => Err(TimelineError::config(format!(
                "unknown stagger strategy '{other}'"
            ))),
        }
    }
}

/// Permutation of `[0, n)` mapping each original item index to its animation position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct StaggerOrder {
    positions: Vec<usize>,
}

impl StaggerOrder {
    fn from_sequence(sequence: &[usize]) -> Self {
        let mut positions = vec![0; sequence.len()];
        for (pos, &item) in sequence.iter().enumerate() {
            positions[item] = pos;
        }
        Self { positions }
    }

    /// `positions()[i]` is the position of original item `i`.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Original item indices in the order they start animating.
    pub fn sequence(&self) -> Vec<usize> {
        let mut seq = vec![0; self.positions.len()];
        for (item, &pos) in self.positions.iter().enumerate() {
            seq[pos] = item;
        }
        seq
    }

    /// Position of original item `index`.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Return `true` for an empty group.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Compute the animation order of `count` items.
///
/// `seed` only affects [`StaggerStrategy::Random`]; `None` means seed `0`.
pub fn compute_order(count: usize, strategy: StaggerStrategy, seed: Option<u64>) -> StaggerOrder {
    let sequence = match strategy {
        StaggerStrategy::Forward => (0..count).collect(),
        StaggerStrategy::Reverse => (0..count).rev().collect(),
        StaggerStrategy::CenterOut => center_out(count),
        StaggerStrategy::EdgesIn => edges_in(count),
        StaggerStrategy::Random => shuffled(count, seed.unwrap_or(0)),
    };
    StaggerOrder::from_sequence(&sequence)
}

fn center_out(count: usize) -> Vec<usize> {
    let mut seq = Vec::with_capacity(count);
    if count == 0 {
        return seq;
    }
    // Odd counts start on the middle item; even counts on the lower item of the middle pair.
    let mut lo = (count - 1) / 2;
    let mut hi = lo + 1;
    if count % 2 == 1 {
        seq.push(lo);
        if lo == 0 {
            return seq;
        }
        lo -= 1;
    }
    loop {
        seq.push(lo);
        seq.push(hi);
        if lo == 0 {
            break;
        }
        lo -= 1;
        hi += 1;
    }
    seq
}

fn edges_in(count: usize) -> Vec<usize> {
    let mut seq = Vec::with_capacity(count);
    if count == 0 {
        return seq;
    }
    let (mut left, mut right) = (0, count - 1);
    while left < right {
        seq.push(left);
        seq.push(right);
        left += 1;
        right -= 1;
    }
    if left == right {
        seq.push(left);
    }
    seq
}

fn shuffled(count: usize, seed: u64) -> Vec<usize> {
    let mut seq: Vec<usize> = (0..count).collect();
    for i in (1..count).rev() {
        let j = reduce_u64(hash64(seed, i as u64), i as u64 + 1) as usize;
        seq.swap(i, j);
    }
    seq
}

/// Delay for the item at `position`: `base_delay + position * stagger_amount`.
pub fn compute_delay(base_delay: f64, position: usize, stagger_amount: f64) -> f64 {
    base_delay + position as f64 * stagger_amount
}

/// Stagger settings for a group of items, in frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaggerSpec {
    /// Ordering strategy.
    #[serde(default)]
    pub strategy: StaggerStrategy,
    /// Delay of the first item.
    #[serde(default)]
    pub base_delay: f64,
    /// Extra delay per position.
    pub amount: f64,
    /// Seed for [`StaggerStrategy::Random`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl StaggerSpec {
    /// Validate that delays are finite and non-negative.
    pub fn validate(&self) -> TimelineResult<()> {
        if !self.base_delay.is_finite() || self.base_delay < 0.0 {
            return Err(TimelineError::config(
                "stagger baseDelay must be finite and >= 0",
            ));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(TimelineError::config(
                "stagger amount must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Delay of every item, indexed by original item index.
    pub fn delays(&self, count: usize) -> Vec<f64> {
        compute_order(count, self.strategy, self.seed)
            .positions()
            .iter()
            .map(|&pos| compute_delay(self.base_delay, pos, self.amount))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/stagger.rs"]
mod tests;
