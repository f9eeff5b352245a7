//! Maximal runs of positions satisfying a predicate.
//!
//! The same primitive answers "how long was the name absent" (predicate:
//! missing) and "how many consecutive decades in the top 20" (predicate:
//! rank <= 20).

use serde::{Deserialize, Serialize};

/// A maximal run `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start: usize,
    pub length: usize,
}

impl Streak {
    /// Index of the last position in the run.
    pub fn end(&self) -> usize {
        self.start + self.length - 1
    }
}

/// All maximal runs where `predicate` holds, in order.
pub fn streaks<T>(values: &[T], predicate: impl Fn(&T) -> bool) -> Vec<Streak> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        match (predicate(v), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push(Streak {
                    start: s,
                    length: i - s,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(Streak {
            start: s,
            length: values.len() - s,
        });
    }
    out
}

/// Length of the longest run where `predicate` holds (0 if none).
pub fn max_streak<T>(values: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    streaks(values, predicate)
        .iter()
        .map(|s| s.length)
        .max()
        .unwrap_or(0)
}
