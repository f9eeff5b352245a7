//! Minimum and maximum with first-occurrence positions.

use serde::{Deserialize, Serialize};

/// A value together with the index it was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Located {
    pub value: f64,
    pub index: usize,
}

/// Smallest and largest present value of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrema {
    pub min: Located,
    pub max: Located,
}

impl Extrema {
    /// `max - min`.
    pub fn range(&self) -> f64 {
        self.max.value - self.min.value
    }
}

/// Locate the extrema of the present values.
///
/// Ties resolve to the earliest index. Returns `None` when no value is
/// present.
pub fn extrema(values: &[Option<f64>]) -> Option<Extrema> {
    let mut out: Option<Extrema> = None;
    for (index, value) in values.iter().enumerate() {
        let Some(value) = *value else { continue };
        if value.is_nan() {
            continue;
        }
        let here = Located { value, index };
        match out.as_mut() {
            None => out = Some(Extrema { min: here, max: here }),
            Some(ext) => {
                if value < ext.min.value {
                    ext.min = here;
                }
                if value > ext.max.value {
                    ext.max = here;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_min_and_max() {
        let ext = extrema(&[Some(5.0), Some(1.0), None, Some(9.0)]).unwrap();
        assert_eq!(ext.min, Located { value: 1.0, index: 1 });
        assert_eq!(ext.max, Located { value: 9.0, index: 3 });
        assert_eq!(ext.range(), 8.0);
    }

    #[test]
    fn ties_prefer_earliest() {
        let ext = extrema(&[Some(3.0), Some(1.0), Some(1.0), Some(3.0)]).unwrap();
        assert_eq!(ext.min.index, 1);
        assert_eq!(ext.max.index, 0);
    }

    #[test]
    fn all_missing_is_none() {
        assert!(extrema(&[None, None]).is_none());
        assert!(extrema(&[]).is_none());
    }
}
