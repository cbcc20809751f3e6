// Choosing the number of check symbols.
//
// A code with r check symbols accepts candidates that differ from the master
// in at most r/2 symbols. Given sample signatures known to come from the same
// part type and from different part types, r must be at least twice the
// largest same-part difference and below twice the smallest different-part
// difference.

use tracing::debug;

use crate::gf::Symbol;
use crate::signature::{CompareError, MasterSignature};

/// Admissible range for the number of check symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckRange {
    pub min: usize,
    pub max: usize,
}

impl CheckRange {
    /// True when some r accepts every same-part sample and rejects every
    /// different-part sample.
    pub fn is_separable(&self) -> bool {
        self.min < self.max
    }

    pub fn contains(&self, r: usize) -> bool {
        self.min <= r && r < self.max
    }

    /// An even r halfway between the bounds, or `None` if the samples overlap.
    pub fn suggest(&self) -> Option<usize> {
        if !self.is_separable() {
            return None;
        }
        let mid = (self.min + self.max) / 2;
        Some((mid & !1).max(self.min))
    }
}

pub fn calibrate<S, D>(master: &MasterSignature, same_part: S, different_part: D) -> Result<CheckRange, CompareError>
where
    S: IntoIterator,
    S::Item: AsRef<[Symbol]>,
    D: IntoIterator,
    D::Item: AsRef<[Symbol]>,
{
    let capacity = (1usize << master.field_exponent()) - 1 - master.len();

    let mut min = 0;
    for sample in same_part {
        min = min.max(2 * master.num_differences(sample.as_ref())?);
    }
    let mut max = capacity;
    for sample in different_part {
        max = max.min(2 * master.num_differences(sample.as_ref())?);
    }

    debug!(min, max, "calibrated check symbol range");
    Ok(CheckRange { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::signature::Comparator;

    fn master() -> MasterSignature {
        Comparator::new(&CodecConfig::default()).unwrap().enroll(vec![5; 20]).unwrap()
    }

    fn with_diffs(n: usize) -> Vec<Symbol> {
        let mut s = vec![5; 20];
        for x in s.iter_mut().take(n) {
            *x = 6;
        }
        s
    }

    #[test]
    fn test_range_from_samples() {
        let range =
            calibrate(&master(), [with_diffs(1), with_diffs(3)], [with_diffs(9), with_diffs(12)]).unwrap();
        assert_eq!(range, CheckRange { min: 6, max: 18 });
        assert!(range.is_separable());
        assert_eq!(range.suggest(), Some(12));
        assert!(range.contains(6));
        assert!(!range.contains(18));
    }

    #[test]
    fn test_overlapping_samples() {
        let range = calibrate(&master(), [with_diffs(5)], [with_diffs(4)]).unwrap();
        assert!(!range.is_separable());
        assert_eq!(range.suggest(), None);
    }

    #[test]
    fn test_no_different_samples_uses_capacity() {
        let range = calibrate(&master(), [with_diffs(2)], Vec::<Vec<Symbol>>::new()).unwrap();
        assert_eq!(range, CheckRange { min: 4, max: 255 - 20 });
    }

    #[test]
    fn test_sample_length_mismatch() {
        assert!(matches!(
            calibrate(&master(), [vec![5; 3]], Vec::<Vec<Symbol>>::new()),
            Err(CompareError::LengthMismatch { expected: 20, actual: 3 })
        ));
    }
}
