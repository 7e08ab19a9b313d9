//! Length bucketing and stride downsampling of strands.

use crate::config::QualitySettings;

use super::strands::{LengthClass, Strand};

/// Buckets with more strands than this are thinned by the tier stride.
pub const DOWNSAMPLE_THRESHOLD: usize = 30;

/// Strands partitioned by [`LengthClass`], each bucket in extraction order.
#[derive(Debug, Default)]
pub struct StrandBuckets<'a> {
    /// Strands with `length <= 0.05`.
    pub short: Vec<&'a Strand>,
    /// Strands with `0.05 < length <= 0.1`.
    pub medium: Vec<&'a Strand>,
    /// Strands with `length > 0.1`.
    pub long: Vec<&'a Strand>,
}

impl<'a> StrandBuckets<'a> {
    /// Total number of strands over all buckets.
    pub fn len(&self) -> usize {
        self.short.len() + self.medium.len() + self.long.len()
    }

    /// Check if all buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bucket holding `class`.
    pub fn bucket(&self, class: LengthClass) -> &[&'a Strand] {
        match class {
            LengthClass::Short => &self.short,
            LengthClass::Medium => &self.medium,
            LengthClass::Long => &self.long,
        }
    }
}

/// Partition strands into length buckets.
pub fn classify(strands: &[Strand]) -> StrandBuckets<'_> {
    let mut buckets = StrandBuckets::default();
    for strand in strands {
        match strand.length_class() {
            LengthClass::Short => buckets.short.push(strand),
            LengthClass::Medium => buckets.medium.push(strand),
            LengthClass::Long => buckets.long.push(strand),
        }
    }
    buckets
}

/// Keep every `stride`-th strand of a bucket larger than
/// [`DOWNSAMPLE_THRESHOLD`], starting with the first.
fn thin<'a, 'b>(bucket: &'b [&'a Strand], stride: usize) -> impl Iterator<Item = &'a Strand> + 'b {
    let step = if bucket.len() > DOWNSAMPLE_THRESHOLD {
        stride.max(1)
    } else {
        1
    };
    bucket.iter().copied().step_by(step)
}

/// Classify and thin strands for card generation.
///
/// Returns the retained strands ordered short, medium, long.
///
/// # Example
///
/// ```
/// use haircards::algo::classify::downsample;
/// use haircards::algo::strands::Strand;
/// use haircards::config::QualityTier;
///
/// let strands: Vec<Strand> = (0..40).map(|i| Strand::new(vec![i], 0.2)).collect();
///
/// // 40 long strands exceed the threshold; `high` keeps every 6th
/// let kept = downsample(&strands, &QualityTier::High.settings());
/// assert_eq!(kept.len(), 7);
/// ```
pub fn downsample<'a>(strands: &'a [Strand], settings: &QualitySettings) -> Vec<&'a Strand> {
    let buckets = classify(strands);
    let mut kept = Vec::with_capacity(buckets.len());
    kept.extend(thin(&buckets.short, settings.short_stride));
    kept.extend(thin(&buckets.medium, settings.medium_stride));
    kept.extend(thin(&buckets.long, settings.long_stride));

    log::debug!(
        "downsampled {} strands to {} (short {}, medium {}, long {})",
        buckets.len(),
        kept.len(),
        buckets.short.len(),
        buckets.medium.len(),
        buckets.long.len()
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityTier;

    fn strands_of_length(count: usize, length: f64, first_index: usize) -> Vec<Strand> {
        (0..count)
            .map(|i| Strand::new(vec![first_index + i], length))
            .collect()
    }

    #[test]
    fn test_classify_buckets() {
        let strands = vec![
            Strand::new(vec![0], 0.02),
            Strand::new(vec![1], 0.07),
            Strand::new(vec![2], 0.15),
            Strand::new(vec![3], 0.05),
            Strand::new(vec![4], 0.1),
        ];
        let buckets = classify(&strands);
        assert_eq!(buckets.short.len(), 2);
        assert_eq!(buckets.medium.len(), 2);
        assert_eq!(buckets.long.len(), 1);
        assert_eq!(buckets.bucket(LengthClass::Long)[0].indices(), &[2]);
    }

    #[test]
    fn test_small_buckets_kept_whole() {
        let mut strands = strands_of_length(30, 0.01, 0);
        strands.extend(strands_of_length(30, 0.5, 30));
        let kept = downsample(&strands, &QualityTier::Low.settings());
        assert_eq!(kept.len(), 60);
    }

    #[test]
    fn test_large_bucket_strided_in_order() {
        let strands = strands_of_length(31, 0.01, 0);
        let kept = downsample(&strands, &QualityTier::Medium.settings());
        // short stride 6: indices 0, 6, 12, 18, 24, 30
        let first: Vec<usize> = kept.iter().map(|s| s.indices()[0]).collect();
        assert_eq!(first, vec![0, 6, 12, 18, 24, 30]);
    }

    #[test]
    fn test_output_order_short_medium_long() {
        let strands = vec![
            Strand::new(vec![0], 0.5),
            Strand::new(vec![1], 0.07),
            Strand::new(vec![2], 0.01),
        ];
        let kept = downsample(&strands, &QualityTier::High.settings());
        let order: Vec<usize> = kept.iter().map(|s| s.indices()[0]).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_zero_stride_treated_as_one() {
        let strands = strands_of_length(40, 0.01, 0);
        let mut settings = QualityTier::High.settings();
        settings.short_stride = 0;
        assert_eq!(downsample(&strands, &settings).len(), 40);
    }
}
