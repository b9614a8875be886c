//! Property tests for the sample statistics accumulator.

use cb_math::{GeneralStatistics, SampleStatistics};
use proptest::prelude::*;

fn build(values: &[f64]) -> GeneralStatistics {
    let mut s = GeneralStatistics::new();
    for &v in values {
        SampleStatistics::add(&mut s, v, 1.0).unwrap();
    }
    s
}

proptest! {
    #[test]
    fn merging_partitions_matches_single_pass(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 4..200),
        cut in 0usize..200,
    ) {
        let cut = cut.min(values.len());
        let whole = build(&values);
        let mut left = build(&values[..cut]);
        left.merge(build(&values[cut..]));

        prop_assert_eq!(left.samples(), whole.samples());
        prop_assert_eq!(left.mean().unwrap(), whole.mean().unwrap());
        prop_assert_eq!(
            left.standard_deviation().unwrap(),
            whole.standard_deviation().unwrap()
        );
        prop_assert_eq!(left.percentile(0.05).unwrap(), whole.percentile(0.05).unwrap());
    }

    #[test]
    fn percentile_is_monotone_and_bounded(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 1..200),
        p in 0.001f64..1.0,
        q in 0.001f64..1.0,
    ) {
        let s = build(&values);
        let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
        let a = s.percentile(lo).unwrap();
        let b = s.percentile(hi).unwrap();
        let lowest = values.iter().copied().fold(f64::INFINITY, f64::min);
        let highest = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(a <= b);
        prop_assert!(a >= lowest);
        prop_assert!(b <= highest);
    }
}
