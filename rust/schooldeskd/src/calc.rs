use serde::Serialize;
use std::cmp::Ordering;

/// Scale every stored average is expressed on.
pub const GRADE_SCALE: f64 = 20.0;

/// Half-up rounding to one decimal: `floor(10*x + 0.5) / 10`
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeSample {
    pub raw: f64,
    pub out_of: f64,
}

impl GradeSample {
    pub fn new(raw: f64, out_of: f64) -> Self {
        Self { raw, out_of }
    }

    /// Fraction of the maximum. A sample without a maximum counts as 0.
    pub fn ratio(&self) -> f64 {
        if self.out_of > 0.0 {
            self.raw / self.out_of
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingRules {
    /// Fraction of the maximum needed to pass (0.5 = half marks).
    pub pass_threshold: f64,
}

impl Default for GradingRules {
    fn default() -> Self {
        Self {
            pass_threshold: 0.5,
        }
    }
}

/// Mean of `(raw / out_of) * scale`, rounded to one decimal. `None` when there are no samples.
pub fn weighted_average<I>(samples: I, scale: f64) -> Option<f64>
where
    I: IntoIterator<Item = GradeSample>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for s in samples {
        sum += s.ratio() * scale;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(round_off_1_decimal(sum / (n as f64)))
}

/// Percentage of samples meeting or exceeding `threshold` of their maximum.
pub fn pass_rate<I>(samples: I, threshold: f64) -> Option<f64>
where
    I: IntoIterator<Item = GradeSample>,
{
    let mut passed = 0usize;
    let mut n = 0usize;
    for s in samples {
        n += 1;
        if s.ratio() >= threshold {
            passed += 1;
        }
    }
    if n == 0 {
        return None;
    }
    Some(round_off_1_decimal(100.0 * (passed as f64) / (n as f64)))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / (values.len() as f64))
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// 1-based rank of `value` among `cohort` sorted descending.
///
/// The rank is the position of the first equal average, so tied members share
/// a rank and the next distinct average skips ahead (1, 2, 2, 4).
pub fn competition_rank(cohort: &[f64], value: f64) -> Option<usize> {
    let mut sorted = cohort.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    sorted
        .iter()
        .position(|v| (v - value).abs() < 1e-9)
        .map(|idx| idx + 1)
}

/// Named half-open interval: `min <= v < max`, either bound optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeBucket {
    pub tag: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeBucket {
    pub fn contains(&self, v: f64) -> bool {
        self.min.map(|m| v >= m).unwrap_or(true) && self.max.map(|m| v < m).unwrap_or(true)
    }
}

pub const ENGAGEMENT_BUCKETS: [RangeBucket; 3] = [
    RangeBucket {
        tag: "high",
        min: Some(70.0),
        max: None,
    },
    RangeBucket {
        tag: "medium",
        min: Some(40.0),
        max: Some(70.0),
    },
    RangeBucket {
        tag: "low",
        min: None,
        max: Some(40.0),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engagement {
    High,
    Medium,
    Low,
}

impl Engagement {
    pub fn as_str(self) -> &'static str {
        match self {
            Engagement::High => "high",
            Engagement::Medium => "medium",
            Engagement::Low => "low",
        }
    }
}

pub fn engagement_bucket(score: f64) -> Engagement {
    match ENGAGEMENT_BUCKETS.iter().find(|b| b.contains(score)).map(|b| b.tag) {
        Some("high") => Engagement::High,
        Some("medium") => Engagement::Medium,
        _ => Engagement::Low,
    }
}

/// Buckets for averages on the 20-point scale.
pub const AVERAGE_BINS: [RangeBucket; 5] = [
    RangeBucket {
        tag: "0-9.9",
        min: None,
        max: Some(10.0),
    },
    RangeBucket {
        tag: "10-11.9",
        min: Some(10.0),
        max: Some(12.0),
    },
    RangeBucket {
        tag: "12-13.9",
        min: Some(12.0),
        max: Some(14.0),
    },
    RangeBucket {
        tag: "14-15.9",
        min: Some(14.0),
        max: Some(16.0),
    },
    RangeBucket {
        tag: "16-20",
        min: Some(16.0),
        max: None,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBin {
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: usize,
}

pub fn distribution(values: &[f64], bins: &[RangeBucket]) -> Vec<DistributionBin> {
    bins.iter()
        .map(|b| DistributionBin {
            label: b.tag,
            min: b.min,
            max: b.max,
            count: values.iter().filter(|v| b.contains(**v)).count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Group-by on a tag. Known tags come first in their declared order, then
/// unexpected tags in first-seen order. Zero counts are omitted.
pub fn count_by_tag<'a, I>(tags: I, known: &[&str]) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<TagCount> = known
        .iter()
        .map(|t| TagCount {
            tag: t.to_string(),
            count: 0,
        })
        .collect();
    for tag in tags {
        match out.iter_mut().find(|c| c.tag == tag) {
            Some(c) => c.count += 1,
            None => out.push(TagCount {
                tag: tag.to_string(),
                count: 1,
            }),
        }
    }
    out.retain(|c| c.count > 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_off_is_half_up() {
        assert_eq!(round_off_1_decimal(0.0), 0.0);
        assert_eq!(round_off_1_decimal(3.54), 3.5);
        assert_eq!(round_off_1_decimal(3.55), 3.6);
        assert_eq!(round_off_1_decimal(35.6818), 35.7);
    }

    #[test]
    fn weighted_average_normalizes_each_sample() {
        let samples = vec![
            GradeSample::new(15.0, 20.0),
            GradeSample::new(5.0, 10.0),
            GradeSample::new(70.0, 100.0),
        ];
        // 15 + 10 + 14 over 3
        assert_eq!(weighted_average(samples, GRADE_SCALE), Some(13.0));
        assert_eq!(weighted_average(Vec::new(), GRADE_SCALE), None);
    }

    #[test]
    fn pass_rate_threshold_is_inclusive() {
        let samples = vec![
            GradeSample::new(10.0, 20.0),
            GradeSample::new(9.9, 20.0),
            GradeSample::new(20.0, 20.0),
        ];
        assert_eq!(pass_rate(samples, 0.5), Some(66.7));
        assert_eq!(pass_rate(Vec::new(), 0.5), None);
    }

    #[test]
    fn competition_rank_shares_ties_and_skips() {
        let cohort = [12.0, 15.5, 15.5, 9.0];
        assert_eq!(competition_rank(&cohort, 15.5), Some(1));
        assert_eq!(competition_rank(&cohort, 12.0), Some(3));
        assert_eq!(competition_rank(&cohort, 9.0), Some(4));
        assert_eq!(competition_rank(&cohort, 1.0), None);
    }

    #[test]
    fn engagement_boundaries() {
        assert_eq!(engagement_bucket(69.0), Engagement::Medium);
        assert_eq!(engagement_bucket(70.0), Engagement::High);
        assert_eq!(engagement_bucket(40.0), Engagement::Medium);
        assert_eq!(engagement_bucket(39.9), Engagement::Low);
        assert_eq!(engagement_bucket(0.0), Engagement::Low);
        assert_eq!(engagement_bucket(100.0), Engagement::High);
    }

    #[test]
    fn count_by_tag_omits_zero_and_sums_to_total() {
        let tags = ["b", "a", "b", "z", "b"];
        let counts = count_by_tag(tags.iter().copied(), &["a", "b", "c"]);
        assert_eq!(
            counts,
            vec![
                TagCount { tag: "a".into(), count: 1 },
                TagCount { tag: "b".into(), count: 3 },
                TagCount { tag: "z".into(), count: 1 },
            ]
        );
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), tags.len());
    }

    #[test]
    fn distribution_bins_are_half_open() {
        let bins = distribution(&[9.9, 10.0, 13.9, 16.0, 20.0], &AVERAGE_BINS);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 2]);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }
}
