//! Metric record data model.
//!
//! Defines the strict, normalized form of a Core Web Vitals metric as
//! produced from a CrUX report response.

use serde::{Deserialize, Serialize};

/// Largest Contentful Paint.
pub const LARGEST_CONTENTFUL_PAINT: &str = "largest_contentful_paint";
/// Cumulative Layout Shift. The API encodes its p75 as a string.
pub const CUMULATIVE_LAYOUT_SHIFT: &str = "cumulative_layout_shift";
/// Interaction to Next Paint.
pub const INTERACTION_TO_NEXT_PAINT: &str = "interaction_to_next_paint";

/// The metrics collected when no explicit list is configured.
#[must_use]
pub fn default_metric_names() -> Vec<String> {
    [
        LARGEST_CONTENTFUL_PAINT,
        CUMULATIVE_LAYOUT_SHIFT,
        INTERACTION_TO_NEXT_PAINT,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// A density-weighted range of a metric's distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Lower bound of the bucket.
    pub start: f64,
    /// Upper bound of the bucket, `0.0` for the open-ended last bucket.
    #[serde(default)]
    pub end: f64,
    /// Fraction of samples that fall in this bucket.
    pub density: f64,
}

impl HistogramBucket {
    /// Creates a new bucket.
    #[must_use]
    pub fn new(start: f64, end: f64, density: f64) -> Self {
        Self {
            start,
            end,
            density,
        }
    }
}

/// A normalized metric for one origin.
///
/// # Example
///
/// ```
/// use shared::models::{HistogramBucket, MetricRecord};
///
/// let record = MetricRecord::new("largest_contentful_paint", 2456.1).with_histogram(vec![
///     HistogramBucket::new(0.0, 2500.0, 0.8),
///     HistogramBucket::new(2500.0, 4000.0, 0.15),
///     HistogramBucket::new(4000.0, 0.0, 0.05),
/// ]);
///
/// assert_eq!(record.quality().good, 0.8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// The metric name, always one of the requested metric names.
    pub name: String,

    /// The 75th percentile of the metric's real-user distribution.
    pub p75: f64,

    /// Histogram buckets in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub histogram: Vec<HistogramBucket>,
}

impl MetricRecord {
    /// Creates a record with an empty histogram.
    #[must_use]
    pub fn new(name: impl Into<String>, p75: f64) -> Self {
        Self {
            name: name.into(),
            p75,
            histogram: Vec::new(),
        }
    }

    /// Sets the histogram buckets.
    #[must_use]
    pub fn with_histogram(mut self, histogram: Vec<HistogramBucket>) -> Self {
        self.histogram = histogram;
        self
    }

    /// Returns the good / needs improvement / poor split of this record.
    #[must_use]
    pub fn quality(&self) -> QualityBreakdown {
        QualityBreakdown::from_histogram(&self.histogram)
    }
}

/// Share of samples per experience-quality class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityBreakdown {
    /// Density of the first bucket.
    pub good: f64,
    /// Density of the second bucket.
    pub needs_improvement: f64,
    /// Density of the third bucket.
    pub poor: f64,
}

impl QualityBreakdown {
    /// Maps buckets `[0]`, `[1]` and `[2]` to good, needs improvement and
    /// poor. Histograms with fewer than three buckets map to all zeros.
    ///
    /// The mapping is positional and relies on the API ordering its buckets
    /// from best to worst experience.
    #[must_use]
    pub fn from_histogram(histogram: &[HistogramBucket]) -> Self {
        match histogram {
            [good, needs_improvement, poor, ..] => Self {
                good: good.density,
                needs_improvement: needs_improvement.density,
                poor: poor.density,
            },
            _ => Self::default(),
        }
    }
}

/// One persisted row: a metric record attached to the origin it was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    /// The origin the metric was collected for.
    pub url: String,
    /// The metric name.
    pub metric: String,
    /// The p75 value.
    pub score: f64,
    /// Density of the good bucket.
    pub good: f64,
    /// Density of the needs improvement bucket.
    pub needs_improvement: f64,
    /// Density of the poor bucket.
    pub poor: f64,
}

impl MetricRow {
    /// Builds the row persisted for `record` collected for `url`.
    #[must_use]
    pub fn from_record(url: impl Into<String>, record: &MetricRecord) -> Self {
        let quality = record.quality();
        Self {
            url: url.into(),
            metric: record.name.clone(),
            score: record.p75,
            good: quality.good,
            needs_improvement: quality.needs_improvement,
            poor: quality.poor,
        }
    }
}
