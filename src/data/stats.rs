use super::model::Dataset;

/// Histogram bin count bounds and default.
pub const MIN_BINS: usize = 10;
pub const MAX_BINS: usize = 100;
pub const DEFAULT_BINS: usize = 40;

// ---------------------------------------------------------------------------
// Summary – the KPI row
// ---------------------------------------------------------------------------

/// Headline figures for a filtered view. Means are `None` for an empty view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_price: Option<f64>,
    pub mean_year: Option<f64>,
    pub mean_odometer: Option<f64>,
}

impl Summary {
    pub fn of(dataset: &Dataset, indices: &[usize]) -> Self {
        let rows = || indices.iter().map(|&i| &dataset.records[i]);
        Self {
            count: indices.len(),
            mean_price: mean(rows().map(|r| r.price)),
            mean_year: mean(rows().map(|r| f64::from(r.model_year))),
            mean_odometer: mean(rows().map(|r| r.odometer)),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Linear-interpolated quantile (`q` in [0, 1]), `None` for no values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One equal-width bin `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Split `values` into `bins` equal-width bins over their [min, max].
///
/// All-equal values produce a single unit-width bin; no values produce none.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min <= f64::EPSILON * max.abs().max(1.0) {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let bins = bins.clamp(MIN_BINS, MAX_BINS);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// 2^64: the first magnitude that no longer fits a `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// `12345.6` → `$12,346`; missing, non-finite or beyond `u64` → `-`.
pub fn format_currency(value: Option<f64>) -> String {
    match value.map(f64::round) {
        Some(rounded) if rounded.is_finite() && rounded.abs() < U64_LIMIT => {
            let sign = if rounded < 0.0 { "-" } else { "" };
            format!("{sign}${}", group_thousands(rounded.abs() as u64))
        }
        _ => "-".to_string(),
    }
}

/// `12345` → `12,345`.
pub fn format_count(n: usize) -> String {
    group_thousands(n as u64)
}

/// Mean year rounded to a whole year; `-` when missing.
pub fn format_year(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.0}"),
        _ => "-".to_string(),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn test_summary() {
        let mut records = vec![
            record(1000.0, 2000, None),
            record(2000.0, 2010, None),
            record(9000.0, 2020, None),
        ];
        records[0].odometer = 10.0;
        records[1].odometer = 20.0;
        let ds = Dataset::from_records(records, vec![]);

        let s = Summary::of(&ds, &[0, 1]);
        assert_eq!(s.count, 2);
        assert_eq!(s.mean_price, Some(1500.0));
        assert_eq!(s.mean_year, Some(2005.0));
        assert_eq!(s.mean_odometer, Some(15.0));

        let empty = Summary::of(&ds, &[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean_price, None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&[7.0], 0.95), Some(7.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_histogram_counts() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 0.0);
        assert!((bins[9].end - 100.0).abs() < 1e-9);
        // max value lands in the last bin
        assert_eq!(bins[9].count, 11);
    }

    #[test]
    fn test_histogram_clamps_bin_count() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(histogram(&values, 3).len(), MIN_BINS);
        assert_eq!(histogram(&values, 1000).len(), MAX_BINS);
    }

    #[test]
    fn test_histogram_degenerate() {
        assert!(histogram(&[], 40).is_empty());
        let bins = histogram(&[5.0, 5.0, 5.0], 40);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].center(), 5.0);
        assert_eq!(bins[0].width(), 1.0);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some(12345.6)), "$12,346");
        assert_eq!(format_currency(Some(999.4)), "$999");
        assert_eq!(format_currency(Some(1_000_000.0)), "$1,000,000");
        assert_eq!(format_currency(Some(0.0)), "$0");
        assert_eq!(format_currency(Some(-1500.0)), "-$1,500");
        assert_eq!(format_currency(None), "-");
        assert_eq!(format_currency(Some(f64::NAN)), "-");
        assert_eq!(format_currency(Some(1e20)), "-");
        assert_eq!(format_currency(Some(-1e20)), "-");
        assert_eq!(format_currency(Some(1e18)), "$1,000,000,000,000,000,000");
    }

    #[test]
    fn test_format_count_and_year() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(51525), "51,525");
        assert_eq!(format_count(123), "123");
        assert_eq!(format_year(Some(2009.6)), "2010");
        assert_eq!(format_year(None), "-");
    }
}
